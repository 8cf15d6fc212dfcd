//! Normalized request parameters passed to [`super::DevOpsApi`]
//!
//! These carry domain enums and parsed timestamps, never raw labels; the tool
//! layer has already validated and defaulted every field.

use crate::enums::{
    BuildQueryOrder, BuildReason, BuildResult, BuildStatus, DefinitionQueryOrder, GitVersionType,
    PullRequestStatus, QueryDeletedOption, VersionControlRecursionType,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Pull request search criteria
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PullRequestSearchCriteria {
    /// Status filter; service default (active) when absent
    pub status: Option<PullRequestStatus>,
    /// Creator identity id
    pub creator_id: Option<String>,
    /// Reviewer identity id
    pub reviewer_id: Option<String>,
    /// Source ref, e.g. `refs/heads/feature/1`
    pub source_ref_name: Option<String>,
    /// Target ref, e.g. `refs/heads/main`
    pub target_ref_name: Option<String>,
}

/// Body of a pull request creation call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPullRequest {
    /// Source ref
    pub source_ref_name: String,
    /// Target ref
    pub target_ref_name: String,
    /// Title
    pub title: String,
    /// Optional description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Create as draft
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_draft: Option<bool>,
}

/// Version a repository item is read at
#[derive(Debug, Clone, PartialEq)]
pub struct VersionDescriptor {
    /// Branch name, tag or commit SHA
    pub version: String,
    /// How `version` is interpreted
    pub version_type: Option<GitVersionType>,
}

/// Options for reading a repository item
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemQuery {
    /// Item path
    pub path: String,
    /// Scope path filter
    pub scope_path: Option<String>,
    /// Recursion depth
    pub recursion_level: Option<VersionControlRecursionType>,
    /// Include content metadata
    pub include_content_metadata: Option<bool>,
    /// Include the latest commit touching the item
    pub latest_processed_change: Option<bool>,
    /// Ask for a download disposition
    pub download: Option<bool>,
    /// Version to read at
    pub version_descriptor: Option<VersionDescriptor>,
    /// Include file content
    pub include_content: Option<bool>,
    /// Resolve LFS pointers
    pub resolve_lfs: Option<bool>,
    /// Sanitize HTML content
    pub sanitize: Option<bool>,
}

/// Build definition listing parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefinitionQuery {
    /// Name filter (wildcards allowed)
    pub name: Option<String>,
    /// Repository id filter
    pub repository_id: Option<String>,
    /// Repository type, required by the service with `repository_id`
    pub repository_type: Option<String>,
    /// Sort order
    pub query_order: Option<DefinitionQueryOrder>,
    /// Page size, always set by the tool layer
    pub top: u32,
    /// Continuation token from a previous page
    pub continuation_token: Option<String>,
    /// Explicit definition ids
    pub definition_ids: Vec<i64>,
    /// Folder path filter
    pub path: Option<String>,
    /// Only definitions with builds after this time
    pub built_after: Option<DateTime<Utc>>,
    /// Only definitions without builds after this time
    pub not_built_after: Option<DateTime<Utc>>,
    /// Include each definition's latest builds
    pub include_latest_builds: Option<bool>,
    /// YAML file name filter
    pub yaml_filename: Option<String>,
}

/// Build listing parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildQuery {
    /// Definition ids
    pub definitions: Vec<i64>,
    /// Build number filter
    pub build_number: Option<String>,
    /// Earliest finish time
    pub min_time: Option<DateTime<Utc>>,
    /// Latest finish time
    pub max_time: Option<DateTime<Utc>>,
    /// Requested-for identity filter
    pub requested_for: Option<String>,
    /// Reason filter
    pub reason_filter: Option<BuildReason>,
    /// Status filter
    pub status_filter: Option<BuildStatus>,
    /// Result filter
    pub result_filter: Option<BuildResult>,
    /// Tags every build must carry
    pub tag_filters: Vec<String>,
    /// Page size, always set by the tool layer
    pub top: u32,
    /// Continuation token from a previous page
    pub continuation_token: Option<String>,
    /// Cap per definition
    pub max_builds_per_definition: Option<u32>,
    /// Deleted build handling
    pub deleted_filter: Option<QueryDeletedOption>,
    /// Sort order
    pub query_order: Option<BuildQueryOrder>,
    /// Branch filter
    pub branch_name: Option<String>,
    /// Explicit build ids
    pub build_ids: Vec<i64>,
    /// Repository id filter
    pub repository_id: Option<String>,
    /// Repository type
    pub repository_type: Option<String>,
}

/// Build change listing parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangesQuery {
    /// Continuation token from a previous page
    pub continuation_token: Option<String>,
    /// Page size, always set by the tool layer
    pub top: u32,
    /// Include source change details
    pub include_source_change: Option<bool>,
}

/// Line range within a build log
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogRange {
    /// First line (1-based)
    pub start_line: Option<u64>,
    /// Last line
    pub end_line: Option<u64>,
}

/// Body of a pipeline run request
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunPipelineParameters {
    /// Validate and expand YAML without queueing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_run: Option<bool>,
    /// Stage names to skip
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stages_to_skip: Vec<String>,
    /// Runtime template parameters
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub template_parameters: BTreeMap<String, String>,
    /// Pipeline variables
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub variables: BTreeMap<String, Variable>,
    /// Replacement YAML, only honoured for preview runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaml_override: Option<String>,
    /// Repository and pipeline resources, forwarded as given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<serde_json::Value>,
}

/// A pipeline variable value
#[derive(Debug, Clone, PartialEq, Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    /// Variable value
    pub value: String,
    /// Mark as secret
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_secret: Option<bool>,
}
