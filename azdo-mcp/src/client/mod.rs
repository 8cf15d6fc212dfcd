//! Azure DevOps service interface
//!
//! [`DevOpsApi`] is the seam between the tool layer and the service. The
//! production implementation is [`rest::RestClient`]; tests substitute an
//! in-memory double. A [`Connector`] builds one client per organization when
//! the session cache first needs it.

pub mod rest;
pub mod types;

use crate::credentials::Secret;
use crate::error::{AzdoError, Result};
use async_trait::async_trait;
use base64::Engine as _;
use reqwest::header::HeaderValue;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use url::Url;

pub use rest::{RestClient, RestConnector};
pub use types::{
    BuildQuery, ChangesQuery, DefinitionQuery, ItemQuery, LogRange, NewPullRequest,
    PullRequestSearchCriteria, RunPipelineParameters, Variable, VersionDescriptor,
};

/// Operations the tools forward to Azure DevOps
///
/// Records come back as raw JSON; shaping happens in the tool layer.
#[async_trait]
pub trait DevOpsApi: Send + Sync {
    /// All projects in the organization
    async fn list_projects(&self) -> Result<Vec<Value>>;

    /// Git repositories in a project
    async fn list_repositories(&self, project: &str, include_hidden: Option<bool>)
        -> Result<Vec<Value>>;

    /// Pull requests in a repository
    async fn get_pull_requests(
        &self,
        project: &str,
        repository_id: &str,
        criteria: &PullRequestSearchCriteria,
        top: u32,
    ) -> Result<Vec<Value>>;

    /// A single pull request
    async fn get_pull_request(&self, project: &str, pull_request_id: i64) -> Result<Value>;

    /// Create a pull request
    async fn create_pull_request(
        &self,
        project: &str,
        repository_id: &str,
        pull_request: &NewPullRequest,
    ) -> Result<Value>;

    /// A file or folder in a repository
    async fn get_item(&self, project: &str, repository_id: &str, query: &ItemQuery)
        -> Result<Value>;

    /// Build definitions
    async fn get_definitions(&self, project: &str, query: &DefinitionQuery) -> Result<Vec<Value>>;

    /// Revision history of a build definition
    async fn get_definition_revisions(&self, project: &str, definition_id: i64)
        -> Result<Vec<Value>>;

    /// Builds
    async fn get_builds(&self, project: &str, query: &BuildQuery) -> Result<Vec<Value>>;

    /// A single build
    async fn get_build(&self, project: &str, build_id: i64) -> Result<Value>;

    /// Log metadata for a build
    async fn get_build_logs(&self, project: &str, build_id: i64) -> Result<Vec<Value>>;

    /// Lines of one build log
    async fn get_build_log_lines(
        &self,
        project: &str,
        build_id: i64,
        log_id: i64,
        range: LogRange,
    ) -> Result<Vec<String>>;

    /// Changes associated with a build
    async fn get_build_changes(
        &self,
        project: &str,
        build_id: i64,
        query: &ChangesQuery,
    ) -> Result<Vec<Value>>;

    /// A single pipeline run
    async fn get_run(&self, project: &str, pipeline_id: i64, run_id: i64) -> Result<Value>;

    /// Runs of a pipeline, newest first
    async fn list_runs(&self, project: &str, pipeline_id: i64) -> Result<Vec<Value>>;

    /// Queue (or preview) a pipeline run
    async fn run_pipeline(
        &self,
        project: &str,
        pipeline_id: i64,
        pipeline_version: Option<i64>,
        parameters: &RunPipelineParameters,
    ) -> Result<Value>;
}

/// Authentication context derived from a personal access token
///
/// Holds the `Authorization` header value, flagged sensitive so it is never
/// printed.
#[derive(Clone)]
pub struct AuthContext {
    header: HeaderValue,
}

impl AuthContext {
    /// Basic authentication with an empty user name and the PAT as password
    pub fn from_pat(token: &Secret) -> Result<Self> {
        let encoded =
            base64::engine::general_purpose::STANDARD.encode(format!(":{}", token.expose()));
        let mut header = HeaderValue::from_str(&format!("Basic {encoded}"))
            .map_err(|e| AzdoError::Other(format!("PAT is not a valid header value: {e}")))?;
        header.set_sensitive(true);
        Ok(Self { header })
    }

    /// The `Authorization` header value
    pub fn header(&self) -> &HeaderValue {
        &self.header
    }
}

impl fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthContext(Basic ***)")
    }
}

/// Where and as whom a client connects
#[derive(Debug, Clone)]
pub struct Endpoint {
    /// Organization name
    pub organization: String,
    /// `https://<service-host>/<organization>`
    pub base_url: Url,
    /// Credentials for every request
    pub auth: AuthContext,
}

/// Builds a client for one organization endpoint
pub trait Connector: Send + Sync {
    /// Construct the client; called at most once per organization
    fn connect(&self, endpoint: &Endpoint) -> Result<Arc<dyn DevOpsApi>>;
}
