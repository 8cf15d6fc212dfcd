//! Tool searching the pull requests of a repository

use crate::client::PullRequestSearchCriteria;
use crate::enums::{schema_for, PullRequestStatus};
use crate::error::Result;
use crate::mcp::constants::DEFAULT_PULL_REQUESTS_TOP;
use crate::mcp::shaping;
use crate::mcp::shared_utils::McpValidation;
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use crate::mcp::tools::{enum_argument, organization_property, project_property};
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;
use serde::Deserialize;
use serde_json::Value;

/// Request to search pull requests
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPullRequestsRequest {
    /// Organization name
    pub organization: String,
    /// Project name or ID
    pub project: String,
    /// Repository name or ID
    pub repository_id: String,
    /// Status label
    pub status: Option<String>,
    /// Creator identity
    pub creator_id: Option<String>,
    /// Reviewer identity
    pub reviewer_id: Option<String>,
    /// Source ref
    pub source_ref_name: Option<String>,
    /// Target ref
    pub target_ref_name: Option<String>,
    /// Page size
    pub top: Option<u32>,
}

impl GetPullRequestsRequest {
    fn criteria(&self) -> Result<(PullRequestSearchCriteria, u32)> {
        let criteria = PullRequestSearchCriteria {
            status: enum_argument::<PullRequestStatus>("status", self.status.as_deref())?,
            creator_id: self.creator_id.clone(),
            reviewer_id: self.reviewer_id.clone(),
            source_ref_name: self.source_ref_name.clone(),
            target_ref_name: self.target_ref_name.clone(),
        };
        let top = McpValidation::page_size(self.top, "top", DEFAULT_PULL_REQUESTS_TOP)?;
        Ok((criteria, top))
    }
}

/// Tool for searching pull requests
#[derive(Default)]
pub struct GetPullRequestsTool;

impl GetPullRequestsTool {
    /// Creates a new instance of the GetPullRequestsTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for GetPullRequestsTool {
    fn name(&self) -> &'static str {
        "git_get_pull_requests"
    }

    fn description(&self) -> &'static str {
        include_str!("description.md")
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "organization": organization_property(),
                "project": project_property(),
                "repositoryId": {
                    "type": "string",
                    "description": "Repository name or ID"
                },
                "status": schema_for::<PullRequestStatus>("Pull request status filter"),
                "creatorId": {
                    "type": "string",
                    "description": "Only pull requests created by this identity"
                },
                "reviewerId": {
                    "type": "string",
                    "description": "Only pull requests reviewed by this identity"
                },
                "sourceRefName": {
                    "type": "string",
                    "description": "Source branch, e.g. refs/heads/feature/login"
                },
                "targetRefName": {
                    "type": "string",
                    "description": "Target branch, e.g. refs/heads/main"
                },
                "top": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Maximum number of pull requests (default 20)"
                }
            },
            "required": ["organization", "project", "repositoryId"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let request: GetPullRequestsRequest = BaseToolImpl::parse_arguments(arguments)?;
        Ok(BaseToolImpl::respond(
            self.name(),
            get_pull_requests(request, context).await,
        ))
    }
}

async fn get_pull_requests(
    request: GetPullRequestsRequest,
    context: &ToolContext,
) -> Result<Value> {
    let (criteria, top) = request.criteria()?;
    let session = context.sessions.get_session(&request.organization).await?;
    tracing::debug!(
        "Searching pull requests in {}/{} with {:?}, top {}",
        request.project,
        request.repository_id,
        criteria,
        top
    );
    let pull_requests = session
        .api()
        .get_pull_requests(&request.project, &request.repository_id, &criteria, top)
        .await?;
    Ok(shaping::PULL_REQUEST.apply_all(&pull_requests))
}
