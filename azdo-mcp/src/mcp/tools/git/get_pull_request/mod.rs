//! Tool fetching a single pull request

use crate::error::Result;
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use crate::mcp::tools::{organization_property, project_property};
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;
use serde::Deserialize;
use serde_json::Value;

/// Request to fetch a pull request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPullRequestRequest {
    /// Organization name
    pub organization: String,
    /// Project name or ID
    pub project: String,
    /// Pull request ID
    pub pull_request_id: i64,
}

/// Tool for fetching a pull request
#[derive(Default)]
pub struct GetPullRequestTool;

impl GetPullRequestTool {
    /// Creates a new instance of the GetPullRequestTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for GetPullRequestTool {
    fn name(&self) -> &'static str {
        "git_get_pull_request"
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
                "pullRequestId": {
                    "type": "integer",
                    "description": "Pull request ID"
                }
            },
            "required": ["organization", "project", "pullRequestId"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let request: GetPullRequestRequest = BaseToolImpl::parse_arguments(arguments)?;
        Ok(BaseToolImpl::respond(
            self.name(),
            get_pull_request(request, context).await,
        ))
    }
}

async fn get_pull_request(request: GetPullRequestRequest, context: &ToolContext) -> Result<Value> {
    let session = context.sessions.get_session(&request.organization).await?;
    session
        .api()
        .get_pull_request(&request.project, request.pull_request_id)
        .await
}
