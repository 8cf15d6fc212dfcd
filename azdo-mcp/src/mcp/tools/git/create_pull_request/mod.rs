//! Tool creating a pull request

use crate::client::NewPullRequest;
use crate::error::Result;
use crate::mcp::shared_utils::McpValidation;
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use crate::mcp::tools::{organization_property, project_property};
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;
use serde::Deserialize;
use serde_json::Value;

/// Request to create a pull request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePullRequestRequest {
    /// Organization name
    pub organization: String,
    /// Project name or ID
    pub project: String,
    /// Repository name or ID
    pub repository_id: String,
    /// Source ref
    pub source_ref_name: String,
    /// Target ref
    pub target_ref_name: String,
    /// Title
    pub title: String,
    /// Description
    pub description: Option<String>,
    /// Draft flag
    pub is_draft: Option<bool>,
}

impl CreatePullRequestRequest {
    fn body(&self) -> Result<NewPullRequest> {
        McpValidation::validate_not_empty(&self.source_ref_name, "sourceRefName")?;
        McpValidation::validate_not_empty(&self.target_ref_name, "targetRefName")?;
        McpValidation::validate_not_empty(&self.title, "title")?;

        Ok(NewPullRequest {
            source_ref_name: self.source_ref_name.clone(),
            target_ref_name: self.target_ref_name.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            is_draft: self.is_draft,
        })
    }
}

/// Tool for creating pull requests
#[derive(Default)]
pub struct CreatePullRequestTool;

impl CreatePullRequestTool {
    /// Creates a new instance of the CreatePullRequestTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for CreatePullRequestTool {
    fn name(&self) -> &'static str {
        "git_create_pull_request"
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
                "sourceRefName": {
                    "type": "string",
                    "description": "Branch to merge from, e.g. refs/heads/feature/login"
                },
                "targetRefName": {
                    "type": "string",
                    "description": "Branch to merge into, e.g. refs/heads/main"
                },
                "title": {
                    "type": "string",
                    "description": "Pull request title"
                },
                "description": {
                    "type": "string",
                    "description": "Markdown description"
                },
                "isDraft": {
                    "type": "boolean",
                    "description": "Create the pull request as a draft"
                }
            },
            "required": [
                "organization",
                "project",
                "repositoryId",
                "sourceRefName",
                "targetRefName",
                "title"
            ]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let request: CreatePullRequestRequest = BaseToolImpl::parse_arguments(arguments)?;
        Ok(BaseToolImpl::respond(
            self.name(),
            create_pull_request(request, context).await,
        ))
    }
}

async fn create_pull_request(
    request: CreatePullRequestRequest,
    context: &ToolContext,
) -> Result<Value> {
    let body = request.body()?;
    let session = context.sessions.get_session(&request.organization).await?;
    let created = session
        .api()
        .create_pull_request(&request.project, &request.repository_id, &body)
        .await?;
    tracing::info!(
        "Created pull request {} in {}/{}",
        created["pullRequestId"],
        request.project,
        request.repository_id
    );
    Ok(created)
}
