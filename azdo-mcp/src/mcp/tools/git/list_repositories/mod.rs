//! Tool listing the Git repositories of a project

use crate::error::Result;
use crate::mcp::shaping;
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use crate::mcp::tools::{organization_property, project_property};
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;
use serde::Deserialize;
use serde_json::Value;

/// Request to list repositories
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRepositoriesRequest {
    /// Organization name
    pub organization: String,
    /// Project name or ID
    pub project: String,
    /// Include hidden repositories
    pub include_hidden: Option<bool>,
}

/// Tool for listing Git repositories
#[derive(Default)]
pub struct ListRepositoriesTool;

impl ListRepositoriesTool {
    /// Creates a new instance of the ListRepositoriesTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for ListRepositoriesTool {
    fn name(&self) -> &'static str {
        "git_list_repositories"
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
                "includeHidden": {
                    "type": "boolean",
                    "description": "Include hidden repositories"
                }
            },
            "required": ["organization", "project"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let request: ListRepositoriesRequest = BaseToolImpl::parse_arguments(arguments)?;
        Ok(BaseToolImpl::respond(
            self.name(),
            list_repositories(request, context).await,
        ))
    }
}

async fn list_repositories(
    request: ListRepositoriesRequest,
    context: &ToolContext,
) -> Result<Value> {
    let session = context.sessions.get_session(&request.organization).await?;
    let repositories = session
        .api()
        .list_repositories(&request.project, request.include_hidden)
        .await?;
    Ok(shaping::REPOSITORY.apply_all(&repositories))
}
