//! Tool listing the changes that went into a build

use crate::client::ChangesQuery;
use crate::error::Result;
use crate::mcp::constants::DEFAULT_CHANGES_TOP;
use crate::mcp::shaping;
use crate::mcp::shared_utils::McpValidation;
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use crate::mcp::tools::{organization_property, project_property};
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;
use serde::Deserialize;
use serde_json::Value;

/// Request to list build changes
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetBuildChangesRequest {
    /// Organization name
    pub organization: String,
    /// Project name or ID
    pub project: String,
    /// Build ID
    pub build_id: i64,
    /// Continuation token
    pub continuation_token: Option<String>,
    /// Page size
    pub top: Option<u32>,
    /// Include source change details
    pub include_source_change: Option<bool>,
}

/// Tool for listing build changes
#[derive(Default)]
pub struct GetBuildChangesTool;

impl GetBuildChangesTool {
    /// Creates a new instance of the GetBuildChangesTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for GetBuildChangesTool {
    fn name(&self) -> &'static str {
        "pipelines_get_build_changes"
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
                "buildId": { "type": "integer", "description": "Build ID" },
                "continuationToken": { "type": "string" },
                "top": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Maximum number of changes (default 20)"
                },
                "includeSourceChange": { "type": "boolean" }
            },
            "required": ["organization", "project", "buildId"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let request: GetBuildChangesRequest = BaseToolImpl::parse_arguments(arguments)?;
        Ok(BaseToolImpl::respond(
            self.name(),
            get_build_changes(request, context).await,
        ))
    }
}

async fn get_build_changes(
    request: GetBuildChangesRequest,
    context: &ToolContext,
) -> Result<Value> {
    let query = ChangesQuery {
        continuation_token: request.continuation_token.clone(),
        top: McpValidation::page_size(request.top, "top", DEFAULT_CHANGES_TOP)?,
        include_source_change: request.include_source_change,
    };
    let session = context.sessions.get_session(&request.organization).await?;
    let changes = session
        .api()
        .get_build_changes(&request.project, request.build_id, &query)
        .await?;
    Ok(shaping::BUILD_CHANGE.apply_all(&changes))
}
