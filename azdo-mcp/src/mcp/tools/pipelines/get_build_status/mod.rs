//! Tool reporting the status of one build

use crate::error::Result;
use crate::mcp::shaping;
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use crate::mcp::tools::{organization_property, project_property};
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;
use serde::Deserialize;
use serde_json::Value;

/// Request for a build's status
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetBuildStatusRequest {
    /// Organization name
    pub organization: String,
    /// Project name or ID
    pub project: String,
    /// Build ID
    pub build_id: i64,
}

/// Tool for reading a build's status
#[derive(Default)]
pub struct GetBuildStatusTool;

impl GetBuildStatusTool {
    /// Creates a new instance of the GetBuildStatusTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for GetBuildStatusTool {
    fn name(&self) -> &'static str {
        "pipelines_get_build_status"
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
                "buildId": { "type": "integer", "description": "Build ID" }
            },
            "required": ["organization", "project", "buildId"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let request: GetBuildStatusRequest = BaseToolImpl::parse_arguments(arguments)?;
        Ok(BaseToolImpl::respond(
            self.name(),
            get_build_status(request, context).await,
        ))
    }
}

async fn get_build_status(request: GetBuildStatusRequest, context: &ToolContext) -> Result<Value> {
    let session = context.sessions.get_session(&request.organization).await?;
    let build = session
        .api()
        .get_build(&request.project, request.build_id)
        .await?;
    Ok(shaping::BUILD_STATUS.apply(&build))
}
