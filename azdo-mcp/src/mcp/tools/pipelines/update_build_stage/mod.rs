//! Declared stage update tool that is never forwarded to the service

use crate::enums::{schema_for, StageUpdateType};
use crate::error::AzdoError;
use crate::mcp::constants::STAGE_UPDATE_UNSUPPORTED;
use crate::mcp::shared_utils::McpErrorHandler;
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use crate::mcp::tools::{organization_property, project_property};
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;
use serde::Deserialize;

/// Request to update a build stage
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBuildStageRequest {
    /// Organization name
    pub organization: String,
    /// Project name or ID
    pub project: String,
    /// Build ID
    pub build_id: i64,
    /// Stage reference name
    pub stage_ref_name: String,
    /// Requested change label
    pub state: String,
    /// Retry all jobs
    pub force_retry_all_jobs: Option<bool>,
}

/// Tool for updating build stages
#[derive(Default)]
pub struct UpdateBuildStageTool;

impl UpdateBuildStageTool {
    /// Creates a new instance of the UpdateBuildStageTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for UpdateBuildStageTool {
    fn name(&self) -> &'static str {
        "pipelines_update_build_stage"
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
                "stageRefName": { "type": "string", "description": "Stage reference name" },
                "state": schema_for::<StageUpdateType>("Requested change"),
                "forceRetryAllJobs": { "type": "boolean" }
            },
            "required": ["organization", "project", "buildId", "stageRefName", "state"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        _context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let request: UpdateBuildStageRequest = BaseToolImpl::parse_arguments(arguments)?;
        tracing::debug!(
            "Stage update requested for build {} stage '{}' ({})",
            request.build_id,
            request.stage_ref_name,
            request.state
        );
        Ok(McpErrorHandler::to_tool_error(
            AzdoError::Unimplemented {
                operation: self.name().to_string(),
                reason: STAGE_UPDATE_UNSUPPORTED.to_string(),
            },
            self.name(),
        ))
    }
}
