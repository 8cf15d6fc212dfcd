//! Tool listing the runs of a pipeline
//!
//! The runs endpoint has no page size parameter, so `top` truncates locally.

use crate::error::Result;
use crate::mcp::constants::DEFAULT_RUNS_TOP;
use crate::mcp::shaping;
use crate::mcp::shared_utils::McpValidation;
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use crate::mcp::tools::{organization_property, project_property};
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;
use serde::Deserialize;
use serde_json::Value;

/// Request to list pipeline runs
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRunsRequest {
    /// Organization name
    pub organization: String,
    /// Project name or ID
    pub project: String,
    /// Pipeline ID
    pub pipeline_id: i64,
    /// Number of runs to keep
    pub top: Option<u32>,
}

/// Tool for listing pipeline runs
#[derive(Default)]
pub struct ListRunsTool;

impl ListRunsTool {
    /// Creates a new instance of the ListRunsTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for ListRunsTool {
    fn name(&self) -> &'static str {
        "pipelines_list_runs"
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
                "pipelineId": { "type": "integer", "description": "Pipeline ID" },
                "top": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Maximum number of runs (default 20)"
                }
            },
            "required": ["organization", "project", "pipelineId"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let request: ListRunsRequest = BaseToolImpl::parse_arguments(arguments)?;
        Ok(BaseToolImpl::respond(self.name(), list_runs(request, context).await))
    }
}

async fn list_runs(request: ListRunsRequest, context: &ToolContext) -> Result<Value> {
    let top = McpValidation::page_size(request.top, "top", DEFAULT_RUNS_TOP)?;
    let session = context.sessions.get_session(&request.organization).await?;
    let mut runs = session
        .api()
        .list_runs(&request.project, request.pipeline_id)
        .await?;
    runs.truncate(top as usize);
    Ok(shaping::PIPELINE_RUN.apply_all(&runs))
}
