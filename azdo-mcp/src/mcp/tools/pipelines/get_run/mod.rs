//! Tool fetching a single pipeline run

use crate::error::Result;
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use crate::mcp::tools::{organization_property, project_property};
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;
use serde::Deserialize;
use serde_json::Value;

/// Request to fetch a pipeline run
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetRunRequest {
    /// Organization name
    pub organization: String,
    /// Project name or ID
    pub project: String,
    /// Pipeline ID
    pub pipeline_id: i64,
    /// Run ID
    pub run_id: i64,
}

/// Tool for fetching a pipeline run
#[derive(Default)]
pub struct GetRunTool;

impl GetRunTool {
    /// Creates a new instance of the GetRunTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for GetRunTool {
    fn name(&self) -> &'static str {
        "pipelines_get_run"
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
                "runId": { "type": "integer", "description": "Run ID" }
            },
            "required": ["organization", "project", "pipelineId", "runId"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let request: GetRunRequest = BaseToolImpl::parse_arguments(arguments)?;
        Ok(BaseToolImpl::respond(self.name(), get_run(request, context).await))
    }
}

async fn get_run(request: GetRunRequest, context: &ToolContext) -> Result<Value> {
    let session = context.sessions.get_session(&request.organization).await?;
    session
        .api()
        .get_run(&request.project, request.pipeline_id, request.run_id)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::responses::response_json;
    use crate::test_utils::{arguments, mock_tool_context, MockDevOpsApi};
    use serde_json::json;

    #[tokio::test]
    async fn test_run_is_returned_unshaped() {
        let run = json!({
            "id": 1201,
            "state": "completed",
            "result": "succeeded",
            "templateParameters": { "environment": "staging" }
        });
        let (context, connector) =
            mock_tool_context(&["contoso"], MockDevOpsApi::new().with_record(run.clone()));

        let result = GetRunTool::new()
            .execute(
                arguments(json!({
                    "organization": "contoso",
                    "project": "Fabrikam",
                    "pipelineId": 12,
                    "runId": 1201
                })),
                &context,
            )
            .await
            .unwrap();

        assert_eq!(response_json(&result), Some(run));
        assert_eq!(connector.api().calls()[0].operation, "get_run");
    }
}
