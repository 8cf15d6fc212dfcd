//! Tool listing the logs of a build

use crate::error::Result;
use crate::mcp::shaping;
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use crate::mcp::tools::{organization_property, project_property};
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;
use serde::Deserialize;
use serde_json::Value;

/// Request to list build logs
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetBuildLogRequest {
    /// Organization name
    pub organization: String,
    /// Project name or ID
    pub project: String,
    /// Build ID
    pub build_id: i64,
}

/// Tool for listing build logs
#[derive(Default)]
pub struct GetBuildLogTool;

impl GetBuildLogTool {
    /// Creates a new instance of the GetBuildLogTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for GetBuildLogTool {
    fn name(&self) -> &'static str {
        "pipelines_get_build_log"
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
        let request: GetBuildLogRequest = BaseToolImpl::parse_arguments(arguments)?;
        Ok(BaseToolImpl::respond(
            self.name(),
            get_build_logs(request, context).await,
        ))
    }
}

async fn get_build_logs(request: GetBuildLogRequest, context: &ToolContext) -> Result<Value> {
    let session = context.sessions.get_session(&request.organization).await?;
    let logs = session
        .api()
        .get_build_logs(&request.project, request.build_id)
        .await?;
    Ok(shaping::BUILD_LOG.apply_all(&logs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::responses::response_json;
    use crate::test_utils::{arguments, mock_tool_context, MockDevOpsApi};
    use serde_json::json;

    #[tokio::test]
    async fn test_logs_are_shaped() {
        let api = MockDevOpsApi::new().with_records(vec![json!({
            "id": 7,
            "type": "Container",
            "lineCount": 118,
            "createdOn": "2024-05-01T10:00:00Z",
            "lastChangedOn": "2024-05-01T10:05:00Z",
            "url": "https://dev.azure.com/contoso/_apis/build/builds/901/logs/7"
        })]);
        let (context, _) = mock_tool_context(&["contoso"], api);

        let result = GetBuildLogTool::new()
            .execute(
                arguments(json!({ "organization": "contoso", "project": "Fabrikam", "buildId": 901 })),
                &context,
            )
            .await
            .unwrap();

        let logs = response_json(&result).unwrap();
        assert_eq!(logs[0]["id"], 7);
        assert_eq!(logs[0]["lineCount"], 118);
        assert_eq!(logs[0]["type"], "Container");
    }
}
