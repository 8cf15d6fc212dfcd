//! Tool reading the lines of a build log

use crate::client::LogRange;
use crate::error::{AzdoError, Result};
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use crate::mcp::tools::{organization_property, project_property};
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;
use serde::Deserialize;
use serde_json::Value;

/// Request to read a build log
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetBuildLogByIdRequest {
    /// Organization name
    pub organization: String,
    /// Project name or ID
    pub project: String,
    /// Build ID
    pub build_id: i64,
    /// Log ID
    pub log_id: i64,
    /// First line
    pub start_line: Option<u64>,
    /// Last line
    pub end_line: Option<u64>,
}

impl GetBuildLogByIdRequest {
    fn range(&self) -> Result<LogRange> {
        if let (Some(start), Some(end)) = (self.start_line, self.end_line) {
            if start > end {
                return Err(AzdoError::validation(
                    "endLine",
                    format!("must not be before startLine ({start})"),
                ));
            }
        }
        Ok(LogRange {
            start_line: self.start_line,
            end_line: self.end_line,
        })
    }
}

/// Tool for reading build log lines
#[derive(Default)]
pub struct GetBuildLogByIdTool;

impl GetBuildLogByIdTool {
    /// Creates a new instance of the GetBuildLogByIdTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for GetBuildLogByIdTool {
    fn name(&self) -> &'static str {
        "pipelines_get_build_log_by_id"
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
                "logId": { "type": "integer", "description": "Log ID" },
                "startLine": { "type": "integer", "minimum": 0 },
                "endLine": { "type": "integer", "minimum": 0 }
            },
            "required": ["organization", "project", "buildId", "logId"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let request: GetBuildLogByIdRequest = BaseToolImpl::parse_arguments(arguments)?;
        Ok(BaseToolImpl::respond(
            self.name(),
            get_build_log_lines(request, context).await,
        ))
    }
}

async fn get_build_log_lines(
    request: GetBuildLogByIdRequest,
    context: &ToolContext,
) -> Result<Value> {
    let range = request.range()?;
    let session = context.sessions.get_session(&request.organization).await?;
    let lines = session
        .api()
        .get_build_log_lines(&request.project, request.build_id, request.log_id, range)
        .await?;
    Ok(Value::from(lines))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::responses::{response_json, response_text};
    use crate::test_utils::{arguments, mock_tool_context, MockDevOpsApi};
    use serde_json::json;

    #[tokio::test]
    async fn test_lines_and_range_are_forwarded() {
        let api = MockDevOpsApi::new().with_records(vec![
            json!("##[section]Starting: Build"),
            json!("cargo build --release"),
        ]);
        let (context, connector) = mock_tool_context(&["contoso"], api);

        let result = GetBuildLogByIdTool::new()
            .execute(
                arguments(json!({
                    "organization": "contoso",
                    "project": "Fabrikam",
                    "buildId": 901,
                    "logId": 7,
                    "startLine": 10,
                    "endLine": 11
                })),
                &context,
            )
            .await
            .unwrap();

        assert_eq!(
            response_json(&result),
            Some(json!(["##[section]Starting: Build", "cargo build --release"]))
        );
        assert_eq!(
            connector.api().last_log_range(),
            Some(LogRange { start_line: Some(10), end_line: Some(11) })
        );
    }

    #[tokio::test]
    async fn test_inverted_range_is_rejected() {
        let (context, connector) = mock_tool_context(&["contoso"], MockDevOpsApi::new());

        let result = GetBuildLogByIdTool::new()
            .execute(
                arguments(json!({
                    "organization": "contoso",
                    "project": "Fabrikam",
                    "buildId": 901,
                    "logId": 7,
                    "startLine": 50,
                    "endLine": 10
                })),
                &context,
            )
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(true));
        assert!(response_text(&result).contains("endLine"));
        assert_eq!(connector.connect_count(), 0);
    }
}
