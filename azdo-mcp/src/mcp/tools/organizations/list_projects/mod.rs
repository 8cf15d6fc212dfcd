//! Tool listing the projects of an organization

use crate::error::Result;
use crate::mcp::shaping;
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use crate::mcp::tools::organization_property;
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;
use serde::Deserialize;
use serde_json::Value;

/// Request to list projects
#[derive(Debug, Deserialize)]
pub struct ListProjectsRequest {
    /// Organization name
    pub organization: String,
}

/// Tool for listing projects
#[derive(Default)]
pub struct ListProjectsTool;

impl ListProjectsTool {
    /// Creates a new instance of the ListProjectsTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for ListProjectsTool {
    fn name(&self) -> &'static str {
        "list_projects"
    }

    fn description(&self) -> &'static str {
        include_str!("description.md")
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "organization": organization_property()
            },
            "required": ["organization"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let request: ListProjectsRequest = BaseToolImpl::parse_arguments(arguments)?;
        Ok(BaseToolImpl::respond(
            self.name(),
            list_projects(request, context).await,
        ))
    }
}

async fn list_projects(request: ListProjectsRequest, context: &ToolContext) -> Result<Value> {
    let session = context.sessions.get_session(&request.organization).await?;
    let projects = session.api().list_projects().await?;
    Ok(shaping::PROJECT.apply_all(&projects))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::responses::{response_json, response_text};
    use crate::test_utils::{arguments, mock_tool_context, MockDevOpsApi};
    use serde_json::json;

    #[tokio::test]
    async fn test_projects_are_shaped() {
        let api = MockDevOpsApi::new().with_records(vec![json!({
            "id": "p1",
            "name": "Fabrikam-Fiber",
            "state": "wellFormed",
            "revision": 411,
            "visibility": "private",
            "url": "https://dev.azure.com/contoso/_apis/projects/p1"
        })]);
        let (context, _) = mock_tool_context(&["contoso"], api);

        let result = ListProjectsTool::new()
            .execute(arguments(json!({ "organization": "contoso" })), &context)
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(false));
        assert_eq!(
            response_json(&result),
            Some(json!([{
                "id": "p1",
                "name": "Fabrikam-Fiber",
                "state": "wellFormed",
                "visibility": "private"
            }]))
        );
    }

    #[tokio::test]
    async fn test_unknown_organization_is_an_error_response() {
        let (context, connector) = mock_tool_context(&["contoso"], MockDevOpsApi::new());

        let result = ListProjectsTool::new()
            .execute(arguments(json!({ "organization": "northwind" })), &context)
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            response_text(&result),
            "Error: No PAT found for organization: northwind"
        );
        assert_eq!(connector.connect_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_organization_is_rejected() {
        let (context, _) = mock_tool_context(&["contoso"], MockDevOpsApi::new());

        let err = ListProjectsTool::new()
            .execute(arguments(json!({})), &context)
            .await
            .unwrap_err();

        assert!(err.message.contains("organization"));
    }

    #[tokio::test]
    async fn test_authentication_failure_surfaces_service_text() {
        let api = MockDevOpsApi::new().failing_with(401, "Access denied: PAT expired");
        let (context, _) = mock_tool_context(&["contoso"], api);

        let result = ListProjectsTool::new()
            .execute(arguments(json!({ "organization": "contoso" })), &context)
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(true));
        assert!(response_text(&result).contains("Access denied: PAT expired"));
    }
}
