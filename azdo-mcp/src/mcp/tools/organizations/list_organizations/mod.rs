//! Tool listing the organizations with configured credentials

use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;
use serde_json::Value;

/// Tool for listing configured organizations
#[derive(Default)]
pub struct ListOrganizationsTool;

impl ListOrganizationsTool {
    /// Creates a new instance of the ListOrganizationsTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for ListOrganizationsTool {
    fn name(&self) -> &'static str {
        "list_organizations"
    }

    fn description(&self) -> &'static str {
        include_str!("description.md")
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }

    async fn execute(
        &self,
        _arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let tenants = context.sessions.list_available_tenants();
        tracing::debug!("Listing {} configured organizations", tenants.len());
        Ok(BaseToolImpl::json_response(&Value::from(tenants)))
    }
}
