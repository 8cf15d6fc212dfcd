//! Tool registry for MCP operations
//!
//! Every tool is a type implementing [`McpTool`]: a name, a description, a
//! JSON schema for its arguments and an `execute` body. The server looks tools
//! up here by name instead of matching on strings.

use super::responses;
use super::shared_utils::McpErrorHandler;
use crate::session::SessionCache;
use rmcp::model::{CallToolResult, Tool};
use rmcp::Error as McpError;
use std::collections::HashMap;
use std::sync::Arc;

/// Context shared by all tools during execution
#[derive(Clone, Debug)]
pub struct ToolContext {
    /// Per-organization sessions; the only state that outlives a call
    pub sessions: Arc<SessionCache>,
}

impl ToolContext {
    /// Create a new tool context
    pub fn new(sessions: Arc<SessionCache>) -> Self {
        Self { sessions }
    }
}

/// Trait defining the interface for all MCP tools
#[async_trait::async_trait]
pub trait McpTool: Send + Sync {
    /// Get the tool's name
    fn name(&self) -> &'static str;

    /// Get the tool's description
    fn description(&self) -> &'static str;

    /// Get the tool's JSON schema for arguments
    fn schema(&self) -> serde_json::Value;

    /// Execute the tool with the given arguments and context
    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError>;
}

/// Registry for managing MCP tools
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn McpTool>>,
}

impl ToolRegistry {
    /// Create a new empty tool registry
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool in the registry
    pub fn register<T: McpTool + 'static>(&mut self, tool: T) {
        let name = tool.name().to_string();
        self.tools.insert(name, Box::new(tool));
    }

    /// Get a tool by name
    pub fn get_tool(&self, name: &str) -> Option<&dyn McpTool> {
        self.tools.get(name).map(|tool| tool.as_ref())
    }

    /// List all registered tool names, sorted
    pub fn list_tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Get all registered tools as Tool objects for MCP list_tools response
    pub fn list_tools(&self) -> Vec<Tool> {
        let mut tools: Vec<Tool> = self
            .tools
            .values()
            .map(|tool| {
                let schema_map = match tool.schema() {
                    serde_json::Value::Object(map) => map,
                    _ => serde_json::Map::new(),
                };

                Tool {
                    name: tool.name().into(),
                    description: Some(tool.description().into()),
                    input_schema: Arc::new(schema_map),
                    annotations: None,
                }
            })
            .collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Base implementation providing common utility methods for MCP tools
pub struct BaseToolImpl;

impl BaseToolImpl {
    /// Parse tool arguments from a JSON map into a typed struct
    ///
    /// A missing required field or a value of the wrong JSON type is a
    /// structured rejection; nothing is coerced.
    pub fn parse_arguments<T: serde::de::DeserializeOwned>(
        arguments: serde_json::Map<String, serde_json::Value>,
    ) -> std::result::Result<T, McpError> {
        serde_json::from_value(serde_json::Value::Object(arguments))
            .map_err(|e| McpError::invalid_params(format!("Invalid arguments: {e}"), None))
    }

    /// Create a success response with text content
    pub fn create_success_response<T: Into<String>>(content: T) -> CallToolResult {
        responses::create_success_response(content.into())
    }

    /// Create an error response with the given error message
    pub fn create_error_response<T: Into<String>>(
        error: T,
        details: Option<String>,
    ) -> CallToolResult {
        let error_text = match details {
            Some(details) => format!("{}: {}", error.into(), details),
            None => error.into(),
        };
        responses::create_error_response(error_text)
    }

    /// Success response carrying `value` as pretty-printed JSON
    pub fn json_response(value: &serde_json::Value) -> CallToolResult {
        let text = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
        Self::create_success_response(text)
    }

    /// Wrap the outcome of a tool body into a response
    ///
    /// Every domain failure becomes an error response; none escapes as a
    /// protocol error.
    pub fn respond(operation: &str, result: crate::Result<serde_json::Value>) -> CallToolResult {
        match result {
            Ok(value) => Self::json_response(&value),
            Err(error) => McpErrorHandler::to_tool_error(error, operation),
        }
    }
}

/// Register the organization and project tools with the registry
pub fn register_organization_tools(registry: &mut ToolRegistry) {
    use crate::mcp::tools::organizations;
    organizations::register_organization_tools(registry);
}

/// Register the Git tools with the registry
pub fn register_git_tools(registry: &mut ToolRegistry) {
    use crate::mcp::tools::git;
    git::register_git_tools(registry);
}

/// Register the pipeline tools with the registry
pub fn register_pipeline_tools(registry: &mut ToolRegistry) {
    use crate::mcp::tools::pipelines;
    pipelines::register_pipeline_tools(registry);
}

/// A registry holding every tool this server exposes
pub fn default_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    register_organization_tools(&mut registry);
    register_git_tools(&mut registry);
    register_pipeline_tools(&mut registry);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AzdoError;
    use crate::mcp::responses::response_text;
    use crate::test_utils::{mock_tool_context, MockDevOpsApi};
    use serde_json::json;

    struct EchoTool;

    #[async_trait::async_trait]
    impl McpTool for EchoTool {
        fn name(&self) -> &'static str {
            "echo"
        }

        fn description(&self) -> &'static str {
            "Echo the message back"
        }

        fn schema(&self) -> serde_json::Value {
            json!({
                "type": "object",
                "properties": { "message": { "type": "string" } },
                "required": ["message"]
            })
        }

        async fn execute(
            &self,
            arguments: serde_json::Map<String, serde_json::Value>,
            _context: &ToolContext,
        ) -> std::result::Result<CallToolResult, McpError> {
            #[derive(serde::Deserialize)]
            struct Request {
                message: String,
            }
            let request: Request = BaseToolImpl::parse_arguments(arguments)?;
            Ok(BaseToolImpl::create_success_response(request.message))
        }
    }

    #[test]
    fn test_registry_creation() {
        let registry = ToolRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_tool_registration() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);

        assert_eq!(registry.len(), 1);
        assert!(registry.get_tool("echo").is_some());
        assert!(registry.get_tool("nonexistent").is_none());
        assert_eq!(registry.list_tool_names(), vec!["echo"]);
    }

    #[test]
    fn test_list_tools_carries_schema() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);

        let tools = registry.list_tools();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "echo");
        assert_eq!(tools[0].input_schema["required"], json!(["message"]));
    }

    #[tokio::test]
    async fn test_parse_arguments_rejects_wrong_type() {
        let (context, _) = mock_tool_context(&[], MockDevOpsApi::new());
        let mut arguments = serde_json::Map::new();
        arguments.insert("message".to_string(), json!(42));

        let err = EchoTool.execute(arguments, &context).await.unwrap_err();
        assert!(err.message.contains("Invalid arguments"));
    }

    #[test]
    fn test_default_registry_has_every_tool() {
        let registry = default_registry();
        let names = registry.list_tool_names();

        assert_eq!(names.len(), 18);
        for expected in [
            "list_organizations",
            "list_projects",
            "git_list_repositories",
            "git_get_pull_requests",
            "git_get_pull_request",
            "git_create_pull_request",
            "git_get_item",
            "pipelines_get_build_definitions",
            "pipelines_get_build_definition_revisions",
            "pipelines_get_builds",
            "pipelines_get_build_log",
            "pipelines_get_build_log_by_id",
            "pipelines_get_build_changes",
            "pipelines_get_run",
            "pipelines_list_runs",
            "pipelines_run_pipeline",
            "pipelines_get_build_status",
            "pipelines_update_build_stage",
        ] {
            assert!(names.iter().any(|n| n == expected), "missing {expected}");
        }
    }

    #[test]
    fn test_every_schema_is_an_object_with_description() {
        let registry = default_registry();
        for tool in registry.list_tools() {
            assert_eq!(tool.input_schema["type"], "object", "{}", tool.name);
            assert!(
                tool.description.as_deref().is_some_and(|d| !d.trim().is_empty()),
                "{} has no description",
                tool.name
            );
        }
    }

    #[test]
    fn test_respond_wraps_success_as_pretty_json() {
        let result = BaseToolImpl::respond("op", Ok(json!({ "id": 1 })));
        assert_eq!(result.is_error, Some(false));
        assert_eq!(response_text(&result), "{\n  \"id\": 1\n}");
    }

    #[test]
    fn test_respond_wraps_failure_as_error_text() {
        let result = BaseToolImpl::respond(
            "op",
            Err(AzdoError::UnknownTenant("northwind".to_string())),
        );
        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            response_text(&result),
            "Error: No PAT found for organization: northwind"
        );
    }
}
