//! MCP server implementation for the Azure DevOps tools

use super::constants::SERVER_NAME;
use super::tool_registry::{default_registry, ToolContext, ToolRegistry};
use crate::client::{Connector, RestConnector};
use crate::config::ServerConfig;
use crate::credentials::CredentialStore;
use crate::session::SessionCache;
use rmcp::model::*;
use rmcp::service::RequestContext;
use rmcp::{Error as McpError, RoleServer, ServerHandler};
use std::sync::Arc;

const INSTRUCTIONS: &str = "Azure DevOps tools for organizations with a configured personal \
access token. Call list_organizations first; every other tool takes an `organization` argument \
from that list. git_* tools cover repositories and pull requests, pipelines_* tools cover build \
definitions, builds, logs and pipeline runs.";

/// MCP server exposing Azure DevOps tools
#[derive(Clone)]
pub struct McpServer {
    tool_registry: Arc<ToolRegistry>,
    /// Tool context containing shared state for tool execution
    pub tool_context: Arc<ToolContext>,
}

impl McpServer {
    /// Create a server over an existing session cache
    pub fn new(sessions: Arc<SessionCache>) -> Self {
        Self {
            tool_registry: Arc::new(default_registry()),
            tool_context: Arc::new(ToolContext::new(sessions)),
        }
    }

    /// Load credentials and build a server talking to the real service
    ///
    /// A missing or malformed credential file is logged and leaves the server
    /// with no organizations; it never fails startup.
    pub async fn from_config(config: &ServerConfig) -> Self {
        let credentials = CredentialStore::load(&config.credentials_path).await;
        let connector: Arc<dyn Connector> = Arc::new(RestConnector::new(&config.api_version));
        Self::with_connector(credentials, connector, &config.service_host)
    }

    /// Build a server from explicit credentials and connector
    pub fn with_connector(
        credentials: CredentialStore,
        connector: Arc<dyn Connector>,
        service_host: &str,
    ) -> Self {
        let sessions = SessionCache::new(Arc::new(credentials), connector, service_host);
        Self::new(Arc::new(sessions))
    }

    /// Names of every registered tool, sorted
    pub fn list_tool_names(&self) -> Vec<String> {
        self.tool_registry.list_tool_names()
    }

    /// Every registered tool with its schema
    pub fn list_tool_definitions(&self) -> Vec<Tool> {
        self.tool_registry.list_tools()
    }

    /// Execute a tool by name, as `call_tool` does for a connected client
    pub async fn call_tool_by_name(
        &self,
        name: &str,
        arguments: serde_json::Map<String, serde_json::Value>,
    ) -> std::result::Result<CallToolResult, McpError> {
        match self.tool_registry.get_tool(name) {
            Some(tool) => {
                tracing::debug!("Executing tool '{}'", name);
                tool.execute(arguments, &self.tool_context).await
            }
            None => Err(McpError::invalid_request(
                format!("Unknown tool: {name}"),
                None,
            )),
        }
    }

    fn capabilities() -> ServerCapabilities {
        ServerCapabilities {
            prompts: None,
            tools: Some(ToolsCapability {
                list_changed: Some(false),
            }),
            resources: None,
            logging: None,
            completions: None,
            experimental: None,
        }
    }
}

impl ServerHandler for McpServer {
    async fn initialize(
        &self,
        request: InitializeRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<InitializeResult, McpError> {
        tracing::info!(
            "MCP client connecting: {} v{}",
            request.client_info.name,
            request.client_info.version
        );
        Ok(self.get_info())
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.tool_registry.list_tools(),
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        self.call_tool_by_name(&request.name, request.arguments.unwrap_or_default())
            .await
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::default(),
            capabilities: Self::capabilities(),
            server_info: Implementation {
                name: SERVER_NAME.into(),
                version: crate::VERSION.into(),
            },
            instructions: Some(INSTRUCTIONS.into()),
        }
    }
}
