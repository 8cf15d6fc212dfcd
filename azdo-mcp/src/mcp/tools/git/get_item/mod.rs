//! Tool reading a repository item

use crate::client::{ItemQuery, VersionDescriptor};
use crate::enums::{schema_for, GitVersionType, VersionControlRecursionType};
use crate::error::Result;
use crate::mcp::shared_utils::McpValidation;
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use crate::mcp::tools::{enum_argument, organization_property, project_property};
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;
use serde::Deserialize;
use serde_json::Value;

/// Version argument of [`GetItemRequest`]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionDescriptorArgument {
    /// Branch, tag or commit
    pub version: String,
    /// Version type label
    pub version_type: String,
}

/// Request to read a repository item
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetItemRequest {
    /// Organization name
    pub organization: String,
    /// Project name or ID
    pub project: String,
    /// Repository name or ID
    pub repository_id: String,
    /// Item path
    pub path: String,
    /// Scope path
    pub scope_path: Option<String>,
    /// Recursion label
    pub recursion_level: Option<String>,
    /// Include content metadata
    pub include_content_metadata: Option<bool>,
    /// Include latest processed change
    pub latest_processed_change: Option<bool>,
    /// Download disposition
    pub download: Option<bool>,
    /// Version to read at
    pub version_descriptor: Option<VersionDescriptorArgument>,
    /// Include content
    pub include_content: Option<bool>,
    /// Resolve LFS pointers
    pub resolve_lfs: Option<bool>,
    /// Sanitize content
    pub sanitize: Option<bool>,
}

impl GetItemRequest {
    fn query(&self) -> Result<ItemQuery> {
        let version_descriptor = match &self.version_descriptor {
            Some(descriptor) => {
                McpValidation::validate_not_empty(
                    &descriptor.version,
                    "versionDescriptor.version",
                )?;
                Some(VersionDescriptor {
                    version: descriptor.version.clone(),
                    version_type: enum_argument::<GitVersionType>(
                        "versionDescriptor.versionType",
                        Some(descriptor.version_type.as_str()),
                    )?,
                })
            }
            None => None,
        };

        Ok(ItemQuery {
            path: self.path.clone(),
            scope_path: self.scope_path.clone(),
            recursion_level: enum_argument::<VersionControlRecursionType>(
                "recursionLevel",
                self.recursion_level.as_deref(),
            )?,
            include_content_metadata: self.include_content_metadata,
            latest_processed_change: self.latest_processed_change,
            download: self.download,
            version_descriptor,
            include_content: self.include_content,
            resolve_lfs: self.resolve_lfs,
            sanitize: self.sanitize,
        })
    }
}

/// Tool for reading repository items
#[derive(Default)]
pub struct GetItemTool;

impl GetItemTool {
    /// Creates a new instance of the GetItemTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for GetItemTool {
    fn name(&self) -> &'static str {
        "git_get_item"
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
                "repositoryId": {
                    "type": "string",
                    "description": "Repository name or ID"
                },
                "path": {
                    "type": "string",
                    "description": "Item path, e.g. /src/main.rs"
                },
                "scopePath": {
                    "type": "string",
                    "description": "Path scope for folder queries"
                },
                "recursionLevel": schema_for::<VersionControlRecursionType>(
                    "How deep to recurse into folders"
                ),
                "includeContentMetadata": { "type": "boolean" },
                "latestProcessedChange": { "type": "boolean" },
                "download": { "type": "boolean" },
                "versionDescriptor": {
                    "type": "object",
                    "properties": {
                        "version": {
                            "type": "string",
                            "description": "Branch name, tag or commit SHA"
                        },
                        "versionType": schema_for::<GitVersionType>("How version is interpreted")
                    },
                    "required": ["version", "versionType"]
                },
                "includeContent": { "type": "boolean" },
                "resolveLfs": { "type": "boolean" },
                "sanitize": { "type": "boolean" }
            },
            "required": ["organization", "project", "repositoryId", "path"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let request: GetItemRequest = BaseToolImpl::parse_arguments(arguments)?;
        Ok(BaseToolImpl::respond(self.name(), get_item(request, context).await))
    }
}

async fn get_item(request: GetItemRequest, context: &ToolContext) -> Result<Value> {
    let query = request.query()?;
    let session = context.sessions.get_session(&request.organization).await?;
    tracing::debug!("Reading item {:?} from {}", query, request.repository_id);
    session
        .api()
        .get_item(&request.project, &request.repository_id, &query)
        .await
}
