//! Tool listing the revisions of a build definition

use crate::error::Result;
use crate::mcp::shaping;
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use crate::mcp::tools::{organization_property, project_property};
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;
use serde::Deserialize;
use serde_json::Value;

/// Request to list definition revisions
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetBuildDefinitionRevisionsRequest {
    /// Organization name
    pub organization: String,
    /// Project name or ID
    pub project: String,
    /// Definition ID
    pub definition_id: i64,
}

/// Tool for listing definition revisions
#[derive(Default)]
pub struct GetBuildDefinitionRevisionsTool;

impl GetBuildDefinitionRevisionsTool {
    /// Creates a new instance of the GetBuildDefinitionRevisionsTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for GetBuildDefinitionRevisionsTool {
    fn name(&self) -> &'static str {
        "pipelines_get_build_definition_revisions"
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
                "definitionId": {
                    "type": "integer",
                    "description": "Build definition ID"
                }
            },
            "required": ["organization", "project", "definitionId"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let request: GetBuildDefinitionRevisionsRequest =
            BaseToolImpl::parse_arguments(arguments)?;
        Ok(BaseToolImpl::respond(
            self.name(),
            get_definition_revisions(request, context).await,
        ))
    }
}

async fn get_definition_revisions(
    request: GetBuildDefinitionRevisionsRequest,
    context: &ToolContext,
) -> Result<Value> {
    let session = context.sessions.get_session(&request.organization).await?;
    let revisions = session
        .api()
        .get_definition_revisions(&request.project, request.definition_id)
        .await?;
    Ok(shaping::DEFINITION_REVISION.apply_all(&revisions))
}
