//! Tool listing build definitions

use crate::client::DefinitionQuery;
use crate::enums::{schema_for, DefinitionQueryOrder};
use crate::error::Result;
use crate::mcp::constants::DEFAULT_DEFINITIONS_TOP;
use crate::mcp::shaping;
use crate::mcp::shared_utils::McpValidation;
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use crate::mcp::tools::{enum_argument, organization_property, project_property};
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;
use serde::Deserialize;
use serde_json::Value;

/// Request to list build definitions
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetBuildDefinitionsRequest {
    /// Organization name
    pub organization: String,
    /// Project name or ID
    pub project: String,
    /// Name filter
    pub name: Option<String>,
    /// Repository filter
    pub repository_id: Option<String>,
    /// Repository type
    pub repository_type: Option<String>,
    /// Sort order label
    pub query_order: Option<String>,
    /// Page size
    pub top: Option<u32>,
    /// Continuation token
    pub continuation_token: Option<String>,
    /// Explicit IDs
    #[serde(default)]
    pub definition_ids: Vec<i64>,
    /// Folder path
    pub path: Option<String>,
    /// Built after
    pub built_after: Option<String>,
    /// Not built after
    pub not_built_after: Option<String>,
    /// Include latest builds
    pub include_latest_builds: Option<bool>,
    /// YAML file name
    pub yaml_filename: Option<String>,
}

impl GetBuildDefinitionsRequest {
    fn query(&self) -> Result<DefinitionQuery> {
        Ok(DefinitionQuery {
            name: self.name.clone(),
            repository_id: self.repository_id.clone(),
            repository_type: self.repository_type.clone(),
            query_order: enum_argument::<DefinitionQueryOrder>(
                "queryOrder",
                self.query_order.as_deref(),
            )?,
            top: McpValidation::page_size(self.top, "top", DEFAULT_DEFINITIONS_TOP)?,
            continuation_token: self.continuation_token.clone(),
            definition_ids: self.definition_ids.clone(),
            path: self.path.clone(),
            built_after: McpValidation::parse_timestamp(self.built_after.as_deref(), "builtAfter")?,
            not_built_after: McpValidation::parse_timestamp(
                self.not_built_after.as_deref(),
                "notBuiltAfter",
            )?,
            include_latest_builds: self.include_latest_builds,
            yaml_filename: self.yaml_filename.clone(),
        })
    }
}

/// Tool for listing build definitions
#[derive(Default)]
pub struct GetBuildDefinitionsTool;

impl GetBuildDefinitionsTool {
    /// Creates a new instance of the GetBuildDefinitionsTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for GetBuildDefinitionsTool {
    fn name(&self) -> &'static str {
        "pipelines_get_build_definitions"
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
                "name": { "type": "string", "description": "Name filter, wildcards allowed" },
                "repositoryId": { "type": "string" },
                "repositoryType": { "type": "string", "description": "e.g. TfsGit, GitHub" },
                "queryOrder": schema_for::<DefinitionQueryOrder>("Sort order"),
                "top": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Maximum number of definitions (default 50)"
                },
                "continuationToken": { "type": "string" },
                "definitionIds": { "type": "array", "items": { "type": "integer" } },
                "path": { "type": "string", "description": "Folder path" },
                "builtAfter": { "type": "string", "description": "RFC 3339 timestamp or YYYY-MM-DD" },
                "notBuiltAfter": { "type": "string", "description": "RFC 3339 timestamp or YYYY-MM-DD" },
                "includeLatestBuilds": { "type": "boolean" },
                "yamlFilename": { "type": "string" }
            },
            "required": ["organization", "project"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let request: GetBuildDefinitionsRequest = BaseToolImpl::parse_arguments(arguments)?;
        Ok(BaseToolImpl::respond(
            self.name(),
            get_build_definitions(request, context).await,
        ))
    }
}

async fn get_build_definitions(
    request: GetBuildDefinitionsRequest,
    context: &ToolContext,
) -> Result<Value> {
    let query = request.query()?;
    let session = context.sessions.get_session(&request.organization).await?;
    tracing::debug!("Listing build definitions in {} with {:?}", request.project, query);
    let definitions = session.api().get_definitions(&request.project, &query).await?;
    Ok(shaping::BUILD_DEFINITION.apply_all(&definitions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::responses::{response_json, response_text};
    use crate::test_utils::{arguments, mock_tool_context, MockDevOpsApi};
    use serde_json::json;

    #[tokio::test]
    async fn test_default_page_size_is_fifty() {
        let api = MockDevOpsApi::new().with_records(vec![json!({
            "id": 12,
            "name": "web-ci",
            "path": "\\",
            "revision": 4,
            "queueStatus": "enabled",
            "project": { "id": "p1", "name": "Fabrikam", "state": "wellFormed" },
            "authoredBy": { "displayName": "Sam" }
        })]);
        let (context, connector) = mock_tool_context(&["contoso"], api);

        let result = GetBuildDefinitionsTool::new()
            .execute(
                arguments(json!({ "organization": "contoso", "project": "Fabrikam" })),
                &context,
            )
            .await
            .unwrap();

        assert_eq!(
            response_json(&result),
            Some(json!([{
                "id": 12,
                "name": "web-ci",
                "path": "\\",
                "revision": 4,
                "queueStatus": "enabled",
                "project": { "id": "p1", "name": "Fabrikam" }
            }]))
        );
        assert_eq!(connector.api().last_definition_query().unwrap().top, 50);
    }

    #[tokio::test]
    async fn test_filters_are_normalized() {
        let (context, connector) = mock_tool_context(&["contoso"], MockDevOpsApi::new());

        GetBuildDefinitionsTool::new()
            .execute(
                arguments(json!({
                    "organization": "contoso",
                    "project": "Fabrikam",
                    "queryOrder": "DefinitionNameAscending",
                    "definitionIds": [3, 5],
                    "builtAfter": "2024-05-01",
                    "top": 10
                })),
                &context,
            )
            .await
            .unwrap();

        let query = connector.api().last_definition_query().unwrap();
        assert_eq!(query.query_order, Some(DefinitionQueryOrder::DefinitionNameAscending));
        assert_eq!(query.definition_ids, vec![3, 5]);
        assert_eq!(query.top, 10);
        assert_eq!(
            query.built_after.map(|t| t.to_rfc3339()),
            Some("2024-05-01T00:00:00+00:00".to_string())
        );
        assert_eq!(query.not_built_after, None);
    }

    #[tokio::test]
    async fn test_bad_timestamp_fails_before_connecting() {
        let (context, connector) = mock_tool_context(&["contoso"], MockDevOpsApi::new());

        let result = GetBuildDefinitionsTool::new()
            .execute(
                arguments(json!({
                    "organization": "contoso",
                    "project": "Fabrikam",
                    "notBuiltAfter": "yesterday"
                })),
                &context,
            )
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(true));
        assert!(response_text(&result).contains("notBuiltAfter"));
        assert_eq!(connector.connect_count(), 0);
    }
}
