//! Tool listing builds

use crate::client::BuildQuery;
use crate::enums::{
    schema_for, BuildQueryOrder, BuildReason, BuildResult, BuildStatus, QueryDeletedOption,
};
use crate::error::Result;
use crate::mcp::constants::DEFAULT_BUILDS_TOP;
use crate::mcp::shaping;
use crate::mcp::shared_utils::McpValidation;
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use crate::mcp::tools::{enum_argument, organization_property, project_property};
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;
use serde::Deserialize;
use serde_json::Value;

/// Request to list builds
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetBuildsRequest {
    /// Organization name
    pub organization: String,
    /// Project name or ID
    pub project: String,
    /// Definition IDs
    #[serde(default)]
    pub definitions: Vec<i64>,
    /// Build number filter
    pub build_number: Option<String>,
    /// Earliest finish time
    pub min_time: Option<String>,
    /// Latest finish time
    pub max_time: Option<String>,
    /// Requested-for identity
    pub requested_for: Option<String>,
    /// Reason label
    pub reason_filter: Option<String>,
    /// Status label
    pub status_filter: Option<String>,
    /// Result label
    pub result_filter: Option<String>,
    /// Required tags
    #[serde(default)]
    pub tag_filters: Vec<String>,
    /// Page size
    pub top: Option<u32>,
    /// Continuation token
    pub continuation_token: Option<String>,
    /// Cap per definition
    pub max_builds_per_definition: Option<u32>,
    /// Deleted handling label
    pub deleted_filter: Option<String>,
    /// Sort order label
    pub query_order: Option<String>,
    /// Branch filter
    pub branch_name: Option<String>,
    /// Build IDs
    #[serde(default)]
    pub build_ids: Vec<i64>,
    /// Repository filter
    pub repository_id: Option<String>,
    /// Repository type
    pub repository_type: Option<String>,
}

impl GetBuildsRequest {
    fn query(&self) -> Result<BuildQuery> {
        Ok(BuildQuery {
            definitions: self.definitions.clone(),
            build_number: self.build_number.clone(),
            min_time: McpValidation::parse_timestamp(self.min_time.as_deref(), "minTime")?,
            max_time: McpValidation::parse_timestamp(self.max_time.as_deref(), "maxTime")?,
            requested_for: self.requested_for.clone(),
            reason_filter: enum_argument::<BuildReason>(
                "reasonFilter",
                self.reason_filter.as_deref(),
            )?,
            status_filter: enum_argument::<BuildStatus>(
                "statusFilter",
                self.status_filter.as_deref(),
            )?,
            result_filter: enum_argument::<BuildResult>(
                "resultFilter",
                self.result_filter.as_deref(),
            )?,
            tag_filters: self.tag_filters.clone(),
            top: McpValidation::page_size(self.top, "top", DEFAULT_BUILDS_TOP)?,
            continuation_token: self.continuation_token.clone(),
            max_builds_per_definition: self.max_builds_per_definition,
            deleted_filter: enum_argument::<QueryDeletedOption>(
                "deletedFilter",
                self.deleted_filter.as_deref(),
            )?,
            query_order: enum_argument::<BuildQueryOrder>(
                "queryOrder",
                self.query_order.as_deref(),
            )?,
            branch_name: self.branch_name.clone(),
            build_ids: self.build_ids.clone(),
            repository_id: self.repository_id.clone(),
            repository_type: self.repository_type.clone(),
        })
    }
}

/// Tool for listing builds
#[derive(Default)]
pub struct GetBuildsTool;

impl GetBuildsTool {
    /// Creates a new instance of the GetBuildsTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for GetBuildsTool {
    fn name(&self) -> &'static str {
        "pipelines_get_builds"
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
                "definitions": { "type": "array", "items": { "type": "integer" } },
                "buildNumber": { "type": "string" },
                "minTime": { "type": "string", "description": "RFC 3339 timestamp or YYYY-MM-DD" },
                "maxTime": { "type": "string", "description": "RFC 3339 timestamp or YYYY-MM-DD" },
                "requestedFor": { "type": "string" },
                "reasonFilter": schema_for::<BuildReason>("Why the build was queued"),
                "statusFilter": schema_for::<BuildStatus>("Build status"),
                "resultFilter": schema_for::<BuildResult>("Build result"),
                "tagFilters": { "type": "array", "items": { "type": "string" } },
                "top": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Maximum number of builds (default 20)"
                },
                "continuationToken": { "type": "string" },
                "maxBuildsPerDefinition": { "type": "integer", "minimum": 1 },
                "deletedFilter": schema_for::<QueryDeletedOption>("Deleted build handling"),
                "queryOrder": schema_for::<BuildQueryOrder>("Sort order"),
                "branchName": { "type": "string" },
                "buildIds": { "type": "array", "items": { "type": "integer" } },
                "repositoryId": { "type": "string" },
                "repositoryType": { "type": "string" }
            },
            "required": ["organization", "project"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let request: GetBuildsRequest = BaseToolImpl::parse_arguments(arguments)?;
        Ok(BaseToolImpl::respond(self.name(), get_builds(request, context).await))
    }
}

async fn get_builds(request: GetBuildsRequest, context: &ToolContext) -> Result<Value> {
    let query = request.query()?;
    let session = context.sessions.get_session(&request.organization).await?;
    tracing::debug!("Listing builds in {} with {:?}", request.project, query);
    let builds = session.api().get_builds(&request.project, &query).await?;
    Ok(shaping::BUILD.apply_all(&builds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::responses::{response_json, response_text};
    use crate::test_utils::{arguments, mock_tool_context, MockDevOpsApi};
    use serde_json::json;

    #[tokio::test]
    async fn test_page_size_defaults_to_twenty() {
        let (context, connector) = mock_tool_context(&["contoso"], MockDevOpsApi::new());

        GetBuildsTool::new()
            .execute(
                arguments(json!({ "organization": "contoso", "project": "Fabrikam" })),
                &context,
            )
            .await
            .unwrap();

        assert_eq!(connector.api().last_build_query().unwrap().top, 20);
    }

    #[tokio::test]
    async fn test_explicit_page_size_is_honoured() {
        let (context, connector) = mock_tool_context(&["contoso"], MockDevOpsApi::new());

        GetBuildsTool::new()
            .execute(
                arguments(json!({ "organization": "contoso", "project": "Fabrikam", "top": 5 })),
                &context,
            )
            .await
            .unwrap();

        assert_eq!(connector.api().last_build_query().unwrap().top, 5);
    }

    #[tokio::test]
    async fn test_filters_and_shape() {
        let api = MockDevOpsApi::new().with_records(vec![json!({
            "id": 901,
            "buildNumber": "20240501.3",
            "status": "completed",
            "result": "failed",
            "sourceBranch": "refs/heads/main",
            "definition": { "id": 12, "name": "web-ci", "revision": 4 },
            "requestedFor": { "displayName": "Sam Lee" },
            "logs": { "id": 0 }
        })]);
        let (context, connector) = mock_tool_context(&["contoso"], api);

        let result = GetBuildsTool::new()
            .execute(
                arguments(json!({
                    "organization": "contoso",
                    "project": "Fabrikam",
                    "definitions": [12],
                    "statusFilter": "Completed",
                    "resultFilter": "Failed",
                    "queryOrder": "FinishTimeDescending",
                    "tagFilters": ["nightly"],
                    "minTime": "2024-05-01T00:00:00Z"
                })),
                &context,
            )
            .await
            .unwrap();

        assert_eq!(
            response_json(&result),
            Some(json!([{
                "id": 901,
                "buildNumber": "20240501.3",
                "status": "completed",
                "result": "failed",
                "sourceBranch": "refs/heads/main",
                "definition": { "id": 12, "name": "web-ci" },
                "requestedFor": "Sam Lee"
            }]))
        );

        let query = connector.api().last_build_query().unwrap();
        assert_eq!(query.definitions, vec![12]);
        assert_eq!(query.status_filter, Some(BuildStatus::Completed));
        assert_eq!(query.result_filter, Some(BuildResult::Failed));
        assert_eq!(query.query_order, Some(BuildQueryOrder::FinishTimeDescending));
        assert_eq!(query.reason_filter, None);
        assert_eq!(query.tag_filters, vec!["nightly"]);
        assert!(query.min_time.is_some());
    }

    #[tokio::test]
    async fn test_undeclared_label_is_a_validation_error() {
        let (context, connector) = mock_tool_context(&["contoso"], MockDevOpsApi::new());

        let result = GetBuildsTool::new()
            .execute(
                arguments(json!({
                    "organization": "contoso",
                    "project": "Fabrikam",
                    "resultFilter": "Exploded"
                })),
                &context,
            )
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(true));
        let text = response_text(&result);
        assert!(text.contains("resultFilter"));
        assert!(text.contains("Succeeded"));
        assert_eq!(connector.connect_count(), 0);
    }

    #[tokio::test]
    async fn test_negative_top_is_rejected() {
        let (context, _) = mock_tool_context(&["contoso"], MockDevOpsApi::new());

        let err = GetBuildsTool::new()
            .execute(
                arguments(json!({ "organization": "contoso", "project": "Fabrikam", "top": -1 })),
                &context,
            )
            .await
            .unwrap_err();

        assert!(err.message.contains("Invalid arguments"));
    }
}
