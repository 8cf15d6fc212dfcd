//! Tool queueing or previewing a pipeline run

use crate::client::{RunPipelineParameters, Variable};
use crate::error::{AzdoError, Result};
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use crate::mcp::tools::{organization_property, project_property};
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Request to run a pipeline
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunPipelineRequest {
    /// Organization name
    pub organization: String,
    /// Project name or ID
    pub project: String,
    /// Pipeline ID
    pub pipeline_id: i64,
    /// Pipeline revision
    pub pipeline_version: Option<i64>,
    /// Preview only
    pub preview_run: Option<bool>,
    /// Stages to skip
    #[serde(default)]
    pub stages_to_skip: Vec<String>,
    /// Runtime parameters
    #[serde(default)]
    pub template_parameters: BTreeMap<String, String>,
    /// Variables
    #[serde(default)]
    pub variables: BTreeMap<String, Variable>,
    /// Replacement YAML
    pub yaml_override: Option<String>,
    /// Resources
    pub resources: Option<serde_json::Map<String, Value>>,
}

impl RunPipelineRequest {
    fn parameters(&self) -> Result<RunPipelineParameters> {
        if self.yaml_override.is_some() && self.preview_run != Some(true) {
            return Err(AzdoError::validation(
                "yamlOverride",
                "a YAML override can only be used when previewRun is true",
            ));
        }

        Ok(RunPipelineParameters {
            preview_run: self.preview_run,
            stages_to_skip: self.stages_to_skip.clone(),
            template_parameters: self.template_parameters.clone(),
            variables: self.variables.clone(),
            yaml_override: self.yaml_override.clone(),
            resources: self.resources.clone().map(Value::Object),
        })
    }
}

/// Tool for running pipelines
#[derive(Default)]
pub struct RunPipelineTool;

impl RunPipelineTool {
    /// Creates a new instance of the RunPipelineTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for RunPipelineTool {
    fn name(&self) -> &'static str {
        "pipelines_run_pipeline"
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
                "pipelineId": { "type": "integer", "description": "Pipeline ID" },
                "pipelineVersion": { "type": "integer", "description": "Pipeline revision to run" },
                "previewRun": {
                    "type": "boolean",
                    "description": "Return the final YAML without starting a run"
                },
                "stagesToSkip": { "type": "array", "items": { "type": "string" } },
                "templateParameters": {
                    "type": "object",
                    "additionalProperties": { "type": "string" }
                },
                "variables": {
                    "type": "object",
                    "additionalProperties": {
                        "type": "object",
                        "properties": {
                            "value": { "type": "string" },
                            "isSecret": { "type": "boolean" }
                        },
                        "required": ["value"]
                    }
                },
                "yamlOverride": {
                    "type": "string",
                    "description": "Replacement YAML; requires previewRun to be true"
                },
                "resources": {
                    "type": "object",
                    "description": "Repository and pipeline resources"
                }
            },
            "required": ["organization", "project", "pipelineId"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let request: RunPipelineRequest = BaseToolImpl::parse_arguments(arguments)?;
        Ok(BaseToolImpl::respond(
            self.name(),
            run_pipeline(request, context).await,
        ))
    }
}

async fn run_pipeline(request: RunPipelineRequest, context: &ToolContext) -> Result<Value> {
    let parameters = request.parameters()?;
    let session = context.sessions.get_session(&request.organization).await?;
    let run = session
        .api()
        .run_pipeline(
            &request.project,
            request.pipeline_id,
            request.pipeline_version,
            &parameters,
        )
        .await?;
    tracing::info!(
        "{} pipeline {} in {}/{}: run {}",
        if parameters.preview_run == Some(true) {
            "Previewed"
        } else {
            "Queued"
        },
        request.pipeline_id,
        request.organization,
        request.project,
        run["id"]
    );
    Ok(run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::responses::{response_json, response_text};
    use crate::test_utils::{arguments, mock_tool_context, MockDevOpsApi};
    use serde_json::json;

    #[tokio::test]
    async fn test_yaml_override_without_preview_is_rejected() {
        let (context, connector) = mock_tool_context(&["contoso"], MockDevOpsApi::new());

        for preview in [json!(null), json!(false)] {
            let mut args = json!({
                "organization": "contoso",
                "project": "Fabrikam",
                "pipelineId": 12,
                "yamlOverride": "steps:\n- script: echo hi"
            });
            if !preview.is_null() {
                args["previewRun"] = preview;
            }

            let result = RunPipelineTool::new()
                .execute(arguments(args), &context)
                .await
                .unwrap();

            assert_eq!(result.is_error, Some(true));
            assert!(response_text(&result).contains("yamlOverride"));
        }

        assert_eq!(connector.connect_count(), 0);
        assert!(connector.api().calls().is_empty());
    }

    #[tokio::test]
    async fn test_preview_with_yaml_override_is_sent() {
        let preview = json!({ "id": -1, "finalYaml": "steps:\n- script: echo hi\n" });
        let (context, connector) =
            mock_tool_context(&["contoso"], MockDevOpsApi::new().with_record(preview.clone()));

        let result = RunPipelineTool::new()
            .execute(
                arguments(json!({
                    "organization": "contoso",
                    "project": "Fabrikam",
                    "pipelineId": 12,
                    "previewRun": true,
                    "yamlOverride": "steps:\n- script: echo hi"
                })),
                &context,
            )
            .await
            .unwrap();

        assert_eq!(response_json(&result), Some(preview));
        let (version, parameters) = connector.api().last_run_parameters().unwrap();
        assert_eq!(version, None);
        assert_eq!(parameters.preview_run, Some(true));
        assert!(parameters.yaml_override.is_some());
    }

    #[tokio::test]
    async fn test_run_parameters_are_forwarded() {
        let (context, connector) = mock_tool_context(
            &["contoso"],
            MockDevOpsApi::new().with_record(json!({ "id": 1202, "state": "inProgress" })),
        );

        let result = RunPipelineTool::new()
            .execute(
                arguments(json!({
                    "organization": "contoso",
                    "project": "Fabrikam",
                    "pipelineId": 12,
                    "pipelineVersion": 4,
                    "stagesToSkip": ["Deploy"],
                    "templateParameters": { "environment": "staging" },
                    "variables": { "verbose": { "value": "true" } },
                    "resources": { "repositories": { "self": { "refName": "refs/heads/release" } } }
                })),
                &context,
            )
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(false));
        let (version, parameters) = connector.api().last_run_parameters().unwrap();
        assert_eq!(version, Some(4));
        assert_eq!(parameters.stages_to_skip, vec!["Deploy"]);
        assert_eq!(parameters.template_parameters["environment"], "staging");
        assert_eq!(
            parameters.variables["verbose"],
            Variable { value: "true".to_string(), is_secret: None }
        );
        assert_eq!(
            parameters.resources,
            Some(json!({ "repositories": { "self": { "refName": "refs/heads/release" } } }))
        );
    }
}
