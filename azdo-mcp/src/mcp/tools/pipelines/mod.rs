//! Build and pipeline tools
//!
//! ## Build definitions
//! - **pipelines_get_build_definitions**: list definitions
//! - **pipelines_get_build_definition_revisions**: revision history of one definition
//!
//! ## Builds
//! - **pipelines_get_builds**: list builds
//! - **pipelines_get_build_status**: status of one build
//! - **pipelines_get_build_log** / **pipelines_get_build_log_by_id**: log metadata and log lines
//! - **pipelines_get_build_changes**: commits that went into a build
//! - **pipelines_update_build_stage**: declared but not supported
//!
//! ## Pipeline runs
//! - **pipelines_list_runs** / **pipelines_get_run**: run history
//! - **pipelines_run_pipeline**: queue or preview a run

pub mod get_build_changes;
pub mod get_build_definition_revisions;
pub mod get_build_definitions;
pub mod get_build_log;
pub mod get_build_log_by_id;
pub mod get_build_status;
pub mod get_builds;
pub mod get_run;
pub mod list_runs;
pub mod run_pipeline;
pub mod update_build_stage;

use crate::mcp::tool_registry::ToolRegistry;

/// Register all pipeline-related tools with the registry
pub fn register_pipeline_tools(registry: &mut ToolRegistry) {
    registry.register(get_build_definitions::GetBuildDefinitionsTool::new());
    registry.register(get_build_definition_revisions::GetBuildDefinitionRevisionsTool::new());
    registry.register(get_builds::GetBuildsTool::new());
    registry.register(get_build_log::GetBuildLogTool::new());
    registry.register(get_build_log_by_id::GetBuildLogByIdTool::new());
    registry.register(get_build_changes::GetBuildChangesTool::new());
    registry.register(get_run::GetRunTool::new());
    registry.register(list_runs::ListRunsTool::new());
    registry.register(run_pipeline::RunPipelineTool::new());
    registry.register(get_build_status::GetBuildStatusTool::new());
    registry.register(update_build_stage::UpdateBuildStageTool::new());
}
