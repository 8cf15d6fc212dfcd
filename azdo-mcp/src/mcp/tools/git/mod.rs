//! Git repository and pull request tools
//!
//! - **git_list_repositories**: repositories in a project
//! - **git_get_pull_requests** / **git_get_pull_request**: search or fetch pull requests
//! - **git_create_pull_request**: open a pull request
//! - **git_get_item**: read a file or folder at a version

pub mod create_pull_request;
pub mod get_item;
pub mod get_pull_request;
pub mod get_pull_requests;
pub mod list_repositories;

use crate::mcp::tool_registry::ToolRegistry;

/// Register all Git-related tools with the registry
pub fn register_git_tools(registry: &mut ToolRegistry) {
    registry.register(list_repositories::ListRepositoriesTool::new());
    registry.register(get_pull_requests::GetPullRequestsTool::new());
    registry.register(get_pull_request::GetPullRequestTool::new());
    registry.register(create_pull_request::CreatePullRequestTool::new());
    registry.register(get_item::GetItemTool::new());
}
