//! Organization-level tools
//!
//! - **list_organizations**: organizations with a configured PAT
//! - **list_projects**: projects inside one organization

pub mod list_organizations;
pub mod list_projects;

use crate::mcp::tool_registry::ToolRegistry;

/// Register all organization-related tools with the registry
pub fn register_organization_tools(registry: &mut ToolRegistry) {
    registry.register(list_organizations::ListOrganizationsTool::new());
    registry.register(list_projects::ListProjectsTool::new());
}
