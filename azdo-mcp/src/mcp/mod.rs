//! Model Context Protocol (MCP) server support
//!
//! Exposes Azure DevOps organizations, Git repositories and pipelines as MCP
//! tools over stdio.

pub mod constants;
pub mod responses;
pub mod server;
pub mod shaping;
pub mod shared_utils;
pub mod tool_registry;
pub mod tools;

pub use server::McpServer;
pub use tool_registry::{
    default_registry, register_git_tools, register_organization_tools, register_pipeline_tools,
    McpTool, ToolContext, ToolRegistry,
};
