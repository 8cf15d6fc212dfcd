//! # azdo-mcp
//!
//! An MCP server that fronts Azure DevOps.
//!
//! ## Features
//!
//! - **Multi-organization**: one personal access token per organization, read
//!   once from a flat JSON credential file
//! - **Session cache**: one authenticated client per organization, built on
//!   first use and shared by every later call
//! - **Tools**: projects, Git repositories and pull requests, build
//!   definitions, builds, logs and pipeline runs
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use azdo_mcp::{config::ServerConfig, mcp::McpServer};
//! use rmcp::{serve_server, transport::io::stdio};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let server = McpServer::from_config(&ServerConfig::new()).await;
//! let running = serve_server(server, stdio()).await?;
//! running.waiting().await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

/// Azure DevOps REST client and the seam tests substitute
pub mod client;

/// Shared helpers
pub mod common;

/// Runtime configuration
pub mod config;

/// Personal access token store
pub mod credentials;

/// Label bridge for Azure DevOps enumerations
pub mod enums;

/// Error types
pub mod error;

/// Model Context Protocol (MCP) server support
pub mod mcp;

/// Per-organization session cache
pub mod session;

/// Test doubles shared by unit and integration tests
#[doc(hidden)]
pub mod test_utils;

pub use config::ServerConfig;
pub use credentials::CredentialStore;
pub use error::{AzdoError, Result};
pub use mcp::McpServer;
pub use session::{Session, SessionCache};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
