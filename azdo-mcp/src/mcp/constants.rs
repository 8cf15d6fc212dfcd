//! Constants for MCP server configuration

/// Name reported in the MCP `initialize` handshake
pub const SERVER_NAME: &str = "azdo-mcp";

/// Page size for build definition listings when `top` is omitted
pub const DEFAULT_DEFINITIONS_TOP: u32 = 50;
/// Page size for build listings when `top` is omitted
pub const DEFAULT_BUILDS_TOP: u32 = 20;
/// Page size for pull request listings when `top` is omitted
pub const DEFAULT_PULL_REQUESTS_TOP: u32 = 20;
/// Page size for build change listings when `top` is omitted
pub const DEFAULT_CHANGES_TOP: u32 = 20;
/// Number of pipeline runs kept when `top` is omitted
pub const DEFAULT_RUNS_TOP: u32 = 20;

/// Reason returned by the stage update tool
pub const STAGE_UPDATE_UNSUPPORTED: &str =
    "updating build stages is not supported by this server; use the Azure DevOps web UI";
