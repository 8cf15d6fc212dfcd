//! azdo-mcp CLI Library
//!
//! Argument parsing, logging setup and exit codes for the `azdo-mcp` binary,
//! exposed as a library so integration tests can reach them.

/// Command-line interface definitions and argument parsing
pub mod cli;
/// CLI error type carrying an exit code
pub mod error;
/// Exit codes used by the CLI application
pub mod exit_codes;
/// Log sink selection for serve and interactive modes
pub mod logging;
