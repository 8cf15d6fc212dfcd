//! Error handling for the azdo-mcp CLI
//!
//! Library errors keep their source chain; the CLI only adds the exit code
//! the process should end with.

use crate::exit_codes::{EXIT_ERROR, EXIT_SUCCESS, EXIT_WARNING};
use std::error::Error;
use std::fmt;

/// CLI-specific result type that preserves error information
pub type CliResult<T> = Result<T, CliError>;

/// CLI error type that includes both error information and suggested exit code
#[derive(Debug)]
pub struct CliError {
    /// Top-level message printed to stderr
    pub message: String,
    /// Process exit code
    pub exit_code: i32,
    /// Underlying error, if any
    pub source: Option<Box<dyn Error + Send + Sync>>,
}

impl CliError {
    /// Create a new CLI error with a message and exit code
    pub fn new(message: impl Into<String>, exit_code: i32) -> Self {
        Self {
            message: message.into(),
            exit_code,
            source: None,
        }
    }

    /// Create a CLI error from another error with a specific exit code
    pub fn from_error<E: Error + Send + Sync + 'static>(error: E, exit_code: i32) -> Self {
        Self {
            message: error.to_string(),
            exit_code,
            source: Some(Box::new(error)),
        }
    }

    /// A server startup or transport failure
    pub fn server<E: Error + Send + Sync + 'static>(error: E) -> Self {
        Self::from_error(error, EXIT_WARNING)
    }

    /// A configuration problem
    pub fn config<E: Error + Send + Sync + 'static>(error: E) -> Self {
        Self::from_error(error, EXIT_ERROR)
    }

    /// Get the full error chain as a formatted string
    pub fn full_chain(&self) -> String {
        let mut result = self.message.clone();

        let mut current_source = self.source().and_then(Error::source);
        while let Some(err) = current_source {
            result.push_str(&format!("\n  Caused by: {err}"));
            current_source = err.source();
        }

        result
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}

impl From<anyhow::Error> for CliError {
    fn from(error: anyhow::Error) -> Self {
        Self::new(format!("{error:#}"), EXIT_WARNING)
    }
}

/// Extension trait for converting results to CLI results
pub trait IntoCliResult<T> {
    /// Attach an explicit exit code
    fn cli_error(self, exit_code: i32) -> CliResult<T>;
    /// Treat the failure as a configuration error
    fn cli_config_error(self) -> CliResult<T>;
}

impl<T, E: Error + Send + Sync + 'static> IntoCliResult<T> for Result<T, E> {
    fn cli_error(self, exit_code: i32) -> CliResult<T> {
        self.map_err(|e| CliError::from_error(e, exit_code))
    }

    fn cli_config_error(self) -> CliResult<T> {
        self.map_err(CliError::config)
    }
}

/// Convert a CliResult to an exit code, printing the full error chain if needed
pub fn handle_cli_result<T>(result: CliResult<T>) -> i32 {
    match result {
        Ok(_) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e.full_chain());
            e.exit_code
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use azdo_mcp::AzdoError;
    use std::path::PathBuf;

    fn config_error() -> AzdoError {
        AzdoError::Config {
            path: PathBuf::from("/tmp/config.json"),
            reason: "credential file not found".to_string(),
        }
    }

    #[test]
    fn test_config_errors_exit_with_error_code() {
        let result: Result<(), AzdoError> = Err(config_error());
        let err = result.cli_config_error().unwrap_err();

        assert_eq!(err.exit_code, EXIT_ERROR);
        assert_eq!(
            err.to_string(),
            "Configuration error in /tmp/config.json: credential file not found"
        );
    }

    #[test]
    fn test_handle_cli_result_codes() {
        assert_eq!(handle_cli_result::<()>(Ok(())), EXIT_SUCCESS);
        assert_eq!(
            handle_cli_result::<()>(Err(CliError::new("boom", EXIT_WARNING))),
            EXIT_WARNING
        );
    }

    #[test]
    fn test_full_chain_follows_sources() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = CliError::server(AzdoError::from(io));

        assert_eq!(err.full_chain(), "IO error: denied\n  Caused by: denied");
    }

    #[test]
    fn test_server_failures_use_general_failure_code() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "stdout closed");
        let err = CliError::server(io);

        assert_eq!(err.exit_code, 1);
        assert_ne!(err.exit_code, EXIT_SUCCESS);
        assert_eq!(handle_cli_result::<()>(Err(err)), EXIT_WARNING);
    }

    #[test]
    fn test_anyhow_errors_keep_context() {
        let err: CliError = anyhow::anyhow!("transport closed")
            .context("MCP server error")
            .into();

        assert_eq!(err.exit_code, EXIT_WARNING);
        assert_eq!(err.message, "MCP server error: transport closed");
    }
}
