//! Unified error handling for the azdo-mcp library
//!
//! Every failure a tool call can hit is one of these variants. Nothing here is
//! retried or swallowed; the MCP layer turns each variant into an error
//! response the caller can read.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the azdo-mcp library
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AzdoError {
    /// The credential file is missing or is not a flat string-to-string object
    #[error("Configuration error in {path}: {reason}")]
    Config {
        /// Location of the credential file
        path: PathBuf,
        /// What was wrong with it
        reason: String,
    },

    /// No credential entry exists for the requested organization
    #[error("No PAT found for organization: {0}")]
    UnknownTenant(String),

    /// A tool argument failed its declared shape or a cross-field constraint
    #[error("Invalid value for '{field}': {reason}")]
    Validation {
        /// Name of the offending argument
        field: String,
        /// Why it was rejected
        reason: String,
    },

    /// A declared tool that deliberately never calls the service
    #[error("Operation '{operation}' is not implemented: {reason}")]
    Unimplemented {
        /// Tool name
        operation: String,
        /// Fixed explanation returned to the caller
        reason: String,
    },

    /// The service answered with a non-success status
    #[error("Azure DevOps request failed with status {status}: {message}")]
    Upstream {
        /// HTTP status code returned by the service
        status: u16,
        /// Message extracted from the service's response body
        message: String,
    },

    /// Transport-level HTTP failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl AzdoError {
    /// Build a validation error for `field`
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// True when the service rejected the credential rather than the request
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, Self::Upstream { status, .. } if matches!(status, 203 | 401 | 403))
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, AzdoError>;
