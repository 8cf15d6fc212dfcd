//! Shared utilities for MCP operations
//!
//! Error-to-response mapping and the argument checks every tool runs before
//! it touches a session.

use super::tool_registry::BaseToolImpl;
use crate::error::{AzdoError, Result};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rmcp::model::CallToolResult;

/// Common error handling patterns for MCP operations
pub struct McpErrorHandler;

impl McpErrorHandler {
    /// Convert an [`AzdoError`] into an error response
    ///
    /// The text is always `Error: <display>`. Caller mistakes are logged at
    /// `warn`, service and transport failures at `error`.
    pub fn to_tool_error(error: AzdoError, operation: &str) -> CallToolResult {
        match &error {
            AzdoError::Validation { .. }
            | AzdoError::UnknownTenant(_)
            | AzdoError::Unimplemented { .. } => {
                tracing::warn!("Tool '{}' rejected: {}", operation, error);
            }
            _ if error.is_authentication_failure() => {
                tracing::error!(
                    "Tool '{}' failed authentication; check the PAT for this organization: {}",
                    operation,
                    error
                );
            }
            _ => {
                tracing::error!("Tool '{}' failed: {}", operation, error);
            }
        }
        BaseToolImpl::create_error_response(format!("Error: {error}"), None)
    }
}

/// Validation utilities for MCP requests
pub struct McpValidation;

impl McpValidation {
    /// Validate string is not empty
    pub fn validate_not_empty(value: &str, field: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(AzdoError::validation(field, "cannot be empty"));
        }
        Ok(())
    }

    /// Resolve an optional page size, rejecting zero
    pub fn page_size(top: Option<u32>, field: &str, default: u32) -> Result<u32> {
        match top {
            None => Ok(default),
            Some(0) => Err(AzdoError::validation(field, "must be at least 1")),
            Some(top) => Ok(top),
        }
    }

    /// Parse an optional timestamp argument
    ///
    /// Accepts RFC 3339 (`2024-05-01T12:00:00Z`) or a bare date, which is read
    /// as midnight UTC.
    pub fn parse_timestamp(value: Option<&str>, field: &str) -> Result<Option<DateTime<Utc>>> {
        let Some(text) = value else {
            return Ok(None);
        };
        let text = text.trim();

        if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
            return Ok(Some(parsed.with_timezone(&Utc)));
        }

        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|midnight| Some(Utc.from_utc_datetime(&midnight)))
            .ok_or_else(|| {
                AzdoError::validation(
                    field,
                    format!("'{text}' is not an RFC 3339 timestamp or YYYY-MM-DD date"),
                )
            })
    }
}
