//! Exit code constants for CLI commands
//!
//! - 0: Success
//! - 1: General failure, such as the server failing to start or its
//!   transport breaking
//! - 2: The credential file is missing or malformed
//!
//! The names follow the 0/1/2 success/warning/error convention; nothing this
//! binary does ends in a mere warning, so code 1 always means failure.

/// Successful execution
pub const EXIT_SUCCESS: i32 = 0;

/// General failure: server startup, transport or output errors
pub const EXIT_WARNING: i32 = 1;

/// Configuration errors found by `check`
pub const EXIT_ERROR: i32 = 2;
