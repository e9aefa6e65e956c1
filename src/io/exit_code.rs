//! Exit codes for the CLI, following Unix conventions.
//!
//! - `0`: success, including the case where nothing matched
//! - `1`: unspecified failure
//! - `2`: malformed invocation or invalid pattern; usage is printed

use crate::error::DocError;

/// Standard exit codes for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Lookup ran to completion (code 0)
    Success = 0,

    /// Unspecified error occurred (code 1)
    GeneralError = 1,

    /// Invocation was rejected before scanning (code 2)
    UsageError = 2,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl ExitCode {
    /// Convert a `DocError` to the appropriate exit code.
    pub fn from_error(error: &DocError) -> Self {
        match error {
            DocError::Usage { .. }
            | DocError::InvalidPattern { .. }
            | DocError::PackageWithSlash { .. } => ExitCode::UsageError,
            _ => ExitCode::GeneralError,
        }
    }
}
