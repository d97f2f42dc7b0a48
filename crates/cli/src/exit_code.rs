//! Exit code definitions for the s3-syncer CLI

use syncer_core::Error;

/// Exit codes for the s3-syncer CLI.
///
/// These codes follow a consistent convention to allow scripts and automation
/// to handle different error scenarios appropriately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Operation completed successfully
    Success = 0,

    /// General error, including a batch that completed with failures
    GeneralError = 1,

    /// User input error: invalid arguments, malformed locator, etc.
    UsageError = 2,

    /// Network, TLS, or auth failure
    NetworkError = 3,

    /// No files or keys matched when a match was required
    NotFound = 5,

    /// Operation was interrupted (e.g., Ctrl+C)
    Interrupted = 130,
}

impl ExitCode {
    /// Convert exit code to i32 for use with std::process::exit
    #[inline]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Map a core error to its exit code
    pub fn from_error(err: &Error) -> Self {
        match err.exit_code() {
            2 => Self::UsageError,
            3 => Self::NetworkError,
            5 => Self::NotFound,
            _ => Self::GeneralError,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.as_i32()
    }
}
