//! Output formatting utilities
//!
//! This module provides the stdout/stderr routing for listed, created, and
//! deleted identifiers, plus progress indication for transfer batches.

mod formatter;
mod progress;

pub use formatter::Formatter;
pub use progress::ProgressBar;

/// Output configuration derived from CLI flags
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// Suppress all output, including errors
    pub suppress: bool,
    /// Print affected identifiers to stdout instead of stderr
    pub to_stdout: bool,
}
