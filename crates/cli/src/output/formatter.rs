//! Output formatter
//!
//! Routes identifiers and human-readable summaries to the right stream:
//! identifiers go to stdout when `--to-stdout` is set, summaries and errors
//! go to stderr. `--suppress` silences everything; the exit status is then
//! the only signal.

use super::OutputConfig;

/// Formatter for CLI output
#[derive(Debug, Clone)]
pub struct Formatter {
    config: OutputConfig,
}

impl Formatter {
    /// Create a new formatter with the given configuration
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Access the underlying configuration
    pub fn config(&self) -> &OutputConfig {
        &self.config
    }

    /// Check if all output is suppressed
    pub fn is_suppressed(&self) -> bool {
        self.config.suppress
    }

    /// Emit a listed identifier: stdout with `--to-stdout`, stderr otherwise
    pub fn identifier(&self, id: &str) {
        if self.config.suppress {
            return;
        }
        if self.config.to_stdout {
            println!("{id}");
        } else {
            eprintln!("{id}");
        }
    }

    /// Emit a created or deleted identifier; only shown with `--to-stdout`
    pub fn created(&self, id: &str) {
        if self.config.suppress || !self.config.to_stdout {
            return;
        }
        println!("{id}");
    }

    /// Emit a human-readable status line to stderr
    pub fn status(&self, message: &str) {
        if self.config.suppress {
            return;
        }
        eprintln!("{message}");
    }

    /// Emit an error message to stderr, unless suppressed
    pub fn error(&self, message: &str) {
        if self.config.suppress {
            return;
        }
        eprintln!("\x1b[31m{message}\x1b[0m");
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(OutputConfig::default())
    }
}
