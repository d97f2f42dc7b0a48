//! s3-syncer CLI library
//!
//! This module exports the CLI components for use in integration tests.

pub mod args;
pub mod exit_code;
pub mod output;
pub mod run;
pub mod transfer;
