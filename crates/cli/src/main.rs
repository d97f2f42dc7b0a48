//! s3-syncer - S3 transfer CLI
//!
//! Moves objects between the local filesystem and S3-compatible object
//! storage, or between two S3-compatible stores. Local sources expand with
//! unix-like glob patterns; S3 sources are selected by key prefix.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod args;
mod exit_code;
mod output;
mod run;
mod transfer;

use args::Cli;

#[tokio::main]
async fn main() {
    // Initialize tracing subscriber for logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let exit_code = run::execute(cli).await;

    std::process::exit(exit_code.as_i32());
}
