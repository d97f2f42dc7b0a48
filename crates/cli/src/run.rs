//! Invocation dispatch
//!
//! Builds the configuration, classifies the source/destination pair into a
//! transfer task, connects the clients the task needs, and hands off to the
//! transfer functions. Ctrl-C aborts the invocation with exit code 130.

use syncer_core::{
    parse_location, Error, Location, ObjectLocator, Result, SyncConfig, TransferMode, TransferTask,
};
use syncer_s3::S3Client;

use crate::args::Cli;
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};
use crate::transfer::{self, TransferContext};

/// Execute one invocation and map the outcome to an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let formatter = Formatter::new(OutputConfig {
        suppress: cli.suppress,
        to_stdout: cli.to_stdout,
    });

    tokio::select! {
        result = run(cli, &formatter) => match result {
            Ok(()) => ExitCode::Success,
            Err(e) => {
                formatter.error(&e.to_string());
                ExitCode::from_error(&e)
            }
        },
        _ = tokio::signal::ctrl_c() => {
            formatter.error("Interrupted");
            ExitCode::Interrupted
        }
    }
}

async fn run(cli: Cli, formatter: &Formatter) -> Result<()> {
    let config = SyncConfig::new(
        cli.access_key,
        cli.secret_key,
        cli.cert,
        cli.insecure,
        cli.no_partial_paths,
    )?;
    let source = parse_location(&cli.source_path)?;
    let destination = parse_location(&cli.destination_path)?;
    let task = TransferTask::classify(source, destination, cli.list, cli.delete)?;
    tracing::debug!(mode = %task.mode, source = %task.source, "classified invocation");

    let ctx = TransferContext {
        formatter,
        autocomplete: !config.no_partial_paths,
    };

    match (task.mode, &task.source, &task.destination) {
        (TransferMode::List, Location::Local(path), _) => {
            transfer::list_local(path, formatter)?;
        }
        (TransferMode::List, Location::Remote(src), _) => {
            let store = connect(src, &config, 0).await?;
            transfer::list_remote(&store, src, &ctx).await?;
        }
        (TransferMode::Upload, Location::Local(path), Location::Remote(dst)) => {
            let store = connect(dst, &config, 0).await?;
            transfer::upload(&store, path, dst, &ctx).await?;
        }
        (TransferMode::Download, Location::Remote(src), Location::Local(dest)) => {
            let store = connect(src, &config, 0).await?;
            transfer::download(&store, src, dest, &ctx).await?;
        }
        (TransferMode::Copy, Location::Remote(src), Location::Remote(dst)) => {
            let source_store = connect(src, &config, 0).await?;
            if src.same_endpoint(dst) {
                transfer::copy(&source_store, &source_store, src, dst, true, &ctx).await?;
            } else {
                let dest_store = connect(dst, &config, 1).await?;
                transfer::copy(&source_store, &dest_store, src, dst, false, &ctx).await?;
            }
        }
        (TransferMode::Delete, Location::Remote(src), _) => {
            let store = connect(src, &config, 0).await?;
            transfer::delete(&store, src, &ctx).await?;
        }
        (mode, source, _) => {
            return Err(Error::Format(format!(
                "Cannot {mode} from '{source}'; an S3 path has the form '{}'",
                Cli::locator_form()
            )));
        }
    }

    Ok(())
}

async fn connect(locator: &ObjectLocator, config: &SyncConfig, index: usize) -> Result<S3Client> {
    let credentials = config.endpoint(index)?;
    S3Client::connect(locator, &credentials, config.insecure).await
}
