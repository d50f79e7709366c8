///
/// This module implements the CLI interface for dockit: command parsing, dispatch to the
/// upload sessions, and the mapping from outcomes to user-visible messages.
///
/// Naming, tagging and upload logic lives in [`dockit-core`]; this module is glue.
///
/// ## How To Use
/// - From a shell: `dockit` (interactive), `dockit upload [-d] [-y] [PATTERNS...]`, `dockit config`.
/// - Programmatically: build a [`Cli`] and call [`run`] with a cancellation token. Cancelling
///   the token stops the session before the next file and aborts the upload in flight.
///
/// [`dockit-core`]: ../../dockit_core/
use crate::load_config::{default_config_path, load_config, write_default_config, WriteOutcome};
use crate::prompt::{PromptError, TerminalPrompter};
use crate::s3::S3Store;
use crate::session::{
    run_inference, run_interactive, InferenceOptions, SessionContext, SessionReport,
};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

/// CLI for dockit: rename scanned documents and upload them to S3.
#[derive(Parser, Debug)]
#[clap(
    name = "dockit",
    version,
    about = "Rename scanned documents and upload them to S3 under predictable keys"
)]
pub struct Cli {
    /// Path to the JSON config file (default: ~/.dockitrc.json)
    #[clap(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Without a subcommand, runs the interactive session
    #[clap(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload files, taking date and title from each file name
    Upload {
        /// Preview keys without uploading
        #[clap(long, short = 'd')]
        dry_run: bool,
        /// Accept all defaults without prompting
        #[clap(long, short = 'y')]
        yes: bool,
        /// Files or glob patterns (prompted for when omitted)
        patterns: Vec<String>,
    },
    /// Write a default config file if none exists
    Config,
}

/// True when `error` stems from the user aborting a prompt.
pub fn is_cancelled(error: &anyhow::Error) -> bool {
    matches!(error.downcast_ref::<PromptError>(), Some(PromptError::Cancelled))
}

fn finish(command: &str, report: SessionReport) {
    if report.interrupted {
        tracing::info!(command, ?report, "Session interrupted");
        println!("Cancelled.");
    } else {
        tracing::info!(command, ?report, "Session complete");
    }
}

/// Async CLI entrypoint shared by `main` and integration tests.
pub async fn run(cli: Cli, cancel: CancellationToken) -> Result<()> {
    tracing::info!(command = ?cli.command, config = ?cli.config, "Dispatching dockit command");

    let result = match cli.command {
        Some(Commands::Config) => {
            let path = cli.config.unwrap_or_else(default_config_path);
            match write_default_config(&path)? {
                WriteOutcome::Created(path) => {
                    println!("Created default config file at {}", path.display())
                }
                WriteOutcome::AlreadyExists(path) => {
                    println!("Config file already exists at {}", path.display())
                }
            }
            Ok(())
        }
        Some(Commands::Upload {
            dry_run,
            yes,
            patterns,
        }) => {
            let config = load_config(cli.config.as_deref());
            let store = S3Store::from_config(&config).await;
            let ctx = SessionContext::new(&config, &store).with_cancellation(cancel);
            let options = InferenceOptions {
                patterns,
                dry_run,
                assume_yes: yes,
            };
            let mut prompter = TerminalPrompter::default();
            run_inference(&ctx, &mut prompter, &options)
                .await
                .map(|report| finish("upload", report))
        }
        None => {
            let config = load_config(cli.config.as_deref());
            let store = S3Store::from_config(&config).await;
            let ctx = SessionContext::new(&config, &store).with_cancellation(cancel);
            let mut prompter = TerminalPrompter::default();
            run_interactive(&ctx, &mut prompter)
                .await
                .map(|report| finish("interactive", report))
        }
    };

    match result {
        Err(e) if is_cancelled(&e) => {
            tracing::info!("Session cancelled by user");
            println!("Cancelled.");
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "Session failed");
            Err(e)
        }
        ok => ok,
    }
}
