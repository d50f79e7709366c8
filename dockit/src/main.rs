use clap::Parser;
use dockit::cli::{run, Cli};
use std::process::ExitCode;
use tokio::signal;
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

fn exit_code(joined: Result<anyhow::Result<()>, JoinError>) -> ExitCode {
    match joined {
        Ok(Ok(())) => {
            tracing::info!("CLI completed successfully");
            ExitCode::SUCCESS
        }
        Ok(Err(e)) => {
            tracing::error!(error = %e, "CLI exited with error");
            eprintln!("❌ Error: {e:#}");
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::error!(error = %e, "Session task panicked");
            eprintln!("❌ Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
    tracing::info!("CLI application startup: tracing initialised, environment loaded");

    let cli = Cli::parse();
    let cancel = CancellationToken::new();
    let mut session = tokio::spawn(run(cli, cancel.clone()));

    tokio::select! {
        joined = &mut session => exit_code(joined),
        _ = signal::ctrl_c() => {
            // Let the session abort its open upload and stop before the next file.
            tracing::warn!("Interrupted, stopping after the current step");
            cancel.cancel();
            tokio::select! {
                joined = &mut session => exit_code(joined),
                _ = signal::ctrl_c() => {
                    tracing::warn!("Interrupted again, exiting immediately");
                    println!("\nCancelled.");
                    std::process::exit(0);
                }
            }
        }
    }
}
