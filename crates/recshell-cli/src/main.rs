//! CLI entry point - the composition root.
//!
//! Collects credentials, starts the worker, and relays its output until it
//! exits or the user presses Ctrl-C. Credentials are removed in both cases.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use console::style;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use recshell_cli::utils::collect_credentials;
use recshell_cli::{Cli, CliError, ShellConfig, TerminalSink, bootstrap};
use recshell_runtime::WorkerEvent;

/// Slack on top of the shutdown grace for the supervisor to reap and drain.
const DRAIN_SLACK: Duration = Duration::from_secs(3);

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before clap reads them
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        eprintln!("{} {err:#}", style("error:").red().bold());
        let code = err.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
        std::process::exit(code);
    }
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ShellConfig::from_cli(&cli)?;
    let creds = collect_credentials(
        cli.account_id.clone(),
        cli.client_id.clone(),
        cli.client_secret.clone(),
    )
    .context("Failed to collect credentials")?;

    let sink = Arc::new(TerminalSink::new());
    let mut shell = bootstrap(&config, sink.clone());

    if let Err(e) = shell.on_credentials_submitted(creds) {
        shell.on_app_exit();
        return Err(CliError::from(e).into());
    }

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut signals = true;

    loop {
        tokio::select! {
            event = shell.pump() => match event {
                Some(WorkerEvent::Exited { code, .. }) => {
                    info!(?code, "Worker finished");
                    break;
                }
                Some(_) => {}
                None => break,
            },
            result = &mut ctrl_c, if signals => {
                match result {
                    Ok(()) => {
                        info!("Interrupted; shutting down");
                        break;
                    }
                    Err(e) => {
                        warn!(error = %e, "Cannot listen for Ctrl-C");
                        signals = false;
                    }
                }
            }
        }
    }

    let limit = config.settings.shutdown_grace() + DRAIN_SLACK;
    if !shell.shutdown(limit).await {
        warn!("Worker did not exit in time; it is killed on exit");
    }
    sink.finish();
    Ok(())
}
