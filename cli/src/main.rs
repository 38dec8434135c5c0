//! coolifyme - Entry Point
//!
//! Command-line client for the Coolify REST API.

use std::io::IsTerminal;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use coolifyme::app::options::Cli;
use coolifyme::app::run::run;
use coolifyme::app::state::AppState;
use coolifyme::config::EnvVars;
use coolifyme::logs::{init_logging, LogOptions};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match real_main(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn real_main(cli: Cli) -> anyhow::Result<()> {
    let env = EnvVars::from_process();
    let cancel = CancellationToken::new();
    let state = AppState::init(&cli.global, &env, cancel.clone())
        .await
        .context("failed to load configuration")?;

    let log_options = LogOptions {
        log_level: state.config.log_level,
        format: cli.global.log_format.unwrap_or_default(),
        ansi: state
            .config
            .color
            .unwrap_or_else(|| std::io::stderr().is_terminal()),
    };
    if let Err(e) = init_logging(log_options) {
        eprintln!("Failed to initialize logging: {e}");
    }
    debug!(profile = %state.config.profile_name, "starting");

    tokio::spawn(cancel_on_shutdown_signal(cancel));

    run(cli, state).await?;
    Ok(())
}

async fn cancel_on_shutdown_signal(cancel: CancellationToken) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let Ok(mut sigterm) = signal(SignalKind::terminate()) else {
            return;
        };

        tokio::select! {
            _ = sigterm.recv() => {
                info!("SIGTERM received, cancelling...");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl+C received, cancelling...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        info!("Ctrl+C received, cancelling...");
    }

    cancel.cancel();
}
