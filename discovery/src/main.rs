// discovery/src/main.rs
//! Discovery CLI entry point.
//!
//! Loads `.env`, parses arguments, initializes logging and dispatches to the
//! selected command. A PII validation block exits with status 2 so scripts
//! can tell it apart from ordinary failures (status 1).

use clap::Parser;
use discovery::cli::{Cli, Commands};
use discovery::commands;
use discovery::logger;
use discovery::ui::output_format::error_msg;
use discovery_core::DiscoveryError;
use std::process::ExitCode;

async fn dispatch(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Analyze(cmd) => commands::analyze::run_analyze(cmd).await,
        Commands::Run(cmd) => commands::run::run_request(cmd).await,
        Commands::Redact(cmd) => commands::redact::run_redact(cmd),
        Commands::Audit(cmd) => commands::audit::run_audit(cmd),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let level = if cli.quiet {
        Some(log::LevelFilter::Off)
    } else if cli.debug {
        Some(log::LevelFilter::Debug)
    } else {
        None
    };
    logger::init_logger(level);

    match dispatch(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error_msg(format!("{:#}", err));
            let blocked = err
                .downcast_ref::<DiscoveryError>()
                .is_some_and(DiscoveryError::is_policy_block);
            if blocked { ExitCode::from(2) } else { ExitCode::FAILURE }
        }
    }
}
