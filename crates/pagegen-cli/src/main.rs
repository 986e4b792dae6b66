//! pagegen CLI - deterministic programmatic page generation and audits.
//!
//! This is the entry point for the pagegen command-line interface.
//! Command implementations live in separate modules under `commands`.

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod cli;
mod commands;

use cli::{AuditCheck, Cli, Commands};
use commands::Site;

fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_logging(&cli)?;

    let site = Site::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Page { path, format } => commands::page::execute(&site, &path, format),
        Commands::Audit { check } => match check {
            AuditCheck::Determinism { rounds } => commands::audit::determinism(&site, rounds),
            AuditCheck::Uniqueness => commands::audit::uniqueness(&site),
            AuditCheck::Words => commands::audit::words(&site),
        },
        Commands::Validate { file, role } => commands::validate::execute(&file, &role),
    }
}

fn initialize_logging(cli: &Cli) -> Result<()> {
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
