//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// pagegen - deterministic programmatic page generation and audits.
#[derive(Parser, Debug, Clone)]
#[command(name = "pagegen", version, about)]
pub struct Cli {
    /// Enable debug-level logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a site configuration file (defaults to the platform config
    /// directory, falling back to built-in defaults)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Compose and print the page for a requested path
    Page {
        /// Requested path or full URL; normalized before composition
        path: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Batch audits over every deployed service x locality combination
    Audit {
        #[command(subcommand)]
        check: AuditCheck,
    },

    /// Validate a structured-data graph (JSON file) against a page role
    Validate {
        /// Path to the graph JSON (a node array or an `@graph` object)
        file: PathBuf,

        /// Page role to validate against (e.g. authority, contact)
        #[arg(long)]
        role: String,
    },
}

/// Audit checks; each exits non-zero when its property fails.
#[derive(Subcommand, Debug, Clone)]
pub enum AuditCheck {
    /// Re-compose every page repeatedly and verify byte-identical output
    Determinism {
        /// Compositions per page
        #[arg(long, default_value_t = 3)]
        rounds: usize,
    },

    /// Check that intro and locality sections are distinct across pages
    Uniqueness,

    /// Check that every page's word count lies within the configured band
    Words,
}

/// Output format for the `page` command.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable sections
    Text,
    /// Single JSON object
    Json,
}
