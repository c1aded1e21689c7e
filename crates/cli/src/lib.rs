//! Implements the `upskill` command-line application.
//!
//! Wires the engine crates together behind three subcommands: `analyze`
//! (full pipeline from files to a gap report and learning path), `check`
//! (taxonomy validation), and `resolve` (per-label normalization trace).
//! Tunables come from flags, `UPSKILL_*` environment variables, or
//! `~/.upskill/config.toml`, in that precedence.

#![deny(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod render;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::commands::{handle_analyze_command, handle_check_command, handle_resolve_command};

/// Parse arguments and dispatch to the selected command.
pub fn run() -> Result<()> {
    // Config file values become env-var defaults, so they must land before
    // clap reads the environment.
    config::apply_config_to_env();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze {
            taxonomy,
            employee,
            role,
            budget,
            format,
            matcher,
            recommend,
        } => handle_analyze_command(
            &taxonomy,
            &employee,
            &role,
            budget,
            format,
            &matcher.to_config(),
            &recommend.to_options(),
        ),
        Commands::Check { taxonomy } => handle_check_command(&taxonomy),
        Commands::Resolve {
            taxonomy,
            labels,
            matcher,
        } => handle_resolve_command(&taxonomy, &labels, &matcher.to_config()),
    }
}
