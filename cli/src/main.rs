// Copyright (c) 2026 Explicator Contributors
// SPDX-License-Identifier: AGPL-3.0

//! # Explicator CLI
//!
//! The `explicator` binary drives a scenario-driven model from the shell or
//! serves it to an AI assistant over MCP.
//!
//! ## Commands
//!
//! - `explicator scenarios` - List scenarios
//! - `explicator run <name> [-o FIELD=VALUE]...` - Run one scenario
//! - `explicator compare <a> <b> [--override-a F=V]... [--override-b F=V]... [-m METRIC]...`
//! - `explicator schema` - Describe model inputs and outputs
//! - `explicator override <field> <value>` / `explicator reset` - Session overrides
//! - `explicator config show|validate|generate` - Configuration management
//! - `explicator mcp` - MCP server on stdio

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing::debug;

use explicator_cli::commands::{self, CompareArgs, ConfigCommand, OverrideArgs, RunArgs};
use explicator_core::domain::config::{ExplicatorConfig, LogFormat};

/// Explicator - Let an AI assistant explain your model's scenarios
#[derive(Parser)]
#[command(name = "explicator")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides configuration
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available scenarios
    #[command(name = "scenarios")]
    Scenarios,

    /// Run a scenario
    #[command(name = "run")]
    Run(RunArgs),

    /// Run two scenarios and compare their outputs
    #[command(name = "compare")]
    Compare(CompareArgs),

    /// Show the model schema
    #[command(name = "schema")]
    Schema,

    /// Set a session override and show the active set
    #[command(name = "override")]
    Override(OverrideArgs),

    /// Clear all session overrides
    #[command(name = "reset")]
    Reset,

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Serve the model over MCP (stdio)
    #[command(name = "mcp")]
    Mcp,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        eprintln!("{}", "No command specified. Use --help for usage.".yellow());
        std::process::exit(1);
    };

    // Config commands load (or write) the file themselves, so a broken
    // config must not stop them.
    if let Commands::Config { command } = command {
        let defaults = ExplicatorConfig::default();
        let level = cli.log_level.as_deref().unwrap_or(&defaults.logging.level);
        init_logging(level, defaults.logging.format)?;
        return commands::config::handle_command(command, cli.config);
    }

    let config = ExplicatorConfig::load_or_default(cli.config.clone())
        .context("Failed to load configuration")?;

    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    init_logging(level, config.logging.format)?;
    debug!(model = %config.model, "Configuration loaded");

    match command {
        Commands::Config { command } => commands::config::handle_command(command, cli.config),
        Commands::Mcp => commands::mcp::serve(&config).await,
        Commands::Scenarios => commands::scenario::list(&commands::build_service(&config)?),
        Commands::Schema => commands::scenario::schema(&commands::build_service(&config)?),
        Commands::Run(args) => commands::scenario::run(&mut commands::build_service(&config)?, args),
        Commands::Compare(args) => {
            commands::scenario::compare(&mut commands::build_service(&config)?, args)
        }
        Commands::Override(args) => {
            commands::scenario::override_input(&mut commands::build_service(&config)?, args)
        }
        Commands::Reset => commands::scenario::reset(&mut commands::build_service(&config)?),
    }
}

/// Initialize tracing subscriber for logging. Always writes to stderr.
fn init_logging(level: &str, format: LogFormat) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    match format {
        LogFormat::Text => builder.compact().init(),
        LogFormat::Json => builder.json().init(),
    }

    Ok(())
}
