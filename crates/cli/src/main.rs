//! Roster CLI - Load and inspect agent definition documents
//!
//! Usage:
//!   roster check [paths]       - Validate documents and report diagnostics
//!   roster list [paths]        - List loaded agents, optionally filtered
//!   roster show <name>         - Describe one agent
//!   roster export [paths]      - Write a JSON manifest of every agent
//!   roster init [dir]          - Scaffold a config and sample agents

mod commands;
mod context;

use clap::{Parser, Subcommand};
use commands::{CheckCommand, ExportCommand, InitCommand, ListCommand, ShowCommand};
use context::Context;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "roster")]
#[command(about = "Roster - Agent definition loader and registry")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to ./roster.json when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate agent documents
    Check(CheckCommand),
    /// List loaded agents
    List(ListCommand),
    /// Show a single agent
    Show(ShowCommand),
    /// Export a JSON manifest
    Export(ExportCommand),
    /// Initialize a new agent directory
    Init(InitCommand),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Init(cmd) = &cli.command {
        return cmd.run();
    }

    let config = Context::resolve_config(cli.config.as_deref())?;
    let ctx = Context::new(config, cli.json);

    match cli.command {
        Commands::Check(cmd) => cmd.run(&ctx),
        Commands::List(cmd) => cmd.run(&ctx),
        Commands::Show(cmd) => cmd.run(&ctx),
        Commands::Export(cmd) => cmd.run(&ctx),
        Commands::Init(cmd) => cmd.run(),
    }
}
