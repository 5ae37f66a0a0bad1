//! AFKWarden CLI — the main entry point.
//!
//! Commands:
//! - `run`     — Start the full control plane (agent, console, gateway)
//! - `command` — Preview a command offline, without a live agent

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "afkwarden",
    about = "AFKWarden — control plane for a long-running presence agent",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the control plane
    Run {
        /// Override the gateway port
        #[arg(short, long)]
        port: Option<u16>,

        /// Use a specific config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Preview how a command would be dispatched, without a live agent
    Command {
        /// The raw command text (lists the command table when omitted)
        text: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Run { port, config } => commands::run::run(port, config).await?,
        Commands::Command { text } => commands::command::run(text.join(" ")).await?,
    }

    Ok(())
}
