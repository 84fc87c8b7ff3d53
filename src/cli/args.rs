use crate::cli::commands;
use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "opt-orchestrator")]
#[command(about = "Parameter-search job orchestrator")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Boot the HTTP server and block until shutdown.
    Serve,

    /// Clear in-memory state and, if configured, the persistence mirror.
    DebugReset,

    /// One-shot liveness check against a running instance.
    Health {
        /// Address of the running instance's internal health endpoint.
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: String,
    },
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Serve => commands::serve_command().await,
            Commands::DebugReset => commands::debug_reset_command().await,
            Commands::Health { addr } => commands::health_command(&addr).await,
        }
    }
}
