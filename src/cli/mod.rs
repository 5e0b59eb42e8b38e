//! Command-line interface wiring for topicena.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::Settings;

pub mod cluster;
pub mod run;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Topic modelling for epistemic network analysis",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command; no sub-command runs the whole pipeline.
    pub async fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command.unwrap_or(Commands::Run) {
            Commands::Run => run::run(settings).await,
            Commands::Cluster(args) => cluster::run(args, settings).await,
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the topic model then the downstream network analysis.
    Run,
    /// Cluster reflections and write the ENA matrix (pipeline stage 1).
    Cluster(cluster::Args),
}
