//! Huddle command-line interface.
//!
//! Administrative surface for the vector pipeline: config bootstrap, bulk
//! migration, and ad-hoc retrieval/persona queries. Not part of the live
//! message path.

pub mod commands;

use clap::{Parser, Subcommand};

/// Huddle - team chat vector pipeline
#[derive(Parser)]
#[command(name = "huddle")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, env = "HUDDLE_CONFIG")]
    pub config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Initialize Huddle configuration
    Init {
        /// Overwrite existing configuration
        #[arg(long)]
        force: bool,
    },

    /// Re-ingest all historical messages and bios into the vector indexes
    Migrate(commands::migrate::MigrateArgs),

    /// Run a scoped retrieval query
    Query(commands::query::QueryArgs),

    /// Generate an AI-agent persona summary for a user
    Persona(commands::persona::PersonaArgs),
}

/// Run the parsed command.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Init { force } => commands::init::run(cli.config.as_deref(), force),
        Commands::Migrate(args) => commands::migrate::run(cli.config.as_deref(), args).await,
        Commands::Query(args) => commands::query::run(cli.config.as_deref(), args).await,
        Commands::Persona(args) => commands::persona::run(cli.config.as_deref(), args).await,
    }
}
