//! groundrag CLI, the main entry point.
//!
//! Commands:
//! - `chat`    Interactive question answering over the configured bucket
//! - `ingest`  Push the preprocessed document list into the bucket
//! - `bucket`  Resolve (or create) the configured bucket and print its id
//! - `config`  Show or validate the effective configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "groundrag",
    about = "groundrag: grounded answers from a hosted retrieval index",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the TOML config file
    #[arg(short, long, global = true, default_value = "groundrag.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask questions interactively
    Chat,

    /// Ingest documents into the bucket
    Ingest {
        /// JSON document list (defaults to paths.documents_path)
        #[arg(short, long)]
        documents: Option<PathBuf>,

        /// Ingest log file (defaults to paths.log_path)
        #[arg(short, long)]
        log: Option<PathBuf>,
    },

    /// Resolve or create the configured bucket
    Bucket,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration without secrets
    Show,
    /// Check required variables and value ranges
    Validate,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Diagnostics go to stderr; stdout belongs to the session.
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Chat => commands::chat::run(&cli.config).await?,
        Commands::Ingest { documents, log } => {
            commands::ingest::run(&cli.config, documents, log).await?
        }
        Commands::Bucket => commands::bucket::run(&cli.config).await?,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_cmd::show(&cli.config)?,
            ConfigAction::Validate => commands::config_cmd::validate(&cli.config)?,
        },
    }

    Ok(())
}
