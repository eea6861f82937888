use crate::errors::AppResult;
use clap::{Parser, Subcommand};

pub mod commands;

/// Forensic address tagger and nonce-reuse scanner
#[derive(Parser)]
#[command(name = "address-tagger")]
#[command(about = "Tag addresses from their transaction histories and flag repeated signature nonces")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Tag every address document, scan the signature table and write the tag store
    Tag(commands::tag::TagCommand),
    /// Scan a signature table for transactions that repeat an (r, s) pair
    ScanNonces(commands::scan_nonces::ScanNoncesCommand),
    /// Build the record for a single address document and print it
    Inspect(commands::inspect::InspectCommand),
}

pub fn run() -> AppResult<()> {
    // Uses RUST_LOG environment variable (defaults to "error" if not set)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("error")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Tag(command) => command.run(),
        Commands::ScanNonces(command) => command.run(),
        Commands::Inspect(command) => command.run(),
    }
}
