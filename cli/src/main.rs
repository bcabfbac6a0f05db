#![deny(missing_docs)]

//! # Specdigest CLI
//!
//! Command Line Interface around the Swagger reference resolver.
//!
//! Supported Commands:
//! - `resolve`: Resolves one document and prints the resolved model as JSON.
//! - `batch`: Processes a directory of documents into prompt records, sorting
//!   each file into `processed/` or `broken/`.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::error::CliResult;

mod batch;
mod error;
mod prompts;
mod resolve;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Swagger reference resolution toolchain")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve a single Swagger document.
    Resolve(resolve::ResolveArgs),
    /// Process every document waiting in the inbox directory.
    Batch(batch::BatchArgs),
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Resolve(args) => resolve::execute(args)?,
        Commands::Batch(args) => {
            batch::execute(args)?;
        }
    }

    Ok(())
}
