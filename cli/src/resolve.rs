#![deny(missing_docs)]

//! # Resolve Command
//!
//! Resolves one Swagger document and emits the `ParsedApi` as pretty JSON.

use crate::error::CliResult;
use specdigest_core::{load_api, ResolutionDepth, ResolveOptions};
use std::fs;
use std::path::PathBuf;

/// Resolution flags shared by every command.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ResolutionFlags {
    /// Resolve references at every depth (fails on cyclic definitions).
    #[clap(long, env = "SPECDIGEST_DEEP")]
    pub deep: bool,

    /// Treat any degraded parameter/response list as a broken document.
    #[clap(long, env = "SPECDIGEST_STRICT")]
    pub strict: bool,
}

impl ResolutionFlags {
    /// Converts the flags into core resolution options.
    pub fn options(&self) -> ResolveOptions {
        ResolveOptions {
            depth: if self.deep {
                ResolutionDepth::Deep
            } else {
                ResolutionDepth::Shallow
            },
            strict: self.strict,
        }
    }
}

/// Arguments for the resolve command.
#[derive(clap::Args, Debug, Clone)]
pub struct ResolveArgs {
    /// Path to the Swagger document (JSON or YAML).
    pub file: PathBuf,

    /// Write the resolved model here instead of stdout.
    #[clap(long)]
    pub output: Option<PathBuf>,

    #[clap(flatten)]
    pub flags: ResolutionFlags,
}

/// Executes the resolve command.
pub fn execute(args: &ResolveArgs) -> CliResult<()> {
    let api = load_api(&args.file, &args.flags.options())?;
    let rendered = serde_json::to_string_pretty(&api)?;

    match &args.output {
        Some(path) => {
            fs::write(path, rendered)?;
            tracing::info!(output = %path.display(), "resolved model written");
        }
        None => println!("{}", rendered),
    }
    Ok(())
}
