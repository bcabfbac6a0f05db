#![deny(missing_docs)]

//! # Batch Command
//!
//! Processes every document waiting in `<root>/<inbox>` one at a time:
//!
//! 1. The file is moved to `processing/`.
//! 2. It is loaded and resolved; its prompt records are appended to the output file.
//! 3. It is moved to `processed/` on success, or to `broken/` on any failure.
//!
//! Files already present in `processed/` or `broken/` are left in the inbox.
//! A file that cannot be moved is logged and counted as broken; the run goes on.

use crate::error::{CliError, CliResult};
use crate::prompts::{append_records, prompt_records};
use crate::resolve::ResolutionFlags;
use specdigest_core::{load_api, ResolveOptions};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Arguments for the batch command.
#[derive(clap::Args, Debug, Clone)]
pub struct BatchArgs {
    /// Working directory holding the inbox and the state subdirectories.
    #[clap(long, env = "SPECDIGEST_ROOT", default_value = "./swagger-files")]
    pub root: PathBuf,

    /// Name of the inbox directory under the root.
    #[clap(long, env = "SPECDIGEST_INBOX", default_value = "output")]
    pub inbox: String,

    /// Process at most this many inbox files.
    #[clap(long)]
    pub limit: Option<usize>,

    /// JSON-lines file under the root that prompt records are appended to.
    #[clap(long, default_value = "rest_prompts.jsonl")]
    pub output_name: String,

    #[clap(flatten)]
    pub flags: ResolutionFlags,
}

/// Counts of what a batch run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Documents resolved and moved to `processed/`.
    pub processed: usize,
    /// Documents moved to `broken/`.
    pub broken: usize,
    /// Documents left in the inbox because they were handled before.
    pub skipped: usize,
}

/// Directory layout of a batch root.
struct BatchLayout {
    inbox: PathBuf,
    processing: PathBuf,
    processed: PathBuf,
    broken: PathBuf,
}

impl BatchLayout {
    fn new(root: &Path, inbox: &str) -> Self {
        Self {
            inbox: root.join(inbox),
            processing: root.join("processing"),
            processed: root.join("processed"),
            broken: root.join("broken"),
        }
    }

    fn ensure(&self) -> CliResult<()> {
        for dir in [&self.inbox, &self.processing, &self.processed, &self.broken] {
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    fn already_handled(&self, file_name: &str) -> bool {
        self.processed.join(file_name).exists() || self.broken.join(file_name).exists()
    }
}

/// Executes the batch pipeline.
pub fn execute(args: &BatchArgs) -> CliResult<BatchSummary> {
    let layout = BatchLayout::new(&args.root, &args.inbox);
    layout.ensure()?;

    let options = args.flags.options();
    let output = args.root.join(&args.output_name);
    let pending = pending_files(&layout.inbox, args.limit)?;
    tracing::info!(count = pending.len(), inbox = %layout.inbox.display(), "documents to process");

    let mut summary = BatchSummary::default();
    for file_name in pending {
        if layout.already_handled(&file_name) {
            tracing::info!(file = %file_name, "already processed or broken, skipping");
            summary.skipped += 1;
            continue;
        }

        let processing = layout.processing.join(&file_name);
        if let Err(error) = fs::rename(layout.inbox.join(&file_name), &processing) {
            tracing::warn!(file = %file_name, error = %error, "failed to claim document");
            summary.broken += 1;
            continue;
        }

        let target = match process_document(&processing, &options, &output) {
            Ok(records) => {
                summary.processed += 1;
                tracing::info!(
                    file = %file_name,
                    records,
                    done = summary.processed,
                    "document processed"
                );
                layout.processed.join(&file_name)
            }
            Err(error) => {
                tracing::warn!(file = %file_name, error = %error, "document is broken");
                summary.broken += 1;
                layout.broken.join(&file_name)
            }
        };

        if let Err(error) = fs::rename(&processing, &target) {
            tracing::warn!(
                file = %file_name,
                target = %target.display(),
                error = %error,
                "failed to move document out of processing"
            );
        }
    }

    tracing::info!(
        processed = summary.processed,
        broken = summary.broken,
        skipped = summary.skipped,
        "batch finished"
    );
    Ok(summary)
}

/// Resolves one document and appends its prompt records, returning how many were written.
fn process_document(path: &Path, options: &ResolveOptions, output: &Path) -> CliResult<usize> {
    let api = load_api(path, options)?;
    let records = prompt_records(&api);
    append_records(output, &records)?;
    Ok(records.len())
}

/// Lists inbox file names in name order.
fn pending_files(inbox: &Path, limit: Option<usize>) -> CliResult<Vec<String>> {
    let mut names = Vec::new();
    for entry in WalkDir::new(inbox)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry
            .map_err(|e| CliError::General(format!("Failed to list {:?}: {}", inbox, e)))?;
        if entry.file_type().is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    if let Some(limit) = limit {
        names.truncate(limit);
    }
    Ok(names)
}
