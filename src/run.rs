//! Vault run orchestration.
//!
//! Coordinates the full flow for one vault: walk → read → rewrite →
//! backup → write → report. A failure on one document is recorded as its
//! outcome and the run moves on; only setup problems (missing vault)
//! abort the run.

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::Config;
use crate::models::SourceDocument;
use crate::progress::{RunEvent, RunReporter};
use crate::rewrite::{rewrite_bytes, Outcome};
use crate::stats::RunSummary;
use crate::walker::scan_vault;

/// Options that govern I/O, as opposed to labeling.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub vault: PathBuf,
    /// Compute and report outcomes without writing anything.
    pub dry_run: bool,
    /// Copy each file to `<name>.bak` before overwriting it.
    pub backup: bool,
}

pub fn run_vault(
    config: &Config,
    options: &RunOptions,
    reporter: &dyn RunReporter,
) -> Result<RunSummary> {
    let scan = scan_vault(&options.vault, config)?;
    info!(
        vault = %options.vault.display(),
        documents = scan.documents.len(),
        dry_run = options.dry_run,
        "scanned vault"
    );

    reporter.report(RunEvent::Started {
        root: &options.vault,
        total: scan.documents.len(),
        dry_run: options.dry_run,
    });

    let mut summary = RunSummary {
        skipped_special: scan.skipped_special,
        ..Default::default()
    };

    for (i, document) in scan.documents.iter().enumerate() {
        debug!(
            "processing ({}/{}): {}",
            i + 1,
            scan.documents.len(),
            document.relative_path
        );
        let outcome = process_document(document, config, options);
        summary.record(&outcome);
        reporter.report(RunEvent::Document {
            relative_path: &document.relative_path,
            outcome: &outcome,
            dry_run: options.dry_run,
        });
    }

    Ok(summary)
}

/// Read, rewrite, and (unless dry-running) persist one document.
pub fn process_document(
    document: &SourceDocument,
    config: &Config,
    options: &RunOptions,
) -> Outcome {
    let raw = match fs::read(&document.path) {
        Ok(raw) => raw,
        Err(e) => return Outcome::read_failure(e.to_string()),
    };

    let outcome = rewrite_bytes(&raw, &document.relative_path, config);
    if options.dry_run {
        return outcome;
    }

    if let Outcome::Updated { new_text, .. } = &outcome {
        if let Err(e) = write_document(&document.path, new_text, options.backup) {
            return Outcome::write_failure(e.to_string());
        }
    }
    outcome
}

/// Replace `path` with `content` via a sibling temp file and rename, so a
/// failed write leaves the original in place. The replacement keeps the
/// original's permissions.
fn write_document(path: &Path, content: &str, backup: bool) -> std::io::Result<()> {
    let permissions = fs::metadata(path)?.permissions();
    if backup {
        fs::copy(path, sibling_with_suffix(path, ".bak"))?;
    }
    let tmp = sibling_with_suffix(path, ".heading.tmp");
    let result = fs::write(&tmp, content)
        .and_then(|()| fs::set_permissions(&tmp, permissions))
        .and_then(|()| fs::rename(&tmp, path));
    if result.is_err() && tmp.is_file() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}
