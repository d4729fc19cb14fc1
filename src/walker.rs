//! Vault tree walker.
//!
//! Yields every `*.md` file under the root in sorted order. Directories
//! matched by the exclude rules (including `.obsidian`) are pruned before
//! descent; Excalidraw drawings are counted and set aside.

use anyhow::{bail, Result};
use std::path::Path;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::config::Config;
use crate::models::{ScanResult, SourceDocument};

const SPECIAL_SUFFIXES: [&str; 1] = [".excalidraw.md"];

pub fn scan_vault(root: &Path, config: &Config) -> Result<ScanResult> {
    if !root.exists() {
        bail!("Vault path does not exist: {}", root.display());
    }
    if !root.is_dir() {
        bail!("Vault path is not a directory: {}", root.display());
    }

    let mut result = ScanResult::default();

    let walker = WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| !is_excluded_dir(root, entry, config));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().to_lowercase();
        if !file_name.ends_with(".md") {
            continue;
        }
        if SPECIAL_SUFFIXES.iter().any(|s| file_name.ends_with(s)) {
            debug!(path = %entry.path().display(), "skipping special file");
            result.skipped_special += 1;
            continue;
        }

        result.documents.push(SourceDocument {
            path: entry.path().to_path_buf(),
            relative_path: relative_str(root, entry.path()),
        });
    }

    // Sort for deterministic ordering
    result
        .documents
        .sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

    Ok(result)
}

fn is_excluded_dir(root: &Path, entry: &DirEntry, config: &Config) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let rel = relative_str(root, entry.path());
    let excluded = config.excludes.is_excluded_dir(&rel);
    if excluded {
        debug!(dir = %rel, "pruning excluded directory");
    }
    excluded
}

fn relative_str(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}
