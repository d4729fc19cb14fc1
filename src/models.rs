//! Data handed between the tree walker and the run loop.

use std::path::PathBuf;

/// A Markdown document found under the vault root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    /// Absolute (or root-joined) path used for I/O.
    pub path: PathBuf,
    /// Path relative to the vault root, `/`-separated.
    pub relative_path: String,
}

/// Everything the walker found, plus what it set aside.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub documents: Vec<SourceDocument>,
    /// Excalidraw drawings and other Markdown-wrapped non-notes.
    pub skipped_special: u64,
}
