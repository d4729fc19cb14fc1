//! Single-document rewrite: parse, classify, label, decide, serialize.
//!
//! [`rewrite`] is pure. It never touches storage and never returns an
//! error across the document boundary; every input ends in exactly one
//! [`Outcome`]. Reading and writing files is the caller's job (see
//! [`crate::run`]).

use std::fmt;
use tracing::{debug, warn};

use crate::classify::{classify, DocumentPath};
use crate::config::Config;
use crate::frontmatter::{self, BlockState};
use crate::label::synthesize;

/// Why a document was left alone. Not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The label field already has a non-empty value.
    AlreadyLabeled,
    /// The path matches an exclude pattern.
    ExcludedPattern,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::AlreadyLabeled => write!(f, "already labeled"),
            SkipReason::ExcludedPattern => write!(f, "excluded"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ReadFailure,
    MalformedMetadata,
    WriteFailure,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::ReadFailure => write!(f, "read failure"),
            ErrorKind::MalformedMetadata => write!(f, "malformed metadata"),
            ErrorKind::WriteFailure => write!(f, "write failure"),
        }
    }
}

/// Terminal result for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Updated { new_text: String, label: String },
    Skipped { reason: SkipReason },
    Errored { kind: ErrorKind, detail: String },
}

impl Outcome {
    pub fn read_failure(detail: impl Into<String>) -> Self {
        Outcome::Errored {
            kind: ErrorKind::ReadFailure,
            detail: detail.into(),
        }
    }

    pub fn write_failure(detail: impl Into<String>) -> Self {
        Outcome::Errored {
            kind: ErrorKind::WriteFailure,
            detail: detail.into(),
        }
    }
}

/// Compute the outcome for one document held in memory.
pub fn rewrite(raw_text: &str, relative_path: &str, config: &Config) -> Outcome {
    if config.excludes.is_excluded(relative_path) {
        return Outcome::Skipped {
            reason: SkipReason::ExcludedPattern,
        };
    }

    let parsed = frontmatter::parse(raw_text);
    if parsed.block.state == BlockState::Malformed {
        let detail = parsed
            .error
            .unwrap_or_else(|| "unparseable metadata block".to_string());
        warn!(
            path = relative_path,
            error = %detail,
            "malformed frontmatter, leaving document untouched"
        );
        debug!(
            path = relative_path,
            span = parsed.raw_span.unwrap_or_default(),
            "raw metadata span"
        );
        return Outcome::Errored {
            kind: ErrorKind::MalformedMetadata,
            detail,
        };
    }

    let path = DocumentPath::new(relative_path);
    let classification = classify(&path, config);
    let label = synthesize(&classification, config);
    debug!(
        path = relative_path,
        rule = classification.rule_name(),
        label = %label,
        "classified"
    );

    if config.skip_existing && parsed.block.has_value(&config.field) {
        return Outcome::Skipped {
            reason: SkipReason::AlreadyLabeled,
        };
    }

    let mut block = parsed.block;
    block.set(&config.field, &label);
    match frontmatter::serialize(&block, parsed.body) {
        Ok(new_text) => Outcome::Updated { new_text, label },
        Err(e) => Outcome::Errored {
            kind: ErrorKind::MalformedMetadata,
            detail: e.to_string(),
        },
    }
}

/// Like [`rewrite`], for raw file bytes. Invalid UTF-8 is a read failure.
pub fn rewrite_bytes(raw: &[u8], relative_path: &str, config: &Config) -> Outcome {
    match std::str::from_utf8(raw) {
        Ok(text) => rewrite(text, relative_path, config),
        Err(e) => Outcome::read_failure(format!("document is not valid UTF-8: {}", e)),
    }
}
