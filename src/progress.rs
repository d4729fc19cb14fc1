//! Per-document run reporting.
//!
//! Every document yields exactly one [`RunEvent::Document`] line. Human
//! output mirrors what the tool does to each note; JSON output emits one
//! object per line for scripts.

use serde_json::json;
use std::io::Write;
use std::path::Path;

use crate::rewrite::{Outcome, SkipReason};

/// A single reporting event.
#[derive(Clone, Debug)]
pub enum RunEvent<'a> {
    /// Walk finished; `total` documents will be processed.
    Started {
        root: &'a Path,
        total: usize,
        dry_run: bool,
    },
    /// One document reached its outcome.
    Document {
        relative_path: &'a str,
        outcome: &'a Outcome,
        dry_run: bool,
    },
}

pub trait RunReporter: Send + Sync {
    fn report(&self, event: RunEvent<'_>);
}

/// Human-readable lines on stdout.
pub struct HumanReporter;

impl RunReporter for HumanReporter {
    fn report(&self, event: RunEvent<'_>) {
        let line = match event {
            RunEvent::Started {
                root,
                total,
                dry_run,
            } => {
                let mut line = format!("Processing vault: {}\n", root.display());
                if dry_run {
                    line.push_str("DRY RUN - no files will be modified\n");
                }
                line.push_str(&format!("Found {} markdown files\n", format_number(total as u64)));
                line
            }
            RunEvent::Document {
                relative_path,
                outcome,
                dry_run,
            } => human_line(relative_path, outcome, dry_run),
        };
        let mut out = std::io::stdout().lock();
        let _ = out.write_all(line.as_bytes());
        let _ = out.flush();
    }
}

fn human_line(relative_path: &str, outcome: &Outcome, dry_run: bool) -> String {
    match outcome {
        Outcome::Updated { label, .. } => {
            let verb = if dry_run { "Would add" } else { "Added" };
            format!("✓ {} heading to: {} → \"{}\"\n", verb, relative_path, label)
        }
        Outcome::Skipped {
            reason: SkipReason::AlreadyLabeled,
        } => format!("⚠ Skipped (has heading): {}\n", relative_path),
        Outcome::Skipped {
            reason: SkipReason::ExcludedPattern,
        } => format!("⚠ Skipped (excluded): {}\n", relative_path),
        Outcome::Errored { kind, detail } => {
            format!("✗ Error processing {} ({}): {}\n", relative_path, kind, detail)
        }
    }
}

/// One JSON object per line on stdout.
pub struct JsonReporter;

impl RunReporter for JsonReporter {
    fn report(&self, event: RunEvent<'_>) {
        let obj = match event {
            RunEvent::Started {
                root,
                total,
                dry_run,
            } => json!({
                "event": "started",
                "root": root.display().to_string(),
                "total": total,
                "dry_run": dry_run
            }),
            RunEvent::Document {
                relative_path,
                outcome,
                dry_run,
            } => {
                let mut obj = json!({
                    "event": "document",
                    "path": relative_path,
                    "dry_run": dry_run
                });
                match outcome {
                    Outcome::Updated { label, .. } => {
                        obj["status"] = json!("updated");
                        obj["label"] = json!(label);
                    }
                    Outcome::Skipped { reason } => {
                        obj["status"] = json!("skipped");
                        obj["reason"] = json!(reason.to_string());
                    }
                    Outcome::Errored { kind, detail } => {
                        obj["status"] = json!("errored");
                        obj["kind"] = json!(kind.to_string());
                        obj["detail"] = json!(detail);
                    }
                }
                obj
            }
        };
        if let Ok(line) = serde_json::to_string(&obj) {
            let _ = writeln!(std::io::stdout().lock(), "{}", line);
        }
    }
}

/// No-op reporter when reporting is disabled.
pub struct NoReport;

impl RunReporter for NoReport {
    fn report(&self, _event: RunEvent<'_>) {}
}

pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + (s.len() - 1) / 3);
    let chars: Vec<char> = s.chars().rev().collect();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }
    result.chars().rev().collect()
}

/// Report mode for the CLI: off, human, or JSON.
#[derive(Clone, Copy, Debug, Eq, PartialEq, clap::ValueEnum)]
pub enum ReportMode {
    Off,
    Human,
    Json,
}

impl ReportMode {
    /// Default: human lines when stdout is a TTY, otherwise off.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stdout) {
            ReportMode::Human
        } else {
            ReportMode::Off
        }
    }

    pub fn reporter(&self) -> Box<dyn RunReporter> {
        match self {
            ReportMode::Off => Box::new(NoReport),
            ReportMode::Human => Box::new(HumanReporter),
            ReportMode::Json => Box::new(JsonReporter),
        }
    }
}
