//! Run counters and the end-of-run summary.
//!
//! Every submitted document is recorded exactly once, so the outcome
//! counts always add up to [`RunSummary::documents`].

use crate::rewrite::{ErrorKind, Outcome, SkipReason};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub updated: u64,
    pub skipped_existing: u64,
    pub skipped_excluded: u64,
    /// Files the walker set aside; not submitted documents.
    pub skipped_special: u64,
    pub read_failures: u64,
    pub malformed: u64,
    pub write_failures: u64,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Updated { .. } => self.updated += 1,
            Outcome::Skipped {
                reason: SkipReason::AlreadyLabeled,
            } => self.skipped_existing += 1,
            Outcome::Skipped {
                reason: SkipReason::ExcludedPattern,
            } => self.skipped_excluded += 1,
            Outcome::Errored { kind, .. } => match kind {
                ErrorKind::ReadFailure => self.read_failures += 1,
                ErrorKind::MalformedMetadata => self.malformed += 1,
                ErrorKind::WriteFailure => self.write_failures += 1,
            },
        }
    }

    pub fn errors(&self) -> u64 {
        self.read_failures + self.malformed + self.write_failures
    }

    pub fn skipped(&self) -> u64 {
        self.skipped_existing + self.skipped_excluded
    }

    /// Number of documents that produced an outcome.
    pub fn documents(&self) -> u64 {
        self.updated + self.skipped() + self.errors()
    }

    /// Render the summary block printed after a run.
    pub fn render(&self, dry_run: bool) -> String {
        let mut out = String::new();
        out.push_str(&"=".repeat(50));
        out.push('\n');
        out.push_str(if dry_run { "SUMMARY (dry run)\n" } else { "SUMMARY\n" });
        out.push_str(&"=".repeat(50));
        out.push('\n');
        out.push_str(&format!("  Processed:           {}\n", self.updated));
        out.push_str(&format!("  Skipped (existing):  {}\n", self.skipped_existing));
        out.push_str(&format!("  Skipped (excluded):  {}\n", self.skipped_excluded));
        out.push_str(&format!("  Skipped (special):   {}\n", self.skipped_special));
        out.push_str(&format!("  Errors:              {}\n", self.errors()));
        if self.errors() > 0 {
            out.push_str(&format!(
                "    read: {}, malformed: {}, write: {}\n",
                self.read_failures, self.malformed, self.write_failures
            ));
        }
        out.push_str(&format!(
            "  Total files:         {}\n",
            self.documents() + self.skipped_special
        ));
        out
    }
}
