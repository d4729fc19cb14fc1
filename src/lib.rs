//! # Vault Heading
//!
//! Adds a derived `heading` property to the frontmatter of every Markdown
//! note in a vault, based on where the note lives and what it is called.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌───────────────────────────────────────┐   ┌─────────┐
//! │  Walker  │──▶│ rewrite: parse → classify → label →   │──▶│  Writer │
//! │ (vault)  │   │          decide → serialize (pure)    │   │ +backup │
//! └──────────┘   └───────────────────────────────────────┘   └─────────┘
//!                                   │
//!                                   ▼
//!                          Outcome per document
//!                       (reporter + run summary)
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! heading run ~/vault --dry-run --report human
//! heading run ~/vault --backup --title-case
//! heading label "projects/backup-system/README.md" --title-case
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | Defaults, config file, CLI overrides, merged `Config` |
//! | [`pattern`] | Segment-wise directory patterns |
//! | [`frontmatter`] | Metadata block parse / serialize |
//! | [`classify`] | Rule precedence over path and filename |
//! | [`label`] | Label text and title-casing |
//! | [`rewrite`] | Per-document outcome (pure) |
//! | [`walker`] | Vault tree walk |
//! | [`run`] | Run loop with backup and write |
//! | [`progress`] | Per-document reporting |
//! | [`stats`] | Run summary |

pub mod classify;
pub mod config;
pub mod error;
pub mod frontmatter;
pub mod label;
pub mod models;
pub mod pattern;
pub mod progress;
pub mod rewrite;
pub mod run;
pub mod stats;
pub mod walker;

pub use config::Config;
pub use rewrite::{rewrite, rewrite_bytes, ErrorKind, Outcome, SkipReason};
