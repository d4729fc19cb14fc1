//! # Vault Heading CLI (`heading`)
//!
//! Adds a `heading` frontmatter property to every Markdown note in a vault.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `heading run <vault>` | Label every note under the vault root |
//! | `heading label <path>` | Show the rule and label for one relative path |
//!
//! ## Examples
//!
//! ```bash
//! # Preview without touching files
//! heading run ~/vault --dry-run --report human
//!
//! # Write, keeping .bak copies, with title-cased labels
//! heading run ~/vault --backup --title-case
//!
//! # Skip some folders and treat another as daily notes
//! heading run ~/vault --exclude-dirs "04-TEMPLATES,drafts" --include-patterns "work/log/"
//! ```

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vault_heading::classify::{classify, DocumentPath};
use vault_heading::config::{
    find_config_file, load_config_file, merge, split_list, CliOverrides, Config, FileConfig,
    Settings,
};
use vault_heading::label::synthesize;
use vault_heading::progress::ReportMode;
use vault_heading::run::{run_vault, RunOptions};

/// Vault Heading: add a derived `heading` property to Markdown frontmatter.
///
/// Settings come from built-in defaults, an optional
/// `.heading-config.{toml,yaml}` at the vault root (or `--config`), and
/// the flags below, in increasing precedence.
#[derive(Parser)]
#[command(
    name = "heading",
    about = "Add a heading property to the frontmatter of Markdown notes",
    version
)]
struct Cli {
    /// Explicit config file (TOML or YAML). Overrides vault-root discovery.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Label every Markdown note under a vault root.
    ///
    /// Documents that fail (unreadable, malformed frontmatter, failed
    /// write) are reported and left untouched; the run continues.
    Run {
        /// Path to the vault root.
        vault: PathBuf,

        /// Show what would change without writing files.
        #[arg(long)]
        dry_run: bool,

        /// Copy each file to `<file>.bak` before modifying it.
        #[arg(long)]
        backup: bool,

        /// Per-document report: `human`, `json`, or `off`.
        /// Defaults to `human` on a terminal, otherwise `off`.
        #[arg(long, value_enum)]
        report: Option<ReportMode>,

        #[command(flatten)]
        rules: RuleArgs,
    },

    /// Print the rule and label for a vault-relative path.
    ///
    /// Reads no documents; useful for checking patterns.
    Label {
        /// Path relative to the vault root, e.g. `journal/2024-01-15.md`.
        path: String,

        /// Vault root, for config discovery and root-level index names.
        #[arg(long)]
        vault: Option<PathBuf>,

        #[command(flatten)]
        rules: RuleArgs,
    },
}

/// Labeling flags shared by every command.
#[derive(Args, Debug, Default)]
struct RuleArgs {
    /// Title-case labels derived from file and folder names.
    #[arg(long)]
    title_case: bool,

    /// Keep filename casing for plain notes even with --title-case.
    #[arg(long)]
    preserve_case: bool,

    /// Overwrite headings that are already set.
    #[arg(long)]
    no_skip_existing: bool,

    /// Comma-separated directory names or globs to exclude.
    #[arg(long)]
    exclude_dirs: Option<String>,

    /// Comma-separated extra daily-note directory patterns.
    #[arg(long)]
    include_patterns: Option<String>,

    /// Frontmatter field to write (default `heading`).
    #[arg(long)]
    field: Option<String>,

    /// Filename suffix marking summary notes (default `-summary`).
    #[arg(long)]
    summary_suffix: Option<String>,
}

impl RuleArgs {
    fn overrides(&self, vault: Option<&Path>) -> CliOverrides {
        CliOverrides {
            field: self.field.clone(),
            summary_suffix: self.summary_suffix.clone(),
            title_case: self.title_case.then_some(true),
            preserve_case: self.preserve_case.then_some(true),
            skip_existing: self.no_skip_existing.then_some(false),
            include_patterns: self
                .include_patterns
                .as_deref()
                .map(split_list)
                .unwrap_or_default(),
            exclude_dirs: self
                .exclude_dirs
                .as_deref()
                .map(split_list)
                .unwrap_or_default(),
            root_name: vault.and_then(root_name),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Run {
            vault,
            dry_run,
            backup,
            report,
            rules,
        } => {
            let config = build_config(cli.config.as_deref(), Some(&vault), &rules)?;
            let options = RunOptions {
                vault,
                dry_run,
                backup,
            };
            let reporter = report.unwrap_or_else(ReportMode::default_for_tty).reporter();
            let summary = run_vault(&config, &options, reporter.as_ref()).with_context(|| {
                format!("failed to process vault {}", options.vault.display())
            })?;
            print!("{}", summary.render(dry_run));
        }
        Commands::Label { path, vault, rules } => {
            let config = build_config(cli.config.as_deref(), vault.as_deref(), &rules)?;
            let document = DocumentPath::new(&path);
            let classification = classify(&document, &config);
            println!("rule:  {}", classification.rule_name());
            println!("label: {}", synthesize(&classification, &config));
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "vault_heading=debug,heading=debug"
    } else {
        "vault_heading=info,heading=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Merge defaults, the config file, and CLI flags.
///
/// An explicit `--config` must load; a discovered vault-root file that
/// fails to parse is reported and ignored.
fn build_config(
    explicit: Option<&Path>,
    vault: Option<&Path>,
    rules: &RuleArgs,
) -> Result<Config> {
    let file: Option<FileConfig> = match (explicit, vault.and_then(find_config_file)) {
        (Some(path), _) => Some(load_config_file(path)?),
        (None, Some(path)) => match load_config_file(&path) {
            Ok(file) => Some(file),
            Err(e) => {
                warn!(error = %e, "ignoring config file");
                None
            }
        },
        (None, None) => None,
    };

    Ok(merge(
        &Settings::builtin(),
        file.as_ref(),
        &rules.overrides(vault),
    )?)
}

fn root_name(vault: &Path) -> Option<String> {
    let resolved = vault.canonicalize().unwrap_or_else(|_| vault.to_path_buf());
    resolved
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
}
