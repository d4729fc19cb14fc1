//! Run configuration: built-in defaults, the vault config file, and CLI
//! overrides, merged into one immutable [`Config`].
//!
//! Merging is a pure reducer ([`merge`]): each layer is read, never
//! mutated, and the result is a fresh value. List-valued settings extend
//! the lower layer; scalar settings replace it. Precedence is
//! CLI > file > defaults.
//!
//! The config file lives at the vault root as `.heading-config.toml` or
//! `.heading-config.yaml`:
//!
//! ```toml
//! daily_note_patterns = ["work/daily/"]
//! template_directories = ["shared/templates/"]
//! exclude_patterns = ["private", "*.tmp"]
//!
//! [title_case]
//! enabled = true
//! preserve_terms = ["PhD", "GitHub"]
//! ```

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::pattern::{compile_all, PathPattern};

/// Frontmatter field the label is written to.
pub const DEFAULT_FIELD: &str = "heading";

pub const DEFAULT_SUMMARY_SUFFIX: &str = "-summary";

/// Config file names looked up at the vault root, in order.
pub const CONFIG_FILE_NAMES: [&str; 3] = [
    ".heading-config.toml",
    ".heading-config.yaml",
    ".heading-config.yml",
];

const DEFAULT_DAILY_NOTE_PATTERNS: [&str; 4] = [
    "00-INBOX/daily-notes/",
    "99-ARCHIVE/????/??-*/",
    "daily-notes/",
    "journal/",
];

const DEFAULT_TEMPLATE_PATTERNS: [&str; 3] = ["04-TEMPLATES/", "templates/", "template/"];

const DEFAULT_PRESERVE_TERMS: [&str; 34] = [
    "API", "APIs", "UI", "UX", "CSS", "HTML", "JS", "JSON", "YAML", "XML", "SQL", "HTTP", "HTTPS",
    "URL", "URI", "ID", "iOS", "macOS", "IDE", "CLI", "GUI", "REST", "GraphQL", "OAuth", "JWT",
    "PDF", "PNG", "JPG", "GIF", "SVG", "MP3", "MP4", "ZIP", "README",
];

/// Directories that are never walked or rewritten.
const ALWAYS_EXCLUDED_DIRS: [&str; 1] = [".obsidian"];

/// Fully merged, immutable configuration for one run.
///
/// Every component receives it by reference; nothing mutates it after
/// [`merge`] returns.
#[derive(Debug, Clone)]
pub struct Config {
    pub field: String,
    pub daily_note_patterns: Vec<PathPattern>,
    pub summary_suffix: String,
    pub template_patterns: Vec<PathPattern>,
    pub title_case: bool,
    /// Keep the filename casing for the default rule even with title case on.
    pub preserve_case: bool,
    pub skip_existing: bool,
    pub preserved_terms: PreservedTerms,
    pub excludes: ExcludeRules,
    /// Name used as the parent folder for files at the vault root.
    pub root_name: Option<String>,
}

impl Config {
    /// Built-in defaults with no file or CLI layer applied.
    pub fn builtin() -> Result<Self, ConfigError> {
        merge(&Settings::builtin(), None, &CliOverrides::default())
    }
}

/// Case-insensitive lookup table from a token to its canonical casing.
#[derive(Debug, Clone, Default)]
pub struct PreservedTerms {
    by_lower: HashMap<String, String>,
}

impl PreservedTerms {
    /// Later terms win when two share the same lower-cased form.
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut by_lower = HashMap::new();
        for term in terms {
            let term = term.as_ref().trim();
            if term.is_empty() {
                continue;
            }
            by_lower.insert(term.to_lowercase(), term.to_string());
        }
        Self { by_lower }
    }

    pub fn lookup(&self, token: &str) -> Option<&str> {
        self.by_lower.get(&token.to_lowercase()).map(String::as_str)
    }
}

/// Exclusion rules shared by the tree walker and the rewriter.
///
/// Plain names match as substrings of the relative directory path; anything
/// containing glob metacharacters is matched against the relative file path
/// with `globset`.
#[derive(Debug, Clone)]
pub struct ExcludeRules {
    names: Vec<String>,
    globs: GlobSet,
}

impl ExcludeRules {
    pub fn new(patterns: &[String]) -> Result<Self, ConfigError> {
        let mut names = Vec::new();
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            if is_glob(pattern) {
                let glob = Glob::new(pattern).map_err(|source| ConfigError::InvalidGlob {
                    pattern: pattern.clone(),
                    source,
                })?;
                builder.add(glob);
            } else {
                names.push(pattern.trim_matches('/').to_string());
            }
        }
        let globs = builder.build().map_err(|source| ConfigError::InvalidGlob {
            pattern: patterns.join(","),
            source,
        })?;

        Ok(Self { names, globs })
    }

    /// Whether a directory (relative to the vault root) should be pruned.
    pub fn is_excluded_dir(&self, rel_dir: &str) -> bool {
        let rel_dir = rel_dir.replace('\\', "/");
        if rel_dir
            .split('/')
            .any(|segment| ALWAYS_EXCLUDED_DIRS.contains(&segment))
        {
            return true;
        }
        !rel_dir.is_empty()
            && self
                .names
                .iter()
                .any(|name| !name.is_empty() && rel_dir.contains(name.as_str()))
    }

    /// Whether a document (relative path including file name) is excluded.
    pub fn is_excluded(&self, rel_path: &str) -> bool {
        let rel_path = rel_path.replace('\\', "/");
        let dir = rel_path.rsplit_once('/').map(|(d, _)| d).unwrap_or("");
        self.is_excluded_dir(dir) || self.globs.is_match(&rel_path)
    }
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '[', '{'])
}

/// One layer of un-compiled settings. The built-in defaults are a
/// `Settings`; the file and CLI layers are folded onto it.
#[derive(Debug, Clone)]
pub struct Settings {
    pub field: String,
    pub daily_note_patterns: Vec<String>,
    pub summary_suffix: String,
    pub template_patterns: Vec<String>,
    pub title_case: bool,
    pub preserve_case: bool,
    pub skip_existing: bool,
    pub preserve_terms: Vec<String>,
    pub exclude_patterns: Vec<String>,
    pub root_name: Option<String>,
}

impl Settings {
    pub fn builtin() -> Self {
        Self {
            field: DEFAULT_FIELD.to_string(),
            daily_note_patterns: DEFAULT_DAILY_NOTE_PATTERNS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            summary_suffix: DEFAULT_SUMMARY_SUFFIX.to_string(),
            template_patterns: DEFAULT_TEMPLATE_PATTERNS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            title_case: false,
            preserve_case: false,
            skip_existing: true,
            preserve_terms: DEFAULT_PRESERVE_TERMS.iter().map(|s| s.to_string()).collect(),
            exclude_patterns: Vec::new(),
            root_name: None,
        }
    }

    fn with_file(mut self, file: &FileConfig) -> Self {
        if let Some(field) = &file.field {
            self.field = field.clone();
        }
        self.daily_note_patterns
            .extend(file.daily_note_patterns.iter().cloned());
        if let Some(suffix) = &file.summary_suffix {
            self.summary_suffix = suffix.clone();
        }
        self.template_patterns
            .extend(file.template_directories.iter().cloned());
        if let Some(enabled) = file.title_case.enabled {
            self.title_case = enabled;
        }
        self.preserve_terms
            .extend(file.title_case.preserve_terms.iter().cloned());
        if let Some(preserve_case) = file.preserve_case {
            self.preserve_case = preserve_case;
        }
        if let Some(skip_existing) = file.skip_existing {
            self.skip_existing = skip_existing;
        }
        self.exclude_patterns
            .extend(file.exclude_patterns.iter().cloned());
        self
    }

    fn with_cli(mut self, cli: &CliOverrides) -> Self {
        if let Some(field) = &cli.field {
            self.field = field.clone();
        }
        if let Some(suffix) = &cli.summary_suffix {
            self.summary_suffix = suffix.clone();
        }
        if let Some(title_case) = cli.title_case {
            self.title_case = title_case;
        }
        if let Some(preserve_case) = cli.preserve_case {
            self.preserve_case = preserve_case;
        }
        if let Some(skip_existing) = cli.skip_existing {
            self.skip_existing = skip_existing;
        }
        self.daily_note_patterns
            .extend(cli.include_patterns.iter().cloned());
        self.exclude_patterns.extend(cli.exclude_dirs.iter().cloned());
        if cli.root_name.is_some() {
            self.root_name = cli.root_name.clone();
        }
        self
    }
}

/// Contents of `.heading-config.{toml,yaml}`. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct FileConfig {
    pub field: Option<String>,
    pub daily_note_patterns: Vec<String>,
    pub template_directories: Vec<String>,
    pub summary_suffix: Option<String>,
    pub exclude_patterns: Vec<String>,
    pub skip_existing: Option<bool>,
    pub preserve_case: Option<bool>,
    pub title_case: TitleCaseSection,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct TitleCaseSection {
    pub enabled: Option<bool>,
    pub preserve_terms: Vec<String>,
}

/// Values supplied on the command line. `None` / empty means "not given".
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub field: Option<String>,
    pub summary_suffix: Option<String>,
    pub title_case: Option<bool>,
    pub preserve_case: Option<bool>,
    pub skip_existing: Option<bool>,
    /// Extra daily-note patterns.
    pub include_patterns: Vec<String>,
    pub exclude_dirs: Vec<String>,
    pub root_name: Option<String>,
}

/// Fold the three layers into a compiled [`Config`].
pub fn merge(
    defaults: &Settings,
    file: Option<&FileConfig>,
    cli: &CliOverrides,
) -> Result<Config, ConfigError> {
    let mut settings = defaults.clone();
    if let Some(file) = file {
        settings = settings.with_file(file);
    }
    let settings = settings.with_cli(cli);

    let field = settings.field.trim().to_string();
    if field.is_empty() {
        return Err(ConfigError::EmptyField);
    }

    Ok(Config {
        field,
        daily_note_patterns: compile_all(&settings.daily_note_patterns)?,
        summary_suffix: settings.summary_suffix,
        template_patterns: compile_all(&settings.template_patterns)?,
        title_case: settings.title_case,
        preserve_case: settings.preserve_case,
        skip_existing: settings.skip_existing,
        preserved_terms: PreservedTerms::new(&settings.preserve_terms),
        excludes: ExcludeRules::new(&settings.exclude_patterns)?,
        root_name: settings.root_name,
    })
}

/// Split a comma-separated CLI value, trimming items and dropping empties.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// First config file present at the vault root, if any.
pub fn find_config_file(vault: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| vault.join(name))
        .find(|path| path.is_file())
}

/// Read and parse a config file; the format follows the extension.
pub fn load_config_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "toml" => toml::from_str(&content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        }),
        "yaml" | "yml" => {
            // An empty YAML document deserializes as null.
            if content.trim().is_empty() {
                return Ok(FileConfig::default());
            }
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
                path: path.to_path_buf(),
                source,
            })
        }
        _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    }
}
