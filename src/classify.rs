//! Path-based document classification.
//!
//! Rules are an ordered table of predicates evaluated first-match-wins:
//! daily note, summary, template, index, readme, and finally the default
//! rule, which always matches. Path rules use [`PathPattern`]s from the
//! config; filename rules compare the stem ignoring ASCII case.
//!
//! [`PathPattern`]: crate::pattern::PathPattern

use std::path::Path;

use crate::config::Config;

/// A document's location relative to the vault root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPath {
    /// Relative path with `/` separators.
    pub relative: String,
    /// Directory segments leading to the file.
    pub dirs: Vec<String>,
    pub file_name: String,
    /// File name without its final extension.
    pub stem: String,
}

impl DocumentPath {
    pub fn new(relative_path: &str) -> Self {
        let relative = relative_path.replace('\\', "/");
        let mut segments: Vec<String> = relative
            .split('/')
            .filter(|s| !s.is_empty() && *s != ".")
            .map(str::to_string)
            .collect();
        let file_name = segments.pop().unwrap_or_default();
        let stem = Path::new(&file_name)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| file_name.clone());

        Self {
            relative,
            dirs: segments,
            file_name,
            stem,
        }
    }

    pub fn dir_segments(&self) -> Vec<&str> {
        self.dirs.iter().map(String::as_str).collect()
    }

    /// Name of the directory that directly contains the file.
    pub fn parent_name(&self) -> Option<&str> {
        self.dirs.last().map(String::as_str)
    }
}

/// Which labeling rule applies, with the data the label needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    DailyNote { stem: String, pattern: String },
    Summary { base: String },
    /// `pattern` is `None` when the filename itself marked the template.
    Template { stem: String, pattern: Option<String> },
    Index { parent: String },
    Readme { parent: String },
    Default { stem: String },
}

impl Classification {
    /// Short rule name, used in reports.
    pub fn rule_name(&self) -> &'static str {
        match self {
            Classification::DailyNote { .. } => "daily-note",
            Classification::Summary { .. } => "summary",
            Classification::Template { .. } => "template",
            Classification::Index { .. } => "index",
            Classification::Readme { .. } => "readme",
            Classification::Default { .. } => "default",
        }
    }
}

type Rule = fn(&DocumentPath, &Config) -> Option<Classification>;

/// Rule precedence. Order is significant.
const RULES: [Rule; 6] = [
    daily_note_rule,
    summary_rule,
    template_rule,
    index_rule,
    readme_rule,
    default_rule,
];

pub fn classify(path: &DocumentPath, config: &Config) -> Classification {
    RULES
        .iter()
        .find_map(|rule| rule(path, config))
        .unwrap_or_else(|| Classification::Default {
            stem: path.stem.clone(),
        })
}

fn daily_note_rule(path: &DocumentPath, config: &Config) -> Option<Classification> {
    let dirs = path.dir_segments();
    config
        .daily_note_patterns
        .iter()
        .find(|p| p.matches_dir(&dirs))
        .map(|p| Classification::DailyNote {
            stem: path.stem.clone(),
            pattern: p.as_str().to_string(),
        })
}

fn summary_rule(path: &DocumentPath, config: &Config) -> Option<Classification> {
    strip_suffix_ignore_case(&path.stem, &config.summary_suffix).map(|base| {
        Classification::Summary {
            base: base.to_string(),
        }
    })
}

fn template_rule(path: &DocumentPath, config: &Config) -> Option<Classification> {
    let dirs = path.dir_segments();
    if let Some(p) = config.template_patterns.iter().find(|p| p.matches_dir(&dirs)) {
        return Some(Classification::Template {
            stem: path.stem.clone(),
            pattern: Some(p.as_str().to_string()),
        });
    }
    path.stem
        .to_lowercase()
        .contains("template")
        .then(|| Classification::Template {
            stem: path.stem.clone(),
            pattern: None,
        })
}

fn index_rule(path: &DocumentPath, config: &Config) -> Option<Classification> {
    path.stem
        .eq_ignore_ascii_case("index")
        .then(|| Classification::Index {
            parent: parent_or_root(path, config),
        })
}

fn readme_rule(path: &DocumentPath, config: &Config) -> Option<Classification> {
    path.stem
        .eq_ignore_ascii_case("readme")
        .then(|| Classification::Readme {
            parent: parent_or_root(path, config),
        })
}

fn default_rule(path: &DocumentPath, _config: &Config) -> Option<Classification> {
    Some(Classification::Default {
        stem: path.stem.clone(),
    })
}

/// Files at the vault root borrow the root folder's name; with none
/// configured the stem stands in.
fn parent_or_root(path: &DocumentPath, config: &Config) -> String {
    path.parent_name()
        .map(str::to_string)
        .or_else(|| config.root_name.clone())
        .unwrap_or_else(|| path.stem.clone())
}

fn strip_suffix_ignore_case<'a>(text: &'a str, suffix: &str) -> Option<&'a str> {
    if suffix.is_empty() || text.len() < suffix.len() {
        return None;
    }
    let split = text.len() - suffix.len();
    if !text.is_char_boundary(split) {
        return None;
    }
    let (base, tail) = text.split_at(split);
    tail.eq_ignore_ascii_case(suffix).then_some(base)
}
