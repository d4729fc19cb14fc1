//! Label text for each classification, with optional title-casing.

use regex::Regex;
use std::sync::LazyLock;

use crate::classify::Classification;
use crate::config::{Config, PreservedTerms};

/// Leading folder-ordering tag such as `01-`.
static ORG_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+-").unwrap());

pub fn synthesize(classification: &Classification, config: &Config) -> String {
    let tc = |text: &str| title_case_if_enabled(text, config);
    match classification {
        // Daily-note stems are dates; never title-cased.
        Classification::DailyNote { stem, .. } => format!("Daily Note {}", stem),
        Classification::Summary { base } => format!("{} - Summary", tc(base)),
        Classification::Template { stem, .. } => format!("Template: {}", stem),
        Classification::Index { parent } => format!("{} - Index", tc(parent)),
        Classification::Readme { parent } => format!("{} - README", tc(parent)),
        Classification::Default { stem } => {
            if config.preserve_case {
                stem.clone()
            } else {
                tc(stem)
            }
        }
    }
}

pub fn title_case_if_enabled(text: &str, config: &Config) -> String {
    if config.title_case {
        title_case(text, &config.preserved_terms)
    } else {
        text.to_string()
    }
}

/// Strip an organizational prefix, split on `-`, `_` and whitespace, and
/// capitalize each token. Tokens matching a preserved term as a whole are
/// emitted in the term's canonical casing.
pub fn title_case(text: &str, preserved: &PreservedTerms) -> String {
    let text = ORG_PREFIX_RE.replace(text.trim(), "");
    text.split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| match preserved.lookup(token) {
            Some(term) => term.to_string(),
            None => capitalize(token),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
