//! Segment-wise path pattern matching.
//!
//! Patterns and paths are both split on `/` and compared segment by
//! segment, ignoring ASCII case:
//!
//! | Pattern element | Matches |
//! |-----------------|---------|
//! | `*` (whole segment) | one or more whole segments |
//! | `**` (whole segment) | zero or more whole segments |
//! | `?` inside a segment | exactly one character |
//! | `*` inside a segment | zero or more characters of that segment |
//!
//! A pattern ending in `/` is a directory-prefix pattern: it matches when its
//! segments line up with a contiguous run of directories anywhere in the
//! path. Any other pattern must match the whole directory path.

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// `*`: one or more segments.
    OneOrMore,
    /// `**`: zero or more segments.
    ZeroOrMore,
    /// Literal or wildcard text within a single segment, lower-cased.
    Text(Vec<char>),
}

/// A compiled directory pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    source: String,
    segments: Vec<Segment>,
    anywhere: bool,
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Result<Self, ConfigError> {
        let normalized = pattern.trim().replace('\\', "/");
        let anywhere = normalized.ends_with('/');
        let body = normalized.trim_start_matches("./").trim_start_matches('/');

        let segments: Vec<Segment> = body
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| match s {
                "*" => Segment::OneOrMore,
                "**" => Segment::ZeroOrMore,
                text => Segment::Text(text.to_lowercase().chars().collect()),
            })
            .collect();

        if segments.is_empty() {
            return Err(ConfigError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: "pattern has no path segments".to_string(),
            });
        }

        Ok(Self {
            source: pattern.to_string(),
            segments,
            anywhere,
        })
    }

    /// The pattern as written in configuration.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Match against a directory path given as its segments.
    pub fn matches_dir(&self, dir: &[&str]) -> bool {
        let lowered: Vec<Vec<char>> = dir
            .iter()
            .map(|s| s.to_lowercase().chars().collect())
            .collect();
        if self.anywhere {
            (0..=lowered.len())
                .any(|start| match_segments(&self.segments, &lowered[start..], true))
        } else {
            match_segments(&self.segments, &lowered, false)
        }
    }
}

/// Compile a list of pattern strings, keeping their order.
pub fn compile_all(patterns: &[String]) -> Result<Vec<PathPattern>, ConfigError> {
    patterns.iter().map(|p| PathPattern::parse(p)).collect()
}

fn match_segments(pattern: &[Segment], path: &[Vec<char>], prefix: bool) -> bool {
    let Some((head, rest)) = pattern.split_first() else {
        return prefix || path.is_empty();
    };

    match head {
        Segment::OneOrMore => (1..=path.len()).any(|k| match_segments(rest, &path[k..], prefix)),
        Segment::ZeroOrMore => (0..=path.len()).any(|k| match_segments(rest, &path[k..], prefix)),
        Segment::Text(text) => match path.split_first() {
            Some((first, remaining)) => {
                match_within_segment(text, first) && match_segments(rest, remaining, prefix)
            }
            None => false,
        },
    }
}

/// Wildcard match inside one segment: `?` is one char, `*` is any run.
fn match_within_segment(pattern: &[char], text: &[char]) -> bool {
    let (mut p, mut t) = (0usize, 0usize);
    let mut star: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && (pattern[p] == '?' || pattern[p] == text[t]) {
            p += 1;
            t += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            star = Some((p, t));
            p += 1;
        } else if let Some((sp, st)) = star {
            p = sp + 1;
            t = st + 1;
            star = Some((sp, st + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|c| *c == '*')
}
