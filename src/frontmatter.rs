//! Frontmatter (metadata block) parsing and serialization.
//!
//! A document may open with a line containing exactly `---`, followed by a
//! YAML mapping and a closing `---` line. Everything after the closing line
//! is the body and is carried through untouched.
//!
//! Parsing never fails: the result records which of four states the block
//! was in ([`BlockState`]). Field order is kept because
//! [`serde_yaml::Mapping`] preserves insertion order.

use serde_yaml::{Mapping, Value};
use thiserror::Error;

pub const DELIMITER: &str = "---";

/// How the metadata block looked in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockState {
    /// No opening delimiter, or an opening delimiter that is never closed.
    Absent,
    /// Delimiters present with nothing (or only whitespace/comments) between.
    Empty,
    /// Delimiters present but the content is not a YAML mapping.
    Malformed,
    /// Parsed mapping.
    Valid,
}

/// An ordered mapping of frontmatter fields plus its source state.
#[derive(Debug, Clone)]
pub struct MetadataBlock {
    pub fields: Mapping,
    pub state: BlockState,
    /// Line ending used by the opening delimiter; reused when re-emitting.
    pub newline: &'static str,
}

impl MetadataBlock {
    fn new(state: BlockState, newline: &'static str) -> Self {
        Self {
            fields: Mapping::new(),
            state,
            newline,
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// True when `field` is present with a value other than null or a
    /// blank string.
    pub fn has_value(&self, field: &str) -> bool {
        match self.get(field) {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.trim().is_empty(),
            Some(_) => true,
        }
    }

    /// Insert or overwrite `field`. An existing key keeps its position; a
    /// new key goes to the end.
    pub fn set(&mut self, field: &str, value: &str) {
        self.fields
            .insert(Value::String(field.to_string()), Value::String(value.to_string()));
    }
}

/// Result of splitting a document into metadata and body.
#[derive(Debug, Clone)]
pub struct ParsedDocument<'a> {
    pub block: MetadataBlock,
    pub body: &'a str,
    /// Text between the delimiters, when both were found.
    pub raw_span: Option<&'a str>,
    /// Parser message for [`BlockState::Malformed`].
    pub error: Option<String>,
}

#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("refusing to serialize a malformed metadata block")]
    Malformed,

    #[error("failed to render metadata: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Split `raw` into its metadata block and body.
pub fn parse(raw: &str) -> ParsedDocument<'_> {
    let absent = |newline| ParsedDocument {
        block: MetadataBlock::new(BlockState::Absent, newline),
        body: raw,
        raw_span: None,
        error: None,
    };

    let Some(first_end) = raw.find('\n') else {
        return absent("\n");
    };
    let first_line = &raw[..first_end];
    let newline = if first_line.ends_with('\r') { "\r\n" } else { "\n" };
    if first_line.trim_end_matches('\r') != DELIMITER {
        return absent("\n");
    }

    let span_start = first_end + 1;
    let mut pos = span_start;
    let (span_end, body_start) = loop {
        if pos >= raw.len() {
            return absent(newline);
        }
        let line_end = raw[pos..].find('\n').map(|i| pos + i);
        let line = &raw[pos..line_end.unwrap_or(raw.len())];
        if line.trim_end() == DELIMITER {
            break (pos, line_end.map(|e| e + 1).unwrap_or(raw.len()));
        }
        match line_end {
            Some(end) => pos = end + 1,
            None => return absent(newline),
        }
    };

    let span = &raw[span_start..span_end];
    let body = &raw[body_start..];
    let mut parsed = ParsedDocument {
        block: MetadataBlock::new(BlockState::Empty, newline),
        body,
        raw_span: Some(span),
        error: None,
    };

    let only_comments = span.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#')
    });
    if only_comments {
        return parsed;
    }

    match serde_yaml::from_str::<Value>(span) {
        Ok(Value::Mapping(fields)) => {
            parsed.block.fields = fields;
            parsed.block.state = BlockState::Valid;
        }
        Ok(Value::Null) => {}
        Ok(_) => {
            parsed.block.state = BlockState::Malformed;
            parsed.error = Some("metadata block is not a mapping".to_string());
        }
        Err(e) => {
            parsed.block.state = BlockState::Malformed;
            parsed.error = Some(e.to_string());
        }
    }

    parsed
}

/// Re-emit `block` followed by `body`.
///
/// Blocks that already existed are followed directly by the original text
/// after their closing delimiter. A block synthesized for a document that
/// had none gets a blank line between it and the body.
pub fn serialize(block: &MetadataBlock, body: &str) -> Result<String, SerializeError> {
    if block.state == BlockState::Malformed {
        return Err(SerializeError::Malformed);
    }

    let yaml = if block.fields.is_empty() {
        String::new()
    } else {
        serde_yaml::to_string(&block.fields)?
    };

    let nl = block.newline;
    let mut out = String::with_capacity(yaml.len() + body.len() + 16);
    out.push_str(DELIMITER);
    out.push_str(nl);
    for line in yaml.lines() {
        out.push_str(line);
        out.push_str(nl);
    }
    out.push_str(DELIMITER);
    out.push_str(nl);
    if block.state == BlockState::Absent {
        out.push_str(nl);
    }
    out.push_str(body);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_frontmatter() {
        let raw = "---\ntitle: Test Document\ntags: [test, sample]\n---\n\n# Main Content\n\nThis is the body.\n";
        let doc = parse(raw);
        assert_eq!(doc.block.state, BlockState::Valid);
        assert_eq!(
            doc.block.get("title"),
            Some(&Value::String("Test Document".into()))
        );
        let tags = doc.block.get("tags").unwrap().as_sequence().unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(doc.body, "\n# Main Content\n\nThis is the body.\n");
    }

    #[test]
    fn keys_keep_source_order() {
        let doc = parse("---\nzeta: 1\nalpha: 2\nmid: 3\n---\nbody");
        let keys: Vec<&str> = doc.block.fields.keys().filter_map(Value::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn no_frontmatter() {
        let raw = "# Main Content\n\nNo frontmatter here.\n";
        let doc = parse(raw);
        assert_eq!(doc.block.state, BlockState::Absent);
        assert!(doc.block.fields.is_empty());
        assert_eq!(doc.body, raw);
    }

    #[test]
    fn empty_input() {
        let doc = parse("");
        assert_eq!(doc.block.state, BlockState::Absent);
        assert_eq!(doc.body, "");
    }

    #[test]
    fn unclosed_opening_is_absent() {
        let raw = "---\ntitle: never closed\n\nbody text\n";
        let doc = parse(raw);
        assert_eq!(doc.block.state, BlockState::Absent);
        assert_eq!(doc.body, raw);
        assert!(doc.raw_span.is_none());
    }

    #[test]
    fn horizontal_rule_later_is_not_frontmatter() {
        let raw = "intro\n---\nmore\n";
        assert_eq!(parse(raw).block.state, BlockState::Absent);
    }

    #[test]
    fn empty_block() {
        let doc = parse("---\n---\nbody\n");
        assert_eq!(doc.block.state, BlockState::Empty);
        assert_eq!(doc.body, "body\n");

        let doc = parse("---\n   \n\n---\nbody\n");
        assert_eq!(doc.block.state, BlockState::Empty);
    }

    #[test]
    fn comment_only_block_is_empty() {
        let doc = parse("---\n# just a comment\n---\nbody\n");
        assert_eq!(doc.block.state, BlockState::Empty);
    }

    #[test]
    fn invalid_yaml_is_malformed() {
        let raw = "---\ntitle: Test Document\ninvalid: [unclosed bracket\n---\n\n# Main Content\n";
        let doc = parse(raw);
        assert_eq!(doc.block.state, BlockState::Malformed);
        assert!(doc.block.fields.is_empty());
        assert!(doc.error.is_some());
        assert_eq!(
            doc.raw_span,
            Some("title: Test Document\ninvalid: [unclosed bracket\n")
        );
    }

    #[test]
    fn non_mapping_is_malformed() {
        let doc = parse("---\n- one\n- two\n---\nbody");
        assert_eq!(doc.block.state, BlockState::Malformed);
        let doc = parse("---\njust a scalar\n---\nbody");
        assert_eq!(doc.block.state, BlockState::Malformed);
    }

    #[test]
    fn closing_delimiter_at_eof() {
        let doc = parse("---\ntitle: x\n---");
        assert_eq!(doc.block.state, BlockState::Valid);
        assert_eq!(doc.body, "");
    }

    #[test]
    fn crlf_line_endings() {
        let raw = "---\r\ntitle: Windows\r\n---\r\nbody\r\n";
        let doc = parse(raw);
        assert_eq!(doc.block.state, BlockState::Valid);
        assert_eq!(doc.block.newline, "\r\n");
        assert_eq!(doc.body, "body\r\n");

        let out = serialize(&doc.block, doc.body).unwrap();
        assert_eq!(out, raw);
    }

    #[test]
    fn serialize_existing_block_keeps_body() {
        let raw = "---\ntitle: Test\n---\n# Content\n\nThis is the body.";
        let mut doc = parse(raw);
        doc.block.set("heading", "New Heading");
        let out = serialize(&doc.block, doc.body).unwrap();
        assert_eq!(
            out,
            "---\ntitle: Test\nheading: New Heading\n---\n# Content\n\nThis is the body."
        );
    }

    #[test]
    fn serialize_absent_block_adds_blank_line() {
        let raw = "# Content\n";
        let mut doc = parse(raw);
        doc.block.set("heading", "note");
        let out = serialize(&doc.block, doc.body).unwrap();
        assert_eq!(out, "---\nheading: note\n---\n\n# Content\n");
    }

    #[test]
    fn serialize_quotes_values_that_need_it() {
        let mut doc = parse("body");
        doc.block.set("heading", "Template: project-template");
        let out = serialize(&doc.block, doc.body).unwrap();

        let reparsed = parse(&out);
        assert_eq!(reparsed.block.state, BlockState::Valid);
        assert_eq!(
            reparsed.block.get("heading"),
            Some(&Value::String("Template: project-template".into()))
        );
        assert!(!out.contains("heading: Template: project"));
    }

    #[test]
    fn reserialize_keeps_values_not_formatting() {
        let raw = "---\nflag: 'yes'\nver: 1.10\nnote: kept # trailing comment\n# own-line comment\n---\nbody";
        let mut doc = parse(raw);
        doc.block.set("heading", "x");
        let out = serialize(&doc.block, doc.body).unwrap();

        assert!(!out.contains("comment"));
        let before = parse(raw).block.fields;
        let after = parse(&out).block.fields;
        for (key, value) in &before {
            assert_eq!(after.get(key), Some(value), "value of {:?}", key);
        }
        assert_eq!(after.get("flag"), Some(&Value::String("yes".into())));
        assert!(out.ends_with("---\nbody"));
    }

    #[test]
    fn serialize_rejects_malformed() {
        let doc = parse("---\nbad: [\n---\nbody");
        assert!(matches!(
            serialize(&doc.block, doc.body),
            Err(SerializeError::Malformed)
        ));
    }

    #[test]
    fn set_existing_key_keeps_position() {
        let mut doc = parse("---\nheading: ''\ntitle: x\n---\n");
        assert!(!doc.block.has_value("heading"));
        doc.block.set("heading", "Filled");
        let keys: Vec<&str> = doc.block.fields.keys().filter_map(Value::as_str).collect();
        assert_eq!(keys, vec!["heading", "title"]);
        assert!(doc.block.has_value("heading"));
    }

    #[test]
    fn has_value_rules() {
        let doc = parse("---\na:\nb: ''\nc: 0\nd: text\n---\n");
        assert!(!doc.block.has_value("a"));
        assert!(!doc.block.has_value("b"));
        assert!(doc.block.has_value("c"));
        assert!(doc.block.has_value("d"));
        assert!(!doc.block.has_value("missing"));
    }
}
