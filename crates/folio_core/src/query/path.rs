//! Dot-path field references.

use crate::error::{CoreError, CoreResult};
use folio_codec::{Document, Value};
use std::fmt;

/// A parsed field path such as `properties.type`, `variants.0` or `variants[0]`.
///
/// Each segment indexes into the current value: a document by field name,
/// an array by numeric position. `a[1][2]` is shorthand for `a.1.2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    raw: String,
    segments: Vec<String>,
}

impl FieldPath {
    /// Parses a path.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for empty segments (`a..b`, a leading or
    /// trailing dot) and for malformed brackets (`a[`, `a[x]`, `a[0]b`).
    pub fn parse(raw: &str) -> CoreResult<Self> {
        let mut segments = Vec::new();
        for part in raw.split('.') {
            parse_part(raw, part, &mut segments)?;
        }
        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// Returns the path as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the normalized segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Resolves the path against a document.
    ///
    /// Returns `None` when any segment is missing, indexes out of range,
    /// or indexes into a scalar.
    pub fn resolve<'a>(&self, doc: &'a Document) -> Option<&'a Value> {
        let (first, rest) = self.segments.split_first()?;
        let mut current = doc.get(first)?;
        for segment in rest {
            current = step(current, segment)?;
        }
        Some(current)
    }
}

fn step<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Document(doc) => doc.get(segment),
        Value::Array(items) => array_index(segment).and_then(|i| items.get(i)),
        _ => None,
    }
}

/// Reads a segment as an array position. Only canonical decimal forms
/// count: `+1` and `01` name no position.
fn array_index(segment: &str) -> Option<usize> {
    let canonical = !segment.is_empty()
        && segment.bytes().all(|b| b.is_ascii_digit())
        && (segment == "0" || !segment.starts_with('0'));
    if canonical {
        segment.parse().ok()
    } else {
        None
    }
}

fn parse_part(raw: &str, part: &str, segments: &mut Vec<String>) -> CoreResult<()> {
    let invalid = |reason: &str| CoreError::invalid_argument(format!("invalid path `{raw}`: {reason}"));

    let (base, mut brackets) = match part.find('[') {
        Some(pos) => part.split_at(pos),
        None => (part, ""),
    };
    if base.is_empty() {
        return Err(invalid("empty segment"));
    }
    segments.push(base.to_string());

    while !brackets.is_empty() {
        let inner = brackets
            .strip_prefix('[')
            .ok_or_else(|| invalid("unexpected text after index"))?;
        let close = inner.find(']').ok_or_else(|| invalid("unclosed `[`"))?;
        let index = &inner[..close];
        if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("index must be a non-negative integer"));
        }
        segments.push(index.to_string());
        brackets = &inner[close + 1..];
    }
    Ok(())
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
