//! Line-oriented data file format.
//!
//! The data file is UTF-8 text holding one JSON document per line. Blank
//! lines are ignored. A line that is not valid UTF-8, does not parse, is
//! not an object, or has no usable `_id` is corrupted: strict mode fails on it, otherwise it is
//! quarantined in the [`LoadReport`] and skipped.

use crate::error::{CoreError, CoreResult};
use crate::model::{self, ID_FIELD};
use folio_codec::{from_json_line, to_json_line, CodecError, Document, Value};
use tracing::warn;

/// Outcome of loading the data file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Number of documents in the table after the load.
    pub loaded: usize,
    /// Raw text of every line that could not be loaded, in file order.
    pub corrupted: Vec<String>,
}

impl LoadReport {
    /// Returns true if every non-blank line loaded.
    pub fn is_clean(&self) -> bool {
        self.corrupted.is_empty()
    }
}

/// Outcome of writing the data file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersistReport {
    /// Documents written.
    pub written: usize,
    /// Documents that could not be serialized and were left out.
    pub skipped: usize,
}

/// Parses every non-blank line of the raw file content.
///
/// Each line is checked for UTF-8 on its own, so a bad byte only ever
/// affects the line that holds it. Such a line is corrupted like any
/// other and is quarantined in lossy form.
///
/// Returns the documents in file order and the quarantined raw lines.
pub(crate) fn decode_lines(bytes: &[u8], strict: bool) -> CoreResult<(Vec<Document>, Vec<String>)> {
    let mut documents = Vec::new();
    let mut corrupted = Vec::new();

    for (index, raw) in bytes.split(|&b| b == b'\n').enumerate() {
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        let decoded = std::str::from_utf8(raw)
            .map_err(|e| format!("invalid UTF-8: {e}"))
            .and_then(|line| {
                if line.trim().is_empty() {
                    Ok(None)
                } else {
                    decode_line(line).map(Some)
                }
            });
        match decoded {
            Ok(Some(doc)) => documents.push(doc),
            Ok(None) => {}
            Err(reason) if strict => {
                return Err(CoreError::corruption(format!(
                    "line {}: {reason}",
                    index + 1
                )))
            }
            Err(reason) => {
                warn!(line = index + 1, %reason, "quarantining corrupted line");
                corrupted.push(String::from_utf8_lossy(raw).into_owned());
            }
        }
    }
    Ok((documents, corrupted))
}

fn decode_line(line: &str) -> Result<Document, String> {
    let doc = from_json_line(line).map_err(|e: CodecError| e.to_string())?;
    match doc.get(ID_FIELD) {
        Some(Value::String(id)) if !id.is_empty() => {}
        Some(_) => return Err("`_id` is not a non-empty string".to_string()),
        None => return Err("document has no `_id`".to_string()),
    }
    if model::has_illegal_field_names(&doc) {
        return Err("document contains an illegal field name".to_string());
    }
    Ok(doc)
}

/// Serializes documents one per line, newline-joined.
///
/// Strict mode fails on the first document that cannot be serialized.
/// Otherwise that document is skipped and counted.
pub(crate) fn encode_documents<'a>(
    documents: impl IntoIterator<Item = &'a Document>,
    strict: bool,
) -> CoreResult<(String, PersistReport)> {
    let mut lines = Vec::new();
    let mut report = PersistReport::default();

    for doc in documents {
        match to_json_line(doc) {
            Ok(line) => {
                lines.push(line);
                report.written += 1;
            }
            Err(e) => {
                let id = doc.get(ID_FIELD).and_then(Value::as_str).unwrap_or("?");
                if strict {
                    return Err(CoreError::corruption(format!(
                        "document `{id}` cannot be serialized: {e}"
                    )));
                }
                warn!(id, error = %e, "skipping unserializable document");
                report.skipped += 1;
            }
        }
    }
    Ok((lines.join("\n"), report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        Value::from(value).into_document().unwrap()
    }

    #[test]
    fn blank_lines_are_ignored() {
        let text = "\n{\"_id\":\"a\"}\n   \r\n{\"_id\":\"b\",\"n\":1}\r\n";
        let (docs, corrupted) = decode_lines(text.as_bytes(), true).unwrap();
        assert_eq!(docs.len(), 2);
        assert!(corrupted.is_empty());
        assert_eq!(docs[1], doc(json!({"_id": "b", "n": 1})));
    }

    #[test]
    fn malformed_lines_are_quarantined() {
        let text = "{\"_id\":\"a\"}\n{not json\n{\"_id\":\"b\"}";
        let (docs, corrupted) = decode_lines(text.as_bytes(), false).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(corrupted, vec!["{not json".to_string()]);
    }

    #[test]
    fn malformed_lines_fail_in_strict_mode() {
        let text = "{\"_id\":\"a\"}\n{not json";
        let err = decode_lines(text.as_bytes(), true).unwrap_err();
        assert!(matches!(err, CoreError::Corruption { .. }));
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn lines_without_usable_ids_are_corrupted() {
        let text = "{\"name\":\"x\"}\n{\"_id\":3}\n{\"_id\":\"\"}\n[1,2]\n\"text\"\n{\"_id\":\"a\",\"$x\":1}";
        let (docs, corrupted) = decode_lines(text.as_bytes(), false).unwrap();
        assert!(docs.is_empty());
        assert_eq!(corrupted.len(), 6);
    }

    #[test]
    fn invalid_utf8_corrupts_only_its_line() {
        let bytes = b"{\"_id\":\"a\",\"n\":\"x\xffy\"}\n{\"_id\":\"b\"}\n\xff\xfe\n";
        let (docs, corrupted) = decode_lines(bytes, false).unwrap();
        assert_eq!(docs, vec![doc(json!({"_id": "b"}))]);
        assert_eq!(
            corrupted,
            vec![
                "{\"_id\":\"a\",\"n\":\"x\u{fffd}y\"}".to_string(),
                "\u{fffd}\u{fffd}".to_string(),
            ]
        );

        let err = decode_lines(bytes, true).unwrap_err();
        assert!(matches!(err, CoreError::Corruption { .. }));
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn encoding_joins_lines_without_trailing_newline() {
        let docs = [doc(json!({"_id": "a", "n": 6})), doc(json!({"_id": "b"}))];
        let (text, report) = encode_documents(&docs, true).unwrap();
        assert_eq!(text, "{\"_id\":\"a\",\"n\":6}\n{\"_id\":\"b\"}");
        assert_eq!(report, PersistReport { written: 2, skipped: 0 });
    }

    #[test]
    fn unserializable_documents_are_skipped_unless_strict() {
        let mut bad = doc(json!({"_id": "bad"}));
        bad.insert("n", f64::NAN);
        let docs = [doc(json!({"_id": "a"})), bad];

        let (text, report) = encode_documents(&docs, false).unwrap();
        assert_eq!(text, "{\"_id\":\"a\"}");
        assert_eq!(report, PersistReport { written: 1, skipped: 1 });

        assert!(matches!(
            encode_documents(&docs, true),
            Err(CoreError::Corruption { .. })
        ));
    }

    #[test]
    fn empty_table_encodes_to_empty_text() {
        let (text, report) = encode_documents(std::iter::empty(), true).unwrap();
        assert!(text.is_empty());
        assert_eq!(report.written, 0);
    }
}
