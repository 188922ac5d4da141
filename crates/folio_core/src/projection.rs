//! Result projection.

use folio_codec::Document;

/// A top-level field allowlist applied to query results.
///
/// `_id` is only returned if it is listed. Listed fields that a document
/// lacks are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Projection {
    fields: Option<Vec<String>>,
}

impl Projection {
    /// Returns documents unchanged.
    #[must_use]
    pub fn all() -> Self {
        Self { fields: None }
    }

    /// Keeps only the named fields.
    pub fn fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: Some(fields.into_iter().map(Into::into).collect()),
        }
    }

    /// Returns true if documents pass through unchanged.
    pub fn is_all(&self) -> bool {
        self.fields.is_none()
    }

    /// Applies the projection.
    pub fn apply(&self, doc: &Document) -> Document {
        project(doc, self.fields.as_deref())
    }
}

/// Restricts `doc` to the named top-level fields, in the order named.
///
/// `None` returns a copy of `doc`.
pub fn project(doc: &Document, fields: Option<&[String]>) -> Document {
    let Some(fields) = fields else {
        return doc.clone();
    };
    let mut result = Document::with_capacity(fields.len());
    for name in fields {
        if let Some(value) = doc.get(name) {
            result.insert(name.as_str(), value.clone());
        }
    }
    result
}
