//! Query and update test vectors.
//!
//! Vectors are plain JSON so they can be shared with other tooling that
//! reads Folio data files.

use folio_core::{Document, Value};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// A query evaluated against one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryVector {
    /// Unique identifier for this vector.
    pub id: String,
    /// Human-readable description.
    pub description: String,
    /// The document under test.
    pub document: serde_json::Value,
    /// The query expression.
    pub query: serde_json::Value,
    /// Whether the document matches.
    pub expected: bool,
}

/// An update applied to one stored document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateVector {
    /// Unique identifier for this vector.
    pub id: String,
    /// Human-readable description.
    pub description: String,
    /// The stored document, including `_id`.
    pub document: serde_json::Value,
    /// The update argument.
    pub update: serde_json::Value,
    /// The resulting document, or `None` if the update is rejected.
    pub expected: Option<serde_json::Value>,
}

/// Converts a JSON object into a document.
///
/// # Panics
///
/// Panics if `value` is not a JSON object.
pub fn document(value: serde_json::Value) -> Document {
    Value::from(value)
        .into_document()
        .expect("test vector value is not an object")
}

/// The three sample documents used throughout the tests.
///
/// Two have `type: "normal"` and one has `type: "strong"`; none has an
/// `_id`.
pub fn sample_documents() -> Vec<Document> {
    vec![
        document(json!({"type": "normal", "important": false, "variants": ["weak", "strong"]})),
        document(json!({"type": "normal", "important": true, "variants": ["weak", "strong"]})),
        document(json!({"type": "strong", "important": false, "variants": ["weak", "strong"]})),
    ]
}

fn query(id: &str, description: &str, doc: serde_json::Value, q: serde_json::Value, expected: bool) -> QueryVector {
    QueryVector {
        id: id.into(),
        description: description.into(),
        document: doc,
        query: q,
        expected,
    }
}

/// Query matching vectors.
pub fn query_vectors() -> Vec<QueryVector> {
    let sample = json!({"type": "normal", "important": false, "variants": ["weak", "strong"]});
    let nested = json!({"properties": {"type": "weak", "parent": 3}, "tags": ["a", "b"], "title": "Hello World"});
    vec![
        query("empty", "Empty query matches anything", sample.clone(), json!({}), true),
        query("eq_scalar", "Scalar equality", sample.clone(), json!({"type": "normal"}), true),
        query("eq_scalar_miss", "Scalar inequality", sample.clone(), json!({"type": "strong"}), false),
        query("eq_and", "All keys must hold", sample.clone(), json!({"type": "normal", "important": true}), false),
        query("eq_seq", "Sequence equality", sample.clone(), json!({"variants": ["weak", "strong"]}), true),
        query("eq_seq_order", "Sequence order matters", sample.clone(), json!({"variants": ["strong", "weak"]}), false),
        query("eq_seq_len", "Sequence length matters", sample.clone(), json!({"variants": ["weak"]}), false),
        query("path_doc", "Dot path into a document", nested.clone(), json!({"properties.type": "weak"}), true),
        query("path_doc_miss", "Dot path value differs", nested.clone(), json!({"properties.parent": 4}), false),
        query("path_index", "Numeric segment", nested.clone(), json!({"tags.1": "b"}), true),
        query("path_bracket", "Bracket index", nested.clone(), json!({"tags[0]": "a"}), true),
        query("path_missing", "Unresolvable path", nested.clone(), json!({"nope.deeper": null}), false),
        query("gt", "Greater than", nested.clone(), json!({"$gt": {"properties.parent": 2}}), true),
        query("lte_string", "String ordering", nested.clone(), json!({"$lte": {"title": "Hello"}}), false),
        query("gt_mismatch", "Mismatched types never order", nested.clone(), json!({"$gt": {"title": 1}}), false),
        query("not", "Not equal", sample.clone(), json!({"$not": {"important": true}}), true),
        query("not_absent", "Not on an absent field", sample.clone(), json!({"$not": {"missing": true}}), false),
        query("string", "Case-insensitive substring", nested.clone(), json!({"$string": {"title": "world"}}), true),
        query("string_strict", "Case-sensitive substring", nested.clone(), json!({"$stringStrict": {"title": "world"}}), false),
        query("exists", "Path exists", nested.clone(), json!({"$exists": ["properties.parent", "tags.0"]}), true),
        query("exists_miss", "Path missing", nested.clone(), json!({"$exists": "tags.2"}), false),
        query("has", "Sequence contains", sample.clone(), json!({"$has": {"variants": "strong"}}), true),
        query("has_scalar", "Has on a scalar field", sample.clone(), json!({"$has": {"type": "normal"}}), false),
        query("some", "Any sub-query", sample.clone(), json!({"$some": [{"type": "strong"}, {"important": false}]}), true),
        query("some_none", "No sub-query", sample, json!({"$some": [{"type": "strong"}, {"important": true}]}), false),
    ]
}

fn update(id: &str, description: &str, doc: serde_json::Value, u: serde_json::Value, expected: Option<serde_json::Value>) -> UpdateVector {
    UpdateVector {
        id: id.into(),
        description: description.into(),
        document: doc,
        update: u,
        expected,
    }
}

/// Update vectors.
pub fn update_vectors() -> Vec<UpdateVector> {
    let counter = json!({"_id": "a", "count": 3, "tags": ["x"]});
    vec![
        update("add", "Add to a number", counter.clone(), json!({"$add": {"count": 3}}), Some(json!({"_id": "a", "count": 6, "tags": ["x"]}))),
        update("add_absent", "Add defaults to zero", counter.clone(), json!({"$add": {"other": -1}}), Some(json!({"_id": "a", "count": 3, "tags": ["x"], "other": -1}))),
        update("push", "Push appends", counter.clone(), json!({"$push": {"tags": "y"}}), Some(json!({"_id": "a", "count": 3, "tags": ["x", "y"]}))),
        update("set", "Set overwrites", counter.clone(), json!({"$set": {"count": "three"}}), Some(json!({"_id": "a", "count": "three", "tags": ["x"]}))),
        update("order", "Set, then add, then push", counter.clone(), json!({"$push": {"tags": "z"}, "$add": {"count": 1}, "$set": {"count": 10, "tags": []}}), Some(json!({"_id": "a", "count": 11, "tags": ["z"]}))),
        update("replace", "Replacement drops old fields", counter.clone(), json!({"name": "fresh"}), Some(json!({"_id": "a", "name": "fresh"}))),
        update("replace_same_id", "Replacement may repeat the id", counter.clone(), json!({"_id": "a"}), Some(json!({"_id": "a"}))),
        update("replace_other_id", "Replacement may not change the id", counter.clone(), json!({"_id": "x", "field": 1}), None),
        update("set_other_id", "Set may not change the id", counter.clone(), json!({"$set": {"_id": "x"}}), None),
        update("mixed", "Modifiers and fields cannot mix", counter.clone(), json!({"$set": {"a": 1}, "b": 2}), None),
        update("add_string", "Add needs a number", counter.clone(), json!({"$add": {"tags": 1}}), None),
        update("push_scalar", "Push needs a sequence", counter.clone(), json!({"$push": {"count": 1}}), None),
        update("dotted", "Modifiers address top-level fields", counter, json!({"$set": {"a.b": 1}}), None),
    ]
}
