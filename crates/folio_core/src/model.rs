//! Document model validation.
//!
//! These predicates are the only gate the write paths use to accept or
//! reject input. Insert and update apply them identically.

use folio_codec::{Document, Value};

/// Name of the identifier field every stored document carries.
pub const ID_FIELD: &str = "_id";

/// Update keywords, in the order their effects are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierKind {
    /// `$set`: assign a field.
    Set,
    /// `$add`: add to a numeric field.
    Add,
    /// `$push`: append to a sequence field.
    Push,
}

impl ModifierKind {
    /// All modifier kinds in application order.
    pub const ALL: [ModifierKind; 3] = [ModifierKind::Set, ModifierKind::Add, ModifierKind::Push];

    /// Resolves a reserved top-level update key.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "$set" => Some(Self::Set),
            "$add" => Some(Self::Add),
            "$push" => Some(Self::Push),
            _ => None,
        }
    }

    /// Returns the keyword as written in an update.
    pub fn key(self) -> &'static str {
        match self {
            Self::Set => "$set",
            Self::Add => "$add",
            Self::Push => "$push",
        }
    }
}

/// True iff the value is a document.
pub fn is_plain_object(value: &Value) -> bool {
    value.is_document()
}

/// True iff the value is a document with no fields.
pub fn is_empty_object(value: &Value) -> bool {
    value.as_document().is_some_and(Document::is_empty)
}

/// True iff a name may be used as a stored field name.
///
/// `.` is the path separator and a leading `$` marks operators.
pub fn is_legal_field_name(name: &str) -> bool {
    !name.contains('.') && !name.starts_with('$')
}

/// True iff the value is not a document or holds an illegal field name.
///
/// Field names are checked recursively through nested documents but not
/// through array elements. `Value` has no representation for an absent
/// value, so that part of the rule cannot be violated.
pub fn is_invalid_document(value: &Value) -> bool {
    match value.as_document() {
        Some(doc) => has_illegal_field_names(doc),
        None => true,
    }
}

pub(crate) fn has_illegal_field_names(doc: &Document) -> bool {
    doc.iter().any(|(name, value)| {
        !is_legal_field_name(name)
            || value
                .as_document()
                .is_some_and(has_illegal_field_names)
    })
}

/// True iff the update is a document with at least one modifier key.
pub fn has_modifiers(update: &Value) -> bool {
    update
        .as_document()
        .is_some_and(|doc| doc.keys().any(|k| ModifierKind::from_key(k).is_some()))
}

/// True iff the update mixes modifier keys with plain field keys.
pub fn has_mixed_modifiers(update: &Value) -> bool {
    let Some(doc) = update.as_document() else {
        return false;
    };
    let reserved = doc.keys().filter(|k| ModifierKind::from_key(k).is_some()).count();
    reserved > 0 && reserved < doc.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn v(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    #[test]
    fn plain_and_empty_objects() {
        assert!(is_plain_object(&v(json!({"a": 1}))));
        assert!(!is_plain_object(&v(json!([1]))));
        assert!(!is_plain_object(&Value::Null));
        assert!(!is_plain_object(&v(json!("text"))));

        assert!(is_empty_object(&v(json!({}))));
        assert!(!is_empty_object(&v(json!({"a": 1}))));
        assert!(!is_empty_object(&v(json!([]))));
    }

    #[test]
    fn field_names_with_dots_or_dollars_are_invalid() {
        assert!(!is_invalid_document(&v(json!({"name": "x", "_id": "k"}))));
        assert!(is_invalid_document(&v(json!({"a.b": 1}))));
        assert!(is_invalid_document(&v(json!({"$set": 1}))));
        assert!(!is_invalid_document(&v(json!({"price$": 1}))));
    }

    #[test]
    fn nested_documents_are_checked_but_arrays_are_not() {
        assert!(is_invalid_document(&v(json!({"outer": {"inner": {"$x": 1}}}))));
        assert!(!is_invalid_document(&v(json!({"list": [{"$x": 1}, {"a.b": 2}]}))));
    }

    #[test]
    fn non_documents_are_invalid() {
        assert!(is_invalid_document(&v(json!([]))));
        assert!(is_invalid_document(&v(json!(3))));
        assert!(is_invalid_document(&Value::Null));
    }

    #[test]
    fn modifier_detection() {
        assert!(has_modifiers(&v(json!({"$set": {"a": 1}}))));
        assert!(has_modifiers(&v(json!({"$add": {"a": 1}, "$push": {"b": 2}}))));
        assert!(!has_modifiers(&v(json!({"a": 1}))));
        assert!(!has_modifiers(&v(json!({"$unknown": {"a": 1}}))));
        assert!(!has_modifiers(&v(json!([{"$set": {}}]))));
    }

    #[test]
    fn mixed_modifier_detection() {
        assert!(has_mixed_modifiers(&v(json!({"$set": {"a": 1}, "b": 2}))));
        assert!(!has_mixed_modifiers(&v(json!({"$set": {"a": 1}}))));
        assert!(!has_mixed_modifiers(&v(json!({"b": 2}))));
        assert!(!has_mixed_modifiers(&v(json!({}))));
    }

    #[test]
    fn modifier_kinds_roundtrip_keys() {
        for kind in ModifierKind::ALL {
            assert_eq!(ModifierKind::from_key(kind.key()), Some(kind));
        }
        assert_eq!(ModifierKind::from_key("$inc"), None);
    }
}
