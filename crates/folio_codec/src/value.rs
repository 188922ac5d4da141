//! Dynamic document value type.

use crate::document::Document;
use std::cmp::Ordering;

/// A dynamic document value.
///
/// This is the full set of shapes a field may hold. There is no
/// "undefined" variant: a field is either present with one of these
/// values or it is not present at all.
///
/// Equality is deep and structural. Numbers compare numerically, arrays
/// compare element-wise in order, and documents compare by key set and
/// per-key value regardless of field order.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value (integers and floats share one representation).
    Number(f64),
    /// Text string (UTF-8).
    String(String),
    /// Ordered sequence of values.
    Array(Vec<Value>),
    /// Nested document.
    Document(Document),
}

impl Value {
    /// Orders two values when they are of the same orderable type.
    ///
    /// Numbers order numerically and strings lexicographically. Every other
    /// combination, including a number against a string, is unordered.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Returns a short name for the value's type, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Document(_) => "document",
        }
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if this value is a document.
    pub fn is_document(&self) -> bool {
        matches!(self, Value::Document(_))
    }

    /// Get this value as a boolean, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get this value as a number, if it is one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get this value as a string slice, if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get this value as an array, if it is one.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Get this value as a document, if it is one.
    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Value::Document(d) => Some(d),
            _ => None,
        }
    }

    /// Consume this value, returning the document it holds.
    pub fn into_document(self) -> Option<Document> {
        match self {
            Value::Document(d) => Some(d),
            _ => None,
        }
    }

    /// Look up a field if this value is a document.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Document(d) => d.get(key),
            _ => None,
        }
    }

    /// Returns the dot-path of the first non-finite number, if any.
    ///
    /// `prefix` is the path of this value itself; pass `""` for a root.
    pub fn find_non_finite(&self, prefix: &str) -> Option<String> {
        match self {
            Value::Number(n) if !n.is_finite() => Some(prefix.to_string()),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .find_map(|(i, v)| v.find_non_finite(&join_path(prefix, &i.to_string()))),
            Value::Document(doc) => doc.find_non_finite(prefix),
            _ => None,
        }
    }
}

pub(crate) fn join_path(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{prefix}.{segment}")
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    #[allow(clippy::cast_precision_loss)]
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<Document> for Value {
    fn from(d: Document) -> Self {
        Value::Document(d)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Value::Null
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_compare_numerically() {
        assert_eq!(Value::from(3), Value::Number(3.0));
        assert_eq!(
            Value::from(2).compare(&Value::from(10)),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn mismatched_types_are_unordered() {
        assert_eq!(Value::from(1).compare(&Value::from("1")), None);
        assert_eq!(Value::Null.compare(&Value::Null), None);
        assert_eq!(Value::from(true).compare(&Value::from(false)), None);
    }

    #[test]
    fn strings_order_lexicographically() {
        assert_eq!(
            Value::from("apple").compare(&Value::from("banana")),
            Some(Ordering::Less)
        );
        assert_eq!(
            Value::from("b").compare(&Value::from("B")),
            Some(Ordering::Greater)
        );
    }

    #[test]
    fn array_equality_is_ordered() {
        let a = Value::from(vec!["weak", "strong"]);
        let b = Value::from(vec!["strong", "weak"]);
        assert_ne!(a, b);
        assert_eq!(a, Value::from(vec!["weak", "strong"]));
        assert_ne!(a, Value::from(vec!["weak"]));
    }

    #[test]
    fn value_accessors() {
        assert!(Value::Null.is_null());
        assert!(!Value::Bool(true).is_null());

        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::from(42).as_bool(), None);

        assert_eq!(Value::from(42).as_number(), Some(42.0));
        assert_eq!(Value::from("42").as_number(), None);

        assert_eq!(Value::from("hello").as_str(), Some("hello"));
        assert_eq!(Value::from("x").type_name(), "string");
        assert!(Value::Document(Document::new()).is_document());
    }

    #[test]
    fn finds_nested_non_finite_numbers() {
        let mut inner = Document::new();
        inner.insert("ok", 1);
        inner.insert("bad", Value::Array(vec![Value::from(1), Value::Number(f64::NAN)]));
        let value = Value::Document(inner);

        assert_eq!(value.find_non_finite("root"), Some("root.bad.1".to_string()));
        assert_eq!(Value::from(2.5).find_non_finite(""), None);
    }

    #[test]
    fn from_impls() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(42i64), Value::Number(42.0));
        assert_eq!(Value::from(42u32), Value::Number(42.0));
        assert_eq!(Value::from("hello"), Value::String("hello".to_string()));
        assert_eq!(
            Value::from(vec![1, 2]),
            Value::Array(vec![Value::Number(1.0), Value::Number(2.0)])
        );
        assert_eq!(Value::from(()), Value::Null);
    }
}
