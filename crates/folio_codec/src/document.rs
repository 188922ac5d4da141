//! Ordered field map.

use crate::value::{join_path, Value};

/// A document: field names mapped to values, in insertion order.
///
/// Field order is preserved for output but ignored by equality. Inserting
/// an existing key overwrites the value in place without moving it.
#[derive(Debug, Clone, Default)]
pub struct Document {
    fields: Vec<(String, Value)>,
}

impl Document {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty document with room for `capacity` fields.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Returns the value of a field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns a mutable reference to the value of a field.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.fields
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Sets a field, returning the previous value if there was one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.get_mut(&key) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => {
                self.fields.push((key, value));
                None
            }
        }
    }

    /// Removes a field, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let pos = self.fields.iter().position(|(k, _)| k == key)?;
        Some(self.fields.remove(pos).1)
    }

    /// Returns true if the field is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == key)
    }

    /// Iterates field names in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// Iterates `(name, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the document has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the dot-path of the first non-finite number, if any.
    pub fn find_non_finite(&self, prefix: &str) -> Option<String> {
        self.fields
            .iter()
            .find_map(|(k, v)| v.find_non_finite(&join_path(prefix, k)))
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .fields
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|ov| ov == v))
    }
}

impl FromIterator<(String, Value)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut doc = Document::new();
        for (k, v) in iter {
            doc.insert(k, v);
        }
        doc
    }
}

impl IntoIterator for Document {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_preserves_order_and_overwrites_in_place() {
        let mut doc = Document::new();
        doc.insert("b", 1);
        doc.insert("a", 2);
        let previous = doc.insert("b", 3);

        assert_eq!(previous, Some(Value::from(1)));
        assert_eq!(doc.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(doc.get("b"), Some(&Value::from(3)));
    }

    #[test]
    fn equality_ignores_field_order() {
        let a: Document = vec![
            ("x".to_string(), Value::from(1)),
            ("y".to_string(), Value::from("two")),
        ]
        .into_iter()
        .collect();
        let b: Document = vec![
            ("y".to_string(), Value::from("two")),
            ("x".to_string(), Value::from(1)),
        ]
        .into_iter()
        .collect();

        assert_eq!(a, b);
    }

    #[test]
    fn equality_requires_same_key_set() {
        let mut a = Document::new();
        a.insert("x", 1);
        let mut b = a.clone();
        b.insert("y", Value::Null);

        assert_ne!(a, b);
        assert_ne!(b, a);
    }

    #[test]
    fn remove_and_contains() {
        let mut doc = Document::new();
        doc.insert("name", "Alice");
        assert!(doc.contains_key("name"));

        assert_eq!(doc.remove("name"), Some(Value::from("Alice")));
        assert!(!doc.contains_key("name"));
        assert!(doc.is_empty());
        assert_eq!(doc.remove("name"), None);
    }
}
