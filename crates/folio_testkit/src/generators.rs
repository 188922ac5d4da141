//! Property-based test generators using proptest.
//!
//! Provides strategies for generating random test data
//! that maintains required invariants.

use folio_core::{Document, Value};
use proptest::prelude::*;

/// Strategy for generating legal field names.
pub fn field_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9_]{0,7}").expect("Invalid regex")
}

/// Strategy for generating document identifiers.
pub fn id_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-f0-9]{8}").expect("Invalid regex")
}

/// Strategy for generating numbers that survive a JSON round trip exactly.
///
/// Quarter steps keep every value exactly representable with a short
/// decimal form.
pub fn number_strategy() -> impl Strategy<Value = f64> {
    (-4_000_000i64..4_000_000).prop_map(|n| n as f64 / 4.0)
}

/// Strategy for generating scalar values.
pub fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        number_strategy().prop_map(Value::Number),
        "\\PC{0,12}".prop_map(Value::String),
    ]
}

/// Strategy for generating values nested up to a few levels deep.
pub fn value_strategy() -> impl Strategy<Value = Value> {
    scalar_strategy().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map(field_name_strategy(), inner, 0..4)
                .prop_map(|fields| Value::Document(fields.into_iter().collect())),
        ]
    })
}

/// Strategy for generating documents with legal field names and no `_id`.
pub fn document_strategy() -> impl Strategy<Value = Document> {
    prop::collection::btree_map(field_name_strategy(), value_strategy(), 0..6)
        .prop_map(|fields| fields.into_iter().collect())
}

/// Strategy for generating documents that carry an `_id`.
pub fn stored_document_strategy() -> impl Strategy<Value = Document> {
    (id_strategy(), document_strategy()).prop_map(|(id, fields)| {
        let mut doc = Document::with_capacity(fields.len() + 1);
        doc.insert(folio_core::ID_FIELD, id);
        for (name, value) in fields {
            doc.insert(name, value);
        }
        doc
    })
}

/// Strategy for generating a batch of documents with distinct `_id`s.
pub fn document_batch_strategy(max: usize) -> impl Strategy<Value = Vec<Document>> {
    prop::collection::btree_map(id_strategy(), document_strategy(), 0..max).prop_map(|batch| {
        batch
            .into_iter()
            .map(|(id, fields)| {
                let mut doc = Document::new();
                doc.insert(folio_core::ID_FIELD, id);
                for (name, value) in fields {
                    doc.insert(name, value);
                }
                doc
            })
            .collect()
    })
}

/// A store operation for model-based tests.
#[derive(Debug, Clone)]
pub enum StoreOperation {
    /// Insert a document
    Insert {
        /// Document ID
        id: String,
        /// Document fields
        fields: Document,
    },
    /// Delete a document
    Delete {
        /// Document ID
        id: String,
    },
    /// Add to a numeric field of a document
    Add {
        /// Document ID
        id: String,
        /// Amount added to `counter`
        amount: f64,
    },
}

/// Strategy for generating store operations over a small id space.
pub fn store_operation_strategy() -> impl Strategy<Value = StoreOperation> {
    let small_id = prop::sample::select(vec!["a", "b", "c", "d"]).prop_map(String::from);
    prop_oneof![
        3 => (small_id.clone(), document_strategy())
            .prop_map(|(id, fields)| StoreOperation::Insert { id, fields }),
        1 => small_id.clone().prop_map(|id| StoreOperation::Delete { id }),
        2 => (small_id, -100i32..100)
            .prop_map(|(id, amount)| StoreOperation::Add { id, amount: f64::from(amount) }),
    ]
}

/// Strategy for generating a sequence of operations.
pub fn operation_sequence_strategy(
    min_ops: usize,
    max_ops: usize,
) -> impl Strategy<Value = Vec<StoreOperation>> {
    prop::collection::vec(store_operation_strategy(), min_ops..max_ops)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::model;

    proptest! {
        #![proptest_config(PropTestConfig::quick().to_proptest_config())]

        #[test]
        fn generated_documents_are_valid(doc in document_strategy()) {
            prop_assert!(!model::is_invalid_document(&Value::Document(doc)));
        }

        #[test]
        fn stored_documents_lead_with_id(doc in stored_document_strategy()) {
            prop_assert_eq!(doc.keys().next(), Some(folio_core::ID_FIELD));
        }

        #[test]
        fn batches_have_distinct_ids(batch in document_batch_strategy(8)) {
            let mut ids: Vec<_> = batch
                .iter()
                .filter_map(|doc| doc.get(folio_core::ID_FIELD).and_then(Value::as_str))
                .collect();
            let len = ids.len();
            ids.dedup();
            prop_assert_eq!(ids.len(), len);
            prop_assert_eq!(len, batch.len());
        }
    }

    #[test]
    fn test_prop_config() {
        let quick = PropTestConfig::quick();
        assert_eq!(quick.cases, 32);

        let thorough = PropTestConfig::thorough();
        assert_eq!(thorough.cases, 1024);

        let pt_config = quick.to_proptest_config();
        assert_eq!(pt_config.cases, 32);
    }
}
