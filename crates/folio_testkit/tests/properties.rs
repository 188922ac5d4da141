//! Property tests for the store.

use folio_core::{apply_modifiers, project, Config, CoreError, Document, Projection, Store, Value, ID_FIELD};
use folio_testkit::prelude::*;
use proptest::prelude::*;
use proptest::sample::Index;
use std::collections::HashMap;

fn id_of(doc: &Document) -> String {
    doc.get(ID_FIELD)
        .and_then(Value::as_str)
        .unwrap()
        .to_string()
}

fn live_set(store: &Store) -> HashMap<String, Document> {
    store
        .documents()
        .map(|doc| (id_of(doc), doc.clone()))
        .collect()
}

proptest! {
    #![proptest_config(PropTestConfig::quick().to_proptest_config())]

    #[test]
    fn projection_without_fields_is_identity(doc in stored_document_strategy()) {
        prop_assert_eq!(project(&doc, None), doc.clone());
        prop_assert_eq!(Projection::all().apply(&doc), doc);
    }

    #[test]
    fn insert_then_find_by_id_returns_the_projection(
        doc in stored_document_strategy(),
        fields in prop::collection::vec(field_name_strategy(), 0..3),
    ) {
        let mut store = Store::open_in_memory();
        store.insert(doc.clone()).unwrap();

        let id = id_of(&doc);
        let projection = Projection::fields(fields);
        prop_assert_eq!(
            store.find_by_id(id.as_str(), &projection).unwrap(),
            vec![projection.apply(&doc)]
        );
        prop_assert_eq!(store.find_by_id(id, &Projection::all()).unwrap(), vec![doc]);
    }

    #[test]
    fn persist_then_load_preserves_live_documents(
        batch in document_batch_strategy(12),
        deletions in prop::collection::vec(any::<Index>(), 0..4),
    ) {
        let (mut test_store, backend) = TestStore::backed(Config::new(), "");
        test_store.insert(batch.clone()).unwrap();
        if !batch.is_empty() {
            for pick in &deletions {
                test_store.delete_by_id(id_of(pick.get(&batch))).unwrap();
            }
        }
        let before = live_set(&test_store);
        test_store.persist().unwrap();

        let mut reopened = Store::open_with_backend(Config::new(), Box::new(backend)).unwrap();
        let report = reopened.load().unwrap();
        prop_assert!(report.is_clean());
        prop_assert_eq!(reopened.len(), before.len());
        prop_assert_eq!(live_set(&reopened), before);
    }

    #[test]
    fn deleting_twice_counts_once(batch in document_batch_strategy(8), pick in any::<Index>()) {
        prop_assume!(!batch.is_empty());
        let mut store = Store::open_in_memory();
        store.insert(batch.clone()).unwrap();

        let id = id_of(pick.get(&batch));
        prop_assert_eq!(store.delete_by_id(id.as_str()).unwrap(), 1);
        let after_first = live_set(&store);

        prop_assert_eq!(store.delete_by_id(id.as_str()).unwrap(), 0);
        prop_assert_eq!(live_set(&store), after_first);
        prop_assert_eq!(store.count(), batch.len() - 1);
    }

    #[test]
    fn store_agrees_with_a_map_model(ops in operation_sequence_strategy(1, 40)) {
        let mut store = Store::open_in_memory();
        let mut model: HashMap<String, Document> = HashMap::new();

        for op in ops {
            match op {
                StoreOperation::Insert { id, fields } => {
                    let mut doc = Document::new();
                    doc.insert(ID_FIELD, id.as_str());
                    for (name, value) in fields {
                        doc.insert(name, value);
                    }
                    let result = store.insert(doc.clone());
                    if model.contains_key(&id) {
                        let is_duplicate = matches!(result, Err(CoreError::DuplicateIdentifier { .. }));
                        prop_assert!(is_duplicate);
                    } else {
                        prop_assert!(result.is_ok());
                        model.insert(id, doc);
                    }
                }
                StoreOperation::Delete { id } => {
                    let expected = usize::from(model.remove(&id).is_some());
                    prop_assert_eq!(store.delete_by_id(id).unwrap(), expected);
                }
                StoreOperation::Add { id, amount } => {
                    let modifiers = document(serde_json::json!({"$add": {"counter": amount}}));
                    let result = store.update_by_id(id.as_str(), modifiers.clone(), &Projection::all());
                    match model.get(&id).map(|doc| apply_modifiers(doc, &modifiers)) {
                        None => {
                            prop_assert!(result.unwrap().is_empty());
                        }
                        Some(Ok(updated)) => {
                            prop_assert_eq!(result.unwrap(), vec![updated.clone()]);
                            model.insert(id, updated);
                        }
                        Some(Err(_)) => {
                            prop_assert!(result.is_err());
                        }
                    }
                }
            }
        }

        prop_assert_eq!(live_set(&store), model);
    }
}
