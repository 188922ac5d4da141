//! End-to-end scenarios over file-backed stores.

use folio_core::{Config, CoreError, Projection, Store, ID_FIELD};
use folio_testkit::prelude::*;
use serde_json::json;

fn ids(docs: &[folio_core::Document]) -> Vec<String> {
    docs.iter()
        .filter_map(|doc| doc.get(ID_FIELD).and_then(|id| id.as_str()))
        .map(String::from)
        .collect()
}

#[test]
fn sample_documents_survive_a_restart() {
    init_test_logging();
    let mut test_store = TestStore::file_with(Config::new().name("samples"));
    test_store.load().unwrap();

    let inserted = test_store.insert(sample_documents()).unwrap();
    let normal = test_store
        .find(json!({"type": "normal"}), &Projection::all())
        .unwrap();
    assert_eq!(ids(&normal), ids(&inserted[..2]));

    test_store.persist().unwrap();
    let reopened = test_store.reopen();
    let normal_after = reopened
        .find(json!({"type": "normal"}), &Projection::fields(["important"]))
        .unwrap();
    assert_eq!(normal_after.len(), 2);
    assert!(normal_after.iter().all(|doc| doc.len() == 1));
}

#[test]
fn tombstones_and_corruption_leave_the_file_on_persist() {
    init_test_logging();
    let mut test_store = TestStore::file();
    let path = test_store.data_path().unwrap();
    std::fs::write(
        &path,
        "{\"_id\":\"a\",\"count\":3}\n{\"_id\":\"b\"}\nthis is not json\n\n{\"count\":1}\n",
    )
    .unwrap();

    let report = test_store.load().unwrap();
    assert_eq!(report.loaded, 2);
    assert_eq!(
        report.corrupted,
        vec!["this is not json".to_string(), "{\"count\":1}".to_string()]
    );

    test_store
        .update(json!({}), json!({"$add": {"count": 3}}), &Projection::all())
        .unwrap();
    assert_eq!(test_store.delete_by_id("b").unwrap(), 1);
    test_store.persist().unwrap();

    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "{\"_id\":\"a\",\"count\":6}"
    );
    assert!(test_store.reopen().find_by_id("b", &Projection::all()).unwrap().is_empty());
}

#[test]
fn strict_mode_refuses_a_corrupted_file() {
    let mut test_store = TestStore::file_with(Config::new().name("strict").strict(true));
    let path = test_store.data_path().unwrap();
    std::fs::write(&path, "{\"_id\":\"a\"}\n{\"_id\":").unwrap();

    let err = test_store.load().unwrap_err();
    assert!(matches!(err, CoreError::Corruption { .. }));
    assert!(test_store.is_empty());
}

#[test]
fn id_is_immutable_through_updates() {
    with_temp_store(|store| {
        store.insert(json!({"_id": "k", "field": 0})).unwrap();

        assert!(store
            .update(json!({}), json!({"_id": "x", "field": 1}), &Projection::all())
            .is_err());
        assert!(store
            .update_by_id("k", json!({"$set": {"_id": "x"}}), &Projection::all())
            .is_err());

        let stored = store.find_by_id("k", &Projection::all()).unwrap();
        assert_eq!(stored, vec![document(json!({"_id": "k", "field": 0}))]);
    });
}

#[test]
fn drop_empties_the_file() {
    with_file_store(|store, path| {
        store.insert(sample_documents()).unwrap();
        store.persist().unwrap();
        assert!(!std::fs::read_to_string(path).unwrap().is_empty());

        store.drop().unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "");
        assert_eq!(store.len(), 0);
    });
}

#[test]
fn autopersist_keeps_the_file_current() {
    let test_store = TestStore::file_with(Config::new().name("auto").autopersist(true));
    let mut store = Store::open(test_store.config().clone()).unwrap();

    store.insert(json!([{"_id": "a"}, {"_id": "b"}])).unwrap();
    store.delete(json!({"_id": "a"})).unwrap();

    let reopened = test_store.reopen();
    assert_eq!(ids(&reopened.find(json!({}), &Projection::all()).unwrap()), vec!["b"]);
}

#[test]
fn scenario_helpers_build_expected_tables() {
    let sample = scenarios::sample_store();
    assert_eq!(sample.count(), 3);

    let mut populated = scenarios::populated_store(20);
    let removed = populated
        .delete(json!({"$gte": {"index": 10}}))
        .unwrap();
    assert_eq!(removed, 10);
    assert_eq!(populated.tombstones(), 10);
}
