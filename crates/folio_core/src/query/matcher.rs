//! Condition evaluation.

use super::{Comparison, Condition, FieldPath};
use folio_codec::{Document, Value};
use std::cmp::Ordering;

impl Comparison {
    fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Self::Gt => ordering == Ordering::Greater,
            Self::Gte => ordering != Ordering::Less,
            Self::Lt => ordering == Ordering::Less,
            Self::Lte => ordering != Ordering::Greater,
        }
    }
}

impl Condition {
    pub(crate) fn holds(&self, doc: &Document) -> bool {
        match self {
            Self::Equals(path, expected) => path.resolve(doc) == Some(expected),
            Self::Compare(cmp, fields) => all_resolved(doc, fields, |actual, threshold| {
                actual
                    .compare(threshold)
                    .is_some_and(|ordering| cmp.accepts(ordering))
            }),
            Self::NotEqual(fields) => all_resolved(doc, fields, |actual, value| actual != value),
            Self::Contains {
                case_sensitive,
                fields,
            } => all_resolved(doc, fields, |actual, needle| match actual {
                Value::String(haystack) if *case_sensitive => haystack.contains(needle.as_str()),
                Value::String(haystack) => haystack.to_lowercase().contains(needle.as_str()),
                _ => false,
            }),
            Self::Exists(paths) => paths.iter().all(|path| path.resolve(doc).is_some()),
            Self::Has(fields) => all_resolved(doc, fields, |actual, wanted| {
                actual
                    .as_array()
                    .is_some_and(|items| items.contains(wanted))
            }),
            Self::Some(queries) => queries.iter().any(|query| query.matches(doc)),
        }
    }
}

/// True if every path resolves and its value satisfies `check`.
fn all_resolved<T>(
    doc: &Document,
    fields: &[(FieldPath, T)],
    check: impl Fn(&Value, &T) -> bool,
) -> bool {
    fields.iter().all(|(path, operand)| {
        path.resolve(doc)
            .is_some_and(|actual| check(actual, operand))
    })
}

#[cfg(test)]
mod tests {
    use crate::query::{matches, Query};
    use folio_codec::{Document, Value};
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        Value::from(value).into_document().unwrap()
    }

    fn check(d: &serde_json::Value, q: serde_json::Value) -> bool {
        let query = Query::parse(&doc(q)).unwrap();
        query.matches(&doc(d.clone()))
    }

    #[test]
    fn empty_query_matches_everything() {
        assert!(check(&json!({}), json!({})));
        assert!(check(&json!({"a": [1, {"b": null}]}), json!({})));
    }

    #[test]
    fn top_level_keys_are_anded() {
        let d = json!({"type": "normal", "important": false});
        assert!(check(&d, json!({"type": "normal"})));
        assert!(check(&d, json!({"type": "normal", "important": false})));
        assert!(!check(&d, json!({"type": "normal", "important": true})));
    }

    #[test]
    fn sequence_equality_is_ordered() {
        let d = json!({"variants": ["weak"]});
        assert!(check(&d, json!({"variants": ["weak"]})));
        assert!(!check(&d, json!({"variants": ["strong", "weak"]})));

        let two = json!({"variants": ["weak", "strong"]});
        assert!(check(&two, json!({"variants": ["weak", "strong"]})));
        assert!(!check(&two, json!({"variants": ["strong", "weak"]})));
    }

    #[test]
    fn document_equality_ignores_key_order() {
        let d = json!({"props": {"a": 1, "b": 2}});
        assert!(check(&d, json!({"props": {"b": 2, "a": 1}})));
        assert!(!check(&d, json!({"props": {"a": 1}})));
    }

    #[test]
    fn dot_paths_reach_nested_fields() {
        let d = json!({"properties": {"type": "weak", "parent": 3}});
        assert!(check(&d, json!({"properties.type": "weak"})));
        assert!(!check(&d, json!({"properties.parent": 4})));
        assert!(check(&d, json!({"properties.parent": 3.0})));
        assert!(!check(&d, json!({"properties.missing": null})));
    }

    #[test]
    fn index_paths_reach_sequence_elements() {
        let d = json!({"variants": ["weak", "strong"]});
        assert!(check(&d, json!({"variants.1": "strong"})));
        assert!(check(&d, json!({"variants[0]": "weak"})));
        assert!(!check(&d, json!({"variants[2]": "weak"})));
    }

    #[test]
    fn comparisons_order_numbers_and_strings() {
        let d = json!({"count": 5, "name": "beta"});
        assert!(check(&d, json!({"$gt": {"count": 4}})));
        assert!(!check(&d, json!({"$gt": {"count": 5}})));
        assert!(check(&d, json!({"$gte": {"count": 5}})));
        assert!(check(&d, json!({"$lt": {"count": 6, "name": "gamma"}})));
        assert!(!check(&d, json!({"$lt": {"count": 6, "name": "alpha"}})));
        assert!(check(&d, json!({"$lte": {"name": "beta"}})));
    }

    #[test]
    fn comparisons_fail_on_mismatched_types_and_absent_fields() {
        let d = json!({"count": 5, "name": "beta", "flag": true});
        assert!(!check(&d, json!({"$gt": {"count": "4"}})));
        assert!(!check(&d, json!({"$lt": {"name": 10}})));
        assert!(!check(&d, json!({"$gte": {"flag": 0}})));
        assert!(!check(&d, json!({"$gt": {"missing": 0}})));
    }

    #[test]
    fn not_requires_presence_and_inequality() {
        let d = json!({"important": false, "tags": ["a"]});
        assert!(check(&d, json!({"$not": {"important": true}})));
        assert!(!check(&d, json!({"$not": {"important": false}})));
        assert!(!check(&d, json!({"$not": {"missing": 1}})));
        assert!(check(&d, json!({"$not": {"tags": ["b"]}})));
    }

    #[test]
    fn string_containment() {
        let d = json!({"title": "Embedded Rust Store"});
        assert!(check(&d, json!({"$string": {"title": "rust"}})));
        assert!(check(&d, json!({"$string": {"title": "EMBEDDED"}})));
        assert!(!check(&d, json!({"$stringStrict": {"title": "rust"}})));
        assert!(check(&d, json!({"$stringStrict": {"title": "Rust"}})));
        assert!(check(&d, json!({"$string": {"title": ""}})));
    }

    #[test]
    fn string_containment_fails_on_non_strings() {
        let d = json!({"count": 12, "tags": ["rust"]});
        assert!(!check(&d, json!({"$string": {"count": "1"}})));
        assert!(!check(&d, json!({"$string": {"tags": "rust"}})));
        assert!(!check(&d, json!({"$string": {"missing": ""}})));
    }

    #[test]
    fn exists_checks_resolution_only() {
        let d = json!({"a": null, "b": {"c": [0]}});
        assert!(check(&d, json!({"$exists": "a"})));
        assert!(check(&d, json!({"$exists": ["a", "b.c.0"]})));
        assert!(!check(&d, json!({"$exists": ["a", "b.c.1"]})));
        assert!(!check(&d, json!({"$exists": "z"})));
    }

    #[test]
    fn has_searches_sequences() {
        let d = json!({"variants": ["weak", {"k": 1}], "kind": "weak"});
        assert!(check(&d, json!({"$has": {"variants": "weak"}})));
        assert!(check(&d, json!({"$has": {"variants": {"k": 1}}})));
        assert!(!check(&d, json!({"$has": {"variants": "strong"}})));
        assert!(!check(&d, json!({"$has": {"kind": "weak"}})));
        assert!(!check(&d, json!({"$has": {"missing": "weak"}})));
    }

    #[test]
    fn some_is_a_disjunction() {
        let d = json!({"type": "strong", "important": false});
        assert!(check(&d, json!({"$some": [{"type": "normal"}, {"type": "strong"}]})));
        assert!(!check(&d, json!({"$some": [{"type": "normal"}, {"important": true}]})));
        assert!(!check(&d, json!({"$some": []})));
        assert!(check(
            &d,
            json!({"$some": [{"$some": [{"$not": {"type": "normal"}}]}], "important": false})
        ));
    }

    #[test]
    fn free_function_matches_parsed_query() {
        let d = doc(json!({"type": "normal"}));
        assert!(matches(&d, &doc(json!({"type": "normal"}))));
        assert!(!matches(&d, &doc(json!({"type": "strong"}))));
    }
}
