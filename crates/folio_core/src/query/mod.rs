//! Query expressions.
//!
//! A query is a document whose keys are either field paths, compared for
//! deep equality against the resolved value, or operator keywords. Every
//! top-level key must hold for a document to match. The empty query
//! matches every document.
//!
//! Queries are parsed once into a [`Query`] so that operator dispatch is a
//! closed enum and an unknown operator is an error up front rather than a
//! condition that silently never matches.
//!
//! | Operator | Value | Holds when |
//! |---|---|---|
//! | `$gt` `$gte` `$lt` `$lte` | field → threshold | every field orders against its threshold |
//! | `$not` | field → value | every field is present and not equal |
//! | `$string` | field → substring | every field is a string containing it, ignoring case |
//! | `$stringStrict` | field → substring | same, case-sensitive |
//! | `$exists` | path or list of paths | every path resolves |
//! | `$has` | field → value | every field is an array containing an equal element |
//! | `$some` | list of queries | at least one sub-query matches |

mod matcher;
mod path;

pub use path::FieldPath;

use crate::error::{CoreError, CoreResult};
use folio_codec::{Document, Value};

/// Ordering comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// `$gt`
    Gt,
    /// `$gte`
    Gte,
    /// `$lt`
    Lt,
    /// `$lte`
    Lte,
}

/// Query operator keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `$gt`, `$gte`, `$lt`, `$lte`
    Compare(Comparison),
    /// `$not`
    Not,
    /// `$string`
    String,
    /// `$stringStrict`
    StringStrict,
    /// `$exists`
    Exists,
    /// `$has`
    Has,
    /// `$some`
    Some,
}

impl Operator {
    /// Resolves an operator keyword.
    pub fn from_key(key: &str) -> Option<Self> {
        let op = match key {
            "$gt" => Self::Compare(Comparison::Gt),
            "$gte" => Self::Compare(Comparison::Gte),
            "$lt" => Self::Compare(Comparison::Lt),
            "$lte" => Self::Compare(Comparison::Lte),
            "$not" => Self::Not,
            "$string" => Self::String,
            "$stringStrict" => Self::StringStrict,
            "$exists" => Self::Exists,
            "$has" => Self::Has,
            "$some" => Self::Some,
            _ => return None,
        };
        Some(op)
    }
}

/// One top-level condition of a query.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Condition {
    Equals(FieldPath, Value),
    Compare(Comparison, Vec<(FieldPath, Value)>),
    NotEqual(Vec<(FieldPath, Value)>),
    Contains {
        case_sensitive: bool,
        fields: Vec<(FieldPath, String)>,
    },
    Exists(Vec<FieldPath>),
    Has(Vec<(FieldPath, Value)>),
    Some(Vec<Query>),
}

/// A parsed query expression.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Query {
    conditions: Vec<Condition>,
}

impl Query {
    /// The universal query, matching every document.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Parses a query from an arbitrary value.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the value is not a document or the
    /// document is not a well-formed query.
    pub fn from_value(value: &Value) -> CoreResult<Self> {
        let doc = value.as_document().ok_or_else(|| {
            CoreError::invalid_argument(format!(
                "query must be a document, found {}",
                value.type_name()
            ))
        })?;
        Self::parse(doc)
    }

    /// Parses a query document.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for unknown operators, operator values of
    /// the wrong shape, and malformed field paths.
    pub fn parse(doc: &Document) -> CoreResult<Self> {
        let conditions = doc
            .iter()
            .map(|(key, value)| parse_condition(key, value))
            .collect::<CoreResult<Vec<_>>>()?;
        Ok(Self { conditions })
    }

    /// Returns true for the empty query.
    pub fn is_universal(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Returns true if the document satisfies every condition.
    pub fn matches(&self, doc: &Document) -> bool {
        self.conditions.iter().all(|c| c.holds(doc))
    }
}

/// Evaluates a query document against a document.
///
/// A query that fails to parse matches nothing; use [`Query::parse`] to
/// surface the parse error instead.
pub fn matches(doc: &Document, query: &Document) -> bool {
    Query::parse(query).is_ok_and(|q| q.matches(doc))
}

fn parse_condition(key: &str, value: &Value) -> CoreResult<Condition> {
    if !key.starts_with('$') {
        return Ok(Condition::Equals(FieldPath::parse(key)?, value.clone()));
    }
    let op = Operator::from_key(key)
        .ok_or_else(|| CoreError::invalid_argument(format!("unknown query operator `{key}`")))?;

    let condition = match op {
        Operator::Compare(cmp) => {
            let fields = field_map(key, value, |field, threshold| match threshold {
                Value::Number(_) | Value::String(_) => Ok(threshold.clone()),
                other => Err(CoreError::invalid_argument(format!(
                    "`{key}` threshold for `{field}` must be a number or string, found {}",
                    other.type_name()
                ))),
            })?;
            Condition::Compare(cmp, fields)
        }
        Operator::Not => Condition::NotEqual(field_map(key, value, |_, v| Ok(v.clone()))?),
        Operator::String | Operator::StringStrict => {
            let case_sensitive = op == Operator::StringStrict;
            let fields = field_map(key, value, |field, needle| match needle {
                Value::String(s) if case_sensitive => Ok(s.clone()),
                Value::String(s) => Ok(s.to_lowercase()),
                other => Err(CoreError::invalid_argument(format!(
                    "`{key}` value for `{field}` must be a string, found {}",
                    other.type_name()
                ))),
            })?;
            Condition::Contains {
                case_sensitive,
                fields,
            }
        }
        Operator::Exists => Condition::Exists(parse_exists(value)?),
        Operator::Has => Condition::Has(field_map(key, value, |_, v| Ok(v.clone()))?),
        Operator::Some => Condition::Some(parse_some(value)?),
    };
    Ok(condition)
}

/// Parses a `field → operand` map, converting each operand with `operand`.
fn field_map<T>(
    key: &str,
    value: &Value,
    operand: impl Fn(&str, &Value) -> CoreResult<T>,
) -> CoreResult<Vec<(FieldPath, T)>> {
    let doc = value.as_document().ok_or_else(|| {
        CoreError::invalid_argument(format!(
            "`{key}` expects a document of fields, found {}",
            value.type_name()
        ))
    })?;
    doc.iter()
        .map(|(field, v)| Ok((FieldPath::parse(field)?, operand(field, v)?)))
        .collect()
}

fn parse_exists(value: &Value) -> CoreResult<Vec<FieldPath>> {
    let as_path = |v: &Value| match v {
        Value::String(s) => FieldPath::parse(s),
        other => Err(CoreError::invalid_argument(format!(
            "`$exists` expects field paths, found {}",
            other.type_name()
        ))),
    };
    match value {
        Value::Array(items) => items.iter().map(as_path).collect(),
        single => Ok(vec![as_path(single)?]),
    }
}

fn parse_some(value: &Value) -> CoreResult<Vec<Query>> {
    let items = value.as_array().ok_or_else(|| {
        CoreError::invalid_argument(format!(
            "`$some` expects a list of queries, found {}",
            value.type_name()
        ))
    })?;
    items.iter().map(Query::from_value).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(json: serde_json::Value) -> CoreResult<Query> {
        Query::from_value(&Value::from(json))
    }

    #[test]
    fn empty_query_is_universal() {
        assert!(parse(json!({})).unwrap().is_universal());
        assert!(Query::all().is_universal());
        assert!(!parse(json!({"a": 1})).unwrap().is_universal());
    }

    #[test]
    fn unknown_operator_is_rejected() {
        let err = parse(json!({"$regex": {"name": "a.*"}})).unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument { .. }));
        assert!(err.to_string().contains("$regex"));
    }

    #[test]
    fn unknown_operator_inside_some_is_rejected() {
        assert!(parse(json!({"$some": [{"a": 1}, {"$nope": {}}]})).is_err());
    }

    #[test]
    fn operator_shapes_are_checked() {
        assert!(parse(json!({"$gt": 5})).is_err());
        assert!(parse(json!({"$gt": {"age": true}})).is_err());
        assert!(parse(json!({"$string": {"name": 3}})).is_err());
        assert!(parse(json!({"$exists": 3})).is_err());
        assert!(parse(json!({"$exists": ["a", 1]})).is_err());
        assert!(parse(json!({"$some": {"a": 1}})).is_err());
        assert!(parse(json!({"$some": [1]})).is_err());
        assert!(parse(json!({"$has": ["a"]})).is_err());
    }

    #[test]
    fn well_formed_operators_parse() {
        let query = parse(json!({
            "type": "normal",
            "$gte": {"count": 2, "name": "b"},
            "$not": {"important": true},
            "$string": {"title": "Rust"},
            "$stringStrict": {"title": "Rust"},
            "$exists": ["title", "tags[0]"],
            "$has": {"tags": "db"},
            "$some": [{"a": 1}, {"$exists": "b"}]
        }))
        .unwrap();
        assert_eq!(query.conditions.len(), 8);
    }

    #[test]
    fn case_insensitive_needle_is_lowered_once() {
        let query = parse(json!({"$string": {"title": "RuSt"}})).unwrap();
        assert_eq!(
            query.conditions[0],
            Condition::Contains {
                case_sensitive: false,
                fields: vec![(FieldPath::parse("title").unwrap(), "rust".to_string())],
            }
        );
    }

    #[test]
    fn non_document_query_is_rejected() {
        assert!(matches!(
            parse(json!([{"a": 1}])),
            Err(CoreError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn free_function_treats_bad_queries_as_no_match() {
        let doc = Value::from(json!({"a": 1})).into_document().unwrap();
        let good = Value::from(json!({"a": 1})).into_document().unwrap();
        let bad = Value::from(json!({"$bogus": {}})).into_document().unwrap();

        assert!(matches(&doc, &good));
        assert!(!matches(&doc, &bad));
    }
}
