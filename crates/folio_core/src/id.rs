//! Document identifiers.

use crate::error::{CoreError, CoreResult};
use folio_codec::Value;
use uuid::Uuid;

/// Length of generated identifiers, in hex characters.
const GENERATED_ID_LEN: usize = 16;

/// Generates a fresh document identifier.
///
/// Identifiers are the leading hex digits of a random v4 UUID: short, and
/// with a negligible chance of colliding within one table.
#[must_use]
pub fn generate_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(GENERATED_ID_LEN);
    id
}

/// Wraps a value in a one-element sequence unless it already is a sequence.
#[must_use]
pub fn wrap_in_sequence(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        other => vec![other],
    }
}

/// One or more document identifiers.
///
/// Operations that address documents by id accept either a single id or a
/// list of them; `From` impls cover both.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Ids(Vec<String>);

impl Ids {
    /// Returns the identifiers in the order given.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Number of identifiers.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no identifiers were given.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Rejects empty identifiers.
    pub(crate) fn validate(&self) -> CoreResult<()> {
        if self.0.iter().any(String::is_empty) {
            return Err(CoreError::invalid_argument(
                "identifiers must be non-empty strings",
            ));
        }
        Ok(())
    }
}

impl From<&str> for Ids {
    fn from(id: &str) -> Self {
        Self(vec![id.to_string()])
    }
}

impl From<String> for Ids {
    fn from(id: String) -> Self {
        Self(vec![id])
    }
}

impl From<Vec<String>> for Ids {
    fn from(ids: Vec<String>) -> Self {
        Self(ids)
    }
}

impl From<Vec<&str>> for Ids {
    fn from(ids: Vec<&str>) -> Self {
        Self(ids.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Ids {
    fn from(ids: &[&str]) -> Self {
        Self(ids.iter().map(|id| (*id).to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Ids {
    fn from(ids: [&str; N]) -> Self {
        Self(ids.iter().map(|id| (*id).to_string()).collect())
    }
}

impl TryFrom<Value> for Ids {
    type Error = CoreError;

    /// Accepts a string or an array of strings.
    fn try_from(value: Value) -> CoreResult<Self> {
        wrap_in_sequence(value)
            .into_iter()
            .map(|item| match item {
                Value::String(id) => Ok(id),
                other => Err(CoreError::invalid_argument(format!(
                    "identifiers must be strings, found {}",
                    other.type_name()
                ))),
            })
            .collect::<CoreResult<Vec<_>>>()
            .map(Self)
    }
}
