//! Update arguments and the modifier engine.
//!
//! An update is either a replacement document, which becomes the stored
//! document wholesale, or a set of modifiers applied to the current one.
//! Both forms are parsed and validated before any target is touched, and
//! both re-stamp the target's `_id` onto the result.

use crate::error::{CoreError, CoreResult};
use crate::model::{self, ModifierKind, ID_FIELD};
use folio_codec::{Document, Value};

/// A parsed update argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    /// Replace every field of the target.
    Replace(Document),
    /// Apply modifiers to the target.
    Modify(ModifierSet),
}

impl Update {
    /// Parses and validates an update argument.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the update is not a document, mixes
    /// modifier keys with plain fields, is a replacement with illegal field
    /// names, or holds malformed modifiers.
    pub fn parse(value: &Value) -> CoreResult<Self> {
        let doc = value.as_document().ok_or_else(|| {
            CoreError::invalid_argument(format!(
                "update must be a document, found {}",
                value.type_name()
            ))
        })?;
        if model::has_mixed_modifiers(value) {
            return Err(CoreError::invalid_argument(
                "update mixes modifiers with plain fields",
            ));
        }
        if model::has_modifiers(value) {
            return ModifierSet::parse(doc).map(Self::Modify);
        }
        if model::is_invalid_document(value) {
            return Err(CoreError::invalid_argument(
                "replacement contains an illegal field name",
            ));
        }
        Ok(Self::Replace(doc.clone()))
    }

    /// Checks that the update does not try to change the target's `_id`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the update assigns an `_id` other than
    /// `target_id`.
    pub fn check_target(&self, target_id: &str) -> CoreResult<()> {
        let assigned = match self {
            Self::Replace(doc) => doc.get(ID_FIELD),
            Self::Modify(modifiers) => modifiers.assigned_id(),
        };
        match assigned {
            Some(Value::String(id)) if id == target_id => Ok(()),
            Some(other) => Err(CoreError::invalid_argument(format!(
                "update may not change `_id` of `{target_id}` to {}",
                describe(other)
            ))),
            None => Ok(()),
        }
    }

    /// Computes the document that replaces `target`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if a modifier does not fit the target's
    /// current field types.
    pub fn apply(&self, target: &Document) -> CoreResult<Document> {
        match self {
            Self::Replace(replacement) => {
                let mut result = Document::with_capacity(replacement.len() + 1);
                if let Some(id) = target.get(ID_FIELD) {
                    result.insert(ID_FIELD, id.clone());
                }
                for (name, value) in replacement.iter().filter(|(name, _)| *name != ID_FIELD) {
                    result.insert(name, value.clone());
                }
                Ok(result)
            }
            Self::Modify(modifiers) => modifiers.apply(target),
        }
    }
}

/// Parsed `$set`, `$add` and `$push` operands.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModifierSet {
    set: Vec<(String, Value)>,
    add: Vec<(String, f64)>,
    push: Vec<(String, Value)>,
}

impl ModifierSet {
    /// Parses an update document consisting only of modifier keys.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for unknown top-level keys, operands that
    /// are not documents, illegal field names, non-numeric `$add` operands,
    /// and any `$add` or `$push` of `_id`.
    pub fn parse(update: &Document) -> CoreResult<Self> {
        let mut modifiers = Self::default();
        for (key, operand) in update.iter() {
            let kind = ModifierKind::from_key(key).ok_or_else(|| {
                CoreError::invalid_argument(format!("`{key}` is not an update modifier"))
            })?;
            let fields = operand.as_document().ok_or_else(|| {
                CoreError::invalid_argument(format!(
                    "`{key}` expects a document of fields, found {}",
                    operand.type_name()
                ))
            })?;
            for (field, value) in fields.iter() {
                check_operand(kind, field, value)?;
                match kind {
                    ModifierKind::Set => modifiers.set.push((field.to_string(), value.clone())),
                    ModifierKind::Add => {
                        let amount = value.as_number().ok_or_else(|| {
                            CoreError::invalid_argument(format!(
                                "`$add` amount for `{field}` must be a number, found {}",
                                value.type_name()
                            ))
                        })?;
                        modifiers.add.push((field.to_string(), amount));
                    }
                    ModifierKind::Push => modifiers.push.push((field.to_string(), value.clone())),
                }
            }
        }
        Ok(modifiers)
    }

    /// Returns true if no field is touched.
    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.add.is_empty() && self.push.is_empty()
    }

    fn assigned_id(&self) -> Option<&Value> {
        self.set
            .iter()
            .find(|(field, _)| field == ID_FIELD)
            .map(|(_, value)| value)
    }

    /// Applies `$set`, then `$add`, then `$push` to a copy of `doc`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if an `$add` target holds a non-number or
    /// a `$push` target holds a non-array.
    pub fn apply(&self, doc: &Document) -> CoreResult<Document> {
        let mut result = doc.clone();

        for (field, value) in &self.set {
            result.insert(field.as_str(), value.clone());
        }

        for (field, amount) in &self.add {
            let current = match result.get(field) {
                None => 0.0,
                Some(Value::Number(n)) => *n,
                Some(other) => {
                    return Err(CoreError::invalid_argument(format!(
                        "cannot `$add` to `{field}`: it holds {}",
                        other.type_name()
                    )))
                }
            };
            result.insert(field.as_str(), current + amount);
        }

        for (field, value) in &self.push {
            match result.get_mut(field) {
                None => {
                    result.insert(field.as_str(), Value::Array(vec![value.clone()]));
                }
                Some(Value::Array(items)) => items.push(value.clone()),
                Some(other) => {
                    return Err(CoreError::invalid_argument(format!(
                        "cannot `$push` to `{field}`: it holds {}",
                        other.type_name()
                    )))
                }
            }
        }

        if let Some(id) = doc.get(ID_FIELD) {
            result.insert(ID_FIELD, id.clone());
        }
        Ok(result)
    }
}

fn check_operand(kind: ModifierKind, field: &str, value: &Value) -> CoreResult<()> {
    if !model::is_legal_field_name(field) {
        return Err(CoreError::invalid_argument(format!(
            "`{}` cannot target `{field}`: modifiers address top-level fields only",
            kind.key()
        )));
    }
    if field == ID_FIELD && kind != ModifierKind::Set {
        return Err(CoreError::invalid_argument(format!(
            "`{}` cannot target `_id`",
            kind.key()
        )));
    }
    if value
        .as_document()
        .is_some_and(model::has_illegal_field_names)
    {
        return Err(CoreError::invalid_argument(format!(
            "`{}` value for `{field}` contains an illegal field name",
            kind.key()
        )));
    }
    Ok(())
}

fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => format!("`{s}`"),
        other => other.type_name().to_string(),
    }
}

/// Applies a modifier document to `doc`, returning the new document.
///
/// `doc` is never changed. Its `_id`, if any, is carried over unchanged.
///
/// # Errors
///
/// Returns `InvalidArgument` if `modifiers` is not a valid modifier
/// document or does not fit the field types of `doc`.
pub fn apply_modifiers(doc: &Document, modifiers: &Document) -> CoreResult<Document> {
    ModifierSet::parse(modifiers)?.apply(doc)
}
