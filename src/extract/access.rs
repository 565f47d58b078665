//! Collaborators the evaluator is parameterised over.
//!
//! The evaluator never inspects a `Value` directly to read members, decide
//! whether a value is terminal, or create containers; it asks these traits. The
//! default implementations cover the `Value` model as-is.

use super::adapter::IterableKind;
use crate::error::{PathError, Result};
use crate::value::Value;
use indexmap::{IndexMap, IndexSet};

/// Reads a named member from an object.
pub trait MemberAccess: Send + Sync {
    /// Returns the member, or `PathError::UnknownField` when the object has no such
    /// member. A member that exists but holds `Value::Null` is not an error.
    fn member<'a>(&self, object: &'a Value, field: &str) -> Result<&'a Value>;
}

/// Decides how the evaluator treats a value.
pub trait TypeClassifier: Send + Sync {
    /// Traversal stops at terminal values.
    fn is_terminal(&self, value: &Value) -> bool;

    /// The container kind of a value, if any adapter handles it.
    fn iterable_kind_of(&self, value: &Value) -> Option<IterableKind>;
}

/// Creates empty containers for rebuilt results.
pub trait CollectionFactory: Send + Sync {
    fn instantiate(&self, kind: IterableKind) -> Value;
}

/// Member access over `Object` fields.
///
/// A `Map` also answers member reads for its string keys, so a list of maps can
/// be navigated like a list of records.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldAccess;

impl MemberAccess for FieldAccess {
    fn member<'a>(&self, object: &'a Value, field: &str) -> Result<&'a Value> {
        let found = match object {
            Value::Object(obj) => obj.get(field),
            Value::Map(entries) => entries
                .iter()
                .find(|(k, _)| k.as_str() == Some(field))
                .map(|(_, v)| v),
            _ => None,
        };
        found.ok_or_else(|| PathError::UnknownField {
            field: field.to_string(),
            type_name: object.type_name().to_string(),
        })
    }
}

/// Classifies by `Value` variant: scalars are terminal, objects are navigable,
/// and the four container variants map onto their kinds.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueClassifier;

impl TypeClassifier for ValueClassifier {
    fn is_terminal(&self, value: &Value) -> bool {
        matches!(
            value,
            Value::Null
                | Value::Bool(_)
                | Value::Int(_)
                | Value::Float(_)
                | Value::String(_)
                | Value::Bytes(_)
                | Value::DateTime(_)
        )
    }

    fn iterable_kind_of(&self, value: &Value) -> Option<IterableKind> {
        match value {
            Value::List(_) => Some(IterableKind::List),
            Value::Set(_) => Some(IterableKind::Set),
            Value::Map(_) => Some(IterableKind::Map),
            Value::Array(_) => Some(IterableKind::Array),
            _ => None,
        }
    }
}

/// Plain empty containers.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCollections;

impl CollectionFactory for DefaultCollections {
    fn instantiate(&self, kind: IterableKind) -> Value {
        match kind {
            IterableKind::List => Value::List(Vec::new()),
            IterableKind::Set => Value::Set(IndexSet::new()),
            IterableKind::Map => Value::Map(IndexMap::new()),
            IterableKind::Array => Value::Array(Vec::new()),
        }
    }
}
