//! Conversion of extracted values into requested Rust types.
//!
//! The requested type decides how GET resolution treats multiplicity: a scalar
//! type wants exactly one value, a container type accepts a rebuilt container,
//! and `Value` takes whatever the path produces.

use crate::error::{PathError, Result};
use crate::extract::adapter::IterableKind;
use crate::value::Value;
use chrono::{DateTime, Utc};
use indexmap::{IndexMap, IndexSet};
use std::hash::Hash;

/// What a requested type can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Any value, single or container
    Any,
    /// One terminal value
    Scalar,
    /// A container of the given kind
    Container(IterableKind),
}

impl Shape {
    /// True when a rebuilt container is an acceptable answer.
    pub fn is_container_compatible(self) -> bool {
        !matches!(self, Shape::Scalar)
    }
}

/// Types that extracted values can be converted into.
pub trait FromValue: Sized {
    fn shape() -> Shape;

    /// True when `value` converts without error.
    fn accepts(value: &Value) -> bool;

    fn from_value(value: Value) -> Result<Self>;
}

fn mismatch<T>(value: &Value) -> PathError {
    PathError::TypeMismatch {
        expected: std::any::type_name::<T>().to_string(),
        found: value.type_name().to_string(),
    }
}

impl FromValue for Value {
    fn shape() -> Shape {
        Shape::Any
    }

    fn accepts(_value: &Value) -> bool {
        true
    }

    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

/// Scalars read through a `Value` accessor.
macro_rules! accessor_from_value {
    ($ty:ty, $accessor:ident) => {
        impl FromValue for $ty {
            fn shape() -> Shape {
                Shape::Scalar
            }

            fn accepts(value: &Value) -> bool {
                value.$accessor().is_some()
            }

            fn from_value(value: Value) -> Result<Self> {
                value.$accessor().ok_or_else(|| mismatch::<Self>(&value))
            }
        }
    };
}

/// Scalars moved out of their variant.
macro_rules! variant_from_value {
    ($ty:ty, $pattern:pat => $out:expr) => {
        impl FromValue for $ty {
            fn shape() -> Shape {
                Shape::Scalar
            }

            fn accepts(value: &Value) -> bool {
                matches!(value, $pattern)
            }

            fn from_value(value: Value) -> Result<Self> {
                match value {
                    $pattern => Ok($out),
                    other => Err(mismatch::<Self>(&other)),
                }
            }
        }
    };
}

accessor_from_value!(bool, as_bool);
accessor_from_value!(i64, as_i64);
// Ints widen to floats
accessor_from_value!(f64, as_f64);
variant_from_value!(String, Value::String(s) => s);
variant_from_value!(DateTime<Utc>, Value::DateTime(d) => d);

fn sequence_items(value: &Value) -> Option<Box<dyn Iterator<Item = &Value> + '_>> {
    match value {
        Value::List(items) | Value::Array(items) => Some(Box::new(items.iter())),
        Value::Set(items) => Some(Box::new(items.iter())),
        _ => None,
    }
}

fn into_sequence(value: Value) -> std::result::Result<Vec<Value>, Value> {
    match value {
        Value::List(items) | Value::Array(items) => Ok(items),
        Value::Set(items) => Ok(items.into_iter().collect()),
        other => Err(other),
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn shape() -> Shape {
        Shape::Container(IterableKind::List)
    }

    fn accepts(value: &Value) -> bool {
        sequence_items(value).is_some_and(|mut items| items.all(T::accepts))
    }

    fn from_value(value: Value) -> Result<Self> {
        into_sequence(value)
            .map_err(|other| mismatch::<Self>(&other))?
            .into_iter()
            .map(T::from_value)
            .collect()
    }
}

impl<T: FromValue + Hash + Eq> FromValue for IndexSet<T> {
    fn shape() -> Shape {
        Shape::Container(IterableKind::Set)
    }

    fn accepts(value: &Value) -> bool {
        sequence_items(value).is_some_and(|mut items| items.all(T::accepts))
    }

    fn from_value(value: Value) -> Result<Self> {
        into_sequence(value)
            .map_err(|other| mismatch::<Self>(&other))?
            .into_iter()
            .map(T::from_value)
            .collect()
    }
}

/// Accepts maps with string keys and objects (by field name).
impl<T: FromValue> FromValue for IndexMap<String, T> {
    fn shape() -> Shape {
        Shape::Container(IterableKind::Map)
    }

    fn accepts(value: &Value) -> bool {
        match value {
            Value::Map(entries) => entries
                .iter()
                .all(|(k, v)| matches!(k, Value::String(_)) && T::accepts(v)),
            Value::Object(obj) => obj.fields().values().all(T::accepts),
            _ => false,
        }
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Map(entries) => entries
                .into_iter()
                .map(|(k, v)| match k {
                    Value::String(key) => Ok((key, T::from_value(v)?)),
                    other => Err(mismatch::<String>(&other)),
                })
                .collect(),
            Value::Object(obj) => obj
                .fields()
                .iter()
                .map(|(k, v)| Ok((k.clone(), T::from_value(v.clone())?)))
                .collect(),
            other => Err(mismatch::<Self>(&other)),
        }
    }
}
