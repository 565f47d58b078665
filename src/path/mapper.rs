//! Named value mappers applied after extraction.
//!
//! A mapper is the `.name` suffix of a path segment. Three are built in:
//!
//! - `identity` - leaves the element as it is (map entries stay entries)
//! - `key` - the entry key for maps, the position for lists and arrays, the
//!   member itself for sets
//! - `value` - the element value, dropping the key
//!
//! Further mappers can be registered on a [`MapperRegistry`] before paths are
//! compiled against it.

use crate::error::{PathError, Result};
use crate::extract::adapter::Element;
use crate::value::Value;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

type MapperFn = dyn for<'a> Fn(Element<'a>) -> Element<'a> + Send + Sync;

/// A named, pure element transform.
#[derive(Clone)]
pub struct ValueMapper {
    name: String,
    func: Arc<MapperFn>,
}

impl ValueMapper {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: for<'a> Fn(Element<'a>) -> Element<'a> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn apply<'a>(&self, element: Element<'a>) -> Element<'a> {
        (self.func)(element)
    }
}

impl fmt::Debug for ValueMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ValueMapper").field(&self.name).finish()
    }
}

/// Mappers are identified by name.
impl PartialEq for ValueMapper {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

static IDENTITY: LazyLock<ValueMapper> = LazyLock::new(|| ValueMapper::new("identity", |e| e));

static KEY: LazyLock<ValueMapper> = LazyLock::new(|| {
    ValueMapper::new("key", |e| {
        let Element { index, key, value } = e;
        let value = match (key, index) {
            (Some(key), _) => key,
            (None, Some(i)) => Cow::Owned(Value::Int(i as i64)),
            (None, None) => value,
        };
        Element {
            index,
            key: None,
            value,
        }
    })
});

static VALUE: LazyLock<ValueMapper> = LazyLock::new(|| {
    ValueMapper::new("value", |e| Element {
        index: e.index,
        key: None,
        value: e.value,
    })
});

pub fn identity() -> &'static ValueMapper {
    &IDENTITY
}

pub fn key() -> &'static ValueMapper {
    &KEY
}

pub fn value() -> &'static ValueMapper {
    &VALUE
}

/// Lookup table from mapper name to mapper.
#[derive(Debug, Clone)]
pub struct MapperRegistry {
    mappers: HashMap<String, ValueMapper>,
}

impl MapperRegistry {
    /// Creates a registry holding the built-in mappers.
    pub fn new() -> Self {
        let mut mappers = HashMap::new();
        for mapper in [identity(), key(), value()] {
            mappers.insert(mapper.name().to_string(), mapper.clone());
        }
        Self { mappers }
    }

    /// Registers a mapper under `name`, returning the mapper it replaces.
    pub fn register<F>(&mut self, name: &str, func: F) -> Option<ValueMapper>
    where
        F: for<'a> Fn(Element<'a>) -> Element<'a> + Send + Sync + 'static,
    {
        self.mappers
            .insert(name.to_string(), ValueMapper::new(name, func))
    }

    pub fn get(&self, name: &str) -> Option<&ValueMapper> {
        self.mappers.get(name)
    }

    /// Like `get`, but an unknown name is a malformed path.
    pub fn lookup(&self, name: &str) -> Result<&ValueMapper> {
        self.get(name)
            .ok_or_else(|| PathError::malformed(name, format!("unknown value mapper '{}'", name)))
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.mappers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for MapperRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// The registry used when paths are compiled without one.
pub(crate) fn builtin_registry() -> &'static MapperRegistry {
    static BUILTIN: LazyLock<MapperRegistry> = LazyLock::new(MapperRegistry::new);
    &BUILTIN
}
