//! One iteration strategy per container kind.
//!
//! Adapters turn a container into a flat sequence of [`Element`]s, rebuild a
//! container of the same kind from selected elements, and supply the value
//! mapper used when a path segment does not name one.

use super::access::CollectionFactory;
use crate::path::mapper::{self, ValueMapper};
use crate::value::Value;
use std::borrow::Cow;

/// The container kinds an adapter exists for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IterableKind {
    List,
    Set,
    Map,
    Array,
}

impl IterableKind {
    pub fn name(self) -> &'static str {
        match self {
            IterableKind::List => "list",
            IterableKind::Set => "set",
            IterableKind::Map => "map",
            IterableKind::Array => "array",
        }
    }
}

/// One element of a container as seen during list resolution.
///
/// `index` is the position for lists and arrays; `key` is the entry key for maps.
/// Values are borrowed from the graph until a mapper produces a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct Element<'a> {
    pub index: Option<usize>,
    pub key: Option<Cow<'a, Value>>,
    pub value: Cow<'a, Value>,
}

impl<'a> Element<'a> {
    /// An element that carries only a value.
    pub fn of(value: Cow<'a, Value>) -> Self {
        Self {
            index: None,
            key: None,
            value,
        }
    }

    /// True while the element is still a key+value pair.
    pub fn is_entry(&self) -> bool {
        self.key.is_some()
    }

    /// Text a key filter matches against: the entry key, else the value itself.
    pub fn key_text(&self) -> Option<Cow<'_, str>> {
        match &self.key {
            Some(key) => key.key_text(),
            None => self.value.key_text(),
        }
    }

    /// Replaces the value, dropping the key.
    pub fn map_value(self, f: impl FnOnce(&Value) -> Value) -> Self {
        let value = f(&self.value);
        Element {
            index: self.index,
            key: None,
            value: Cow::Owned(value),
        }
    }

    /// Detaches the element from the graph it was read from.
    pub fn into_owned(self) -> Element<'static> {
        Element {
            index: self.index,
            key: self.key.map(|k| Cow::Owned(k.into_owned())),
            value: Cow::Owned(self.value.into_owned()),
        }
    }
}

/// Iteration strategy for one container kind.
pub trait IterableAdapter: Send + Sync {
    fn kind(&self) -> IterableKind;

    /// The container's contents as `(key, value)` pairs; the key is only present
    /// for map entries. Returns nothing when handed a different kind.
    fn to_flat_collection<'a>(&self, container: &'a Value) -> Vec<(Option<&'a Value>, &'a Value)>;

    /// Wraps one flat item with its position.
    fn iteration_element<'a>(
        &self,
        index: usize,
        item: (Option<&'a Value>, &'a Value),
    ) -> Element<'a>;

    /// Builds a container of this kind holding the given elements.
    fn rebuild(&self, elements: Vec<Element<'static>>, factory: &dyn CollectionFactory) -> Value;

    /// Mapper applied when a segment names none.
    fn default_mapper(&self) -> &'static ValueMapper {
        mapper::identity()
    }

    /// Convenience over `to_flat_collection` and `iteration_element`.
    fn elements<'a>(&self, container: &'a Value) -> Vec<Element<'a>> {
        self.to_flat_collection(container)
            .into_iter()
            .enumerate()
            .map(|(index, item)| self.iteration_element(index, item))
            .collect()
    }
}

/// Adapter for `Value::List`.
pub struct ListAdapter;
/// Adapter for `Value::Set`.
pub struct SetAdapter;
/// Adapter for `Value::Map`.
pub struct MapAdapter;
/// Adapter for `Value::Array`.
pub struct ArrayAdapter;

static LIST: ListAdapter = ListAdapter;
static SET: SetAdapter = SetAdapter;
static MAP: MapAdapter = MapAdapter;
static ARRAY: ArrayAdapter = ArrayAdapter;

/// Returns the adapter responsible for a container kind.
pub fn adapter_for(kind: IterableKind) -> &'static dyn IterableAdapter {
    match kind {
        IterableKind::List => &LIST,
        IterableKind::Set => &SET,
        IterableKind::Map => &MAP,
        IterableKind::Array => &ARRAY,
    }
}

fn values(elements: Vec<Element<'static>>) -> impl Iterator<Item = Value> {
    elements.into_iter().map(|e| e.value.into_owned())
}

impl IterableAdapter for ListAdapter {
    fn kind(&self) -> IterableKind {
        IterableKind::List
    }

    fn to_flat_collection<'a>(&self, container: &'a Value) -> Vec<(Option<&'a Value>, &'a Value)> {
        match container {
            Value::List(items) => items.iter().map(|v| (None, v)).collect(),
            _ => Vec::new(),
        }
    }

    fn iteration_element<'a>(
        &self,
        index: usize,
        (_, value): (Option<&'a Value>, &'a Value),
    ) -> Element<'a> {
        Element {
            index: Some(index),
            key: None,
            value: Cow::Borrowed(value),
        }
    }

    fn rebuild(&self, elements: Vec<Element<'static>>, factory: &dyn CollectionFactory) -> Value {
        match factory.instantiate(IterableKind::List) {
            Value::List(mut items) => {
                items.extend(values(elements));
                Value::List(items)
            }
            _ => Value::List(values(elements).collect()),
        }
    }
}

impl IterableAdapter for ArrayAdapter {
    fn kind(&self) -> IterableKind {
        IterableKind::Array
    }

    fn to_flat_collection<'a>(&self, container: &'a Value) -> Vec<(Option<&'a Value>, &'a Value)> {
        match container {
            Value::Array(items) => items.iter().map(|v| (None, v)).collect(),
            _ => Vec::new(),
        }
    }

    fn iteration_element<'a>(
        &self,
        index: usize,
        (_, value): (Option<&'a Value>, &'a Value),
    ) -> Element<'a> {
        Element {
            index: Some(index),
            key: None,
            value: Cow::Borrowed(value),
        }
    }

    fn rebuild(&self, elements: Vec<Element<'static>>, factory: &dyn CollectionFactory) -> Value {
        match factory.instantiate(IterableKind::Array) {
            Value::Array(mut items) => {
                items.extend(values(elements));
                Value::Array(items)
            }
            _ => Value::Array(values(elements).collect()),
        }
    }
}

impl IterableAdapter for SetAdapter {
    fn kind(&self) -> IterableKind {
        IterableKind::Set
    }

    fn to_flat_collection<'a>(&self, container: &'a Value) -> Vec<(Option<&'a Value>, &'a Value)> {
        match container {
            Value::Set(items) => items.iter().map(|v| (None, v)).collect(),
            _ => Vec::new(),
        }
    }

    fn iteration_element<'a>(
        &self,
        _index: usize,
        (_, value): (Option<&'a Value>, &'a Value),
    ) -> Element<'a> {
        Element::of(Cow::Borrowed(value))
    }

    fn rebuild(&self, elements: Vec<Element<'static>>, factory: &dyn CollectionFactory) -> Value {
        match factory.instantiate(IterableKind::Set) {
            Value::Set(mut items) => {
                items.extend(values(elements));
                Value::Set(items)
            }
            _ => Value::Set(values(elements).collect()),
        }
    }
}

impl IterableAdapter for MapAdapter {
    fn kind(&self) -> IterableKind {
        IterableKind::Map
    }

    fn to_flat_collection<'a>(&self, container: &'a Value) -> Vec<(Option<&'a Value>, &'a Value)> {
        match container {
            Value::Map(entries) => entries.iter().map(|(k, v)| (Some(k), v)).collect(),
            _ => Vec::new(),
        }
    }

    fn iteration_element<'a>(
        &self,
        _index: usize,
        (key, value): (Option<&'a Value>, &'a Value),
    ) -> Element<'a> {
        Element {
            index: None,
            key: key.map(Cow::Borrowed),
            value: Cow::Borrowed(value),
        }
    }

    /// Rebuilds a map while every element is still an entry. Once a mapper has
    /// reduced entries to plain values the flat sequence comes back as a list.
    fn rebuild(&self, elements: Vec<Element<'static>>, factory: &dyn CollectionFactory) -> Value {
        if !elements.iter().all(Element::is_entry) {
            return LIST.rebuild(elements, factory);
        }

        let entries = elements.into_iter().filter_map(|e| {
            let key = e.key?.into_owned();
            Some((key, e.value.into_owned()))
        });
        match factory.instantiate(IterableKind::Map) {
            Value::Map(mut map) => {
                map.extend(entries);
                Value::Map(map)
            }
            _ => Value::Map(entries.collect()),
        }
    }

    fn default_mapper(&self) -> &'static ValueMapper {
        mapper::value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::access::DefaultCollections;

    #[test]
    fn test_list_elements_carry_index() {
        let list = Value::list(["a", "b"]);
        let elements = adapter_for(IterableKind::List).elements(&list);
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[1].index, Some(1));
        assert_eq!(elements[1].key, None);
        assert_eq!(*elements[1].value, Value::from("b"));
    }

    #[test]
    fn test_set_elements_have_no_index() {
        let set = Value::set(["x"]);
        let elements = adapter_for(IterableKind::Set).elements(&set);
        assert_eq!(elements[0].index, None);
        assert_eq!(elements[0].key_text().as_deref(), Some("x"));
    }

    #[test]
    fn test_map_elements_are_entries() {
        let map = Value::map([("k1", 1), ("k2", 2)]);
        let elements = adapter_for(IterableKind::Map).elements(&map);
        assert!(elements.iter().all(Element::is_entry));
        assert_eq!(elements[0].key_text().as_deref(), Some("k1"));
        assert_eq!(*elements[0].value, Value::Int(1));
    }

    #[test]
    fn test_wrong_kind_yields_nothing() {
        let set = Value::set([1]);
        assert!(adapter_for(IterableKind::List).elements(&set).is_empty());
    }

    #[test]
    fn test_rebuild_same_kind() {
        let factory = DefaultCollections;
        let set = Value::set([1, 2]);
        let adapter = adapter_for(IterableKind::Set);
        let elements = adapter
            .elements(&set)
            .into_iter()
            .map(Element::into_owned)
            .collect();
        assert_eq!(adapter.rebuild(elements, &factory), set);
    }

    #[test]
    fn test_map_rebuild_keeps_entries() {
        let factory = DefaultCollections;
        let map = Value::map([("a", 1), ("b", 2)]);
        let adapter = adapter_for(IterableKind::Map);
        let elements = adapter
            .elements(&map)
            .into_iter()
            .map(Element::into_owned)
            .collect();
        assert_eq!(adapter.rebuild(elements, &factory), map);
    }

    #[test]
    fn test_map_rebuild_degrades_to_list() {
        let factory = DefaultCollections;
        let map = Value::map([("a", 1), ("b", 2)]);
        let adapter = adapter_for(IterableKind::Map);
        let elements = adapter
            .elements(&map)
            .into_iter()
            .map(|e| adapter.default_mapper().apply(e).into_owned())
            .collect();
        assert_eq!(adapter.rebuild(elements, &factory), Value::list([1, 2]));
    }

    #[test]
    fn test_default_mappers() {
        assert_eq!(adapter_for(IterableKind::Map).default_mapper().name(), "value");
        assert_eq!(adapter_for(IterableKind::List).default_mapper().name(), "identity");
    }
}
