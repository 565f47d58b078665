use super::access::{CollectionFactory, MemberAccess, TypeClassifier};
use super::adapter::{adapter_for, Element, IterableKind};
use crate::convert::{FromValue, Shape};
use crate::error::{PathError, Result};
use crate::path::ast::PathSegment;
use crate::path::mapper;
use crate::value::Value;
use log::trace;
use std::borrow::Cow;

static NULL: Value = Value::Null;

/// Result contract of a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// One value; irreducible multiplicity is an error
    Get,
    /// Always a list, possibly empty
    List,
}

/// Per-call settings threaded through the recursion.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionContext {
    pub mode: Mode,
    pub requested: Shape,
    pub cast_requested: bool,
    accepts: fn(&Value) -> bool,
    within_collection: bool,
}

impl ExtractionContext {
    /// Context for extracting a `T`.
    pub fn for_type<T: FromValue>(mode: Mode) -> Self {
        let requested = T::shape();
        Self {
            mode,
            requested,
            cast_requested: requested != Shape::Any,
            accepts: T::accepts,
            within_collection: false,
        }
    }

    /// True when `value` is assignable to the requested type.
    pub fn accepts(&self, value: &Value) -> bool {
        (self.accepts)(value)
    }

    fn nested(self) -> Self {
        Self {
            within_collection: true,
            ..self
        }
    }
}

/// Intermediate result: one value or a list of elements.
///
/// `kind` records which container the elements were selected from, so GET
/// results can be rebuilt into that same kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted {
    Single(Value),
    Many {
        items: Vec<Element<'static>>,
        kind: IterableKind,
    },
}

impl Extracted {
    fn empty() -> Self {
        Extracted::Many {
            items: Vec::new(),
            kind: IterableKind::List,
        }
    }
}

/// Walks a graph along compiled segments.
pub struct Evaluator<'e> {
    access: &'e dyn MemberAccess,
    classifier: &'e dyn TypeClassifier,
    factory: &'e dyn CollectionFactory,
    unknown_field_as_null: bool,
}

impl<'e> Evaluator<'e> {
    pub fn new(
        access: &'e dyn MemberAccess,
        classifier: &'e dyn TypeClassifier,
        factory: &'e dyn CollectionFactory,
    ) -> Self {
        Evaluator {
            access,
            classifier,
            factory,
            unknown_field_as_null: false,
        }
    }

    /// Resolve missing members as null instead of failing.
    pub fn unknown_field_as_null(mut self, enabled: bool) -> Self {
        self.unknown_field_as_null = enabled;
        self
    }

    /// Resolves `segments` starting at `object`.
    pub fn resolve(
        &self,
        object: &Value,
        segments: &[PathSegment],
        ctx: &ExtractionContext,
    ) -> Result<Extracted> {
        let Some((segment, rest)) = segments.split_first() else {
            return Ok(wrap(object.clone(), ctx));
        };

        let value = match self.access.member(object, segment.field()) {
            Ok(value) => value,
            Err(PathError::UnknownField { .. }) if self.unknown_field_as_null => &NULL,
            Err(e) => return Err(e),
        };
        trace!(
            "segment '{}' on {} -> {}",
            segment.field(),
            object.type_name(),
            value.type_name()
        );

        if value.is_null() {
            return Ok(wrap(Value::Null, ctx));
        }

        if let Some(kind) = self.classifier.iterable_kind_of(value) {
            return self.resolve_list(value, kind, segment, rest, ctx);
        }

        let mapped = segment.map(Element::of(Cow::Borrowed(value)), mapper::identity());
        if self.classifier.is_terminal(&mapped.value) {
            return Ok(wrap(mapped.value.into_owned(), ctx));
        }
        self.resolve(&mapped.value, rest, ctx)
    }

    fn resolve_list(
        &self,
        container: &Value,
        kind: IterableKind,
        segment: &PathSegment,
        rest: &[PathSegment],
        ctx: &ExtractionContext,
    ) -> Result<Extracted> {
        let adapter = adapter_for(kind);

        if ctx.mode == Mode::Get
            && rest.is_empty()
            && !ctx.within_collection
            && !segment.filter().is_filtered()
            && segment.mapper().is_none()
            && ctx.accepts(container)
        {
            return Ok(Extracted::Single(container.clone()));
        }

        let fallback = adapter.default_mapper();
        let selected: Vec<Element<'_>> = adapter
            .elements(container)
            .into_iter()
            .filter(|e| segment.filter().matches(e))
            .map(|e| segment.map(e, fallback))
            .collect();
        trace!(
            "'{}' selected {} element(s) from a {}",
            segment.field(),
            selected.len(),
            kind.name()
        );

        if ctx.mode == Mode::Get && rest.is_empty() {
            let items = selected.into_iter().map(Element::into_owned).collect();
            return self.collapse(items, kind, segment, ctx);
        }

        let nested = ctx.nested();
        let mut items = Vec::new();
        for element in selected {
            if element.value.is_null() {
                continue;
            }
            match self.resolve(&element.value, rest, &nested)? {
                Extracted::Single(value) if value.is_null() => {}
                Extracted::Single(value) => items.push(Element::of(Cow::Owned(value))),
                Extracted::Many { items: sub, .. } => items.extend(sub),
            }
        }

        match ctx.mode {
            Mode::List => Ok(Extracted::Many {
                items,
                kind: IterableKind::List,
            }),
            Mode::Get => self.collapse(items, IterableKind::List, segment, ctx),
        }
    }

    /// Reduces selected elements to the GET contract.
    fn collapse(
        &self,
        mut items: Vec<Element<'static>>,
        kind: IterableKind,
        segment: &PathSegment,
        ctx: &ExtractionContext,
    ) -> Result<Extracted> {
        match items.len() {
            0 => Ok(match ctx.requested {
                Shape::Container(_) => Extracted::Many { items, kind },
                _ => Extracted::Single(Value::Null),
            }),
            1 if items[0].value.is_null() || ctx.accepts(&items[0].value) => {
                let only = items.remove(0);
                Ok(Extracted::Single(only.value.into_owned()))
            }
            count if !ctx.requested.is_container_compatible() => {
                Err(PathError::AmbiguousCardinality {
                    field: segment.field().to_string(),
                    count,
                })
            }
            _ => Ok(Extracted::Many { items, kind }),
        }
    }

    /// Turns a resolution into a single value, rebuilding containers.
    pub fn finish_get(&self, extracted: Extracted) -> Option<Value> {
        match extracted {
            Extracted::Single(Value::Null) => None,
            Extracted::Single(value) => Some(value),
            Extracted::Many { items, kind } => Some(adapter_for(kind).rebuild(items, self.factory)),
        }
    }

    /// Turns a resolution into a list of values.
    pub fn finish_list(&self, extracted: Extracted) -> Vec<Value> {
        match extracted {
            Extracted::Single(Value::Null) => Vec::new(),
            Extracted::Single(value) => vec![value],
            Extracted::Many { items, .. } => items
                .into_iter()
                .map(|e| e.value.into_owned())
                .collect(),
        }
    }
}

/// Wraps one resolved value per mode; null becomes an empty list in LIST mode.
fn wrap(value: Value, ctx: &ExtractionContext) -> Extracted {
    match (ctx.mode, value) {
        (Mode::Get, value) => Extracted::Single(value),
        (Mode::List, Value::Null) => Extracted::empty(),
        (Mode::List, value) => Extracted::Many {
            items: vec![Element::of(Cow::Owned(value))],
            kind: IterableKind::List,
        },
    }
}
