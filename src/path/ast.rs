//! Compiled path representation.

use super::filter::Filter;
use super::mapper::ValueMapper;
use super::parser::Parser;
use crate::error::{PathError, Result};
use crate::extract::adapter::Element;
use std::fmt;
use std::str::FromStr;

/// One navigation step: a member name, an element filter and an optional mapper.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSegment {
    field: String,
    filter: Filter,
    mapper: Option<ValueMapper>,
}

impl PathSegment {
    pub fn new(field: impl Into<String>, filter: Filter, mapper: Option<ValueMapper>) -> Self {
        Self {
            field: field.into(),
            filter,
            mapper,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    /// The mapper named in the path, if any.
    pub fn mapper(&self) -> Option<&ValueMapper> {
        self.mapper.as_ref()
    }

    /// Applies the segment's mapper, or `fallback` when the path names none.
    pub fn map<'a>(&self, element: Element<'a>, fallback: &ValueMapper) -> Element<'a> {
        self.mapper.as_ref().unwrap_or(fallback).apply(element)
    }
}

/// An immutable chain of segments compiled from path text.
///
/// The first segment is read from the root object; each following segment is read
/// from whatever the previous one produced.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPath {
    source: String,
    segments: Vec<PathSegment>,
}

impl CompiledPath {
    pub(crate) fn new(source: String, segments: Vec<PathSegment>) -> Self {
        Self { source, segments }
    }

    /// Compiles against the built-in mappers.
    ///
    /// ```
    /// use objpath::path::CompiledPath;
    ///
    /// let path = CompiledPath::compile("//orders/items[1:3]/").unwrap();
    /// assert_eq!(path.as_str(), "/orders/items[1:3]");
    /// assert_eq!(path.len(), 2);
    /// ```
    pub fn compile(text: &str) -> Result<Self> {
        Parser::default().parse(text)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false for a successfully compiled path.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The canonical path text.
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for CompiledPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl FromStr for CompiledPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self> {
        CompiledPath::compile(s)
    }
}
