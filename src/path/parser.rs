//! Path text compiler.
//!
//! Grammar:
//!
//! ```text
//! path       := ("/")? segment ("/" segment)*
//! segment    := name ("[" filterExpr "]")? ("." mapperName)?
//! ```
//!
//! Repeated and trailing separators are collapsed before splitting, so
//! `//a///b/` compiles the same as `/a/b`. A `/` inside brackets belongs to the
//! filter text.

use super::ast::{CompiledPath, PathSegment};
use super::filter::Filter;
use super::mapper::{builtin_registry, MapperRegistry};
use crate::error::{PathError, Result};
use log::debug;

/// Upper bound on segments per path unless configured otherwise.
pub const DEFAULT_MAX_SEGMENTS: usize = 64;

/// Compiles path text into a [`CompiledPath`], resolving mapper names against a
/// registry.
#[derive(Debug, Clone, Copy)]
pub struct Parser<'r> {
    registry: &'r MapperRegistry,
    max_segments: usize,
}

impl Default for Parser<'static> {
    fn default() -> Self {
        Parser::new(builtin_registry())
    }
}

impl<'r> Parser<'r> {
    pub fn new(registry: &'r MapperRegistry) -> Self {
        Self {
            registry,
            max_segments: DEFAULT_MAX_SEGMENTS,
        }
    }

    pub fn with_max_segments(mut self, max_segments: usize) -> Self {
        self.max_segments = max_segments;
        self
    }

    pub fn parse(&self, text: &str) -> Result<CompiledPath> {
        let canonical = canonicalize(text)?;

        let elements = split_elements(&canonical);
        if elements.len() > self.max_segments {
            return Err(PathError::malformed(
                text,
                format!(
                    "{} segments exceeds the limit of {}",
                    elements.len(),
                    self.max_segments
                ),
            ));
        }

        let segments = elements
            .into_iter()
            .map(|element| self.parse_segment(element, text))
            .collect::<Result<Vec<_>>>()?;

        debug!("compiled '{}' into {} segments", canonical, segments.len());
        Ok(CompiledPath::new(canonical, segments))
    }

    /// Parses one element: `name`, `name[filter]`, `name.mapper` or
    /// `name[filter].mapper`.
    fn parse_segment(&self, element: &str, path: &str) -> Result<PathSegment> {
        let bracket = element.find('[');
        let dot = element.find('.');

        let (name, filter_text, mapper_name) = match (bracket, dot) {
            (Some(open), dot) if dot.map_or(true, |d| open < d) => {
                let close = element[open..]
                    .find(']')
                    .map(|c| open + c)
                    .ok_or_else(|| PathError::malformed(path, "unclosed '['"))?;
                let rest = &element[close + 1..];
                let mapper_name = if rest.is_empty() {
                    None
                } else if let Some(name) = rest.strip_prefix('.') {
                    Some(name)
                } else {
                    return Err(PathError::malformed(
                        path,
                        format!("unexpected '{}' after filter", rest),
                    ));
                };
                (&element[..open], Some(&element[open + 1..close]), mapper_name)
            }
            (_, Some(d)) => {
                let mapper_name = &element[d + 1..];
                if mapper_name.contains('[') {
                    return Err(PathError::malformed(
                        path,
                        "a filter must come before the mapper",
                    ));
                }
                (&element[..d], None, Some(mapper_name))
            }
            _ => (element, None, None),
        };

        if name.is_empty() {
            return Err(PathError::malformed(path, "empty field name"));
        }
        if !is_valid_identifier(name) {
            return Err(PathError::malformed(
                path,
                format!("'{}' is not a valid field name", name),
            ));
        }

        let filter = match filter_text {
            Some(text) if text.trim().is_empty() => {
                return Err(PathError::malformed(path, "empty filter expression"));
            }
            Some(text) => Filter::compile(text).map_err(|e| e.with_path(path))?,
            None => Filter::NoFilter,
        };

        let mapper = match mapper_name {
            Some("") => return Err(PathError::malformed(path, "empty mapper name")),
            Some(name) => Some(
                self.registry
                    .lookup(name)
                    .map_err(|e| e.with_path(path))?
                    .clone(),
            ),
            None => None,
        };

        Ok(PathSegment::new(name, filter, mapper))
    }
}

/// Normalizes separators and checks bracket balance.
///
/// The result always has exactly one leading `/`, no empty elements and no
/// trailing `/`.
pub fn canonicalize(text: &str) -> Result<String> {
    let mut out = String::with_capacity(text.len() + 1);
    out.push('/');
    let mut in_brackets = false;

    for ch in text.chars() {
        match ch {
            '[' if in_brackets => {
                return Err(PathError::malformed(text, "nested '[' in filter"));
            }
            '[' => {
                in_brackets = true;
                out.push(ch);
            }
            ']' if !in_brackets => {
                return Err(PathError::malformed(text, "unbalanced ']'"));
            }
            ']' => {
                in_brackets = false;
                out.push(ch);
            }
            '/' if !in_brackets => {
                if !out.ends_with('/') {
                    out.push('/');
                }
            }
            _ => out.push(ch),
        }
    }

    if in_brackets {
        return Err(PathError::malformed(text, "unclosed '['"));
    }
    if out.len() > 1 && out.ends_with('/') {
        out.pop();
    }
    if out == "/" {
        return Err(PathError::malformed(text, "path has no segments"));
    }
    Ok(out)
}

/// Splits a canonical path into its elements, ignoring `/` inside brackets.
fn split_elements(canonical: &str) -> Vec<&str> {
    let body = canonical.strip_prefix('/').unwrap_or(canonical);
    let mut elements = Vec::new();
    let mut start = 0;
    let mut in_brackets = false;

    for (i, ch) in body.char_indices() {
        match ch {
            '[' => in_brackets = true,
            ']' => in_brackets = false,
            '/' if !in_brackets => {
                elements.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    elements.push(&body[start..]);
    elements
}

/// Field names start with a letter, `_` or `$` and continue with letters, digits,
/// `_` or `$`. A lone `_` is rejected.
pub fn is_valid_identifier(name: &str) -> bool {
    if name == "_" {
        return false;
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == '$' => {}
        _ => return false,
    }
    chars.all(|ch| ch.is_alphanumeric() || ch == '_' || ch == '$')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::filter::KeyPattern;
    use std::collections::BTreeSet;

    fn parse(text: &str) -> Result<CompiledPath> {
        Parser::default().parse(text)
    }

    #[test]
    fn test_parse_single_field() {
        let path = parse("/store").unwrap();
        assert_eq!(path.len(), 1);
        assert_eq!(path.segments()[0].field(), "store");
        assert_eq!(path.segments()[0].filter(), &Filter::NoFilter);
        assert!(path.segments()[0].mapper().is_none());
    }

    #[test]
    fn test_parse_nested_fields() {
        let path = parse("/a/b/c").unwrap();
        let fields: Vec<&str> = path.segments().iter().map(|s| s.field()).collect();
        assert_eq!(fields, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_leading_slash_optional() {
        assert_eq!(parse("a/b").unwrap(), parse("/a/b").unwrap());
    }

    #[test]
    fn test_canonicalizes_separators() {
        let path = parse("//a///b/").unwrap();
        assert_eq!(path.as_str(), "/a/b");
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn test_parse_index() {
        let path = parse("/list[2]").unwrap();
        assert_eq!(path.segments()[0].filter(), &Filter::Index(2));
    }

    #[test]
    fn test_parse_range_and_set() {
        let path = parse("/list[1:3]/other[1,3,4]").unwrap();
        assert_eq!(
            path.segments()[0].filter(),
            &Filter::IndexRange {
                min: 1,
                max: Some(3)
            }
        );
        assert_eq!(
            path.segments()[1].filter(),
            &Filter::IndexSet(BTreeSet::from([1, 3, 4]))
        );
    }

    #[test]
    fn test_parse_mapper() {
        let path = parse("/map.key").unwrap();
        assert_eq!(path.segments()[0].field(), "map");
        assert_eq!(path.segments()[0].mapper().map(|m| m.name()), Some("key"));
    }

    #[test]
    fn test_parse_filter_then_mapper() {
        let path = parse("/map[k*].value").unwrap();
        let segment = &path.segments()[0];
        assert_eq!(segment.field(), "map");
        assert!(matches!(segment.filter(), Filter::Key(KeyPattern::Wildcard(_))));
        assert_eq!(segment.mapper().map(|m| m.name()), Some("value"));
    }

    #[test]
    fn test_dot_inside_filter_is_key_text() {
        let path = parse("/hosts[db.internal]").unwrap();
        assert_eq!(
            path.segments()[0].filter(),
            &Filter::Key(KeyPattern::Literal("db.internal".to_string()))
        );
    }

    #[test]
    fn test_slash_inside_filter_is_key_text() {
        let path = parse("/routes[/api/v1]/handler").unwrap();
        assert_eq!(path.len(), 2);
        assert_eq!(
            path.segments()[0].filter(),
            &Filter::Key(KeyPattern::Literal("/api/v1".to_string()))
        );
    }

    #[test]
    fn test_parse_empty_fails() {
        assert!(parse("").is_err());
        assert!(parse("/").is_err());
        assert!(parse("///").is_err());
    }

    #[test]
    fn test_unbalanced_brackets_fail() {
        assert!(parse("/a[1").is_err());
        assert!(parse("/a]1").is_err());
        assert!(parse("/a[[1]]").is_err());
    }

    #[test]
    fn test_empty_sub_expressions_fail() {
        assert!(parse("/a[]").is_err());
        assert!(parse("/a[ ]").is_err());
        assert!(parse("/a.").is_err());
        assert!(parse("/a[1].").is_err());
        assert!(parse("/[1]").is_err());
        assert!(parse("/.key").is_err());
    }

    #[test]
    fn test_invalid_identifiers_fail() {
        assert!(parse("/1abc").is_err());
        assert!(parse("/_").is_err());
        assert!(parse("/a-b").is_err());
        assert!(parse("/a b").is_err());
        assert!(parse("/_private/$ref").is_ok());
    }

    #[test]
    fn test_unknown_mapper_fails() {
        let err = parse("/map.nope").unwrap_err();
        assert_eq!(
            err,
            PathError::malformed("/map.nope", "unknown value mapper 'nope'")
        );
    }

    #[test]
    fn test_text_after_filter_fails() {
        assert!(parse("/a[1]x").is_err());
        assert!(parse("/a.key[1]").is_err());
    }

    #[test]
    fn test_filter_error_reports_full_path() {
        match parse("/a/b[4:2]") {
            Err(PathError::MalformedPath { path, .. }) => assert_eq!(path, "/a/b[4:2]"),
            other => panic!("expected malformed path, got {:?}", other),
        }
    }

    #[test]
    fn test_max_segments() {
        let registry = MapperRegistry::new();
        let parser = Parser::new(&registry).with_max_segments(2);
        assert!(parser.parse("/a/b").is_ok());
        assert!(parser.parse("/a/b/c").is_err());
    }

    #[test]
    fn test_custom_mapper_resolves() {
        let mut registry = MapperRegistry::new();
        registry.register("twice", |e| e);
        let path = Parser::new(&registry).parse("/xs.twice").unwrap();
        assert_eq!(path.segments()[0].mapper().map(|m| m.name()), Some("twice"));
    }

    #[test]
    fn test_identifier_rules() {
        assert!(is_valid_identifier("name"));
        assert!(is_valid_identifier("_name1"));
        assert!(is_valid_identifier("$ref"));
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("9lives"));
    }
}
