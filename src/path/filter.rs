//! Bracket filter expressions.
//!
//! The text between `[` and `]` in a path segment compiles into one of the
//! [`Filter`] variants. Recognition runs in priority order:
//!
//! 1. empty - no filter
//! 2. all digits - a single index (`[2]`)
//! 3. contains `:` - an index range, upper bound exclusive and optional (`[1:3]`, `[3:]`)
//! 4. contains `,` - an index set when every token is numeric (`[1,3,4]`),
//!    otherwise a key set (`[k1,k*]`)
//! 5. anything else - a single key, optionally wildcarded (`[*foo*]`)

use super::wildcard::WildcardPattern;
use crate::error::{PathError, Result};
use crate::extract::adapter::Element;
use std::collections::BTreeSet;

/// A literal key or a wildcard pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyPattern {
    Literal(String),
    Wildcard(WildcardPattern),
}

impl KeyPattern {
    pub fn new(token: &str) -> Self {
        if WildcardPattern::is_wildcard(token) {
            KeyPattern::Wildcard(WildcardPattern::new(token))
        } else {
            KeyPattern::Literal(token.to_string())
        }
    }

    pub fn matches(&self, text: &str) -> bool {
        match self {
            KeyPattern::Literal(literal) => literal == text,
            KeyPattern::Wildcard(pattern) => pattern.matches(text),
        }
    }
}

/// A compiled element filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Every element passes
    NoFilter,
    Index(usize),
    /// `min` inclusive, `max` exclusive; no `max` means open-ended
    IndexRange { min: usize, max: Option<usize> },
    IndexSet(BTreeSet<usize>),
    Key(KeyPattern),
    KeySet(Vec<KeyPattern>),
}

fn is_numeric(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

fn parse_index(token: &str, expr: &str) -> Result<usize> {
    token
        .parse::<usize>()
        .map_err(|_| PathError::malformed(expr, format!("invalid index '{}'", token)))
}

impl Filter {
    /// Compiles a bracket sub-expression (without the brackets).
    pub fn compile(expr: &str) -> Result<Filter> {
        let text = expr.trim();
        if text.is_empty() {
            return Ok(Filter::NoFilter);
        }

        if is_numeric(text) {
            return Ok(Filter::Index(parse_index(text, expr)?));
        }

        if let Some((left, right)) = text.split_once(':') {
            return Self::compile_range(left.trim(), right.trim(), expr);
        }

        if text.contains(',') {
            let tokens: Vec<&str> = text.split(',').map(str::trim).collect();
            if tokens.iter().any(|t| t.is_empty()) {
                return Err(PathError::malformed(expr, "empty token in filter set"));
            }
            if tokens.iter().all(|t| is_numeric(t)) {
                let indexes = tokens
                    .iter()
                    .map(|t| parse_index(t, expr))
                    .collect::<Result<BTreeSet<usize>>>()?;
                return Ok(Filter::IndexSet(indexes));
            }
            return Ok(Filter::KeySet(
                tokens.into_iter().map(KeyPattern::new).collect(),
            ));
        }

        Ok(Filter::Key(KeyPattern::new(text)))
    }

    fn compile_range(left: &str, right: &str, expr: &str) -> Result<Filter> {
        if left.is_empty() {
            return Err(PathError::malformed(expr, "range needs a lower bound"));
        }
        if !is_numeric(left) {
            return Err(PathError::malformed(
                expr,
                format!("range bound '{}' is not numeric", left),
            ));
        }
        let min = parse_index(left, expr)?;

        let max = if right.is_empty() {
            None
        } else if is_numeric(right) {
            Some(parse_index(right, expr)?)
        } else {
            return Err(PathError::malformed(
                expr,
                format!("range bound '{}' is not numeric", right),
            ));
        };

        if let Some(max) = max {
            if min > max {
                return Err(PathError::malformed(
                    expr,
                    format!("invalid range: start ({}) > end ({})", min, max),
                ));
            }
        }

        Ok(Filter::IndexRange { min, max })
    }

    pub fn is_filtered(&self) -> bool {
        !matches!(self, Filter::NoFilter)
    }

    /// Tests one element.
    ///
    /// Index filters use the element position where there is one. Map entries and
    /// set members have no position, so their key text is compared with the
    /// number instead; this keeps numeric-looking string keys addressable.
    pub fn matches(&self, element: &Element<'_>) -> bool {
        match self {
            Filter::NoFilter => true,
            Filter::Index(i) => match element.index {
                Some(idx) => idx == *i,
                None => key_equals_number(element, *i),
            },
            Filter::IndexRange { min, max } => {
                let position = match element.index {
                    Some(idx) => Some(idx),
                    None => element.key_text().and_then(|t| t.parse::<usize>().ok()),
                };
                position.is_some_and(|p| p >= *min && max.map_or(true, |m| p < m))
            }
            Filter::IndexSet(indexes) => match element.index {
                Some(idx) => indexes.contains(&idx),
                None => indexes.iter().any(|i| key_equals_number(element, *i)),
            },
            Filter::Key(pattern) => element.key_text().is_some_and(|t| pattern.matches(&t)),
            Filter::KeySet(patterns) => element
                .key_text()
                .is_some_and(|t| patterns.iter().any(|p| p.matches(&t))),
        }
    }
}

fn key_equals_number(element: &Element<'_>, number: usize) -> bool {
    element
        .key_text()
        .is_some_and(|t| t.as_ref() == number.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use std::borrow::Cow;

    fn at(index: usize, value: &Value) -> Element<'_> {
        Element {
            index: Some(index),
            key: None,
            value: Cow::Borrowed(value),
        }
    }

    fn entry<'a>(key: &'a Value, value: &'a Value) -> Element<'a> {
        Element {
            index: None,
            key: Some(Cow::Borrowed(key)),
            value: Cow::Borrowed(value),
        }
    }

    #[test]
    fn test_compile_empty() {
        assert_eq!(Filter::compile("").unwrap(), Filter::NoFilter);
        assert_eq!(Filter::compile("  ").unwrap(), Filter::NoFilter);
    }

    #[test]
    fn test_compile_index() {
        assert_eq!(Filter::compile("2").unwrap(), Filter::Index(2));
    }

    #[test]
    fn test_compile_ranges() {
        assert_eq!(
            Filter::compile("1:3").unwrap(),
            Filter::IndexRange {
                min: 1,
                max: Some(3)
            }
        );
        assert_eq!(
            Filter::compile("3:").unwrap(),
            Filter::IndexRange { min: 3, max: None }
        );
    }

    #[test]
    fn test_compile_bad_ranges() {
        assert!(Filter::compile(":3").is_err());
        assert!(Filter::compile("a:3").is_err());
        assert!(Filter::compile("1:b").is_err());
        assert!(Filter::compile("4:2").is_err());
    }

    #[test]
    fn test_compile_index_set() {
        assert_eq!(
            Filter::compile("1,3,4").unwrap(),
            Filter::IndexSet(BTreeSet::from([1, 3, 4]))
        );
    }

    #[test]
    fn test_mixed_set_degrades_to_keys() {
        assert_eq!(
            Filter::compile("1,k2").unwrap(),
            Filter::KeySet(vec![
                KeyPattern::Literal("1".to_string()),
                KeyPattern::Literal("k2".to_string()),
            ])
        );
    }

    #[test]
    fn test_compile_key_set_with_wildcards() {
        let filter = Filter::compile("k1, k*").unwrap();
        assert_eq!(
            filter,
            Filter::KeySet(vec![
                KeyPattern::Literal("k1".to_string()),
                KeyPattern::Wildcard(WildcardPattern::new("k*")),
            ])
        );
    }

    #[test]
    fn test_compile_empty_set_token() {
        assert!(Filter::compile("a,,b").is_err());
        assert!(Filter::compile("1,").is_err());
    }

    #[test]
    fn test_compile_key() {
        assert_eq!(
            Filter::compile("k1").unwrap(),
            Filter::Key(KeyPattern::Literal("k1".to_string()))
        );
        assert_eq!(
            Filter::compile("*foo*").unwrap(),
            Filter::Key(KeyPattern::Wildcard(WildcardPattern::new("*foo*")))
        );
    }

    #[test]
    fn test_index_matches_position() {
        let v = Value::Int(0);
        let filter = Filter::Index(1);
        assert!(filter.matches(&at(1, &v)));
        assert!(!filter.matches(&at(0, &v)));
    }

    #[test]
    fn test_range_matches() {
        let v = Value::Int(0);
        let bounded = Filter::compile("1:3").unwrap();
        assert!(!bounded.matches(&at(0, &v)));
        assert!(bounded.matches(&at(1, &v)));
        assert!(bounded.matches(&at(2, &v)));
        assert!(!bounded.matches(&at(3, &v)));

        let open = Filter::compile("3:").unwrap();
        assert!(open.matches(&at(100, &v)));
        assert!(!open.matches(&at(2, &v)));
    }

    #[test]
    fn test_index_set_on_string_keys() {
        let (k1, k3, v) = (Value::from("1"), Value::from("3"), Value::Int(0));
        let filter = Filter::compile("1,2").unwrap();
        assert!(filter.matches(&entry(&k1, &v)));
        assert!(!filter.matches(&entry(&k3, &v)));
    }

    #[test]
    fn test_key_matches_entry_key_not_value() {
        let (k, v) = (Value::from("name"), Value::from("other"));
        assert!(Filter::compile("name").unwrap().matches(&entry(&k, &v)));
        assert!(!Filter::compile("other").unwrap().matches(&entry(&k, &v)));
    }

    #[test]
    fn test_key_matches_scalar_value_without_key() {
        let v = Value::from("value3");
        assert!(Filter::compile("value*").unwrap().matches(&Element::of(Cow::Borrowed(&v))));
        assert!(!Filter::compile("*test*").unwrap().matches(&Element::of(Cow::Borrowed(&v))));
    }

    #[test]
    fn test_key_never_matches_containers() {
        let v = Value::list([1]);
        assert!(!Filter::compile("*").unwrap().matches(&at(0, &v)));
    }
}
