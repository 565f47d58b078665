//! Integration tests for path compilation through the public API.

use objpath::path::{CompiledPath, Filter, KeyPattern};
use objpath::value::{Object, Value};
use objpath::{Extractor, PathError};
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;

fn filters(path: &str) -> Vec<Filter> {
    CompiledPath::compile(path)
        .unwrap()
        .segments()
        .iter()
        .map(|s| s.filter().clone())
        .collect()
}

#[test]
fn test_grammar_examples_compile() {
    for path in [
        "/a/b/c",
        "/list[2]",
        "/list[1:3]",
        "/list[1,3,4]",
        "/map[k1,k2]",
        "/map.key",
        "/items[*foo*]",
    ] {
        assert!(CompiledPath::compile(path).is_ok(), "{} should compile", path);
    }
}

#[test]
fn test_filter_kinds() {
    assert_eq!(
        filters("/a/b[2]/c[1:3]/d[3:]/e[1,3,4]"),
        vec![
            Filter::NoFilter,
            Filter::Index(2),
            Filter::IndexRange {
                min: 1,
                max: Some(3)
            },
            Filter::IndexRange { min: 3, max: None },
            Filter::IndexSet(BTreeSet::from([1, 3, 4])),
        ]
    );
}

#[test]
fn test_key_filters() {
    assert_eq!(
        filters("/m[k1,k2]"),
        vec![Filter::KeySet(vec![
            KeyPattern::Literal("k1".to_string()),
            KeyPattern::Literal("k2".to_string()),
        ])]
    );
    assert!(matches!(
        filters("/items[*foo*]")[0],
        Filter::Key(KeyPattern::Wildcard(_))
    ));
}

#[test]
fn test_whitespace_in_filters_is_trimmed() {
    assert_eq!(filters("/xs[ 2 ]"), vec![Filter::Index(2)]);
    assert_eq!(
        filters("/xs[1 , 3]"),
        vec![Filter::IndexSet(BTreeSet::from([1, 3]))]
    );
}

#[test]
fn test_display_is_canonical() {
    let path: CompiledPath = "orders//lines[0:2]/".parse().unwrap();

    assert_eq!(path.to_string(), "/orders/lines[0:2]");
    assert_eq!(path.len(), 2);
}

#[test]
fn test_malformed_paths() {
    for path in ["", "/", "/a[", "/a[]", "/a.", "/1a", "/a[3:1]", "/a[x:]", "/a.nope"] {
        assert!(
            matches!(
                CompiledPath::compile(path),
                Err(PathError::MalformedPath { .. })
            ),
            "{:?} should be malformed",
            path
        );
    }
}

#[test]
fn test_malformed_path_fails_before_resolution() {
    let root = Value::from(Object::new("Empty"));

    // Compilation errors win over the missing field
    let result = objpath::get::<Value>(&root, "/missing[");

    assert!(matches!(result, Err(PathError::MalformedPath { .. })));
}

#[test]
fn test_mapper_names_resolve_per_extractor() {
    let mut custom = Extractor::new();
    custom
        .register_mapper("twice", |element| {
            let doubled = element.value.as_i64().map(|i| Value::Int(i * 2));
            match doubled {
                Some(value) => element.map_value(|_| value),
                None => element,
            }
        })
        .unwrap();

    assert!(custom.compile("/xs.twice").is_ok());
    assert!(Extractor::new().compile("/xs.twice").is_err());

    let root = Value::from(Object::new("Root").with_field("xs", Value::list([1, 2])));
    let doubled: Vec<i64> = custom.list(&root, "/xs.twice").unwrap();
    assert_eq!(doubled, vec![2, 4]);
}

#[test]
fn test_registering_mapper_invalidates_cached_paths() {
    let root = Value::from(Object::new("Root").with_field("xs", Value::list([1, 2])));
    let mut extractor = Extractor::new();
    extractor.register_mapper("pick", |e| e).unwrap();
    let before: Vec<i64> = extractor.list(&root, "/xs.pick").unwrap();
    assert_eq!(before, vec![1, 2]);

    extractor
        .register_mapper("pick", |element| element.map_value(|_| Value::Int(0)))
        .unwrap();
    let after: Vec<i64> = extractor.list(&root, "/xs.pick").unwrap();
    assert_eq!(after, vec![0, 0]);
}
