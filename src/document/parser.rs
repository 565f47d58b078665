//! Conversion of JSON and YAML documents into value graphs.
//!
//! Mappings whose keys are all strings become [`Object`]s, so their keys are
//! reachable as path members. Mappings with any non-string key become
//! `Value::Map`. Sequences become `Value::List`. A YAML tag on a mapping
//! (`!Person {name: Alice}`) becomes the object's type name.
//!
//! # Example
//!
//! ```
//! use objpath::document::parser::parse_json;
//!
//! let root = parse_json(r#"{"user": {"name": "Alice"}}"#).unwrap();
//! assert_eq!(root.type_name(), "object");
//! ```

use crate::value::{Object, Value};
use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use serde_yaml::Value as YamlValue;

/// Type name given to untagged mappings.
pub const OBJECT_TYPE: &str = "object";

/// Parses a JSON document.
pub fn parse_json(content: &str) -> Result<Value> {
    let value: JsonValue = serde_json::from_str(content).context("Failed to parse JSON")?;
    Ok(Value::from(value))
}

/// Parses newline-delimited JSON into a list with one element per line.
///
/// Blank lines are skipped.
pub fn parse_jsonl(content: &str) -> Result<Value> {
    let mut lines = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let value: JsonValue = serde_json::from_str(line)
            .with_context(|| format!("Invalid JSON on line {}", line_num + 1))?;
        lines.push(Value::from(value));
    }

    if lines.is_empty() {
        anyhow::bail!("No valid JSON found in JSONL content");
    }

    Ok(Value::List(lines))
}

/// Parses a single YAML document.
pub fn parse_yaml(content: &str) -> Result<Value> {
    let value: YamlValue = serde_yaml::from_str(content).context("Failed to parse YAML")?;
    Ok(Value::from(value))
}

impl From<JsonValue> for Value {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            JsonValue::String(s) => Value::String(s),
            JsonValue::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            JsonValue::Object(fields) => {
                let mut obj = Object::new(OBJECT_TYPE);
                for (name, field) in fields {
                    obj.insert(name, Value::from(field));
                }
                Value::Object(obj)
            }
        }
    }
}

impl From<YamlValue> for Value {
    fn from(value: YamlValue) -> Self {
        convert_yaml(value, None)
    }
}

fn convert_yaml(value: YamlValue, tag: Option<String>) -> Value {
    match value {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(b) => Value::Bool(b),
        YamlValue::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        YamlValue::String(s) => Value::String(s),
        YamlValue::Sequence(items) => {
            Value::List(items.into_iter().map(|v| convert_yaml(v, None)).collect())
        }
        YamlValue::Mapping(mapping) => {
            if mapping.keys().all(YamlValue::is_string) {
                let mut obj = Object::new(tag.unwrap_or_else(|| OBJECT_TYPE.to_string()));
                for (key, field) in mapping {
                    if let YamlValue::String(name) = key {
                        obj.insert(name, convert_yaml(field, None));
                    }
                }
                Value::Object(obj)
            } else {
                let entries: IndexMap<Value, Value> = mapping
                    .into_iter()
                    .map(|(k, v)| (convert_yaml(k, None), convert_yaml(v, None)))
                    .collect();
                Value::Map(entries)
            }
        }
        YamlValue::Tagged(tagged) => {
            let name = tagged.tag.to_string().trim_start_matches('!').to_string();
            convert_yaml(tagged.value, Some(name))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_objects_become_objects() {
        let root = parse_json(r#"{"name": "Alice", "age": 30, "tags": ["a", "b"]}"#).unwrap();
        let obj = root.as_object().unwrap();
        assert_eq!(obj.type_name(), OBJECT_TYPE);
        assert_eq!(obj.get("age"), Some(&Value::Int(30)));
        assert_eq!(obj.get("tags"), Some(&Value::list(["a", "b"])));
    }

    #[test]
    fn test_json_numbers() {
        assert_eq!(parse_json("1.5").unwrap(), Value::Float(1.5));
        assert_eq!(parse_json("-7").unwrap(), Value::Int(-7));
    }

    #[test]
    fn test_invalid_json() {
        assert!(parse_json("{not json").is_err());
    }

    #[test]
    fn test_jsonl_lines() {
        let root = parse_jsonl("{\"id\":1}\n\n{\"id\":2}\n").unwrap();
        assert_eq!(root.len(), Some(2));
    }

    #[test]
    fn test_jsonl_reports_line() {
        let err = parse_jsonl("{\"id\":1}\n{bad}").unwrap_err();
        assert!(format!("{:#}", err).contains("line 2"));
    }

    #[test]
    fn test_yaml_string_keys_become_object() {
        let root = parse_yaml("name: Alice\nroles:\n  - admin\n").unwrap();
        let obj = root.as_object().unwrap();
        assert_eq!(obj.get("name"), Some(&Value::from("Alice")));
        assert_eq!(obj.get("roles"), Some(&Value::list(["admin"])));
    }

    #[test]
    fn test_yaml_non_string_keys_become_map() {
        let root = parse_yaml("1: one\n2: two\n").unwrap();
        assert_eq!(root, Value::map([(1, "one"), (2, "two")]));
    }

    #[test]
    fn test_yaml_tag_names_object() {
        let root = parse_yaml("!Person {name: Alice}").unwrap();
        assert_eq!(root.type_name(), "Person");
    }
}
