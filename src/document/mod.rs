//! Value graphs from JSON and YAML text.

pub mod parser;

pub use parser::{parse_json, parse_jsonl, parse_yaml, OBJECT_TYPE};
