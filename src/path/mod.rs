//! Path expression compiler.
//!
//! Path text is split into segments, and each segment's bracket filter and
//! mapper suffix are compiled once, up front.
//!
//! # Supported Syntax
//!
//! - `/a/b/c` - nested members
//! - `/list[2]` - one element by index
//! - `/list[1:3]`, `/list[3:]` - index range, end exclusive and optional
//! - `/list[1,3,4]` - set of indexes
//! - `/map[k1]`, `/map[k1,k2]` - map entries by key
//! - `/items[*foo*]` - wildcard keys (`*` matches any run of characters)
//! - `/map.key`, `/map.value` - value mappers
//!
//! # Examples
//!
//! ```text
//! /orders/lines[0:2]/sku   - sku of the first two lines of every order
//! /settings[db.*].value    - values of all settings whose key starts with "db."
//! ```

pub mod ast;
pub mod filter;
pub mod mapper;
pub mod parser;
pub mod wildcard;

pub use ast::{CompiledPath, PathSegment};
pub use filter::{Filter, KeyPattern};
pub use mapper::{MapperRegistry, ValueMapper};
pub use parser::Parser;
pub use wildcard::WildcardPattern;
