//! objpath - compiled path expressions over object graphs.
//!
//! A path such as `/orders/lines[0:2]/sku` is compiled once into a chain of
//! segments. Each segment names a member, optionally filters the elements of a
//! container by index or key, and optionally maps each element (`.key`,
//! `.value`, or a registered mapper). Resolution walks a [`Value`] graph and
//! flattens whatever the containers along the way hold.
//!
//! Two result contracts are offered: [`get`] reduces the result to a single
//! value of the requested type, and [`list`] always returns a list.
//!
//! # Example
//!
//! ```
//! use objpath::value::{Object, Value};
//!
//! let line = |sku: &str| Value::from(Object::new("Line").with_field("sku", sku));
//! let order = |skus: [&str; 2]| {
//!     Value::from(Object::new("Order").with_field("lines", Value::list(skus.map(line))))
//! };
//! let root = Value::from(
//!     Object::new("Shop").with_field("orders", Value::list([order(["a", "b"]), order(["c", "d"])])),
//! );
//!
//! let skus: Vec<String> = objpath::list(&root, "/orders/lines/sku").unwrap();
//! assert_eq!(skus, vec!["a", "b", "c", "d"]);
//!
//! let first: Option<String> = objpath::get(&root, "/orders[0]/lines[0]/sku").unwrap();
//! assert_eq!(first.as_deref(), Some("a"));
//! ```

pub mod config;
pub mod convert;
pub mod document;
pub mod engine;
pub mod error;
pub mod extract;
pub mod file;
pub mod path;
pub mod value;

pub use convert::FromValue;
pub use engine::{compile, get, list, Extractor};
pub use error::{PathError, Result};
pub use path::CompiledPath;
pub use value::{Object, Value};
