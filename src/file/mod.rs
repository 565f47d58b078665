//! File input for documents.
//!
//! Loads JSON, JSON lines, and YAML documents from disk or any reader,
//! with transparent gzip decompression.

pub mod loader;

pub use loader::{load_file, load_reader, Format};
