//! Error types for path compilation and value extraction.

use thiserror::Error;

/// Errors that can occur while compiling a path or resolving it against a graph.
///
/// Every variant is a deterministic function of the graph shape, the path text and
/// the requested type; nothing here is transient or worth retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The path text violates the grammar, names an invalid field, or uses an
    /// unregistered value mapper.
    #[error("malformed path '{path}': {reason}")]
    MalformedPath { path: String, reason: String },

    /// A segment named a member the object does not have.
    #[error("unknown field '{field}' on {type_name}")]
    UnknownField { field: String, type_name: String },

    /// A single value was requested but the path selected several.
    #[error("'{field}' selected {count} values but a single value was requested")]
    AmbiguousCardinality { field: String, count: usize },

    /// The resolved value cannot be converted into the requested type.
    #[error("expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },
}

impl PathError {
    pub(crate) fn malformed(path: &str, reason: impl Into<String>) -> Self {
        PathError::MalformedPath {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    /// Replaces the path recorded in a `MalformedPath` error.
    ///
    /// Sub-expression compilers only see their own text; the path compiler uses this
    /// to report the full path instead.
    pub(crate) fn with_path(self, path: &str) -> Self {
        match self {
            PathError::MalformedPath { reason, .. } => PathError::MalformedPath {
                path: path.to_string(),
                reason,
            },
            other => other,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PathError>;
