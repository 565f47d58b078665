//! Resolution of compiled paths against a value graph.
//!
//! Each segment reads a member from the current object. Containers fan out
//! through their [`adapter::IterableAdapter`], get filtered and mapped, and
//! the per-element results are flattened into one list. GET mode then reduces
//! that list to a single value where it can.

pub mod access;
pub mod adapter;
pub mod evaluator;

pub use access::{
    CollectionFactory, DefaultCollections, FieldAccess, MemberAccess, TypeClassifier,
    ValueClassifier,
};
pub use adapter::{adapter_for, Element, IterableAdapter, IterableKind};
pub use evaluator::{Evaluator, Extracted, ExtractionContext, Mode};
