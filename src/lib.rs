#![allow(clippy::type_complexity)]
#![deny(missing_docs, clippy::missing_safety_doc, deprecated_in_future)]

//! Hierarchical, schema-described, in-memory data tree with a companion
//! one-to-many (O2M) relation view layered over raw numeric arrays.
//!
//! A [`Node`] either owns a typed scalar/array, owns a set of named
//! children, or wraps a caller-provided memory region interpreted through a
//! [`DataType`]. Heterogeneous scientific/mesh data can be assembled,
//! traversed, and reshaped through this tree without copying the underlying
//! buffers.
//!
//! This crate does not read or write files, does not parse or emit
//! YAML/JSON, and does not log: those are the jobs of collaborating crates
//! that sit on top of a [`Node`] tree.

mod buffer;
mod dtype;
mod error;
mod node;
mod o2m;

pub use buffer::BufferOwner;
pub use dtype::{DataType, ElementKind, Endianness, Primitive};
pub use error::TreeError;
pub use node::{diff::diff, path::PathSegments, schema, Node};
pub use o2m::{examples, index::O2MIndex, iterator::O2MIterator, Axis, O2MRelation};

/// Result type returned by fallible, programmatic [`Node`] operations.
pub type Result<T> = std::result::Result<T, TreeError>;
