//! Error kinds surfaced by the core (spec §7).
//!
//! Hand-written `Display`/[`std::error::Error`] impls, matching the
//! teacher's own [`TryFromByteError`]-style leaf error types rather than
//! reaching for an error-handling crate.
//!
//! [`TryFromByteError`]: https://docs.rs/blart

use std::fmt;

/// Errors raised by programmatic misuse of a [`crate::Node`].
///
/// Validators (`verify`, `diff`, `generate_offsets`) do not return this
/// type; they return `bool` and annotate an `info` sink, per spec §7.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// A path string was empty, or contained an empty `.`-separated
    /// segment.
    InvalidPath {
        /// The offending path, as given by the caller.
        path: String,
    },
    /// A leaf-only accessor (`to_integer`, `to_real`, `as_*`) was called on
    /// an object node, or on an empty node.
    NotALeaf,
    /// An object-only accessor was called on a leaf node.
    NotAnObject,
    /// A raw typed accessor was used on a [`crate::DataType`] of a
    /// different, incompatible kind.
    TypeMismatch {
        /// The kind actually stored in the node.
        actual: crate::ElementKind,
        /// The kind the accessor required.
        requested: crate::ElementKind,
    },
    /// An index argument (to [`crate::O2MIndex`] or [`crate::O2MIterator`])
    /// fell outside the declared extent.
    OutOfRange {
        /// The index that was requested.
        index: usize,
        /// The number of valid indices (exclusive upper bound).
        len: usize,
    },
    /// An [`crate::O2MRelation`] façade precondition was not met.
    InvalidRelation {
        /// Human-readable description of the unmet precondition.
        reason: String,
    },
    /// Allocating a buffer of the requested size failed.
    AllocFailure {
        /// The number of bytes that failed to allocate.
        requested_bytes: usize,
    },
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::InvalidPath { path } => write!(f, "invalid path: {path:?}"),
            TreeError::NotALeaf => write!(f, "operation requires a leaf node"),
            TreeError::NotAnObject => write!(f, "operation requires an object node"),
            TreeError::TypeMismatch { actual, requested } => write!(
                f,
                "type mismatch: node holds {actual:?}, accessor requires {requested:?}"
            ),
            TreeError::OutOfRange { index, len } => {
                write!(f, "index {index} out of range (len {len})")
            },
            TreeError::InvalidRelation { reason } => write!(f, "invalid o2m relation: {reason}"),
            TreeError::AllocFailure { requested_bytes } => {
                write!(f, "failed to allocate {requested_bytes} bytes")
            },
        }
    }
}

impl std::error::Error for TreeError {}
