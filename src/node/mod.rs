//! The tree cell: leaf or object, with path navigation and coercions
//! (spec §4.C).
//!
//! Modeled the way the teacher models trie nodes — a tagged union that
//! every mutator checks and, if necessary, transitions, cleaning up
//! whatever the previous shape owned before installing the new one. Here
//! the union has two arms instead of five, and lives in a plain `enum`
//! rather than behind a hand-rolled tagged pointer, because `Node` has no
//! need to erase its own type at runtime the way the teacher's node
//! pointers do.

pub mod diff;
pub mod path;
pub mod schema;

#[cfg(test)]
mod tests;

use indexmap::IndexMap;

use crate::buffer::BufferOwner;
use crate::dtype::{DataType, Primitive};
use crate::error::TreeError;
use crate::node::path::PathSegments;

/// A cell of the hierarchical data tree (spec §3, §4.C).
///
/// Exactly one of three states at any time: empty, a typed leaf, or an
/// ordered object mapping names to child nodes. Every mutation that leaves
/// a state behind releases whatever that state owned — an owned buffer, or
/// a subtree of children — before installing the new one.
#[derive(Debug)]
pub enum Node {
    /// Freshly created, holds neither a type nor children.
    Empty,
    /// A typed scalar/array view over a byte buffer.
    Leaf {
        /// The descriptor interpreting `buffer`.
        dtype: DataType,
        /// The bytes `dtype` interprets.
        buffer: BufferOwner,
    },
    /// An ordered mapping from child name to child node.
    Object {
        /// Children, in first-insertion order.
        children: IndexMap<String, Node>,
    },
}

impl Clone for Node {
    /// Deep copy (spec §3, §8 property 2): owned buffers are freshly
    /// allocated and element-wise copied; external-pointer leaves become
    /// new external-pointer leaves referencing the same bytes; children
    /// are cloned recursively.
    ///
    /// # Panics
    ///
    /// Panics if allocating a copy of an owned buffer fails. Use
    /// [`Node::set_node`] instead if you need to handle that case as a
    /// `Result`.
    fn clone(&self) -> Self {
        self.deep_copy().expect("allocation failure during deep copy")
    }
}

impl Default for Node {
    fn default() -> Self {
        Node::Empty
    }
}

impl Node {
    /// A freshly created, empty node.
    pub fn new() -> Self {
        Node::Empty
    }

    /// `true` if this node is a leaf (holds a [`DataType`] and buffer).
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// `true` if this node is an object (holds named children).
    pub fn is_object(&self) -> bool {
        matches!(self, Node::Object { .. })
    }

    /// `true` if this node has never been assigned and has no children.
    pub fn is_empty(&self) -> bool {
        matches!(self, Node::Empty)
    }

    fn release(&mut self) {
        *self = Node::Empty;
    }

    // -- set overloads (spec §4.C) ------------------------------------

    /// Deep-copy `other` into `self` (spec: "from another Node (deep
    /// copy)"). Equivalent to `self = other.clone()` but avoids the extra
    /// temporary.
    pub fn set_node(&mut self, other: &Node) -> crate::Result<()> {
        let copy = other.deep_copy()?;
        *self = copy;
        Ok(())
    }

    /// Allocate a compact buffer matching `dtype` and become a leaf over
    /// it (spec: "from a DataType (allocate a compact buffer of that
    /// descriptor)").
    pub fn set_dtype(&mut self, dtype: DataType) -> crate::Result<()> {
        self.release();
        let mut buffer = BufferOwner::empty();
        buffer.allocate(dtype.bytes_compact())?;
        let dtype = DataType::compact(dtype.kind(), dtype.number_of_elements());
        *self = Node::Leaf { dtype, buffer };
        Ok(())
    }

    /// Become a 1-element compact leaf holding `value` (spec: "from a
    /// scalar (`u32`, `f64`)").
    pub fn set_scalar<T: Primitive>(&mut self, value: T) -> crate::Result<()> {
        self.set_slice(&[value])
    }

    /// Become a compact leaf of `values.len()` elements of `T`'s kind
    /// (spec: "from a sequence of scalars").
    pub fn set_slice<T: Primitive>(&mut self, values: &[T]) -> crate::Result<()> {
        self.release();
        let dtype = DataType::compact(T::KIND, values.len());
        let mut buffer = BufferOwner::empty();
        buffer.allocate(dtype.bytes_compact())?;
        {
            let bytes = buffer.as_mut_slice();
            let elem = dtype.element_bytes();
            for (i, value) in values.iter().enumerate() {
                value.write_bytes(&mut bytes[i * elem..(i + 1) * elem], dtype.endianness());
            }
        }
        *self = Node::Leaf { dtype, buffer };
        Ok(())
    }

    /// Become a non-owning leaf over caller-provided memory, interpreted
    /// through `dtype` (spec: "from `(void*, DataType)`").
    ///
    /// # Safety
    ///
    ///  - `pointer` must be valid for reads of `dtype.bytes_compact()`
    ///    bytes beyond `pointer` (accounting for `dtype`'s stride/offset,
    ///    i.e. through `dtype.element_index(dtype.number_of_elements() - 1)
    ///    + dtype.element_bytes()`).
    ///  - The referenced memory must outlive `self`, and must not be
    ///    mutated through another path while `self` is read.
    pub unsafe fn set_external(
        &mut self,
        pointer: std::ptr::NonNull<u8>,
        dtype: DataType,
    ) -> crate::Result<()> {
        self.release();
        let len = dtype.element_index(dtype.number_of_elements().saturating_sub(1))
            + dtype.element_bytes();
        let mut buffer = BufferOwner::empty();
        // SAFETY: forwarded to the caller by this function's own safety
        // doc.
        unsafe { buffer.attach(pointer, len) };
        *self = Node::Leaf { dtype, buffer };
        Ok(())
    }

    /// Become a non-owning leaf over caller-provided memory, with the
    /// layout given as a schema string (spec: "from `(void*,
    /// schemaString)`").
    ///
    /// # Safety
    ///
    /// Same requirements as [`Node::set_external`], for the [`DataType`]
    /// the schema string parses to.
    pub unsafe fn set_external_schema(
        &mut self,
        pointer: std::ptr::NonNull<u8>,
        schema_str: &str,
    ) -> crate::Result<()> {
        let dtype = schema::parse_leaf_schema(schema_str)?;
        // SAFETY: forwarded to the caller by this function's own safety
        // doc.
        unsafe { self.set_external(pointer, dtype) }
    }

    fn deep_copy(&self) -> crate::Result<Node> {
        Ok(match self {
            Node::Empty => Node::Empty,
            Node::Leaf { dtype, buffer } => {
                let mut copy = BufferOwner::empty();
                copy.clone_from(buffer)?;
                Node::Leaf {
                    dtype: *dtype,
                    buffer: copy,
                }
            },
            Node::Object { children } => {
                let mut copy = IndexMap::with_capacity(children.len());
                for (name, child) in children {
                    copy.insert(name.clone(), child.deep_copy()?);
                }
                Node::Object { children: copy }
            },
        })
    }

    // -- path navigation (spec §4.D) -----------------------------------

    /// Resolve `path`, auto-creating empty object nodes for missing
    /// segments. If `self` is a leaf, its buffer is discarded and it
    /// becomes an object first.
    pub fn fetch(&mut self, path: &str) -> crate::Result<&mut Node> {
        let segments = PathSegments::parse(path)?;
        let mut node = self;
        for segment in segments.as_slice() {
            if !node.is_object() {
                *node = Node::Object {
                    children: IndexMap::new(),
                };
            }
            let Node::Object { children } = node else {
                unreachable!("just converted to Object above");
            };
            node = children.entry((*segment).to_string()).or_insert(Node::Empty);
        }
        Ok(node)
    }

    /// Pure probe: `true` if every segment of `path` resolves to an
    /// existing child, without creating anything.
    pub fn has_path(&self, path: &str) -> bool {
        let Ok(segments) = PathSegments::parse(path) else {
            return false;
        };
        let mut node = self;
        for segment in segments.as_slice() {
            let Node::Object { children } = node else {
                return false;
            };
            let Some(child) = children.get(*segment) else {
                return false;
            };
            node = child;
        }
        true
    }

    /// Borrow the node at `path` without creating anything.
    pub fn get_path(&self, path: &str) -> crate::Result<&Node> {
        let segments = PathSegments::parse(path)?;
        let mut node = self;
        for segment in segments.as_slice() {
            let Node::Object { children } = node else {
                return Err(TreeError::NotAnObject);
            };
            node = children.get(*segment).ok_or_else(|| TreeError::InvalidPath {
                path: path.to_string(),
            })?;
        }
        Ok(node)
    }

    /// Append the names of immediate children, in insertion order. When
    /// `expand` is true, recurse and emit full dotted paths of every leaf
    /// descendant instead.
    pub fn paths(&self, out: &mut Vec<String>, expand: bool) {
        let Node::Object { children } = self else {
            return;
        };
        if !expand {
            out.extend(children.keys().cloned());
            return;
        }
        for (name, child) in children {
            match child {
                Node::Object { .. } => {
                    let mut nested = Vec::new();
                    child.paths(&mut nested, true);
                    if nested.is_empty() {
                        out.push(name.clone());
                    } else {
                        out.extend(nested.into_iter().map(|p| format!("{name}.{p}")));
                    }
                },
                _ => out.push(name.clone()),
            }
        }
    }

    /// Immediate children's names, in insertion order, as a convenience
    /// over [`Node::paths`].
    pub fn child_names(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.paths(&mut out, false);
        out
    }

    // -- coercions (spec §4.C) ------------------------------------------

    /// The leaf's [`DataType`], or an empty descriptor (`kind = None,
    /// count = 0`) on an object or empty node.
    pub fn dtype(&self) -> DataType {
        match self {
            Node::Leaf { dtype, .. } => *dtype,
            _ => DataType::empty(),
        }
    }

    /// Read element 0, widening to `i64`. Only defined on non-empty
    /// leaves.
    pub fn to_integer(&self) -> crate::Result<i64> {
        match self {
            Node::Leaf { dtype, buffer } if dtype.number_of_elements() > 0 => {
                dtype.read_as_i64(buffer.as_slice(), 0)
            },
            _ => Err(TreeError::NotALeaf),
        }
    }

    /// Read element 0, widening to `f64`. Only defined on non-empty
    /// leaves.
    pub fn to_real(&self) -> crate::Result<f64> {
        match self {
            Node::Leaf { dtype, buffer } if dtype.number_of_elements() > 0 => {
                dtype.read_as_f64(buffer.as_slice(), 0)
            },
            _ => Err(TreeError::NotALeaf),
        }
    }

    /// Raw typed access to element 0. Errors with [`TreeError::TypeMismatch`]
    /// if the leaf's kind does not match `T`, and [`TreeError::NotALeaf`]
    /// if this is not a non-empty leaf.
    pub fn as_scalar<T: Primitive>(&self) -> crate::Result<T> {
        match self {
            Node::Leaf { dtype, buffer } if dtype.number_of_elements() > 0 => {
                if dtype.kind() != T::KIND {
                    return Err(TreeError::TypeMismatch {
                        actual: dtype.kind(),
                        requested: T::KIND,
                    });
                }
                let slot = dtype.read_checked(buffer.as_slice(), 0)?;
                Ok(T::from_bytes(slot, dtype.endianness()))
            },
            _ => Err(TreeError::NotALeaf),
        }
    }

    /// Read element `i` as a `T`, with the same kind/shape checks as
    /// [`Node::as_scalar`].
    pub fn as_element<T: Primitive>(&self, i: usize) -> crate::Result<T> {
        match self {
            Node::Leaf { dtype, buffer } => {
                if dtype.kind() != T::KIND {
                    return Err(TreeError::TypeMismatch {
                        actual: dtype.kind(),
                        requested: T::KIND,
                    });
                }
                let slot = dtype.read_checked(buffer.as_slice(), i)?;
                Ok(T::from_bytes(slot, dtype.endianness()))
            },
            _ => Err(TreeError::NotALeaf),
        }
    }

    /// Convenience accessor matching spec §4.C's `as_uint32`.
    pub fn as_uint32(&self) -> crate::Result<u32> {
        self.as_scalar::<u32>()
    }

    /// Convenience accessor matching spec §4.C's `as_float64`.
    pub fn as_float64(&self) -> crate::Result<f64> {
        self.as_scalar::<f64>()
    }

    /// Raw base pointer to the leaf's buffer, for kind `T`. Errors with
    /// [`TreeError::TypeMismatch`] if the leaf's kind does not match `T`.
    ///
    /// The caller must respect `dtype().stride_bytes()` when walking past
    /// element 0 (spec §4.C: "no implicit conversion").
    pub fn as_ptr<T: Primitive>(&self) -> crate::Result<*const T> {
        match self {
            Node::Leaf { dtype, buffer } => {
                if dtype.kind() != T::KIND {
                    return Err(TreeError::TypeMismatch {
                        actual: dtype.kind(),
                        requested: T::KIND,
                    });
                }
                Ok(buffer.as_slice().as_ptr().cast::<T>())
            },
            _ => Err(TreeError::NotALeaf),
        }
    }

    /// `Vec` of the leaf's elements as `T`, honoring stride. Convenience
    /// built on [`Node::as_element`], primarily for tests and diagnostics.
    pub fn as_vec<T: Primitive>(&self) -> crate::Result<Vec<T>> {
        let count = self.dtype().number_of_elements();
        (0..count).map(|i| self.as_element(i)).collect()
    }

    /// A textual summary of the subtree (spec §6): for objects, a
    /// brace-delimited `{name: schema(child), ...}` preserving order; for
    /// leaves, the [`DataType`] record.
    pub fn schema(&self) -> String {
        schema::emit(self)
    }
}
