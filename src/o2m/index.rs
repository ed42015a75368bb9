//! Index resolution over an O2M relation (spec §4.G).
//!
//! Grounded on `examples/original_source`'s
//! `conduit_blueprint_o2mrelation.cpp`, which resolves the same four
//! quantities (`size`, per-group `size`, per-group `offset`, flattened
//! `index`) from the same three optional sibling arrays.

use crate::error::TreeError;
use crate::node::Node;

/// Resolves positions within an O2M relation without copying or
/// iterating it.
///
/// Built once over a borrowed [`Node`]; every accessor is `O(1)` except
/// [`O2MIndex::offset`] and [`O2MIndex::size_of`] when `sizes` is present
/// without `offsets`, which are `O(one)` (a prefix-sum walk), matching
/// the convention that `offsets` is an optional cache of that walk.
///
/// Fallback chain when fewer than all three of `sizes`/`offsets`/`indices`
/// are present (spec.md §3): prefer `sizes`, then `offsets`, then
/// `indices` (one group per indirection slot: `size(one) == 1`,
/// `offset(one) == one`), and only with none of the three does the whole
/// relation collapse to a single implicit group spanning all of `data`.
#[derive(Clone, Copy)]
pub struct O2MIndex<'a> {
    node: &'a Node,
    one_len: usize,
    has_sizes: bool,
    has_offsets: bool,
    has_indices: bool,
    data_len: usize,
}

impl<'a> O2MIndex<'a> {
    /// Build an index over `node`. Fails if `node` has no data paths, or
    /// if `sizes`/`offsets`/`indices` are present but not readable
    /// integer leaves.
    pub fn new(node: &'a Node) -> crate::Result<Self> {
        let data_len = super::data_paths(node)
            .first()
            .and_then(|name| super::reserved_len(node, name))
            .ok_or_else(|| TreeError::InvalidRelation {
                reason: "relation has no data paths".to_string(),
            })?;

        let has_sizes = super::reserved_len(node, "sizes").is_some();
        let has_offsets = super::reserved_len(node, "offsets").is_some();
        let has_indices = super::reserved_len(node, "indices").is_some();

        let one_len = if has_sizes {
            super::reserved_len(node, "sizes").unwrap()
        } else if has_offsets {
            super::reserved_len(node, "offsets").unwrap()
        } else if has_indices {
            super::reserved_len(node, "indices").unwrap()
        } else {
            1
        };

        Ok(O2MIndex {
            node,
            one_len,
            has_sizes,
            has_offsets,
            has_indices,
            data_len,
        })
    }

    /// The number of groups on the ONE axis.
    pub fn size(&self) -> usize {
        self.one_len
    }

    /// The number of elements in group `one` (spec: `size(one)`).
    pub fn size_of(&self, one: usize) -> crate::Result<usize> {
        if one >= self.one_len {
            return Err(TreeError::OutOfRange {
                index: one,
                len: self.one_len,
            });
        }
        if self.has_sizes {
            return Ok(super::read_reserved(self.node, "sizes", one)? as usize);
        }
        if self.has_offsets {
            let start = super::read_reserved(self.node, "offsets", one)?;
            let end = if one + 1 < self.one_len {
                super::read_reserved(self.node, "offsets", one + 1)?
            } else {
                self.data_len as i64
            };
            return Ok((end - start).max(0) as usize);
        }
        if self.has_indices {
            return Ok(1);
        }
        Ok(self.data_len)
    }

    /// The starting position of group `one` within the indirection space
    /// (spec: `offset(one)`).
    pub fn offset(&self, one: usize) -> crate::Result<usize> {
        if one >= self.one_len {
            return Err(TreeError::OutOfRange {
                index: one,
                len: self.one_len,
            });
        }
        if self.has_offsets {
            return Ok(super::read_reserved(self.node, "offsets", one)? as usize);
        }
        if self.has_sizes {
            let mut running = 0usize;
            for i in 0..one {
                running += self.size_of(i)?;
            }
            return Ok(running);
        }
        if self.has_indices {
            return Ok(one);
        }
        Ok(0)
    }

    /// Resolve `(one, many)` to a flat position in the DATA axis,
    /// following `indices` if present (spec: `index(one, many)`).
    pub fn index(&self, one: usize, many: usize) -> crate::Result<usize> {
        let size = self.size_of(one)?;
        if many >= size {
            return Err(TreeError::OutOfRange { index: many, len: size });
        }
        let position = self.offset(one)? + many;
        if self.has_indices {
            return Ok(super::read_reserved(self.node, "indices", position)? as usize);
        }
        Ok(position)
    }
}
