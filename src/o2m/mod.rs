//! The one-to-many (O2M) relation façade (spec §3, §4.F).
//!
//! A [`Node`] is an O2M relation by convention, not by type: an object
//! whose children include at least one data path and, optionally, the
//! reserved `sizes`/`offsets`/`indices` integer arrays. Grounded directly
//! on `examples/original_source`'s `t_blueprint_o2mrelation_examples.cpp`,
//! which is the original's own test of this exact convention
//! (`blueprint::o2mrelation::{verify, data_paths, compact_to}`).

pub mod examples;
pub mod index;
pub mod iterator;

#[cfg(test)]
mod tests;

use indexmap::IndexMap;

use crate::dtype::{DataType, ElementKind};
use crate::error::TreeError;
use crate::node::Node;

pub use iterator::Axis;

/// Child names reserved by the O2M convention; never treated as data
/// paths.
pub const RESERVED: [&str; 3] = ["sizes", "offsets", "indices"];

pub(crate) fn leaf_parts(node: &Node) -> Option<(&DataType, &[u8])> {
    match node {
        Node::Leaf { dtype, buffer } if dtype.kind() != ElementKind::None => {
            Some((dtype, buffer.as_slice()))
        },
        _ => None,
    }
}

pub(crate) fn reserved_len(o2m: &Node, name: &str) -> Option<usize> {
    let Node::Object { children } = o2m else {
        return None;
    };
    children.get(name).and_then(|c| leaf_parts(c)).map(|(dtype, _)| dtype.number_of_elements())
}

pub(crate) fn read_reserved(o2m: &Node, name: &str, i: usize) -> crate::Result<i64> {
    let child = o2m.get_path(name).map_err(|_| TreeError::InvalidRelation {
        reason: format!("missing `{name}`"),
    })?;
    let (dtype, bytes) = leaf_parts(child).ok_or_else(|| TreeError::InvalidRelation {
        reason: format!("`{name}` is not a numeric leaf"),
    })?;
    dtype.read_as_i64(bytes, i)
}

/// The façade for the O2M relation convention layered over a [`Node`]
/// (spec §4.F). Every operation is a pure function of the node(s) passed
/// in; the struct exists only to group them under one name.
pub struct O2MRelation;

impl O2MRelation {
    /// See [`data_paths`].
    pub fn data_paths(o2m: &Node) -> Vec<String> {
        data_paths(o2m)
    }

    /// See [`verify`].
    pub fn verify(o2m: &Node, info: &mut Node) -> bool {
        verify(o2m, info)
    }

    /// See [`generate_offsets`].
    pub fn generate_offsets(o2m: &mut Node, info: &mut Node) -> bool {
        generate_offsets(o2m, info)
    }

    /// See [`compact_to`].
    pub fn compact_to(src: &Node, dst: &mut Node) -> crate::Result<()> {
        compact_to(src, dst)
    }
}

/// Names, in insertion order, of immediate children that are numeric
/// leaves and are not one of the reserved names (spec §4.F).
pub fn data_paths(o2m: &Node) -> Vec<String> {
    let Node::Object { children } = o2m else {
        return Vec::new();
    };
    children
        .iter()
        .filter(|(name, _)| !RESERVED.contains(&name.as_str()))
        .filter(|(_, child)| leaf_parts(child).is_some())
        .map(|(name, _)| name.clone())
        .collect()
}

/// The size of the indirection space: `indices`'s length if present,
/// otherwise the first data path's length.
pub(crate) fn indirect_space(o2m: &Node) -> Option<usize> {
    reserved_len(o2m, "indices").or_else(|| {
        data_paths(o2m).first().and_then(|name| reserved_len(o2m, name))
    })
}

fn note(info: &mut Node, msg: String) {
    let idx = info.child_names().len();
    if let Ok(child) = info.fetch(&idx.to_string()) {
        let _ = child.set_slice(msg.as_bytes());
    }
}

/// Validate the `{data, sizes, offsets, indices}` convention, writing a
/// human-readable diagnostic message into `info` per failure found (spec
/// §4.F, §7).
pub fn verify(o2m: &Node, info: &mut Node) -> bool {
    if !o2m.is_object() {
        note(info, "o2m relation must be an object node".to_string());
        return false;
    }

    let mut ok = true;

    let Node::Object { children } = o2m else {
        unreachable!("checked above");
    };
    for name in RESERVED {
        if let Some(child) = children.get(name) {
            match leaf_parts(child) {
                Some((dtype, _)) if dtype.kind().is_integer() => {},
                _ => {
                    ok = false;
                    note(info, format!("`{name}` must be an integer leaf"));
                },
            }
        }
    }

    if data_paths(o2m).is_empty() {
        ok = false;
        note(info, "relation has no data paths".to_string());
    }

    if let (Some(sizes_len), Some(space)) = (reserved_len(o2m, "sizes"), indirect_space(o2m)) {
        let mut sum = 0i64;
        for i in 0..sizes_len {
            match read_reserved(o2m, "sizes", i) {
                Ok(v) => sum += v,
                Err(_) => {
                    ok = false;
                    note(info, format!("`sizes[{i}]` unreadable"));
                },
            }
        }
        if sum < 0 || sum as usize > space {
            ok = false;
            note(info, format!("sum(sizes) = {sum} exceeds indirection space {space}"));
        }
    }

    if let (Some(sizes_len), Some(offsets_len)) =
        (reserved_len(o2m, "sizes"), reserved_len(o2m, "offsets"))
    {
        if sizes_len != offsets_len {
            ok = false;
            note(info, format!("len(offsets) = {offsets_len} != len(sizes) = {sizes_len}"));
        }
    }

    if let (Some(offsets_len), Some(space)) = (reserved_len(o2m, "offsets"), indirect_space(o2m)) {
        for i in 0..offsets_len {
            match read_reserved(o2m, "offsets", i) {
                Ok(v) if v >= 0 && (v as usize) <= space => {},
                _ => {
                    ok = false;
                    note(info, format!("`offsets[{i}]` out of range"));
                },
            }
        }
    }

    ok
}

/// Succeeds only if `o2m` already has `sizes`; writes `offsets =
/// prefix_sum(sizes)` starting at 0 (spec §4.F). Returns `false` (with
/// `info` populated) for an empty relation or one missing `sizes`.
pub fn generate_offsets(o2m: &mut Node, info: &mut Node) -> bool {
    let Some(sizes_len) = reserved_len(o2m, "sizes") else {
        let _ = info.set_slice("missing `sizes`, cannot generate offsets".as_bytes());
        return false;
    };
    if sizes_len == 0 {
        let _ = info.set_slice("empty relation, nothing to generate".as_bytes());
        return false;
    }

    let mut offsets = Vec::with_capacity(sizes_len);
    let mut running = 0i64;
    for i in 0..sizes_len {
        let Ok(size) = read_reserved(o2m, "sizes", i) else {
            let _ = info.set_slice(format!("`sizes[{i}]` unreadable").as_bytes());
            return false;
        };
        offsets.push(running);
        running += size;
    }

    o2m.fetch("offsets")
        .expect("fetch on an object node never fails")
        .set_slice(&offsets)
        .expect("allocation of offsets buffer");
    true
}

/// Produce a dense equivalent of `src` in `dst`: every data path is
/// packed into `sum(sizes)` elements in visit order, `sizes` is carried
/// over, `offsets` becomes its prefix sum, and `indices` is dropped
/// (spec §4.F).
pub fn compact_to(src: &Node, dst: &mut Node) -> crate::Result<()> {
    let idx = index::O2MIndex::new(src)?;
    let one_len = idx.size();

    let mut sizes = Vec::with_capacity(one_len);
    let mut offsets = Vec::with_capacity(one_len);
    let mut running = 0i64;
    for one in 0..one_len {
        let size = idx.size_of(one)?;
        sizes.push(size as i64);
        offsets.push(running);
        running += size as i64;
    }
    let total = running as usize;

    *dst = Node::Object {
        children: IndexMap::new(),
    };

    for data_path in data_paths(src) {
        let src_data = src.get_path(&data_path)?;
        let (src_dtype, src_bytes) = leaf_parts(src_data).ok_or_else(|| TreeError::InvalidRelation {
            reason: format!("`{data_path}` is not a numeric leaf"),
        })?;

        dst.fetch(&data_path)?.set_dtype(DataType::compact(src_dtype.kind(), total))?;
        let Node::Leaf { dtype: dst_dtype, buffer: dst_buffer } = dst.fetch(&data_path)? else {
            unreachable!("just assigned a leaf above");
        };

        let mut j = 0usize;
        for one in 0..one_len {
            let size = idx.size_of(one)?;
            for many in 0..size {
                let resolved = idx.index(one, many)?;
                let slot = src_dtype.read_checked(src_bytes, resolved)?;
                let dst_start = dst_dtype.element_index(j);
                let dst_end = dst_start + dst_dtype.element_bytes();
                dst_buffer.as_mut_slice()[dst_start..dst_end].copy_from_slice(slot);
                j += 1;
            }
        }
    }

    dst.fetch("sizes")
        .expect("fetch on object never fails")
        .set_slice(&sizes)?;
    dst.fetch("offsets")
        .expect("fetch on object never fails")
        .set_slice(&offsets)?;

    Ok(())
}
