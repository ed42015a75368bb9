//! Synthetic O2M relation fixtures (spec §4.F, "Supplemented Features").
//!
//! Recovered from `examples/original_source`'s
//! `t_blueprint_o2mrelation_examples.cpp`, which builds exactly this
//! shape — `num_one` uniformly sized groups, each reserving a fixed
//! stride of physical slots in a flat `data` array — to exercise
//! `verify`/`compact_to`/iteration before reaching for hand-authored
//! fixtures. The teacher has no analog (`generate_keys_skewed` builds trie
//! keys, not relations) so this is new code written in the teacher's
//! doc-commented, small-helper style.

use indexmap::IndexMap;

use crate::node::Node;

/// Sentinel written into a group's unused, reserved `data` slots.
pub const UNUSED: i32 = -1;

/// How [`uniform`] lays the DATA axis out in physical memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Group-major: group `one`'s elements occupy the front of its
    /// reserved stride, contiguously. Produces `{data, sizes, offsets}`,
    /// no `indices`.
    Default,
    /// Element-major ("interleaved"): within the real sub-block, physical
    /// position `many * num_one + one` holds logical element
    /// `(one, many)`; any slots reserved beyond that sub-block are
    /// [`UNUSED`] padding. Produces `{data, sizes, indices}`, no
    /// `offsets`.
    Interleaved,
}

/// Build a relation of `num_one` uniformly sized groups of
/// `elements_per_one` elements each, where each group reserves
/// `reserved_per_one` physical slots in `data` (`reserved_per_one >=
/// elements_per_one`; unused slots hold [`UNUSED`]), laid out per
/// `orientation`.
///
/// ```
/// use latticed::examples::{uniform, Orientation};
/// use latticed::O2MIndex;
///
/// let relation = uniform(3, 2, 4, Orientation::Default);
/// let index = O2MIndex::new(&relation).unwrap();
/// assert_eq!(index.size(), 3);
/// assert_eq!(index.index(1, 0).unwrap(), 4);
/// ```
pub fn uniform(
    num_one: usize,
    elements_per_one: usize,
    reserved_per_one: usize,
    orientation: Orientation,
) -> Node {
    let sizes: Vec<i64> = vec![elements_per_one as i64; num_one];
    let reserved_total = num_one * reserved_per_one;

    let mut root = Node::Object {
        children: IndexMap::new(),
    };

    match orientation {
        Orientation::Default => {
            let mut data = vec![UNUSED; reserved_total];
            for one in 0..num_one {
                for many in 0..elements_per_one {
                    let logical = one * elements_per_one + many;
                    data[one * reserved_per_one + many] = logical as i32;
                }
            }
            root.fetch("data").unwrap().set_slice(&data).unwrap();

            let offsets: Vec<i64> = (0..num_one).map(|one| (one * reserved_per_one) as i64).collect();
            root.fetch("sizes").unwrap().set_slice(&sizes).unwrap();
            root.fetch("offsets").unwrap().set_slice(&offsets).unwrap();
        },
        Orientation::Interleaved => {
            let real_total = num_one * elements_per_one;
            let mut data = vec![UNUSED; reserved_total];
            let mut indices = vec![0i64; real_total];
            for one in 0..num_one {
                for many in 0..elements_per_one {
                    let physical = many * num_one + one;
                    let logical = one * elements_per_one + many;
                    data[physical] = logical as i32;
                    indices[logical] = physical as i64;
                }
            }
            root.fetch("data").unwrap().set_slice(&data).unwrap();
            root.fetch("sizes").unwrap().set_slice(&sizes).unwrap();
            root.fetch("indices").unwrap().set_slice(&indices).unwrap();
        },
    }

    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::o2m;

    #[test]
    fn default_orientation_is_group_major_with_padding_and_verifies() {
        let node = uniform(3, 2, 4, Orientation::Default);
        let mut info = Node::new();
        assert!(o2m::verify(&node, &mut info));
        assert_eq!(
            node.get_path("data").unwrap().as_vec::<i32>().unwrap(),
            vec![0, 1, -1, -1, 2, 3, -1, -1, 4, 5, -1, -1]
        );
        assert_eq!(node.get_path("offsets").unwrap().as_vec::<i64>().unwrap(), vec![0, 4, 8]);
    }

    #[test]
    fn interleaved_orientation_round_trips_through_indices() {
        let node = uniform(3, 2, 4, Orientation::Interleaved);
        let index = crate::o2m::index::O2MIndex::new(&node).unwrap();
        for one in 0..3 {
            for many in 0..2 {
                let resolved = index.index(one, many).unwrap();
                let value = node.get_path("data").unwrap().as_element::<i32>(resolved).unwrap();
                assert_eq!(value as usize, one * 2 + many);
            }
        }
    }
}
