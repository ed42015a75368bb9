//! Integration tests for the O2M relation façade, colocated the way the
//! node module keeps its own `tests.rs` next to what it exercises.

use super::*;
use crate::o2m::examples::{uniform, Orientation};

#[test]
fn uniform_3x2_produces_expected_sparse_arrays() {
    let node = uniform(3, 2, 4, Orientation::Default);
    assert_eq!(
        node.get_path("data").unwrap().as_vec::<i32>().unwrap(),
        vec![0, 1, -1, -1, 2, 3, -1, -1, 4, 5, -1, -1]
    );
    assert_eq!(node.get_path("sizes").unwrap().as_vec::<i64>().unwrap(), vec![2, 2, 2]);
    assert_eq!(node.get_path("offsets").unwrap().as_vec::<i64>().unwrap(), vec![0, 4, 8]);
}

#[test]
fn verify_accepts_a_well_formed_relation() {
    let node = uniform(3, 2, 4, Orientation::Default);
    let mut info = Node::new();
    assert!(verify(&node, &mut info));
}

#[test]
fn verify_rejects_sizes_exceeding_data_space() {
    let mut node = Node::new();
    node.fetch("data").unwrap().set_slice(&[1u32, 2, 3]).unwrap();
    node.fetch("sizes").unwrap().set_slice(&[2i32, 2]).unwrap();
    let mut info = Node::new();
    assert!(!verify(&node, &mut info));
    assert!(!info.child_names().is_empty());
}

#[test]
fn verify_rejects_a_non_integer_sizes_leaf() {
    let mut node = Node::new();
    node.fetch("data").unwrap().set_slice(&[1.0f64, 2.0]).unwrap();
    node.fetch("sizes").unwrap().set_slice(&[1.0f64, 1.0]).unwrap();
    let mut info = Node::new();
    assert!(!verify(&node, &mut info));
}

#[test]
fn generate_offsets_requires_sizes() {
    let mut node = Node::new();
    node.fetch("data").unwrap().set_slice(&[1u32, 2, 3]).unwrap();
    let mut info = Node::new();
    assert!(!generate_offsets(&mut node, &mut info));
}

#[test]
fn generate_offsets_writes_prefix_sum() {
    let mut node = Node::new();
    node.fetch("data").unwrap().set_slice(&[0u32, 1, 2, 3, 4]).unwrap();
    node.fetch("sizes").unwrap().set_slice(&[2i32, 1, 2]).unwrap();
    let mut info = Node::new();
    assert!(generate_offsets(&mut node, &mut info));
    assert_eq!(node.get_path("offsets").unwrap().as_vec::<i64>().unwrap(), vec![0, 2, 3]);
}

#[test]
fn indices_only_relation_verifies_and_resolves() {
    let mut node = Node::new();
    node.fetch("data").unwrap().set_slice(&[10u32, 20, 30, 40]).unwrap();
    node.fetch("indices").unwrap().set_slice(&[3i32, 1, 0, 2]).unwrap();
    let mut info = Node::new();
    assert!(verify(&node, &mut info));

    let index = index::O2MIndex::new(&node).unwrap();
    assert_eq!(index.size(), 4);
    for one in 0..4 {
        assert_eq!(index.size_of(one).unwrap(), 1);
        assert_eq!(index.offset(one).unwrap(), one);
    }
    assert_eq!(index.index(0, 0).unwrap(), 3);
    assert_eq!(index.index(1, 0).unwrap(), 1);
    assert_eq!(index.index(2, 0).unwrap(), 0);
    assert_eq!(index.index(3, 0).unwrap(), 2);
}

#[test]
fn sizes_offsets_and_indices_combine() {
    let mut node = Node::new();
    node.fetch("data").unwrap().set_slice(&[100u32, 200, 300, 400]).unwrap();
    node.fetch("sizes").unwrap().set_slice(&[2i32, 2]).unwrap();
    node.fetch("offsets").unwrap().set_slice(&[0i32, 2]).unwrap();
    node.fetch("indices").unwrap().set_slice(&[3i32, 2, 1, 0]).unwrap();
    let mut info = Node::new();
    assert!(verify(&node, &mut info));

    let index = index::O2MIndex::new(&node).unwrap();
    assert_eq!(index.index(0, 0).unwrap(), 3);
    assert_eq!(index.index(1, 1).unwrap(), 0);
}

#[test]
fn compact_to_drops_indices_and_packs_in_visit_order() {
    let node = uniform(3, 2, 4, Orientation::Interleaved);
    let mut dst = Node::new();
    compact_to(&node, &mut dst).unwrap();

    assert!(!dst.has_path("indices"));
    assert_eq!(dst.get_path("data").unwrap().as_vec::<i32>().unwrap(), vec![0, 1, 2, 3, 4, 5]);
    assert_eq!(dst.get_path("sizes").unwrap().as_vec::<i64>().unwrap(), vec![2, 2, 2]);
    assert_eq!(dst.get_path("offsets").unwrap().as_vec::<i64>().unwrap(), vec![0, 2, 4]);
}

#[test]
fn compact_to_preserves_float_data_exactly() {
    let mut node = Node::new();
    node.fetch("data").unwrap().set_slice(&[1.5f64, 2.5, 3.5, 4.5]).unwrap();
    node.fetch("sizes").unwrap().set_slice(&[2i32, 2]).unwrap();
    node.fetch("indices").unwrap().set_slice(&[3i32, 2, 1, 0]).unwrap();

    let mut dst = Node::new();
    compact_to(&node, &mut dst).unwrap();
    assert_eq!(dst.get_path("data").unwrap().as_vec::<f64>().unwrap(), vec![4.5, 3.5, 2.5, 1.5]);
}

#[test]
fn data_axis_iteration_is_symmetric() {
    let node = uniform(4, 3, 4, Orientation::Default);
    let mut forward = iterator::O2MIterator::new(&node).unwrap();
    let mut forward_collected = Vec::new();
    while let Some(v) = forward.next(Axis::Data) {
        forward_collected.push(v);
    }

    let mut backward = iterator::O2MIterator::new(&node).unwrap();
    backward.to_back();
    let mut backward_collected = Vec::new();
    while let Some(v) = backward.previous(Axis::Data) {
        backward_collected.push(v);
    }
    backward_collected.reverse();

    assert_eq!(forward_collected, backward_collected);
    assert_eq!(forward_collected.len(), 12);
}

#[test]
fn data_paths_excludes_reserved_names() {
    let node = uniform(2, 2, 4, Orientation::Default);
    assert_eq!(data_paths(&node), vec!["data".to_string()]);
}
