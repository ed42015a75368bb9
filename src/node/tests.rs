//! Integration tests for [`Node`], colocated the way the teacher keeps
//! `lookup_tests.rs` next to the operation it tests.

use super::*;
use crate::dtype::ElementKind;

#[test]
fn fetch_auto_creates_intermediate_objects() {
    let mut root = Node::new();
    root.fetch("a.b.c").unwrap().set_scalar(3.14f64).unwrap();

    assert!(root.has_path("a.b.c"));
    let mut expanded = Vec::new();
    root.paths(&mut expanded, true);
    assert_eq!(expanded, vec!["a.b.c".to_string()]);

    assert_eq!(root.get_path("a.b.c").unwrap().to_real().unwrap(), 3.14);
}

#[test]
fn has_path_never_mutates() {
    let mut root = Node::new();
    root.fetch("a.b").unwrap().set_scalar(1u32).unwrap();

    assert!(!root.has_path("a.c"));
    assert!(!root.has_path("a.c"));

    let mut paths_before = Vec::new();
    root.paths(&mut paths_before, true);
    assert_eq!(paths_before, vec!["a.b".to_string()]);
}

#[test]
fn paths_preserve_first_insertion_order() {
    let mut root = Node::new();
    root.fetch("z").unwrap().set_scalar(1u32).unwrap();
    root.fetch("a").unwrap().set_scalar(2u32).unwrap();
    root.fetch("z").unwrap().set_scalar(3u32).unwrap(); // reinsert, should not move

    assert_eq!(root.child_names(), vec!["z".to_string(), "a".to_string()]);
    assert_eq!(root.get_path("z").unwrap().to_integer().unwrap(), 3);
}

#[test]
fn invalid_path_is_rejected() {
    let mut root = Node::new();
    assert!(root.fetch("").is_err());
    assert!(root.fetch("a..b").is_err());
    assert!(!root.has_path(""));
}

#[test]
fn assigning_scalar_to_object_discards_children() {
    let mut root = Node::new();
    root.fetch("a.b").unwrap();
    assert!(root.is_object());

    root.set_scalar(5u32).unwrap();
    assert!(root.is_leaf());
    assert!(!root.has_path("a.b"));
}

#[test]
fn fetch_on_leaf_discards_buffer_and_becomes_object() {
    let mut root = Node::new();
    root.set_scalar(5u32).unwrap();
    assert!(root.is_leaf());

    root.fetch("a").unwrap().set_scalar(1u32).unwrap();
    assert!(root.is_object());
    assert_eq!(root.to_integer(), Err(TreeError::NotALeaf));
}

#[test]
fn to_integer_and_to_real_fail_on_object() {
    let mut root = Node::new();
    root.fetch("a").unwrap();
    assert_eq!(root.to_integer(), Err(TreeError::NotALeaf));
    assert_eq!(root.to_real(), Err(TreeError::NotALeaf));
}

#[test]
fn as_scalar_rejects_kind_mismatch() {
    let mut n = Node::new();
    n.set_scalar(1u32).unwrap();
    assert_eq!(
        n.as_scalar::<f64>(),
        Err(TreeError::TypeMismatch {
            actual: ElementKind::U32,
            requested: ElementKind::F64,
        })
    );
}

#[test]
fn dtype_on_object_is_empty() {
    let mut root = Node::new();
    root.fetch("a").unwrap();
    assert_eq!(root.dtype(), DataType::empty());
}

#[test]
fn deep_copy_isolates_owned_leaves() {
    let mut a = Node::new();
    a.set_slice(&[1u32, 2, 3]).unwrap();
    let mut b = a.clone();

    let Node::Leaf { buffer, .. } = &mut a else {
        panic!("expected leaf");
    };
    buffer.as_mut_slice()[0] = 0xff;

    assert_eq!(b.as_vec::<u32>().unwrap(), vec![1u32, 2, 3]);
    b.set_scalar(9u32).unwrap();
    assert_eq!(a.as_vec::<u32>().unwrap().len(), 3);
}

#[test]
fn external_leaf_copy_shares_bytes() {
    let mut backing = [1u32, 2, 3];
    let dtype = DataType::u32(3);
    let mut a = Node::new();
    // SAFETY: `backing` outlives `a` and `b` in this test.
    unsafe {
        a.set_external(
            std::ptr::NonNull::new(backing.as_mut_ptr().cast::<u8>()).unwrap(),
            dtype,
        )
        .unwrap();
    }
    let b = a.clone();
    assert_eq!(b.as_vec::<u32>().unwrap(), vec![1, 2, 3]);

    backing[0] = 42;
    assert_eq!(b.as_vec::<u32>().unwrap(), vec![42, 2, 3]);
}
