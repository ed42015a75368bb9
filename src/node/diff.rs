//! Structural comparison with integer relaxation and float epsilon
//! (spec §4.E).
//!
//! No direct analog in the teacher crate (an ART trie has no diff
//! operation); built from scratch in the teacher's doc-commented,
//! `Result`-light style, using a diagnostic [`Node`] as the `info` sink
//! (spec §9: "use a diagnostic Node rather than a flat string so that
//! implementations can reuse the same tree-building component").

use crate::node::Node;

/// Compare `a` and `b`, writing a diagnostic into `info` describing the
/// first discrepancy per subtree. Returns `true` if they differ.
///
/// - Two leaves differ if their element counts differ, or if any pair of
///   elements differ (honoring each side's own stride). Integer kinds
///   compare exactly unless `relax_int` allows a differently-sized integer
///   kind holding an equal numeric value. Float kinds compare within
///   `epsilon`.
/// - Two objects differ if their child name sets differ (order does not
///   matter for this comparison) or if any shared child differs.
/// - A leaf and an object always differ.
pub fn diff(a: &Node, b: &Node, info: &mut Node, epsilon: f64, relax_int: bool) -> bool {
    match (a, b) {
        (Node::Empty, Node::Empty) => false,
        (Node::Leaf { dtype: da, buffer: ba }, Node::Leaf { dtype: db, buffer: bb }) => {
            if da.number_of_elements() != db.number_of_elements() {
                record(
                    info,
                    format!(
                        "element count mismatch: {} vs {}",
                        da.number_of_elements(),
                        db.number_of_elements()
                    ),
                );
                return true;
            }

            for i in 0..da.number_of_elements() {
                let (av, bv) = match (
                    da.read_as_f64(ba.as_slice(), i),
                    db.read_as_f64(bb.as_slice(), i),
                ) {
                    (Ok(av), Ok(bv)) => (av, bv),
                    _ => {
                        record(info, format!("element {i} unreadable"));
                        return true;
                    },
                };

                let kinds_match = da.kind() == db.kind();
                let differ = if da.kind().is_float() || db.kind().is_float() {
                    (av - bv).abs() > epsilon
                } else if kinds_match || relax_int {
                    av != bv
                } else {
                    true
                };

                if differ {
                    record(
                        info,
                        format!("element {i} differs: {av} vs {bv} (kinds {:?} vs {:?})", da.kind(), db.kind()),
                    );
                    return true;
                }
            }
            false
        },
        (Node::Object { children: ca }, Node::Object { children: cb }) => {
            let mut different = false;
            for (name, a_child) in ca {
                match cb.get(name) {
                    Some(b_child) => {
                        let mut child_info = Node::new();
                        if diff(a_child, b_child, &mut child_info, epsilon, relax_int) {
                            different = true;
                            let _ = info.fetch(name).map(|n| *n = child_info);
                        }
                    },
                    None => {
                        different = true;
                        record(info, format!("missing child on right side: {name}"));
                    },
                }
            }
            for name in cb.keys() {
                if !ca.contains_key(name) {
                    different = true;
                    record(info, format!("missing child on left side: {name}"));
                }
            }
            different
        },
        _ => {
            record(info, "shape mismatch: leaf vs object".to_string());
            true
        },
    }
}

fn record(info: &mut Node, message: String) {
    let bytes: Vec<u8> = message.into_bytes();
    let _ = info.set_slice(&bytes);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_leaves_do_not_differ() {
        let mut a = Node::new();
        a.set_slice(&[1u32, 2, 3]).unwrap();
        let mut b = Node::new();
        b.set_slice(&[1u32, 2, 3]).unwrap();
        let mut info = Node::new();
        assert!(!diff(&a, &b, &mut info, 0.0, false));
    }

    #[test]
    fn float_epsilon_allows_small_drift() {
        let mut a = Node::new();
        a.set_slice(&[1.0f64, 2.0]).unwrap();
        let mut b = Node::new();
        b.set_slice(&[1.0f64, 2.0001]).unwrap();
        let mut info = Node::new();
        assert!(!diff(&a, &b, &mut info, 0.001, false));
        assert!(diff(&a, &b, &mut info, 0.0, false));
    }

    #[test]
    fn relax_int_allows_differently_sized_equal_integers() {
        let mut a = Node::new();
        a.set_slice(&[7u32]).unwrap();
        let mut b = Node::new();
        b.set_slice(&[7u64]).unwrap();
        let mut info = Node::new();
        assert!(diff(&a, &b, &mut info, 0.0, false));
        assert!(!diff(&a, &b, &mut info, 0.0, true));
    }

    #[test]
    fn missing_child_is_a_difference() {
        let mut a = Node::new();
        a.fetch("x").unwrap().set_scalar(1u32).unwrap();
        a.fetch("y").unwrap().set_scalar(2u32).unwrap();
        let mut b = Node::new();
        b.fetch("x").unwrap().set_scalar(1u32).unwrap();
        let mut info = Node::new();
        assert!(diff(&a, &b, &mut info, 0.0, false));
    }
}
