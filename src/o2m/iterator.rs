//! The bidirectional three-axis cursor over an O2M relation (spec §4.H).
//!
//! Modeled on the teacher's `TreeIterator`/`InnerNodeTreeIterator` pair: a
//! cursor holding a position rather than an owned copy of what it walks,
//! advanced and retreated symmetrically. Unlike the teacher's cursor,
//! which only ever walks one dimension, a single [`O2MIterator`] here
//! carries position on both the ONE and MANY axes at once, so a caller
//! can interleave moves across axes (spec §4.H, Testable Property 7) on
//! one cursor instead of juggling three independent ones. The DATA axis
//! has no position of its own; it is always derived from `(one, many)`.

use crate::error::TreeError;
use crate::node::Node;
use crate::o2m::index::O2MIndex;

/// Which axis a cursor method acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Group indices `0..size()`.
    One,
    /// Positions `0..size_of(one)` within the cursor's current group.
    Many,
    /// Every `(one, many)` pair across every group, in group order.
    Data,
}

/// A single cursor carrying position on both the ONE and MANY axes of an
/// O2M relation (spec §4.H).
///
/// `one` sits either before the front (`-1`), on a valid group, or after
/// the back (`size()`). `many` is scoped to the *current* `one` group,
/// sitting before its front (`-1`), on a valid position, or after its back
/// (`size_of(one)`); a ONE-axis move always resets `many` to `-1`. DATA
/// never advances in isolation: moving on DATA walks `(one, many)`
/// together to the next/previous pair in visit order, and moving on ONE
/// or MANY is immediately reflected in DATA's view of the same cursor.
pub struct O2MIterator<'a> {
    index: O2MIndex<'a>,
    one: isize,
    many: isize,
    total: usize,
}

impl<'a> O2MIterator<'a> {
    /// Build a cursor over `node`, positioned before the front on every
    /// axis.
    pub fn new(node: &'a Node) -> crate::Result<Self> {
        let index = O2MIndex::new(node)?;
        let mut total = 0usize;
        for one in 0..index.size() {
            total += index.size_of(one)?;
        }
        Ok(O2MIterator {
            index,
            one: -1,
            many: -1,
            total,
        })
    }

    /// Map a DATA-axis linear visit position to its owning `(one, many)`
    /// pair by walking group boundaries.
    fn locate(&self, visit: usize) -> crate::Result<(usize, usize)> {
        let mut remaining = visit;
        for one in 0..self.index.size() {
            let size = self.index.size_of(one)?;
            if remaining < size {
                return Ok((one, remaining));
            }
            remaining -= size;
        }
        Err(TreeError::OutOfRange {
            index: visit,
            len: self.total,
        })
    }

    /// The sum of `size_of(i)` for every group before `one`.
    fn visit_offset(&self, one: usize) -> crate::Result<usize> {
        let mut running = 0usize;
        for i in 0..one {
            running += self.index.size_of(i)?;
        }
        Ok(running)
    }

    /// The cursor's position on the DATA axis, expressed on the same
    /// `-1`/`len` sentinel convention as `one`/`many`: `-1` before the
    /// front, `total` after the back, otherwise `visit_offset(one) +
    /// many`.
    fn virtual_cursor(&self) -> isize {
        if self.one < 0 {
            return -1;
        }
        if self.one as usize >= self.index.size() {
            return self.total as isize;
        }
        let prefix = self.visit_offset(self.one as usize).unwrap_or(0) as isize;
        prefix + self.many
    }

    fn resolved_at(&self, one: usize, many: usize) -> Option<usize> {
        self.index.index(one, many).ok()
    }

    /// Resolve the current `(one, many)` on the DATA axis, or `None` if
    /// either is on a sentinel.
    fn resolve_current(&self) -> Option<usize> {
        if self.one < 0 || self.many < 0 {
            return None;
        }
        self.resolved_at(self.one as usize, self.many as usize)
    }

    /// Rewind to before the first element on every axis.
    pub fn to_front(&mut self) {
        self.one = -1;
        self.many = -1;
    }

    /// Fast-forward to after the last element on every axis.
    pub fn to_back(&mut self) {
        self.one = self.index.size() as isize;
        self.many = -1;
    }

    /// `true` if `next(axis)` would return an element.
    pub fn has_next(&self, axis: Axis) -> bool {
        match axis {
            Axis::One => self.one + 1 < self.index.size() as isize,
            Axis::Many => {
                if self.one < 0 || self.one as usize >= self.index.size() {
                    return false;
                }
                let Ok(size) = self.index.size_of(self.one as usize) else {
                    return false;
                };
                self.many + 1 < size as isize
            },
            Axis::Data => self.virtual_cursor() + 1 < self.total as isize,
        }
    }

    /// `true` if `previous(axis)` would return an element.
    pub fn has_previous(&self, axis: Axis) -> bool {
        match axis {
            Axis::One => self.one > 0,
            Axis::Many => {
                if self.one < 0 || self.one as usize >= self.index.size() {
                    return false;
                }
                self.many > 0
            },
            Axis::Data => self.virtual_cursor() > 0,
        }
    }

    /// Advance one step on `axis`.
    ///
    /// On ONE, returns the new group index (resetting `many` to before
    /// its front). On MANY and DATA, returns the resolved DATA-axis
    /// value at the new position.
    pub fn next(&mut self, axis: Axis) -> Option<usize> {
        if !self.has_next(axis) {
            return None;
        }
        match axis {
            Axis::One => {
                self.one += 1;
                self.many = -1;
                Some(self.one as usize)
            },
            Axis::Many => {
                self.many += 1;
                self.resolve_current()
            },
            Axis::Data => {
                let target = (self.virtual_cursor() + 1) as usize;
                let (one, many) = self.locate(target).ok()?;
                self.one = one as isize;
                self.many = many as isize;
                self.resolved_at(one, many)
            },
        }
    }

    /// Retreat one step on `axis`, symmetric to [`O2MIterator::next`].
    pub fn previous(&mut self, axis: Axis) -> Option<usize> {
        if !self.has_previous(axis) {
            return None;
        }
        match axis {
            Axis::One => {
                self.one -= 1;
                self.many = -1;
                Some(self.one as usize)
            },
            Axis::Many => {
                self.many -= 1;
                self.resolve_current()
            },
            Axis::Data => {
                let target = (self.virtual_cursor() - 1) as usize;
                let (one, many) = self.locate(target).ok()?;
                self.one = one as isize;
                self.many = many as isize;
                self.resolved_at(one, many)
            },
        }
    }

    /// Resolve what `next(axis)` would return, without moving the cursor.
    pub fn peek_next(&self, axis: Axis) -> Option<usize> {
        let mut clone = O2MIterator {
            index: self.index,
            one: self.one,
            many: self.many,
            total: self.total,
        };
        clone.next(axis)
    }

    /// Resolve what `previous(axis)` would return, without moving the
    /// cursor.
    pub fn peek_previous(&self, axis: Axis) -> Option<usize> {
        let mut clone = O2MIterator {
            index: self.index,
            one: self.one,
            many: self.many,
            total: self.total,
        };
        clone.previous(axis)
    }

    /// The cursor's current logical position on `axis`, or `None` if
    /// `axis` is on a sentinel.
    pub fn index(&self, axis: Axis) -> Option<usize> {
        match axis {
            Axis::One => (self.one >= 0 && (self.one as usize) < self.index.size()).then_some(self.one as usize),
            Axis::Many => {
                if self.one < 0 || self.one as usize >= self.index.size() {
                    return None;
                }
                let size = self.index.size_of(self.one as usize).ok()?;
                (self.many >= 0 && (self.many as usize) < size).then_some(self.many as usize)
            },
            Axis::Data => {
                if self.one < 0 || self.one as usize >= self.index.size() || self.many < 0 {
                    return None;
                }
                let size = self.index.size_of(self.one as usize).ok()?;
                if self.many as usize >= size {
                    return None;
                }
                let vc = self.virtual_cursor();
                (vc >= 0 && (vc as usize) < self.total).then_some(vc as usize)
            },
        }
    }

    /// Jump directly to logical position `i` on `axis`.
    pub fn to(&mut self, axis: Axis, i: usize) -> crate::Result<()> {
        match axis {
            Axis::One => {
                if i >= self.index.size() {
                    return Err(TreeError::OutOfRange { index: i, len: self.index.size() });
                }
                self.one = i as isize;
                self.many = -1;
            },
            Axis::Many => {
                if self.one < 0 || self.one as usize >= self.index.size() {
                    return Err(TreeError::OutOfRange { index: i, len: 0 });
                }
                let size = self.index.size_of(self.one as usize)?;
                if i >= size {
                    return Err(TreeError::OutOfRange { index: i, len: size });
                }
                self.many = i as isize;
            },
            Axis::Data => {
                if i >= self.total {
                    return Err(TreeError::OutOfRange { index: i, len: self.total });
                }
                let (one, many) = self.locate(i)?;
                self.one = one as isize;
                self.many = many as isize;
            },
        }
        Ok(())
    }

    /// The number of elements along `axis`: `size()` for ONE, the current
    /// group's `size_of` for MANY (`0` if ONE is on a sentinel), and the
    /// total element count for DATA (spec §4.H "Elements Tests").
    pub fn elements(&self, axis: Axis) -> usize {
        match axis {
            Axis::One => self.index.size(),
            Axis::Many => {
                if self.one < 0 || self.one as usize >= self.index.size() {
                    return 0;
                }
                self.index.size_of(self.one as usize).unwrap_or(0)
            },
            Axis::Data => self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::o2m::examples::{uniform, Orientation};

    #[test]
    fn data_axis_forward_matches_group_order() {
        let node = uniform(3, 2, 4, Orientation::Default);
        let mut it = O2MIterator::new(&node).unwrap();
        let mut collected = Vec::new();
        while let Some(v) = it.next(Axis::Data) {
            collected.push(v);
        }
        assert_eq!(collected, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn data_axis_backward_is_the_reverse_of_forward() {
        let node = uniform(3, 2, 4, Orientation::Default);
        let mut forward = O2MIterator::new(&node).unwrap();
        let mut collected = Vec::new();
        while let Some(v) = forward.next(Axis::Data) {
            collected.push(v);
        }

        let mut backward = O2MIterator::new(&node).unwrap();
        backward.to_back();
        let mut from_back = Vec::new();
        while let Some(v) = backward.previous(Axis::Data) {
            from_back.push(v);
        }

        collected.reverse();
        assert_eq!(collected, from_back);
    }

    #[test]
    fn one_axis_elements_is_a_count_of_groups() {
        let node = uniform(3, 2, 4, Orientation::Default);
        let it = O2MIterator::new(&node).unwrap();
        assert_eq!(it.elements(Axis::One), 3);
    }

    #[test]
    fn many_axis_elements_is_the_current_groups_size() {
        let node = uniform(3, 2, 4, Orientation::Default);
        let mut it = O2MIterator::new(&node).unwrap();
        assert_eq!(it.elements(Axis::Many), 0);
        it.next(Axis::One);
        assert_eq!(it.elements(Axis::Many), 2);
    }

    #[test]
    fn many_axis_is_scoped_to_one_group() {
        let node = uniform(3, 2, 4, Orientation::Default);
        let mut it = O2MIterator::new(&node).unwrap();
        it.to(Axis::One, 2).unwrap();
        assert_eq!(it.next(Axis::Many), Some(4));
        assert_eq!(it.next(Axis::Many), Some(5));
        assert_eq!(it.next(Axis::Many), None);
    }

    #[test]
    fn peek_does_not_move_the_cursor() {
        let node = uniform(3, 2, 4, Orientation::Default);
        let mut it = O2MIterator::new(&node).unwrap();
        assert_eq!(it.peek_next(Axis::Data), Some(0));
        assert_eq!(it.peek_next(Axis::Data), Some(0));
        assert_eq!(it.next(Axis::Data), Some(0));
    }

    #[test]
    fn to_jumps_directly() {
        let node = uniform(3, 2, 4, Orientation::Default);
        let mut it = O2MIterator::new(&node).unwrap();
        it.to(Axis::Data, 4).unwrap();
        assert_eq!(it.index(Axis::Data), Some(4));
        assert_eq!(it.next(Axis::Data), Some(5));
        assert!(it.to(Axis::Data, 6).is_err());
    }

    #[test]
    fn mixed_axis_moves_share_one_cursor() {
        let node = uniform(3, 2, 4, Orientation::Default);
        let mut it = O2MIterator::new(&node).unwrap();

        it.next(Axis::One);
        assert_eq!(it.index(Axis::One), Some(0));
        assert_eq!(it.index(Axis::Many), None);
        assert_eq!(it.index(Axis::Data), None);

        it.next(Axis::Many);
        assert_eq!(it.index(Axis::Many), Some(0));
        assert_eq!(it.index(Axis::One), Some(0));
        assert_eq!(it.index(Axis::Data), Some(0));

        it.next(Axis::Many);
        assert_eq!(it.index(Axis::Many), Some(1));
        assert_eq!(it.index(Axis::One), Some(0));
        assert_eq!(it.index(Axis::Data), Some(1));

        it.next(Axis::One);
        assert_eq!(it.index(Axis::One), Some(1));
        assert_eq!(it.index(Axis::Many), None);
        assert_eq!(it.index(Axis::Data), None);

        it.next(Axis::Data);
        assert_eq!(it.index(Axis::One), Some(1));
        assert_eq!(it.index(Axis::Many), Some(0));
        assert_eq!(it.index(Axis::Data), Some(2));
    }
}
