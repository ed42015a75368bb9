//! Dotted path parsing and resolution (spec §4.D).
//!
//! Segments are collected into a [`TinyVec`] so that the common shallow
//! path (a handful of segments) never allocates — the same inline-small-
//! buffer idiom the teacher applies to trie key prefixes (`Header`'s
//! `TinyVec<[u8; NUM_PREFIX_BYTES]>`), lifted one level up to path
//! segments.

use tinyvec::TinyVec;

use crate::error::TreeError;

/// Number of path segments kept inline before [`PathSegments`] spills to
/// the heap.
pub const PATH_INLINE_SEGMENTS: usize = 8;

/// A dotted path, split into its `.`-separated segments.
///
/// Never interprets a segment as an index: numeric-looking names are just
/// names (spec §4.D).
#[derive(Debug, Clone)]
pub struct PathSegments<'a>(TinyVec<[&'a str; PATH_INLINE_SEGMENTS]>);

impl<'a> PathSegments<'a> {
    /// Split `path` on `.`, rejecting empty segments (including an empty
    /// path itself) with [`TreeError::InvalidPath`].
    pub fn parse(path: &'a str) -> crate::Result<Self> {
        if path.is_empty() {
            return Err(TreeError::InvalidPath {
                path: path.to_string(),
            });
        }

        let mut segments = TinyVec::new();
        for segment in path.split('.') {
            if segment.is_empty() {
                return Err(TreeError::InvalidPath {
                    path: path.to_string(),
                });
            }
            segments.push(segment);
        }
        Ok(PathSegments(segments))
    }

    /// The segments, in left-to-right order.
    pub fn as_slice(&self) -> &[&'a str] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_dot() {
        let p = PathSegments::parse("a.b.c").unwrap();
        assert_eq!(p.as_slice(), &["a", "b", "c"]);
    }

    #[test]
    fn rejects_empty_path() {
        assert!(PathSegments::parse("").is_err());
    }

    #[test]
    fn rejects_empty_segment() {
        assert!(PathSegments::parse("a..b").is_err());
        assert!(PathSegments::parse(".a").is_err());
        assert!(PathSegments::parse("a.").is_err());
    }

    #[test]
    fn numeric_looking_segments_are_just_names() {
        let p = PathSegments::parse("0.1.2").unwrap();
        assert_eq!(p.as_slice(), &["0", "1", "2"]);
    }
}
