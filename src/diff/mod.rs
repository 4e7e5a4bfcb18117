//! Structure-aware JSON diff
//!
//! [`compute`] produces a [`DiffResult`]: two line arrays of equal length
//! aligned row by row, a per-row tag on each side, and a list of hunks for
//! navigation. Alignment pads the shorter side of a change with empty
//! strings so row `i` on the left always faces row `i` on the right.

mod engine;

pub use engine::compute;

/// Classification of one aligned row or hunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffTag {
    Equal,
    /// Present only on the right side.
    Insert,
    /// Present only on the left side.
    Delete,
    /// Present on both sides with different content.
    Replace,
}

/// One contiguous run of changed rows, in aligned coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffHunk {
    pub left_start: usize,
    pub left_count: usize,
    pub right_start: usize,
    pub right_count: usize,
    pub tag: DiffTag,
}

/// Aligned diff output.
///
/// `left_lines.len() == right_lines.len()` and each tag array matches its
/// line array, always.
#[derive(Debug, Clone, Default)]
pub struct DiffResult {
    pub left_lines: Vec<String>,
    pub right_lines: Vec<String>,
    pub left_tags: Vec<DiffTag>,
    pub right_tags: Vec<DiffTag>,
    pub hunks: Vec<DiffHunk>,
}

impl DiffResult {
    /// Append one aligned row.
    pub fn push_pair(&mut self, left: impl Into<String>, right: impl Into<String>, tag: DiffTag) {
        self.left_lines.push(left.into());
        self.right_lines.push(right.into());
        self.left_tags.push(tag);
        self.right_tags.push(tag);
    }

    /// Append a run of equal rows. Both slices must have the same length.
    pub fn push_equal(&mut self, left: &[String], right: &[String]) {
        for (l, r) in left.iter().zip(right) {
            self.push_pair(l.clone(), r.clone(), DiffTag::Equal);
        }
    }

    /// Append a changed run as aligned rows plus one hunk, padding the
    /// shorter side with empty strings. Returns the number of rows added.
    pub fn push_hunk(&mut self, left: &[String], right: &[String], tag: DiffTag) -> usize {
        let start = self.left_lines.len();
        let count = left.len().max(right.len());
        for k in 0..count {
            self.push_pair(
                left.get(k).cloned().unwrap_or_default(),
                right.get(k).cloned().unwrap_or_default(),
                tag,
            );
        }
        if count > 0 {
            self.hunks.push(DiffHunk {
                left_start: start,
                left_count: count,
                right_start: start,
                right_count: count,
                tag,
            });
        }
        count
    }

    pub fn len(&self) -> usize {
        self.left_lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left_lines.is_empty()
    }
}
