//! Width-aware line wrapping and viewport scrolling
//!
//! Pipeline: line text -> wrapped segments -> rendering / cursor placement.
//! These functions are the single source of truth for how lines wrap, so
//! rendering and cursor positioning always agree. They are pure: wrapping
//! depends on the terminal width, which can change between renders, so the
//! caller re-derives everything on each pass.

use crate::primitives::display_width::char_width;

/// Break a line into `(start, end)` char-offset segments, each fitting
/// within `width` display columns.
///
/// The segments cover the full line; an empty line yields one empty
/// segment. A segment always contains at least one character, so an
/// over-wide character still makes progress.
pub fn segments(line: &str, width: usize) -> Vec<(usize, usize)> {
    let width = width.max(1);
    if line.is_empty() {
        return vec![(0, 0)];
    }
    if line.is_ascii() {
        // Fast path: every char is one column wide.
        let len = line.len();
        return (0..len)
            .step_by(width)
            .map(|s| (s, (s + width).min(len)))
            .collect();
    }
    let mut segs = Vec::new();
    let mut seg_start = 0;
    let mut w = 0;
    for (i, ch) in line.chars().enumerate() {
        let cw = char_width(ch);
        if w + cw > width && i > seg_start {
            segs.push((seg_start, i));
            seg_start = i;
            w = cw;
        } else {
            w += cw;
        }
    }
    segs.push((seg_start, line.chars().count()));
    segs
}

/// Number of display rows a line occupies when wrapped to `width` columns.
pub fn wrap_rows(line: &str, width: usize) -> usize {
    let width = width.max(1);
    if line.is_empty() {
        return 1;
    }
    if line.is_ascii() {
        return line.len().div_ceil(width);
    }
    let mut rows = 1;
    let mut w = 0;
    for ch in line.chars() {
        let cw = char_width(ch);
        if w + cw > width {
            rows += 1;
            w = cw;
        } else {
            w += cw;
        }
    }
    rows
}

/// The wrapped row (0-based) that contains `col` within `line`.
///
/// A cursor sitting at end of line needs an extra synthetic row when the
/// last segment has no column left for the cursor block.
pub fn cursor_wrap_row(line: &str, col: usize, width: usize) -> usize {
    let segs = segments(line, width);
    for (si, &(_, end)) in segs.iter().enumerate() {
        if col < end {
            return si;
        }
    }
    if !line.is_empty() {
        let (start, end) = segs[segs.len() - 1];
        let last_w: usize = line
            .chars()
            .skip(start)
            .take(end - start)
            .map(char_width)
            .sum();
        if last_w + 1 > width.max(1) {
            return segs.len();
        }
    }
    segs.len() - 1
}

/// Adjust the scroll top so the cursor's wrapped row is inside a viewport
/// of `height` rows.
///
/// If the cursor is above the current top, snap to it; otherwise advance
/// the top one buffer line at a time until the wrapped rows from the top
/// through the cursor fit.
pub fn scroll_top(
    lines: &[String],
    cursor_row: usize,
    cursor_col: usize,
    prev_top: usize,
    width: usize,
    height: usize,
) -> usize {
    let height = height.max(1);
    let mut top = prev_top.min(lines.len().saturating_sub(1));
    if cursor_row < top {
        return cursor_row;
    }
    let mut rows_before: usize = (top..cursor_row).map(|i| wrap_rows(&lines[i], width)).sum();
    let cursor_dy = cursor_wrap_row(&lines[cursor_row], cursor_col, width);
    while rows_before + cursor_dy >= height && top <= cursor_row {
        rows_before = rows_before.saturating_sub(wrap_rows(&lines[top], width));
        top += 1;
    }
    top
}
