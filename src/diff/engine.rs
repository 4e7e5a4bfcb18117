//! Diff computation
//!
//! Both inputs are formatted (optionally normalized) before matching, so
//! the diff reflects structural changes rather than formatting noise.
//! Large documents are matched block by block: top-level entries of a big
//! object or array become the match units, and only changed entries get a
//! line-level diff. JSONL documents are matched record by record.

use std::collections::HashMap;

use similar::{capture_diff_slices, Algorithm, DiffOp};
use tracing::debug;

use super::{DiffHunk, DiffResult, DiffTag};
use crate::json::{format_json, format_jsonl_records, normalize_json};

/// Inputs beyond this many combined lines fall back to a single
/// whole-document replace hunk instead of a line-level match.
const FULL_DIFF_LIMIT: usize = 50_000;

/// Compute the aligned diff of two JSON (or JSONL) documents.
pub fn compute(left: &str, right: &str, normalize: bool, jsonl: bool) -> DiffResult {
    if jsonl {
        return jsonl_diff(left, right, normalize);
    }
    let fmt = if normalize { normalize_json } else { format_json };
    let left_lines = split_lines(&fmt(left));
    let right_lines = split_lines(&fmt(right));
    debug!(
        left = left_lines.len(),
        right = right_lines.len(),
        normalize,
        "computing json diff"
    );
    line_array_diff(&left_lines, &right_lines)
}

fn split_lines(content: &str) -> Vec<String> {
    content.split('\n').map(str::to_string).collect()
}

/// Append a changed run as padded rows without recording a hunk.
/// Returns the number of rows added.
fn push_padded(result: &mut DiffResult, left: &[String], right: &[String], tag: DiffTag) -> usize {
    let count = left.len().max(right.len());
    for k in 0..count {
        result.push_pair(
            left.get(k).cloned().unwrap_or_default(),
            right.get(k).cloned().unwrap_or_default(),
            tag,
        );
    }
    count
}

/// Line-level diff of one changed record or block pair.
///
/// Individual rows keep their insert/delete/replace tags, but the whole
/// region is recorded as a single replace hunk so navigation treats the
/// record as one change.
fn line_diff(result: &mut DiffResult, left: &[String], right: &[String]) {
    let hunk_start = result.len();
    let mut total = 0;
    for op in capture_diff_slices(Algorithm::Myers, left, right) {
        match op {
            DiffOp::Equal {
                old_index,
                new_index,
                len,
            } => {
                result.push_equal(
                    &left[old_index..old_index + len],
                    &right[new_index..new_index + len],
                );
                total += len;
            }
            DiffOp::Delete {
                old_index, old_len, ..
            } => {
                total += push_padded(
                    result,
                    &left[old_index..old_index + old_len],
                    &[],
                    DiffTag::Delete,
                );
            }
            DiffOp::Insert {
                new_index, new_len, ..
            } => {
                total += push_padded(
                    result,
                    &[],
                    &right[new_index..new_index + new_len],
                    DiffTag::Insert,
                );
            }
            DiffOp::Replace {
                old_index,
                old_len,
                new_index,
                new_len,
            } => {
                total += push_padded(
                    result,
                    &left[old_index..old_index + old_len],
                    &right[new_index..new_index + new_len],
                    DiffTag::Replace,
                );
            }
        }
    }
    if total > 0 {
        result.hunks.push(DiffHunk {
            left_start: hunk_start,
            left_count: total,
            right_start: hunk_start,
            right_count: total,
            tag: DiffTag::Replace,
        });
    }
}

/// Find the indentation level of repeating sub-structures.
///
/// Counts lines opening with `{` or `[` per indent and returns the indent
/// with the most openers, provided there are at least four. Fewer than
/// four means the document has no repeating structure worth segmenting.
fn detect_blocks(lines: &[String]) -> Option<usize> {
    let mut indent_counts: HashMap<usize, usize> = HashMap::new();
    for line in lines {
        let stripped = line.trim_start();
        if stripped.starts_with('{') || stripped.starts_with('[') {
            let indent = line.len() - stripped.len();
            *indent_counts.entry(indent).or_insert(0) += 1;
        }
    }
    let (best_indent, count) = indent_counts
        .into_iter()
        // Smallest indent wins a tie, so nesting resolves outside-in.
        .max_by_key(|&(indent, count)| (count, std::cmp::Reverse(indent)))?;
    if count < 4 {
        return None;
    }
    Some(best_indent)
}

/// Cut the line array into alternating gap and block segments at the
/// target indent. Every line belongs to exactly one segment.
fn build_segments(lines: &[String], target_indent: usize) -> Vec<(usize, usize)> {
    let mut segments = Vec::new();
    let mut block_start: Option<usize> = None;
    let mut gap_start = 0;
    for (i, line) in lines.iter().enumerate() {
        let stripped = line.trim_start();
        if stripped.is_empty() {
            continue;
        }
        let indent = line.len() - stripped.len();
        if indent != target_indent {
            continue;
        }
        let first = stripped.as_bytes()[0];
        if (first == b'{' || first == b'[') && block_start.is_none() {
            if gap_start < i {
                segments.push((gap_start, i));
            }
            block_start = Some(i);
        } else if (first == b'}' || first == b']') && block_start.is_some() {
            if let Some(start) = block_start.take() {
                segments.push((start, i + 1));
            }
            gap_start = i + 1;
        }
    }
    // Unterminated block or trailing gap.
    if let Some(start) = block_start {
        segments.push((start, lines.len()));
    } else if gap_start < lines.len() {
        segments.push((gap_start, lines.len()));
    }
    segments
}

/// Pair up replaced segments positionally, line-diffing each pair and
/// emitting the unpaired surplus as whole-segment deletes or inserts.
fn replace_segments(
    result: &mut DiffResult,
    left_src: &[String],
    right_src: &[String],
    left_segs: &[(usize, usize)],
    right_segs: &[(usize, usize)],
) {
    let paired = left_segs.len().min(right_segs.len());
    for k in 0..paired {
        let (ls, le) = left_segs[k];
        let (rs, re) = right_segs[k];
        let l_lines = &left_src[ls..le];
        let r_lines = &right_src[rs..re];
        if l_lines == r_lines {
            result.push_equal(l_lines, r_lines);
        } else {
            line_diff(result, l_lines, r_lines);
        }
    }
    for &(ls, le) in &left_segs[paired..] {
        result.push_hunk(&left_src[ls..le], &[], DiffTag::Delete);
    }
    for &(rs, re) in &right_segs[paired..] {
        result.push_hunk(&[], &right_src[rs..re], DiffTag::Insert);
    }
}

/// Segment-granularity diff: match segments by their joined text, then
/// refine only the replaced ones.
fn block_diff(
    left_src: &[String],
    right_src: &[String],
    left_segs: &[(usize, usize)],
    right_segs: &[(usize, usize)],
) -> DiffResult {
    let left_keys: Vec<String> = left_segs
        .iter()
        .map(|&(s, e)| left_src[s..e].join("\n"))
        .collect();
    let right_keys: Vec<String> = right_segs
        .iter()
        .map(|&(s, e)| right_src[s..e].join("\n"))
        .collect();
    let mut result = DiffResult::default();
    for op in capture_diff_slices(Algorithm::Myers, &left_keys, &right_keys) {
        match op {
            DiffOp::Equal {
                old_index,
                new_index,
                len,
            } => {
                for k in 0..len {
                    let (ls, le) = left_segs[old_index + k];
                    let (rs, re) = right_segs[new_index + k];
                    result.push_equal(&left_src[ls..le], &right_src[rs..re]);
                }
            }
            DiffOp::Delete {
                old_index, old_len, ..
            } => {
                for &(ls, le) in &left_segs[old_index..old_index + old_len] {
                    result.push_hunk(&left_src[ls..le], &[], DiffTag::Delete);
                }
            }
            DiffOp::Insert {
                new_index, new_len, ..
            } => {
                for &(rs, re) in &right_segs[new_index..new_index + new_len] {
                    result.push_hunk(&[], &right_src[rs..re], DiffTag::Insert);
                }
            }
            DiffOp::Replace {
                old_index,
                old_len,
                new_index,
                new_len,
            } => {
                replace_segments(
                    &mut result,
                    left_src,
                    right_src,
                    &left_segs[old_index..old_index + old_len],
                    &right_segs[new_index..new_index + new_len],
                );
            }
        }
    }
    result
}

fn full_replace(left_src: &[String], right_src: &[String]) -> DiffResult {
    let mut result = DiffResult::default();
    result.push_hunk(left_src, right_src, DiffTag::Replace);
    result
}

/// Plain line-level diff of the whole document.
fn plain_line_diff(left_src: &[String], right_src: &[String]) -> DiffResult {
    if left_src.len() + right_src.len() > FULL_DIFF_LIMIT {
        debug!(
            left = left_src.len(),
            right = right_src.len(),
            "input over line limit, falling back to whole-document replace"
        );
        return full_replace(left_src, right_src);
    }
    let mut result = DiffResult::default();
    for op in capture_diff_slices(Algorithm::Myers, left_src, right_src) {
        match op {
            DiffOp::Equal {
                old_index,
                new_index,
                len,
            } => result.push_equal(
                &left_src[old_index..old_index + len],
                &right_src[new_index..new_index + len],
            ),
            DiffOp::Delete {
                old_index, old_len, ..
            } => {
                result.push_hunk(&left_src[old_index..old_index + old_len], &[], DiffTag::Delete);
            }
            DiffOp::Insert {
                new_index, new_len, ..
            } => {
                result.push_hunk(
                    &[],
                    &right_src[new_index..new_index + new_len],
                    DiffTag::Insert,
                );
            }
            DiffOp::Replace {
                old_index,
                old_len,
                new_index,
                new_len,
            } => {
                result.push_hunk(
                    &left_src[old_index..old_index + old_len],
                    &right_src[new_index..new_index + new_len],
                    DiffTag::Replace,
                );
            }
        }
    }
    result
}

/// Diff two formatted line arrays, using the block segmentation when both
/// sides repeat structure at the same indent.
fn line_array_diff(left_src: &[String], right_src: &[String]) -> DiffResult {
    if let (Some(li), Some(ri)) = (detect_blocks(left_src), detect_blocks(right_src)) {
        if li == ri {
            let left_segs = build_segments(left_src, li);
            let right_segs = build_segments(right_src, li);
            debug!(
                indent = li,
                left_segments = left_segs.len(),
                right_segments = right_segs.len(),
                "using block-segmented diff"
            );
            return block_diff(left_src, right_src, &left_segs, &right_segs);
        }
    }
    plain_line_diff(left_src, right_src)
}

/// Push the blank separator row before a record group, except before the
/// first group. Always returns false so callers can thread the flag.
fn jsonl_sep(result: &mut DiffResult, tag: DiffTag, first: bool) -> bool {
    if !first {
        result.push_pair("", "", tag);
    }
    false
}

/// Record-granularity JSONL diff: records are the match units, changed
/// pairs get a line-level diff, groups are separated by blank rows.
fn jsonl_diff(left: &str, right: &str, normalize: bool) -> DiffResult {
    let left_records = format_jsonl_records(left, normalize);
    let right_records = format_jsonl_records(right, normalize);
    debug!(
        left = left_records.len(),
        right = right_records.len(),
        "computing jsonl diff"
    );

    let mut result = DiffResult::default();
    let mut first = true;
    for op in capture_diff_slices(Algorithm::Myers, &left_records, &right_records) {
        match op {
            DiffOp::Equal {
                old_index, len, ..
            } => {
                for record in &left_records[old_index..old_index + len] {
                    first = jsonl_sep(&mut result, DiffTag::Equal, first);
                    for line in record.split('\n') {
                        result.push_pair(line, line, DiffTag::Equal);
                    }
                }
            }
            DiffOp::Delete {
                old_index, old_len, ..
            } => {
                for record in &left_records[old_index..old_index + old_len] {
                    first = jsonl_sep(&mut result, DiffTag::Delete, first);
                    result.push_hunk(&split_lines(record), &[], DiffTag::Delete);
                }
            }
            DiffOp::Insert {
                new_index, new_len, ..
            } => {
                for record in &right_records[new_index..new_index + new_len] {
                    first = jsonl_sep(&mut result, DiffTag::Insert, first);
                    result.push_hunk(&[], &split_lines(record), DiffTag::Insert);
                }
            }
            DiffOp::Replace {
                old_index,
                old_len,
                new_index,
                new_len,
            } => {
                let paired = old_len.min(new_len);
                for k in 0..paired {
                    first = jsonl_sep(&mut result, DiffTag::Replace, first);
                    let l_record = &left_records[old_index + k];
                    let r_record = &right_records[new_index + k];
                    if l_record == r_record {
                        for line in l_record.split('\n') {
                            result.push_pair(line, line, DiffTag::Equal);
                        }
                    } else {
                        line_diff(&mut result, &split_lines(l_record), &split_lines(r_record));
                    }
                }
                for record in &left_records[old_index + paired..old_index + old_len] {
                    first = jsonl_sep(&mut result, DiffTag::Delete, first);
                    result.push_hunk(&split_lines(record), &[], DiffTag::Delete);
                }
                for record in &right_records[new_index + paired..new_index + new_len] {
                    first = jsonl_sep(&mut result, DiffTag::Insert, first);
                    result.push_hunk(&[], &split_lines(record), DiffTag::Insert);
                }
            }
        }
    }
    result
}
