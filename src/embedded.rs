//! Embedded JSON strings
//!
//! JSON values are often strings that themselves contain serialized JSON.
//! This module finds the quoted string under the cursor, decodes it, gates
//! it to array/object documents, and patches the re-encoded result back
//! into the host line. Nesting is handled with an explicit stack of
//! frames rather than recursion, so arbitrarily deep embedding costs one
//! small struct per level.

use serde_json::Value;

use crate::json::to_pretty;

/// A quoted string found on a buffer line. Columns are char offsets and
/// include the quotes; `col_end` is exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringSpan {
    pub col_start: usize,
    pub col_end: usize,
    pub decoded: String,
}

/// Why a string under the cursor cannot be opened as an embedded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddedError {
    NotJson,
    NotContainer,
}

/// Scan `line` for the quoted string containing char column `col`.
///
/// Quote characters preceded by a backslash do not open or close a
/// string. Returns `None` when the cursor is outside every string or the
/// span's escapes do not decode.
pub fn find_string_at(line: &str, col: usize) -> Option<StringSpan> {
    let chars: Vec<char> = line.chars().collect();
    let mut in_string = false;
    let mut string_start = 0;
    for i in 0..chars.len() {
        if chars[i] == '"' && (i == 0 || chars[i - 1] != '\\') {
            if !in_string {
                in_string = true;
                string_start = i;
            } else {
                if string_start <= col && col <= i {
                    let raw: String = chars[string_start + 1..i].iter().collect();
                    let decoded = serde_json::from_str::<String>(&format!("\"{raw}\"")).ok()?;
                    return Some(StringSpan {
                        col_start: string_start,
                        col_end: i + 1,
                        decoded,
                    });
                }
                in_string = false;
            }
        }
    }
    None
}

/// Parse a decoded string as an embedded document and pretty-print it.
/// Only arrays and objects qualify; scalars are not worth a sub-editor.
pub fn pretty_document(decoded: &str) -> Result<String, EmbeddedError> {
    let value: Value =
        serde_json::from_str(decoded).map_err(|_| EmbeddedError::NotJson)?;
    if !value.is_array() && !value.is_object() {
        return Err(EmbeddedError::NotContainer);
    }
    Ok(to_pretty(&value))
}

/// JSON-escape a string, quotes included.
pub fn escape_string(content: &str) -> String {
    Value::String(content.to_string()).to_string()
}

/// Replace the char range `[col_start, col_end)` of `line` with the
/// escaped form of `payload`.
pub fn patch_line(line: &str, col_start: usize, col_end: usize, payload: &str) -> String {
    let escaped = escape_string(payload);
    let prefix: String = line.chars().take(col_start).collect();
    let suffix: String = line.chars().skip(col_end).collect();
    format!("{prefix}{escaped}{suffix}")
}

/// Replace a string span inside multi-line content, addressed by row.
pub fn patch_content(
    content: &str,
    row: usize,
    col_start: usize,
    col_end: usize,
    payload: &str,
) -> String {
    let mut lines: Vec<String> = content.split('\n').map(str::to_string).collect();
    if let Some(line) = lines.get_mut(row) {
        *line = patch_line(line, col_start, col_end, payload);
    }
    lines.join("\n")
}

/// One level of embedded editing: where the string lives in the level
/// below, and that level's full content for restoring on close.
#[derive(Debug, Clone)]
pub struct EmbeddedFrame {
    pub row: usize,
    pub col_start: usize,
    pub col_end: usize,
    pub saved_content: String,
}

/// Stack of active embedded-edit levels. Empty means the sub-editor is
/// closed; depth 1 targets the main buffer, deeper frames target the
/// frame below them.
#[derive(Debug, Default)]
pub struct EmbeddedStack {
    frames: Vec<EmbeddedFrame>,
}

impl EmbeddedStack {
    pub fn push(&mut self, frame: EmbeddedFrame) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Option<EmbeddedFrame> {
        self.frames.pop()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
