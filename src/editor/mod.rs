//! Modal editing session
//!
//! [`Editor`] owns the line buffer, cursor, mode state machine, undo and
//! redo stacks, yank buffer and the dot-repeat recorder. The host feeds
//! it one key event at a time and drains the [`Request`]s it queues; the
//! engine itself never touches a file or the terminal.
//!
//! Columns are char offsets, not byte offsets, so the cursor moves one
//! glyph at a time through multibyte text.

mod command;
mod insert;
mod motion;
mod normal;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::debug;

use crate::embedded;
use crate::event::Request;
use crate::json;
use crate::primitives::wrap;

const UNDO_LIMIT: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Insert,
    Command,
}

impl Mode {
    pub fn name(self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Insert => "INSERT",
            Mode::Command => "COMMAND",
        }
    }
}

/// Whole-buffer undo snapshot. Compound edits restore exactly, at the
/// cost of cloning the line vector per mutation.
#[derive(Debug, Clone)]
struct Snapshot {
    lines: Vec<String>,
    cursor_row: usize,
    cursor_col: usize,
}

pub struct Editor {
    pub lines: Vec<String>,
    pub cursor_row: usize,
    pub cursor_col: usize,
    pub read_only: bool,
    pub jsonl: bool,
    pub command_buffer: String,
    pub pending: Option<char>,
    pub status: String,
    pub scroll_top: usize,
    pub yank_buffer: Vec<String>,
    mode: Mode,
    viewport_rows: usize,
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    dot_buffer: Vec<(KeyCode, KeyModifiers)>,
    dot_recording: bool,
    dot_replaying: bool,
    requests: Vec<Request>,
}

impl Editor {
    pub fn new(initial: &str, read_only: bool, jsonl: bool) -> Self {
        let content = if jsonl && !initial.is_empty() {
            json::jsonl_to_pretty(initial)
        } else {
            initial.to_string()
        };
        let lines = if content.is_empty() {
            vec![String::new()]
        } else {
            content.split('\n').map(str::to_string).collect()
        };
        Self {
            lines,
            cursor_row: 0,
            cursor_col: 0,
            read_only,
            jsonl,
            command_buffer: String::new(),
            pending: None,
            status: String::new(),
            scroll_top: 0,
            yank_buffer: Vec::new(),
            mode: Mode::Normal,
            viewport_rows: 24,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            dot_buffer: Vec::new(),
            dot_recording: false,
            dot_replaying: false,
            requests: Vec::new(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn content(&self) -> String {
        self.lines.join("\n")
    }

    /// Replace the buffer wholesale, resetting the cursor. JSONL input is
    /// expanded to pretty blocks first.
    pub fn set_content(&mut self, content: &str) {
        let content = if self.jsonl && !content.is_empty() {
            json::jsonl_to_pretty(content)
        } else {
            content.to_string()
        };
        self.lines = if content.is_empty() {
            vec![String::new()]
        } else {
            content.split('\n').map(str::to_string).collect()
        };
        self.cursor_row = 0;
        self.cursor_col = 0;
    }

    /// Drain the requests queued since the last call.
    pub fn take_requests(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.requests)
    }

    pub(crate) fn push_request(&mut self, request: Request) {
        self.requests.push(request);
    }

    /// Viewport content height, set by the host each render.
    pub fn set_viewport_rows(&mut self, rows: usize) {
        self.viewport_rows = rows.max(1);
    }

    pub(crate) fn viewport_rows(&self) -> usize {
        self.viewport_rows
    }

    /// Bring the cursor's wrapped row back inside the viewport.
    pub fn ensure_cursor_visible(&mut self, width: usize) {
        self.scroll_top = wrap::scroll_top(
            &self.lines,
            self.cursor_row,
            self.cursor_col,
            self.scroll_top,
            width,
            self.viewport_rows,
        );
    }

    // -- Key dispatch -----------------------------------------------------

    /// Process one key event: record it when the dot recorder is live,
    /// dispatch on mode, then re-clamp the cursor.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        if !self.dot_replaying && self.dot_recording {
            self.dot_buffer.push((key.code, key.modifiers));
        }
        self.dispatch(key.code, key.modifiers);
        self.clamp_cursor();
    }

    fn dispatch(&mut self, code: KeyCode, mods: KeyModifiers) {
        match self.mode {
            Mode::Normal => self.handle_normal(code, mods),
            Mode::Insert => self.handle_insert(code, mods),
            Mode::Command => self.handle_command(code, mods),
        }
    }

    pub(crate) fn clamp_cursor(&mut self) {
        self.cursor_row = self.cursor_row.min(self.lines.len() - 1);
        let line_len = char_len(&self.lines[self.cursor_row]);
        let max_col = match self.mode {
            Mode::Normal => line_len.saturating_sub(1),
            Mode::Insert | Mode::Command => line_len,
        };
        self.cursor_col = self.cursor_col.min(max_col);
    }

    pub(crate) fn enter_insert(&mut self) {
        if self.read_only {
            self.status = "[readonly]".to_string();
            return;
        }
        self.mode = Mode::Insert;
        self.status = "-- INSERT --".to_string();
    }

    pub(crate) fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    // -- Undo / redo ------------------------------------------------------

    pub(crate) fn save_undo(&mut self) {
        self.undo_stack.push(Snapshot {
            lines: self.lines.clone(),
            cursor_row: self.cursor_row,
            cursor_col: self.cursor_col,
        });
        if self.undo_stack.len() > UNDO_LIMIT {
            self.undo_stack.remove(0);
        }
        // New edits invalidate the redo branch.
        self.redo_stack.clear();
    }

    pub(crate) fn undo(&mut self) {
        let Some(snapshot) = self.undo_stack.pop() else {
            self.status = "nothing to undo".to_string();
            return;
        };
        self.redo_stack.push(Snapshot {
            lines: self.lines.clone(),
            cursor_row: self.cursor_row,
            cursor_col: self.cursor_col,
        });
        self.lines = snapshot.lines;
        self.cursor_row = snapshot.cursor_row;
        self.cursor_col = snapshot.cursor_col;
        self.status = "undone".to_string();
    }

    pub(crate) fn redo(&mut self) {
        let Some(snapshot) = self.redo_stack.pop() else {
            self.status = "nothing to redo".to_string();
            return;
        };
        self.undo_stack.push(Snapshot {
            lines: self.lines.clone(),
            cursor_row: self.cursor_row,
            cursor_col: self.cursor_col,
        });
        self.lines = snapshot.lines;
        self.cursor_row = snapshot.cursor_row;
        self.cursor_col = snapshot.cursor_col;
        self.status = "redone".to_string();
    }

    #[cfg(test)]
    pub(crate) fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    // -- Dot repeat -------------------------------------------------------

    /// Begin recording from the edit-initiating key. The key itself was
    /// not appended by `handle_key` (recording was off), so seed the
    /// buffer with it here.
    pub(crate) fn dot_start(&mut self, code: KeyCode, mods: KeyModifiers) {
        if self.dot_replaying {
            return;
        }
        self.dot_buffer = vec![(code, mods)];
        self.dot_recording = true;
    }

    pub(crate) fn dot_stop(&mut self) {
        self.dot_recording = false;
    }

    /// Feed the recorded sequence back through dispatch. The replay flag
    /// keeps the recorder off so a replay cannot re-record itself.
    pub(crate) fn dot_replay(&mut self) {
        if self.dot_buffer.is_empty() {
            return;
        }
        let events = self.dot_buffer.clone();
        self.dot_replaying = true;
        for (code, mods) in events {
            match self.mode {
                Mode::Normal => self.handle_normal(code, mods),
                Mode::Insert => self.handle_insert(code, mods),
                Mode::Command => {}
            }
            self.clamp_cursor();
        }
        self.dot_replaying = false;
    }

    // -- Validation / formatting ------------------------------------------

    fn check_content(&self, content: &str) -> Result<(), String> {
        if self.jsonl {
            json::check_jsonl(content)
        } else {
            json::check_json(content)
        }
    }

    /// Validate the buffer, set the status, and queue a validation event
    /// for the host either way.
    pub fn validate(&mut self) -> bool {
        let content = self.content();
        match self.check_content(&content) {
            Ok(()) => {
                let label = if self.jsonl { "JSONL" } else { "JSON" };
                self.status = format!("{label} valid");
                self.push_request(Request::Validated {
                    valid: true,
                    error: None,
                });
                true
            }
            Err(err) => {
                self.status = err.clone();
                self.push_request(Request::Validated {
                    valid: false,
                    error: Some(err),
                });
                false
            }
        }
    }

    pub(crate) fn format_buffer(&mut self) {
        if self.jsonl {
            self.format_buffer_jsonl();
            return;
        }
        let content = self.content();
        match serde_json::from_str::<serde_json::Value>(&content) {
            Ok(value) => {
                self.save_undo();
                self.lines = json::to_pretty(&value)
                    .split('\n')
                    .map(str::to_string)
                    .collect();
                self.cursor_row = 0;
                self.cursor_col = 0;
                self.status = "formatted".to_string();
            }
            Err(e) => {
                self.status = format!("cannot format: {e}");
            }
        }
    }

    fn format_buffer_jsonl(&mut self) {
        let content = self.content();
        let blocks = json::split_blocks(&content);
        let mut formatted = Vec::with_capacity(blocks.len());
        for (i, block) in blocks.iter().enumerate() {
            match serde_json::from_str::<serde_json::Value>(block) {
                Ok(value) => formatted.push(json::to_pretty(&value)),
                Err(e) => {
                    self.status = format!("cannot format: record {}: {e}", i + 1);
                    return;
                }
            }
        }
        self.save_undo();
        self.lines = formatted
            .join("\n\n")
            .split('\n')
            .map(str::to_string)
            .collect();
        self.cursor_row = 0;
        self.cursor_col = 0;
        self.status = "formatted".to_string();
    }

    // -- Embedded strings -------------------------------------------------

    /// Resolve `ej`: find the string under the cursor, gate it to an
    /// embeddable document, and queue the sub-edit request.
    pub(crate) fn request_embedded_edit(&mut self) {
        let line = &self.lines[self.cursor_row];
        let Some(span) = embedded::find_string_at(line, self.cursor_col) else {
            self.status = "cursor not on a string value".to_string();
            return;
        };
        match embedded::pretty_document(&span.decoded) {
            Ok(content) => {
                debug!(
                    row = self.cursor_row,
                    col_start = span.col_start,
                    col_end = span.col_end,
                    "opening embedded edit"
                );
                self.push_request(Request::EmbeddedEdit {
                    content,
                    row: self.cursor_row,
                    col_start: span.col_start,
                    col_end: span.col_end,
                });
            }
            Err(embedded::EmbeddedError::NotJson) => {
                self.status = "string is not valid JSON".to_string();
            }
            Err(embedded::EmbeddedError::NotContainer) => {
                self.status = "string is not a list or dict".to_string();
            }
        }
    }

    /// Splice an edited embedded document back into its source span.
    /// The only engine mutation the host performs directly.
    pub fn update_embedded_string(
        &mut self,
        row: usize,
        col_start: usize,
        col_end: usize,
        new_content: &str,
    ) {
        self.save_undo();
        if let Some(line) = self.lines.get(row) {
            self.lines[row] = embedded::patch_line(line, col_start, col_end, new_content);
        }
    }
}

// -- Char-offset string helpers -------------------------------------------

pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}

pub(crate) fn char_at(s: &str, col: usize) -> Option<char> {
    s.chars().nth(col)
}

/// First `n` chars of `s`.
pub(crate) fn prefix_chars(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

/// Everything from char `n` onward.
pub(crate) fn suffix_chars(s: &str, n: usize) -> String {
    s.chars().skip(n).collect()
}

/// Replace the char range `[start, end)` with `insert`.
pub(crate) fn splice_chars(s: &str, start: usize, end: usize, insert: &str) -> String {
    let mut out: String = s.chars().take(start).collect();
    out.push_str(insert);
    out.extend(s.chars().skip(end));
    out
}

/// Count of leading whitespace chars, or 0 for a blank line.
pub(crate) fn indent_of(line: &str) -> usize {
    if line.trim().is_empty() {
        0
    } else {
        line.chars().take_while(|c| c.is_whitespace()).count()
    }
}

/// Column of the first non-whitespace char (line length if all blank).
pub(crate) fn first_non_ws(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splice_chars() {
        assert_eq!(splice_chars("abcd", 1, 3, "XY"), "aXYd");
        assert_eq!(splice_chars("abcd", 2, 2, "-"), "ab-cd");
        assert_eq!(splice_chars("你好世界", 1, 3, "x"), "你x界");
    }

    #[test]
    fn test_indent_of() {
        assert_eq!(indent_of("    x"), 4);
        assert_eq!(indent_of("x"), 0);
        assert_eq!(indent_of("   "), 0);
        assert_eq!(indent_of(""), 0);
    }

    #[test]
    fn test_new_jsonl_expands_records() {
        let editor = Editor::new("{\"a\":1}\n{\"b\":2}", false, true);
        assert!(editor.lines.iter().any(|l| l.is_empty()));
        assert_eq!(editor.lines[0], "{");
    }

    #[test]
    fn test_new_empty_buffer_has_one_line() {
        let editor = Editor::new("", false, false);
        assert_eq!(editor.lines, vec![String::new()]);
    }
}
