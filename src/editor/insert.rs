//! Insert-mode dispatch
//!
//! Every mutating operation pushes an undo snapshot of the pre-mutation
//! state, so leaving insert mode after a burst of typing can be unwound
//! keystroke by keystroke.

use crossterm::event::{KeyCode, KeyModifiers};

use super::{char_len, first_non_ws, prefix_chars, splice_chars, suffix_chars, Editor, Mode};

fn matching_close(open: char) -> char {
    if open == '{' {
        '}'
    } else {
        ']'
    }
}

impl Editor {
    pub(super) fn handle_insert(&mut self, code: KeyCode, mods: KeyModifiers) {
        match code {
            KeyCode::Esc => {
                self.dot_stop();
                self.set_mode(Mode::Normal);
                self.cursor_col = self.cursor_col.saturating_sub(1);
                self.status.clear();
            }
            KeyCode::Backspace => {
                self.save_undo();
                if self.cursor_col > 0 {
                    let line = &self.lines[self.cursor_row];
                    self.lines[self.cursor_row] =
                        splice_chars(line, self.cursor_col - 1, self.cursor_col, "");
                    self.cursor_col -= 1;
                } else if self.cursor_row > 0 {
                    // Merge into the previous line at the old join point.
                    let current = self.lines.remove(self.cursor_row);
                    self.cursor_row -= 1;
                    self.cursor_col = char_len(&self.lines[self.cursor_row]);
                    self.lines[self.cursor_row].push_str(&current);
                }
            }
            KeyCode::Enter => self.insert_newline(),
            KeyCode::Tab => {
                self.save_undo();
                let line = &self.lines[self.cursor_row];
                self.lines[self.cursor_row] =
                    splice_chars(line, self.cursor_col, self.cursor_col, "    ");
                self.cursor_col += 4;
            }
            KeyCode::End => self.cursor_col = char_len(&self.lines[self.cursor_row]),
            KeyCode::Home => self.cursor_col = first_non_ws(&self.lines[self.cursor_row]),
            KeyCode::Left => self.cursor_col = self.cursor_col.saturating_sub(1),
            KeyCode::Right => self.cursor_col += 1,
            KeyCode::Up => self.cursor_row = self.cursor_row.saturating_sub(1),
            KeyCode::Down => self.cursor_row += 1,
            KeyCode::Char(c)
                if !mods.contains(KeyModifiers::CONTROL) && !mods.contains(KeyModifiers::ALT) =>
            {
                self.insert_char(c);
            }
            _ => {}
        }
    }

    fn insert_newline(&mut self) {
        self.save_undo();
        let line = self.lines[self.cursor_row].clone();
        let indent = super::indent_of(&line);
        let before = prefix_chars(&line, self.cursor_col).trim_end().to_string();
        let after = suffix_chars(&line, self.cursor_col).trim_start().to_string();

        let open = before.chars().last().filter(|&c| c == '{' || c == '[');

        // Opening a block with its close bracket right after the cursor:
        // put the cursor on a fresh indented line and snap the close
        // bracket to its own line at the original indentation.
        if let Some(open) = open {
            if after.starts_with(matching_close(open)) {
                let new_indent = " ".repeat(indent + 4);
                self.lines[self.cursor_row] = prefix_chars(&line, self.cursor_col);
                self.lines.insert(self.cursor_row + 1, new_indent.clone());
                self.lines
                    .insert(self.cursor_row + 2, format!("{}{after}", " ".repeat(indent)));
                self.cursor_row += 1;
                self.cursor_col = new_indent.len();
                return;
            }
        }

        let extra = if open.is_some() { "    " } else { "" };
        self.lines[self.cursor_row] = prefix_chars(&line, self.cursor_col);
        let new_line = format!(
            "{}{extra}{}",
            " ".repeat(indent),
            suffix_chars(&line, self.cursor_col)
        );
        self.cursor_row += 1;
        self.lines.insert(self.cursor_row, new_line);
        self.cursor_col = indent + extra.len();
    }

    fn insert_char(&mut self, c: char) {
        // A close bracket as the first non-blank char dedents its line.
        if c == '}' || c == ']' {
            let line = self.lines[self.cursor_row].clone();
            let before = prefix_chars(&line, self.cursor_col);
            if before.trim().is_empty() {
                self.save_undo();
                let new_indent = self.cursor_col.saturating_sub(4);
                self.lines[self.cursor_row] = format!(
                    "{}{c}{}",
                    " ".repeat(new_indent),
                    suffix_chars(&line, self.cursor_col)
                );
                self.cursor_col = new_indent + 1;
                return;
            }
        }
        if c.is_control() {
            return;
        }
        self.save_undo();
        let line = &self.lines[self.cursor_row];
        self.lines[self.cursor_row] =
            splice_chars(line, self.cursor_col, self.cursor_col, &c.to_string());
        self.cursor_col += 1;
    }
}
