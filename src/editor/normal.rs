//! Normal-mode dispatch and the pending two-key commands

use crossterm::event::{KeyCode, KeyModifiers};

use super::{char_len, indent_of, prefix_chars, splice_chars, suffix_chars, Editor, Mode};

impl Editor {
    pub(super) fn handle_normal(&mut self, code: KeyCode, mods: KeyModifiers) {
        if self.pending.is_some() {
            self.handle_pending(code, mods);
            return;
        }

        if mods.contains(KeyModifiers::CONTROL) {
            match code {
                KeyCode::Char('f') => self.cursor_row += self.viewport_rows(),
                KeyCode::Char('b') => {
                    self.cursor_row = self.cursor_row.saturating_sub(self.viewport_rows());
                }
                KeyCode::Char('d') => self.cursor_row += self.viewport_rows() / 2,
                KeyCode::Char('u') => {
                    self.cursor_row = self.cursor_row.saturating_sub(self.viewport_rows() / 2);
                }
                KeyCode::Char('e') => {
                    self.scroll_top = (self.scroll_top + 1).min(self.lines.len() - 1);
                }
                KeyCode::Char('y') => self.scroll_top = self.scroll_top.saturating_sub(1),
                KeyCode::Char('g') => {
                    let total = self.lines.len();
                    let pct = (self.cursor_row + 1) * 100 / total;
                    self.status = format!(
                        "\"{}\" line {} of {} --{}%--",
                        self.mode().name(),
                        self.cursor_row + 1,
                        total,
                        pct
                    );
                }
                KeyCode::Char('r') => {
                    if self.read_only {
                        self.status = "[readonly]".to_string();
                    } else {
                        self.redo();
                    }
                }
                _ => {}
            }
            return;
        }

        match code {
            // movement
            KeyCode::Char('h') | KeyCode::Left => {
                self.cursor_col = self.cursor_col.saturating_sub(1);
            }
            KeyCode::Char('j') | KeyCode::Down => self.cursor_row += 1,
            KeyCode::Char('k') | KeyCode::Up => {
                self.cursor_row = self.cursor_row.saturating_sub(1);
            }
            KeyCode::Char('l') | KeyCode::Right => self.cursor_col += 1,
            KeyCode::Char('w') => self.move_word_forward(),
            KeyCode::Char('b') => self.move_word_backward(),
            KeyCode::Char('0') => self.cursor_col = 0,
            KeyCode::Char('$') | KeyCode::End => {
                self.cursor_col = char_len(&self.lines[self.cursor_row]).saturating_sub(1);
            }
            KeyCode::Char('^') | KeyCode::Home => {
                self.cursor_col = super::first_non_ws(&self.lines[self.cursor_row]);
            }
            KeyCode::Char('G') => self.cursor_row = self.lines.len() - 1,
            KeyCode::Char('%') => self.jump_matching_bracket(),
            KeyCode::PageDown => self.cursor_row += self.viewport_rows(),
            KeyCode::PageUp => {
                self.cursor_row = self.cursor_row.saturating_sub(self.viewport_rows());
            }

            // enter insert mode
            KeyCode::Char('i') => {
                if !self.read_only {
                    self.dot_start(code, mods);
                }
                self.enter_insert();
            }
            KeyCode::Char('I') => {
                if !self.read_only {
                    self.dot_start(code, mods);
                }
                self.cursor_col = super::first_non_ws(&self.lines[self.cursor_row]);
                self.enter_insert();
            }
            KeyCode::Char('a') => {
                if !self.read_only {
                    self.dot_start(code, mods);
                }
                self.cursor_col += 1;
                self.enter_insert();
            }
            KeyCode::Char('A') => {
                if !self.read_only {
                    self.dot_start(code, mods);
                }
                self.cursor_col = char_len(&self.lines[self.cursor_row]);
                self.enter_insert();
            }
            KeyCode::Char('o') => {
                if self.read_only {
                    self.status = "[readonly]".to_string();
                } else {
                    self.dot_start(code, mods);
                    self.save_undo();
                    let indent = indent_of(&self.lines[self.cursor_row]);
                    let before = self.lines[self.cursor_row].trim_end();
                    let extra = if before.ends_with('{') || before.ends_with('[') {
                        "    "
                    } else {
                        ""
                    };
                    self.cursor_row += 1;
                    self.lines
                        .insert(self.cursor_row, format!("{}{extra}", " ".repeat(indent)));
                    self.cursor_col = indent + extra.len();
                    self.enter_insert();
                }
            }
            KeyCode::Char('O') => {
                if self.read_only {
                    self.status = "[readonly]".to_string();
                } else {
                    self.dot_start(code, mods);
                    self.save_undo();
                    let indent = indent_of(&self.lines[self.cursor_row]);
                    self.lines.insert(self.cursor_row, " ".repeat(indent));
                    self.cursor_col = indent;
                    self.enter_insert();
                }
            }

            // single-shot edits
            KeyCode::Char('x') => {
                if self.read_only {
                    self.status = "[readonly]".to_string();
                } else {
                    self.dot_start(code, mods);
                    self.dot_stop();
                    self.save_undo();
                    let line = &self.lines[self.cursor_row];
                    if self.cursor_col < char_len(line) {
                        self.lines[self.cursor_row] =
                            splice_chars(line, self.cursor_col, self.cursor_col + 1, "");
                    }
                }
            }
            KeyCode::Char('p') => {
                if self.read_only {
                    self.status = "[readonly]".to_string();
                } else {
                    self.dot_start(code, mods);
                    self.dot_stop();
                    self.paste_after();
                }
            }
            KeyCode::Char('P') => {
                if self.read_only {
                    self.status = "[readonly]".to_string();
                } else {
                    self.dot_start(code, mods);
                    self.dot_stop();
                    self.paste_before();
                }
            }
            KeyCode::Char('u') => {
                if self.read_only {
                    self.status = "[readonly]".to_string();
                } else {
                    self.undo();
                }
            }
            KeyCode::Char('J') => {
                if self.read_only {
                    self.status = "[readonly]".to_string();
                } else {
                    self.dot_start(code, mods);
                    self.dot_stop();
                    self.join_lines();
                }
            }

            // dot repeat
            KeyCode::Char('.') => {
                if !self.read_only {
                    self.dot_replay();
                }
            }

            // two-key prefixes
            KeyCode::Char(c @ ('d' | 'c' | 'y' | 'r' | 'g' | 'e')) => {
                let mutating = !matches!(c, 'y' | 'g' | 'e');
                if self.read_only && mutating {
                    self.status = "[readonly]".to_string();
                } else {
                    if mutating {
                        self.dot_start(code, mods);
                    }
                    self.pending = Some(c);
                }
            }

            // command mode
            KeyCode::Char(':') => {
                self.set_mode(Mode::Command);
                self.command_buffer.clear();
                self.status.clear();
            }

            _ => {}
        }
    }

    fn handle_pending(&mut self, code: KeyCode, mods: KeyModifiers) {
        let second = match code {
            KeyCode::Char(c) if !mods.contains(KeyModifiers::CONTROL) => Some(c),
            _ => None,
        };
        let prefix = self.pending.take().unwrap_or_default();
        let Some(second) = second else {
            self.status.clear();
            self.dot_stop();
            return;
        };

        if self.read_only
            && !matches!((prefix, second), ('y', 'y') | ('g', 'g') | ('e', 'j'))
        {
            self.status = "[readonly]".to_string();
            return;
        }

        match (prefix, second) {
            ('d', 'd') => {
                self.save_undo();
                self.yank_buffer = vec![self.lines[self.cursor_row].clone()];
                if self.lines.len() > 1 {
                    self.lines.remove(self.cursor_row);
                    if self.cursor_row >= self.lines.len() {
                        self.cursor_row = self.lines.len() - 1;
                    }
                } else {
                    // The buffer never shrinks below one line.
                    self.lines[0].clear();
                }
                self.cursor_col = 0;
                self.status = "line deleted".to_string();
                self.dot_stop();
            }
            ('d', 'w') => {
                self.save_undo();
                self.delete_word();
                self.dot_stop();
            }
            ('d', '$') => {
                self.save_undo();
                let line = &self.lines[self.cursor_row];
                self.lines[self.cursor_row] = prefix_chars(line, self.cursor_col);
                self.dot_stop();
            }
            ('d', '0') => {
                self.save_undo();
                let line = &self.lines[self.cursor_row];
                self.lines[self.cursor_row] = suffix_chars(line, self.cursor_col);
                self.cursor_col = 0;
                self.dot_stop();
            }
            ('c', 'w') => {
                self.save_undo();
                self.delete_word();
                // Recording continues through the insert session.
                self.enter_insert();
            }
            ('c', 'c') => {
                self.save_undo();
                let indent = indent_of(&self.lines[self.cursor_row]);
                self.yank_buffer = vec![self.lines[self.cursor_row].clone()];
                self.lines[self.cursor_row] = " ".repeat(indent);
                self.cursor_col = indent;
                self.enter_insert();
            }
            ('y', 'y') => {
                self.yank_buffer = vec![self.lines[self.cursor_row].clone()];
                self.status = "line yanked".to_string();
            }
            ('g', 'g') => {
                self.cursor_row = 0;
                self.cursor_col = 0;
            }
            ('r', c) => {
                self.save_undo();
                let line = &self.lines[self.cursor_row];
                if self.cursor_col < char_len(line) {
                    self.lines[self.cursor_row] =
                        splice_chars(line, self.cursor_col, self.cursor_col + 1, &c.to_string());
                }
                self.dot_stop();
            }
            ('e', 'j') => self.request_embedded_edit(),
            _ => {
                self.dot_stop();
                self.status = format!("unknown: {prefix}{second}");
            }
        }
    }

    // -- Edit helpers -----------------------------------------------------

    pub(super) fn delete_word(&mut self) {
        let chars: Vec<char> = self.lines[self.cursor_row].chars().collect();
        let start = self.cursor_col;
        let mut col = start;
        while col < chars.len() && (chars[col].is_alphanumeric() || chars[col] == '_') {
            col += 1;
        }
        while col < chars.len() && chars[col] == ' ' {
            col += 1;
        }
        // Not on a word char: consume at least one char.
        if col == start && col < chars.len() {
            col += 1;
        }
        self.lines[self.cursor_row] = splice_chars(&self.lines[self.cursor_row], start, col, "");
    }

    fn paste_after(&mut self) {
        if self.yank_buffer.is_empty() {
            return;
        }
        self.save_undo();
        let yanked = self.yank_buffer.clone();
        for (i, line) in yanked.into_iter().enumerate() {
            self.lines.insert(self.cursor_row + 1 + i, line);
        }
        self.cursor_row += 1;
        self.cursor_col = 0;
    }

    fn paste_before(&mut self) {
        if self.yank_buffer.is_empty() {
            return;
        }
        self.save_undo();
        let yanked = self.yank_buffer.clone();
        for (i, line) in yanked.into_iter().enumerate() {
            self.lines.insert(self.cursor_row + i, line);
        }
        self.cursor_col = 0;
    }

    fn join_lines(&mut self) {
        if self.cursor_row >= self.lines.len() - 1 {
            return;
        }
        self.save_undo();
        let current = self.lines[self.cursor_row].trim_end().to_string();
        let next = self.lines[self.cursor_row + 1].trim_start().to_string();
        self.cursor_col = char_len(&current);
        self.lines[self.cursor_row] = format!("{current} {next}");
        self.lines.remove(self.cursor_row + 1);
    }
}
