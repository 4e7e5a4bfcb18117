//! Cursor motions: word hops and matching-bracket jumps

use super::{char_len, first_non_ws, Editor};

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl Editor {
    pub(super) fn move_word_forward(&mut self) {
        let chars: Vec<char> = self.lines[self.cursor_row].chars().collect();
        let mut col = self.cursor_col;
        while col < chars.len() && is_word(chars[col]) {
            col += 1;
        }
        while col < chars.len() && !is_word(chars[col]) {
            col += 1;
        }
        if col >= chars.len() && self.cursor_row < self.lines.len() - 1 {
            self.cursor_row += 1;
            self.cursor_col = first_non_ws(&self.lines[self.cursor_row]);
        } else {
            self.cursor_col = col.min(chars.len().saturating_sub(1));
        }
    }

    pub(super) fn move_word_backward(&mut self) {
        let chars: Vec<char> = self.lines[self.cursor_row].chars().collect();
        let mut col = self.cursor_col;
        if col == 0 {
            if self.cursor_row > 0 {
                self.cursor_row -= 1;
                self.cursor_col = char_len(&self.lines[self.cursor_row]).saturating_sub(1);
            }
            return;
        }
        col -= 1;
        while col > 0 && !is_word(chars[col]) {
            col -= 1;
        }
        while col > 0 && is_word(chars[col - 1]) {
            col -= 1;
        }
        self.cursor_col = col;
    }

    pub(super) fn jump_matching_bracket(&mut self) {
        let Some(ch) = super::char_at(&self.lines[self.cursor_row], self.cursor_col) else {
            return;
        };
        match ch {
            '{' => self.search_bracket_forward('{', '}'),
            '[' => self.search_bracket_forward('[', ']'),
            '(' => self.search_bracket_forward('(', ')'),
            '}' => self.search_bracket_backward('}', '{'),
            ']' => self.search_bracket_backward(']', '['),
            ')' => self.search_bracket_backward(')', '('),
            _ => {}
        }
    }

    fn search_bracket_forward(&mut self, open: char, close: char) {
        let mut depth = 1;
        let mut row = self.cursor_row;
        let mut col = self.cursor_col + 1;
        while row < self.lines.len() {
            for (i, ch) in self.lines[row].chars().enumerate().skip(col) {
                if ch == open {
                    depth += 1;
                } else if ch == close {
                    depth -= 1;
                    if depth == 0 {
                        self.cursor_row = row;
                        self.cursor_col = i;
                        return;
                    }
                }
            }
            row += 1;
            col = 0;
        }
    }

    fn search_bracket_backward(&mut self, close: char, open: char) {
        let mut depth = 1;
        let mut row = self.cursor_row;
        let mut chars: Vec<char> = self.lines[row].chars().collect();
        let mut col = self.cursor_col as isize - 1;
        loop {
            while col >= 0 {
                let ch = chars[col as usize];
                if ch == close {
                    depth += 1;
                } else if ch == open {
                    depth -= 1;
                    if depth == 0 {
                        self.cursor_row = row;
                        self.cursor_col = col as usize;
                        return;
                    }
                }
                col -= 1;
            }
            if row == 0 {
                return;
            }
            row -= 1;
            chars = self.lines[row].chars().collect();
            col = chars.len() as isize - 1;
        }
    }
}
