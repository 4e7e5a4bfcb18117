//! Command-mode dispatch and colon-command execution

use crossterm::event::{KeyCode, KeyModifiers};
use tracing::debug;

use crate::event::Request;
use crate::json;

use super::{Editor, Mode};

impl Editor {
    pub(super) fn handle_command(&mut self, code: KeyCode, mods: KeyModifiers) {
        match code {
            KeyCode::Esc => {
                self.set_mode(Mode::Normal);
                self.command_buffer.clear();
                self.status.clear();
            }
            KeyCode::Enter => {
                let cmd = self.command_buffer.trim().to_string();
                self.exec_command(&cmd);
                if self.mode() == Mode::Command {
                    self.set_mode(Mode::Normal);
                }
                self.command_buffer.clear();
            }
            KeyCode::Backspace => {
                if self.command_buffer.is_empty() {
                    self.set_mode(Mode::Normal);
                } else {
                    self.command_buffer.pop();
                }
            }
            KeyCode::Char(c) if !mods.contains(KeyModifiers::CONTROL) => {
                self.command_buffer.push(c);
            }
            _ => {}
        }
    }

    fn exec_command(&mut self, cmd: &str) {
        if cmd.is_empty() {
            return;
        }
        debug!(cmd, "executing command");

        if cmd == "$" {
            self.cursor_row = self.lines.len() - 1;
            self.cursor_col = 0;
            return;
        }

        // :l<n> always jumps to a buffer line; a bare :<n> or :p<n> jumps
        // to the n-th record in JSONL mode, a buffer line otherwise.
        if let Some(rest) = cmd.strip_prefix('l') {
            if !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()) {
                if let Ok(num) = rest.parse::<usize>() {
                    self.jump_to_line(num);
                }
                return;
            }
        }
        let bare_number = !cmd.is_empty() && cmd.chars().all(|c| c.is_ascii_digit());
        let p_number = cmd
            .strip_prefix('p')
            .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()));
        if bare_number || p_number {
            let digits = if bare_number { cmd } else { &cmd[1..] };
            if let Ok(num) = digits.parse::<usize>() {
                if self.jsonl {
                    self.jump_to_record(num);
                } else {
                    self.jump_to_line(num);
                }
            }
            return;
        }

        let (mut verb, arg) = match cmd.split_once(char::is_whitespace) {
            Some((v, a)) => (v, a.trim()),
            None => (cmd, ""),
        };
        let force = verb.ends_with('!');
        if force {
            verb = &verb[..verb.len() - 1];
        }

        match verb {
            "w" => self.request_save(arg, force, false),
            "q" => {
                if force {
                    self.push_request(Request::ForceQuit);
                } else {
                    self.push_request(Request::Quit);
                }
            }
            "wq" | "x" => {
                if self.read_only {
                    // Nothing to write, just leave.
                    self.push_request(Request::Quit);
                } else {
                    self.request_save(arg, force, true);
                }
            }
            "e" => {
                if arg.is_empty() {
                    self.status = "Usage: :e <file>".to_string();
                } else {
                    self.push_request(Request::Open {
                        path: arg.to_string(),
                    });
                }
            }
            "fmt" | "format" => {
                if self.read_only {
                    self.status = "[readonly]".to_string();
                } else {
                    self.format_buffer();
                }
            }
            "help" => self.push_request(Request::HelpToggle),
            _ => self.status = format!("unknown command: :{cmd}"),
        }
    }

    fn jump_to_line(&mut self, num: usize) {
        self.cursor_row = num.saturating_sub(1).min(self.lines.len() - 1);
        self.cursor_col = 0;
    }

    fn jump_to_record(&mut self, num: usize) {
        let records = json::record_numbers(&self.lines);
        if let Some(row) = records.iter().position(|&r| r == num) {
            self.cursor_row = row;
            self.cursor_col = 0;
        } else {
            self.status = format!("record {num} not found");
        }
    }

    fn request_save(&mut self, arg: &str, force: bool, quit_after: bool) {
        if self.read_only {
            self.status = "[readonly]".to_string();
            return;
        }
        let content = self.content();
        if !force {
            if let Err(err) = if self.jsonl {
                json::check_jsonl(&content)
            } else {
                json::check_json(&content)
            } {
                self.status = err.clone();
                self.push_request(Request::Validated {
                    valid: false,
                    error: Some(err),
                });
                return;
            }
        }
        let save = if self.jsonl {
            json::pretty_to_jsonl(&content)
        } else {
            content
        };
        self.push_request(Request::Save {
            content: save,
            path: if arg.is_empty() {
                None
            } else {
                Some(arg.to_string())
            },
            quit_after,
        });
    }
}
