//! Application shell
//!
//! Owns the main editing session plus the two overlay sessions (help and
//! embedded-JSON editing), routes key events to whichever has focus,
//! drains the engine's requests, and performs all file I/O on its behalf.

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::{DefaultTerminal, Frame};
use serde_json::Value;
use tracing::{debug, warn};

use crate::editor::Editor;
use crate::embedded::{patch_content, EmbeddedFrame, EmbeddedStack};
use crate::event::Request;
use crate::resources::HELP_JSON;
use crate::ui;

pub struct App {
    editor: Editor,
    help_editor: Editor,
    help_visible: bool,
    ej_editor: Editor,
    ej_stack: EmbeddedStack,
    file_path: Option<PathBuf>,
    notification: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(
        initial_content: &str,
        file_path: Option<PathBuf>,
        read_only: bool,
        jsonl: bool,
    ) -> Self {
        Self {
            editor: Editor::new(initial_content, read_only, jsonl),
            help_editor: Editor::new(HELP_JSON, true, false),
            help_visible: false,
            ej_editor: Editor::new("", false, false),
            ej_stack: EmbeddedStack::default(),
            file_path,
            notification: None,
            should_quit: false,
        }
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    pub fn embedded_editor(&self) -> &Editor {
        &self.ej_editor
    }

    pub fn embedded_depth(&self) -> usize {
        self.ej_stack.depth()
    }

    pub fn help_visible(&self) -> bool {
        self.help_visible
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn notification(&self) -> Option<&str> {
        self.notification.as_deref()
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;
            if let Event::Key(key) = event::read()? {
                self.handle_key(key);
            }
        }
        Ok(())
    }

    /// Route a key to the focused session and act on what it requests.
    /// Focus priority: embedded overlay, then help, then the main buffer.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if !self.ej_stack.is_empty() {
            self.ej_editor.handle_key(key);
            for request in self.ej_editor.take_requests() {
                self.handle_embedded_request(request);
            }
        } else if self.help_visible {
            self.help_editor.handle_key(key);
            for request in self.help_editor.take_requests() {
                self.handle_help_request(request);
            }
        } else {
            self.editor.handle_key(key);
            for request in self.editor.take_requests() {
                self.handle_main_request(request);
            }
        }
    }

    fn notify(&mut self, message: impl Into<String>) {
        self.notification = Some(message.into());
    }

    fn handle_main_request(&mut self, request: Request) {
        match request {
            Request::Save {
                content,
                path,
                quit_after,
            } => self.save_file(content, path, quit_after),
            Request::Open { path } => self.open_file(&path),
            Request::Quit | Request::ForceQuit => self.should_quit = true,
            Request::Validated { valid, error } => {
                if valid {
                    let label = if self.editor.jsonl { "JSONL" } else { "JSON" };
                    self.notify(format!("{label} is valid"));
                } else {
                    self.notify(format!(
                        "Invalid JSON: {}",
                        error.unwrap_or_default()
                    ));
                }
            }
            Request::HelpToggle => self.help_visible = !self.help_visible,
            Request::EmbeddedEdit {
                content,
                row,
                col_start,
                col_end,
            } => {
                self.ej_stack.push(EmbeddedFrame {
                    row,
                    col_start,
                    col_end,
                    saved_content: String::new(),
                });
                self.ej_editor = Editor::new(&content, false, false);
            }
        }
    }

    fn handle_help_request(&mut self, request: Request) {
        match request {
            Request::Quit | Request::ForceQuit => self.help_visible = false,
            Request::HelpToggle => self.help_visible = !self.help_visible,
            Request::Validated { .. } => {}
            // The help session is read-only; nothing else can arise.
            _ => {}
        }
    }

    fn handle_embedded_request(&mut self, request: Request) {
        match request {
            Request::Save { content, .. } => self.save_embedded(content),
            Request::Quit => {
                // Pop one level, restoring the parent's content.
                if let Some(frame) = self.ej_stack.pop() {
                    if !self.ej_stack.is_empty() {
                        self.ej_editor = Editor::new(&frame.saved_content, false, false);
                    }
                }
            }
            Request::ForceQuit => {
                while self.ej_stack.pop().is_some() {}
            }
            Request::EmbeddedEdit {
                content,
                row,
                col_start,
                col_end,
            } => {
                // Nested level: remember this level's content for the way
                // back up.
                let saved_content = self.ej_editor.content();
                self.ej_stack.push(EmbeddedFrame {
                    row,
                    col_start,
                    col_end,
                    saved_content,
                });
                self.ej_editor = Editor::new(&content, false, false);
            }
            Request::Validated { valid, error } => {
                if valid {
                    self.notify("JSON is valid");
                } else {
                    self.notify(format!("Invalid JSON: {}", error.unwrap_or_default()));
                }
            }
            Request::Open { .. } | Request::HelpToggle => {}
        }
    }

    /// Save from the embedded overlay: minify the edited document and
    /// splice it into the level below (the main buffer at depth one).
    fn save_embedded(&mut self, content: String) {
        let Some(frame) = self.ej_stack.pop() else {
            return;
        };
        let minified = match serde_json::from_str::<Value>(&content) {
            Ok(value) => value.to_string(),
            Err(_) => {
                self.notify("Invalid JSON");
                self.ej_stack.push(frame);
                return;
            }
        };
        if self.ej_stack.is_empty() {
            self.editor.update_embedded_string(
                frame.row,
                frame.col_start,
                frame.col_end,
                &minified,
            );
        } else {
            let patched = patch_content(
                &frame.saved_content,
                frame.row,
                frame.col_start,
                frame.col_end,
                &minified,
            );
            self.ej_editor = Editor::new(&patched, false, false);
        }
        self.notify("Embedded JSON updated");
    }

    fn save_file(&mut self, content: String, path: Option<String>, quit_after: bool) {
        let target = path.map(PathBuf::from).or_else(|| self.file_path.clone());
        let Some(target) = target else {
            self.notify("No file name, use :w <file>");
            return;
        };
        let result = target
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or(Ok(()), fs::create_dir_all)
            .and_then(|()| fs::write(&target, &content));
        match result {
            Ok(()) => {
                debug!(path = %target.display(), bytes = content.len(), "saved");
                self.notify(format!("Saved: {}", target.display()));
                self.file_path = Some(target);
                if quit_after {
                    self.should_quit = true;
                }
            }
            Err(e) => {
                warn!(path = %target.display(), error = %e, "save failed");
                self.notify(format!("Save failed: {e}"));
            }
        }
    }

    fn open_file(&mut self, path: &str) {
        match fs::read_to_string(path) {
            Ok(content) => {
                let jsonl = path.to_lowercase().ends_with(".jsonl");
                self.editor.jsonl = jsonl;
                self.editor.set_content(&content);
                self.file_path = Some(PathBuf::from(path));
                self.notify(format!("Opened: {path}"));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                self.notify(format!("File not found: {path}"));
            }
            Err(e) => {
                self.notify(format!("Cannot open: {e}"));
            }
        }
    }

    // -- Rendering --------------------------------------------------------

    fn draw(&mut self, frame: &mut Frame) {
        let [header_area, body] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(frame.area());
        self.draw_header(frame, header_area);

        if !self.ej_stack.is_empty() {
            let [main_area, title_area, panel] = Layout::vertical([
                Constraint::Percentage(50),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .areas(body);
            ui::render_editor(frame, main_area, &mut self.editor);
            let title = if self.ej_stack.depth() > 1 {
                format!(" Edit Embedded JSON (level {}) ", self.ej_stack.depth())
            } else {
                " Edit Embedded JSON ".to_string()
            };
            frame.render_widget(
                Paragraph::new(Line::styled(
                    title,
                    Style::new().fg(Color::Black).bg(Color::Yellow),
                )),
                title_area,
            );
            ui::render_editor(frame, panel, &mut self.ej_editor);
        } else if self.help_visible {
            let [main_area, title_area, panel] = Layout::vertical([
                Constraint::Percentage(60),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .areas(body);
            ui::render_editor(frame, main_area, &mut self.editor);
            frame.render_widget(
                Paragraph::new(Line::styled(
                    " Help ",
                    Style::new().fg(Color::Black).bg(Color::Cyan),
                )),
                title_area,
            );
            ui::render_editor(frame, panel, &mut self.help_editor);
        } else {
            ui::render_editor(frame, body, &mut self.editor);
        }
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let subtitle = match &self.file_path {
            Some(path) => path.display().to_string(),
            None => "[new]".to_string(),
        };
        let ro = if self.editor.read_only { " [RO]" } else { "" };
        let mut spans = vec![
            Span::styled(" jive ", Style::new().add_modifier(Modifier::BOLD)),
            Span::raw(format!(" {subtitle}{ro}")),
        ];
        if let Some(note) = &self.notification {
            spans.push(Span::styled(
                format!("  {note}"),
                Style::new().fg(Color::Yellow),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}
