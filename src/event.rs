//! Requests from the editor engine to its host
//!
//! The engine never touches the filesystem or the terminal. Anything
//! needing the outside world is queued as a [`Request`] on the session
//! and drained by the host after each key.

/// A side effect the host should perform on the engine's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Write `content` to `path` (or the session's current file when
    /// `None`), then quit if `quit_after`.
    Save {
        content: String,
        path: Option<String>,
        quit_after: bool,
    },
    /// Load a file into the session.
    Open { path: String },
    /// Close the session (or the innermost overlay).
    Quit,
    /// Close the whole application, discarding unsaved changes.
    ForceQuit,
    /// Outcome of a validation pass, for host-level notification.
    Validated {
        valid: bool,
        error: Option<String>,
    },
    /// Show or hide the help overlay.
    HelpToggle,
    /// Open a sub-editor on an embedded JSON document found at
    /// `(row, col_start..col_end)` of the current buffer.
    EmbeddedEdit {
        content: String,
        row: usize,
        col_start: usize,
        col_end: usize,
    },
}
