//! jive: a modal JSON/JSONL terminal editor with a structure-aware diff
//!
//! The engine layers are usable as a library: [`editor`] owns the modal
//! session, [`diff`] compares two documents, [`primitives`] holds the
//! width-aware layout math. The terminal host lives in [`app`] and [`ui`].

pub mod app;
pub mod diff;
pub mod editor;
pub mod embedded;
pub mod event;
pub mod json;
pub mod logging;
pub mod primitives;
pub mod resources;
pub mod ui;
