//! Low-level layout primitives
//!
//! Display-width measurement and the wrapping/scrolling math shared by
//! the renderer and the editor's cursor handling.

pub mod display_width;
pub mod wrap;
