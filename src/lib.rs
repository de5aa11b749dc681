//! Highlight a note's front matter keywords wherever they appear in its
//! rendered view.

pub mod app;

pub use app::*;
