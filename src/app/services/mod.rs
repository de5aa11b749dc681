//! Services layer - business operations and utilities.
//!
//! This module contains business logic and operations:
//! - Front matter parsing and keyword storage
//! - Color assignment and stylesheet generation
//! - Keyword matching and highlighting
//! - Markdown rendering
//! - Text operations

pub mod front_matter;
pub mod highlighter;
pub mod keywords;
pub mod palette;
pub mod render;
pub mod text_ops;
