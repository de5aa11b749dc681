//! Domain layer - core data structures and types.
//!
//! This module contains the fundamental domain models:
//! - Document and DocumentId
//! - The rendered content tree
//! - Plugin settings
//! - Message types for the event system

pub mod content;
pub mod document;
pub mod messages;
pub mod settings;

pub use content::{ContentTree, MutationRecord, NodeId, NodeKind, TreeId};
pub use document::{Document, DocumentId};
pub use messages::{Message, SettingChange};
pub use settings::PluginSettings;
