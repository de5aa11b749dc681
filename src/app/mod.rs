//! Application layer - organized by Clean Architecture principles.
//!
//! # Structure
//!
//! - `domain/` - Core data structures (Document, ContentTree, Settings, Messages)
//! - `controllers/` - Orchestration (KeywordHighlightPlugin, MutationWatcher, settings tab)
//! - `services/` - Business operations (front matter, keywords, highlighting, rendering)
//! - `infrastructure/` - External integrations (host services, file host, error)

pub mod controllers;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-exports for convenient external access
pub use controllers::plugin::{ADD_FROM_EDITOR, ADD_FROM_PREVIEW, KeywordHighlightPlugin};
pub use controllers::watcher::{DEBOUNCE_DELAY, MutationWatcher, WatchState};
pub use domain::{ContentTree, Document, DocumentId, Message, NodeId, PluginSettings, SettingChange};
pub use infrastructure::error::{AppError, Result};
pub use infrastructure::file_host::FileHost;
pub use infrastructure::host::{ContextAction, HostServices, MenuContext, StyleHandle};
pub use services::highlighter::{HighlightStats, TextHighlighter};
pub use services::keywords::{AddOutcome, KeywordStore};
pub use services::palette::{ColorAssigner, build_stylesheet};
