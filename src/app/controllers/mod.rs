//! Controllers layer - orchestration and coordination.
//!
//! This module contains controllers that coordinate between
//! domain models, services, and the host:
//! - Plugin lifecycle and event dispatch
//! - Debounced content watching
//! - Settings tab layout

pub mod plugin;
pub mod settings_tab;
pub mod watcher;
