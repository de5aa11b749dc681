//! The services a note-taking host offers to the plugin.
//!
//! The plugin core only talks to the host through `HostServices`, so the same
//! code runs against the file-backed host used by the binary and the
//! in-memory fake used by unit tests.

use serde_yaml::Mapping;

use crate::app::domain::content::ContentTree;
use crate::app::domain::document::DocumentId;
use crate::app::infrastructure::error::Result;

/// Where a context action shows up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuContext {
    /// Right-click on a selection in the source editor.
    Editor,
    /// Right-click on a selection in the rendered preview.
    Preview,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextAction {
    pub id: &'static str,
    pub title: &'static str,
    pub icon: &'static str,
    pub context: MenuContext,
}

/// Handle for a stylesheet injected into the host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StyleHandle(pub u64);

pub trait HostServices {
    /// Document shown in the active view, if any.
    fn active_document(&self) -> Option<DocumentId>;

    /// Rendered tree of the active view, if any.
    fn active_view_content(&mut self) -> Option<&mut ContentTree>;

    /// Current front matter of `doc`.
    fn read_front_matter(&self, doc: DocumentId) -> Result<Mapping>;

    /// Transactional read-modify-write of `doc`'s front matter. The update
    /// sees the latest stored mapping and its result is written back before
    /// the call returns.
    fn process_front_matter(
        &mut self,
        doc: DocumentId,
        update: &mut dyn FnMut(&mut Mapping),
    ) -> Result<()>;

    /// Load the plugin's persisted settings record.
    fn load_data(&self) -> Result<Option<serde_json::Value>>;

    /// Persist the plugin's settings record.
    fn save_data(&mut self, data: &serde_json::Value) -> Result<()>;

    fn show_notice(&mut self, message: &str);

    fn register_context_action(&mut self, action: ContextAction);

    fn unregister_context_action(&mut self, id: &str);

    fn inject_style(&mut self, css: &str) -> StyleHandle;

    fn remove_style(&mut self, handle: StyleHandle);
}
