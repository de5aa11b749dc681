//! In-memory host for unit tests.

use std::collections::HashMap;

use serde_yaml::Mapping;

use crate::app::domain::content::{ContentTree, NodeId};
use crate::app::domain::document::DocumentId;
use crate::app::infrastructure::error::{AppError, Result};
use crate::app::infrastructure::host::{ContextAction, HostServices, StyleHandle};

pub struct FakeHost {
    pub documents: HashMap<DocumentId, Mapping>,
    pub active: Option<DocumentId>,
    pub view: Option<ContentTree>,
    pub stored_settings: Option<serde_json::Value>,
    pub saved_settings: Vec<serde_json::Value>,
    pub notices: Vec<String>,
    pub actions: Vec<ContextAction>,
    pub styles: Vec<(StyleHandle, String)>,
    pub front_matter_writes: usize,
    pub fail_writes: bool,
    next_id: u64,
}

impl FakeHost {
    pub fn new() -> Self {
        Self {
            documents: HashMap::new(),
            active: None,
            view: None,
            stored_settings: None,
            saved_settings: Vec::new(),
            notices: Vec::new(),
            actions: Vec::new(),
            styles: Vec::new(),
            front_matter_writes: 0,
            fail_writes: false,
            next_id: 1,
        }
    }

    /// Register a document with the given YAML front matter and make it
    /// active. The view is not rendered; see `render_paragraphs`.
    pub fn open_document(&mut self, yaml: &str) -> DocumentId {
        let id = DocumentId(self.next_id);
        self.next_id += 1;
        let mapping = if yaml.trim().is_empty() {
            Mapping::new()
        } else {
            serde_yaml::from_str(yaml).unwrap()
        };
        self.documents.insert(id, mapping);
        self.active = Some(id);
        id
    }

    /// Render a reading view shaped like the host's preview: a container
    /// with `.markdown-preview-view` and `.markdown-preview-section`, one
    /// `<p>` per paragraph. Returns the section node.
    pub fn render_paragraphs(&mut self, paragraphs: &[&str]) -> NodeId {
        let mut tree = ContentTree::new("div");
        let view = tree.create_element_with_classes("div", &["markdown-preview-view"]);
        let section = tree.create_element_with_classes("div", &["markdown-preview-section"]);
        tree.append_child(tree.root(), view);
        tree.append_child(view, section);
        for text in paragraphs {
            let p = tree.create_element("p");
            let t = tree.create_text(text);
            tree.append_child(section, p);
            tree.append_child(p, t);
        }
        tree.take_mutations();
        self.view = Some(tree);
        section
    }

    /// Simulate the host appending a paragraph to the rendered section.
    pub fn append_paragraph(&mut self, text: &str) {
        if let Some(tree) = self.view.as_mut() {
            if let Some(section) = tree.find_by_class(tree.root(), "markdown-preview-section") {
                let p = tree.create_element("p");
                let t = tree.create_text(text);
                tree.append_child(p, t);
                tree.append_child(section, p);
            }
        }
    }

    pub fn view_text(&self) -> String {
        self.view
            .as_ref()
            .map(|tree| tree.text_content(tree.root()))
            .unwrap_or_default()
    }

    pub fn span_count(&self) -> usize {
        self.view
            .as_ref()
            .map(|tree| tree.find_all_by_class(tree.root(), "keyword-highlight").len())
            .unwrap_or(0)
    }
}

impl HostServices for FakeHost {
    fn active_document(&self) -> Option<DocumentId> {
        self.active
    }

    fn active_view_content(&mut self) -> Option<&mut ContentTree> {
        self.view.as_mut()
    }

    fn read_front_matter(&self, doc: DocumentId) -> Result<Mapping> {
        self.documents
            .get(&doc)
            .cloned()
            .ok_or_else(|| AppError::Host(format!("unknown document {:?}", doc)))
    }

    fn process_front_matter(
        &mut self,
        doc: DocumentId,
        update: &mut dyn FnMut(&mut Mapping),
    ) -> Result<()> {
        let mut mapping = self.read_front_matter(doc)?;
        update(&mut mapping);
        if self.fail_writes {
            return Err(AppError::Host("write rejected".to_string()));
        }
        self.documents.insert(doc, mapping);
        self.front_matter_writes += 1;
        Ok(())
    }

    fn load_data(&self) -> Result<Option<serde_json::Value>> {
        Ok(self.stored_settings.clone())
    }

    fn save_data(&mut self, data: &serde_json::Value) -> Result<()> {
        self.stored_settings = Some(data.clone());
        self.saved_settings.push(data.clone());
        Ok(())
    }

    fn show_notice(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }

    fn register_context_action(&mut self, action: ContextAction) {
        self.actions.push(action);
    }

    fn unregister_context_action(&mut self, id: &str) {
        self.actions.retain(|a| a.id != id);
    }

    fn inject_style(&mut self, css: &str) -> StyleHandle {
        let handle = StyleHandle(self.next_id);
        self.next_id += 1;
        self.styles.push((handle, css.to_string()));
        handle
    }

    fn remove_style(&mut self, handle: StyleHandle) {
        self.styles.retain(|(h, _)| *h != handle);
    }
}
