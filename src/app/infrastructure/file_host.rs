//! Host backed by Markdown files on disk.
//!
//! Notes are read from disk, front matter edits are written back atomically,
//! and the plugin's settings record lives in a JSON file under the user's
//! config directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_yaml::Mapping;
use tracing::{debug, info};

use crate::app::domain::content::ContentTree;
use crate::app::domain::document::{Document, DocumentId};
use crate::app::infrastructure::error::{AppError, Result};
use crate::app::infrastructure::host::{ContextAction, HostServices, StyleHandle};
use crate::app::services::front_matter;
use crate::app::services::render::render_reading_view;

pub struct FileHost {
    config_path: PathBuf,
    documents: Vec<Document>,
    active: Option<DocumentId>,
    view: Option<ContentTree>,
    actions: Vec<ContextAction>,
    styles: Vec<(StyleHandle, String)>,
    notices: Vec<String>,
    next_id: u64,
}

impl FileHost {
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            documents: Vec::new(),
            active: None,
            view: None,
            actions: Vec::new(),
            styles: Vec::new(),
            notices: Vec::new(),
            next_id: 1,
        }
    }

    /// Settings file location (cross-platform)
    pub fn default_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("keyword-highlight");
        path.push("data.json");
        path
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Open the note at `path`, render it and make it the active document.
    pub fn open(&mut self, path: &Path) -> Result<DocumentId> {
        let text = fs::read_to_string(path)?;
        let (front_matter, body) = front_matter::parse(&text)?;

        let id = DocumentId(self.next_id);
        self.next_id += 1;
        let doc = Document::new(id, path, front_matter, body);
        if !doc.is_markdown() {
            debug!("{} does not look like Markdown, rendering anyway", doc.display_name);
        }
        self.view = Some(render_reading_view(&doc.body));
        info!("Opened {}", doc.display_name);

        self.documents.push(doc);
        self.active = Some(id);
        Ok(id)
    }

    pub fn document(&self, id: DocumentId) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    /// Serialized HTML of the active reading view.
    pub fn view_html(&self) -> String {
        self.view
            .as_ref()
            .map(|tree| tree.to_html(tree.root()))
            .unwrap_or_default()
    }

    /// All injected stylesheets, in injection order.
    pub fn stylesheet(&self) -> String {
        self.styles.iter().map(|(_, css)| css.as_str()).collect()
    }

    pub fn actions(&self) -> &[ContextAction] {
        &self.actions
    }

    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    fn document_path(&self, doc: DocumentId) -> Result<PathBuf> {
        self.document(doc)
            .map(|d| d.path.clone())
            .ok_or_else(|| AppError::Host(format!("unknown document {:?}", doc)))
    }
}

/// Write `contents` next to `path` and rename it into place.
fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let mut tmp_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    fs::write(&tmp_path, contents)?;
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    Ok(())
}

impl HostServices for FileHost {
    fn active_document(&self) -> Option<DocumentId> {
        self.active
    }

    fn active_view_content(&mut self) -> Option<&mut ContentTree> {
        self.view.as_mut()
    }

    fn read_front_matter(&self, doc: DocumentId) -> Result<Mapping> {
        let text = fs::read_to_string(self.document_path(doc)?)?;
        let (front_matter, _) = front_matter::parse(&text)?;
        Ok(front_matter)
    }

    fn process_front_matter(
        &mut self,
        doc: DocumentId,
        update: &mut dyn FnMut(&mut Mapping),
    ) -> Result<()> {
        let path = self.document_path(doc)?;
        // Re-read so edits made since opening are kept
        let text = fs::read_to_string(&path)?;
        let (mut front_matter, body) = front_matter::parse(&text)?;
        update(&mut front_matter);
        write_atomic(&path, &front_matter::render(&front_matter, &body)?)?;
        debug!("Wrote front matter of {}", path.display());

        if let Some(document) = self.documents.iter_mut().find(|d| d.id == doc) {
            document.front_matter = front_matter;
            document.body = body;
        }
        Ok(())
    }

    fn load_data(&self) -> Result<Option<serde_json::Value>> {
        match fs::read_to_string(&self.config_path) {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save_data(&mut self, data: &serde_json::Value) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(data)?;
        fs::write(&self.config_path, json)?;
        Ok(())
    }

    fn show_notice(&mut self, message: &str) {
        info!("{}", message);
        self.notices.push(message.to_string());
    }

    fn register_context_action(&mut self, action: ContextAction) {
        self.actions.retain(|a| a.id != action.id);
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
