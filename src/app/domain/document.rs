use std::path::{Path, PathBuf};

use serde_yaml::Mapping;

use crate::app::services::text_ops::extract_filename;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(pub u64);

/// A note as seen by the file-backed host: its front matter and its Markdown body.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: DocumentId,
    pub path: PathBuf,
    pub display_name: String,
    pub front_matter: Mapping,
    pub body: String,
}

impl Document {
    pub fn new(id: DocumentId, path: &Path, front_matter: Mapping, body: String) -> Self {
        Self {
            id,
            path: path.to_path_buf(),
            display_name: extract_filename(&path.to_string_lossy()),
            front_matter,
            body,
        }
    }

    pub fn is_markdown(&self) -> bool {
        let lower = self.path.to_string_lossy().to_lowercase();
        lower.ends_with(".md") || lower.ends_with(".markdown") || lower.ends_with(".mdown")
    }
}
