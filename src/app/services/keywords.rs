//! Keyword lists stored in a document's front matter.

use serde_yaml::{Mapping, Value};
use tracing::{debug, warn};

use crate::app::domain::document::DocumentId;
use crate::app::infrastructure::error::Result;
use crate::app::infrastructure::host::HostServices;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
    /// No document or nothing to add; nothing was written.
    Skipped,
}

/// Reads and writes the keyword list under one front matter property.
#[derive(Debug, Clone, Copy)]
pub struct KeywordStore<'a> {
    property: &'a str,
}

impl<'a> KeywordStore<'a> {
    pub fn new(property: &'a str) -> Self {
        Self { property }
    }

    /// Keywords stored in `front_matter`, first occurrence wins.
    ///
    /// A single scalar is treated as a one-item list. Nested values inside
    /// the list are skipped; any other shape yields an empty list.
    pub fn keywords_from(&self, front_matter: &Mapping) -> Vec<String> {
        let raw: Vec<String> = match front_matter.get(self.property) {
            Some(Value::Sequence(items)) => items.iter().filter_map(scalar_to_string).collect(),
            Some(value) => scalar_to_string(value).into_iter().collect(),
            None => Vec::new(),
        };

        let mut keywords: Vec<String> = Vec::with_capacity(raw.len());
        for keyword in raw {
            if !keyword.is_empty() && !keywords.contains(&keyword) {
                keywords.push(keyword);
            }
        }
        keywords
    }

    /// Append `keyword` to the list in `front_matter` unless already present.
    ///
    /// Returns true when the mapping changed.
    pub fn insert_into(&self, front_matter: &mut Mapping, keyword: &str) -> bool {
        let key = Value::String(self.property.to_string());
        if !matches!(front_matter.get(&key), Some(Value::Sequence(_))) {
            // A lone scalar becomes the first list entry
            let first = front_matter
                .get(&key)
                .and_then(scalar_to_string)
                .map(Value::String);
            front_matter.insert(key.clone(), Value::Sequence(first.into_iter().collect()));
        }
        let Some(Value::Sequence(items)) = front_matter.get_mut(&key) else {
            return false;
        };

        if items.iter().any(|v| v.as_str() == Some(keyword)) {
            return false;
        }
        items.push(Value::String(keyword.to_string()));
        true
    }

    /// Load the keyword list of `doc`. Missing documents, missing properties
    /// and unreadable front matter all give an empty list.
    pub fn load<H: HostServices + ?Sized>(&self, host: &H, doc: Option<DocumentId>) -> Vec<String> {
        let Some(doc) = doc else {
            return Vec::new();
        };
        match host.read_front_matter(doc) {
            Ok(front_matter) => self.keywords_from(&front_matter),
            Err(e) => {
                warn!("Failed to read front matter of {:?}: {}", doc, e);
                Vec::new()
            }
        }
    }

    /// Add `keyword` to `doc` in one transactional front matter update and
    /// confirm with a notice once the write succeeded.
    pub fn add<H: HostServices + ?Sized>(
        &self,
        host: &mut H,
        doc: Option<DocumentId>,
        keyword: &str,
    ) -> Result<AddOutcome> {
        let Some(doc) = doc else {
            debug!("No active document, ignoring keyword \"{}\"", keyword);
            return Ok(AddOutcome::Skipped);
        };
        if keyword.trim().is_empty() {
            return Ok(AddOutcome::Skipped);
        }

        let mut changed = false;
        host.process_front_matter(doc, &mut |front_matter| {
            changed = self.insert_into(front_matter, keyword);
        })?;

        host.show_notice(&format!("Keyword \"{}\" added", keyword));
        if changed {
            debug!("Added keyword \"{}\" to {:?}", keyword, doc);
            Ok(AddOutcome::Added)
        } else {
            Ok(AddOutcome::AlreadyPresent)
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
