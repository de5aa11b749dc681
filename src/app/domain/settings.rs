use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::app::infrastructure::error::{AppError, Result};

/// Highlight colors used when no palette has been configured.
pub const DEFAULT_COLORS: [&str; 8] = [
    "#ffadadff",
    "#ffd6a5ff",
    "#fdffb6ff",
    "#caffbfff",
    "#9bf6ffff",
    "#a0c4ffff",
    "#bdb2ffff",
    "#ffc6ffff",
];

pub const DEFAULT_KEYWORD_PROPERTY: &str = "keywords";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginSettings {
    /// Front matter key holding a document's keyword list
    #[serde(default = "default_keyword_property_name")]
    pub keyword_property_name: String,

    /// Cyclic palette; keyword `i` gets `colors[i % colors.len()]`
    #[serde(default = "default_colors")]
    pub colors: Vec<String>,
}

fn default_keyword_property_name() -> String {
    DEFAULT_KEYWORD_PROPERTY.to_string()
}

fn default_colors() -> Vec<String> {
    DEFAULT_COLORS.iter().map(|c| c.to_string()).collect()
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            keyword_property_name: default_keyword_property_name(),
            colors: default_colors(),
        }
    }
}

impl PluginSettings {
    /// Merge a persisted record over the defaults. Anything unreadable falls
    /// back to defaults rather than failing plugin startup.
    pub fn from_stored(stored: Option<serde_json::Value>) -> Self {
        let settings = match stored {
            Some(value) => match serde_json::from_value::<PluginSettings>(value) {
                Ok(settings) => settings,
                Err(e) => {
                    warn!("Failed to parse stored settings: {}. Using defaults.", e);
                    Self::default()
                }
            },
            None => Self::default(),
        };
        settings.sanitize()
    }

    /// Replace invalid fields with their defaults.
    pub fn sanitize(mut self) -> Self {
        let property = self.keyword_property_name.trim();
        if property.is_empty() {
            warn!("Keyword property name is empty, falling back to \"{}\"", DEFAULT_KEYWORD_PROPERTY);
            self.keyword_property_name = default_keyword_property_name();
        } else if property.len() != self.keyword_property_name.len() {
            self.keyword_property_name = property.to_string();
        }

        self.colors = self
            .colors
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();
        if self.colors.is_empty() {
            warn!("Color palette is empty, falling back to the default palette");
            self.colors = default_colors();
        }
        self
    }

    /// Number of palette entries. Never zero after `sanitize`.
    pub fn palette_len(&self) -> usize {
        self.colors.len()
    }

    /// Colors joined the way the settings tab displays them.
    pub fn colors_text(&self) -> String {
        self.colors.join(", ")
    }

    pub fn to_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Parse the comma-separated color list typed into the settings tab.
///
/// Entries are trimmed and blanks dropped. An input with no colors at all is
/// rejected so the palette can never become empty.
pub fn parse_colors(input: &str) -> Result<Vec<String>> {
    let colors: Vec<String> = input
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect();

    if colors.is_empty() {
        return Err(AppError::Settings("color palette must not be empty".to_string()));
    }
    Ok(colors)
}
