use crate::app::domain::settings::PluginSettings;

pub const SETTINGS_TITLE: &str = "Keyword Highlight Plugin Settings";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    TextArea,
}

/// One row of the settings tab, as the host should draw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingField {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub placeholder: &'static str,
    pub kind: FieldKind,
    pub value: String,
}

/// Fields of the settings tab filled with the current values.
pub fn settings_fields(settings: &PluginSettings) -> Vec<SettingField> {
    vec![
        SettingField {
            key: "keywordPropertyName",
            name: "Keyword Property Name",
            description: "The name of the YAML property that contains the keywords.",
            placeholder: "Enter property name",
            kind: FieldKind::Text,
            value: settings.keyword_property_name.clone(),
        },
        SettingField {
            key: "colors",
            name: "Highlight Colors",
            description: "Comma-separated list of colors to use for highlighting keywords.",
            placeholder: "Enter colors",
            kind: FieldKind::TextArea,
            value: settings.colors_text(),
        },
    ]
}
