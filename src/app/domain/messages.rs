/// Events the host delivers to the plugin.
/// The host's event loop turns its own signals into these and hands them to
/// `KeywordHighlightPlugin::handle`.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // Workspace
    FileOpen,
    LayoutChange,

    // Rendered content
    ContentChanged,
    Tick,

    // Context menus
    ContextAction { id: String, selection: String },

    // Settings tab
    SettingChanged(SettingChange),
}

/// An edit made in the settings tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingChange {
    KeywordPropertyName(String),
    /// Raw comma-separated text from the colors field.
    Colors(String),
}
