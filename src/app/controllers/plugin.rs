use std::time::Instant;

use tracing::{debug, info, warn};

use super::settings_tab::{SettingField, settings_fields};
use super::watcher::{MutationWatcher, WatchState};
use crate::app::domain::content::{ContentTree, NodeId};
use crate::app::domain::messages::{Message, SettingChange};
use crate::app::domain::settings::{PluginSettings, parse_colors};
use crate::app::infrastructure::error::{AppError, Result};
use crate::app::infrastructure::host::{ContextAction, HostServices, MenuContext, StyleHandle};
use crate::app::services::highlighter::{HighlightStats, TextHighlighter};
use crate::app::services::keywords::{AddOutcome, KeywordStore};
use crate::app::services::palette::{ColorAssigner, build_stylesheet};
use crate::app::services::render::{PREVIEW_SECTION_CLASS, PREVIEW_VIEW_CLASS};
use crate::app::services::text_ops::selection_to_keyword;

pub const ADD_FROM_EDITOR: &str = "keyword-highlight:add-from-editor";
pub const ADD_FROM_PREVIEW: &str = "keyword-highlight:add-from-preview";

fn context_actions() -> [ContextAction; 2] {
    [
        ContextAction {
            id: ADD_FROM_EDITOR,
            title: "Add to Keywords",
            icon: "star",
            context: MenuContext::Editor,
        },
        ContextAction {
            id: ADD_FROM_PREVIEW,
            title: "Add to Keywords",
            icon: "star",
            context: MenuContext::Preview,
        },
    ]
}

/// The rendered section of a reading view, if `tree` is one.
pub fn find_content_root(tree: &ContentTree) -> Option<NodeId> {
    let view = tree.find_by_class(tree.root(), PREVIEW_VIEW_CLASS)?;
    tree.find_by_class(view, PREVIEW_SECTION_CLASS)
}

/// Keyword highlight plugin: owns its settings, stylesheet and watcher,
/// and reaches everything else through the host.
pub struct KeywordHighlightPlugin<H: HostServices> {
    host: H,
    settings: PluginSettings,
    watcher: MutationWatcher,
    style: Option<StyleHandle>,
    active: bool,
    passes: u64,
}

impl<H: HostServices> KeywordHighlightPlugin<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            settings: PluginSettings::default(),
            watcher: MutationWatcher::default(),
            style: None,
            active: false,
            passes: 0,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn settings(&self) -> &PluginSettings {
        &self.settings
    }

    pub fn settings_fields(&self) -> Vec<SettingField> {
        settings_fields(&self.settings)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn watch_state(&self) -> WatchState {
        self.watcher.state()
    }

    /// Number of highlight passes run since creation.
    pub fn pass_count(&self) -> u64 {
        self.passes
    }

    // --- Lifecycle ---

    pub fn activate(&mut self) {
        if self.active {
            return;
        }
        info!("Loading keyword highlight plugin");

        let stored = match self.host.load_data() {
            Ok(stored) => stored,
            Err(e) => {
                warn!("Failed to load settings: {}. Using defaults.", e);
                None
            }
        };
        self.settings = PluginSettings::from_stored(stored);

        self.refresh_styles();
        for action in context_actions() {
            self.host.register_context_action(action);
        }
        self.active = true;
    }

    /// Undo everything `activate` set up. Safe to call more than once.
    pub fn deactivate(&mut self) {
        if !self.active {
            return;
        }
        info!("Unloading keyword highlight plugin");
        self.watcher.stop();
        if let Some(handle) = self.style.take() {
            self.host.remove_style(handle);
        }
        for action in context_actions() {
            self.host.unregister_context_action(action.id);
        }
        self.active = false;
    }

    // --- Event dispatch ---

    /// Handle one host event. Events arriving while inactive are dropped.
    pub fn handle(&mut self, message: Message, now: Instant) -> Result<()> {
        if !self.active {
            debug!("Plugin inactive, dropping {:?}", message);
            return Ok(());
        }
        match message {
            Message::FileOpen => {
                self.highlight_active_view();
            }
            Message::LayoutChange => self.observe_active_view(),
            Message::ContentChanged => self.collect_mutations(now),
            Message::Tick => self.tick(now),
            Message::ContextAction { id, selection } => {
                self.on_context_action(&id, &selection)?;
            }
            Message::SettingChanged(change) => self.apply_setting(change)?,
        }
        Ok(())
    }

    /// (Re)attach the watcher to the active view's rendered section.
    pub fn observe_active_view(&mut self) {
        let Some(tree) = self.host.active_view_content() else {
            self.watcher.stop();
            return;
        };
        match find_content_root(tree) {
            Some(root) => self.watcher.start(tree, root),
            None => self.watcher.stop(),
        }
    }

    fn collect_mutations(&mut self, now: Instant) {
        if self.watcher.state() == WatchState::Idle {
            return;
        }
        if let Some(tree) = self.host.active_view_content() {
            self.watcher.observe(tree, now);
        }
    }

    /// Advance the debounce timer to `now`, running the pending pass if due.
    pub fn tick(&mut self, now: Instant) {
        self.collect_mutations(now);
        if self.watcher.poll(now) {
            debug!("Debounce elapsed, re-highlighting");
            self.highlight_active_view();
        }
    }

    /// Run one highlight pass over the active view. Without an active
    /// document or reading view this is a no-op.
    pub fn highlight_active_view(&mut self) -> Option<HighlightStats> {
        let doc = self.host.active_document()?;
        let keywords = KeywordStore::new(&self.settings.keyword_property_name).load(&self.host, Some(doc));
        let highlighter = TextHighlighter::new(&keywords, ColorAssigner::new(self.settings.palette_len()));

        let tree = self.host.active_view_content()?;
        let root = find_content_root(tree)?;
        let stats = highlighter.apply(tree, root);
        // Our own rewrites must not schedule another pass
        tree.take_mutations();

        self.passes += 1;
        debug!(
            "Highlight pass {}: {} keyword(s), {} node(s) rewritten, {} span(s)",
            self.passes,
            keywords.len(),
            stats.nodes_rewritten,
            stats.spans_created
        );
        Some(stats)
    }

    // --- Keywords ---

    /// Add `selection` to the active document's keywords and re-highlight.
    pub fn add_keyword(&mut self, selection: &str) -> Result<AddOutcome> {
        let Some(keyword) = selection_to_keyword(selection) else {
            return Ok(AddOutcome::Skipped);
        };
        let doc = self.host.active_document();
        let outcome =
            KeywordStore::new(&self.settings.keyword_property_name).add(&mut self.host, doc, keyword)?;
        if outcome != AddOutcome::Skipped {
            self.highlight_active_view();
        }
        Ok(outcome)
    }

    fn on_context_action(&mut self, id: &str, selection: &str) -> Result<AddOutcome> {
        match id {
            ADD_FROM_EDITOR => self.add_keyword(selection),
            ADD_FROM_PREVIEW if !selection.is_empty() => self.add_keyword(selection),
            _ => Ok(AddOutcome::Skipped),
        }
    }

    // --- Settings ---

    pub fn apply_setting(&mut self, change: SettingChange) -> Result<()> {
        match change {
            SettingChange::KeywordPropertyName(value) => self.set_keyword_property_name(&value),
            SettingChange::Colors(value) => self.set_colors(&value),
        }
    }

    pub fn set_keyword_property_name(&mut self, value: &str) -> Result<()> {
        let value = value.trim();
        if value.is_empty() {
            return Err(AppError::Settings("keyword property name must not be empty".to_string()));
        }
        self.settings.keyword_property_name = value.to_string();
        self.save_settings()
    }

    /// Replace the palette from the comma-separated colors field. The
    /// stylesheet is regenerated before this returns.
    pub fn set_colors(&mut self, value: &str) -> Result<()> {
        self.settings.colors = parse_colors(value)?;
        self.refresh_styles();
        self.save_settings()
    }

    fn save_settings(&mut self) -> Result<()> {
        let data = self.settings.to_value()?;
        self.host.save_data(&data)
    }

    fn refresh_styles(&mut self) {
        if let Some(handle) = self.style.take() {
            self.host.remove_style(handle);
        }
        let css = build_stylesheet(&self.settings.colors);
        self.style = Some(self.host.inject_style(&css));
    }
}
