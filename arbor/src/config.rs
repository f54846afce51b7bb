//! Tree configuration.

use serde::{Deserialize, Serialize};

/// Per-tree configuration.
///
/// Every field has a default, so partial JSON documents deserialize. Field
/// names are camelCase on the wire (`enableMultiSelect`, `defaultExpandedIds`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TreeConfig {
    /// Allow Ctrl/Cmd+click toggling and Shift+click ranges. When off,
    /// every selection gesture degrades to single selection.
    pub enable_multi_select: bool,

    /// Allow rows to be dragged and dropped.
    pub enable_drag_drop: bool,

    /// Selecting a parent also toggles its expansion.
    pub expand_on_select: bool,

    /// Show the search input and accept queries.
    pub searchable: bool,

    /// Placeholder text for the search input. Cosmetic only.
    pub search_placeholder: String,

    /// Nodes expanded when the tree is created.
    pub default_expanded_ids: Vec<String>,

    /// Nodes selected when the tree is created.
    pub default_selected_ids: Vec<String>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            enable_multi_select: true,
            enable_drag_drop: true,
            expand_on_select: false,
            searchable: false,
            search_placeholder: "Search...".to_string(),
            default_expanded_ids: Vec::new(),
            default_selected_ids: Vec::new(),
        }
    }
}

impl TreeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable multi-selection.
    pub fn multi_select(mut self, enabled: bool) -> Self {
        self.enable_multi_select = enabled;
        self
    }

    /// Enable or disable drag and drop.
    pub fn drag_drop(mut self, enabled: bool) -> Self {
        self.enable_drag_drop = enabled;
        self
    }

    /// Toggle expansion when a parent is selected.
    pub fn expand_on_select(mut self, enabled: bool) -> Self {
        self.expand_on_select = enabled;
        self
    }

    /// Make the tree searchable.
    pub fn searchable(mut self, enabled: bool) -> Self {
        self.searchable = enabled;
        self
    }

    /// Set the search input placeholder.
    pub fn search_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.search_placeholder = placeholder.into();
        self
    }

    /// Set the initially expanded ids.
    pub fn expanded<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_expanded_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Set the initially selected ids.
    pub fn selected<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_selected_ids = ids.into_iter().map(Into::into).collect();
        self
    }
}
