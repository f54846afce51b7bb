//! Callback events emitted by a tree.
//!
//! Operations collect [`TreeEvent`]s while the tree state is locked; the
//! tree dispatches them to the registered callbacks once the lock is
//! released, in the order they were produced.

use std::sync::Arc;

use serde::Serialize;

use crate::drag::DropPosition;

/// A change the caller is told about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum TreeEvent {
    /// The selection set changed. Ids are in flattened order.
    Select { ids: Vec<String> },
    /// A node was expanded or collapsed by a gesture.
    #[serde(rename_all = "camelCase")]
    Expand { id: String, expanded: bool },
    /// A legal drop completed.
    #[serde(rename_all = "camelCase")]
    Drop {
        dragged_id: String,
        target_id: String,
        position: DropPosition,
    },
    /// The search query changed.
    Search { query: String },
}

/// Result of handling an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Event was ignored, try other handlers.
    Ignored,
    /// Event was consumed, stop propagation.
    Consumed,
}

impl EventResult {
    /// Check if the event was handled.
    pub fn is_handled(&self) -> bool {
        matches!(self, EventResult::Consumed)
    }
}

pub type SelectCallback = Arc<dyn Fn(&[String]) + Send + Sync>;
pub type ExpandCallback = Arc<dyn Fn(&str, bool) + Send + Sync>;
pub type DropCallback = Arc<dyn Fn(&str, &str, DropPosition) + Send + Sync>;
pub type SearchCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Callbacks registered on a tree. Each is optional.
#[derive(Clone, Default)]
pub struct TreeCallbacks {
    pub on_select: Option<SelectCallback>,
    pub on_expand: Option<ExpandCallback>,
    pub on_drop: Option<DropCallback>,
    pub on_search: Option<SearchCallback>,
}

impl TreeCallbacks {
    /// Invoke the callback matching `event`, if registered.
    pub fn dispatch(&self, event: &TreeEvent) {
        match event {
            TreeEvent::Select { ids } => {
                if let Some(cb) = &self.on_select {
                    cb(ids);
                }
            }
            TreeEvent::Expand { id, expanded } => {
                if let Some(cb) = &self.on_expand {
                    cb(id, *expanded);
                }
            }
            TreeEvent::Drop {
                dragged_id,
                target_id,
                position,
            } => {
                if let Some(cb) = &self.on_drop {
                    cb(dragged_id, target_id, *position);
                }
            }
            TreeEvent::Search { query } => {
                if let Some(cb) = &self.on_search {
                    cb(query);
                }
            }
        }
    }
}

impl std::fmt::Debug for TreeCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeCallbacks")
            .field("on_select", &self.on_select.is_some())
            .field("on_expand", &self.on_expand.is_some())
            .field("on_drop", &self.on_drop.is_some())
            .field("on_search", &self.on_search.is_some())
            .finish()
    }
}
