//! Drag and drop: drop-position classification and legality rules.

use serde::{Deserialize, Serialize};

use crate::flatten::FlatNode;

/// Where a dragged node would land relative to the hovered node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropPosition {
    Before,
    After,
    Inside,
}

impl DropPosition {
    /// Classify a pointer at fraction `y` (0.0 top, 1.0 bottom) of the
    /// hovered row's height.
    ///
    /// Rows with children split into quarters: top quarter `Before`, bottom
    /// quarter `After`, the middle half `Inside`. Leaf rows split at the
    /// midpoint into `Before` and `After`.
    pub fn classify(y: f32, has_children: bool) -> Self {
        if has_children {
            if y < 0.25 {
                Self::Before
            } else if y > 0.75 {
                Self::After
            } else {
                Self::Inside
            }
        } else if y < 0.5 {
            Self::Before
        } else {
            Self::After
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::After => "after",
            Self::Inside => "inside",
        }
    }
}

impl std::fmt::Display for DropPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a host drag facility attaches to a dragged row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DragPayload {
    /// The row the pointer grabbed.
    pub node_id: String,
    /// Ordered selection when the grabbed row is part of a multi-selection,
    /// for the host to indicate visually. Drops still report `node_id` only.
    pub selection: Vec<String>,
}

/// In-progress drag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DragState {
    pub payload: Option<DragPayload>,
    /// Hovered row and the position computed for it.
    pub over: Option<(String, DropPosition)>,
}

impl DragState {
    pub fn dragged(&self) -> Option<&str> {
        self.payload.as_ref().map(|p| p.node_id.as_str())
    }

    pub fn is_dragging(&self) -> bool {
        self.payload.is_some()
    }

    /// Return to the pre-drag state.
    pub fn reset(&mut self) {
        self.payload = None;
        self.over = None;
    }
}

/// Whether `dragged` may be dropped onto `target`.
///
/// Rejects dropping a node onto itself, onto any of its descendants (the
/// target's path contains the dragged id), and onto disabled targets.
pub fn drop_allowed(dragged: &FlatNode, target: &FlatNode) -> bool {
    !target.disabled && !dragged.disabled && !target.path.iter().any(|id| *id == dragged.id)
}

/// Capability surface a host drag-and-drop facility drives.
///
/// The host marks rows draggable with [`drag_payload`](Self::drag_payload),
/// marks drop targets with [`accepts_drop`](Self::accepts_drop), and reports
/// pointer movement and release. Nothing here mutates the hierarchy.
pub trait DragDropTarget {
    /// Payload for a row the user started dragging, `None` if it cannot be
    /// dragged. Starts the drag.
    fn drag_payload(&self, id: &str) -> Option<DragPayload>;

    /// Whether the in-progress drag may land on `id` at all.
    fn accepts_drop(&self, id: &str) -> bool;

    /// Report the pointer over row `id` at fraction `y` of its height.
    /// Returns the drop indicator to paint, if any.
    fn drag_over(&self, id: &str, y: f32) -> Option<DropPosition>;

    /// Report a release over row `id`. Returns whether a drop was reported.
    fn drop(&self, id: &str, y: f32) -> bool;

    /// Report a release over no valid target.
    fn cancel_drag(&self);
}
