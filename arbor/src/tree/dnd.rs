//! Drag and drop for the Tree.

use log::{debug, trace};

use crate::drag::{DragDropTarget, DragPayload, DropPosition, drop_allowed};
use crate::events::TreeEvent;
use crate::node::TreeItem;

use super::state::{Tree, TreeInner};

impl<T: TreeItem> TreeInner<T> {
    /// Whether the in-progress drag may land on `target`.
    fn can_drop_on(&self, target: &str) -> bool {
        let Some(dragged) = self.drag.dragged().and_then(|id| self.flat.get(id)) else {
            return false;
        };
        self.flat
            .get(target)
            .is_some_and(|target| drop_allowed(dragged, target))
    }
}

impl<T: TreeItem> Tree<T> {
    /// Start dragging row `id`.
    ///
    /// Returns the payload for the host, `None` when drag and drop is off or
    /// the row is unknown or disabled.
    pub fn drag_start(&self, id: &str) -> Option<DragPayload> {
        let payload = self
            .update(|g, _| {
                if !g.config.enable_drag_drop || !g.flat.is_enabled(id) {
                    return None;
                }
                let selection = if g.config.enable_multi_select
                    && g.selection.len() > 1
                    && g.selection.is_selected(id)
                {
                    g.selection.ordered(&g.flat)
                } else {
                    Vec::new()
                };
                let payload = DragPayload {
                    node_id: id.to_string(),
                    selection,
                };
                g.drag.payload = Some(payload.clone());
                g.drag.over = None;
                Some(payload)
            })
            .flatten();
        if let Some(payload) = &payload {
            debug!(
                "{}: drag started on '{}' ({} selected)",
                self.id(),
                payload.node_id,
                payload.selection.len()
            );
            self.mark_dirty();
        }
        payload
    }

    /// The id being dragged, if a drag is in progress.
    pub fn dragged_id(&self) -> Option<String> {
        self.read(|g| g.drag.dragged().map(str::to_string))
            .flatten()
    }

    /// The row and position the drop indicator should be painted at.
    pub fn drop_indicator(&self) -> Option<(String, DropPosition)> {
        self.read(|g| g.drag.over.clone()).flatten()
    }

    /// Whether the in-progress drag may land on `id`.
    pub fn can_drop_on(&self, id: &str) -> bool {
        self.read(|g| g.can_drop_on(id)).unwrap_or(false)
    }

    /// Pointer moved over row `id` at fraction `y` of its height.
    ///
    /// Returns the classified position, or `None` (and clears the indicator)
    /// when no drag is in progress or the row cannot take this drop.
    pub fn drag_over(&self, id: &str, y: f32) -> Option<DropPosition> {
        let (position, changed) = self.update(|g, _| {
            let position = if g.can_drop_on(id) {
                g.flat
                    .get(id)
                    .map(|target| DropPosition::classify(y, target.has_children))
            } else {
                None
            };
            let over = position.map(|p| (id.to_string(), p));
            let changed = g.drag.over != over;
            g.drag.over = over;
            (position, changed)
        })?;
        trace!("{}: drag over '{}' at {:.2} -> {:?}", self.id(), id, y, position);
        if changed {
            self.mark_dirty();
        }
        position
    }

    /// Pointer released over row `id` at fraction `y` of its height.
    ///
    /// Always ends the drag. Reports `(dragged, id, position)` through
    /// `on_drop` unless the drop is illegal: onto the dragged node itself,
    /// onto one of its descendants, or onto a disabled row.
    pub fn drop_on(&self, id: &str, y: f32) -> bool {
        let dropped = self
            .update(|g, events| {
                let allowed = g.config.enable_drag_drop && g.can_drop_on(id);
                let dragged = g.drag.dragged().map(str::to_string);
                let has_children = g.flat.get(id).is_some_and(|n| n.has_children);
                g.drag.reset();

                let dragged = dragged?;
                if !allowed {
                    debug!("Drop of '{}' onto '{}' rejected", dragged, id);
                    return None;
                }
                let position = DropPosition::classify(y, has_children);
                events.push(TreeEvent::Drop {
                    dragged_id: dragged,
                    target_id: id.to_string(),
                    position,
                });
                Some(())
            })
            .flatten()
            .is_some();
        self.mark_dirty();
        dropped
    }

    /// Abandon the in-progress drag (release over no valid target, Escape).
    pub fn cancel_drag(&self) {
        let was_dragging = self
            .update(|g, _| {
                let was = g.drag.is_dragging();
                g.drag.reset();
                was
            })
            .unwrap_or(false);
        if was_dragging {
            debug!("{}: drag cancelled", self.id());
            self.mark_dirty();
        }
    }
}

impl<T: TreeItem> DragDropTarget for Tree<T> {
    fn drag_payload(&self, id: &str) -> Option<DragPayload> {
        Tree::drag_start(self, id)
    }

    fn accepts_drop(&self, id: &str) -> bool {
        Tree::can_drop_on(self, id)
    }

    fn drag_over(&self, id: &str, y: f32) -> Option<DropPosition> {
        Tree::drag_over(self, id, y)
    }

    fn drop(&self, id: &str, y: f32) -> bool {
        Tree::drop_on(self, id, y)
    }

    fn cancel_drag(&self) {
        Tree::cancel_drag(self)
    }
}
