//! Selection state.
//!
//! Selection is tracked by string id so it stays stable when the hierarchy
//! is re-supplied. Every mutator takes the current [`FlatTree`] and refuses
//! ids that are unknown or disabled, which keeps the selected set a subset
//! of the selectable nodes at all times.

use std::collections::HashSet;

use crate::flatten::FlatTree;

/// ID-based selection state with a range anchor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Currently selected IDs
    selected: HashSet<String>,
    /// Anchor for range selection (Shift+click starting point)
    anchor: Option<String>,
}

impl Selection {
    /// Create a new empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if an ID is selected.
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    /// Get the number of selected items.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Check if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Get the anchor ID for range selection.
    pub fn anchor(&self) -> Option<&str> {
        self.anchor.as_deref()
    }

    /// Selected IDs in flattened order.
    pub fn ordered(&self, flat: &FlatTree) -> Vec<String> {
        flat.ids()
            .filter(|id| self.selected.contains(*id))
            .map(str::to_string)
            .collect()
    }

    /// Replace the selection with `id` and make it the anchor.
    ///
    /// Returns whether the selected set changed.
    pub fn select_single(&mut self, id: &str, flat: &FlatTree) -> bool {
        if !flat.is_enabled(id) {
            return false;
        }
        let changed = self.selected.len() != 1 || !self.selected.contains(id);
        if changed {
            self.selected.clear();
            self.selected.insert(id.to_string());
        }
        self.anchor = Some(id.to_string());
        changed
    }

    /// Toggle selection of an ID (Ctrl+click behavior).
    ///
    /// The anchor moves to `id` in both directions.
    pub fn toggle(&mut self, id: &str, flat: &FlatTree) -> bool {
        if !flat.is_enabled(id) {
            return false;
        }
        if !self.selected.remove(id) {
            self.selected.insert(id.to_string());
        }
        self.anchor = Some(id.to_string());
        true
    }

    /// Select the contiguous flattened slice between `from` and `to`.
    ///
    /// Endpoint order does not matter. Disabled nodes inside the slice are
    /// skipped. If either endpoint is unknown or disabled nothing happens.
    /// The anchor moves to `to`.
    pub fn select_range(&mut self, from: &str, to: &str, flat: &FlatTree) -> bool {
        let Some(range) = Self::range_ids(from, to, flat) else {
            return false;
        };
        let changed = range != self.selected;
        self.selected = range;
        self.anchor = Some(to.to_string());
        changed
    }

    /// Like [`select_range`](Self::select_range) but keeps the existing
    /// selection outside the slice (Ctrl+Shift+click).
    pub fn extend_range(&mut self, from: &str, to: &str, flat: &FlatTree) -> bool {
        let Some(range) = Self::range_ids(from, to, flat) else {
            return false;
        };
        let mut changed = false;
        for id in range {
            changed |= self.selected.insert(id);
        }
        self.anchor = Some(to.to_string());
        changed
    }

    fn range_ids(from: &str, to: &str, flat: &FlatTree) -> Option<HashSet<String>> {
        if !flat.is_enabled(from) || !flat.is_enabled(to) {
            return None;
        }
        let a = flat.position(from)?;
        let b = flat.position(to)?;
        let (start, end) = if a <= b { (a, b) } else { (b, a) };
        Some(
            flat.nodes()[start..=end]
                .iter()
                .filter(|n| !n.disabled)
                .map(|n| n.id.clone())
                .collect(),
        )
    }

    /// Select every enabled node.
    pub fn select_all(&mut self, flat: &FlatTree) -> bool {
        let mut changed = false;
        for node in flat.nodes().iter().filter(|n| !n.disabled) {
            changed |= self.selected.insert(node.id.clone());
        }
        changed
    }

    /// Clear all selection and the anchor.
    pub fn clear(&mut self) -> bool {
        self.anchor = None;
        if self.selected.is_empty() {
            return false;
        }
        self.selected.clear();
        true
    }

    /// Drop ids that are no longer present or have become disabled.
    ///
    /// The anchor follows the same rule.
    pub fn retain(&mut self, flat: &FlatTree) -> bool {
        let before = self.selected.len();
        self.selected.retain(|id| flat.is_enabled(id));
        if self.anchor.as_deref().is_some_and(|a| !flat.is_enabled(a)) {
            self.anchor = None;
        }
        self.selected.len() != before
    }
}
