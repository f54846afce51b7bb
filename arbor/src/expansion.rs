//! Expand/collapse state.

use std::collections::HashSet;

use crate::flatten::FlatTree;

/// Set of expanded node ids.
///
/// Collapsing a node only removes its own id, so descendants keep their
/// bits and come back as they were when the node is expanded again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expansion {
    expanded: HashSet<String>,
}

impl Expansion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    pub fn ids(&self) -> &HashSet<String> {
        &self.expanded
    }

    /// Only enabled nodes with children carry expansion state.
    pub(crate) fn expandable(id: &str, flat: &FlatTree) -> bool {
        flat.get(id).is_some_and(|n| n.has_children && !n.disabled)
    }

    /// Set the expanded bit of `id`.
    ///
    /// Returns the new state if it changed, `None` for no-ops.
    pub fn set(&mut self, id: &str, expanded: bool, flat: &FlatTree) -> Option<bool> {
        if !Self::expandable(id, flat) {
            return None;
        }
        let changed = if expanded {
            self.expanded.insert(id.to_string())
        } else {
            self.expanded.remove(id)
        };
        changed.then_some(expanded)
    }

    /// Flip the expanded bit of `id`, returning the new state.
    pub fn toggle(&mut self, id: &str, flat: &FlatTree) -> Option<bool> {
        let target = !self.expanded.contains(id);
        self.set(id, target, flat)
    }

    /// Expand every expandable node, returning the ids that changed.
    pub fn expand_all(&mut self, flat: &FlatTree) -> Vec<String> {
        flat.nodes()
            .iter()
            .filter(|n| n.has_children && !n.disabled)
            .filter(|n| self.expanded.insert(n.id.clone()))
            .map(|n| n.id.clone())
            .collect()
    }

    /// Collapse everything, returning the ids that changed in flattened order.
    pub fn collapse_all(&mut self, flat: &FlatTree) -> Vec<String> {
        let changed: Vec<String> = flat
            .ids()
            .filter(|id| self.expanded.contains(*id))
            .map(str::to_string)
            .collect();
        self.expanded.clear();
        changed
    }

    /// Union `ids` into the set without contracting it.
    pub fn extend<'a>(&mut self, ids: impl IntoIterator<Item = &'a String>) {
        self.expanded.extend(ids.into_iter().cloned());
    }

    pub fn snapshot(&self) -> HashSet<String> {
        self.expanded.clone()
    }

    pub fn restore(&mut self, snapshot: HashSet<String>) {
        self.expanded = snapshot;
    }

    /// Drop ids that no longer name an expandable node.
    pub fn retain(&mut self, flat: &FlatTree) {
        self.expanded.retain(|id| Self::expandable(id, flat));
    }
}
