//! Tree state handle.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use log::{debug, warn};

use crate::config::TreeConfig;
use crate::drag::{DragState, DropPosition};
use crate::error::TreeError;
use crate::events::{TreeCallbacks, TreeEvent};
use crate::expansion::Expansion;
use crate::flatten::{FlatNode, FlatTree, resolve, visible_nodes};
use crate::focus::{FocusDirection, MatchFocus};
use crate::node::{self, TreeItem, TreeNode};
use crate::search::SearchState;
use crate::selection::Selection;

/// Unique identifier for a Tree instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TreeId(usize);

impl TreeId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for TreeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tree#{}", self.0)
    }
}

/// Internal state for a Tree.
#[derive(Debug)]
pub(super) struct TreeInner<T: TreeItem> {
    /// Caller-supplied hierarchy, never mutated in place.
    pub roots: Vec<T>,
    /// Pre-order projection of `roots`.
    pub flat: FlatTree,
    pub config: TreeConfig,
    pub selection: Selection,
    pub expansion: Expansion,
    pub search: SearchState,
    /// Focus over search matches.
    pub focus: MatchFocus,
    /// Row with keyboard focus.
    pub cursor: Option<String>,
    pub drag: DragState,
}

impl<T: TreeItem> TreeInner<T> {
    fn new(roots: Vec<T>) -> Self {
        let flat = FlatTree::build(&roots);
        Self {
            roots,
            flat,
            config: TreeConfig::default(),
            selection: Selection::new(),
            expansion: Expansion::new(),
            search: SearchState::new(),
            focus: MatchFocus::new(),
            cursor: None,
            drag: DragState::default(),
        }
    }

    fn multi(&self) -> bool {
        self.config.enable_multi_select
    }

    fn push_selection(&self, events: &mut Vec<TreeEvent>) {
        events.push(TreeEvent::Select {
            ids: self.selection.ordered(&self.flat),
        });
    }

    /// Reset expansion and selection from the configured defaults.
    pub fn apply_config(&mut self, config: TreeConfig) {
        self.expansion = Expansion::new();
        for id in &config.default_expanded_ids {
            if self.expansion.set(id, true, &self.flat).is_none() && !self.expansion.is_expanded(id)
            {
                warn!("Ignoring default expanded id '{}': not an expandable node", id);
            }
        }

        let mut wanted: Vec<(usize, &str)> = Vec::new();
        for id in &config.default_selected_ids {
            match self.flat.position(id) {
                Some(pos) if self.flat.is_enabled(id) => wanted.push((pos, id)),
                _ => warn!("Ignoring default selected id '{}': not a selectable node", id),
            }
        }
        wanted.sort_unstable();
        wanted.dedup();
        if !config.enable_multi_select && wanted.len() > 1 {
            warn!(
                "Multi-select disabled, keeping only '{}' of {} default selected ids",
                wanted[0].1,
                wanted.len()
            );
            wanted.truncate(1);
        }

        self.selection = Selection::new();
        for (_, id) in wanted {
            self.selection.toggle(id, &self.flat);
        }

        self.search = SearchState::new();
        self.focus.clear();
        self.drag.reset();
        self.config = config;
    }

    /// Swap in a new hierarchy and prune state that no longer applies.
    pub fn set_items(&mut self, roots: Vec<T>, events: &mut Vec<TreeEvent>) {
        self.roots = roots;
        self.flat = FlatTree::build(&self.roots);

        if self.selection.retain(&self.flat) {
            self.push_selection(events);
        }
        self.expansion.retain(&self.flat);
        self.search.retain_snapshot(&self.flat);
        if self.search.is_active() {
            let query = self.search.query().to_string();
            self.search.apply(&query, &self.flat, &mut self.expansion);
        }
        self.sync_focus();

        if self
            .cursor
            .as_deref()
            .is_some_and(|c| !self.flat.contains(c))
        {
            self.cursor = None;
        }
        if self
            .drag
            .dragged()
            .is_some_and(|d| !self.flat.is_enabled(d))
        {
            debug!("Dragged node left the hierarchy, drag abandoned");
            self.drag.reset();
        }
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    pub fn select_single(&mut self, id: &str, events: &mut Vec<TreeEvent>) -> bool {
        let changed = self.selection.select_single(id, &self.flat);
        if changed {
            self.push_selection(events);
        }
        changed
    }

    pub fn toggle_select(&mut self, id: &str, events: &mut Vec<TreeEvent>) -> bool {
        if !self.multi() {
            return self.select_single(id, events);
        }
        let changed = self.selection.toggle(id, &self.flat);
        if changed {
            self.push_selection(events);
        }
        changed
    }

    pub fn select_range(
        &mut self,
        from: &str,
        to: &str,
        extend: bool,
        events: &mut Vec<TreeEvent>,
    ) -> bool {
        if !self.multi() {
            return self.select_single(to, events);
        }
        let changed = if extend {
            self.selection.extend_range(from, to, &self.flat)
        } else {
            self.selection.select_range(from, to, &self.flat)
        };
        if changed {
            self.push_selection(events);
        }
        changed
    }

    pub fn select_all(&mut self, events: &mut Vec<TreeEvent>) -> bool {
        if !self.multi() {
            return false;
        }
        let changed = self.selection.select_all(&self.flat);
        if changed {
            self.push_selection(events);
        }
        changed
    }

    pub fn clear_selection(&mut self, events: &mut Vec<TreeEvent>) -> bool {
        let changed = self.selection.clear();
        if changed {
            self.push_selection(events);
        }
        changed
    }

    // -------------------------------------------------------------------------
    // Expansion
    // -------------------------------------------------------------------------

    pub fn set_expanded(
        &mut self,
        id: &str,
        expanded: bool,
        events: &mut Vec<TreeEvent>,
    ) -> Option<bool> {
        let result = self.expansion.set(id, expanded, &self.flat);
        if let Some(expanded) = result {
            events.push(TreeEvent::Expand {
                id: id.to_string(),
                expanded,
            });
        }
        result
    }

    pub fn toggle_expanded(&mut self, id: &str, events: &mut Vec<TreeEvent>) -> Option<bool> {
        let target = !self.expansion.is_expanded(id);
        self.set_expanded(id, target, events)
    }

    // -------------------------------------------------------------------------
    // Search
    // -------------------------------------------------------------------------

    pub fn set_query(&mut self, query: &str, events: &mut Vec<TreeEvent>) -> bool {
        if !self.config.searchable {
            debug!("Ignoring query '{}': tree is not searchable", query);
            return false;
        }
        events.push(TreeEvent::Search {
            query: query.to_string(),
        });
        self.search.apply(query, &self.flat, &mut self.expansion);
        self.sync_focus();
        true
    }

    fn focus_candidates(&self) -> Vec<String> {
        self.search.focusable_matches(&self.flat)
    }

    fn sync_focus(&mut self) {
        if self.search.is_active() {
            let candidates = self.focus_candidates();
            self.focus.sync(&candidates);
        } else {
            self.focus.clear();
        }
    }

    pub fn move_focus(&mut self, direction: FocusDirection) -> Option<String> {
        if !self.search.is_active() {
            return None;
        }
        let candidates = self.focus_candidates();
        self.focus
            .move_focus(direction, &candidates)
            .map(str::to_string)
    }

    // -------------------------------------------------------------------------
    // Rows
    // -------------------------------------------------------------------------

    /// Rows to paint: the filtered view while searching, limited to nodes
    /// whose ancestors are all expanded.
    pub fn visible(&self) -> Vec<&FlatNode> {
        let rows = self
            .flat
            .nodes()
            .iter()
            .filter(|n| !self.search.is_active() || self.search.keeps(&n.id));
        visible_nodes(rows, self.expansion.ids())
    }

    fn move_cursor(
        &mut self,
        pick: impl FnOnce(&[&FlatNode], Option<usize>) -> Option<usize>,
    ) -> Option<String> {
        let visible = self.visible();
        let current = self
            .cursor
            .as_ref()
            .and_then(|c| visible.iter().position(|n| &n.id == c));
        let next = pick(&visible, current)?;
        let id = visible.get(next)?.id.clone();
        if self.cursor.as_deref() == Some(id.as_str()) {
            return None;
        }
        self.cursor = Some(id.clone());
        Some(id)
    }
}

/// One tree/explorer engine instance.
///
/// `Tree<T>` manages hierarchical data with:
/// - A flattened, indexed projection rebuilt on every hierarchy change
/// - Single, toggle and range selection
/// - Expand/collapse state that survives collapsing ancestors
/// - Inline search with ancestor-preserving filtering and match focus
/// - Drop-position classification with cycle rejection
///
/// Cloning yields another handle to the same instance. Callbacks run
/// synchronously after the state lock is released, so they may read the
/// tree.
pub struct Tree<T: TreeItem> {
    /// Unique identifier.
    id: TreeId,
    /// Internal state.
    pub(super) inner: Arc<RwLock<TreeInner<T>>>,
    /// Registered callbacks.
    callbacks: Arc<TreeCallbacks>,
    /// Dirty flag for re-render.
    pub(super) dirty: Arc<AtomicBool>,
}

impl<T: TreeItem> Tree<T> {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    /// Create a tree over `roots` without validating ids.
    ///
    /// With duplicate ids the first node in pre-order answers lookups.
    pub fn with_items(roots: Vec<T>) -> Self {
        Self {
            id: TreeId::new(),
            inner: Arc::new(RwLock::new(TreeInner::new(roots))),
            callbacks: Arc::new(TreeCallbacks::default()),
            dirty: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Create a tree over `roots`, rejecting empty or duplicate ids.
    pub fn try_with_items(roots: Vec<T>) -> Result<Self, TreeError> {
        node::validate(&roots)?;
        Ok(Self::with_items(roots))
    }

    /// Apply a configuration, resetting expansion and selection to its
    /// defaults.
    pub fn with_config(self, config: TreeConfig) -> Self {
        if let Ok(mut guard) = self.inner.write() {
            guard.apply_config(config);
        }
        self.dirty.store(true, Ordering::SeqCst);
        self
    }

    /// Called with the ordered selected ids whenever the selection changes.
    pub fn on_select(mut self, f: impl Fn(&[String]) + Send + Sync + 'static) -> Self {
        Arc::make_mut(&mut self.callbacks).on_select = Some(Arc::new(f));
        self
    }

    /// Called with the node id and new state on every expansion change.
    pub fn on_expand(mut self, f: impl Fn(&str, bool) + Send + Sync + 'static) -> Self {
        Arc::make_mut(&mut self.callbacks).on_expand = Some(Arc::new(f));
        self
    }

    /// Called once per legal drop with `(dragged, target, position)`.
    pub fn on_drop(
        mut self,
        f: impl Fn(&str, &str, DropPosition) + Send + Sync + 'static,
    ) -> Self {
        Arc::make_mut(&mut self.callbacks).on_drop = Some(Arc::new(f));
        self
    }

    /// Called with the query on every search input change.
    pub fn on_search(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        Arc::make_mut(&mut self.callbacks).on_search = Some(Arc::new(f));
        self
    }

    /// Get the unique ID.
    pub fn id(&self) -> TreeId {
        self.id
    }

    /// Run `f` against the state and dispatch the events it produced.
    pub(super) fn update<R>(
        &self,
        f: impl FnOnce(&mut TreeInner<T>, &mut Vec<TreeEvent>) -> R,
    ) -> Option<R> {
        let mut events = Vec::new();
        let result = {
            let mut guard = self.inner.write().ok()?;
            f(&mut guard, &mut events)
        };
        self.emit(events);
        Some(result)
    }

    pub(super) fn read<R>(&self, f: impl FnOnce(&TreeInner<T>) -> R) -> Option<R> {
        self.inner.read().ok().map(|g| f(&g))
    }

    fn emit(&self, events: Vec<TreeEvent>) {
        if events.is_empty() {
            return;
        }
        self.mark_dirty();
        for event in &events {
            debug!("{}: {:?}", self.id, event);
            self.callbacks.dispatch(event);
        }
    }

    pub(super) fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::SeqCst);
    }

    // -------------------------------------------------------------------------
    // Item access
    // -------------------------------------------------------------------------

    /// Get the root items.
    pub fn roots(&self) -> Vec<T> {
        self.read(|g| g.roots.clone()).unwrap_or_default()
    }

    /// Replace the hierarchy.
    ///
    /// Reflattens, drops selected/expanded ids that no longer apply, reruns
    /// an active search and abandons a drag whose node disappeared.
    pub fn set_items(&self, roots: Vec<T>) {
        self.update(|g, events| g.set_items(roots, events));
        self.mark_dirty();
    }

    /// Replace the hierarchy, rejecting empty or duplicate ids.
    pub fn try_set_items(&self, roots: Vec<T>) -> Result<(), TreeError> {
        node::validate(&roots)?;
        self.set_items(roots);
        Ok(())
    }

    /// Find a node by ID in the entire tree (including collapsed).
    pub fn node(&self, id: &str) -> Option<T> {
        self.read(|g| {
            g.flat
                .get(id)
                .and_then(|n| resolve(&g.roots, &n.address))
                .cloned()
        })
        .flatten()
    }

    /// The whole hierarchy in pre-order.
    pub fn flat_nodes(&self) -> Vec<FlatNode> {
        self.read(|g| g.flat.nodes().to_vec()).unwrap_or_default()
    }

    pub fn flat_node(&self, id: &str) -> Option<FlatNode> {
        self.read(|g| g.flat.get(id).cloned()).flatten()
    }

    /// Rows a renderer should paint, in order.
    pub fn visible_nodes(&self) -> Vec<FlatNode> {
        self.read(|g| g.visible().into_iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of nodes in the hierarchy.
    pub fn len(&self) -> usize {
        self.read(|g| g.flat.len()).unwrap_or(0)
    }

    /// Check if the tree has no items.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn config(&self) -> TreeConfig {
        self.read(|g| g.config.clone()).unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Selected ids in flattened order.
    pub fn selected_ids(&self) -> Vec<String> {
        self.read(|g| g.selection.ordered(&g.flat))
            .unwrap_or_default()
    }

    /// Selected nodes in flattened order.
    pub fn selected_nodes(&self) -> Vec<T> {
        self.read(|g| {
            g.flat
                .nodes()
                .iter()
                .filter(|n| g.selection.is_selected(&n.id))
                .filter_map(|n| resolve(&g.roots, &n.address).cloned())
                .collect()
        })
        .unwrap_or_default()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.read(|g| g.selection.is_selected(id)).unwrap_or(false)
    }

    /// The range-selection anchor (last selected id).
    pub fn anchor_id(&self) -> Option<String> {
        self.read(|g| g.selection.anchor().map(str::to_string))
            .flatten()
    }

    /// Replace the selection with `id`. No-op for unknown or disabled ids.
    pub fn select_single(&self, id: &str) -> bool {
        self.update(|g, events| g.select_single(id, events))
            .unwrap_or(false)
    }

    /// Add or remove `id`. Degrades to `select_single` without multi-select.
    pub fn toggle_select(&self, id: &str) -> bool {
        self.update(|g, events| g.toggle_select(id, events))
            .unwrap_or(false)
    }

    /// Select the flattened slice between `from` and `to`, inclusive.
    ///
    /// Degrades to `select_single(to)` without multi-select.
    pub fn select_range(&self, from: &str, to: &str) -> bool {
        self.update(|g, events| g.select_range(from, to, false, events))
            .unwrap_or(false)
    }

    /// Select every enabled node (multi-select only).
    pub fn select_all(&self) -> bool {
        self.update(|g, events| g.select_all(events))
            .unwrap_or(false)
    }

    /// Clear the selection and its anchor.
    pub fn clear_selection(&self) -> bool {
        self.update(|g, events| g.clear_selection(events))
            .unwrap_or(false)
    }

    // -------------------------------------------------------------------------
    // Expand/Collapse
    // -------------------------------------------------------------------------

    pub fn is_expanded(&self, id: &str) -> bool {
        self.read(|g| g.expansion.is_expanded(id)).unwrap_or(false)
    }

    /// Expanded ids in flattened order.
    pub fn expanded_ids(&self) -> Vec<String> {
        self.read(|g| {
            g.flat
                .ids()
                .filter(|id| g.expansion.is_expanded(id))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
    }

    /// Flip a node's expansion. Returns the new state, `None` for no-ops.
    pub fn toggle_expanded(&self, id: &str) -> Option<bool> {
        self.update(|g, events| g.toggle_expanded(id, events))
            .flatten()
    }

    /// Set a node's expansion. Returns the new state, `None` for no-ops.
    pub fn set_expanded(&self, id: &str, expanded: bool) -> Option<bool> {
        self.update(|g, events| g.set_expanded(id, expanded, events))
            .flatten()
    }

    /// Expand all expandable nodes.
    pub fn expand_all(&self) {
        self.update(|g, events| {
            for id in g.expansion.expand_all(&g.flat) {
                events.push(TreeEvent::Expand { id, expanded: true });
            }
        });
    }

    /// Collapse all nodes.
    pub fn collapse_all(&self) {
        self.update(|g, events| {
            for id in g.expansion.collapse_all(&g.flat) {
                events.push(TreeEvent::Expand {
                    id,
                    expanded: false,
                });
            }
        });
    }

    /// Expand every ancestor of `id` so its row becomes visible.
    pub fn reveal(&self, id: &str) {
        self.update(|g, events| {
            let Some(ancestors) = g.flat.get(id).map(|n| n.ancestors().to_vec()) else {
                return;
            };
            for ancestor in ancestors {
                g.set_expanded(&ancestor, true, events);
            }
        });
    }

    // -------------------------------------------------------------------------
    // Search
    // -------------------------------------------------------------------------

    /// Set the search query.
    ///
    /// Returns false (and does nothing) when the tree is not searchable.
    pub fn set_query(&self, query: &str) -> bool {
        self.update(|g, events| g.set_query(query, events))
            .unwrap_or(false)
    }

    /// Clear the query, restoring the pre-search expansion state.
    pub fn clear_query(&self) -> bool {
        self.set_query("")
    }

    pub fn query(&self) -> String {
        self.read(|g| g.search.query().to_string())
            .unwrap_or_default()
    }

    /// Whether a non-empty query is active.
    pub fn is_searching(&self) -> bool {
        self.read(|g| g.search.is_active()).unwrap_or(false)
    }

    /// Matching ids in flattened order.
    pub fn matches(&self) -> Vec<String> {
        self.read(|g| g.search.matches().to_vec())
            .unwrap_or_default()
    }

    pub fn is_match(&self, id: &str) -> bool {
        self.read(|g| g.search.is_match(id)).unwrap_or(false)
    }

    /// Ancestors kept visible for the matches, in flattened order.
    pub fn ancestor_ids(&self) -> Vec<String> {
        self.read(|g| {
            g.flat
                .ids()
                .filter(|id| g.search.ancestors().contains(*id))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
    }

    /// Matches plus ancestors in pre-order; every node without a query.
    pub fn filtered_nodes(&self) -> Vec<FlatNode> {
        self.read(|g| {
            g.search
                .filtered_nodes(&g.flat)
                .into_iter()
                .cloned()
                .collect()
        })
        .unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Match focus
    // -------------------------------------------------------------------------

    /// The match the search input's arrow keys point at.
    pub fn focused_match(&self) -> Option<String> {
        self.read(|g| g.focus.focused().map(str::to_string))
            .flatten()
    }

    /// Move match focus circularly. Inactive without a query.
    pub fn move_focus(&self, direction: FocusDirection) -> Option<String> {
        let focused = self.update(|g, _| g.move_focus(direction)).flatten();
        if focused.is_some() {
            self.mark_dirty();
        }
        focused
    }

    /// Select the focused match. No-op without one.
    pub fn select_focused(&self) -> bool {
        self.update(|g, events| {
            let Some(id) = g.focus.focused().map(str::to_string) else {
                return false;
            };
            g.cursor = Some(id.clone());
            g.select_single(&id, events);
            true
        })
        .unwrap_or(false)
    }

    // -------------------------------------------------------------------------
    // Cursor
    // -------------------------------------------------------------------------

    /// The row with keyboard focus.
    pub fn cursor_id(&self) -> Option<String> {
        self.read(|g| g.cursor.clone()).flatten()
    }

    /// Put keyboard focus on a row. Disabled and unknown rows are refused.
    pub fn set_cursor(&self, id: &str) -> bool {
        let moved = self
            .update(|g, _| {
                if !g.flat.is_enabled(id) {
                    return false;
                }
                g.cursor = Some(id.to_string());
                true
            })
            .unwrap_or(false);
        if moved {
            self.mark_dirty();
        }
        moved
    }

    fn cursor_step(
        &self,
        pick: impl FnOnce(&[&FlatNode], Option<usize>) -> Option<usize>,
    ) -> Option<String> {
        let moved = self.update(|g, _| g.move_cursor(pick)).flatten();
        if moved.is_some() {
            self.mark_dirty();
        }
        moved
    }

    /// Move cursor to the previous visible row.
    pub fn cursor_up(&self) -> Option<String> {
        self.cursor_step(|rows, current| match current {
            Some(i) => i.checked_sub(1),
            None => (!rows.is_empty()).then_some(0),
        })
    }

    /// Move cursor to the next visible row.
    pub fn cursor_down(&self) -> Option<String> {
        self.cursor_step(|rows, current| match current {
            Some(i) => (i + 1 < rows.len()).then_some(i + 1),
            None => (!rows.is_empty()).then_some(0),
        })
    }

    /// Move cursor to the first visible row.
    pub fn cursor_first(&self) -> Option<String> {
        self.cursor_step(|rows, _| (!rows.is_empty()).then_some(0))
    }

    /// Move cursor to the last visible row.
    pub fn cursor_last(&self) -> Option<String> {
        self.cursor_step(|rows, _| rows.len().checked_sub(1))
    }

    // -------------------------------------------------------------------------
    // Dirty tracking
    // -------------------------------------------------------------------------

    /// Check if the tree has changed since the last render.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag.
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}

impl Tree<TreeNode> {
    /// The filtered hierarchy: only matches and their ancestors, nesting
    /// preserved. Without a query this is the full hierarchy.
    pub fn filtered_roots(&self) -> Vec<TreeNode> {
        self.read(|g| {
            if g.search.is_active() {
                node::filter_hierarchy(&g.roots, &g.search.kept_ids())
            } else {
                g.roots.clone()
            }
        })
        .unwrap_or_default()
    }
}

impl<T: TreeItem> Clone for Tree<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Arc::clone(&self.inner),
            callbacks: Arc::clone(&self.callbacks),
            dirty: Arc::clone(&self.dirty),
        }
    }
}

impl<T: TreeItem> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TreeItem + std::fmt::Debug> std::fmt::Debug for Tree<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tree")
            .field("id", &self.id)
            .field("inner", &self.inner)
            .field("callbacks", &self.callbacks)
            .finish()
    }
}
