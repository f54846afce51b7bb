//! Pointer and keyboard handling for the Tree.

use log::debug;

use crate::events::{EventResult, TreeEvent};
use crate::focus::FocusDirection;
use crate::input::{Key, KeyCombo, Modifiers};
use crate::node::TreeItem;

use super::state::{Tree, TreeInner};

impl<T: TreeItem> TreeInner<T> {
    /// Plain selection of a row, toggling a parent's expansion when
    /// `expand_on_select` is set.
    fn activate(&mut self, id: &str, events: &mut Vec<TreeEvent>) {
        self.select_single(id, events);
        if self.config.expand_on_select && self.flat.get(id).is_some_and(|n| n.has_children) {
            self.toggle_expanded(id, events);
        }
    }

    fn first_visible_child(&self, id: &str) -> Option<String> {
        self.visible()
            .into_iter()
            .find(|n| n.parent_id.as_deref() == Some(id))
            .map(|n| n.id.clone())
    }
}

impl<T: TreeItem> Tree<T> {
    /// Handle a click on row `id`.
    ///
    /// Plain click selects the row. Ctrl/Cmd+click toggles it, Shift+click
    /// selects the range from the anchor, Ctrl/Cmd+Shift+click adds that
    /// range to the selection. Without multi-select every click is plain.
    pub fn on_click(&self, id: &str, modifiers: Modifiers) -> EventResult {
        let handled = self.update(|g, events| {
            if !g.flat.is_enabled(id) {
                return false;
            }
            g.cursor = Some(id.to_string());

            let multi = g.config.enable_multi_select;
            if multi && modifiers.shift {
                match g.selection.anchor().map(str::to_string) {
                    Some(anchor) => {
                        g.select_range(&anchor, id, modifiers.toggles(), events);
                    }
                    None => {
                        g.select_single(id, events);
                    }
                }
            } else if multi && modifiers.toggles() {
                g.toggle_select(id, events);
            } else {
                g.activate(id, events);
            }
            true
        });

        if handled == Some(true) {
            self.mark_dirty();
            EventResult::Consumed
        } else {
            EventResult::Ignored
        }
    }

    /// Handle a key while a row has focus.
    pub fn on_key(&self, key: &KeyCombo) -> EventResult {
        let mods = key.modifiers;
        match key.key {
            Key::Up if !mods.any() => self.cursor_up().map(|_| EventResult::Consumed),
            Key::Down if !mods.any() => self.cursor_down().map(|_| EventResult::Consumed),
            Key::Home if !mods.any() => self.cursor_first().map(|_| EventResult::Consumed),
            Key::End if !mods.any() => self.cursor_last().map(|_| EventResult::Consumed),
            Key::Right if !mods.toggles() && !mods.alt => self.expand_or_descend(),
            Key::Left if !mods.toggles() && !mods.alt => self.collapse_or_ascend(),
            Key::Enter | Key::Space | Key::Char(' ') => self.activate_cursor(mods),
            Key::Char('a') | Key::Char('A') if mods.toggles() => {
                self.select_all();
                Some(EventResult::Consumed)
            }
            Key::Escape => {
                if self.dragged_id().is_some() {
                    self.cancel_drag();
                } else {
                    self.clear_selection();
                }
                Some(EventResult::Consumed)
            }
            _ => None,
        }
        .unwrap_or(EventResult::Ignored)
    }

    /// Enter/Space on the cursor row.
    fn activate_cursor(&self, mods: Modifiers) -> Option<EventResult> {
        let id = self.cursor_id()?;
        self.update(|g, events| {
            if g.config.enable_multi_select && mods.toggles() {
                g.toggle_select(&id, events);
            } else {
                g.activate(&id, events);
            }
        })?;
        Some(EventResult::Consumed)
    }

    /// ArrowRight: expand a collapsed parent, or step into an expanded one.
    fn expand_or_descend(&self) -> Option<EventResult> {
        let id = self.cursor_id()?;
        let moved = self
            .update(|g, events| {
                let node = g.flat.get(&id)?;
                if !node.has_children {
                    return None;
                }
                if !g.expansion.is_expanded(&id) {
                    g.set_expanded(&id, true, events).map(|_| false)
                } else {
                    let child = g.first_visible_child(&id)?;
                    g.cursor = Some(child);
                    Some(true)
                }
            })
            .flatten()?;
        if moved {
            self.mark_dirty();
        }
        Some(EventResult::Consumed)
    }

    /// ArrowLeft: collapse an expanded parent, or step out to the parent row.
    fn collapse_or_ascend(&self) -> Option<EventResult> {
        let id = self.cursor_id()?;
        let moved = self
            .update(|g, events| {
                let node = g.flat.get(&id)?;
                if node.has_children && g.expansion.is_expanded(&id) {
                    return g.set_expanded(&id, false, events).map(|_| false);
                }
                let parent = node.parent_id.clone()?;
                g.cursor = Some(parent);
                Some(true)
            })
            .flatten()?;
        if moved {
            self.mark_dirty();
        }
        Some(EventResult::Consumed)
    }

    /// Handle a key while the search input has focus.
    ///
    /// Arrow keys move match focus, Enter selects the focused match and
    /// clears the query, Escape clears the query. Text entry itself goes
    /// through [`set_query`](Tree::set_query).
    pub fn on_search_key(&self, key: &KeyCombo) -> EventResult {
        if !self.is_searching() {
            return EventResult::Ignored;
        }
        match key.key {
            Key::Down => {
                self.move_focus(FocusDirection::Down);
                EventResult::Consumed
            }
            Key::Up => {
                self.move_focus(FocusDirection::Up);
                EventResult::Consumed
            }
            Key::Enter => {
                if !self.select_focused() {
                    return EventResult::Ignored;
                }
                debug!("{}: committed focused match, clearing query", self.id());
                self.clear_query();
                EventResult::Consumed
            }
            Key::Escape => {
                self.clear_query();
                EventResult::Consumed
            }
            _ => EventResult::Ignored,
        }
    }
}
