//! Tests for the tree engine: gestures, callbacks and hierarchy updates.

mod common;

use arbor::prelude::*;

use common::{Recorder, files, ids, scenario_a, strings, with_disabled};

fn key(s: &str) -> KeyCombo {
    s.parse().unwrap()
}

fn expanded_a() -> Tree<TreeNode> {
    Tree::with_items(scenario_a()).with_config(TreeConfig::new().expanded(["root", "a"]))
}

// -----------------------------------------------------------------------------
// Pointer
// -----------------------------------------------------------------------------

#[test]
fn test_click_modes() {
    let rec = Recorder::default();
    let tree = rec.attach(expanded_a());

    assert!(tree.on_click("a", Modifiers::NONE).is_handled());
    assert_eq!(tree.selected_ids(), strings(&["a"]));

    tree.on_click("b", Modifiers::CTRL);
    assert_eq!(tree.selected_ids(), strings(&["a", "b"]));

    tree.on_click("a", Modifiers::META);
    assert_eq!(tree.selected_ids(), strings(&["b"]));

    // anchor is `a` (last toggled), shift extends to a2
    tree.on_click("a2", Modifiers::SHIFT);
    assert_eq!(tree.selected_ids(), strings(&["a", "a1", "a2"]));
    assert_eq!(tree.anchor_id().as_deref(), Some("a2"));

    assert_eq!(
        rec.take(),
        vec![
            TreeEvent::Select { ids: strings(&["a"]) },
            TreeEvent::Select { ids: strings(&["a", "b"]) },
            TreeEvent::Select { ids: strings(&["b"]) },
            TreeEvent::Select { ids: strings(&["a", "a1", "a2"]) },
        ]
    );
}

#[test]
fn test_ctrl_shift_click_extends() {
    let tree = expanded_a();
    tree.on_click("root", Modifiers::NONE);
    tree.on_click("b", Modifiers::CTRL);
    let mods = Modifiers {
        ctrl: true,
        shift: true,
        ..Modifiers::NONE
    };
    tree.on_click("a1", mods);
    assert_eq!(tree.selected_ids(), strings(&["root", "a1", "a2", "b"]));
}

#[test]
fn test_shift_click_without_anchor_selects_single() {
    let tree = expanded_a();
    tree.on_click("a2", Modifiers::SHIFT);
    assert_eq!(tree.selected_ids(), strings(&["a2"]));
}

#[test]
fn test_single_select_mode_degrades() {
    let tree = expanded_a().with_config(TreeConfig::new().multi_select(false));
    tree.on_click("a", Modifiers::NONE);
    tree.on_click("b", Modifiers::CTRL);
    assert_eq!(tree.selected_ids(), strings(&["b"]));
    tree.on_click("a1", Modifiers::SHIFT);
    assert_eq!(tree.selected_ids(), strings(&["a1"]));
    assert!(!tree.select_all());
    tree.select_range("root", "b");
    assert_eq!(tree.selected_ids(), strings(&["b"]));
}

#[test]
fn test_click_disabled_is_ignored() {
    let rec = Recorder::default();
    let tree = rec.attach(Tree::with_items(with_disabled()));
    assert_eq!(tree.on_click("locked", Modifiers::NONE), EventResult::Ignored);
    assert_eq!(tree.on_click("ghost", Modifiers::NONE), EventResult::Ignored);
    assert!(!tree.select_single("vendor"));
    assert!(!tree.toggle_select("locked"));
    assert!(tree.selected_ids().is_empty());
    assert_eq!(tree.cursor_id(), None);
    assert!(rec.take().is_empty());
}

#[test]
fn test_reselect_same_row_fires_nothing() {
    let rec = Recorder::default();
    let tree = rec.attach(expanded_a());
    tree.on_click("a", Modifiers::NONE);
    tree.on_click("a", Modifiers::NONE);
    assert_eq!(rec.take().len(), 1);
}

#[test]
fn test_expand_on_select() {
    let rec = Recorder::default();
    let tree = rec.attach(
        Tree::with_items(scenario_a())
            .with_config(TreeConfig::new().expand_on_select(true).expanded(["root"])),
    );
    tree.on_click("a", Modifiers::NONE);
    assert!(tree.is_expanded("a"));
    tree.on_click("a", Modifiers::NONE);
    assert!(!tree.is_expanded("a"));
    // leaves select without expansion events
    tree.on_click("b", Modifiers::NONE);
    assert_eq!(
        rec.take(),
        vec![
            TreeEvent::Select { ids: strings(&["a"]) },
            TreeEvent::Expand {
                id: "a".to_string(),
                expanded: true
            },
            TreeEvent::Expand {
                id: "a".to_string(),
                expanded: false
            },
            TreeEvent::Select { ids: strings(&["b"]) },
        ]
    );
}

// -----------------------------------------------------------------------------
// Keyboard
// -----------------------------------------------------------------------------

#[test]
fn test_cursor_moves_over_visible_rows() {
    let tree = Tree::with_items(scenario_a()).with_config(TreeConfig::new().expanded(["root"]));
    assert_eq!(ids(&tree.visible_nodes()), vec!["root", "a", "b"]);

    assert!(tree.on_key(&key("down")).is_handled());
    assert_eq!(tree.cursor_id().as_deref(), Some("root"));
    tree.on_key(&key("down"));
    tree.on_key(&key("down"));
    assert_eq!(tree.cursor_id().as_deref(), Some("b"));
    // already at the bottom
    assert_eq!(tree.on_key(&key("down")), EventResult::Ignored);
    tree.on_key(&key("home"));
    assert_eq!(tree.cursor_id().as_deref(), Some("root"));
    tree.on_key(&key("end"));
    assert_eq!(tree.cursor_id().as_deref(), Some("b"));
    tree.on_key(&key("up"));
    assert_eq!(tree.cursor_id().as_deref(), Some("a"));
}

#[test]
fn test_arrow_right_and_left() {
    let rec = Recorder::default();
    let tree = rec.attach(Tree::with_items(scenario_a()));
    tree.set_cursor("root");

    tree.on_key(&key("right"));
    assert!(tree.is_expanded("root"));
    tree.on_key(&key("right"));
    assert_eq!(tree.cursor_id().as_deref(), Some("a"));
    tree.on_key(&key("right"));
    assert!(tree.is_expanded("a"));
    tree.on_key(&key("left"));
    assert!(!tree.is_expanded("a"));
    tree.on_key(&key("left"));
    assert_eq!(tree.cursor_id().as_deref(), Some("root"));

    // a leaf cannot expand
    tree.set_cursor("b");
    assert_eq!(tree.on_key(&key("right")), EventResult::Ignored);

    let expands: Vec<TreeEvent> = rec
        .take()
        .into_iter()
        .filter(|e| matches!(e, TreeEvent::Expand { .. }))
        .collect();
    assert_eq!(expands.len(), 3);
}

#[test]
fn test_enter_and_space_select_cursor() {
    let tree = expanded_a();
    assert_eq!(tree.on_key(&key("enter")), EventResult::Ignored);
    tree.set_cursor("a1");
    tree.on_key(&key("enter"));
    assert_eq!(tree.selected_ids(), strings(&["a1"]));
    tree.set_cursor("b");
    tree.on_key(&key("ctrl+space"));
    assert_eq!(tree.selected_ids(), strings(&["a1", "b"]));
    tree.on_key(&key("space"));
    assert_eq!(tree.selected_ids(), strings(&["b"]));
}

#[test]
fn test_ctrl_a_and_escape() {
    let tree = Tree::with_items(with_disabled());
    assert!(tree.on_key(&key("ctrl+a")).is_handled());
    assert_eq!(tree.selected_ids(), strings(&["src", "main", "lib", "dep"]));
    tree.on_key(&key("escape"));
    assert!(tree.selected_ids().is_empty());
    assert_eq!(tree.anchor_id(), None);
    assert_eq!(tree.on_key(&key("x")), EventResult::Ignored);
}

// -----------------------------------------------------------------------------
// Expansion
// -----------------------------------------------------------------------------

#[test]
fn test_expand_events_and_noops() {
    let rec = Recorder::default();
    let tree = rec.attach(Tree::with_items(with_disabled()));
    assert_eq!(tree.toggle_expanded("src"), Some(true));
    assert_eq!(tree.set_expanded("src", true), None);
    assert_eq!(tree.toggle_expanded("main"), None);
    assert_eq!(tree.set_expanded("vendor", true), None);
    assert_eq!(
        rec.take(),
        vec![TreeEvent::Expand {
            id: "src".to_string(),
            expanded: true
        }]
    );
}

#[test]
fn test_expand_all_collapse_all_reveal() {
    let rec = Recorder::default();
    let tree = rec.attach(Tree::with_items(scenario_a()));
    tree.expand_all();
    assert_eq!(tree.expanded_ids(), strings(&["root", "a"]));
    assert_eq!(tree.visible_nodes().len(), 5);
    tree.collapse_all();
    assert!(tree.expanded_ids().is_empty());
    assert_eq!(rec.take().len(), 4);

    tree.reveal("a2");
    assert_eq!(tree.expanded_ids(), strings(&["root", "a"]));
    assert!(ids(&tree.visible_nodes()).contains(&"a2"));
}

// -----------------------------------------------------------------------------
// Search
// -----------------------------------------------------------------------------

fn searchable_files() -> Tree<TreeNode> {
    Tree::with_items(files()).with_config(TreeConfig::new().searchable(true))
}

#[test]
fn test_search_not_searchable_is_ignored() {
    let rec = Recorder::default();
    let tree = rec.attach(Tree::with_items(files()));
    assert!(!tree.set_query("doc"));
    assert!(!tree.is_searching());
    assert!(rec.take().is_empty());
}

#[test]
fn test_search_fires_on_every_change() {
    let rec = Recorder::default();
    let tree = rec.attach(searchable_files());
    tree.set_query("d");
    tree.set_query("do");
    tree.clear_query();
    let queries: Vec<TreeEvent> = rec.take();
    assert_eq!(
        queries,
        vec![
            TreeEvent::Search { query: "d".to_string() },
            TreeEvent::Search { query: "do".to_string() },
            TreeEvent::Search { query: String::new() },
        ]
    );
}

#[test]
fn test_search_view_and_restore() {
    let rec = Recorder::default();
    let tree = rec.attach(searchable_files());
    tree.set_query("doc");
    assert_eq!(tree.matches(), strings(&["documents", "document_txt"]));
    assert_eq!(tree.ancestor_ids(), strings(&["files"]));
    assert_eq!(
        ids(&tree.visible_nodes()),
        vec!["files", "documents", "document_txt"]
    );
    assert_eq!(ids(&tree.filtered_nodes()), vec!["files", "documents", "document_txt"]);

    let roots = tree.filtered_roots();
    assert_eq!(roots[0].children.len(), 2);
    // search-driven expansion is silent
    assert!(
        rec.take()
            .iter()
            .all(|e| matches!(e, TreeEvent::Search { .. }))
    );

    tree.clear_query();
    assert!(tree.expanded_ids().is_empty());
    assert_eq!(ids(&tree.visible_nodes()), vec!["files"]);
    assert_eq!(tree.filtered_roots(), files());
}

#[test]
fn test_search_keys() {
    let tree = searchable_files();
    assert_eq!(tree.on_search_key(&key("down")), EventResult::Ignored);

    tree.set_query("doc");
    tree.on_search_key(&key("down"));
    assert_eq!(tree.focused_match().as_deref(), Some("documents"));
    tree.on_search_key(&key("down"));
    assert_eq!(tree.focused_match().as_deref(), Some("document_txt"));
    tree.on_search_key(&key("down"));
    assert_eq!(tree.focused_match().as_deref(), Some("documents"));
    tree.on_search_key(&key("up"));
    assert_eq!(tree.focused_match().as_deref(), Some("document_txt"));

    assert!(tree.on_search_key(&key("enter")).is_handled());
    assert_eq!(tree.selected_ids(), strings(&["document_txt"]));
    assert_eq!(tree.cursor_id().as_deref(), Some("document_txt"));
    assert!(!tree.is_searching());
    assert_eq!(tree.focused_match(), None);
}

#[test]
fn test_search_enter_without_focus() {
    let tree = searchable_files();
    tree.set_query("zzz");
    assert_eq!(tree.move_focus(FocusDirection::Down), None);
    assert_eq!(tree.on_search_key(&key("enter")), EventResult::Ignored);
    assert!(!tree.select_focused());
    assert!(tree.is_searching());
    assert!(tree.on_search_key(&key("escape")).is_handled());
    assert!(!tree.is_searching());
}

#[test]
fn test_focus_drops_when_match_disappears() {
    let tree = searchable_files();
    tree.set_query("doc");
    tree.move_focus(FocusDirection::Up);
    assert_eq!(tree.focused_match().as_deref(), Some("document_txt"));
    tree.set_query("docum");
    assert_eq!(tree.focused_match().as_deref(), Some("document_txt"));
    tree.set_query("documents");
    assert_eq!(tree.focused_match(), None);
}

// -----------------------------------------------------------------------------
// Hierarchy updates
// -----------------------------------------------------------------------------

#[test]
fn test_set_items_prunes_state() {
    let rec = Recorder::default();
    let tree = rec.attach(expanded_a());
    tree.select_range("a1", "b");
    tree.set_cursor("a2");
    rec.take();

    tree.set_items(vec![TreeNode::branch(
        "root",
        "Root",
        vec![TreeNode::leaf("a", "Alpha"), TreeNode::leaf("b", "Beta")],
    )]);
    assert_eq!(tree.selected_ids(), strings(&["b"]));
    assert_eq!(tree.expanded_ids(), strings(&["root"]));
    assert_eq!(tree.cursor_id(), None);
    assert_eq!(
        rec.take(),
        vec![TreeEvent::Select { ids: strings(&["b"]) }]
    );

    // nothing stale: no event
    tree.set_items(scenario_a());
    assert!(rec.take().is_empty());
}

#[test]
fn test_set_items_reruns_search() {
    let tree = searchable_files();
    tree.set_query("cat");
    assert_eq!(tree.matches(), strings(&["cat"]));
    let mut next = files();
    next[0].children[1].children.push(TreeNode::leaf("cat2", "catalog"));
    tree.set_items(next);
    assert_eq!(tree.matches(), strings(&["cat", "cat2"]));
    assert_eq!(tree.query(), "cat");
}

#[test]
fn test_clear_query_after_set_items_drops_stale_expansion() {
    let tree = Tree::with_items(files()).with_config(
        TreeConfig::new()
            .searchable(true)
            .expanded(["files", "documents", "images"]),
    );
    tree.set_query("zzz");

    // `documents` loses its children, `images` becomes disabled
    let mut next = files();
    next[0].children[0].children.clear();
    next[0].children[1].disabled = true;
    tree.set_items(next);
    tree.clear_query();

    assert_eq!(tree.expanded_ids(), strings(&["files"]));
    assert!(!tree.is_expanded("documents"));
    assert!(!tree.is_expanded("images"));
    assert_eq!(
        ids(&tree.visible_nodes()),
        vec!["files", "documents", "images", "document_txt"]
    );
}

#[test]
fn test_shift_click_after_anchor_disabled() {
    let tree = Tree::with_items(scenario_a())
        .with_config(TreeConfig::new().expanded(["root", "a"]));
    tree.on_click("a1", Modifiers::NONE);

    let mut next = scenario_a();
    next[0].children[0].children[0].disabled = true;
    tree.set_items(next);
    assert!(tree.selected_ids().is_empty());
    assert_eq!(tree.anchor_id(), None);

    // no anchor left, so shift+click selects just the row
    tree.on_click("b", Modifiers::SHIFT);
    assert_eq!(tree.selected_ids(), strings(&["b"]));
}

#[test]
fn test_select_range_onto_disabled_row() {
    let rec = Recorder::default();
    let tree = rec.attach(Tree::with_items(with_disabled()));
    tree.select_single("main");
    rec.take();
    assert!(!tree.select_range("main", "locked"));
    assert_eq!(tree.selected_ids(), strings(&["main"]));
    assert_eq!(tree.anchor_id().as_deref(), Some("main"));
    assert!(rec.take().is_empty());
}

#[test]
fn test_node_lookup() {
    let tree = expanded_a();
    assert_eq!(tree.node("a1").map(|n| n.label), Some("Alpha One".to_string()));
    assert!(tree.node("ghost").is_none());
    assert_eq!(tree.flat_node("a2").map(|n| n.level), Some(2));
    assert_eq!(tree.flat_nodes().len(), 5);
    tree.select_range("a1", "a2");
    let labels: Vec<String> = tree.selected_nodes().into_iter().map(|n| n.label).collect();
    assert_eq!(labels, vec!["Alpha One", "Alpha Two"]);
}

#[test]
fn test_callbacks_may_read_tree() {
    use std::sync::{Arc, Mutex};

    let seen = Arc::new(Mutex::new(Vec::new()));
    let tree = Tree::with_items(scenario_a());
    let handle = tree.clone();
    let sink = Arc::clone(&seen);
    let tree = tree.on_select(move |_| {
        sink.lock().unwrap().push(handle.selected_ids().len());
    });
    tree.select_range("root", "b");
    assert_eq!(*seen.lock().unwrap(), vec![5]);
}

#[test]
fn test_dirty_flag() {
    let tree = expanded_a();
    assert!(tree.is_dirty());
    tree.clear_dirty();
    tree.select_single("a");
    assert!(tree.is_dirty());
    tree.clear_dirty();
    tree.select_single("a");
    assert!(!tree.is_dirty());
}

#[test]
fn test_trees_do_not_share_state() {
    let first = Tree::with_items(scenario_a());
    let second = Tree::with_items(scenario_a());
    assert_ne!(first.id(), second.id());
    first.select_single("a");
    assert!(second.selected_ids().is_empty());
    let clone = first.clone();
    assert_eq!(clone.id(), first.id());
    assert_eq!(clone.selected_ids(), strings(&["a"]));
}
