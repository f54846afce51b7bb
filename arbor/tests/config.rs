//! Tests for configuration, hierarchy serde and initial state.

mod common;

use arbor::prelude::*;

use common::{scenario_a, strings, with_disabled};

#[test]
fn test_config_defaults() {
    let config = TreeConfig::default();
    assert!(config.enable_multi_select);
    assert!(config.enable_drag_drop);
    assert!(!config.expand_on_select);
    assert!(!config.searchable);
    assert_eq!(config.search_placeholder, "Search...");
    assert!(config.default_expanded_ids.is_empty());
    assert!(config.default_selected_ids.is_empty());
}

#[test]
fn test_config_partial_json() {
    let config: TreeConfig = serde_json::from_str(
        r#"{"searchable": true, "defaultExpandedIds": ["root"]}"#,
    )
    .unwrap();
    assert!(config.searchable);
    assert!(config.enable_multi_select);
    assert_eq!(config.default_expanded_ids, strings(&["root"]));
}

#[test]
fn test_config_json_names() {
    let value = serde_json::to_value(TreeConfig::default()).unwrap();
    assert_eq!(value["enableMultiSelect"], serde_json::json!(true));
    assert_eq!(value["searchPlaceholder"], serde_json::json!("Search..."));
}

#[test]
fn test_config_builder() {
    let config = TreeConfig::new()
        .multi_select(false)
        .drag_drop(false)
        .expand_on_select(true)
        .searchable(true)
        .search_placeholder("Find files")
        .expanded(["root"])
        .selected(vec!["a".to_string()]);
    assert!(!config.enable_multi_select);
    assert!(!config.enable_drag_drop);
    assert!(config.expand_on_select);
    assert!(config.searchable);
    assert_eq!(config.search_placeholder, "Find files");
    assert_eq!(config.default_expanded_ids, strings(&["root"]));
    assert_eq!(config.default_selected_ids, strings(&["a"]));
}

#[test]
fn test_tree_node_json() {
    let nodes: Vec<TreeNode> = serde_json::from_str(
        r#"[
            {"id": "root", "label": "Root", "icon": "folder", "children": [
                {"id": "a", "label": "A", "disabled": true, "metadata": {"size": 3}}
            ]},
            {"id": "b", "label": "B"}
        ]"#,
    )
    .unwrap();
    assert_eq!(nodes[0].icon.as_deref(), Some("folder"));
    assert!(nodes[0].children[0].disabled);
    assert_eq!(
        nodes[0].children[0].metadata,
        Some(serde_json::json!({"size": 3}))
    );
    assert!(nodes[1].children.is_empty());

    // optional fields are omitted again on output
    let out = serde_json::to_value(&nodes[1]).unwrap();
    assert_eq!(out, serde_json::json!({"id": "b", "label": "B"}));
}

#[test]
fn test_tree_node_builders() {
    let node = TreeNode::leaf("x", "X")
        .with_icon("file")
        .with_metadata(serde_json::json!(1))
        .disabled();
    assert_eq!(node.icon.as_deref(), Some("file"));
    assert_eq!(node.metadata, Some(serde_json::json!(1)));
    assert!(node.disabled);
    assert!(node.is_disabled());
}

#[test]
fn test_initial_expanded_and_selected() {
    let tree = Tree::with_items(scenario_a()).with_config(
        TreeConfig::new()
            .expanded(["root", "b", "ghost"])
            .selected(["b", "a1", "ghost"]),
    );
    // leaves and unknown ids are dropped
    assert_eq!(tree.expanded_ids(), strings(&["root"]));
    assert_eq!(tree.selected_ids(), strings(&["a1", "b"]));
    assert_eq!(tree.anchor_id().as_deref(), Some("b"));
}

#[test]
fn test_initial_selection_without_multi_keeps_first() {
    let tree = Tree::with_items(scenario_a()).with_config(
        TreeConfig::new()
            .multi_select(false)
            .selected(["b", "a2"]),
    );
    assert_eq!(tree.selected_ids(), strings(&["a2"]));
}

#[test]
fn test_initial_ids_skip_disabled() {
    let tree = Tree::with_items(with_disabled()).with_config(
        TreeConfig::new()
            .expanded(["vendor", "src"])
            .selected(["locked", "main"]),
    );
    assert_eq!(tree.expanded_ids(), strings(&["src"]));
    assert_eq!(tree.selected_ids(), strings(&["main"]));
}

#[test]
fn test_try_with_items_rejects_duplicates() {
    let result = Tree::try_with_items(vec![TreeNode::leaf("x", "1"), TreeNode::leaf("x", "2")]);
    assert!(matches!(result, Err(TreeError::DuplicateId { .. })));

    let tree = Tree::try_with_items(scenario_a()).unwrap();
    assert!(
        tree.try_set_items(vec![TreeNode::leaf("", "anon")])
            .is_err()
    );
    // a rejected hierarchy leaves the old one in place
    assert_eq!(tree.len(), 5);
}

#[test]
fn test_event_json() {
    let event = TreeEvent::Drop {
        dragged_id: "a".to_string(),
        target_id: "b".to_string(),
        position: DropPosition::Inside,
    };
    assert_eq!(
        serde_json::to_value(&event).unwrap(),
        serde_json::json!({
            "event": "drop",
            "draggedId": "a",
            "targetId": "b",
            "position": "inside"
        })
    );
    let event = TreeEvent::Select {
        ids: strings(&["a"]),
    };
    assert_eq!(
        serde_json::to_value(&event).unwrap(),
        serde_json::json!({"event": "select", "ids": ["a"]})
    );
}
