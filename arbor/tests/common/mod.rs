#![allow(dead_code)]

use std::borrow::Borrow;
use std::sync::{Arc, Mutex};

use arbor::prelude::*;

/// `root -> [a -> [a1, a2], b]`
pub fn scenario_a() -> Vec<TreeNode> {
    vec![TreeNode::branch(
        "root",
        "Root",
        vec![
            TreeNode::branch(
                "a",
                "Alpha",
                vec![TreeNode::leaf("a1", "Alpha One"), TreeNode::leaf("a2", "Alpha Two")],
            ),
            TreeNode::leaf("b", "Beta"),
        ],
    )]
}

/// `files -> [documents -> [report], images, document_txt]`
pub fn files() -> Vec<TreeNode> {
    vec![TreeNode::branch(
        "files",
        "Files",
        vec![
            TreeNode::branch(
                "documents",
                "Documents",
                vec![TreeNode::leaf("report", "Report.pdf")],
            ),
            TreeNode::branch(
                "images",
                "Images",
                vec![TreeNode::leaf("cat", "cat.png")],
            ),
            TreeNode::leaf("document_txt", "Document.txt"),
        ],
    )]
}

/// Two roots, a disabled leaf and a disabled branch.
pub fn with_disabled() -> Vec<TreeNode> {
    vec![
        TreeNode::branch(
            "src",
            "src",
            vec![
                TreeNode::leaf("main", "main.rs"),
                TreeNode::leaf("locked", "locked.rs").disabled(),
                TreeNode::leaf("lib", "lib.rs"),
            ],
        ),
        TreeNode::branch(
            "vendor",
            "vendor",
            vec![TreeNode::leaf("dep", "dep.rs")],
        )
        .disabled(),
    ]
}

/// Records every callback a tree emits.
#[derive(Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<TreeEvent>>>,
}

impl Recorder {
    pub fn attach<T: TreeItem>(&self, tree: Tree<T>) -> Tree<T> {
        let select = self.clone();
        let expand = self.clone();
        let drop = self.clone();
        let search = self.clone();
        tree.on_select(move |ids| {
            select.push(TreeEvent::Select { ids: ids.to_vec() })
        })
        .on_expand(move |id, expanded| {
            expand.push(TreeEvent::Expand {
                id: id.to_string(),
                expanded,
            })
        })
        .on_drop(move |dragged, target, position| {
            drop.push(TreeEvent::Drop {
                dragged_id: dragged.to_string(),
                target_id: target.to_string(),
                position,
            })
        })
        .on_search(move |query| {
            search.push(TreeEvent::Search {
                query: query.to_string(),
            })
        })
    }

    fn push(&self, event: TreeEvent) {
        self.events.lock().unwrap().push(event);
    }

    pub fn take(&self) -> Vec<TreeEvent> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }

    pub fn drops(&self) -> Vec<TreeEvent> {
        self.take()
            .into_iter()
            .filter(|e| matches!(e, TreeEvent::Drop { .. }))
            .collect()
    }
}

pub fn ids<N: Borrow<FlatNode>>(nodes: &[N]) -> Vec<&str> {
    nodes.iter().map(|n| n.borrow().id.as_str()).collect()
}

pub fn strings(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}
