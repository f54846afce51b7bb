//! Flattened projection of a hierarchy.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::node::TreeItem;

/// A node in the flattened tree, in depth-first pre-order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatNode {
    pub id: String,
    pub label: String,
    /// Depth in tree (0 = root).
    pub level: u16,
    /// Ids from the root down to this node, inclusive.
    pub path: Vec<String>,
    pub parent_id: Option<String>,
    pub has_children: bool,
    pub disabled: bool,
    /// Child indices leading from the root list to this node.
    #[serde(skip)]
    pub address: Vec<usize>,
}

impl FlatNode {
    /// Whether `id` is a strict ancestor of this node.
    pub fn has_ancestor(&self, id: &str) -> bool {
        self.ancestors().iter().any(|p| p == id)
    }

    /// Ids of the strict ancestors, root first.
    pub fn ancestors(&self) -> &[String] {
        match self.path.split_last() {
            Some((_, rest)) => rest,
            None => &[],
        }
    }
}

/// Flatten a hierarchy in depth-first pre-order.
///
/// Every node appears exactly once, a node precedes its descendants, and
/// siblings keep their input order.
pub fn flatten<T: TreeItem>(roots: &[T]) -> Vec<FlatNode> {
    let mut out = Vec::new();
    let mut path = Vec::new();
    let mut address = Vec::new();
    collect(roots, 0, &mut path, &mut address, &mut out);
    out
}

fn collect<T: TreeItem>(
    items: &[T],
    level: u16,
    path: &mut Vec<String>,
    address: &mut Vec<usize>,
    out: &mut Vec<FlatNode>,
) {
    for (i, item) in items.iter().enumerate() {
        let children = item.children();
        let parent_id = path.last().cloned();
        path.push(item.id().to_string());
        address.push(i);

        out.push(FlatNode {
            id: item.id().to_string(),
            label: item.label().to_string(),
            level,
            path: path.clone(),
            parent_id,
            has_children: !children.is_empty(),
            disabled: item.is_disabled(),
            address: address.clone(),
        });

        collect(children, level + 1, path, address, out);
        path.pop();
        address.pop();
    }
}

/// Follow a child-index address back into the caller's hierarchy.
pub fn resolve<'a, T: TreeItem>(roots: &'a [T], address: &[usize]) -> Option<&'a T> {
    let (first, rest) = address.split_first()?;
    let mut node = roots.get(*first)?;
    for i in rest {
        node = node.children().get(*i)?;
    }
    Some(node)
}

/// Flat list plus an id index.
#[derive(Debug, Clone, Default)]
pub struct FlatTree {
    nodes: Vec<FlatNode>,
    index: HashMap<String, usize>,
}

impl FlatTree {
    /// Flatten `roots` and index the result.
    ///
    /// With duplicate ids the first occurrence wins the index.
    pub fn build<T: TreeItem>(roots: &[T]) -> Self {
        let nodes = flatten(roots);
        let mut index = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            index.entry(node.id.clone()).or_insert(i);
        }
        Self { nodes, index }
    }

    pub fn nodes(&self) -> &[FlatNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&FlatNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// Pre-order position of `id`.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Ids in pre-order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.id.as_str())
    }

    /// Whether `id` names a node that exists and is not disabled.
    pub fn is_enabled(&self, id: &str) -> bool {
        self.get(id).is_some_and(|n| !n.disabled)
    }

    /// Whether `node` lies strictly below `ancestor`.
    pub fn is_descendant(&self, ancestor: &str, node: &str) -> bool {
        self.get(node).is_some_and(|n| n.has_ancestor(ancestor))
    }
}

/// Rows a renderer should paint: nodes whose every ancestor is expanded.
///
/// Root-level nodes are always visible.
pub fn visible_nodes<'a>(
    nodes: impl IntoIterator<Item = &'a FlatNode>,
    expanded: &HashSet<String>,
) -> Vec<&'a FlatNode> {
    nodes
        .into_iter()
        .filter(|n| n.ancestors().iter().all(|a| expanded.contains(a)))
        .collect()
}
