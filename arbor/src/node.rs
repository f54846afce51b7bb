//! Hierarchy input: the `TreeItem` trait and the stock `TreeNode` type.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::TreeError;

/// Trait for items that can be held by a [`Tree`](crate::Tree).
///
/// Implement this for your own hierarchy type, or use [`TreeNode`].
///
/// # Example
///
/// ```ignore
/// #[derive(Clone, Debug)]
/// struct FileNode {
///     path: String,
///     name: String,
///     children: Vec<FileNode>,
/// }
///
/// impl TreeItem for FileNode {
///     fn id(&self) -> &str {
///         &self.path
///     }
///
///     fn label(&self) -> &str {
///         &self.name
///     }
///
///     fn children(&self) -> &[Self] {
///         &self.children
///     }
/// }
/// ```
pub trait TreeItem: Send + Sync + Clone + 'static {
    /// Unique, stable identifier for this node.
    ///
    /// This ID must be unique across the entire tree and stable across
    /// updates to keep expand/collapse and selection state.
    fn id(&self) -> &str;

    /// Text that search queries are matched against.
    fn label(&self) -> &str;

    /// Child items. Return an empty slice for leaf nodes.
    fn children(&self) -> &[Self];

    /// Disabled nodes cannot be selected, focused by search, dragged or
    /// dropped onto.
    fn is_disabled(&self) -> bool {
        false
    }
}

/// A node in a caller-supplied hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub id: String,
    pub label: String,
    /// Opaque presentation handle (icon name, glyph, asset key...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl TreeNode {
    /// Create a node without children.
    pub fn leaf(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon: None,
            children: Vec::new(),
            disabled: false,
            metadata: None,
        }
    }

    /// Create a node with children.
    pub fn branch(
        id: impl Into<String>,
        label: impl Into<String>,
        children: Vec<TreeNode>,
    ) -> Self {
        Self {
            children,
            ..Self::leaf(id, label)
        }
    }

    /// Set the icon handle.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Mark this node as disabled.
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Attach an opaque metadata value.
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

impl TreeItem for TreeNode {
    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn children(&self) -> &[Self] {
        &self.children
    }

    fn is_disabled(&self) -> bool {
        self.disabled
    }
}

/// Check that every id in the hierarchy is non-empty and unique.
pub fn validate<T: TreeItem>(roots: &[T]) -> Result<(), TreeError> {
    let mut seen: HashMap<String, Vec<usize>> = HashMap::new();
    let mut address = Vec::new();
    validate_level(roots, None, &mut address, &mut seen)
}

fn validate_level<T: TreeItem>(
    items: &[T],
    parent: Option<&str>,
    address: &mut Vec<usize>,
    seen: &mut HashMap<String, Vec<usize>>,
) -> Result<(), TreeError> {
    for (i, item) in items.iter().enumerate() {
        address.push(i);
        let id = item.id();
        if id.is_empty() {
            return Err(TreeError::empty(parent));
        }
        if let Some(first) = seen.get(id) {
            return Err(TreeError::duplicate(id, first, address));
        }
        seen.insert(id.to_string(), address.clone());
        validate_level(item.children(), Some(id), address, seen)?;
        address.pop();
    }
    Ok(())
}

/// Build a pruned copy of the hierarchy holding only nodes whose id is in `keep`.
///
/// Order and nesting are preserved. A kept node under a dropped parent is
/// dropped with it, so `keep` should be closed under ancestors (search
/// matches plus their ancestors are).
pub fn filter_hierarchy(roots: &[TreeNode], keep: &HashSet<String>) -> Vec<TreeNode> {
    roots
        .iter()
        .filter(|node| keep.contains(&node.id))
        .map(|node| TreeNode {
            id: node.id.clone(),
            label: node.label.clone(),
            icon: node.icon.clone(),
            children: filter_hierarchy(&node.children, keep),
            disabled: node.disabled,
            metadata: node.metadata.clone(),
        })
        .collect()
}
