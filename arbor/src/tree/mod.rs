//! The tree engine instance.
//!
//! A [`Tree`] owns the derived state for one rendered tree: the flattened
//! hierarchy, selection, expansion, search, match focus, row cursor and the
//! in-progress drag. Hosts feed it gestures (`on_click`, `on_key`,
//! `on_search_key`, the [`DragDropTarget`](crate::DragDropTarget) methods)
//! and read back what to paint.
//!
//! # Example
//!
//! ```ignore
//! use arbor::prelude::*;
//!
//! let roots = vec![TreeNode::branch("root", "Root", vec![
//!     TreeNode::branch("a", "A", vec![TreeNode::leaf("a1", "A1")]),
//!     TreeNode::leaf("b", "B"),
//! ])];
//!
//! let tree = Tree::with_items(roots)
//!     .with_config(TreeConfig::new().searchable(true).expanded(["root"]))
//!     .on_select(|ids| println!("selected {ids:?}"))
//!     .on_drop(|dragged, target, position| println!("{dragged} -> {position} {target}"));
//!
//! tree.on_click("a", Modifiers::NONE);
//! tree.set_query("a1");
//! ```

mod dnd;
mod events;
mod state;

pub use state::{Tree, TreeId};
