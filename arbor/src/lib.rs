//! Headless engine for hierarchical explorer widgets.
//!
//! `arbor` owns the state behind a tree view: the flattened projection of a
//! caller-supplied hierarchy, selection (single, toggle and range),
//! expand/collapse, inline search with ancestor-preserving filtering, match
//! focus traversal, and drag/drop intent classification with cycle
//! rejection. Painting rows is left to the host; it reads state from a
//! [`Tree`] and feeds user gestures back into it.

pub mod config;
pub mod drag;
pub mod error;
pub mod events;
pub mod expansion;
pub mod flatten;
pub mod focus;
pub mod input;
pub mod node;
pub mod search;
pub mod selection;
pub mod tree;

pub use config::TreeConfig;
pub use drag::{DragDropTarget, DragPayload, DropPosition};
pub use error::TreeError;
pub use events::{EventResult, TreeEvent};
pub use flatten::{FlatNode, FlatTree};
pub use focus::FocusDirection;
pub use input::{Key, KeyCombo, KeyParseError, Modifiers};
pub use node::{TreeItem, TreeNode};
pub use tree::{Tree, TreeId};

pub mod prelude {
    pub use crate::config::TreeConfig;
    pub use crate::drag::{DragDropTarget, DragPayload, DropPosition};
    pub use crate::error::TreeError;
    pub use crate::events::{EventResult, TreeEvent};
    pub use crate::flatten::FlatNode;
    pub use crate::focus::FocusDirection;
    pub use crate::input::{Key, KeyCombo, Modifiers};
    pub use crate::node::{TreeItem, TreeNode};
    pub use crate::tree::{Tree, TreeId};
}
