//! Error types for hierarchy validation.

/// Error returned when a caller-supplied hierarchy breaks the id contract.
///
/// Gestures never fail; only loading a hierarchy through the checked
/// constructors can produce one of these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// Two nodes in the hierarchy share the same id.
    #[error("Duplicate node id '{id}' (first seen at {first}, again at {second})")]
    DuplicateId {
        id: String,
        first: String,
        second: String,
    },

    /// A node has an empty id.
    #[error("Node with empty id under '{parent}'")]
    EmptyId { parent: String },
}

impl TreeError {
    /// Creates a duplicate id error from the two conflicting locations.
    pub fn duplicate(id: impl Into<String>, first: &[usize], second: &[usize]) -> Self {
        Self::DuplicateId {
            id: id.into(),
            first: format_address(first),
            second: format_address(second),
        }
    }

    /// Creates an empty id error for a node under `parent` (root level if `None`).
    pub fn empty(parent: Option<&str>) -> Self {
        Self::EmptyId {
            parent: parent.unwrap_or("<root>").to_string(),
        }
    }
}

fn format_address(address: &[usize]) -> String {
    let parts: Vec<String> = address.iter().map(|i| i.to_string()).collect();
    format!("[{}]", parts.join("/"))
}
