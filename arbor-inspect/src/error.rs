//! Inspector error types

use arbor::{KeyParseError, TreeError};

/// Error raised while loading a document or replaying a script.
#[derive(Debug, thiserror::Error)]
pub enum InspectError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid document: {0}")]
    Json(#[from] serde_json::Error),

    /// A script line that could not be parsed.
    #[error("Line {line}: {message}")]
    Script { line: usize, message: String },

    #[error("Invalid hierarchy: {0}")]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Key(#[from] KeyParseError),

    /// A command was given the wrong arguments.
    #[error("Usage: {0}")]
    Usage(String),
}

impl InspectError {
    /// Creates a usage error from the expected command syntax.
    pub fn usage(syntax: impl Into<String>) -> Self {
        Self::Usage(syntax.into())
    }

    /// Pins a command error to the script line it came from.
    pub fn at(self, line: usize) -> Self {
        match self {
            Self::Script { message, .. } => Self::Script { line, message },
            Self::Key(_) | Self::Usage(_) => Self::Script {
                line,
                message: self.to_string(),
            },
            other => other,
        }
    }
}
