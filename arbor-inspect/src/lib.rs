//! Gesture replay for `arbor` trees.
//!
//! Loads a hierarchy and configuration from JSON, replays a line-based
//! gesture script against a [`Tree`](arbor::Tree), and prints every callback
//! the engine fires as a JSON line.

pub mod error;
pub mod inspector;
pub mod script;

pub use error::InspectError;
pub use inspector::{Document, Inspector, Snapshot};
pub use script::{Command, parse_script};
