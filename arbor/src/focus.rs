//! Keyboard focus over search matches.

use serde::{Deserialize, Serialize};

/// Direction of a focus move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusDirection {
    /// Towards later matches (ArrowDown).
    Down,
    /// Towards earlier matches (ArrowUp).
    Up,
}

/// Focus state over an ordered list of candidate ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchFocus {
    /// Currently focused match
    focused: Option<String>,
}

impl MatchFocus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    pub fn is_focused(&self, id: &str) -> bool {
        self.focused.as_deref() == Some(id)
    }

    pub fn clear(&mut self) {
        self.focused = None;
    }

    /// Move focus one step through `candidates`, wrapping at both ends.
    ///
    /// With nothing focused, `Down` lands on the first candidate and `Up` on
    /// the last. Returns the newly focused id, `None` if there are no
    /// candidates.
    pub fn move_focus(&mut self, direction: FocusDirection, candidates: &[String]) -> Option<&str> {
        if candidates.is_empty() {
            self.focused = None;
            return None;
        }

        let len = candidates.len();
        let current_idx = self
            .focused
            .as_ref()
            .and_then(|c| candidates.iter().position(|id| id == c));

        let next_idx = match (current_idx, direction) {
            (Some(idx), FocusDirection::Down) => (idx + 1) % len,
            (Some(idx), FocusDirection::Up) => (idx + len - 1) % len,
            (None, FocusDirection::Down) => 0,
            (None, FocusDirection::Up) => len - 1,
        };

        self.focused = Some(candidates[next_idx].clone());
        self.focused.as_deref()
    }

    /// Forget the focused id if it is no longer a candidate.
    pub fn sync(&mut self, candidates: &[String]) {
        if let Some(ref current) = self.focused
            && !candidates.contains(current)
        {
            self.focused = None;
        }
    }
}
