//! Inline search with ancestor-preserving filtering.

use std::collections::HashSet;

use nucleo_matcher::pattern::{Atom, AtomKind, CaseMatching, Normalization};
use nucleo_matcher::{Config, Matcher, Utf32Str};

use crate::expansion::Expansion;
use crate::flatten::{FlatNode, FlatTree};

/// Case-insensitive substring matcher over node labels.
pub struct LabelMatcher {
    atom: Atom,
    matcher: Matcher,
    buf: Vec<char>,
}

impl LabelMatcher {
    pub fn new(query: &str) -> Self {
        Self {
            atom: Atom::new(
                query,
                CaseMatching::Ignore,
                Normalization::Never,
                AtomKind::Substring,
                false,
            ),
            matcher: Matcher::new(Config::DEFAULT),
            buf: Vec::new(),
        }
    }

    pub fn is_match(&mut self, label: &str) -> bool {
        let haystack = Utf32Str::new(label, &mut self.buf);
        self.atom.score(haystack, &mut self.matcher).is_some()
    }
}

/// Query, derived match/ancestor sets, and the pre-search expansion snapshot.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    query: String,
    /// Matching ids in flattened pre-order.
    matches: Vec<String>,
    match_set: HashSet<String>,
    ancestors: HashSet<String>,
    snapshot: Option<HashSet<String>>,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Whether a non-empty query is active.
    pub fn is_active(&self) -> bool {
        !self.query.is_empty()
    }

    pub fn matches(&self) -> &[String] {
        &self.matches
    }

    pub fn is_match(&self, id: &str) -> bool {
        self.match_set.contains(id)
    }

    pub fn ancestors(&self) -> &HashSet<String> {
        &self.ancestors
    }

    /// Whether a pre-search expansion snapshot is being held.
    pub fn has_snapshot(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Recompute for a new query or hierarchy.
    ///
    /// An empty query restores the expansion snapshot (if one was taken) and
    /// clears the derived sets. The first non-empty query after an empty one
    /// snapshots `expansion`; every non-empty query then expands the ancestor
    /// closure of its matches on top of the current state.
    pub fn apply(&mut self, query: &str, flat: &FlatTree, expansion: &mut Expansion) {
        self.query = query.to_string();
        self.matches.clear();
        self.match_set.clear();
        self.ancestors.clear();

        if query.is_empty() {
            if let Some(snapshot) = self.snapshot.take() {
                expansion.restore(snapshot);
            }
            return;
        }

        if self.snapshot.is_none() {
            self.snapshot = Some(expansion.snapshot());
        }

        let mut matcher = LabelMatcher::new(query);
        for node in flat.nodes() {
            if matcher.is_match(&node.label) {
                self.matches.push(node.id.clone());
                self.match_set.insert(node.id.clone());
                self.ancestors.extend(node.ancestors().iter().cloned());
            }
        }
        expansion.extend(&self.ancestors);
    }

    /// Whether `id` belongs to the filtered view (a match or an ancestor of one).
    pub fn keeps(&self, id: &str) -> bool {
        self.match_set.contains(id) || self.ancestors.contains(id)
    }

    /// Matches plus their ancestors.
    pub fn kept_ids(&self) -> HashSet<String> {
        self.match_set.union(&self.ancestors).cloned().collect()
    }

    /// The filtered view in pre-order, or every node when no query is active.
    pub fn filtered_nodes<'a>(&self, flat: &'a FlatTree) -> Vec<&'a FlatNode> {
        if !self.is_active() {
            return flat.nodes().iter().collect();
        }
        flat.nodes().iter().filter(|n| self.keeps(&n.id)).collect()
    }

    /// Matches a keyboard user can land on: everything but disabled nodes.
    pub fn focusable_matches(&self, flat: &FlatTree) -> Vec<String> {
        self.matches
            .iter()
            .filter(|id| flat.is_enabled(id))
            .cloned()
            .collect()
    }

    /// Drop snapshot ids that no longer name an enabled parent.
    pub fn retain_snapshot(&mut self, flat: &FlatTree) {
        if let Some(snapshot) = &mut self.snapshot {
            snapshot.retain(|id| Expansion::expandable(id, flat));
        }
    }
}

impl std::fmt::Debug for LabelMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelMatcher").finish_non_exhaustive()
    }
}
