//! Replays commands against a tree and reports what it emits.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};

use arbor::prelude::*;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::InspectError;
use crate::script::{Command, parse_script};

/// The JSON input: a hierarchy plus its configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub config: TreeConfig,
    pub nodes: Vec<TreeNode>,
}

impl Document {
    pub fn load(path: &Path) -> Result<Self, InspectError> {
        let source = fs::read_to_string(path)?;
        let document: Document = serde_json::from_str(&source)?;
        info!(
            "Loaded {} root nodes from {}",
            document.nodes.len(),
            path.display()
        );
        Ok(document)
    }
}

/// Point-in-time view of the engine state, printed by `state`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub selected: Vec<String>,
    pub anchor: Option<String>,
    pub expanded: Vec<String>,
    pub query: String,
    pub matches: Vec<String>,
    pub ancestors: Vec<String>,
    pub focused: Option<String>,
    pub cursor: Option<String>,
    pub dragging: Option<String>,
    pub drop_indicator: Option<DropIndicator>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DropIndicator {
    pub target_id: String,
    pub position: DropPosition,
}

/// A tree wired to an event log.
pub struct Inspector {
    tree: Tree<TreeNode>,
    events: Arc<Mutex<Vec<TreeEvent>>>,
}

impl Inspector {
    /// Build a tree from `document`, rejecting duplicate or empty ids.
    pub fn new(document: Document) -> Result<Self, InspectError> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let tree = Tree::try_with_items(document.nodes)?.with_config(document.config);

        let sink = Arc::clone(&events);
        let tree = tree.on_select(move |ids| {
            record(&sink, TreeEvent::Select { ids: ids.to_vec() })
        });
        let sink = Arc::clone(&events);
        let tree = tree.on_expand(move |id, expanded| {
            record(
                &sink,
                TreeEvent::Expand {
                    id: id.to_string(),
                    expanded,
                },
            )
        });
        let sink = Arc::clone(&events);
        let tree = tree.on_drop(move |dragged, target, position| {
            record(
                &sink,
                TreeEvent::Drop {
                    dragged_id: dragged.to_string(),
                    target_id: target.to_string(),
                    position,
                },
            )
        });
        let sink = Arc::clone(&events);
        let tree = tree.on_search(move |query| {
            record(
                &sink,
                TreeEvent::Search {
                    query: query.to_string(),
                },
            )
        });

        Ok(Self { tree, events })
    }

    pub fn tree(&self) -> &Tree<TreeNode> {
        &self.tree
    }

    /// Parse and replay a whole script, writing events and reports to `out`.
    pub fn run(&self, script: &str, out: &mut impl Write) -> Result<(), InspectError> {
        let commands = parse_script(script)?;
        info!("Replaying {} commands against {}", commands.len(), self.tree.id());
        for (line, command) in &commands {
            debug!("line {}: {:?}", line, command);
            self.execute(command, out)?;
        }
        Ok(())
    }

    /// Apply one command, then print every event it produced as a JSON line.
    pub fn execute(&self, command: &Command, out: &mut impl Write) -> Result<(), InspectError> {
        let tree = &self.tree;
        match command {
            Command::Click { id, modifiers } => {
                tree.on_click(id, *modifiers);
            }
            Command::Key(combo) => {
                tree.on_key(combo);
            }
            Command::SearchKey(combo) => {
                tree.on_search_key(combo);
            }
            Command::Search(query) => {
                tree.set_query(query);
            }
            Command::Expand(id) => {
                tree.set_expanded(id, true);
            }
            Command::Collapse(id) => {
                tree.set_expanded(id, false);
            }
            Command::Toggle(id) => {
                tree.toggle_expanded(id);
            }
            Command::ExpandAll => tree.expand_all(),
            Command::CollapseAll => tree.collapse_all(),
            Command::Reveal(id) => tree.reveal(id),
            Command::Select(id) => {
                tree.select_single(id);
            }
            Command::Range { from, to } => {
                tree.select_range(from, to);
            }
            Command::SelectAll => {
                tree.select_all();
            }
            Command::Clear => {
                tree.clear_selection();
            }
            Command::Focus(direction) => {
                tree.move_focus(*direction);
            }
            Command::SelectFocused => {
                tree.select_focused();
            }
            Command::Drag(id) => {
                tree.drag_start(id);
            }
            Command::Over { id, y } => {
                tree.drag_over(id, *y);
            }
            Command::Drop { id, y } => {
                tree.drop_on(id, *y);
            }
            Command::Cancel => tree.cancel_drag(),
            Command::Show => {}
            Command::State => {}
        }

        for event in self.drain() {
            writeln!(out, "{}", serde_json::to_string(&event)?)?;
        }
        match command {
            Command::Show => write!(out, "{}", self.render())?,
            Command::State => writeln!(out, "{}", serde_json::to_string(&self.snapshot())?)?,
            _ => {}
        }
        Ok(())
    }

    fn drain(&self) -> Vec<TreeEvent> {
        self.events
            .lock()
            .map(|mut events| std::mem::take(&mut *events))
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> Snapshot {
        let tree = &self.tree;
        Snapshot {
            selected: tree.selected_ids(),
            anchor: tree.anchor_id(),
            expanded: tree.expanded_ids(),
            query: tree.query(),
            matches: tree.matches(),
            ancestors: tree.ancestor_ids(),
            focused: tree.focused_match(),
            cursor: tree.cursor_id(),
            dragging: tree.dragged_id(),
            drop_indicator: tree
                .drop_indicator()
                .map(|(target_id, position)| DropIndicator {
                    target_id,
                    position,
                }),
        }
    }

    /// The visible rows as indented text.
    ///
    /// `+`/`-` mark collapsed/expanded parents; flags in brackets follow the
    /// label.
    pub fn render(&self) -> String {
        let tree = &self.tree;
        let focused = tree.focused_match();
        let cursor = tree.cursor_id();
        let indicator = tree.drop_indicator();

        let mut out = String::new();
        for row in tree.visible_nodes() {
            let chevron = match (row.has_children, tree.is_expanded(&row.id)) {
                (false, _) => ' ',
                (true, false) => '+',
                (true, true) => '-',
            };
            let mut flags = Vec::new();
            if cursor.as_deref() == Some(row.id.as_str()) {
                flags.push("cursor".to_string());
            }
            if tree.is_selected(&row.id) {
                flags.push("selected".to_string());
            }
            if row.disabled {
                flags.push("disabled".to_string());
            }
            if tree.is_match(&row.id) {
                flags.push("match".to_string());
            }
            if focused.as_deref() == Some(row.id.as_str()) {
                flags.push("focused".to_string());
            }
            if let Some((target, position)) = &indicator
                && *target == row.id
            {
                flags.push(format!("drop {}", position));
            }

            let indent = "  ".repeat(row.level as usize);
            out.push_str(&format!("{}{} {} ({})", indent, chevron, row.label, row.id));
            if !flags.is_empty() {
                out.push_str(&format!(" [{}]", flags.join(", ")));
            }
            out.push('\n');
        }
        out
    }
}

fn record(sink: &Mutex<Vec<TreeEvent>>, event: TreeEvent) {
    if let Ok(mut events) = sink.lock() {
        events.push(event);
    }
}
