//! Gesture script parsing.
//!
//! One command per line; blank lines and lines starting with `#` are
//! skipped.
//!
//! ```text
//! click <id> [ctrl|cmd|shift|ctrl+shift]
//! key <combo>            # row focus, e.g. `key shift+down`
//! search-key <combo>     # search input focus
//! search [query...]      # empty clears
//! expand <id> | collapse <id> | toggle <id>
//! expand-all | collapse-all | reveal <id>
//! select <id> | range <from> <to> | select-all | clear
//! focus <down|up> | select-focused
//! drag <id> | over <id> <y> | drop <id> <y> | cancel
//! show | state
//! ```

use arbor::{FocusDirection, KeyCombo, Modifiers};

use crate::error::InspectError;

/// One parsed script line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Click { id: String, modifiers: Modifiers },
    Key(KeyCombo),
    SearchKey(KeyCombo),
    Search(String),
    Expand(String),
    Collapse(String),
    Toggle(String),
    ExpandAll,
    CollapseAll,
    Reveal(String),
    Select(String),
    Range { from: String, to: String },
    SelectAll,
    Clear,
    Focus(FocusDirection),
    SelectFocused,
    Drag(String),
    Over { id: String, y: f32 },
    Drop { id: String, y: f32 },
    Cancel,
    Show,
    State,
}

impl Command {
    /// Parse a single line. Returns `Ok(None)` for blanks and comments.
    pub fn parse(line: &str) -> Result<Option<Self>, InspectError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let (name, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let args: Vec<&str> = rest.split_whitespace().collect();

        let command = match name {
            "click" => match args.as_slice() {
                [id] => Self::Click {
                    id: id.to_string(),
                    modifiers: Modifiers::NONE,
                },
                [id, mods] => Self::Click {
                    id: id.to_string(),
                    modifiers: parse_modifiers(mods)?,
                },
                _ => return Err(InspectError::usage("click <id> [modifiers]")),
            },
            "key" => Self::Key(combo_arg(rest, "key <combo>")?),
            "search-key" => Self::SearchKey(combo_arg(rest, "search-key <combo>")?),
            "search" => Self::Search(rest.to_string()),
            "expand" => Self::Expand(one(&args, "expand <id>")?),
            "collapse" => Self::Collapse(one(&args, "collapse <id>")?),
            "toggle" => Self::Toggle(one(&args, "toggle <id>")?),
            "expand-all" => Self::ExpandAll,
            "collapse-all" => Self::CollapseAll,
            "reveal" => Self::Reveal(one(&args, "reveal <id>")?),
            "select" => Self::Select(one(&args, "select <id>")?),
            "range" => match args.as_slice() {
                [from, to] => Self::Range {
                    from: from.to_string(),
                    to: to.to_string(),
                },
                _ => return Err(InspectError::usage("range <from> <to>")),
            },
            "select-all" => Self::SelectAll,
            "clear" => Self::Clear,
            "focus" => match args.as_slice() {
                ["down"] => Self::Focus(FocusDirection::Down),
                ["up"] => Self::Focus(FocusDirection::Up),
                _ => return Err(InspectError::usage("focus <down|up>")),
            },
            "select-focused" => Self::SelectFocused,
            "drag" => Self::Drag(one(&args, "drag <id>")?),
            "over" => {
                let (id, y) = point(&args, "over <id> <y>")?;
                Self::Over { id, y }
            }
            "drop" => {
                let (id, y) = point(&args, "drop <id> <y>")?;
                Self::Drop { id, y }
            }
            "cancel" => Self::Cancel,
            "show" => Self::Show,
            "state" => Self::State,
            other => {
                return Err(InspectError::Script {
                    line: 0,
                    message: format!("Unknown command '{}'", other),
                });
            }
        };
        Ok(Some(command))
    }
}

/// Parse a whole script, keeping 1-based line numbers.
pub fn parse_script(source: &str) -> Result<Vec<(usize, Command)>, InspectError> {
    let mut commands = Vec::new();
    for (i, line) in source.lines().enumerate() {
        let number = i + 1;
        match Command::parse(line) {
            Ok(Some(command)) => commands.push((number, command)),
            Ok(None) => {}
            Err(e) => return Err(e.at(number)),
        }
    }
    Ok(commands)
}

fn one(args: &[&str], syntax: &str) -> Result<String, InspectError> {
    match args {
        [id] => Ok(id.to_string()),
        _ => Err(InspectError::usage(syntax)),
    }
}

fn combo_arg(rest: &str, syntax: &str) -> Result<KeyCombo, InspectError> {
    if rest.is_empty() {
        return Err(InspectError::usage(syntax));
    }
    Ok(rest.parse()?)
}

fn point(args: &[&str], syntax: &str) -> Result<(String, f32), InspectError> {
    let [id, y] = args else {
        return Err(InspectError::usage(syntax));
    };
    let y: f32 = y.parse().map_err(|_| InspectError::usage(syntax))?;
    if !(0.0..=1.0).contains(&y) {
        return Err(InspectError::usage(format!("{} (y between 0 and 1)", syntax)));
    }
    Ok((id.to_string(), y))
}

fn parse_modifiers(text: &str) -> Result<Modifiers, InspectError> {
    let mut modifiers = Modifiers::NONE;
    for part in text.split('+') {
        match part.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => modifiers.ctrl = true,
            "cmd" | "meta" => modifiers.meta = true,
            "shift" => modifiers.shift = true,
            "alt" => modifiers.alt = true,
            other => {
                return Err(InspectError::Key(arbor::KeyParseError::UnknownModifier(
                    other.to_string(),
                )));
            }
        }
    }
    Ok(modifiers)
}
