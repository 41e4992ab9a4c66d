//! Shell command language.
//!
//! One command per line. Words are separated by whitespace; trailing labels
//! and brand keys take the rest of the line so they may contain spaces.
//! Blank lines and lines starting with `#` carry no command.
//!
//! ```text
//! open longe          # card click on a child of the current node
//! go longe-zeiss      # drill into a child
//! filter add material material-trivex Trivex
//! select tratamento polimento Polimento
//! show
//! ```

use crate::model::{FilterKind, GroupName, InvalidId, ItemId, SelectionItem, UnknownFilterKind};
use thiserror::Error;

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Card click on a child of the current node.
    Open(String),
    /// Drill into a child of the current node.
    Go(String),
    /// Return to the previous node.
    Back,
    /// Jump to the breadcrumb at this 1-based ordinal.
    Level(usize),
    /// Back to the root, clearing the navigation context.
    Home,
    /// Back to the root silently.
    Root,
    /// Jump to any node by id.
    Jump(String),
    /// Open a category from the root with filters cleared.
    Category(String),
    /// Open a configuration subtree from the root.
    Setup(String),
    /// Toggle a configuration option by node id.
    Config(String),
    /// Toggle a product by node id.
    Product(String),
    /// Remove a selected product by brand key.
    Unproduct(String),
    /// Add an active filter.
    FilterAdd {
        /// Filter dimension.
        kind: FilterKind,
        /// Item to add.
        item: SelectionItem,
    },
    /// Remove an active filter, rolling navigation back for unique kinds.
    FilterRemove {
        /// Filter dimension.
        kind: FilterKind,
        /// Item to remove.
        id: ItemId,
    },
    /// Clear every filter and product, then go home.
    Clear,
    /// Select an item in a ledger group.
    Select {
        /// Ledger group.
        group: GroupName,
        /// Item to select.
        item: SelectionItem,
    },
    /// Deselect an item from a ledger group.
    Deselect {
        /// Ledger group.
        group: GroupName,
        /// Item to remove.
        id: ItemId,
    },
    /// Flip an item in a ledger group.
    Toggle {
        /// Ledger group.
        group: GroupName,
        /// Item to flip.
        item: SelectionItem,
    },
    /// Empty one ledger group.
    ClearGroup(GroupName),
    /// Empty the whole ledger.
    ClearSelections,
    /// Report required groups that are still empty.
    Validate,
    /// Print the session view.
    Show,
    /// Write the session snapshot.
    Save,
}

impl Command {
    /// Keyword as written in scripts, for diagnostics.
    pub fn keyword(&self) -> &'static str {
        match self {
            Command::Open(_) => "open",
            Command::Go(_) => "go",
            Command::Back => "back",
            Command::Level(_) => "level",
            Command::Home => "home",
            Command::Root => "root",
            Command::Jump(_) => "jump",
            Command::Category(_) => "category",
            Command::Setup(_) => "setup",
            Command::Config(_) => "config",
            Command::Product(_) => "product",
            Command::Unproduct(_) => "unproduct",
            Command::FilterAdd { .. } => "filter add",
            Command::FilterRemove { .. } => "filter rm",
            Command::Clear => "clear",
            Command::Select { .. } => "select",
            Command::Deselect { .. } => "deselect",
            Command::Toggle { .. } => "toggle",
            Command::ClearGroup(_) => "clear-group",
            Command::ClearSelections => "clear-selections",
            Command::Validate => "validate",
            Command::Show => "show",
            Command::Save => "save",
        }
    }
}

/// Errors parsing one command line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The first word is not a known command.
    #[error("Unknown command '{0}'")]
    Unknown(String),

    /// A required argument is absent.
    #[error("'{command}' expects {expected}")]
    MissingArgument {
        /// Command keyword.
        command: &'static str,
        /// What was expected.
        expected: &'static str,
    },

    /// The command takes no further arguments.
    #[error("'{command}' takes no argument, got '{extra}'")]
    UnexpectedArgument {
        /// Command keyword.
        command: &'static str,
        /// Extra text found.
        extra: String,
    },

    /// A level ordinal was not a positive integer.
    #[error("Invalid level '{0}': expected a positive integer")]
    InvalidLevel(String),

    /// Filter kind name not recognized.
    #[error(transparent)]
    FilterKind(#[from] UnknownFilterKind),

    /// Identifier or group name was empty.
    #[error(transparent)]
    InvalidId(#[from] InvalidId),
}

/// Parse one line. `Ok(None)` for blank lines and comments.
///
/// # Errors
///
/// Returns a [`CommandError`] describing the first problem found.
pub fn parse_line(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (keyword, rest) = split_word(line);
    let command = match keyword {
        "open" => Command::Open(word(rest, "open", "a node id")?),
        "go" => Command::Go(word(rest, "go", "a node id")?),
        "back" => no_args(rest, "back", Command::Back)?,
        "level" => {
            let raw = word(rest, "level", "an ordinal")?;
            match raw.parse::<usize>() {
                Ok(ordinal) if ordinal > 0 => Command::Level(ordinal),
                _ => return Err(CommandError::InvalidLevel(raw)),
            }
        }
        "home" => no_args(rest, "home", Command::Home)?,
        "root" => no_args(rest, "root", Command::Root)?,
        "jump" => Command::Jump(word(rest, "jump", "a node id")?),
        "category" => Command::Category(word(rest, "category", "a node id")?),
        "setup" => Command::Setup(word(rest, "setup", "a node id")?),
        "config" => Command::Config(word(rest, "config", "a node id")?),
        "product" => Command::Product(word(rest, "product", "a node id")?),
        "unproduct" => Command::Unproduct(tail(rest, "unproduct", "a brand key")?),
        "filter" => parse_filter(rest)?,
        "clear" => no_args(rest, "clear", Command::Clear)?,
        "select" => {
            let (group, item) = group_and_item(rest, "select")?;
            Command::Select { group, item }
        }
        "deselect" => {
            let (group, rest) = group_arg(rest, "deselect")?;
            let id = ItemId::new(word(rest, "deselect", "a group and an item id")?)?;
            Command::Deselect { group, id }
        }
        "toggle" => {
            let (group, item) = group_and_item(rest, "toggle")?;
            Command::Toggle { group, item }
        }
        "clear-group" => {
            let (group, rest) = group_arg(rest, "clear-group")?;
            no_args(rest, "clear-group", Command::ClearGroup(group))?
        }
        "clear-selections" => no_args(rest, "clear-selections", Command::ClearSelections)?,
        "validate" => no_args(rest, "validate", Command::Validate)?,
        "show" => no_args(rest, "show", Command::Show)?,
        "save" => no_args(rest, "save", Command::Save)?,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn parse_filter(rest: &str) -> Result<Command, CommandError> {
    let (action, rest) = split_word(rest);
    let command: &'static str = match action {
        "add" => "filter add",
        "rm" => "filter rm",
        "" => {
            return Err(CommandError::MissingArgument {
                command: "filter",
                expected: "'add' or 'rm'",
            })
        }
        other => return Err(CommandError::Unknown(format!("filter {other}"))),
    };
    let (kind, rest) = split_word(rest);
    if kind.is_empty() {
        return Err(CommandError::MissingArgument {
            command,
            expected: "a filter kind and an item id",
        });
    }
    let kind: FilterKind = kind.parse()?;
    if action == "add" {
        let item = item_arg(rest, command)?;
        Ok(Command::FilterAdd { kind, item })
    } else {
        let id = ItemId::new(word(rest, command, "a filter kind and an item id")?)?;
        Ok(Command::FilterRemove { kind, id })
    }
}

fn group_arg<'a>(rest: &'a str, command: &'static str) -> Result<(GroupName, &'a str), CommandError> {
    let (group, rest) = split_word(rest);
    if group.is_empty() {
        return Err(CommandError::MissingArgument {
            command,
            expected: "a group name",
        });
    }
    Ok((GroupName::new(group)?, rest))
}

fn group_and_item(
    rest: &str,
    command: &'static str,
) -> Result<(GroupName, SelectionItem), CommandError> {
    let (group, rest) = group_arg(rest, command)?;
    Ok((group, item_arg(rest, command)?))
}

/// `<id> [label...]`
fn item_arg(rest: &str, command: &'static str) -> Result<SelectionItem, CommandError> {
    let (id, label) = split_word(rest);
    if id.is_empty() {
        return Err(CommandError::MissingArgument {
            command,
            expected: "an item id",
        });
    }
    let item = SelectionItem::new(id)?;
    Ok(if label.is_empty() {
        item
    } else {
        item.with_label(label)
    })
}

fn split_word(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    match text.find(char::is_whitespace) {
        Some(end) => (&text[..end], text[end..].trim()),
        None => (text, ""),
    }
}

fn word(rest: &str, command: &'static str, expected: &'static str) -> Result<String, CommandError> {
    let (first, extra) = split_word(rest);
    if first.is_empty() {
        return Err(CommandError::MissingArgument { command, expected });
    }
    if !extra.is_empty() {
        return Err(CommandError::UnexpectedArgument {
            command,
            extra: extra.to_string(),
        });
    }
    Ok(first.to_string())
}

fn tail(rest: &str, command: &'static str, expected: &'static str) -> Result<String, CommandError> {
    let rest = rest.trim();
    if rest.is_empty() {
        return Err(CommandError::MissingArgument { command, expected });
    }
    Ok(rest.to_string())
}

fn no_args(rest: &str, command: &'static str, value: Command) -> Result<Command, CommandError> {
    if rest.trim().is_empty() {
        Ok(value)
    } else {
        Err(CommandError::UnexpectedArgument {
            command,
            extra: rest.trim().to_string(),
        })
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
