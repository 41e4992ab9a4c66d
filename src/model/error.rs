//! Error types for catnav.
//!
//! This module defines the error taxonomy using `thiserror`. Errors compose via
//! `?` and `From` conversions up to [`AppError`], which only the shell uses.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level shell error wrapping every failure mode
//!   - [`CatalogError`] - Catalog file unreadable or structurally invalid (fatal)
//!   - [`NavigationError`] - Navigation target absent or nothing to go back to
//!   - [`SelectionError`] - Selection group operation that cannot be applied
//!   - [`CoordinationError`] - Mediator dispatch failures (reentrancy, runaway cascades)
//!   - [`InputError`] - Command script could not be read
//!   - `CommandError` - A script line is not a valid command
//!
//! # Recovery Strategy
//!
//! Navigation, selection and coordination errors are **recoverable by design**:
//! the state is left untouched, the failure is logged, and the caller decides
//! what to show. Catalog errors are construction-time preconditions and abort
//! the shell.

use super::identifiers::{GroupName, InvalidId, NodeId};
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error for the `catnav` binary.
#[derive(Debug, Error)]
pub enum AppError {
    /// The catalog could not be loaded.
    #[error("Failed to load catalog: {0}")]
    Catalog(#[from] CatalogError),

    /// No catalog path was given anywhere.
    #[error("No catalog given: pass a path, set CATNAV_CATALOG, or set `catalog` in the config file")]
    MissingCatalog,

    /// Configuration could not be resolved.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Tracing could not be initialized.
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LoggingError),

    /// A command line could not be parsed.
    #[error("Invalid command: {0}")]
    Command(#[from] crate::command::CommandError),

    /// A command was rejected by the coordinator.
    #[error(transparent)]
    Coordination(#[from] CoordinationError),

    /// Command input could not be read.
    #[error("Failed to read commands: {0}")]
    Input(#[from] InputError),

    /// Session snapshot could not be saved or loaded.
    #[error("State store error: {0}")]
    Store(#[from] crate::store::StoreError),

    /// Writing output failed.
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

/// Failures building a [`CatalogTree`](super::CatalogTree).
///
/// All of these are preconditions: a session cannot start without a valid tree.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("Failed to read catalog at {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The catalog document is not valid JSON for the node shape.
    #[error("Invalid catalog JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The document is empty or has no root object.
    #[error("Catalog has no root node")]
    MissingRoot,

    /// The top-level node is not of kind `root`.
    #[error("Catalog root '{id}' has kind '{kind}', expected 'root'")]
    RootKind {
        /// Id of the offending top-level node.
        id: String,
        /// Kind it declared.
        kind: &'static str,
    },

    /// A node has an empty id.
    #[error("Catalog node has an empty id (child {position} of '{parent}')")]
    EmptyId {
        /// Id of the parent node.
        parent: String,
        /// Zero-based position among the parent's children.
        position: usize,
    },

    /// Two nodes share an id.
    #[error("Duplicate catalog node id '{0}'")]
    DuplicateId(String),

    /// A non-root node declares kind `root`.
    #[error("Node '{0}' declares kind 'root' but is not the tree root")]
    NestedRoot(String),
}

/// Navigation failures. Always reported, never fatal; state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    /// The requested node is not a child of the current node (or not in the tree).
    #[error("Node not found: {id}")]
    NodeNotFound {
        /// The id that could not be resolved.
        id: String,
    },

    /// Back was requested with an empty breadcrumb stack.
    #[error("Nothing to go back to")]
    NothingToGoBack,
}

impl NavigationError {
    pub(crate) fn not_found(id: impl Into<String>) -> Self {
        Self::NodeNotFound { id: id.into() }
    }
}

impl From<&NodeId> for NavigationError {
    fn from(id: &NodeId) -> Self {
        Self::not_found(id.as_str())
    }
}

/// Selection ledger failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// A value cannot be applied to a group as configured.
    #[error("Invalid operation on group '{group}': {reason}")]
    InvalidGroupOperation {
        /// The group involved.
        group: GroupName,
        /// What was wrong.
        reason: String,
    },

    /// An item or group identifier was empty.
    #[error(transparent)]
    InvalidId(#[from] InvalidId),
}

/// Which stateful component a notification or command belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Component {
    /// The navigation state machine.
    Navigation,
    /// The generic selection ledger.
    Selection,
    /// The active filter set.
    Filters,
    /// The search collaborator boundary.
    Search,
}

impl std::fmt::Display for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Component::Navigation => "navigation",
            Component::Selection => "selection",
            Component::Filters => "filters",
            Component::Search => "search",
        };
        f.write_str(name)
    }
}

/// Mediator failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinationError {
    /// A handler tried to mutate the component whose notification is being dispatched.
    #[error("Reentrant mutation of {component} while its notification is being dispatched")]
    Reentrancy {
        /// The component that was busy.
        component: Component,
    },

    /// One command produced more notifications than the dispatch cap.
    #[error("Notification cascade exceeded {limit} notifications")]
    DispatchOverflow {
        /// The cap that was hit.
        limit: usize,
    },

    /// A navigation command issued by a handler failed.
    #[error(transparent)]
    Navigation(#[from] NavigationError),

    /// A selection command issued by a handler failed.
    #[error(transparent)]
    Selection(#[from] SelectionError),
}

/// Errors encountered when reading command input from files or stdin.
#[derive(Debug, Error)]
pub enum InputError {
    /// The specified script file does not exist.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// Generic I/O error reading from the source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
