//! Shell loop: commands in, one JSON line per command out.
//!
//! The loop is generic over its [`LineSource`] and its writer so tests can
//! drive it from memory. Each line is parsed, applied to the coordinator,
//! the in-process search is completed, and a [`Report`] is written.
//! Bad lines and rejected commands are reported and skipped; only input and
//! output failures stop the loop.

use crate::command::{parse_line, Command};
use crate::config::ResolvedConfig;
use crate::mediator::{Activation, Coordinator, UiSink, UiUpdate};
use crate::model::{AppError, CatalogTree, GroupName, SelectedProduct};
use crate::search::LocalCatalogSearch;
use crate::source::{LineSource, SourceLine};
use crate::state::{
    ActiveFilter, ActiveFilterSet, Card, NavigationState, NavigationView, SelectionSnapshot,
    SelectionState,
};
use crate::store::SnapshotStore;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// UI sink that keeps updates until the shell reports them.
#[derive(Debug, Clone, Default)]
pub struct UpdateLog {
    updates: Vec<UiUpdate>,
}

impl UpdateLog {
    /// Updates applied since the last call.
    pub fn take(&mut self) -> Vec<UiUpdate> {
        std::mem::take(&mut self.updates)
    }
}

impl UiSink for UpdateLog {
    fn apply(&mut self, update: UiUpdate) {
        self.updates.push(update);
    }
}

/// Coordinator as the shell runs it.
pub type ShellCoordinator = Coordinator<LocalCatalogSearch, UpdateLog>;

/// Coordinator over `catalog` with the configured groups and default wiring.
pub fn build_coordinator(catalog: Arc<CatalogTree>, config: &ResolvedConfig) -> ShellCoordinator {
    Coordinator::with_default_wiring(
        NavigationState::new(Arc::clone(&catalog)),
        SelectionState::new(config.selection_groups.clone()),
        ActiveFilterSet::new(),
        config.config_groups.clone(),
        LocalCatalogSearch::new(catalog),
        UpdateLog::default(),
    )
}

// ===== Reports =====

/// Everything a consumer needs to render the session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    /// Navigation position.
    pub navigation: NavigationView,
    /// Children of the current node.
    pub cards: Vec<Card>,
    /// Active filters, unique first.
    pub filters: Vec<ActiveFilter>,
    /// Directly-selected products.
    pub products: Vec<SelectedProduct>,
    /// Filters plus products.
    pub filter_count: usize,
    /// Generic ledger contents.
    pub selections: SelectionSnapshot,
    /// Required ledger groups still empty.
    pub missing: Vec<GroupName>,
    /// Last search result count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_count: Option<usize>,
}

/// Capture the current session.
pub fn session_view(coordinator: &ShellCoordinator) -> SessionView {
    let navigation = coordinator.navigation();
    let filters = coordinator.filters();
    SessionView {
        navigation: navigation.state(),
        cards: navigation.children_as_cards(),
        filters: filters.active(),
        products: filters.products().to_vec(),
        filter_count: filters.counts().total(),
        selections: coordinator.selection().snapshot(),
        missing: coordinator.selection().validate(),
        result_count: coordinator.context().last_result_count(),
    }
}

/// Command-specific result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum CommandOutcome {
    /// A card or toggle command.
    Activation {
        /// What the activation did.
        #[serde(flatten)]
        activation: Activation,
    },
    /// A ledger toggle.
    Toggled {
        /// Whether the item is now selected.
        selected: bool,
    },
    /// A ledger deselect.
    Deselected {
        /// Whether the item was present.
        removed: bool,
    },
    /// Result of `validate`.
    Validation {
        /// True when no required group is empty.
        valid: bool,
        /// Required groups still empty.
        missing: Vec<GroupName>,
    },
    /// The snapshot was written.
    Saved {
        /// Snapshot file.
        path: PathBuf,
    },
}

/// One output line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Source line number.
    pub line: usize,
    /// Command keyword, absent when the line did not parse.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<&'static str>,
    /// Whether the command applied.
    pub ok: bool,
    /// Why it did not.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Command-specific result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<CommandOutcome>,
    /// Failures of reactions to the command.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub handler_errors: Vec<String>,
    /// UI updates the command produced.
    pub updates: Vec<UiUpdate>,
    /// Session after the command.
    pub session: SessionView,
}

/// Totals for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Lines that carried a command.
    pub commands: usize,
    /// Commands that failed to parse or apply.
    pub failures: usize,
}

// ===== Applying commands =====

/// Apply one command.
///
/// # Errors
///
/// Returns `AppError::Coordination` when the coordinator rejects the
/// command and `AppError::Store` when `save` cannot write the snapshot.
pub fn apply_command(
    coordinator: &mut ShellCoordinator,
    command: Command,
    store: &SnapshotStore,
) -> Result<Option<CommandOutcome>, AppError> {
    let activation = |activation| Some(CommandOutcome::Activation { activation });
    let outcome = match command {
        Command::Open(id) => activation(coordinator.activate(&id)?),
        Command::Go(id) => {
            coordinator.navigate_to(&id)?;
            None
        }
        Command::Back => {
            coordinator.go_back()?;
            None
        }
        Command::Level(ordinal) => {
            coordinator.go_to_level(ordinal)?;
            None
        }
        Command::Home => {
            coordinator.go_home()?;
            None
        }
        Command::Root => {
            coordinator.go_to_root()?;
            None
        }
        Command::Jump(id) => {
            coordinator.navigate_to_id(&id)?;
            None
        }
        Command::Category(id) => {
            coordinator.open_category(&id)?;
            None
        }
        Command::Setup(id) => {
            coordinator.open_config(&id)?;
            None
        }
        Command::Config(id) => activation(coordinator.toggle_config(&id)?),
        Command::Product(id) => activation(coordinator.toggle_product(&id)?),
        Command::Unproduct(brand) => {
            coordinator.remove_product(&brand)?;
            None
        }
        Command::FilterAdd { kind, item } => {
            coordinator.add_filter(kind, item)?;
            None
        }
        Command::FilterRemove { kind, id } => {
            coordinator.remove_filter(kind, &id)?;
            None
        }
        Command::Clear => {
            coordinator.clear_filters()?;
            None
        }
        Command::Select { group, item } => {
            coordinator.select(&group, item)?;
            None
        }
        Command::Deselect { group, id } => {
            let removed = coordinator.deselect(&group, &id)?.is_some();
            Some(CommandOutcome::Deselected { removed })
        }
        Command::Toggle { group, item } => {
            let selected = coordinator.toggle(&group, item)?;
            Some(CommandOutcome::Toggled { selected })
        }
        Command::ClearGroup(group) => {
            coordinator.clear_group(&group)?;
            None
        }
        Command::ClearSelections => {
            coordinator.clear_selections()?;
            None
        }
        Command::Validate => {
            let missing = coordinator.selection().validate();
            Some(CommandOutcome::Validation {
                valid: missing.is_empty(),
                missing,
            })
        }
        Command::Show => None,
        Command::Save => {
            store.save(&coordinator.snapshot())?;
            Some(CommandOutcome::Saved {
                path: store.path().to_path_buf(),
            })
        }
    };
    Ok(outcome)
}

/// Hand a pending local search result back to the coordinator.
pub fn complete_pending_search(coordinator: &mut ShellCoordinator) {
    if let Some(outcome) = coordinator.search_mut().take_outcome() {
        if let Err(e) = coordinator.complete_search(outcome) {
            warn!(error = %e, "Search completion failed");
        }
    }
}

/// Process one source line into a report. `None` for blank lines and
/// comments.
pub fn process_line(
    coordinator: &mut ShellCoordinator,
    line: &SourceLine,
    store: &SnapshotStore,
) -> Option<Report> {
    let parsed = match parse_line(&line.text) {
        Ok(None) => return None,
        Ok(Some(command)) => Ok(command),
        Err(e) => Err(AppError::from(e)),
    };
    let command = parsed.as_ref().ok().map(Command::keyword);
    debug!(line = line.number, command = ?command, "Processing line");

    let result = parsed.and_then(|command| apply_command(coordinator, command, store));
    complete_pending_search(coordinator);

    let (outcome, error) = match result {
        Ok(outcome) => (outcome, None),
        Err(e) => {
            warn!(line = line.number, error = %e, "Command failed");
            (None, Some(e.to_string()))
        }
    };
    Some(Report {
        line: line.number,
        command,
        ok: error.is_none(),
        error,
        outcome,
        handler_errors: coordinator
            .take_errors()
            .iter()
            .map(ToString::to_string)
            .collect(),
        updates: coordinator.ui_mut().take(),
        session: session_view(coordinator),
    })
}

/// Run every line of `source`, writing one JSON report per command.
///
/// # Errors
///
/// Stops on input failures and on failures writing to `out`.
pub fn run_script<W: Write>(
    source: &mut impl LineSource,
    coordinator: &mut ShellCoordinator,
    store: &SnapshotStore,
    out: &mut W,
) -> Result<RunSummary, AppError> {
    let mut summary = RunSummary::default();
    while let Some(line) = source.next_line()? {
        let Some(report) = process_line(coordinator, &line, store) else {
            continue;
        };
        summary.commands += 1;
        if !report.ok {
            summary.failures += 1;
        }
        let json = serde_json::to_string(&report).map_err(std::io::Error::other)?;
        writeln!(out, "{json}")?;
        out.flush()?;
    }
    info!(
        commands = summary.commands,
        failures = summary.failures,
        "Command stream finished"
    );
    Ok(summary)
}
