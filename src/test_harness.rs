//! Shared fixtures for whitebox tests.
//!
//! Provides the sample catalog used across module tests and a coordinator
//! wired to recording collaborators, so tests can drive commands and assert
//! on what the search and UI boundaries observed.

use crate::config::{default_config_groups, default_selection_groups};
use crate::mediator::{Coordinator, SearchOutcome, SearchRequest, SearchService, UiSink, UiUpdate};
use crate::model::CatalogTree;
use crate::parser::parse_catalog;
use crate::state::{ActiveFilterSet, NavigationState, SelectionState};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

/// Raw JSON of the sample catalog.
pub(crate) const SAMPLE_CATALOG: &str = include_str!("../tests/fixtures/catalog.json");

/// The sample catalog, parsed.
pub(crate) fn sample_catalog() -> Arc<CatalogTree> {
    match parse_catalog(SAMPLE_CATALOG) {
        Ok(tree) => Arc::new(tree),
        Err(e) => panic!("sample catalog must parse: {e}"),
    }
}

/// Search collaborator that records every request.
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordingSearch {
    pub(crate) requests: Rc<RefCell<Vec<SearchRequest>>>,
}

impl SearchService for RecordingSearch {
    fn submit(&mut self, request: SearchRequest) {
        self.requests.borrow_mut().push(request);
    }
}

impl RecordingSearch {
    /// Requests submitted since the last call.
    pub(crate) fn take_requests(&self) -> Vec<SearchRequest> {
        std::mem::take(&mut *self.requests.borrow_mut())
    }
}

/// UI collaborator that records every update.
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordingUi {
    pub(crate) updates: Rc<RefCell<Vec<UiUpdate>>>,
}

impl UiSink for RecordingUi {
    fn apply(&mut self, update: UiUpdate) {
        self.updates.borrow_mut().push(update);
    }
}

/// Coordinator over the sample catalog with recording collaborators.
pub(crate) struct CoordinatorHarness {
    pub(crate) coordinator: Coordinator<RecordingSearch, RecordingUi>,
    pub(crate) requests: Rc<RefCell<Vec<SearchRequest>>>,
    pub(crate) updates: Rc<RefCell<Vec<UiUpdate>>>,
}

impl CoordinatorHarness {
    /// Default wiring, default groups.
    pub(crate) fn new() -> Self {
        let search = RecordingSearch::default();
        let ui = RecordingUi::default();
        let requests = Rc::clone(&search.requests);
        let updates = Rc::clone(&ui.updates);
        let coordinator = Coordinator::with_default_wiring(
            NavigationState::new(sample_catalog()),
            SelectionState::new(default_selection_groups()),
            ActiveFilterSet::new(),
            default_config_groups(),
            search,
            ui,
        );
        Self {
            coordinator,
            requests,
            updates,
        }
    }

    /// Requests submitted since the last call.
    pub(crate) fn take_requests(&self) -> Vec<SearchRequest> {
        std::mem::take(&mut *self.requests.borrow_mut())
    }

    /// UI updates applied since the last call.
    pub(crate) fn take_updates(&self) -> Vec<UiUpdate> {
        std::mem::take(&mut *self.updates.borrow_mut())
    }

    /// Feed a search completion with `count` results.
    pub(crate) fn complete(&mut self, count: usize) {
        if let Err(e) = self.coordinator.complete_search(SearchOutcome {
            count,
            results: Vec::new(),
        }) {
            panic!("search completion must dispatch: {e}");
        }
    }
}
