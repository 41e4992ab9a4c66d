//! Handler context: guarded access to the coordinated components.

use super::collaborators::{SearchKind, SearchRequest, SearchService, UiSink};
use super::notification::Notification;
use crate::config::ConfigGroups;
use crate::model::{Component, CoordinationError};
use crate::state::{ActiveFilterSet, NavigationState, SelectionState};
use std::collections::VecDeque;
use tracing::{debug, trace};

/// Everything a handler may read or command.
///
/// Mutable access to a component is refused while that component's own
/// notification is being dispatched.
pub struct Context<S, U> {
    navigation: NavigationState,
    selection: SelectionState,
    filters: ActiveFilterSet,
    config_groups: ConfigGroups,
    search: S,
    ui: U,
    dispatching: Option<Component>,
    pending_search: Option<SearchKind>,
    last_result_count: Option<usize>,
}

impl<S: SearchService, U: UiSink> Context<S, U> {
    pub(crate) fn new(
        navigation: NavigationState,
        selection: SelectionState,
        filters: ActiveFilterSet,
        config_groups: ConfigGroups,
        search: S,
        ui: U,
    ) -> Self {
        Self {
            navigation,
            selection,
            filters,
            config_groups,
            search,
            ui,
            dispatching: None,
            pending_search: None,
            last_result_count: None,
        }
    }

    fn guard(&self, component: Component) -> Result<(), CoordinationError> {
        if self.dispatching == Some(component) {
            return Err(CoordinationError::Reentrancy { component });
        }
        Ok(())
    }

    /// Navigation state.
    pub fn navigation(&self) -> &NavigationState {
        &self.navigation
    }

    /// Navigation state, for commands.
    ///
    /// # Errors
    ///
    /// `Reentrancy` while a navigation notification is being dispatched.
    pub fn navigation_mut(&mut self) -> Result<&mut NavigationState, CoordinationError> {
        self.guard(Component::Navigation)?;
        Ok(&mut self.navigation)
    }

    /// Generic selection ledger.
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Generic selection ledger, for commands.
    ///
    /// # Errors
    ///
    /// `Reentrancy` while a selection notification is being dispatched.
    pub fn selection_mut(&mut self) -> Result<&mut SelectionState, CoordinationError> {
        self.guard(Component::Selection)?;
        Ok(&mut self.selection)
    }

    /// Active filter set.
    pub fn filters(&self) -> &ActiveFilterSet {
        &self.filters
    }

    /// Active filter set, for commands.
    ///
    /// # Errors
    ///
    /// `Reentrancy` while a filter notification is being dispatched.
    pub fn filters_mut(&mut self) -> Result<&mut ActiveFilterSet, CoordinationError> {
        self.guard(Component::Filters)?;
        Ok(&mut self.filters)
    }

    /// Configuration subtree → filter kind mapping.
    pub fn config_groups(&self) -> &ConfigGroups {
        &self.config_groups
    }

    /// The UI collaborator.
    pub fn ui(&self) -> &U {
        &self.ui
    }

    /// The UI collaborator, for rendering.
    pub fn ui_mut(&mut self) -> &mut U {
        &mut self.ui
    }

    /// The search collaborator.
    pub fn search(&self) -> &S {
        &self.search
    }

    /// The search collaborator, mutably.
    pub fn search_mut(&mut self) -> &mut S {
        &mut self.search
    }

    /// Ask for a search once the current command settles. Later requests in
    /// the same command replace earlier ones.
    pub fn request_search(&mut self, kind: SearchKind) {
        trace!(?kind, "Search requested");
        self.pending_search = Some(kind);
    }

    /// Search kind waiting to be submitted, if any.
    pub fn pending_search(&self) -> Option<SearchKind> {
        self.pending_search
    }

    /// Result count of the last completed search.
    pub fn last_result_count(&self) -> Option<usize> {
        self.last_result_count
    }

    pub(crate) fn set_last_result_count(&mut self, count: usize) {
        self.last_result_count = Some(count);
    }

    pub(crate) fn set_dispatching(&mut self, component: Option<Component>) {
        self.dispatching = component;
    }

    pub(crate) fn drain_notifications(&mut self, queue: &mut VecDeque<Notification>) {
        queue.extend(self.navigation.take_events().into_iter().map(Notification::Navigation));
        queue.extend(self.filters.take_events().into_iter().map(Notification::Filters));
        queue.extend(self.selection.take_events().into_iter().map(Notification::Selection));
    }

    pub(crate) fn discard_notifications(&mut self) {
        self.navigation.take_events();
        self.filters.take_events();
        self.selection.take_events();
    }

    pub(crate) fn discard_search(&mut self) {
        self.pending_search = None;
    }

    /// Submit the pending search, if any.
    pub(crate) fn flush_search(&mut self) -> Option<SearchKind> {
        let kind = self.pending_search.take()?;
        let request = SearchRequest {
            kind,
            params: self.navigation.params().clone(),
            filters: self.filters.active(),
            products: self.filters.products().to_vec(),
        };
        debug!(
            ?kind,
            filters = request.filters.len(),
            products = request.products.len(),
            "Submitting search"
        );
        self.search.submit(request);
        Some(kind)
    }
}
