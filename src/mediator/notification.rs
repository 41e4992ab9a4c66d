//! Notifications routed by the coordinator.

use super::collaborators::SearchOutcome;
use crate::model::Component;
use crate::state::{FilterEvent, NavigationEvent, SelectionEvent};

/// Something a component announced.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// From the navigation state.
    Navigation(NavigationEvent),
    /// From the generic selection ledger.
    Selection(SelectionEvent),
    /// From the active filter set.
    Filters(FilterEvent),
    /// A search completed.
    SearchCompleted(SearchOutcome),
}

impl Notification {
    /// Component that produced it; also the topic handlers subscribe to.
    pub fn source(&self) -> Component {
        match self {
            Notification::Navigation(_) => Component::Navigation,
            Notification::Selection(_) => Component::Selection,
            Notification::Filters(_) => Component::Filters,
            Notification::SearchCompleted(_) => Component::Search,
        }
    }
}
