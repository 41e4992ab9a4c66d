//! In-process search over the catalog.
//!
//! [`LocalCatalogSearch`] stands in for a remote product search: on submit it
//! resolves the request against the catalog straight away and keeps the
//! outcome until the shell collects it and feeds it back through
//! [`Coordinator::complete_search`](crate::mediator::Coordinator::complete_search).

use crate::mediator::{SearchKind, SearchOutcome, SearchRequest, SearchService};
use crate::model::{CatalogTree, NodeIndex, NodeKind};
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

/// Counts product nodes below the deepest node the request names.
#[derive(Debug, Clone)]
pub struct LocalCatalogSearch {
    catalog: Arc<CatalogTree>,
    pending: Option<SearchOutcome>,
    submitted: usize,
}

impl LocalCatalogSearch {
    /// Search over `catalog`.
    pub fn new(catalog: Arc<CatalogTree>) -> Self {
        Self {
            catalog,
            pending: None,
            submitted: 0,
        }
    }

    /// Outcome of the last submission, if not collected yet.
    pub fn take_outcome(&mut self) -> Option<SearchOutcome> {
        self.pending.take()
    }

    /// Requests received so far.
    pub fn submitted(&self) -> usize {
        self.submitted
    }

    /// Node the request narrows to: the deepest node named by one of its
    /// form fields, or the root for initial searches.
    pub fn scope(&self, request: &SearchRequest) -> NodeIndex {
        let root = self.catalog.root_index();
        if request.kind == SearchKind::Initial {
            return root;
        }
        request
            .form_fields()
            .iter()
            .filter_map(|(_, value)| self.catalog.find_by_id(value))
            .max_by_key(|&index| self.catalog.path_to_index(index).len())
            .unwrap_or(root)
    }

    /// Resolve `request` without storing the outcome.
    pub fn run(&self, request: &SearchRequest) -> SearchOutcome {
        let scope = self.scope(request);
        let wanted: Vec<&str> = request.products.iter().map(|p| p.label.as_str()).collect();

        let results: Vec<serde_json::Value> = self
            .catalog
            .descendants(scope)
            .map(|index| self.catalog.node(index))
            .filter(|node| node.kind() == NodeKind::Product)
            .filter(|node| wanted.is_empty() || wanted.contains(&node.display_label()))
            .map(|node| {
                json!({
                    "id": node.id().as_str(),
                    "label": node.display_label(),
                })
            })
            .collect();

        SearchOutcome {
            count: results.len(),
            results,
        }
    }
}

impl SearchService for LocalCatalogSearch {
    fn submit(&mut self, request: SearchRequest) {
        self.submitted += 1;
        let outcome = self.run(&request);
        debug!(
            kind = ?request.kind,
            scope = %self.catalog.node(self.scope(&request)).id(),
            count = outcome.count,
            "Local search resolved"
        );
        self.pending = Some(outcome);
    }
}
