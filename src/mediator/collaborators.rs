//! Boundaries to the outside: search and UI.
//!
//! The coordinator only ever talks to these traits. A search is submitted
//! and forgotten; its completion re-enters through
//! [`Coordinator::complete_search`](super::Coordinator::complete_search).

use crate::model::{FilterKind, GroupName, SelectedProduct};
use crate::state::{ActiveFilter, BreadcrumbView, Card, Params};
use serde::{Deserialize, Serialize};

/// Key of the extra attribute carrying the tint style of a colour option.
pub const TINT_STYLE_ATTRIBUTE: &str = "tipoColoracao";

/// Which search the core asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchKind {
    /// Broad search at the root.
    Initial,
    /// Search narrowed by the current path and filters.
    Filtered,
}

/// Parameter bag handed to the search collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    /// Initial or filtered.
    pub kind: SearchKind,
    /// Navigation params at submission time.
    pub params: Params,
    /// Active filters at submission time.
    pub filters: Vec<ActiveFilter>,
    /// Directly-selected products at submission time.
    pub products: Vec<SelectedProduct>,
}

impl SearchRequest {
    /// Repeated-key form fields as a search backend expects them.
    ///
    /// Vision type goes by id, brand and family by label, each selected
    /// product adds a `marca` entry, multiple filters add one entry per label
    /// under their search field, and navigation params follow last.
    pub fn form_fields(&self) -> Vec<(String, String)> {
        let mut fields = Vec::new();
        let mut push = |key: &str, value: &str| fields.push((key.to_string(), value.to_string()));

        for kind in [FilterKind::VisionType, FilterKind::Family, FilterKind::Brand] {
            for filter in self.filters.iter().filter(|f| f.kind == kind) {
                let value = match kind {
                    FilterKind::VisionType => filter.item.id.as_str(),
                    _ => filter.item.display_label(),
                };
                push(kind.search_field(), value);
            }
        }

        for product in &self.products {
            push(FilterKind::Brand.search_field(), product.brand.as_str());
        }

        for kind in FilterKind::MULTIPLE {
            for filter in self.filters.iter().filter(|f| f.kind == kind) {
                push(kind.search_field(), filter.item.display_label());
                if kind == FilterKind::Tint {
                    if let Some(style) = filter
                        .item
                        .extra
                        .get(TINT_STYLE_ATTRIBUTE)
                        .and_then(|v| v.as_str())
                    {
                        push("coloracaoTipo", style);
                    }
                }
            }
        }

        for (key, value) in &self.params {
            push(key.as_str(), value.as_str());
        }
        fields
    }
}

/// What the search collaborator reports back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// Number of results.
    pub count: usize,
    /// Opaque result records.
    #[serde(default)]
    pub results: Vec<serde_json::Value>,
}

/// Search backend.
pub trait SearchService {
    /// Start a search. Completion is reported separately.
    fn submit(&mut self, request: SearchRequest);
}

/// Render instruction for one UI surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "surface", rename_all = "kebab-case")]
pub enum UiUpdate {
    /// Breadcrumb trail and current level.
    Level {
        /// Breadcrumbs, root excluded.
        breadcrumbs: Vec<BreadcrumbView>,
        /// Header title of the current node.
        title: String,
        /// Header icon of the current node.
        icon: String,
        /// Children to offer.
        cards: Vec<Card>,
    },
    /// Active filter panel.
    ActiveFilters {
        /// Flattened filters.
        filters: Vec<ActiveFilter>,
        /// Selected products.
        products: Vec<SelectedProduct>,
    },
    /// Counter of active filters and products.
    FilterBadge {
        /// Total count.
        count: usize,
    },
    /// Counter of search results.
    ResultBadge {
        /// Last reported result count.
        count: usize,
    },
    /// Summary of the generic selection ledger.
    SelectionSummary {
        /// Items across all groups.
        total: usize,
        /// Required groups still empty.
        missing: Vec<GroupName>,
    },
}

/// Display surface.
pub trait UiSink {
    /// Apply one render instruction.
    fn apply(&mut self, update: UiUpdate);
}
