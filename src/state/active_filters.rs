//! Active filter set: the domain projection of the selection ledger.
//!
//! The three unique kinds (vision type, brand, family) are single-mode groups
//! cascading in that order; the six multiple kinds are multiple-mode groups.
//! Next to the ledger sits the list of directly-selected products, keyed by
//! brand. Every mutation ends with exactly one [`FilterEvent::Changed`]
//! carrying the merged view.

use super::selection::{GroupConfig, OrderedCascade, Selection, SelectionSnapshot, SelectionState};
use crate::model::{FilterKind, ItemId, SelectedProduct, SelectionError, SelectionItem};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, trace};

/// One entry of the flattened "what is on" view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveFilter {
    /// Dimension.
    pub kind: FilterKind,
    /// Selected value.
    #[serde(flatten)]
    pub item: SelectionItem,
}

/// Selection counts by category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterCounts {
    /// Filled unique slots.
    pub unique: usize,
    /// Items across multiple kinds.
    pub multiple: usize,
    /// Directly-selected products.
    pub products: usize,
}

impl FilterCounts {
    /// Sum of all three counts.
    pub fn total(&self) -> usize {
        self.unique + self.multiple + self.products
    }
}

/// Notification left in the outbox by each mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum FilterEvent {
    /// The set changed; carries the full view after the change.
    Changed {
        /// Flattened filters, unique first.
        active: Vec<ActiveFilter>,
        /// Selected products.
        products: Vec<SelectedProduct>,
    },
}

/// Unique and multiple filters plus selected products.
#[derive(Debug, Clone)]
pub struct ActiveFilterSet {
    ledger: SelectionState,
    products: Vec<SelectedProduct>,
    events: Vec<FilterEvent>,
}

impl Default for ActiveFilterSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ActiveFilterSet {
    /// Empty set with the nine fixed kinds.
    pub fn new() -> Self {
        let groups: BTreeMap<_, _> = FilterKind::all()
            .map(|kind| {
                let config = if kind.is_unique() {
                    GroupConfig::single()
                } else {
                    GroupConfig::multiple()
                };
                (kind.group(), config.with_label(kind.as_str()))
            })
            .collect();
        let cascade = OrderedCascade::new(FilterKind::UNIQUE.map(FilterKind::group));
        Self {
            ledger: SelectionState::new(groups).with_cascade(Arc::new(cascade)),
            products: Vec::new(),
            events: Vec::new(),
        }
    }

    // ===== Filters =====

    /// Set a unique slot, or add to a multiple kind unless the id is present.
    pub fn add(&mut self, kind: FilterKind, item: SelectionItem) {
        trace!(%kind, item = %item.id, "Filter added");
        self.ledger.select(&kind.group(), item);
        self.changed();
    }

    /// Clear a unique slot, or drop `id` from a multiple kind.
    ///
    /// Unique slots are cleared whatever `id` is; cascading is left to
    /// [`remove_cascading`](Self::remove_cascading).
    pub fn remove(&mut self, kind: FilterKind, id: &ItemId) {
        if kind.is_unique() {
            self.ledger.clear_group(&kind.group());
        } else {
            self.ledger.deselect(&kind.group(), id);
        }
        trace!(%kind, item = %id, "Filter removed");
        self.changed();
    }

    /// Clear `kind` and every unique kind after it. Multiple kinds are not
    /// part of the cascade and are left alone.
    pub fn remove_cascading(&mut self, kind: FilterKind) -> Vec<FilterKind> {
        let cleared: Vec<FilterKind> = self
            .ledger
            .clear_cascading(&kind.group())
            .iter()
            .filter_map(FilterKind::from_group)
            .collect();
        debug!(%kind, ?cleared, "Cascading filter removal");
        self.changed();
        cleared
    }

    /// Replace all three unique slots at once. Non-unique kinds are ignored.
    pub fn sync_unique(&mut self, items: impl IntoIterator<Item = (FilterKind, SelectionItem)>) {
        for kind in FilterKind::UNIQUE {
            self.ledger.clear_group(&kind.group());
        }
        for (kind, item) in items {
            if kind.is_unique() {
                self.ledger.select(&kind.group(), item);
            } else {
                debug!(%kind, "Ignoring non-unique kind in unique sync");
            }
        }
        self.changed();
    }

    /// Items held by `kind`.
    pub fn get(&self, kind: FilterKind) -> Vec<&SelectionItem> {
        self.ledger.selections(&kind.group())
    }

    /// The one item of a unique kind.
    pub fn unique(&self, kind: FilterKind) -> Option<&SelectionItem> {
        match self.ledger.selection(&kind.group()) {
            Some(Selection::Single(item)) => Some(item),
            _ => None,
        }
    }

    /// True when `id` is active under `kind`.
    pub fn contains(&self, kind: FilterKind, id: &ItemId) -> bool {
        self.ledger.is_selected(&kind.group(), id)
    }

    // ===== Products =====

    /// Add a product unless one with the same brand key exists. Returns
    /// whether it was inserted; nothing is announced otherwise.
    pub fn add_product(&mut self, product: SelectedProduct) -> bool {
        if self.has_product(&product.brand) {
            trace!(brand = %product.brand, "Product already selected");
            return false;
        }
        debug!(brand = %product.brand, "Product selected");
        self.products.push(product);
        self.changed();
        true
    }

    /// Drop the product with `brand`.
    pub fn remove_product(&mut self, brand: &str) {
        self.products.retain(|p| p.brand != brand);
        debug!(brand, "Product removed");
        self.changed();
    }

    /// Drop every product.
    pub fn clear_products(&mut self) {
        self.products.clear();
        self.changed();
    }

    /// True when a product with `brand` is selected.
    pub fn has_product(&self, brand: &str) -> bool {
        self.products.iter().any(|p| p.brand == brand)
    }

    /// Selected products in insertion order.
    pub fn products(&self) -> &[SelectedProduct] {
        &self.products
    }

    // ===== Bulk clears =====

    /// Empty the three unique slots.
    pub fn clear(&mut self) {
        self.clear_unique_slots();
        self.changed();
    }

    /// Empty the unique slots and the product list, keeping multiple kinds.
    pub fn clear_context(&mut self) {
        self.clear_unique_slots();
        self.products.clear();
        debug!("Filter context cleared");
        self.changed();
    }

    /// Empty everything.
    pub fn clear_all(&mut self) {
        self.ledger.clear_all();
        self.products.clear();
        debug!("All filters cleared");
        self.changed();
    }

    fn clear_unique_slots(&mut self) {
        for kind in FilterKind::UNIQUE {
            self.ledger.clear_group(&kind.group());
        }
    }

    fn changed(&mut self) {
        self.ledger.take_events();
        let event = FilterEvent::Changed {
            active: self.active(),
            products: self.products.clone(),
        };
        self.events.push(event);
    }

    /// Drain pending notifications, oldest first.
    pub fn take_events(&mut self) -> Vec<FilterEvent> {
        std::mem::take(&mut self.events)
    }

    // ===== Views =====

    /// Every active filter, unique kinds first in cascade order.
    pub fn active(&self) -> Vec<ActiveFilter> {
        FilterKind::all()
            .flat_map(|kind| {
                self.get(kind).into_iter().map(move |item| ActiveFilter {
                    kind,
                    item: item.clone(),
                })
            })
            .collect()
    }

    /// Counts by category.
    pub fn counts(&self) -> FilterCounts {
        let (unique, multiple) = FilterKind::all().fold((0, 0), |(u, m), kind| {
            let n = self.ledger.count(&kind.group());
            if kind.is_unique() {
                (u + n, m)
            } else {
                (u, m + n)
            }
        });
        FilterCounts {
            unique,
            multiple,
            products: self.products.len(),
        }
    }

    /// True when any filter or product is active.
    pub fn has_selection(&self) -> bool {
        self.counts().total() > 0
    }

    /// The underlying ledger, for persistence.
    pub fn ledger(&self) -> &SelectionState {
        &self.ledger
    }

    /// Replace filters and products from saved parts. One `Changed` follows.
    ///
    /// # Errors
    ///
    /// See [`SelectionState::restore`]; nothing is applied on error.
    pub fn restore(
        &mut self,
        filters: SelectionSnapshot,
        products: Vec<SelectedProduct>,
    ) -> Result<(), SelectionError> {
        self.ledger.restore(filters)?;
        self.products.clear();
        for product in products {
            if !self.has_product(&product.brand) {
                self.products.push(product);
            }
        }
        self.changed();
        Ok(())
    }
}

#[cfg(test)]
#[path = "active_filters_tests.rs"]
mod tests;
