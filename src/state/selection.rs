//! Group-based selection ledger.
//!
//! Each named group is configured as single-valued or multi-valued. The
//! stored representation is chosen from that configuration, never inferred
//! from the value: a group holds either [`Selection::Single`] or
//! [`Selection::Multiple`], and an absent entry means "nothing selected".
//!
//! Operations on an unconfigured group are accepted and treated as a
//! non-required single group.
//!
//! Clearing with [`SelectionState::clear_cascading`] consults a pluggable
//! [`CascadePolicy`] to decide which groups depend on the one being cleared.

use crate::model::{GroupName, ItemId, SelectionError, SelectionItem};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

// ===== Group configuration =====

/// How many values a group may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// At most one value; selecting replaces.
    #[default]
    Single,
    /// Any number of distinct values.
    Multiple,
}

/// Per-group settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupConfig {
    /// Single or multiple.
    #[serde(default)]
    pub mode: SelectionMode,
    /// Whether `validate` reports the group when empty.
    #[serde(default)]
    pub required: bool,
    /// Display label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl GroupConfig {
    /// Single-mode, optional.
    pub fn single() -> Self {
        Self::default()
    }

    /// Multiple-mode, optional.
    pub fn multiple() -> Self {
        Self {
            mode: SelectionMode::Multiple,
            ..Self::default()
        }
    }

    /// Builder: mark as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Builder: set the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Partial update merged into an existing [`GroupConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupConfigUpdate {
    /// New mode, if changing.
    pub mode: Option<SelectionMode>,
    /// New required flag, if changing.
    pub required: Option<bool>,
    /// New label, if changing.
    pub label: Option<String>,
}

// ===== Selection =====

/// What a group currently holds.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// The one selected item of a single-mode group.
    Single(SelectionItem),
    /// Selected items of a multiple-mode group, keyed by id, in insertion order.
    Multiple(IndexMap<ItemId, SelectionItem>),
}

impl Selection {
    /// Mode this representation belongs to.
    pub fn mode(&self) -> SelectionMode {
        match self {
            Selection::Single(_) => SelectionMode::Single,
            Selection::Multiple(_) => SelectionMode::Multiple,
        }
    }

    /// Selected items in order.
    pub fn items(&self) -> Vec<&SelectionItem> {
        match self {
            Selection::Single(item) => vec![item],
            Selection::Multiple(items) => items.values().collect(),
        }
    }

    /// Number of selected items.
    pub fn len(&self) -> usize {
        match self {
            Selection::Single(_) => 1,
            Selection::Multiple(items) => items.len(),
        }
    }

    /// True when no item is held.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when `id` is held.
    pub fn contains(&self, id: &ItemId) -> bool {
        match self {
            Selection::Single(item) => &item.id == id,
            Selection::Multiple(items) => items.contains_key(id),
        }
    }

    fn into_mode(self, mode: SelectionMode) -> Option<Self> {
        match (self, mode) {
            (Selection::Single(item), SelectionMode::Multiple) => {
                let mut items = IndexMap::new();
                items.insert(item.id.clone(), item);
                Some(Selection::Multiple(items))
            }
            (Selection::Multiple(mut items), SelectionMode::Single) => {
                items.pop().map(|(_, item)| Selection::Single(item))
            }
            (same, _) => Some(same),
        }
    }
}

// ===== Cascade policies =====

/// Decides which groups are cleared together with a given group.
pub trait CascadePolicy: fmt::Debug + Send + Sync {
    /// Groups to clear when `group` is cleared.
    fn cascade(&self, group: &GroupName) -> Vec<GroupName>;
}

/// Every group stands alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCascade;

impl CascadePolicy for NoCascade {
    fn cascade(&self, group: &GroupName) -> Vec<GroupName> {
        vec![group.clone()]
    }
}

/// Groups in a fixed dependency order: clearing one clears it and every
/// group after it. Groups outside the order are unaffected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedCascade {
    order: Vec<GroupName>,
}

impl OrderedCascade {
    /// Cascade over `order`, upstream first.
    pub fn new(order: impl IntoIterator<Item = GroupName>) -> Self {
        Self {
            order: order.into_iter().collect(),
        }
    }

    /// Groups in dependency order.
    pub fn order(&self) -> &[GroupName] {
        &self.order
    }
}

impl CascadePolicy for OrderedCascade {
    fn cascade(&self, group: &GroupName) -> Vec<GroupName> {
        match self.order.iter().position(|g| g == group) {
            Some(start) => self.order[start..].to_vec(),
            None => Vec::new(),
        }
    }
}

// ===== Events =====

/// Notification left in the outbox by each mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionEvent {
    /// An item was selected.
    Selected {
        /// Group name.
        group: GroupName,
        /// The item.
        item: SelectionItem,
        /// Item it replaced in a single group, when the id differs.
        previous: Option<SelectionItem>,
    },
    /// An item was removed.
    Deselected {
        /// Group name.
        group: GroupName,
        /// The removed item.
        item: SelectionItem,
    },
    /// A whole group was cleared.
    Cleared {
        /// Group name.
        group: GroupName,
        /// What it held before.
        previous: Option<Selection>,
    },
    /// Every group was cleared.
    ClearedAll,
    /// Selections were replaced from a snapshot.
    Loaded,
    /// Closing notification of every mutation. `None` means all groups.
    Changed {
        /// Group affected, if only one.
        group: Option<GroupName>,
    },
}

// ===== Snapshot =====

/// Persisted form of one item: a bare id or a full record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredItem {
    /// Bare id.
    Id(ItemId),
    /// Full record.
    Item(SelectionItem),
}

impl StoredItem {
    fn into_item(self) -> SelectionItem {
        match self {
            StoredItem::Id(id) => SelectionItem {
                id,
                label: None,
                icon: None,
                extra: BTreeMap::new(),
            },
            StoredItem::Item(item) => item,
        }
    }
}

/// Persisted form of one group: multiple groups are lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredSelection {
    /// Ordered list (multiple-mode groups).
    Many(Vec<StoredItem>),
    /// One value (single-mode groups).
    One(StoredItem),
}

/// Group name → stored selection.
pub type SelectionSnapshot = BTreeMap<GroupName, StoredSelection>;

// ===== SelectionState =====

/// Configurable selection ledger.
#[derive(Debug, Clone)]
pub struct SelectionState {
    groups: BTreeMap<GroupName, GroupConfig>,
    selections: BTreeMap<GroupName, Selection>,
    cascade: Arc<dyn CascadePolicy>,
    events: Vec<SelectionEvent>,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new(BTreeMap::new())
    }
}

impl SelectionState {
    /// Ledger over the given groups, without cascading.
    pub fn new(groups: BTreeMap<GroupName, GroupConfig>) -> Self {
        Self {
            groups,
            selections: BTreeMap::new(),
            cascade: Arc::new(NoCascade),
            events: Vec::new(),
        }
    }

    /// Builder: use `policy` for `clear_cascading`.
    pub fn with_cascade(mut self, policy: Arc<dyn CascadePolicy>) -> Self {
        self.cascade = policy;
        self
    }

    // ===== Configuration =====

    /// Settings for `group`; unconfigured groups read as optional single.
    pub fn group_config(&self, group: &GroupName) -> GroupConfig {
        self.groups.get(group).cloned().unwrap_or_default()
    }

    /// Configured groups.
    pub fn groups(&self) -> &BTreeMap<GroupName, GroupConfig> {
        &self.groups
    }

    /// Merge `update` into the settings of `group`.
    ///
    /// A mode change converts the stored value: a single item becomes a
    /// one-element set, a set keeps its most recent item.
    pub fn set_group_config(&mut self, group: &GroupName, update: GroupConfigUpdate) {
        let mut config = self.group_config(group);
        if let Some(mode) = update.mode {
            config.mode = mode;
        }
        if let Some(required) = update.required {
            config.required = required;
        }
        if let Some(label) = update.label {
            config.label = Some(label);
        }
        if let Some(current) = self.selections.remove(group) {
            if let Some(converted) = current.into_mode(config.mode) {
                self.selections.insert(group.clone(), converted);
            }
        }
        debug!(group = %group, mode = ?config.mode, required = config.required, "Group configured");
        self.groups.insert(group.clone(), config);
    }

    fn mode_of(&self, group: &GroupName) -> SelectionMode {
        match self.groups.get(group) {
            Some(config) => config.mode,
            None => {
                debug!(group = %group, "Unconfigured group, treating as single");
                SelectionMode::Single
            }
        }
    }

    // ===== Mutations =====

    /// Select `item` in `group`.
    ///
    /// Single groups replace their value; multiple groups add the item if its
    /// id is not already present.
    pub fn select(&mut self, group: &GroupName, item: SelectionItem) {
        match self.mode_of(group) {
            SelectionMode::Single => {
                let previous = match self.selections.insert(group.clone(), Selection::Single(item.clone())) {
                    Some(Selection::Single(previous)) => Some(previous),
                    Some(Selection::Multiple(mut items)) => items.pop().map(|(_, item)| item),
                    None => None,
                };
                let evicted = previous.filter(|p| p.id != item.id);
                trace!(group = %group, item = %item.id, "Selected (single)");
                self.events.push(SelectionEvent::Selected {
                    group: group.clone(),
                    item,
                    previous: evicted.clone(),
                });
                if let Some(evicted) = evicted {
                    self.events.push(SelectionEvent::Deselected {
                        group: group.clone(),
                        item: evicted,
                    });
                }
            }
            SelectionMode::Multiple => {
                let entry = self
                    .selections
                    .entry(group.clone())
                    .or_insert_with(|| Selection::Multiple(IndexMap::new()));
                if let Selection::Multiple(items) = entry {
                    items.entry(item.id.clone()).or_insert_with(|| item.clone());
                }
                trace!(group = %group, item = %item.id, "Selected (multiple)");
                self.events.push(SelectionEvent::Selected {
                    group: group.clone(),
                    item,
                    previous: None,
                });
            }
        }
        self.changed(Some(group));
    }

    /// Remove `id` from `group`. Returns the removed item, if it was held.
    pub fn deselect(&mut self, group: &GroupName, id: &ItemId) -> Option<SelectionItem> {
        let removed = match self.selections.remove(group) {
            Some(Selection::Single(item)) if &item.id == id => Some(item),
            Some(kept @ Selection::Single(_)) => {
                self.selections.insert(group.clone(), kept);
                None
            }
            Some(Selection::Multiple(mut items)) => {
                let removed = items.shift_remove(id);
                if !items.is_empty() {
                    self.selections.insert(group.clone(), Selection::Multiple(items));
                }
                removed
            }
            None => None,
        };
        if let Some(item) = &removed {
            trace!(group = %group, item = %item.id, "Deselected");
            self.events.push(SelectionEvent::Deselected {
                group: group.clone(),
                item: item.clone(),
            });
        }
        self.changed(Some(group));
        removed
    }

    /// Select `item` if absent, deselect it if present. Returns true when it
    /// ends up selected.
    pub fn toggle(&mut self, group: &GroupName, item: SelectionItem) -> bool {
        if self.is_selected(group, &item.id) {
            self.deselect(group, &item.id);
            false
        } else {
            self.select(group, item);
            true
        }
    }

    /// Empty one group.
    pub fn clear_group(&mut self, group: &GroupName) {
        let previous = self.selections.remove(group);
        debug!(group = %group, had_selection = previous.is_some(), "Group cleared");
        self.events.push(SelectionEvent::Cleared {
            group: group.clone(),
            previous,
        });
        self.changed(Some(group));
    }

    /// Empty every group.
    pub fn clear_all(&mut self) {
        self.selections.clear();
        debug!("All selections cleared");
        self.events.push(SelectionEvent::ClearedAll);
        self.changed(None);
    }

    /// Clear `group` and its dependants per the cascade policy. Returns the
    /// groups that were asked to clear, in policy order.
    pub fn clear_cascading(&mut self, group: &GroupName) -> Vec<GroupName> {
        let cleared = self.cascade.cascade(group);
        for name in &cleared {
            let previous = self.selections.remove(name);
            self.events.push(SelectionEvent::Cleared {
                group: name.clone(),
                previous,
            });
        }
        debug!(group = %group, cleared = cleared.len(), "Cascading clear");
        self.changed(Some(group));
        cleared
    }

    /// Replace selections from a snapshot, atomically.
    ///
    /// # Errors
    ///
    /// `InvalidGroupOperation` if a single-mode group is given a list with
    /// more than one item. Nothing is applied in that case.
    pub fn restore(&mut self, snapshot: SelectionSnapshot) -> Result<(), SelectionError> {
        let mut restored = BTreeMap::new();
        for (group, stored) in snapshot {
            let mode = self.group_config(&group).mode;
            let selection = match (mode, stored) {
                (SelectionMode::Single, StoredSelection::One(item)) => {
                    Some(Selection::Single(item.into_item()))
                }
                (SelectionMode::Single, StoredSelection::Many(items)) if items.len() > 1 => {
                    return Err(SelectionError::InvalidGroupOperation {
                        group,
                        reason: format!("single-mode group given {} items", items.len()),
                    });
                }
                (SelectionMode::Single, StoredSelection::Many(items)) => items
                    .into_iter()
                    .next()
                    .map(|item| Selection::Single(item.into_item())),
                (SelectionMode::Multiple, stored) => {
                    let items = match stored {
                        StoredSelection::Many(items) => items,
                        StoredSelection::One(item) => vec![item],
                    };
                    let set: IndexMap<_, _> = items
                        .into_iter()
                        .map(StoredItem::into_item)
                        .map(|item| (item.id.clone(), item))
                        .collect();
                    (!set.is_empty()).then_some(Selection::Multiple(set))
                }
            };
            if let Some(selection) = selection {
                restored.insert(group, selection);
            }
        }
        self.selections = restored;
        debug!(groups = self.selections.len(), "Selections restored");
        self.events.push(SelectionEvent::Loaded);
        self.changed(None);
        Ok(())
    }

    fn changed(&mut self, group: Option<&GroupName>) {
        self.events.push(SelectionEvent::Changed {
            group: group.cloned(),
        });
    }

    /// Drain pending notifications, oldest first.
    pub fn take_events(&mut self) -> Vec<SelectionEvent> {
        std::mem::take(&mut self.events)
    }

    // ===== Queries =====

    /// True when `id` is selected in `group`.
    pub fn is_selected(&self, group: &GroupName, id: &ItemId) -> bool {
        self.selections
            .get(group)
            .is_some_and(|selection| selection.contains(id))
    }

    /// Raw selection of `group`.
    pub fn selection(&self, group: &GroupName) -> Option<&Selection> {
        self.selections.get(group)
    }

    /// Items selected in `group`, possibly empty.
    pub fn selections(&self, group: &GroupName) -> Vec<&SelectionItem> {
        self.selections
            .get(group)
            .map(Selection::items)
            .unwrap_or_default()
    }

    /// Every non-empty group.
    pub fn all_selections(&self) -> &BTreeMap<GroupName, Selection> {
        &self.selections
    }

    /// Number of items in `group`.
    pub fn count(&self, group: &GroupName) -> usize {
        self.selections.get(group).map_or(0, Selection::len)
    }

    /// Number of items across all groups.
    pub fn total_count(&self) -> usize {
        self.selections.values().map(Selection::len).sum()
    }

    /// True when `group` holds anything.
    pub fn has_selection(&self, group: &GroupName) -> bool {
        self.count(group) > 0
    }

    /// Required groups that are currently empty.
    pub fn validate(&self) -> Vec<GroupName> {
        self.groups
            .iter()
            .filter(|(name, config)| config.required && !self.has_selection(name))
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Flat parameters: single groups map to the id, multiple groups to the
    /// comma-joined ids.
    pub fn to_params(&self) -> BTreeMap<String, String> {
        self.selections
            .iter()
            .map(|(group, selection)| {
                let value = selection
                    .items()
                    .iter()
                    .map(|item| item.id.as_str())
                    .collect::<Vec<_>>()
                    .join(",");
                (group.to_string(), value)
            })
            .collect()
    }

    /// Serializable selections; multiple groups become ordered lists.
    pub fn snapshot(&self) -> SelectionSnapshot {
        self.selections
            .iter()
            .map(|(group, selection)| {
                let stored = match selection {
                    Selection::Single(item) => StoredSelection::One(StoredItem::Item(item.clone())),
                    Selection::Multiple(items) => StoredSelection::Many(
                        items.values().cloned().map(StoredItem::Item).collect(),
                    ),
                };
                (group.clone(), stored)
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "selection_tests.rs"]
mod tests;
