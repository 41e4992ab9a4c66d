//! Selectable items and directly-selected products.

use super::identifiers::{InvalidId, ItemId};
use super::node::Node;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A value that can sit in a selection group.
///
/// Only `id` takes part in identity; the rest is carried for display and for
/// building search payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionItem {
    /// Identity within its group.
    pub id: ItemId,
    /// Display label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Display icon.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Anything else the producer attached (e.g. `tipoColoracao`).
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl SelectionItem {
    /// Item with only an id.
    pub fn new(id: impl Into<String>) -> Result<Self, InvalidId> {
        Ok(Self {
            id: ItemId::new(id)?,
            label: None,
            icon: None,
            extra: BTreeMap::new(),
        })
    }

    /// Builder: set the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Builder: set the icon.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Item describing a catalog node (id, label, icon).
    pub fn from_node(node: &Node) -> Self {
        Self {
            id: ItemId::from(node.id()),
            label: Some(node.display_label().to_string()),
            icon: node.icon().map(str::to_string),
            extra: BTreeMap::new(),
        }
    }

    /// Label, or the id when no label is set.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(self.id.as_str())
    }
}

/// A terminal product picked directly, keyed by its brand key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedProduct {
    /// Deduplication key (the original "marca" string sent to search).
    pub brand: String,
    /// Display label.
    pub label: String,
    /// Display icon.
    pub icon: String,
    /// Vision type active when the product was picked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vision: Option<String>,
    /// Family (or brand) label active when the product was picked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    /// Breadcrumb trail text, `A > B > C`.
    #[serde(default)]
    pub path: String,
}
