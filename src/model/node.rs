//! Catalog nodes.

use super::identifiers::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kind tag of a catalog node.
///
/// Serialized in kebab-case to match catalog files (`"config-option"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    /// The single root of a tree.
    Root,
    /// Vision type (longe, perto, multifocal, ...).
    Category,
    /// Grouping below a category (e.g. "by brand", "quick filters").
    Subcategory,
    /// Quick filter grouping.
    Filter,
    /// Lens manufacturer.
    Brand,
    /// Product family.
    Family,
    /// Terminal product.
    Product,
    /// Configuration dimension (material, index, ...).
    Config,
    /// Option inside a configuration dimension.
    ConfigOption,
    /// Value inside a configuration option.
    ConfigValue,
}

impl NodeKind {
    /// Kebab-case tag, as it appears in catalog files.
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Category => "category",
            NodeKind::Subcategory => "subcategory",
            NodeKind::Filter => "filter",
            NodeKind::Brand => "brand",
            NodeKind::Family => "family",
            NodeKind::Product => "product",
            NodeKind::Config => "config",
            NodeKind::ConfigOption => "config-option",
            NodeKind::ConfigValue => "config-value",
        }
    }

    /// True for the three configuration kinds.
    pub fn is_config(self) -> bool {
        matches!(
            self,
            NodeKind::Config | NodeKind::ConfigOption | NodeKind::ConfigValue
        )
    }
}

/// Position of a node inside its [`CatalogTree`](super::CatalogTree) arena.
///
/// Only meaningful for the tree that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub(crate) usize);

impl NodeIndex {
    /// Raw arena offset.
    pub fn get(self) -> usize {
        self.0
    }
}

/// One catalog entry. Immutable once the tree is built.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) kind: NodeKind,
    pub(crate) label: Option<String>,
    pub(crate) title: Option<String>,
    pub(crate) icon: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) attributes: BTreeMap<String, serde_json::Value>,
    pub(crate) parent: Option<NodeIndex>,
    pub(crate) children: Vec<NodeIndex>,
}

impl Node {
    /// Unique id.
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    /// Kind tag.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Short label, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Long title, if any.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Icon glyph, if any.
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    /// Free-form description, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Label, falling back to title, then id. Used for breadcrumbs and chips.
    pub fn display_label(&self) -> &str {
        self.label
            .as_deref()
            .or(self.title.as_deref())
            .unwrap_or(self.id.as_str())
    }

    /// Title, falling back to label, then id. Used for headers.
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.label.as_deref())
            .unwrap_or(self.id.as_str())
    }

    /// Extra attribute carried verbatim from the catalog file (`marca`, `value`, ...).
    pub fn attribute(&self, key: &str) -> Option<&serde_json::Value> {
        self.attributes.get(key)
    }

    /// Extra attribute as a string, if it is one.
    pub fn attribute_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(|v| v.as_str())
    }

    /// All extra attributes.
    pub fn attributes(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.attributes
    }

    /// Parent position (None for the root).
    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    /// Ordered child positions.
    pub fn children(&self) -> &[NodeIndex] {
        &self.children
    }

    /// True when the node has at least one child.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}
