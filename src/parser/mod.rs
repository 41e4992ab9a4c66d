//! Catalog JSON parser.
//!
//! This module provides pure parsing functions for converting the nested
//! catalog document into a validated [`CatalogTree`] arena.

use crate::model::{CatalogError, CatalogTree, Node, NodeId, NodeIndex, NodeKind};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Raw JSON structure for deserializing catalog nodes.
#[derive(Debug, Deserialize)]
struct RawNode {
    #[serde(default)]
    id: String,
    #[serde(rename = "type")]
    kind: NodeKind,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    icon: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    children: Vec<RawNode>,
    /// Everything else (`marca`, `value`, `badge`, `corHex`, ...).
    #[serde(flatten)]
    attributes: BTreeMap<String, serde_json::Value>,
}

/// Parse a catalog document.
///
/// # Errors
///
/// Returns `CatalogError` if:
/// - the document is not valid JSON for the node shape (`InvalidJson`)
/// - the document is `null` (`MissingRoot`)
/// - the top-level node is not of kind `root` (`RootKind`)
/// - any id is empty (`EmptyId`) or repeated (`DuplicateId`)
/// - a nested node claims kind `root` (`NestedRoot`)
pub fn parse_catalog(raw: &str) -> Result<CatalogTree, CatalogError> {
    let root: Option<RawNode> = serde_json::from_str(raw)?;
    let root = root.ok_or(CatalogError::MissingRoot)?;

    if root.kind != NodeKind::Root {
        return Err(CatalogError::RootKind {
            id: root.id,
            kind: root.kind.as_str(),
        });
    }

    let mut builder = ArenaBuilder::default();
    builder.push(root, None, 0)?;

    tracing::debug!(nodes = builder.nodes.len(), "Catalog parsed");
    Ok(CatalogTree::from_parts(builder.nodes, builder.by_id))
}

/// Read and parse a catalog file.
///
/// # Errors
///
/// Returns `CatalogError::Io` if the file cannot be read, otherwise the
/// errors of [`parse_catalog`].
pub fn load_catalog(path: &Path) -> Result<CatalogTree, CatalogError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_catalog(&contents)
}

#[derive(Default)]
struct ArenaBuilder {
    nodes: Vec<Node>,
    by_id: HashMap<NodeId, NodeIndex>,
}

impl ArenaBuilder {
    fn push(
        &mut self,
        raw: RawNode,
        parent: Option<NodeIndex>,
        position: usize,
    ) -> Result<NodeIndex, CatalogError> {
        let id = NodeId::new(raw.id.as_str()).map_err(|_| CatalogError::EmptyId {
            parent: parent
                .map(|p| self.nodes[p.0].id().to_string())
                .unwrap_or_else(|| "<none>".to_string()),
            position,
        })?;

        if parent.is_some() && raw.kind == NodeKind::Root {
            return Err(CatalogError::NestedRoot(id.to_string()));
        }

        let index = NodeIndex(self.nodes.len());
        if self.by_id.insert(id.clone(), index).is_some() {
            return Err(CatalogError::DuplicateId(id.to_string()));
        }

        self.nodes.push(Node {
            id,
            kind: raw.kind,
            label: raw.label,
            title: raw.title,
            icon: raw.icon,
            description: raw.description,
            attributes: raw.attributes,
            parent,
            children: Vec::with_capacity(raw.children.len()),
        });

        for (child_position, child) in raw.children.into_iter().enumerate() {
            let child_index = self.push(child, Some(index), child_position)?;
            self.nodes[index.0].children.push(child_index);
        }

        Ok(index)
    }
}
