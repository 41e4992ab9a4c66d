//! Path-derived search parameters.
//!
//! The parameter dictionary is a pure function of the navigation path: for
//! every non-root node on the path whose kind appears in the fixed table,
//! the matching key holds that node's id (deepest node wins). The three
//! configuration kinds also contribute a `<key>Label` companion.

use crate::model::{CatalogTree, NodeIndex, NodeKind};
use std::collections::BTreeMap;

/// Parameter dictionary: logical key → value. Order irrelevant.
pub type Params = BTreeMap<String, String>;

/// Param key a node kind contributes, if any.
pub fn param_key(kind: NodeKind) -> Option<&'static str> {
    match kind {
        NodeKind::Category => Some("tipoVisao"),
        NodeKind::Subcategory => Some("subcategoria"),
        NodeKind::Filter => Some("filtro"),
        NodeKind::Brand => Some("marca"),
        NodeKind::Family => Some("familia"),
        NodeKind::Product => Some("produto"),
        NodeKind::Config => Some("configTipo"),
        NodeKind::ConfigOption => Some("configOpcao"),
        NodeKind::ConfigValue => Some("configValor"),
        NodeKind::Root => None,
    }
}

/// Companion label key for configuration kinds.
pub fn label_key(kind: NodeKind) -> Option<String> {
    if kind.is_config() {
        param_key(kind).map(|key| format!("{key}Label"))
    } else {
        None
    }
}

/// Insert the entries contributed by one node.
pub(crate) fn contribute(params: &mut Params, tree: &CatalogTree, index: NodeIndex) {
    let node = tree.node(index);
    let Some(key) = param_key(node.kind()) else {
        return;
    };
    params.insert(key.to_string(), node.id().to_string());
    if let Some(label_key) = label_key(node.kind()) {
        params.insert(label_key, node.display_label().to_string());
    }
}

/// Params for a root-first path.
pub fn derive(tree: &CatalogTree, path: &[NodeIndex]) -> Params {
    let mut params = Params::new();
    for &index in path {
        contribute(&mut params, tree, index);
    }
    params
}
