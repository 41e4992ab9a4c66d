//! Configuration module.
//!
//! Besides the TOML loader this holds the built-in defaults the catalog
//! works with out of the box: the selection groups of the generic ledger
//! and the mapping from configuration subtrees to filter kinds.

pub mod loader;

pub use loader::{
    apply_cli_overrides, apply_env_overrides, default_config_path, default_log_path,
    default_state_path, load_config_file, load_config_with_precedence, merge_config,
    resolve_config, CliOverrides, ConfigError, ConfigFile, ResolvedConfig, SelectionSection,
};

use crate::model::{FilterKind, GroupName, NodeId};
use crate::state::GroupConfig;
use std::collections::BTreeMap;

/// Configuration node id → filter kind its options toggle.
pub type ConfigGroups = BTreeMap<NodeId, FilterKind>;

/// Selection groups of the generic ledger.
pub type SelectionGroups = BTreeMap<GroupName, GroupConfig>;

/// Built-in ledger groups.
pub fn default_selection_groups() -> SelectionGroups {
    [
        ("tipoVisao", GroupConfig::single().required().with_label("Tipo de Visão")),
        ("material", GroupConfig::multiple().with_label("Material")),
        ("configuracao", GroupConfig::multiple().with_label("Configuração")),
        ("tratamento", GroupConfig::multiple().with_label("Tratamento")),
        ("indice", GroupConfig::single().with_label("Índice")),
    ]
    .into_iter()
    .filter_map(|(name, config)| GroupName::new(name).ok().map(|name| (name, config)))
    .collect()
}

/// Built-in configuration subtrees.
pub fn default_config_groups() -> ConfigGroups {
    [
        ("material", FilterKind::Material),
        ("antiReflexo", FilterKind::AntiReflective),
        ("fotossensivel", FilterKind::Photosensitive),
        ("coloracao", FilterKind::Tint),
        ("antiBlue", FilterKind::AntiBlue),
        ("indice", FilterKind::Index),
    ]
    .into_iter()
    .filter_map(|(id, kind)| NodeId::new(id).ok().map(|id| (id, kind)))
    .collect()
}
