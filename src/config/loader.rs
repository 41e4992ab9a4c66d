//! Configuration file loading with precedence handling.

use super::{default_config_groups, default_selection_groups, ConfigGroups, SelectionGroups};
use crate::model::{FilterKind, NodeId};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "CATNAV_CONFIG";
/// Environment variable overriding the catalog path.
pub const CATALOG_ENV: &str = "CATNAV_CATALOG";
/// Environment variable overriding the snapshot path.
pub const STATE_ENV: &str = "CATNAV_STATE";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (permission issues, not a file, ...).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// A configuration subtree was mapped onto a unique filter kind.
    #[error("Configuration node '{node}' cannot map to unique filter kind '{kind}'")]
    UniqueConfigGroup {
        /// The configuration node id.
        node: NodeId,
        /// The rejected kind.
        kind: FilterKind,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, built-in defaults are used.
/// Corresponds to `~/.config/catnav/config.toml`:
///
/// ```toml
/// catalog = "/srv/lentes/catalog.json"
/// restore_on_start = false
///
/// [selection.groups.tratamento]
/// mode = "multiple"
/// required = true
///
/// [config_groups]
/// antiReflexo = "anti-reflective"
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Catalog JSON to load.
    #[serde(default)]
    pub catalog: Option<PathBuf>,

    /// Session snapshot file.
    #[serde(default)]
    pub state_file: Option<PathBuf>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Whether to resume the saved session on start.
    #[serde(default)]
    pub restore_on_start: Option<bool>,

    /// Generic selection ledger settings.
    #[serde(default)]
    pub selection: Option<SelectionSection>,

    /// Extra or replacement configuration subtree mappings.
    #[serde(default)]
    pub config_groups: Option<BTreeMap<NodeId, FilterKind>>,
}

/// `[selection]` table.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SelectionSection {
    /// Groups added to, or replacing, the built-in ones by name.
    #[serde(default)]
    pub groups: SelectionGroups,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Catalog JSON, if known yet.
    pub catalog: Option<PathBuf>,
    /// Session snapshot file.
    pub state_file: PathBuf,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
    /// Whether to resume the saved session on start.
    pub restore_on_start: bool,
    /// Ledger groups.
    pub selection_groups: SelectionGroups,
    /// Configuration subtree mapping.
    pub config_groups: ConfigGroups,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            catalog: None,
            state_file: default_state_path(),
            log_file_path: default_log_path(),
            restore_on_start: true,
            selection_groups: default_selection_groups(),
            config_groups: default_config_groups(),
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/catnav/catnav.log` on Unix-like systems, or the
/// platform equivalent. Falls back to the current directory.
pub fn default_log_path() -> PathBuf {
    match dirs::state_dir() {
        Some(state_dir) => state_dir.join("catnav").join("catnav.log"),
        None => PathBuf::from("catnav.log"),
    }
}

/// Resolve default snapshot path, next to the log file.
pub fn default_state_path() -> PathBuf {
    match dirs::state_dir().or_else(dirs::data_local_dir) {
        Some(dir) => dir.join("catnav").join("session.json"),
        None => PathBuf::from("catnav-session.json"),
    }
}

/// Resolve default config file path.
///
/// Returns `~/.config/catnav/config.toml` on Unix, appropriate path on other
/// platforms. Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("catnav").join("config.toml"))
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    if !path.exists() {
        debug!(path = %path.display(), "No config file");
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    debug!(path = %path.display(), "Config file loaded");
    Ok(Some(config))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `CATNAV_CONFIG` environment variable
/// 3. Default path `~/.config/catnav/config.toml`
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        return load_config_file(PathBuf::from(env_path));
    }

    match default_config_path() {
        Some(default_path) => load_config_file(default_path),
        None => Ok(None),
    }
}

/// Merge config file into defaults to create resolved config.
///
/// Scalar keys replace the default. Selection groups and config group
/// mappings are merged by name, the file winning.
///
/// # Errors
///
/// `UniqueConfigGroup` if a configuration subtree maps to vision type,
/// brand or family.
pub fn merge_config(config_file: Option<ConfigFile>) -> Result<ResolvedConfig, ConfigError> {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return Ok(defaults);
    };

    let mut selection_groups = defaults.selection_groups;
    if let Some(section) = config.selection {
        selection_groups.extend(section.groups);
    }

    let mut config_groups = defaults.config_groups;
    for (node, kind) in config.config_groups.unwrap_or_default() {
        if kind.is_unique() {
            return Err(ConfigError::UniqueConfigGroup { node, kind });
        }
        config_groups.insert(node, kind);
    }

    Ok(ResolvedConfig {
        catalog: config.catalog.or(defaults.catalog),
        state_file: config.state_file.unwrap_or(defaults.state_file),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
        restore_on_start: config.restore_on_start.unwrap_or(defaults.restore_on_start),
        selection_groups,
        config_groups,
    })
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `CATNAV_CATALOG`: override the catalog path
/// - `CATNAV_STATE`: override the snapshot path
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(catalog) = std::env::var(CATALOG_ENV) {
        config.catalog = Some(PathBuf::from(catalog));
    }
    if let Ok(state) = std::env::var(STATE_ENV) {
        config.state_file = PathBuf::from(state);
    }
    config
}

/// Overrides taken from the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    /// Catalog positional argument.
    pub catalog: Option<PathBuf>,
    /// `--state`.
    pub state_file: Option<PathBuf>,
    /// `--no-restore`.
    pub no_restore: bool,
}

/// Apply CLI argument overrides to resolved config.
///
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(mut config: ResolvedConfig, cli: CliOverrides) -> ResolvedConfig {
    if let Some(catalog) = cli.catalog {
        config.catalog = Some(catalog);
    }
    if let Some(state_file) = cli.state_file {
        config.state_file = state_file;
    }
    if cli.no_restore {
        config.restore_on_start = false;
    }
    config
}

/// Full precedence chain: load the file, merge, then env, then CLI.
///
/// # Errors
///
/// See [`load_config_with_precedence`] and [`merge_config`].
pub fn resolve_config(
    config_path: Option<PathBuf>,
    cli: CliOverrides,
) -> Result<ResolvedConfig, ConfigError> {
    let file = load_config_with_precedence(config_path)?;
    let merged = merge_config(file)?;
    Ok(apply_cli_overrides(apply_env_overrides(merged), cli))
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
