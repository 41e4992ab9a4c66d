//! Filter dimensions of the active filter set.

use super::identifiers::GroupName;
use super::node::NodeKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One filter dimension.
///
/// The first three are *unique* (at most one value, cascading in declaration
/// order); the remaining six are *multiple* (any number of values).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterKind {
    /// Vision type (unique, cascade head).
    VisionType,
    /// Brand (unique, depends on vision type).
    Brand,
    /// Family (unique, depends on brand).
    Family,
    /// Lens material.
    Material,
    /// Anti-reflective coating.
    AntiReflective,
    /// Photosensitive treatment.
    Photosensitive,
    /// Tint / colouring.
    Tint,
    /// Blue-light filter.
    AntiBlue,
    /// Refractive index.
    Index,
}

impl FilterKind {
    /// Unique kinds in cascade order.
    pub const UNIQUE: [FilterKind; 3] = [FilterKind::VisionType, FilterKind::Brand, FilterKind::Family];

    /// Multiple kinds in display order.
    pub const MULTIPLE: [FilterKind; 6] = [
        FilterKind::Material,
        FilterKind::AntiReflective,
        FilterKind::Photosensitive,
        FilterKind::Tint,
        FilterKind::AntiBlue,
        FilterKind::Index,
    ];

    /// Every kind, unique first.
    pub fn all() -> impl Iterator<Item = FilterKind> {
        Self::UNIQUE.into_iter().chain(Self::MULTIPLE)
    }

    /// Kebab-case name, also the selection group name.
    pub fn as_str(self) -> &'static str {
        match self {
            FilterKind::VisionType => "vision-type",
            FilterKind::Brand => "brand",
            FilterKind::Family => "family",
            FilterKind::Material => "material",
            FilterKind::AntiReflective => "anti-reflective",
            FilterKind::Photosensitive => "photosensitive",
            FilterKind::Tint => "tint",
            FilterKind::AntiBlue => "anti-blue",
            FilterKind::Index => "index",
        }
    }

    /// Selection group backing this kind.
    pub fn group(self) -> GroupName {
        GroupName::from_static(self.as_str())
    }

    /// Kind whose group is `group`, if any.
    pub fn from_group(group: &GroupName) -> Option<Self> {
        group.as_str().parse().ok()
    }

    /// True for vision type, brand and family.
    pub fn is_unique(self) -> bool {
        Self::UNIQUE.contains(&self)
    }

    /// True for the six multi-valued kinds.
    pub fn is_multiple(self) -> bool {
        !self.is_unique()
    }

    /// Position in the cascade (None for multiple kinds).
    pub fn cascade_rank(self) -> Option<usize> {
        Self::UNIQUE.iter().position(|&k| k == self)
    }

    /// Field name used in search payloads.
    pub fn search_field(self) -> &'static str {
        match self {
            FilterKind::VisionType => "visao",
            FilterKind::Brand => "marca",
            FilterKind::Family => "familia",
            FilterKind::Material => "material",
            FilterKind::AntiReflective => "antireflexo",
            FilterKind::Photosensitive => "fotossensivel",
            FilterKind::Tint => "coloracao",
            FilterKind::AntiBlue => "antiblue",
            FilterKind::Index => "indice",
        }
    }

    /// Unique kind a navigated node registers as, if any.
    pub fn for_node_kind(kind: NodeKind) -> Option<Self> {
        match kind {
            NodeKind::Category => Some(FilterKind::VisionType),
            NodeKind::Brand => Some(FilterKind::Brand),
            NodeKind::Family => Some(FilterKind::Family),
            _ => None,
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a [`FilterKind`] name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown filter kind '{0}'")]
pub struct UnknownFilterKind(pub String);

impl FromStr for FilterKind {
    type Err = UnknownFilterKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterKind::all()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownFilterKind(s.to_string()))
    }
}
