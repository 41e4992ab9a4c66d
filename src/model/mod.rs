//! Domain model types (pure).
//!
//! All types in this module are pure data with smart constructors.

pub mod catalog;
pub mod error;
pub mod filter;
pub mod identifiers;
pub mod item;
pub mod node;

// Re-export for convenience
pub use catalog::CatalogTree;
pub use error::{
    AppError, CatalogError, Component, CoordinationError, InputError, NavigationError,
    SelectionError,
};
pub use filter::{FilterKind, UnknownFilterKind};
pub use identifiers::{GroupName, InvalidId, ItemId, NodeId};
pub use item::{SelectedProduct, SelectionItem};
pub use node::{Node, NodeIndex, NodeKind};
