//! Navigation and selection state machines (pure).
//!
//! All state transitions are synchronous and side-effect free apart from the
//! notifications each component leaves in its own outbox. Nothing here talks
//! to a sibling component; cross-component reactions live in
//! [`crate::mediator`].

pub mod active_filters;
pub mod navigation;
pub mod params;
pub mod selection;

// Re-export for convenience
pub use active_filters::{ActiveFilter, ActiveFilterSet, FilterCounts, FilterEvent};
pub use navigation::{
    BreadcrumbView, Card, NavTransition, NavigationEvent, NavigationSnapshot, NavigationState,
    NavigationView, RootTransition,
};
pub use params::Params;
pub use selection::{
    CascadePolicy, GroupConfig, GroupConfigUpdate, NoCascade, OrderedCascade, Selection,
    SelectionEvent, SelectionMode, SelectionSnapshot, SelectionState, StoredItem,
    StoredSelection,
};
