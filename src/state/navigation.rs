//! Hierarchical navigation state machine.
//!
//! `NavigationState` walks a shared [`CatalogTree`]: it holds the current
//! node, a breadcrumb stack of the nodes above it, and the parameter
//! dictionary derived from that path. Every transition leaves exactly one
//! [`NavigationEvent`] in the outbox; the coordinator drains it with
//! [`NavigationState::take_events`].
//!
//! Failures are reported, never fatal: a failed transition logs a warning,
//! returns an error, and leaves the state untouched.

use super::params::{self, Params};
use crate::model::{CatalogTree, NavigationError, Node, NodeId, NodeIndex, NodeKind};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Icon shown when the current node declares none.
pub const DEFAULT_ICON: &str = "📦";

// ===== Breadcrumbs =====

/// One stack entry: a visited node and the stack length when it was pushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Breadcrumb {
    node: NodeIndex,
    ordinal: usize,
}

/// Breadcrumb as shown to consumers. The root entry is never included.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreadcrumbView {
    /// Node id.
    pub id: NodeId,
    /// Label (falls back to title).
    pub label: String,
    /// Node icon.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Node kind.
    pub kind: NodeKind,
    /// Position in the internal stack; pass it to `go_to_level`.
    pub ordinal: usize,
}

// ===== Transitions and events =====

/// How a transition to the root should be announced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RootTransition {
    /// A user "home" gesture: consumers clear context-dependent state.
    Home,
    /// A plain repositioning: consumers keep their state.
    Silent,
}

/// Which transition produced a [`NavigationEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NavTransition {
    /// Entered a child of the previous node.
    Navigated,
    /// Popped one level.
    WentBack,
    /// Jumped to a breadcrumb.
    Jumped {
        /// Ordinal that was requested.
        ordinal: usize,
    },
    /// Returned to the root.
    Root(RootTransition),
    /// Reset (startup or catalog replacement).
    Reset,
}

/// Read-only snapshot of the navigation state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavigationView {
    /// Current node id.
    pub id: NodeId,
    /// Current node kind.
    pub kind: NodeKind,
    /// Current node label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Current node title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Current node icon.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Current node description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the current node has children.
    pub has_children: bool,
    /// Whether the current node is the root.
    pub is_root: bool,
    /// Whether the current node is a product.
    pub is_product: bool,
    /// Whether `go_back` would succeed.
    pub can_go_back: bool,
    /// Breadcrumbs, root excluded.
    pub breadcrumbs: Vec<BreadcrumbView>,
    /// Path-derived parameters.
    pub params: Params,
}

/// Notification left in the outbox by each transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavigationEvent {
    /// What happened.
    pub transition: NavTransition,
    /// State after the transition.
    pub view: NavigationView,
    /// Root-first path after the transition.
    #[serde(skip)]
    pub path: Vec<NodeIndex>,
}

impl NavigationEvent {
    /// Position of the node the transition ended on.
    pub fn node(&self) -> NodeIndex {
        self.path
            .last()
            .copied()
            .unwrap_or(NodeIndex(0))
    }
}

/// A child rendered as a selectable card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    /// Child id.
    pub id: NodeId,
    /// Child icon.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Label, falling back to title.
    pub title: String,
    /// Description or empty.
    pub description: String,
    /// Badge attribute, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    /// Child kind.
    pub kind: NodeKind,
    /// Whether activating the card drills further down.
    pub has_children: bool,
}

/// Children of `index` as cards.
pub fn cards_for(tree: &CatalogTree, index: NodeIndex) -> Vec<Card> {
    tree.children(index)
        .map(|(_, child)| Card {
            id: child.id().clone(),
            icon: child.icon().map(str::to_string),
            title: child.display_label().to_string(),
            description: child.description().unwrap_or("").to_string(),
            badge: child.attribute_str("badge").map(str::to_string),
            kind: child.kind(),
            has_children: child.has_children(),
        })
        .collect()
}

/// Persisted form of the navigation position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NavigationSnapshot {
    /// Current node id (None is the root).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<NodeId>,
    /// Params at save time. Informational: restore re-derives them.
    #[serde(default)]
    pub params: Params,
}

// ===== NavigationState =====

/// Breadcrumb navigation over a shared catalog.
#[derive(Debug, Clone)]
pub struct NavigationState {
    catalog: Arc<CatalogTree>,
    current: NodeIndex,
    breadcrumbs: Vec<Breadcrumb>,
    params: Params,
    events: Vec<NavigationEvent>,
}

impl NavigationState {
    /// Start at the root of `catalog`. No event is emitted.
    pub fn new(catalog: Arc<CatalogTree>) -> Self {
        let current = catalog.root_index();
        Self {
            catalog,
            current,
            breadcrumbs: Vec::new(),
            params: Params::new(),
            events: Vec::new(),
        }
    }

    // ===== Transitions =====

    /// Enter the child of the current node whose id is `child_id`.
    ///
    /// # Errors
    ///
    /// `NodeNotFound` if the current node has no such child.
    pub fn navigate_to(&mut self, child_id: &str) -> Result<(), NavigationError> {
        let Some(child) = self.catalog.child_by_id(self.current, child_id) else {
            warn!(node = child_id, from = %self.current_node().id(), "Child node not found");
            return Err(NavigationError::not_found(child_id));
        };
        self.advance(child);
        Ok(())
    }

    fn advance(&mut self, child: NodeIndex) {
        self.breadcrumbs.push(Breadcrumb {
            node: self.current,
            ordinal: self.breadcrumbs.len(),
        });
        self.current = child;
        debug!(
            node = %self.current_node().id(),
            kind = ?self.current_kind(),
            depth = self.breadcrumbs.len(),
            "Navigated"
        );
        self.finish(NavTransition::Navigated);
    }

    /// Return to the previous node.
    ///
    /// # Errors
    ///
    /// `NothingToGoBack` when already at the root.
    pub fn go_back(&mut self) -> Result<(), NavigationError> {
        let Some(previous) = self.breadcrumbs.pop() else {
            warn!("Cannot go back from the root");
            return Err(NavigationError::NothingToGoBack);
        };
        self.current = previous.node;
        debug!(node = %self.current_node().id(), "Went back");
        self.finish(NavTransition::WentBack);
        Ok(())
    }

    /// Jump to the breadcrumb at `ordinal`, discarding everything after it.
    ///
    /// Ordinal 0 is the root entry, and any ordinal at or past the stack
    /// length does not name an ancestor; both return home.
    pub fn go_to_level(&mut self, ordinal: usize) {
        if ordinal == 0 || ordinal >= self.breadcrumbs.len() {
            if ordinal != 0 {
                warn!(
                    ordinal,
                    depth = self.breadcrumbs.len(),
                    "Breadcrumb ordinal out of range, returning home"
                );
            }
            self.go_home();
            return;
        }

        self.breadcrumbs.truncate(ordinal + 1);
        if let Some(target) = self.breadcrumbs.pop() {
            self.current = target.node;
        }
        debug!(node = %self.current_node().id(), ordinal, "Jumped to breadcrumb");
        self.finish(NavTransition::Jumped { ordinal });
    }

    /// Return to the root as a "home" gesture.
    pub fn go_home(&mut self) {
        self.return_to_root(RootTransition::Home);
    }

    /// Return to the root without the "home" meaning.
    pub fn go_to_root(&mut self) {
        self.return_to_root(RootTransition::Silent);
    }

    /// Clear the stack and params and stand on the root.
    pub fn return_to_root(&mut self, mode: RootTransition) {
        self.clear_position();
        debug!(?mode, "Returned to root");
        self.finish(NavTransition::Root(mode));
    }

    /// Reset to the root, announced as a reset.
    pub fn reset(&mut self) {
        self.clear_position();
        debug!("Navigation reset");
        self.finish(NavTransition::Reset);
    }

    /// Swap the catalog and reset onto its root.
    pub fn replace_catalog(&mut self, catalog: Arc<CatalogTree>) {
        self.catalog = catalog;
        self.reset();
    }

    /// Navigate straight to any node by id.
    ///
    /// Returns home first, then replays one forward step per node on the path.
    ///
    /// # Errors
    ///
    /// `NodeNotFound` if the id is not in the tree; the state is untouched.
    pub fn navigate_to_id(&mut self, id: &str) -> Result<(), NavigationError> {
        let Some(path) = self.catalog.path_to(id) else {
            warn!(node = id, "Node not found in catalog");
            return Err(NavigationError::not_found(id));
        };
        self.go_home();
        for &index in path.iter().skip(1) {
            self.advance(index);
        }
        Ok(())
    }

    fn clear_position(&mut self) {
        self.breadcrumbs.clear();
        self.current = self.catalog.root_index();
    }

    fn finish(&mut self, transition: NavTransition) {
        let path = self.path();
        self.params = params::derive(&self.catalog, &path);
        let view = self.state();
        self.events.push(NavigationEvent {
            transition,
            view,
            path,
        });
    }

    /// Drain pending notifications, oldest first.
    pub fn take_events(&mut self) -> Vec<NavigationEvent> {
        std::mem::take(&mut self.events)
    }

    // ===== Queries =====

    /// The shared catalog.
    pub fn catalog(&self) -> &Arc<CatalogTree> {
        &self.catalog
    }

    /// Position of the current node.
    pub fn current_index(&self) -> NodeIndex {
        self.current
    }

    /// The current node.
    pub fn current_node(&self) -> &Node {
        self.catalog.node(self.current)
    }

    /// Kind of the current node.
    pub fn current_kind(&self) -> NodeKind {
        self.current_node().kind()
    }

    /// Title, falling back to label.
    pub fn current_title(&self) -> &str {
        let node = self.current_node();
        node.title().or(node.label()).unwrap_or("")
    }

    /// Label, falling back to title.
    pub fn current_label(&self) -> &str {
        let node = self.current_node();
        node.label().or(node.title()).unwrap_or("")
    }

    /// Icon, or [`DEFAULT_ICON`].
    pub fn current_icon(&self) -> &str {
        self.current_node().icon().unwrap_or(DEFAULT_ICON)
    }

    /// Children of the current node.
    pub fn children(&self) -> impl Iterator<Item = (NodeIndex, &Node)> {
        self.catalog.children(self.current)
    }

    /// Children of the current node as cards.
    pub fn children_as_cards(&self) -> Vec<Card> {
        cards_for(&self.catalog, self.current)
    }

    /// True at the root.
    pub fn is_root(&self) -> bool {
        self.current_kind() == NodeKind::Root || self.breadcrumbs.is_empty()
    }

    /// True on a product node.
    pub fn is_product(&self) -> bool {
        self.current_kind() == NodeKind::Product
    }

    /// True when the current node has children.
    pub fn has_children(&self) -> bool {
        self.current_node().has_children()
    }

    /// True when `go_back` would succeed.
    pub fn can_go_back(&self) -> bool {
        !self.breadcrumbs.is_empty()
    }

    /// Number of entries on the breadcrumb stack.
    pub fn depth(&self) -> usize {
        self.breadcrumbs.len()
    }

    /// Breadcrumbs for display, root excluded.
    pub fn breadcrumbs(&self) -> Vec<BreadcrumbView> {
        self.breadcrumbs
            .iter()
            .filter_map(|crumb| {
                let node = self.catalog.node(crumb.node);
                (node.kind() != NodeKind::Root).then(|| BreadcrumbView {
                    id: node.id().clone(),
                    label: node.display_label().to_string(),
                    icon: node.icon().map(str::to_string),
                    kind: node.kind(),
                    ordinal: crumb.ordinal,
                })
            })
            .collect()
    }

    /// Path-derived parameters.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Root-first path ending at the current node.
    pub fn path(&self) -> Vec<NodeIndex> {
        self.breadcrumbs
            .iter()
            .map(|crumb| crumb.node)
            .chain(std::iter::once(self.current))
            .collect()
    }

    /// `A > B > C` trail of the path, root excluded.
    pub fn path_text(&self) -> String {
        self.path()
            .into_iter()
            .map(|index| self.catalog.node(index))
            .filter(|node| node.kind() != NodeKind::Root)
            .map(Node::display_label)
            .collect::<Vec<_>>()
            .join(" > ")
    }

    /// Full read-only view.
    pub fn state(&self) -> NavigationView {
        let node = self.current_node();
        NavigationView {
            id: node.id().clone(),
            kind: node.kind(),
            label: node.label().map(str::to_string),
            title: node.title().map(str::to_string),
            icon: node.icon().map(str::to_string),
            description: node.description().map(str::to_string),
            has_children: self.has_children(),
            is_root: self.is_root(),
            is_product: self.is_product(),
            can_go_back: self.can_go_back(),
            breadcrumbs: self.breadcrumbs(),
            params: self.params.clone(),
        }
    }

    // ===== Persistence =====

    /// Serializable position.
    pub fn snapshot(&self) -> NavigationSnapshot {
        NavigationSnapshot {
            node_id: (!self.is_root()).then(|| self.current_node().id().clone()),
            params: self.params.clone(),
        }
    }

    /// Re-enter a saved position. A snapshot taken at the root returns
    /// silently to the root.
    ///
    /// # Errors
    ///
    /// `NodeNotFound` if the saved node no longer exists.
    pub fn restore(&mut self, snapshot: &NavigationSnapshot) -> Result<(), NavigationError> {
        match &snapshot.node_id {
            Some(id) => self.navigate_to_id(id.as_str()),
            None => {
                self.go_to_root();
                Ok(())
            }
        }
    }
}

#[cfg(test)]
#[path = "navigation_tests.rs"]
mod tests;
