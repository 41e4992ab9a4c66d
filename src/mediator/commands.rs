//! Top-level commands.
//!
//! Each command mutates the components through the context, then the
//! coordinator dispatches whatever the mutation announced.

use super::collaborators::{SearchKind, SearchService, UiSink};
use super::context::Context;
use super::Coordinator;
use crate::model::{
    CatalogTree, CoordinationError, FilterKind, GroupName, ItemId, NavigationError, NodeIndex,
    NodeKind, SelectedProduct, SelectionItem,
};
use crate::state::navigation::DEFAULT_ICON;
use crate::store::{SessionSnapshot, SNAPSHOT_VERSION};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Node attribute holding a product's brand key.
const BRAND_ATTRIBUTE: &str = "marca";
/// Fallback attribute for the brand key.
const VALUE_ATTRIBUTE: &str = "value";
/// Node attribute holding a product's family.
const FAMILY_ATTRIBUTE: &str = "familia";

/// What activating a card did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Activation {
    /// Drilled into the node.
    Navigated,
    /// Toggled a configuration filter.
    Config {
        /// Filter kind the option belongs to.
        kind: FilterKind,
        /// Whether it is now on.
        selected: bool,
    },
    /// Toggled a directly-selected product.
    Product {
        /// Brand key of the product.
        brand: String,
        /// Whether it is now selected.
        selected: bool,
    },
    /// Nothing applies to this node.
    Ignored,
}

type CommandResult<T = ()> = Result<T, CoordinationError>;

impl<S: SearchService, U: UiSink> Coordinator<S, U> {
    // ===== Navigation =====

    /// Enter a child of the current node.
    pub fn navigate_to(&mut self, child_id: &str) -> CommandResult {
        self.execute("navigate_to", |ctx| Ok(ctx.navigation_mut()?.navigate_to(child_id)?))
    }

    /// Return to the previous node.
    pub fn go_back(&mut self) -> CommandResult {
        self.execute("go_back", |ctx| Ok(ctx.navigation_mut()?.go_back()?))
    }

    /// Jump to a breadcrumb by ordinal.
    pub fn go_to_level(&mut self, ordinal: usize) -> CommandResult {
        self.execute("go_to_level", |ctx| {
            ctx.navigation_mut()?.go_to_level(ordinal);
            Ok(())
        })
    }

    /// Return to the root as a "home" gesture.
    pub fn go_home(&mut self) -> CommandResult {
        self.execute("go_home", |ctx| {
            ctx.navigation_mut()?.go_home();
            Ok(())
        })
    }

    /// Return to the root silently.
    pub fn go_to_root(&mut self) -> CommandResult {
        self.execute("go_to_root", |ctx| {
            ctx.navigation_mut()?.go_to_root();
            Ok(())
        })
    }

    /// Jump straight to any node.
    pub fn navigate_to_id(&mut self, id: &str) -> CommandResult {
        self.execute("navigate_to_id", |ctx| Ok(ctx.navigation_mut()?.navigate_to_id(id)?))
    }

    /// Swap the catalog; navigation resets onto the new root.
    pub fn replace_catalog(&mut self, catalog: Arc<CatalogTree>) -> CommandResult {
        self.execute("replace_catalog", |ctx| {
            ctx.navigation_mut()?.replace_catalog(catalog);
            Ok(())
        })
    }

    /// Open a configuration subtree from the root, keeping every filter.
    pub fn open_config(&mut self, id: &str) -> CommandResult {
        self.execute("open_config", |ctx| {
            let navigation = ctx.navigation_mut()?;
            navigation.go_to_root();
            Ok(navigation.navigate_to(id)?)
        })
    }

    /// Open a category from the root with the unique filters cleared.
    pub fn open_category(&mut self, id: &str) -> CommandResult {
        self.execute("open_category", |ctx| {
            ctx.navigation_mut()?.go_to_root();
            ctx.filters_mut()?.clear();
            Ok(ctx.navigation_mut()?.navigate_to(id)?)
        })
    }

    /// Card click on a child of the current node.
    pub fn activate(&mut self, node_id: &str) -> CommandResult<Activation> {
        self.execute("activate", |ctx| {
            let tree = Arc::clone(ctx.navigation().catalog());
            let current = ctx.navigation().current_index();
            let Some(index) = tree.child_by_id(current, node_id) else {
                return Err(NavigationError::not_found(node_id).into());
            };
            let node = tree.node(index);
            if node.has_children() {
                ctx.navigation_mut()?.navigate_to(node_id)?;
                Ok(Activation::Navigated)
            } else if node.kind().is_config() {
                toggle_config_at(ctx, &tree, index)
            } else {
                toggle_product_at(ctx, &tree, index)
            }
        })
    }

    // ===== Filters and products =====

    /// Toggle the configuration option `node_id` as a multiple filter.
    pub fn toggle_config(&mut self, node_id: &str) -> CommandResult<Activation> {
        self.execute("toggle_config", |ctx| {
            let tree = Arc::clone(ctx.navigation().catalog());
            let index = find(&tree, node_id)?;
            toggle_config_at(ctx, &tree, index)
        })
    }

    /// Toggle `node_id` as a directly-selected product.
    pub fn toggle_product(&mut self, node_id: &str) -> CommandResult<Activation> {
        self.execute("toggle_product", |ctx| {
            let tree = Arc::clone(ctx.navigation().catalog());
            let index = find(&tree, node_id)?;
            toggle_product_at(ctx, &tree, index)
        })
    }

    /// Drop a selected product by brand key.
    pub fn remove_product(&mut self, brand: &str) -> CommandResult {
        self.execute("remove_product", |ctx| {
            ctx.filters_mut()?.remove_product(brand);
            ctx.request_search(SearchKind::Filtered);
            Ok(())
        })
    }

    /// Add a filter directly.
    pub fn add_filter(&mut self, kind: FilterKind, item: SelectionItem) -> CommandResult {
        self.execute("add_filter", |ctx| {
            ctx.filters_mut()?.add(kind, item);
            ctx.request_search(SearchKind::Filtered);
            Ok(())
        })
    }

    /// Remove a filter.
    ///
    /// A multiple kind only loses `id`. A unique kind clears itself and
    /// every unique kind after it, then navigation rolls back to the
    /// deepest node on the path whose unique kind is still filled, or to
    /// the root when none is.
    pub fn remove_filter(&mut self, kind: FilterKind, id: &ItemId) -> CommandResult {
        self.execute("remove_filter", |ctx| {
            if kind.is_multiple() {
                ctx.filters_mut()?.remove(kind, id);
                ctx.request_search(SearchKind::Filtered);
                return Ok(());
            }

            ctx.filters_mut()?.remove_cascading(kind);
            let tree = Arc::clone(ctx.navigation().catalog());
            let path = ctx.navigation().path();
            let survivor = path.iter().rposition(|&index| {
                FilterKind::for_node_kind(tree.node(index).kind())
                    .is_some_and(|k| ctx.filters().unique(k).is_some())
            });
            match survivor {
                Some(ordinal) if ordinal + 1 == path.len() => {
                    ctx.request_search(SearchKind::Filtered);
                }
                Some(ordinal) => {
                    debug!(ordinal, "Rolling navigation back to surviving filter");
                    ctx.navigation_mut()?.go_to_level(ordinal);
                }
                None => {
                    if !ctx.navigation().is_root() {
                        ctx.navigation_mut()?.go_to_root();
                    }
                    ctx.request_search(SearchKind::Initial);
                }
            }
            Ok(())
        })
    }

    /// Clear every filter and product, then go home.
    pub fn clear_filters(&mut self) -> CommandResult {
        self.execute("clear_filters", |ctx| {
            ctx.filters_mut()?.clear_all();
            ctx.navigation_mut()?.go_home();
            Ok(())
        })
    }

    // ===== Generic ledger =====

    /// Select into a ledger group.
    pub fn select(&mut self, group: &GroupName, item: SelectionItem) -> CommandResult {
        self.execute("select", |ctx| {
            ctx.selection_mut()?.select(group, item);
            Ok(())
        })
    }

    /// Remove an item from a ledger group.
    pub fn deselect(&mut self, group: &GroupName, id: &ItemId) -> CommandResult<Option<SelectionItem>> {
        self.execute("deselect", |ctx| Ok(ctx.selection_mut()?.deselect(group, id)))
    }

    /// Toggle an item in a ledger group. Returns whether it is now selected.
    pub fn toggle(&mut self, group: &GroupName, item: SelectionItem) -> CommandResult<bool> {
        self.execute("toggle", |ctx| Ok(ctx.selection_mut()?.toggle(group, item)))
    }

    /// Empty one ledger group.
    pub fn clear_group(&mut self, group: &GroupName) -> CommandResult {
        self.execute("clear_group", |ctx| {
            ctx.selection_mut()?.clear_group(group);
            Ok(())
        })
    }

    /// Empty the whole ledger.
    pub fn clear_selections(&mut self) -> CommandResult {
        self.execute("clear_selections", |ctx| {
            ctx.selection_mut()?.clear_all();
            Ok(())
        })
    }

    // ===== Persistence =====

    /// Capture the session.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            version: SNAPSHOT_VERSION,
            saved_at: chrono::Utc::now(),
            navigation: self.navigation().snapshot(),
            selections: self.selection().snapshot(),
            filters: self.filters().ledger().snapshot(),
            products: self.filters().products().to_vec(),
        }
    }

    /// Resume a captured session.
    ///
    /// Navigation is replayed first; if the saved node is gone the restore
    /// stops there. The ledger and the filters are then replaced together,
    /// or not at all.
    pub fn restore(&mut self, snapshot: SessionSnapshot) -> CommandResult {
        self.execute("restore_navigation", |ctx| {
            Ok(ctx.navigation_mut()?.restore(&snapshot.navigation)?)
        })?;
        self.execute("restore_selections", |ctx| {
            let mut selection = ctx.selection().clone();
            selection.restore(snapshot.selections)?;
            let mut filters = ctx.filters().clone();
            filters.restore(snapshot.filters, snapshot.products)?;
            *ctx.selection_mut()? = selection;
            *ctx.filters_mut()? = filters;
            let kind = if ctx.navigation().is_root() {
                SearchKind::Initial
            } else {
                SearchKind::Filtered
            };
            ctx.request_search(kind);
            Ok(())
        })?;
        info!(saved_at = %snapshot.saved_at, "Session restored");
        Ok(())
    }
}

fn find(tree: &CatalogTree, id: &str) -> Result<NodeIndex, CoordinationError> {
    tree.find_by_id(id)
        .ok_or_else(|| NavigationError::not_found(id).into())
}

fn toggle_config_at<S: SearchService, U: UiSink>(
    ctx: &mut Context<S, U>,
    tree: &CatalogTree,
    index: NodeIndex,
) -> CommandResult<Activation> {
    let node = tree.node(index);
    if node.kind() == NodeKind::Config {
        debug!(node = %node.id(), "Configuration heading is not selectable");
        return Ok(Activation::Ignored);
    }
    let kind = tree
        .nearest_ancestor_of_kind(index, NodeKind::Config)
        .and_then(|config| ctx.config_groups().get(tree.node(config).id()).copied());
    let Some(kind) = kind else {
        debug!(node = %node.id(), "No filter kind mapped for configuration option");
        return Ok(Activation::Ignored);
    };

    let mut item = SelectionItem::from_node(node);
    item.extra = node.attributes().clone();
    let id = item.id.clone();
    let filters = ctx.filters_mut()?;
    let selected = if filters.contains(kind, &id) {
        filters.remove(kind, &id);
        false
    } else {
        filters.add(kind, item);
        true
    };
    ctx.request_search(SearchKind::Filtered);
    Ok(Activation::Config { kind, selected })
}

fn toggle_product_at<S: SearchService, U: UiSink>(
    ctx: &mut Context<S, U>,
    tree: &CatalogTree,
    index: NodeIndex,
) -> CommandResult<Activation> {
    let product = describe_product(ctx, tree, index);
    let brand = product.brand.clone();
    let filters = ctx.filters_mut()?;
    let selected = if filters.has_product(&brand) {
        filters.remove_product(&brand);
        false
    } else {
        filters.add_product(product)
    };
    ctx.request_search(SearchKind::Filtered);
    Ok(Activation::Product { brand, selected })
}

/// Product record for `index`, keyed the way the search backend expects.
fn describe_product<S: SearchService, U: UiSink>(
    ctx: &Context<S, U>,
    tree: &CatalogTree,
    index: NodeIndex,
) -> SelectedProduct {
    let node = tree.node(index);
    let current = ctx.navigation().current_node();
    let filters = ctx.filters();

    let brand = node
        .attribute_str(BRAND_ATTRIBUTE)
        .or_else(|| node.attribute_str(VALUE_ATTRIBUTE))
        .map(str::to_string)
        .unwrap_or_else(|| {
            if current.kind() == NodeKind::Brand {
                format!("{} {}", current.display_label(), node.display_label())
            } else {
                node.display_label().to_string()
            }
        });

    let vision = filters
        .unique(FilterKind::VisionType)
        .map(|item| item.id.as_str().to_string())
        .or_else(|| {
            tree.nearest_ancestor_of_kind(index, NodeKind::Category)
                .map(|category| tree.node(category).id().as_str().to_string())
        });

    let family = node
        .attribute_str(FAMILY_ATTRIBUTE)
        .map(str::to_string)
        .or_else(|| filters.unique(FilterKind::Family).map(|i| i.display_label().to_string()))
        .or_else(|| filters.unique(FilterKind::Brand).map(|i| i.display_label().to_string()));

    SelectedProduct {
        brand,
        label: node.display_label().to_string(),
        icon: node.icon().unwrap_or(DEFAULT_ICON).to_string(),
        vision,
        family,
        path: ctx.navigation().path_text(),
    }
}
