//! Default reactions between the components.
//!
//! Registered in this order by [`Coordinator::with_default_wiring`]:
//!
//! | Topic      | Handler                     | Effect                                   |
//! |------------|-----------------------------|------------------------------------------|
//! | navigation | `render-level`              | breadcrumbs, header and cards            |
//! | navigation | `filters-follow-navigation` | unique filter slots track the path       |
//! | navigation | `search-follows-navigation` | initial or filtered search request       |
//! | filters    | `render-active-filters`     | filter panel and filter badge            |
//! | selection  | `render-selection-summary`  | ledger total and missing required groups |
//! | search     | `render-result-badge`       | result count                             |

use super::collaborators::{SearchKind, SearchService, UiSink, UiUpdate};
use super::context::Context;
use super::notification::Notification;
use super::Coordinator;
use crate::model::{CatalogTree, Component, CoordinationError, FilterKind, NodeIndex, SelectionItem};
use crate::state::navigation::{cards_for, DEFAULT_ICON};
use crate::state::{FilterEvent, NavTransition, RootTransition, SelectionEvent};
use std::sync::Arc;
use tracing::trace;

type HandlerResult = Result<(), CoordinationError>;

pub(super) fn install<S, U>(coordinator: &mut Coordinator<S, U>)
where
    S: SearchService + 'static,
    U: UiSink + 'static,
{
    coordinator.on(Component::Navigation, "render-level", render_level::<S, U>);
    coordinator.on(
        Component::Navigation,
        "filters-follow-navigation",
        filters_follow_navigation::<S, U>,
    );
    coordinator.on(
        Component::Navigation,
        "search-follows-navigation",
        search_follows_navigation::<S, U>,
    );
    coordinator.on(Component::Filters, "render-active-filters", render_active_filters::<S, U>);
    coordinator.on(
        Component::Selection,
        "render-selection-summary",
        render_selection_summary::<S, U>,
    );
    coordinator.on(Component::Search, "render-result-badge", render_result_badge::<S, U>);
}

/// Unique filter items for every node on `path` that maps to a unique kind.
pub(crate) fn unique_items_on_path(
    tree: &CatalogTree,
    path: &[NodeIndex],
) -> Vec<(FilterKind, SelectionItem)> {
    path.iter()
        .filter_map(|&index| {
            let node = tree.node(index);
            FilterKind::for_node_kind(node.kind()).map(|kind| (kind, SelectionItem::from_node(node)))
        })
        .collect()
}

// ===== Navigation =====

fn render_level<S: SearchService, U: UiSink>(
    notification: &Notification,
    ctx: &mut Context<S, U>,
) -> HandlerResult {
    let Notification::Navigation(event) = notification else {
        return Ok(());
    };
    let tree = Arc::clone(ctx.navigation().catalog());
    let view = &event.view;
    let update = UiUpdate::Level {
        breadcrumbs: view.breadcrumbs.clone(),
        title: view
            .title
            .clone()
            .or_else(|| view.label.clone())
            .unwrap_or_default(),
        icon: view.icon.clone().unwrap_or_else(|| DEFAULT_ICON.to_string()),
        cards: cards_for(&tree, event.node()),
    };
    ctx.ui_mut().apply(update);
    Ok(())
}

fn filters_follow_navigation<S: SearchService, U: UiSink>(
    notification: &Notification,
    ctx: &mut Context<S, U>,
) -> HandlerResult {
    let Notification::Navigation(event) = notification else {
        return Ok(());
    };
    let tree = Arc::clone(ctx.navigation().catalog());
    match event.transition {
        NavTransition::Navigated => {
            let node = tree.node(event.node());
            if let Some(kind) = FilterKind::for_node_kind(node.kind()) {
                ctx.filters_mut()?.add(kind, SelectionItem::from_node(node));
            } else {
                trace!(node = %node.id(), "Navigated node registers no filter");
            }
        }
        NavTransition::WentBack | NavTransition::Jumped { .. } => {
            let items = unique_items_on_path(&tree, &event.path);
            ctx.filters_mut()?.sync_unique(items);
        }
        NavTransition::Root(RootTransition::Home) | NavTransition::Reset => {
            ctx.filters_mut()?.clear_context();
        }
        NavTransition::Root(RootTransition::Silent) => {}
    }
    Ok(())
}

fn search_follows_navigation<S: SearchService, U: UiSink>(
    notification: &Notification,
    ctx: &mut Context<S, U>,
) -> HandlerResult {
    let Notification::Navigation(event) = notification else {
        return Ok(());
    };
    match event.transition {
        NavTransition::Root(RootTransition::Silent) => {}
        NavTransition::Root(RootTransition::Home) | NavTransition::Reset => {
            ctx.request_search(SearchKind::Initial);
        }
        NavTransition::Navigated | NavTransition::WentBack | NavTransition::Jumped { .. } => {
            let kind = if event.view.is_root {
                SearchKind::Initial
            } else {
                SearchKind::Filtered
            };
            ctx.request_search(kind);
        }
    }
    Ok(())
}

// ===== Filters, selection, search =====

fn render_active_filters<S: SearchService, U: UiSink>(
    notification: &Notification,
    ctx: &mut Context<S, U>,
) -> HandlerResult {
    let Notification::Filters(FilterEvent::Changed { active, products }) = notification else {
        return Ok(());
    };
    let count = active.len() + products.len();
    let ui = ctx.ui_mut();
    ui.apply(UiUpdate::ActiveFilters {
        filters: active.clone(),
        products: products.clone(),
    });
    ui.apply(UiUpdate::FilterBadge { count });
    Ok(())
}

fn render_selection_summary<S: SearchService, U: UiSink>(
    notification: &Notification,
    ctx: &mut Context<S, U>,
) -> HandlerResult {
    let Notification::Selection(SelectionEvent::Changed { .. }) = notification else {
        return Ok(());
    };
    let total = ctx.selection().total_count();
    let missing = ctx.selection().validate();
    ctx.ui_mut().apply(UiUpdate::SelectionSummary { total, missing });
    Ok(())
}

fn render_result_badge<S: SearchService, U: UiSink>(
    notification: &Notification,
    ctx: &mut Context<S, U>,
) -> HandlerResult {
    let Notification::SearchCompleted(outcome) = notification else {
        return Ok(());
    };
    ctx.ui_mut().apply(UiUpdate::ResultBadge {
        count: outcome.count,
    });
    Ok(())
}
