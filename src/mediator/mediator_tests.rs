//! Tests for the coordinator and its default wiring.

use super::*;
use crate::config::{default_config_groups, default_selection_groups};
use crate::model::{FilterKind, GroupName, ItemId, NavigationError, SelectionItem};
use crate::state::SelectionEvent;
use crate::test_harness::{sample_catalog, CoordinatorHarness, RecordingSearch, RecordingUi};

// ===== Test Helpers =====

fn item(id: &str) -> SelectionItem {
    SelectionItem::new(id).expect("valid item id")
}

fn group(name: &str) -> GroupName {
    GroupName::new(name).expect("valid group name")
}

fn item_id(id: &str) -> ItemId {
    ItemId::new(id).expect("valid item id")
}

fn unique_id(h: &CoordinatorHarness, kind: FilterKind) -> Option<String> {
    h.coordinator
        .filters()
        .unique(kind)
        .map(|item| item.id.as_str().to_string())
}

fn current_id(h: &CoordinatorHarness) -> String {
    h.coordinator.navigation().current_node().id().as_str().to_string()
}

/// Harness standing on `zeiss-smartlife` with nothing recorded yet.
fn at_smartlife() -> CoordinatorHarness {
    let mut h = CoordinatorHarness::new();
    for id in ["longe", "longe-marcas", "longe-zeiss", "zeiss-smartlife"] {
        h.coordinator.navigate_to(id).expect("path exists");
    }
    h.take_requests();
    h.take_updates();
    h
}

// ===== Wiring =====

#[test]
fn default_wiring_registers_handlers_in_order() {
    let h = CoordinatorHarness::new();
    let names: Vec<_> = h.coordinator.handlers().into_iter().map(|(_, name)| name).collect();
    assert_eq!(
        names,
        vec![
            "render-level",
            "filters-follow-navigation",
            "search-follows-navigation",
            "render-active-filters",
            "render-selection-summary",
            "render-result-badge",
        ]
    );
}

#[test]
fn navigating_renders_level_then_filters_and_requests_one_search() {
    let mut h = CoordinatorHarness::new();

    h.coordinator.navigate_to("longe").expect("child exists");

    let updates = h.take_updates();
    assert_eq!(updates.len(), 3, "level, filter panel, filter badge: {updates:?}");
    match &updates[0] {
        UiUpdate::Level {
            breadcrumbs,
            title,
            icon,
            cards,
        } => {
            assert!(breadcrumbs.is_empty(), "root entry is never shown");
            assert_eq!(title, "Lentes para Longe");
            assert_eq!(icon, "🔭");
            let ids: Vec<_> = cards.iter().map(|c| c.id.as_str()).collect();
            assert_eq!(ids, vec!["longe-filtros", "longe-marcas"]);
        }
        other => panic!("expected level update, got {other:?}"),
    }
    assert!(matches!(&updates[1], UiUpdate::ActiveFilters { filters, .. } if filters.len() == 1));
    assert_eq!(updates[2], UiUpdate::FilterBadge { count: 1 });

    let requests = h.take_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].kind, SearchKind::Filtered);
    assert_eq!(requests[0].params.get("tipoVisao").map(String::as_str), Some("longe"));
    assert_eq!(unique_id(&h, FilterKind::VisionType).as_deref(), Some("longe"));
}

#[test]
fn unknown_child_fails_without_side_effects() {
    let mut h = CoordinatorHarness::new();

    let err = h.coordinator.navigate_to("nope").expect_err("no such child");

    assert_eq!(
        err,
        CoordinationError::Navigation(NavigationError::NodeNotFound {
            id: "nope".to_string()
        })
    );
    assert!(h.take_updates().is_empty());
    assert!(h.take_requests().is_empty());
    assert!(h.coordinator.navigation().is_root());
}

#[test]
fn drilling_down_fills_unique_filters_in_order() {
    let h = at_smartlife();
    assert_eq!(unique_id(&h, FilterKind::VisionType).as_deref(), Some("longe"));
    assert_eq!(unique_id(&h, FilterKind::Brand).as_deref(), Some("longe-zeiss"));
    assert_eq!(unique_id(&h, FilterKind::Family).as_deref(), Some("zeiss-smartlife"));
}

#[test]
fn going_back_resyncs_unique_filters_from_path() {
    let mut h = at_smartlife();

    h.coordinator.go_back().expect("can go back");

    assert_eq!(current_id(&h), "longe-zeiss");
    assert_eq!(unique_id(&h, FilterKind::Brand).as_deref(), Some("longe-zeiss"));
    assert_eq!(unique_id(&h, FilterKind::Family), None);
    let requests = h.take_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].kind, SearchKind::Filtered);
}

#[test]
fn jumping_to_a_breadcrumb_resyncs_unique_filters() {
    let mut h = at_smartlife();

    h.coordinator.go_to_level(1).expect("jump");

    assert_eq!(current_id(&h), "longe");
    assert_eq!(unique_id(&h, FilterKind::VisionType).as_deref(), Some("longe"));
    assert_eq!(unique_id(&h, FilterKind::Brand), None);
}

#[test]
fn home_clears_context_but_keeps_multiple_filters() {
    let mut h = at_smartlife();
    h.coordinator
        .add_filter(FilterKind::Material, item("material-trivex"))
        .expect("add");
    h.coordinator.activate("smartlife-young").expect("product");
    h.take_requests();

    h.coordinator.go_home().expect("home");

    let filters = h.coordinator.filters();
    assert!(h.coordinator.navigation().is_root());
    assert_eq!(filters.counts().unique, 0);
    assert!(filters.products().is_empty());
    assert_eq!(filters.get(FilterKind::Material).len(), 1);
    let requests = h.take_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].kind, SearchKind::Initial);
}

#[test]
fn silent_root_keeps_filters_and_requests_nothing() {
    let mut h = at_smartlife();

    h.coordinator.go_to_root().expect("root");

    assert!(h.coordinator.navigation().is_root());
    assert_eq!(h.coordinator.filters().counts().unique, 3);
    assert!(h.take_requests().is_empty());
}

#[test]
fn navigate_to_id_coalesces_into_a_single_search() {
    let mut h = CoordinatorHarness::new();

    h.coordinator.navigate_to_id("zeiss-smartlife").expect("exists");

    let requests = h.take_requests();
    assert_eq!(requests.len(), 1, "one submission per command");
    assert_eq!(requests[0].kind, SearchKind::Filtered);
    assert_eq!(requests[0].filters.len(), 3);
    assert_eq!(unique_id(&h, FilterKind::Family).as_deref(), Some("zeiss-smartlife"));
}

// ===== Filter removal =====

#[test]
fn removing_brand_rolls_navigation_back_to_category() {
    let mut h = at_smartlife();

    h.coordinator
        .remove_filter(FilterKind::Brand, &item_id("longe-zeiss"))
        .expect("remove");

    assert_eq!(current_id(&h), "longe");
    assert_eq!(unique_id(&h, FilterKind::VisionType).as_deref(), Some("longe"));
    assert_eq!(unique_id(&h, FilterKind::Brand), None);
    assert_eq!(unique_id(&h, FilterKind::Family), None);
    let requests = h.take_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].kind, SearchKind::Filtered);
}

#[test]
fn removing_family_rolls_back_to_brand() {
    let mut h = at_smartlife();

    h.coordinator
        .remove_filter(FilterKind::Family, &item_id("zeiss-smartlife"))
        .expect("remove");

    assert_eq!(current_id(&h), "longe-zeiss");
    assert_eq!(unique_id(&h, FilterKind::Brand).as_deref(), Some("longe-zeiss"));
}

#[test]
fn removing_vision_type_returns_to_root_with_initial_search() {
    let mut h = at_smartlife();

    h.coordinator
        .remove_filter(FilterKind::VisionType, &item_id("longe"))
        .expect("remove");

    assert!(h.coordinator.navigation().is_root());
    assert_eq!(h.coordinator.filters().counts().unique, 0);
    let requests = h.take_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].kind, SearchKind::Initial);
}

#[test]
fn removing_multiple_filter_leaves_navigation_alone() {
    let mut h = at_smartlife();
    h.coordinator
        .add_filter(FilterKind::Material, item("material-trivex"))
        .expect("add");

    h.coordinator
        .remove_filter(FilterKind::Material, &item_id("material-trivex"))
        .expect("remove");

    assert_eq!(current_id(&h), "zeiss-smartlife");
    assert!(h.coordinator.filters().get(FilterKind::Material).is_empty());
    assert_eq!(h.coordinator.filters().counts().unique, 3);
}

#[test]
fn clear_filters_empties_everything_and_goes_home() {
    let mut h = at_smartlife();
    h.coordinator
        .add_filter(FilterKind::Tint, item("cor-cinza"))
        .expect("add");

    h.coordinator.clear_filters().expect("clear");

    assert!(h.coordinator.navigation().is_root());
    assert!(!h.coordinator.filters().has_selection());
    let badge = h
        .take_updates()
        .into_iter()
        .rev()
        .find(|u| matches!(u, UiUpdate::FilterBadge { .. }));
    assert_eq!(badge, Some(UiUpdate::FilterBadge { count: 0 }));
}

// ===== Cards =====

#[test]
fn activating_a_leaf_under_a_brand_keys_product_by_brand_and_label() {
    let mut h = CoordinatorHarness::new();
    for id in ["longe", "longe-marcas", "longe-zeiss"] {
        h.coordinator.navigate_to(id).expect("path exists");
    }

    let outcome = h.coordinator.activate("zeiss-light2").expect("activate");

    assert_eq!(
        outcome,
        Activation::Product {
            brand: "Zeiss Light 2".to_string(),
            selected: true
        }
    );
    let product = &h.coordinator.filters().products()[0];
    assert_eq!(product.vision.as_deref(), Some("longe"));
    assert_eq!(product.family.as_deref(), Some("Zeiss"));
    assert_eq!(product.path, "Longe > Por Marca > Zeiss");
    assert_eq!(current_id(&h), "longe-zeiss", "products do not navigate");

    let again = h.coordinator.activate("zeiss-light2").expect("activate");
    assert!(matches!(again, Activation::Product { selected: false, .. }));
    assert!(h.coordinator.filters().products().is_empty());
}

#[test]
fn product_attributes_take_precedence_for_brand_key() {
    let mut h = at_smartlife();

    h.coordinator.activate("smartlife-ind3").expect("activate");

    let product = &h.coordinator.filters().products()[0];
    assert_eq!(product.brand, "SMARTLIFE INDIVIDUAL 3");
    assert_eq!(product.family.as_deref(), Some("SmartLife"));
    let requests = h.take_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].products.len(), 1);
}

#[test]
fn value_attribute_is_the_fallback_brand_key() {
    let mut h = CoordinatorHarness::new();

    let outcome = h.coordinator.toggle_product("essilor-orma").expect("toggle");

    assert!(matches!(outcome, Activation::Product { ref brand, selected: true } if brand == "ORMA ESSILOR"));
    let product = &h.coordinator.filters().products()[0];
    assert_eq!(product.vision.as_deref(), Some("longe"), "category ancestor fills in vision");
}

#[test]
fn activating_a_node_with_children_navigates() {
    let mut h = CoordinatorHarness::new();
    let outcome = h.coordinator.activate("longe").expect("activate");
    assert_eq!(outcome, Activation::Navigated);
    assert_eq!(current_id(&h), "longe");
}

#[test]
fn activating_config_options_toggles_mapped_filter() {
    let mut h = CoordinatorHarness::new();
    h.coordinator.open_config("material").expect("open");

    let on = h.coordinator.activate("material-trivex").expect("activate");
    assert_eq!(
        on,
        Activation::Config {
            kind: FilterKind::Material,
            selected: true
        }
    );
    assert_eq!(current_id(&h), "material", "options do not navigate");

    h.coordinator.activate("material-policarbonato").expect("drill");
    let value = h.coordinator.activate("poli-159").expect("activate");
    assert!(matches!(value, Activation::Config { kind: FilterKind::Material, selected: true }));
    assert_eq!(h.coordinator.filters().get(FilterKind::Material).len(), 2);

    let off = h.coordinator.toggle_config("material-trivex").expect("toggle");
    assert!(matches!(off, Activation::Config { selected: false, .. }));
    assert_eq!(h.coordinator.filters().get(FilterKind::Material).len(), 1);
}

#[test]
fn config_options_carry_node_attributes() {
    let mut h = CoordinatorHarness::new();

    h.coordinator.toggle_config("cor-cinza").expect("toggle");

    let tint = h.coordinator.filters().get(FilterKind::Tint);
    assert_eq!(tint.len(), 1);
    assert_eq!(tint[0].extra.get("corHex"), Some(&serde_json::Value::from("#808080")));
}

#[test]
fn config_heading_is_ignored() {
    let mut h = CoordinatorHarness::new();
    let outcome = h.coordinator.toggle_config("material").expect("toggle");
    assert_eq!(outcome, Activation::Ignored);
    assert!(!h.coordinator.filters().has_selection());
}

#[test]
fn open_config_keeps_context_filters() {
    let mut h = CoordinatorHarness::new();
    h.coordinator.navigate_to("longe").expect("navigate");

    h.coordinator.open_config("coloracao").expect("open");

    assert_eq!(current_id(&h), "coloracao");
    assert_eq!(unique_id(&h, FilterKind::VisionType).as_deref(), Some("longe"));
}

#[test]
fn open_category_replaces_context_filters() {
    let mut h = at_smartlife();

    h.coordinator.open_category("perto").expect("open");

    assert_eq!(current_id(&h), "perto");
    assert_eq!(unique_id(&h, FilterKind::VisionType).as_deref(), Some("perto"));
    assert_eq!(unique_id(&h, FilterKind::Brand), None);
    assert_eq!(unique_id(&h, FilterKind::Family), None);
}

#[test]
fn remove_product_requests_filtered_search() {
    let mut h = at_smartlife();
    h.coordinator.activate("smartlife-ind3").expect("activate");
    h.take_requests();

    h.coordinator.remove_product("SMARTLIFE INDIVIDUAL 3").expect("remove");

    assert!(h.coordinator.filters().products().is_empty());
    let requests = h.take_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].kind, SearchKind::Filtered);
}

// ===== Ledger and search =====

#[test]
fn ledger_changes_render_selection_summary() {
    let mut h = CoordinatorHarness::new();

    h.coordinator.select(&group("material"), item("m1")).expect("select");
    let summary = h.take_updates().pop();
    assert_eq!(
        summary,
        Some(UiUpdate::SelectionSummary {
            total: 1,
            missing: vec![group("tipoVisao")],
        })
    );

    h.coordinator.select(&group("tipoVisao"), item("longe")).expect("select");
    assert_eq!(
        h.take_updates().pop(),
        Some(UiUpdate::SelectionSummary {
            total: 2,
            missing: vec![],
        })
    );
    assert!(h.take_requests().is_empty(), "the ledger does not search");
}

#[test]
fn ledger_toggle_and_deselect_report_outcome() {
    let mut h = CoordinatorHarness::new();
    let material = group("material");

    assert!(h.coordinator.toggle(&material, item("m1")).expect("toggle"));
    assert!(!h.coordinator.toggle(&material, item("m1")).expect("toggle"));
    h.coordinator.select(&material, item("m2")).expect("select");
    let removed = h.coordinator.deselect(&material, &item_id("m2")).expect("deselect");
    assert_eq!(removed.map(|i| i.id), Some(item_id("m2")));
    h.coordinator.select(&material, item("m3")).expect("select");
    h.coordinator.clear_selections().expect("clear");
    assert_eq!(h.coordinator.selection().total_count(), 0);
}

#[test]
fn completed_search_updates_result_badge() {
    let mut h = CoordinatorHarness::new();

    h.complete(42);

    assert_eq!(h.take_updates(), vec![UiUpdate::ResultBadge { count: 42 }]);
    assert_eq!(h.coordinator.context().last_result_count(), Some(42));
}

// ===== Dispatch rules =====

#[test]
fn reentrant_mutation_is_rejected_and_other_handlers_still_run() {
    let mut h = CoordinatorHarness::new();
    h.coordinator.on(Component::Navigation, "loops-back", |_, ctx| {
        ctx.navigation_mut()?.go_home();
        Ok(())
    });

    h.coordinator.navigate_to("longe").expect("command itself succeeds");

    assert_eq!(
        h.coordinator.take_errors(),
        vec![CoordinationError::Reentrancy {
            component: Component::Navigation
        }]
    );
    assert_eq!(current_id(&h), "longe");
    assert!(h
        .take_updates()
        .iter()
        .any(|u| matches!(u, UiUpdate::Level { .. })));
}

#[test]
fn runaway_cascade_stops_at_dispatch_limit() {
    let mut coordinator = Coordinator::new(
        NavigationState::new(sample_catalog()),
        SelectionState::new(default_selection_groups()),
        ActiveFilterSet::new(),
        default_config_groups(),
        RecordingSearch::default(),
        RecordingUi::default(),
    )
    .with_dispatch_limit(16);

    let mut echoed = 0;
    coordinator.on(Component::Selection, "selection-to-filters", move |note, ctx| {
        if let Notification::Selection(SelectionEvent::Changed { .. }) = note {
            echoed += 1;
            ctx.filters_mut()?.add(FilterKind::Material, item(&format!("f{echoed}")));
            ctx.request_search(SearchKind::Filtered);
        }
        Ok(())
    });
    let material = group("material");
    let mut bounced = 0;
    coordinator.on(Component::Filters, "filters-to-selection", move |_, ctx| {
        bounced += 1;
        ctx.selection_mut()?.select(&material, item(&format!("s{bounced}")));
        Ok(())
    });

    let err = coordinator
        .select(&group("material"), item("start"))
        .expect_err("cascade never settles");

    assert_eq!(err, CoordinationError::DispatchOverflow { limit: 16 });
    assert_eq!(coordinator.take_errors(), vec![err]);
    assert!(
        coordinator.search().take_requests().is_empty(),
        "an aborted cascade submits no search"
    );
}

#[test]
fn handler_errors_are_drained_once() {
    let mut h = CoordinatorHarness::new();
    h.coordinator.on(Component::Filters, "rejects", |_, ctx| {
        ctx.filters_mut()?;
        Ok(())
    });

    h.coordinator.navigate_to("longe").expect("navigate");

    assert_eq!(h.coordinator.take_errors().len(), 1);
    assert!(h.coordinator.take_errors().is_empty());
}

// ===== Persistence =====

#[test]
fn snapshot_restores_into_a_fresh_coordinator() {
    let mut h = at_smartlife();
    h.coordinator.activate("smartlife-ind3").expect("product");
    h.coordinator.toggle_config("material-trivex").expect("config");
    h.coordinator.select(&group("tipoVisao"), item("longe")).expect("select");
    let snapshot = h.coordinator.snapshot();

    let mut fresh = CoordinatorHarness::new();
    fresh.coordinator.restore(snapshot).expect("restore");

    assert_eq!(current_id(&fresh), "zeiss-smartlife");
    assert_eq!(fresh.coordinator.filters().active(), h.coordinator.filters().active());
    assert_eq!(fresh.coordinator.filters().products(), h.coordinator.filters().products());
    assert_eq!(fresh.coordinator.selection().snapshot(), h.coordinator.selection().snapshot());
    let requests = fresh.take_requests();
    assert_eq!(requests.len(), 2, "one per restore phase");
    assert_eq!(requests[1].products.len(), 1);
}

#[test]
fn restore_with_missing_node_leaves_filters_untouched() {
    let mut h = at_smartlife();
    let mut snapshot = h.coordinator.snapshot();
    snapshot.navigation.node_id = Some(crate::model::NodeId::new("gone").expect("valid"));
    snapshot.products.clear();

    let err = h.coordinator.restore(snapshot).expect_err("node is gone");

    assert!(matches!(err, CoordinationError::Navigation(_)));
    assert_eq!(current_id(&h), "zeiss-smartlife");
    assert_eq!(h.coordinator.filters().counts().unique, 3);
}

#[test]
fn restoring_root_snapshot_mid_session_returns_to_root() {
    let root_snapshot = CoordinatorHarness::new().coordinator.snapshot();
    let mut h = at_smartlife();

    h.coordinator.restore(root_snapshot).expect("root snapshot restores");

    let nav = h.coordinator.navigation();
    assert!(nav.is_root(), "navigation follows the snapshot");
    assert!(nav.params().is_empty());
    assert_eq!(h.coordinator.filters().counts().unique, 0);
    let requests = h.take_requests();
    assert_eq!(requests.last().map(|r| r.kind), Some(SearchKind::Initial));
}
