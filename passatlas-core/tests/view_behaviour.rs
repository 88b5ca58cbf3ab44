//! Behaviour tests for the derived-view engine over the public API.

use std::collections::HashSet;

use passatlas_core::test_support::{entity, entity_with};
use passatlas_core::{
    FilterState, Kind, LegendKey, Level, Status, compute_list_view, compute_map_view,
};
use rstest::{fixture, rstest};

#[fixture]
fn catalog() -> Vec<passatlas_core::Entity> {
    vec![
        entity_with(1, "Stelvio", |e| {
            e.countries = ["IT".to_owned(), "CH".to_owned()].into();
            e.level = Level::new(3).ok();
        }),
        entity_with(2, "Furka", |e| {
            e.countries = ["CH".to_owned()].into();
            e.canton = Some("UR".into());
            e.level = Level::new(2).ok();
        }),
        entity_with(3, "Umbrail", |e| {
            e.status = Status::Closed;
            e.countries = ["CH".to_owned(), "IT".to_owned()].into();
        }),
        entity_with(4, "Axenstrasse", |e| {
            e.kind = Kind::Road;
            e.canton = Some("UR".into());
            e.countries = ["CH".to_owned()].into();
        }),
        entity_with(5, "Dreipaessefahrt", |e| e.kind = Kind::Tour),
        entity_with(6, "Rheinschlucht", |e| e.kind = Kind::Scenic),
    ]
}

fn ids(view: &[&passatlas_core::Entity]) -> Vec<u64> {
    view.iter().map(|e| e.id).collect()
}

#[rstest]
fn search_scenario_matches_single_entity(catalog: Vec<passatlas_core::Entity>) {
    let mut filters = FilterState::default();
    filters.set_search_term("stel");
    let view = compute_list_view(&catalog, &filters, &HashSet::new());
    assert_eq!(ids(&view), vec![1]);
}

#[rstest]
fn list_view_is_a_subset_satisfying_every_predicate(catalog: Vec<passatlas_core::Entity>) {
    let mut filters = FilterState::default();
    filters.set_search_term("a");
    filters.set_selected_countries(["CH".to_owned()].into());
    filters.set_show_only_favorites(true);
    let favorites = HashSet::from([2, 3, 4]);
    let view = compute_list_view(&catalog, &filters, &favorites);
    for entity in &view {
        assert!(catalog.iter().any(|source| source.id == entity.id));
        assert!(entity.name.to_lowercase().contains("a"));
        assert!(entity.countries.contains("CH"));
        assert!(favorites.contains(&entity.id));
    }
}

#[rstest]
fn map_view_is_a_subset_of_enabled_buckets(catalog: Vec<passatlas_core::Entity>) {
    let filters = FilterState::default();
    let view = compute_map_view(&catalog, &filters, &HashSet::new());
    for entity in &view {
        assert!(filters.legend().is_enabled(entity.legend_category()));
    }
    // Tours are off by default, so the tour entity must be absent.
    assert!(!ids(&view).contains(&5));
}

#[rstest]
#[case(false, false)]
#[case(true, true)]
fn closed_pass_follows_the_closed_toggle(
    catalog: Vec<passatlas_core::Entity>,
    #[case] enabled: bool,
    #[case] expected: bool,
) {
    let mut filters = FilterState::default();
    filters.set_legend(LegendKey::Closed, enabled);
    let view = compute_map_view(&catalog, &filters, &HashSet::new());
    assert_eq!(ids(&view).contains(&3), expected);
}

#[rstest]
fn favorites_only_overrides_other_list_results(catalog: Vec<passatlas_core::Entity>) {
    let mut filters = FilterState::default();
    filters.set_show_only_favorites(true);
    let favorites = HashSet::from([2]);
    let view = compute_list_view(&catalog, &filters, &favorites);
    assert_eq!(ids(&view), vec![2]);
}

#[rstest]
fn reset_after_arbitrary_mutation_restores_default_views(catalog: Vec<passatlas_core::Entity>) {
    let mut filters = FilterState::default();
    filters.set_search_term("nothing-matches-this");
    filters.set_selected_level(Level::new(1).ok());
    filters.toggle_legend(LegendKey::Open);
    filters.reset();
    assert_eq!(filters, FilterState::default());
    let list = compute_list_view(&catalog, &filters, &HashSet::new());
    assert_eq!(list.len(), catalog.len());
}

#[rstest]
fn canton_and_kind_filters_compose(catalog: Vec<passatlas_core::Entity>) {
    let mut filters = FilterState::default();
    filters.set_canton_filter(Some("UR".into()));
    filters.set_kind_filter(Some(Kind::Road));
    let view = compute_list_view(&catalog, &filters, &HashSet::new());
    assert_eq!(ids(&view), vec![4]);
}

#[rstest]
fn both_views_share_one_filter_state(catalog: Vec<passatlas_core::Entity>) {
    let mut filters = FilterState::default();
    filters.set_search_term("furka");
    filters.toggle_legend(LegendKey::Open);
    let favorites = HashSet::new();
    // The list reacts to the search term but not the legend toggle; the map
    // reacts to the legend toggle but not the search term.
    let list = compute_list_view(&catalog, &filters, &favorites);
    assert_eq!(ids(&list), vec![2]);
    let map = compute_map_view(&catalog, &filters, &favorites);
    assert!(!ids(&map).contains(&1));
    assert!(ids(&map).contains(&3));
}

#[test]
fn inputs_are_not_mutated_by_recomputation() {
    let catalog = vec![entity(2, "Furka"), entity(1, "Stelvio")];
    let snapshot = catalog.clone();
    let filters = FilterState::default();
    let favorites = HashSet::from([1]);
    let _ = compute_list_view(&catalog, &filters, &favorites);
    let _ = compute_map_view(&catalog, &filters, &favorites);
    assert_eq!(catalog, snapshot);
    assert_eq!(filters, FilterState::default());
    assert_eq!(favorites, HashSet::from([1]));
}
