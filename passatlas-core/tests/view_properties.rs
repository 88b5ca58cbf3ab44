//! Property tests for the derived-view engine.

use std::collections::{BTreeSet, HashSet};

use passatlas_core::test_support::entity_with;
use passatlas_core::{
    Entity, FilterState, Kind, LegendKey, Level, Status, compute_list_view, compute_map_view,
};
use proptest::prelude::*;

fn arb_kind() -> impl Strategy<Value = Kind> {
    prop::sample::select(vec![Kind::Pass, Kind::Road, Kind::Tour, Kind::Scenic])
}

fn arb_status() -> impl Strategy<Value = Status> {
    prop::sample::select(vec![Status::Open, Status::Closed])
}

fn arb_country_set() -> impl Strategy<Value = BTreeSet<String>> {
    prop::collection::btree_set(
        prop::sample::select(vec!["AT", "CH", "DE", "FR", "IT"]).prop_map(str::to_owned),
        0..3,
    )
}

fn arb_entity() -> impl Strategy<Value = Entity> {
    (
        "[a-zA-Z]{0,8}",
        arb_kind(),
        arb_status(),
        arb_country_set(),
        prop::option::of(1u8..=3),
    )
        .prop_map(|(name, kind, status, countries, level)| {
            entity_with(0, &name, |e| {
                e.kind = kind;
                e.status = status;
                e.countries = countries;
                e.level = level.and_then(|value| Level::new(value).ok());
            })
        })
}

fn arb_catalog() -> impl Strategy<Value = Vec<Entity>> {
    prop::collection::vec(arb_entity(), 0..16).prop_map(|mut entities| {
        // Identity must be unique within a fetched set.
        for (index, entity) in entities.iter_mut().enumerate() {
            entity.id = index as u64 + 1;
        }
        entities
    })
}

fn arb_filters() -> impl Strategy<Value = FilterState> {
    (
        "[a-z]{0,3}",
        any::<[bool; 6]>(),
        arb_country_set(),
        prop::option::of(1u8..=3),
        any::<bool>(),
    )
        .prop_map(|(term, legend, countries, level, only_favorites)| {
            let mut filters = FilterState::default();
            filters.set_search_term(term);
            let keys = [
                LegendKey::Open,
                LegendKey::Closed,
                LegendKey::Route,
                LegendKey::Tour,
                LegendKey::Poi,
                LegendKey::Favorites,
            ];
            for (key, enabled) in keys.into_iter().zip(legend) {
                filters.set_legend(key, enabled);
            }
            filters.set_selected_countries(countries);
            filters.set_selected_level(level.and_then(|value| Level::new(value).ok()));
            filters.set_show_only_favorites(only_favorites);
            filters
        })
}

fn arb_favorites() -> impl Strategy<Value = HashSet<u64>> {
    prop::collection::hash_set(1u64..20, 0..6)
}

proptest! {
    #[test]
    fn list_view_members_satisfy_every_predicate(
        catalog in arb_catalog(),
        filters in arb_filters(),
        favorites in arb_favorites(),
    ) {
        let view = compute_list_view(&catalog, &filters, &favorites);
        for entity in view {
            prop_assert!(catalog.iter().any(|source| source.id == entity.id));
            prop_assert!(
                entity.name.to_lowercase().contains(&filters.search_term().to_lowercase())
            );
            prop_assert!(
                filters.selected_countries().is_empty()
                    || !filters.selected_countries().is_disjoint(&entity.countries)
            );
            prop_assert!(
                filters.selected_level().is_none() || entity.level == filters.selected_level()
            );
            prop_assert!(!filters.show_only_favorites() || favorites.contains(&entity.id));
        }
    }

    #[test]
    fn map_view_members_have_their_bucket_enabled(
        catalog in arb_catalog(),
        filters in arb_filters(),
        favorites in arb_favorites(),
    ) {
        let view = compute_map_view(&catalog, &filters, &favorites);
        for entity in view {
            prop_assert!(catalog.iter().any(|source| source.id == entity.id));
            prop_assert!(filters.legend().is_enabled(entity.legend_category()));
            prop_assert!(!filters.legend().favorites || favorites.contains(&entity.id));
        }
    }

    #[test]
    fn views_are_deterministic_including_order(
        catalog in arb_catalog(),
        filters in arb_filters(),
        favorites in arb_favorites(),
    ) {
        let first: Vec<u64> = compute_list_view(&catalog, &filters, &favorites)
            .iter().map(|e| e.id).collect();
        let second: Vec<u64> = compute_list_view(&catalog, &filters, &favorites)
            .iter().map(|e| e.id).collect();
        prop_assert_eq!(first, second);

        let first_map: Vec<u64> = compute_map_view(&catalog, &filters, &favorites)
            .iter().map(|e| e.id).collect();
        let second_map: Vec<u64> = compute_map_view(&catalog, &filters, &favorites)
            .iter().map(|e| e.id).collect();
        prop_assert_eq!(first_map, second_map);
    }

    #[test]
    fn list_view_is_sorted_by_folded_name(
        catalog in arb_catalog(),
        favorites in arb_favorites(),
    ) {
        let filters = FilterState::default();
        let view = compute_list_view(&catalog, &filters, &favorites);
        for pair in view.windows(2) {
            if let [a, b] = pair {
                prop_assert!(a.name.to_lowercase() <= b.name.to_lowercase());
            }
        }
    }
}
