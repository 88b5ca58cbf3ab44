//! Pure projections of the entity set.
//!
//! The list view and the map view are independent functions of the same
//! `(entities, filters, favorites)` triple. Neither mutates its inputs and
//! both are deterministic, including output order, so consumers can recompute
//! them on every state change.
//!
//! The map view is deliberately not constrained by the sidebar's search,
//! country, or level dimensions: it reflects the coarse legend selection
//! only, so toggling a legend bucket always has the same visible effect on
//! the map regardless of the finer list filters.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::entity::{Entity, Level};
use crate::filter::FilterState;

/// Compute the list projection: every entity matching the free-text search,
/// the country/level constraints, the supplementary status/kind/canton/region
/// constraints, and the favorites restriction when enabled.
///
/// Results are ordered case-insensitively by name, with exact name and then
/// ascending id as tie-breaks.
///
/// # Examples
/// ```
/// use std::collections::HashSet;
/// use passatlas_core::{Entity, FilterState, Kind, Status, compute_list_view};
///
/// let entity = |id: u64, name: &str| Entity {
///     id,
///     name: name.into(),
///     status: Status::Open,
///     kind: Kind::Pass,
///     track: Vec::new(),
///     countries: Default::default(),
///     canton: None,
///     region: None,
///     level: None,
///     opens: None,
///     closes: None,
/// };
/// let entities = vec![entity(1, "Stelvio"), entity(2, "Furka")];
/// let mut filters = FilterState::default();
/// filters.set_search_term("stel");
/// let view = compute_list_view(&entities, &filters, &HashSet::new());
/// assert_eq!(view.iter().map(|e| e.id).collect::<Vec<_>>(), vec![1]);
/// ```
pub fn compute_list_view<'a>(
    entities: &'a [Entity],
    filters: &FilterState,
    favorites: &HashSet<u64>,
) -> Vec<&'a Entity> {
    let mut view: Vec<&Entity> = entities
        .iter()
        .filter(|entity| {
            filters.matches_search(entity)
                && filters.matches_countries(entity)
                && filters.matches_level(entity)
                && filters.matches_status(entity)
                && filters.matches_kind(entity)
                && filters.matches_canton(entity)
                && filters.matches_region(entity)
                && (!filters.show_only_favorites() || favorites.contains(&entity.id))
        })
        .collect();
    view.sort_by(|a, b| name_order(a, b));
    view
}

/// Compute the map projection: every entity whose legend bucket is enabled,
/// restricted to favorites when the favorites overlay is on. Source order is
/// retained.
pub fn compute_map_view<'a>(
    entities: &'a [Entity],
    filters: &FilterState,
    favorites: &HashSet<u64>,
) -> Vec<&'a Entity> {
    let legend = filters.legend();
    entities
        .iter()
        .filter(|entity| {
            legend.is_enabled(entity.legend_category())
                && (!legend.favorites || favorites.contains(&entity.id))
        })
        .collect()
}

/// Entities passing the coarse predicate (search, status, countries, kind).
///
/// This is the population the filter-option lists are derived from, so the
/// option dropdowns shrink to what the current coarse selection can still
/// reach.
pub fn coarse_view<'a>(entities: &'a [Entity], filters: &FilterState) -> Vec<&'a Entity> {
    entities
        .iter()
        .filter(|entity| filters.coarse_matches(entity))
        .collect()
}

/// Unique, sorted country codes across the given entities.
pub fn available_countries<'a, I>(entities: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Entity>,
{
    let mut countries: Vec<String> = entities
        .into_iter()
        .flat_map(|entity| entity.countries.iter().cloned())
        .collect();
    countries.sort();
    countries.dedup();
    countries
}

/// Unique, sorted levels across the given entities.
pub fn available_levels<'a, I>(entities: I) -> Vec<Level>
where
    I: IntoIterator<Item = &'a Entity>,
{
    let mut levels: Vec<Level> = entities.into_iter().filter_map(|entity| entity.level).collect();
    levels.sort();
    levels.dedup();
    levels
}

/// Unique, sorted cantons across the given entities.
pub fn available_cantons<'a, I>(entities: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Entity>,
{
    unique_sorted(entities.into_iter().filter_map(|entity| entity.canton.clone()))
}

/// Unique, sorted regions across the given entities.
pub fn available_regions<'a, I>(entities: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Entity>,
{
    unique_sorted(entities.into_iter().filter_map(|entity| entity.region.clone()))
}

fn unique_sorted(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut list: Vec<String> = values.collect();
    list.sort();
    list.dedup();
    list
}

// Case-insensitive code-point order stands in for locale collation; exact
// name and id keep the order total and deterministic.
fn name_order(a: &Entity, b: &Entity) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id.cmp(&b.id))
}
