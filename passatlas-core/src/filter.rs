//! Shared filter state for the list and map projections.
//!
//! The state is always a total assignment: every legend key is present and
//! every dimension carries either a constraint or its documented default.
//! Setters are plain assignments with no recomputation side effects; the
//! derived views are recomputed by their consumers after each change.

use std::collections::BTreeSet;

use crate::entity::{Entity, Kind, LegendCategory, Level, Status};

/// One of the six legend toggles: the five display buckets plus the
/// favorites overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegendKey {
    /// Open passes.
    Open,
    /// Closed passes.
    Closed,
    /// Roads.
    Route,
    /// Tours.
    Tour,
    /// Scenic spots.
    Poi,
    /// Favorites overlay.
    Favorites,
}

impl LegendKey {
    /// Return the key as a lowercase `&str`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Route => "route",
            Self::Tour => "tour",
            Self::Poi => "poi",
            Self::Favorites => "favorites",
        }
    }
}

impl std::fmt::Display for LegendKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LegendKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            "route" => Ok(Self::Route),
            "tour" => Ok(Self::Tour),
            "poi" => Ok(Self::Poi),
            "favorites" => Ok(Self::Favorites),
            _ => Err(format!("unknown legend key '{s}'")),
        }
    }
}

/// Enabled/disabled flags for every legend key.
///
/// Defaults match the map page: everything on except tours and the
/// favorites overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegendFilters {
    /// Show open passes.
    pub open: bool,
    /// Show closed passes.
    pub closed: bool,
    /// Show roads.
    pub route: bool,
    /// Show tours.
    pub tour: bool,
    /// Show scenic spots.
    pub poi: bool,
    /// Restrict the map to favorites.
    pub favorites: bool,
}

impl Default for LegendFilters {
    fn default() -> Self {
        Self {
            open: true,
            closed: true,
            route: true,
            tour: false,
            poi: true,
            favorites: false,
        }
    }
}

impl LegendFilters {
    /// Return whether the toggle for `key` is enabled.
    pub fn get(&self, key: LegendKey) -> bool {
        match key {
            LegendKey::Open => self.open,
            LegendKey::Closed => self.closed,
            LegendKey::Route => self.route,
            LegendKey::Tour => self.tour,
            LegendKey::Poi => self.poi,
            LegendKey::Favorites => self.favorites,
        }
    }

    /// Set the toggle for `key`, leaving all others untouched.
    pub fn set(&mut self, key: LegendKey, enabled: bool) {
        match key {
            LegendKey::Open => self.open = enabled,
            LegendKey::Closed => self.closed = enabled,
            LegendKey::Route => self.route = enabled,
            LegendKey::Tour => self.tour = enabled,
            LegendKey::Poi => self.poi = enabled,
            LegendKey::Favorites => self.favorites = enabled,
        }
    }

    /// Flip the toggle for `key`, leaving all others untouched.
    pub fn toggle(&mut self, key: LegendKey) {
        self.set(key, !self.get(key));
    }

    /// Return whether the display bucket for `category` is enabled.
    pub fn is_enabled(&self, category: LegendCategory) -> bool {
        match category {
            LegendCategory::Open => self.open,
            LegendCategory::Closed => self.closed,
            LegendCategory::Route => self.route,
            LegendCategory::Tour => self.tour,
            LegendCategory::Poi => self.poi,
        }
    }
}

/// The full set of filter dimensions shared by both projections.
///
/// # Examples
/// ```
/// use passatlas_core::{FilterState, LegendKey};
///
/// let mut filters = FilterState::default();
/// filters.set_search_term("stel");
/// filters.toggle_legend(LegendKey::Tour);
/// assert!(filters.legend().tour);
/// filters.reset();
/// assert_eq!(filters, FilterState::default());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterState {
    search_term: String,
    legend: LegendFilters,
    selected_countries: BTreeSet<String>,
    selected_level: Option<Level>,
    show_only_favorites: bool,
    status_filter: Option<Status>,
    kind_filter: Option<Kind>,
    canton_filter: Option<String>,
    region_filter: Option<String>,
}

impl FilterState {
    /// Current free-text search term.
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Set the free-text search term.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Current legend toggles.
    pub fn legend(&self) -> &LegendFilters {
        &self.legend
    }

    /// Flip exactly one legend toggle.
    pub fn toggle_legend(&mut self, key: LegendKey) {
        self.legend.toggle(key);
    }

    /// Set one legend toggle to an explicit value.
    pub fn set_legend(&mut self, key: LegendKey, enabled: bool) {
        self.legend.set(key, enabled);
    }

    /// Currently selected country codes; empty means unconstrained.
    pub fn selected_countries(&self) -> &BTreeSet<String> {
        &self.selected_countries
    }

    /// Replace the selected country set.
    pub fn set_selected_countries(&mut self, countries: BTreeSet<String>) {
        self.selected_countries = countries;
    }

    /// Currently selected level; `None` means unconstrained.
    pub fn selected_level(&self) -> Option<Level> {
        self.selected_level
    }

    /// Replace the level constraint.
    pub fn set_selected_level(&mut self, level: Option<Level>) {
        self.selected_level = level;
    }

    /// Whether the list view is restricted to favorites.
    pub fn show_only_favorites(&self) -> bool {
        self.show_only_favorites
    }

    /// Restrict (or stop restricting) the list view to favorites.
    pub fn set_show_only_favorites(&mut self, enabled: bool) {
        self.show_only_favorites = enabled;
    }

    /// Current status constraint; `None` means unconstrained.
    pub fn status_filter(&self) -> Option<Status> {
        self.status_filter
    }

    /// Replace the status constraint.
    pub fn set_status_filter(&mut self, status: Option<Status>) {
        self.status_filter = status;
    }

    /// Current kind constraint; `None` means unconstrained.
    pub fn kind_filter(&self) -> Option<Kind> {
        self.kind_filter
    }

    /// Replace the kind constraint.
    pub fn set_kind_filter(&mut self, kind: Option<Kind>) {
        self.kind_filter = kind;
    }

    /// Current canton constraint; `None` means unconstrained.
    pub fn canton_filter(&self) -> Option<&str> {
        self.canton_filter.as_deref()
    }

    /// Replace the canton constraint.
    pub fn set_canton_filter(&mut self, canton: Option<String>) {
        self.canton_filter = canton;
    }

    /// Current region constraint; `None` means unconstrained.
    pub fn region_filter(&self) -> Option<&str> {
        self.region_filter.as_deref()
    }

    /// Replace the region constraint.
    pub fn set_region_filter(&mut self, region: Option<String>) {
        self.region_filter = region;
    }

    /// Restore every dimension to its documented default.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// The coarse visibility predicate used to derive filter-option lists:
    /// search text, status, countries, and kind, ignoring the finer
    /// canton/region/level/favorites dimensions.
    pub fn coarse_matches(&self, entity: &Entity) -> bool {
        self.matches_search(entity)
            && self.matches_status(entity)
            && self.matches_countries(entity)
            && self.matches_kind(entity)
    }

    pub(crate) fn matches_search(&self, entity: &Entity) -> bool {
        self.search_term.is_empty()
            || entity
                .name
                .to_lowercase()
                .contains(&self.search_term.to_lowercase())
    }

    pub(crate) fn matches_countries(&self, entity: &Entity) -> bool {
        self.selected_countries.is_empty()
            || !self.selected_countries.is_disjoint(&entity.countries)
    }

    pub(crate) fn matches_level(&self, entity: &Entity) -> bool {
        self.selected_level.is_none() || entity.level == self.selected_level
    }

    pub(crate) fn matches_status(&self, entity: &Entity) -> bool {
        self.status_filter.is_none() || self.status_filter == Some(entity.status)
    }

    pub(crate) fn matches_kind(&self, entity: &Entity) -> bool {
        self.kind_filter.is_none() || self.kind_filter == Some(entity.kind)
    }

    pub(crate) fn matches_canton(&self, entity: &Entity) -> bool {
        self.canton_filter.is_none() || self.canton_filter.as_deref() == entity.canton.as_deref()
    }

    pub(crate) fn matches_region(&self, entity: &Entity) -> bool {
        self.region_filter.is_none() || self.region_filter.as_deref() == entity.region.as_deref()
    }
}
