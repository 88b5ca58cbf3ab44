//! Session wiring for the two synchronized views.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use log::error;
use passatlas_core::{
    Entity, FilterState, KeyValueStore, Level, MapCommand, ViewportController, available_cantons,
    available_countries, available_levels, available_regions, coarse_view, compute_list_view,
    compute_map_view,
};
use passatlas_data::{DataSourceError, EntitySource, PlaceCandidate};

use crate::favorites::FavoriteSet;
use crate::preferences::{Language, Preferences, SessionPreferences};
use crate::recent::RecentSearches;

/// One user's browsing session over the catalog.
///
/// The session owns the authoritative entity snapshot, the shared filter
/// state, and the persisted user state, and derives both projections on
/// demand. All mutation goes through the documented methods; there are no
/// concurrent writers.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use passatlas_core::test_support::MemoryKeyValueStore;
/// use passatlas_session::Session;
///
/// let mut session = Session::new(Arc::new(MemoryKeyValueStore::new()));
/// session.filters_mut().set_search_term("stel");
/// assert!(session.list_view().is_empty());
/// ```
pub struct Session {
    entities: Vec<Entity>,
    filters: FilterState,
    favorites: FavoriteSet,
    recent: RecentSearches,
    preferences: SessionPreferences,
    viewport: ViewportController,
    selected: Option<u64>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("entities", &self.entities.len())
            .field("filters", &self.filters)
            .field("selected", &self.selected)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Create a session, restoring persisted user state from the store.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            entities: Vec::new(),
            filters: FilterState::default(),
            favorites: FavoriteSet::load(Arc::clone(&store)),
            recent: RecentSearches::load(Arc::clone(&store)),
            preferences: SessionPreferences::load(store),
            viewport: ViewportController::default(),
            selected: None,
        }
    }

    /// Fetch the entity snapshot from the source, once.
    ///
    /// On success the snapshot replaces the previous one and the entity
    /// count is returned. On failure the session degrades to an empty but
    /// consistent state (both views render empty) and the error is
    /// returned for the consumer to display. No retry is attempted here.
    pub async fn load(&mut self, source: &dyn EntitySource) -> Result<usize, DataSourceError> {
        match source.load_visible_entities().await {
            Ok(entities) => {
                let count = entities.len();
                self.entities = entities;
                self.selected = None;
                Ok(count)
            }
            Err(err) => {
                error!("Entity snapshot load failed: {err}");
                self.entities.clear();
                self.selected = None;
                Err(err)
            }
        }
    }

    /// The authoritative entity snapshot.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Read access to the shared filter state.
    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Write access to the shared filter state.
    pub fn filters_mut(&mut self) -> &mut FilterState {
        &mut self.filters
    }

    /// The list projection under the current filters and favorites.
    pub fn list_view(&self) -> Vec<&Entity> {
        compute_list_view(&self.entities, &self.filters, self.favorites.ids())
    }

    /// The map projection under the current legend toggles and favorites.
    pub fn map_view(&self) -> Vec<&Entity> {
        compute_map_view(&self.entities, &self.filters, self.favorites.ids())
    }

    /// Whether `id` is currently a favorite.
    pub fn is_favorite(&self, id: u64) -> bool {
        self.favorites.is_favorite(id)
    }

    /// Flip favorite membership for `id`; persists write-through.
    pub fn toggle_favorite(&mut self, id: u64) -> bool {
        self.favorites.toggle(id)
    }

    /// The current favorite ids.
    pub fn favorite_ids(&self) -> &HashSet<u64> {
        self.favorites.ids()
    }

    /// Select an entity by id, as emitted by either consumer.
    ///
    /// Returns the viewport-fit command when auto-zoom is enabled and the
    /// entity has geometry. Selecting an id not present in the snapshot
    /// clears the selection.
    pub fn select_entity(&mut self, id: u64) -> Option<MapCommand> {
        let Some(entity) = self.entities.iter().find(|entity| entity.id == id) else {
            self.selected = None;
            return None;
        };
        self.selected = Some(id);
        self.viewport.fit_entity(entity)
    }

    /// Clear the current selection.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// The currently selected entity, if any.
    pub fn selected_entity(&self) -> Option<&Entity> {
        self.selected
            .and_then(|id| self.entities.iter().find(|entity| entity.id == id))
    }

    /// Apply a chosen place candidate: record it in the recent-search log,
    /// adopt its display name as the search term, and recentre the map on
    /// its location.
    ///
    /// The recentre is deliberately not gated by auto-zoom: choosing a place
    /// always moves the map.
    pub fn choose_place(&mut self, candidate: &PlaceCandidate) -> MapCommand {
        self.recent.record(&candidate.display_name);
        self.filters.set_search_term(candidate.display_name.clone());
        ViewportController::focus_place(candidate.location)
    }

    /// Recent search queries, newest first.
    pub fn recent_searches(&self) -> &[String] {
        self.recent.entries()
    }

    /// Whether auto-zoom is enabled.
    pub fn auto_zoom(&self) -> bool {
        self.viewport.auto_zoom()
    }

    /// Enable or disable auto-zoom.
    pub fn set_auto_zoom(&mut self, enabled: bool) {
        self.viewport.set_auto_zoom(enabled);
    }

    /// The current presentation preferences.
    pub fn preferences(&self) -> &Preferences {
        self.preferences.get()
    }

    /// Switch the theme; persists write-through.
    pub fn set_dark_mode(&mut self, dark_mode: bool) {
        self.preferences.set_dark_mode(dark_mode);
    }

    /// Switch the language; persists write-through.
    pub fn set_language(&mut self, language: Language) {
        self.preferences.set_language(language);
    }

    /// Country codes reachable under the current coarse selection.
    pub fn available_countries(&self) -> Vec<String> {
        available_countries(coarse_view(&self.entities, &self.filters))
    }

    /// Levels reachable under the current coarse selection.
    pub fn available_levels(&self) -> Vec<Level> {
        available_levels(coarse_view(&self.entities, &self.filters))
    }

    /// Cantons reachable under the current coarse selection.
    pub fn available_cantons(&self) -> Vec<String> {
        available_cantons(coarse_view(&self.entities, &self.filters))
    }

    /// Regions reachable under the current coarse selection.
    pub fn available_regions(&self) -> Vec<String> {
        available_regions(coarse_view(&self.entities, &self.filters))
    }
}
