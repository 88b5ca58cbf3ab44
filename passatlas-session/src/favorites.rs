//! Favorite-entity persistence.
//!
//! The id set is read once at session start and kept authoritative in
//! memory; every toggle writes through immediately so a crash loses at most
//! the in-flight write. Ids for entities that no longer exist are retained;
//! no reconciliation with fetched data is attempted.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use log::warn;
use passatlas_core::KeyValueStore;

/// Store key holding the favorite-id JSON array.
pub const FAVORITES_KEY: &str = "favorites";

/// Persisted set of favorite entity ids.
pub struct FavoriteSet {
    ids: HashSet<u64>,
    store: Arc<dyn KeyValueStore>,
}

impl fmt::Debug for FavoriteSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FavoriteSet")
            .field("ids", &self.ids)
            .finish_non_exhaustive()
    }
}

impl FavoriteSet {
    /// Read the persisted set from the store.
    ///
    /// A missing or unreadable payload starts the session with an empty set;
    /// the failure is logged, never surfaced.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let ids = match store.read(FAVORITES_KEY) {
            Ok(Some(payload)) => match serde_json::from_str::<Vec<u64>>(&payload) {
                Ok(list) => list.into_iter().collect(),
                Err(err) => {
                    warn!("Discarded unreadable favorites payload: {err}");
                    HashSet::new()
                }
            },
            Ok(None) => HashSet::new(),
            Err(err) => {
                warn!("Failed to read favorites: {err}");
                HashSet::new()
            }
        };
        Self { ids, store }
    }

    /// Whether `id` is currently a favorite.
    pub fn is_favorite(&self, id: u64) -> bool {
        self.ids.contains(&id)
    }

    /// Flip membership for `id` and persist immediately.
    ///
    /// Returns the new membership. Persistence is best-effort: a write
    /// failure is logged and the in-memory set stays authoritative.
    pub fn toggle(&mut self, id: u64) -> bool {
        let now_favorite = if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        };
        self.persist();
        now_favorite
    }

    /// The current id set.
    pub fn ids(&self) -> &HashSet<u64> {
        &self.ids
    }

    fn persist(&self) {
        let mut list: Vec<u64> = self.ids.iter().copied().collect();
        list.sort_unstable();
        match serde_json::to_string(&list) {
            Ok(payload) => {
                if let Err(err) = self.store.write(FAVORITES_KEY, &payload) {
                    warn!("Failed to persist favorites: {err}");
                }
            }
            Err(err) => warn!("Failed to serialise favorites: {err}"),
        }
    }
}
