//! Recent place-search log.

use std::fmt;
use std::sync::Arc;

use log::warn;
use passatlas_core::KeyValueStore;

/// Store key holding the recent-search JSON array.
pub const RECENT_SEARCHES_KEY: &str = "recent_searches";

/// Maximum number of retained entries.
pub const RECENT_SEARCH_LIMIT: usize = 5;

/// Ordered log of the most recent distinct search queries, newest first.
///
/// Recording a query that is already present moves it to the front instead
/// of duplicating it; the log never grows past [`RECENT_SEARCH_LIMIT`].
pub struct RecentSearches {
    entries: Vec<String>,
    store: Arc<dyn KeyValueStore>,
}

impl fmt::Debug for RecentSearches {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecentSearches")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl RecentSearches {
    /// Read the persisted log from the store.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let entries = match store.read(RECENT_SEARCHES_KEY) {
            Ok(Some(payload)) => match serde_json::from_str::<Vec<String>>(&payload) {
                Ok(mut list) => {
                    list.truncate(RECENT_SEARCH_LIMIT);
                    list
                }
                Err(err) => {
                    warn!("Discarded unreadable recent-search payload: {err}");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!("Failed to read recent searches: {err}");
                Vec::new()
            }
        };
        Self { entries, store }
    }

    /// Record a query at the front of the log and persist immediately.
    pub fn record(&mut self, query: &str) {
        self.entries.retain(|entry| entry != query);
        self.entries.insert(0, query.to_owned());
        self.entries.truncate(RECENT_SEARCH_LIMIT);
        self.persist();
    }

    /// Entries in most-recent-first order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    fn persist(&self) {
        match serde_json::to_string(&self.entries) {
            Ok(payload) => {
                if let Err(err) = self.store.write(RECENT_SEARCHES_KEY, &payload) {
                    warn!("Failed to persist recent searches: {err}");
                }
            }
            Err(err) => warn!("Failed to serialise recent searches: {err}"),
        }
    }
}
