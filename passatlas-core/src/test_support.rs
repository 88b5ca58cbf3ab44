//! Test-only helpers: entity fixtures and an in-memory key-value store.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::entity::{Entity, Kind, Status};
use crate::store::{KeyValueStore, StoreError};

/// Build a minimal open-pass entity with the given id and name.
pub fn entity(id: u64, name: &str) -> Entity {
    Entity {
        id,
        name: name.to_owned(),
        status: Status::Open,
        kind: Kind::Pass,
        track: Vec::new(),
        countries: Default::default(),
        canton: None,
        region: None,
        level: None,
        opens: None,
        closes: None,
    }
}

/// Build an entity and customise it through a closure.
pub fn entity_with(id: u64, name: &str, customise: impl FnOnce(&mut Entity)) -> Entity {
    let mut built = entity(id, name);
    customise(&mut built);
    built
}

/// In-memory [`KeyValueStore`] used in tests.
///
/// Writes are immediately visible to readers holding the same store; there is
/// no durability, making restart scenarios explicit in tests that share one
/// instance across "sessions".
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the given entries.
    pub fn with_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            entries: Mutex::new(entries.into_iter().collect()),
        }
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}
