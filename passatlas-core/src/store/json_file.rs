//! Single-file JSON object backing for [`KeyValueStore`].

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use super::{KeyValueStore, StoreError};

/// Key-value store persisted as one JSON object in a file.
///
/// Each write re-reads the file, replaces the key, and writes the whole
/// object back, so independently-held handles on the same path never clobber
/// each other's keys. A missing file reads as an empty store.
///
/// # Examples
/// ```no_run
/// use passatlas_core::{JsonFileStore, KeyValueStore};
///
/// let store = JsonFileStore::new("passatlas-state.json");
/// store.write("favorites", "[1,2]")?;
/// assert_eq!(store.read("favorites")?, Some("[1,2]".to_owned()));
/// # Ok::<(), passatlas_core::StoreError>(())
/// ```
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store backed by the given file path.
    ///
    /// The file and its parent directory are created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_entries(&self) -> Result<Map<String, Value>, StoreError> {
        let payload = match fs::read_to_string(&self.path) {
            Ok(payload) => payload,
            Err(source) if source.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        serde_json::from_str(&payload).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn persist_entries(&self, entries: &Map<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                path: self.path.clone(),
                source,
            })?;
        }
        let payload = Value::Object(entries.clone()).to_string();
        fs::write(&self.path, payload).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

impl KeyValueStore for JsonFileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.load_entries()?;
        Ok(entries.get(key).and_then(Value::as_str).map(str::to_owned))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.load_entries()?;
        entries.insert(key.to_owned(), Value::String(value.to_owned()));
        self.persist_entries(&entries)
    }
}
