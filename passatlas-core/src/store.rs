//! Durable key-value contract for per-user state.
//!
//! Favorites, recent searches, and preferences are read once at session
//! start and written through on every mutation. The contract is
//! deliberately small (string keys to string values) so the concrete
//! backing (file, browser storage, embedded database) stays an
//! implementation choice.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

mod json_file;

pub use json_file::JsonFileStore;

/// Errors raised by a [`KeyValueStore`] backing.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    /// Reading the backing file failed.
    #[error("failed to read store file {path:?}: {source}")]
    Read {
        /// Location of the store on disk.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// Writing the backing file failed.
    #[error("failed to write store file {path:?}: {source}")]
    Write {
        /// Location of the store on disk.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The backing file held something other than a JSON object.
    #[error("store file {path:?} is not a JSON object: {source}")]
    Corrupt {
        /// Location of the store on disk.
        path: PathBuf,
        /// JSON decoding failure.
        #[source]
        source: serde_json::Error,
    },
}

/// String-keyed durable storage with read-at-start, write-through semantics.
///
/// Implementations must make writes immediately visible to subsequent reads
/// on the same store; durability across restarts is best-effort.
pub trait KeyValueStore: Send + Sync {
    /// Return the value stored under `key`, if any.
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;
}
