//! Data adapters for the Passatlas engine.
//!
//! Responsibilities:
//! - Define the repository and geocoding traits the session layer consumes.
//! - Provide HTTP and file-backed entity snapshot sources.
//! - Encapsulate the wire formats of the external services.
//!
//! Boundaries:
//! - Do not encode filtering rules (live in `passatlas-core`).
//! - Keep blocking I/O off async executors; prefer async-capable clients.
//!
//! Invariants:
//! - One attempt per snapshot load; retry policy belongs to callers.
//! - Malformed rows are skipped with a warning, never fatal.

#![forbid(unsafe_code)]

mod geocode;
mod source;

pub use geocode::{
    DEFAULT_GEOCODER_ENDPOINT, GeocodeError, Geocoder, NominatimGeocoder, NominatimGeocoderConfig,
    PlaceCandidate, compact_display_name,
};
pub use source::{
    DEFAULT_USER_AGENT, DataSourceError, EntitySource, HttpEntitySource, HttpEntitySourceConfig,
    JsonFileSource, SourceBuildError,
};
