//! Facade crate for the Passatlas catalog engine.
//!
//! This crate re-exports the domain types, the derived-view engine, the
//! adapter traits, and the stateful session layer so consumers can depend on
//! a single crate.

#![forbid(unsafe_code)]

pub use passatlas_core::{
    Entity, FIT_PADDING_PX, FilterState, JsonFileStore, KeyValueStore, Kind, LegendCategory,
    LegendFilters, LegendKey, Level, LevelError, MapCommand, PLACE_ZOOM, Status, StoreError,
    ViewportController, compute_list_view, compute_map_view, track_bounds,
};

pub use passatlas_data::{
    DataSourceError, EntitySource, GeocodeError, Geocoder, HttpEntitySource, JsonFileSource,
    NominatimGeocoder, PlaceCandidate, SourceBuildError,
};

pub use passatlas_session::{
    FavoriteSet, Language, PlaceSearch, Preferences, RecentSearches, SearchHandle, SearchUpdate,
    Session, SessionPreferences,
};
