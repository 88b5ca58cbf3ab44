//! Core domain types and pure engine logic for the Passatlas catalog.
//!
//! Responsibilities:
//! - Model catalog entities (passes, roads, tours, scenic spots) and their
//!   categorical attributes.
//! - Hold the shared filter state and derive the list and map projections
//!   from it.
//! - Compute viewport-fit commands from entity geometry.
//! - Define the durable key-value contract used for per-user state.
//!
//! Boundaries:
//! - No network I/O here; adapters live in `passatlas-data`.
//! - No session wiring here; the stateful layer lives in
//!   `passatlas-session`.

#![forbid(unsafe_code)]

mod entity;
mod filter;
mod store;
mod view;
mod viewport;

pub mod test_support;

pub use entity::{Entity, Kind, LegendCategory, Level, LevelError, Status, parse_countries};
pub use filter::{FilterState, LegendFilters, LegendKey};
pub use store::{JsonFileStore, KeyValueStore, StoreError};
pub use view::{
    available_cantons, available_countries, available_levels, available_regions, coarse_view,
    compute_list_view, compute_map_view,
};
pub use viewport::{FIT_PADDING_PX, MapCommand, PLACE_ZOOM, ViewportController, track_bounds};
