//! Debounced, cancelable place search.
//!
//! The controller is split in two: [`PlaceSearch`] is a synchronous state
//! machine with a monotonic generation counter, so the ordering guarantees
//! (debounce, supersession, last-writer-wins) are testable without real
//! timers; the [`driver`] owns the tokio timers and request tasks and feeds
//! the machine.

mod driver;
mod state;

pub use driver::{SearchHandle, SearchUpdate, spawn};
pub use state::{
    DEBOUNCE_QUIET_PERIOD, FetchRequest, InputAction, MIN_QUERY_LEN, PlaceSearch, RESULT_LIMIT,
    SearchOutcome, SearchPhase,
};
