//! Synchronous place-search state machine.

use std::time::Duration;

use log::warn;
use passatlas_data::{GeocodeError, PlaceCandidate};

/// Minimum query length before a lookup is considered.
pub const MIN_QUERY_LEN: usize = 2;

/// Quiet period that must elapse with no further input before fetching.
pub const DEBOUNCE_QUIET_PERIOD: Duration = Duration::from_millis(300);

/// Maximum number of stored candidate results.
pub const RESULT_LIMIT: usize = 5;

/// Where the controller currently is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    /// No lookup pending.
    Idle,
    /// Waiting out the quiet period after a keystroke.
    Debouncing,
    /// Exactly one request in flight.
    Fetching,
}

/// What the driver must do after an input was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    /// The query fell below the minimum length: results were cleared and any
    /// outstanding work is stale.
    Clear {
        /// Whether an in-flight request must be aborted.
        cancel_in_flight: bool,
    },
    /// Start the quiet-period timer for this generation.
    Debounce {
        /// Generation the timer belongs to; stale timers are ignored.
        generation: u64,
        /// Whether an in-flight request must be aborted.
        cancel_in_flight: bool,
    },
}

/// A lookup the driver must issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Generation the request belongs to.
    pub generation: u64,
    /// Query to resolve.
    pub query: String,
}

/// Terminal outcome of a response, as seen by the consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Candidates were stored.
    Resolved,
    /// A non-cancellation failure cleared the results.
    Failed,
    /// The response belonged to a superseded request and was discarded.
    Superseded,
}

/// Debounce and supersession logic for the place search.
///
/// Every accepted input bumps the generation counter; timers and responses
/// carry the generation they were created under and are discarded when a
/// newer input has since arrived. The latest generation always wins, so a
/// slow response for an old query can never overwrite the state produced
/// for a newer one.
///
/// # Examples
/// ```
/// use passatlas_session::search::{InputAction, PlaceSearch, SearchPhase};
///
/// let mut search = PlaceSearch::new();
/// let action = search.on_input("andermatt");
/// assert!(matches!(action, InputAction::Debounce { .. }));
/// assert_eq!(search.phase(), SearchPhase::Debouncing);
/// ```
#[derive(Debug)]
pub struct PlaceSearch {
    phase: SearchPhase,
    query: String,
    generation: u64,
    results: Vec<PlaceCandidate>,
}

impl Default for PlaceSearch {
    fn default() -> Self {
        Self {
            phase: SearchPhase::Idle,
            query: String::new(),
            generation: 0,
            results: Vec::new(),
        }
    }
}

impl PlaceSearch {
    /// Create an idle controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    /// Currently stored candidates.
    pub fn results(&self) -> &[PlaceCandidate] {
        &self.results
    }

    /// Generation of the most recent accepted input.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Apply a keystroke.
    ///
    /// Short queries clear the results and return the controller to idle;
    /// anything else enters (or restarts) the quiet period under a fresh
    /// generation, implicitly invalidating every outstanding timer and
    /// request.
    pub fn on_input(&mut self, query: &str) -> InputAction {
        let cancel_in_flight = self.phase == SearchPhase::Fetching;
        self.generation += 1;
        if query.chars().count() < MIN_QUERY_LEN {
            self.phase = SearchPhase::Idle;
            self.query.clear();
            self.results.clear();
            InputAction::Clear { cancel_in_flight }
        } else {
            self.phase = SearchPhase::Debouncing;
            self.query = query.to_owned();
            InputAction::Debounce {
                generation: self.generation,
                cancel_in_flight,
            }
        }
    }

    /// Apply an elapsed quiet-period timer.
    ///
    /// Returns the request to issue when the timer is still current; stale
    /// timers (older generation, or the controller left the debouncing
    /// phase) yield `None`.
    pub fn on_quiet_period_elapsed(&mut self, generation: u64) -> Option<FetchRequest> {
        if generation != self.generation || self.phase != SearchPhase::Debouncing {
            return None;
        }
        self.phase = SearchPhase::Fetching;
        Some(FetchRequest {
            generation,
            query: self.query.clone(),
        })
    }

    /// Apply a response for the request issued under `generation`.
    ///
    /// Responses for superseded generations are discarded; cancellation
    /// errors are silent; real failures clear the results and are logged.
    pub fn on_response(
        &mut self,
        generation: u64,
        response: Result<Vec<PlaceCandidate>, GeocodeError>,
    ) -> SearchOutcome {
        if generation != self.generation || self.phase != SearchPhase::Fetching {
            return SearchOutcome::Superseded;
        }
        match response {
            Ok(mut candidates) => {
                candidates.truncate(RESULT_LIMIT);
                self.results = candidates;
                self.phase = SearchPhase::Idle;
                SearchOutcome::Resolved
            }
            Err(err) if err.is_cancellation() => {
                self.phase = SearchPhase::Idle;
                SearchOutcome::Superseded
            }
            Err(err) => {
                warn!("Place search failed: {err}");
                self.results.clear();
                self.phase = SearchPhase::Idle;
                SearchOutcome::Failed
            }
        }
    }
}
