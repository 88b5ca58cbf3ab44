//! Tokio driver for the place-search state machine.
//!
//! The driver owns the quiet-period timers and the single in-flight request
//! task. Timers are cheap fire-and-forget tasks; a stale timer is filtered
//! by the state machine's generation check, so restarting the quiet period
//! never needs explicit timer cancellation. The in-flight request, by
//! contrast, is aborted as soon as a newer input arrives: its response can
//! then never be applied, and even a response that slips through is dropped
//! by the generation check.

use std::sync::Arc;

use passatlas_data::{GeocodeError, Geocoder, PlaceCandidate};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::sleep;

use super::state::{DEBOUNCE_QUIET_PERIOD, InputAction, PlaceSearch, RESULT_LIMIT, SearchOutcome};

/// State change surfaced to the consumer.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchUpdate {
    /// A lookup resolved; these are the current candidates.
    Results(Vec<PlaceCandidate>),
    /// The query dropped below the minimum length; results were cleared.
    Cleared,
    /// A lookup failed for a reason other than cancellation; results were
    /// cleared.
    Failed,
}

/// Input side of a running search driver.
#[derive(Debug, Clone)]
pub struct SearchHandle {
    input_tx: UnboundedSender<String>,
}

impl SearchHandle {
    /// Feed the current query text to the controller.
    ///
    /// Returns `false` when the driver has shut down.
    pub fn submit(&self, query: impl Into<String>) -> bool {
        self.input_tx.send(query.into()).is_ok()
    }
}

#[derive(Debug)]
enum DriverEvent {
    QuietPeriodElapsed(u64),
    Response(u64, Result<Vec<PlaceCandidate>, GeocodeError>),
}

/// Spawn a search driver on the current tokio runtime.
///
/// Returns the input handle and the stream of state updates. The driver
/// shuts down when every handle clone is dropped.
pub fn spawn(geocoder: Arc<dyn Geocoder>) -> (SearchHandle, UnboundedReceiver<SearchUpdate>) {
    let (input_tx, input_rx) = mpsc::unbounded_channel();
    let (update_tx, update_rx) = mpsc::unbounded_channel();
    tokio::spawn(run(geocoder, input_rx, update_tx));
    (SearchHandle { input_tx }, update_rx)
}

async fn run(
    geocoder: Arc<dyn Geocoder>,
    mut input_rx: UnboundedReceiver<String>,
    update_tx: UnboundedSender<SearchUpdate>,
) {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let mut state = PlaceSearch::new();
    let mut in_flight: Option<(u64, JoinHandle<()>)> = None;

    loop {
        tokio::select! {
            maybe_query = input_rx.recv() => {
                let Some(query) = maybe_query else { break };
                handle_input(&mut state, &query, &mut in_flight, &event_tx, &update_tx);
            }
            Some(event) = event_rx.recv() => match event {
                DriverEvent::QuietPeriodElapsed(generation) => {
                    if let Some(request) = state.on_quiet_period_elapsed(generation) {
                        let response_tx = event_tx.clone();
                        let geocoder = Arc::clone(&geocoder);
                        let handle = tokio::spawn(async move {
                            let response =
                                geocoder.search(&request.query, RESULT_LIMIT).await;
                            let _ = response_tx
                                .send(DriverEvent::Response(request.generation, response));
                        });
                        in_flight = Some((generation, handle));
                    }
                }
                DriverEvent::Response(generation, response) => {
                    if in_flight.as_ref().is_some_and(|(r#gen, _)| *r#gen == generation) {
                        in_flight = None;
                    }
                    match state.on_response(generation, response) {
                        SearchOutcome::Resolved => {
                            let _ = update_tx
                                .send(SearchUpdate::Results(state.results().to_vec()));
                        }
                        SearchOutcome::Failed => {
                            let _ = update_tx.send(SearchUpdate::Failed);
                        }
                        SearchOutcome::Superseded => {}
                    }
                }
            }
        }
    }

    abort_in_flight(&mut in_flight);
}

fn handle_input(
    state: &mut PlaceSearch,
    query: &str,
    in_flight: &mut Option<(u64, JoinHandle<()>)>,
    event_tx: &UnboundedSender<DriverEvent>,
    update_tx: &UnboundedSender<SearchUpdate>,
) {
    match state.on_input(query) {
        InputAction::Clear { cancel_in_flight } => {
            if cancel_in_flight {
                abort_in_flight(in_flight);
            }
            let _ = update_tx.send(SearchUpdate::Cleared);
        }
        InputAction::Debounce {
            generation,
            cancel_in_flight,
        } => {
            if cancel_in_flight {
                abort_in_flight(in_flight);
            }
            let timer_tx = event_tx.clone();
            tokio::spawn(async move {
                sleep(DEBOUNCE_QUIET_PERIOD).await;
                let _ = timer_tx.send(DriverEvent::QuietPeriodElapsed(generation));
            });
        }
    }
}

fn abort_in_flight(in_flight: &mut Option<(u64, JoinHandle<()>)>) {
    if let Some((_, handle)) = in_flight.take() {
        handle.abort();
    }
}
