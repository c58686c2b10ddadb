use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::info;

use super::task::PeriodicTask;
use crate::sim::engine::{Engine, EngineSnapshot};
use crate::sim::perturbation::{Perturbation, SeededPerturbation};
use crate::sim::scenario::{Scenario, ScenarioId, UnknownScenarioError};
use crate::sim::types::{HistoryEntry, MetricState};

type Subscribers = Arc<Mutex<Vec<mpsc::UnboundedSender<MetricState>>>>;

/// An engine driven by a wall-clock tick task.
///
/// The engine lives behind `Arc<Mutex<_>>`; each tick locks it, steps, and
/// unlocks, so readers always see a fully advanced state.
pub struct Simulator<P: Perturbation + Send + 'static = SeededPerturbation> {
    engine: Arc<Mutex<Engine<P>>>,
    ticker: Option<PeriodicTask>,
    subscribers: Subscribers,
}

impl<P: Perturbation + Send + 'static> Simulator<P> {
    /// Wraps an engine. The engine's running state is left unchanged; call
    /// [`start`](Self::start) to begin ticking.
    pub fn new(engine: Engine<P>) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            ticker: None,
            subscribers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns a receiver yielding the state produced by every processed
    /// tick, in order, from now on.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<MetricState> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.lock().push(tx);
        rx
    }

    /// Starts the engine and spawns its tick task. No effect if already
    /// running.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn start(&mut self) {
        if self.ticker.is_some() && self.is_running() {
            return;
        }
        self.spawn_ticker(None);
    }

    /// Starts ticking and pauses the engine as soon as its tick count
    /// reaches `total`. Ticks delivered after that are ignored.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn start_until(&mut self, total: u64) {
        if self.engine.lock().clock().ticks() >= total {
            self.pause();
            return;
        }
        self.spawn_ticker(Some(total));
    }

    fn spawn_ticker(&mut self, limit: Option<u64>) {
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }
        let period = {
            let mut engine = self.engine.lock();
            engine.start();
            engine.clock().period()
        };
        let engine = Arc::clone(&self.engine);
        let subscribers = Arc::clone(&self.subscribers);
        self.ticker = Some(PeriodicTask::spawn("simulation", period, move |_| {
            let state = {
                let mut engine = engine.lock();
                let Some(state) = engine.step().cloned() else {
                    return;
                };
                if limit.is_some_and(|total| engine.clock().ticks() >= total) {
                    engine.pause();
                }
                state
            };
            subscribers
                .lock()
                .retain(|tx| tx.send(state.clone()).is_ok());
        }));
    }

    /// Stops the engine and cancels the tick task.
    ///
    /// Once this returns no further tick changes the state.
    pub fn pause(&mut self) {
        self.engine.lock().pause();
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }

    /// Flips between running and idle.
    ///
    /// # Returns
    ///
    /// `true` if running afterwards.
    pub fn toggle_running(&mut self) -> bool {
        if self.is_running() {
            self.pause();
        } else {
            self.start();
        }
        self.is_running()
    }

    /// Cancels ticking and restores the engine to its baseline.
    pub fn reset(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }
        self.engine.lock().reset();
    }

    /// Sets the scenario used from the next tick on.
    pub fn select_scenario(&self, id: ScenarioId) {
        self.engine.lock().select_scenario(id);
    }

    /// Resolves and selects a scenario by id.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownScenarioError`] if `id` is not in the catalog.
    pub fn select_scenario_id(&self, id: &str) -> Result<ScenarioId, UnknownScenarioError> {
        self.engine.lock().select_scenario_id(id)
    }

    /// Copy of the current readings.
    pub fn state(&self) -> MetricState {
        self.engine.lock().current_state().clone()
    }

    /// Copy of the trend history, oldest first.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.engine.lock().current_history().contents()
    }

    /// Profile of the active scenario.
    pub fn scenario(&self) -> &'static Scenario {
        self.engine.lock().active_scenario()
    }

    /// Returns `true` while the engine is running.
    pub fn is_running(&self) -> bool {
        self.engine.lock().is_running()
    }

    /// Clones the state, history, scenario, and clock into one value.
    pub fn snapshot(&self) -> EngineSnapshot {
        self.engine.lock().snapshot()
    }

    /// Runs `f` with exclusive access to the engine.
    pub fn with_engine<R>(&self, f: impl FnOnce(&mut Engine<P>) -> R) -> R {
        f(&mut self.engine.lock())
    }

    /// Stops ticking and hands back the final snapshot.
    pub fn shutdown(mut self) -> EngineSnapshot {
        self.pause();
        let snapshot = self.snapshot();
        info!(ticks = snapshot.ticks, "simulator shut down");
        snapshot
    }
}
