use std::time::Duration;

use serde::Serialize;

/// Default interval between simulation ticks.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

/// Whether the simulation clock is delivering ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockState {
    /// No ticks are processed.
    #[default]
    Idle,
    /// Each delivered tick advances the simulation.
    Running,
}

/// A two-state simulation clock that counts processed ticks.
///
/// The clock does not sleep; a driver (the runtime's periodic task or a
/// headless loop) delivers ticks and the clock decides whether each one
/// counts.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use dc_sim::sim::clock::SimulationClock;
///
/// let mut clock = SimulationClock::new(Duration::from_secs(1));
/// assert_eq!(clock.tick(), None);
///
/// clock.start();
/// assert_eq!(clock.tick(), Some(0));
/// assert_eq!(clock.tick(), Some(1));
///
/// clock.pause();
/// assert_eq!(clock.tick(), None);
/// ```
#[derive(Debug, Clone)]
pub struct SimulationClock {
    /// Idle or running.
    state: ClockState,
    /// Interval between ticks
    period: Duration,
    /// Ticks processed since construction or the last reset
    ticks: u64,
}

impl SimulationClock {
    /// Creates an idle clock with the given tick period.
    pub fn new(period: Duration) -> Self {
        Self {
            state: ClockState::Idle,
            period,
            ticks: 0,
        }
    }

    /// Transitions `Idle → Running`.
    ///
    /// # Returns
    ///
    /// `true` if the state changed, `false` if the clock was already running.
    pub fn start(&mut self) -> bool {
        let changed = self.state == ClockState::Idle;
        self.state = ClockState::Running;
        changed
    }

    /// Transitions `Running → Idle`.
    ///
    /// # Returns
    ///
    /// `true` if the state changed, `false` if the clock was already idle.
    pub fn pause(&mut self) -> bool {
        let changed = self.state == ClockState::Running;
        self.state = ClockState::Idle;
        changed
    }

    /// Flips between idle and running and returns the new state.
    pub fn toggle(&mut self) -> ClockState {
        if self.is_running() {
            self.pause();
        } else {
            self.start();
        }
        self.state
    }

    /// Accepts one delivered tick.
    ///
    /// # Returns
    ///
    /// * `Some(index)` - Zero-based index of the processed tick while running
    /// * `None` - If the clock is idle; the tick is ignored
    pub fn tick(&mut self) -> Option<u64> {
        if self.is_running() {
            let index = self.ticks;
            self.ticks += 1;
            Some(index)
        } else {
            None
        }
    }

    /// Returns to idle and zeroes the tick counter.
    pub fn reset(&mut self) {
        self.state = ClockState::Idle;
        self.ticks = 0;
    }

    /// Returns `true` while running.
    pub fn is_running(&self) -> bool {
        self.state == ClockState::Running
    }

    /// Current state.
    pub fn state(&self) -> ClockState {
        self.state
    }

    /// Interval between ticks.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Ticks processed since construction or the last reset.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_PERIOD)
    }
}
