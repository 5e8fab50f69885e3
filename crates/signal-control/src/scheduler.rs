//! Phase sequencing state machine
//!
//! One cycle drives the winning approach through YELLOW → GREEN → RED while
//! every other approach is pinned at RED. Transitions actuate exactly once
//! and each hold blocks the control task for its full length, racing the
//! shutdown signal instead of polling it.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{sleep, Instant};
use tracing::{debug, info};

use crate::error::ControlError;
use crate::output::{SignalActuator, StatusSink};
use crate::phase::{DirectionId, DirectionState, SignalPhase};
use crate::timing::TimingDecision;

/// Fixed hold lengths around the green phase
#[derive(Debug, Clone, Copy)]
pub struct PhaseTiming {
    /// Red hold applied to losing approaches, and the closing red
    pub loser_red: Duration,
    /// Yellow preparation hold for the winner
    pub prepare: Duration,
}

impl Default for PhaseTiming {
    fn default() -> Self {
        Self {
            loser_red: Duration::from_secs(5),
            prepare: Duration::from_secs(5),
        }
    }
}

/// Sequences approaches through RED/YELLOW/GREEN with mutual exclusion
///
/// States are owned here and mutated only from the control task; at most one
/// approach is ever in GREEN.
pub struct PhaseScheduler {
    states: Vec<DirectionState>,
    timing: PhaseTiming,
    cycles_completed: u64,
}

impl PhaseScheduler {
    /// Create a scheduler with every approach at RED
    pub fn new(direction_count: usize, timing: PhaseTiming) -> Self {
        let states = (0..direction_count)
            .map(|i| DirectionState::initial(DirectionId(i)))
            .collect();
        Self {
            states,
            timing,
            cycles_completed: 0,
        }
    }

    pub fn states(&self) -> &[DirectionState] {
        &self.states
    }

    pub fn phase_of(&self, direction: DirectionId) -> SignalPhase {
        self.states[direction.0].phase
    }

    /// Approaches currently showing GREEN; never more than one
    pub fn green_count(&self) -> usize {
        self.states
            .iter()
            .filter(|s| s.phase == SignalPhase::Green)
            .count()
    }

    pub fn cycles_completed(&self) -> u64 {
        self.cycles_completed
    }

    /// Run one full cycle for the decision
    ///
    /// Sequence: all losers to RED, hold; winner to YELLOW, hold; winner to
    /// GREEN for the decided duration; winner back to RED, hold. A shutdown
    /// signal interrupts the current hold and surfaces as `Cancelled`.
    pub async fn run_cycle(
        &mut self,
        decision: &TimingDecision,
        actuator: &mut dyn SignalActuator,
        sink: &mut dyn StatusSink,
        shutdown: &mut watch::Receiver<bool>,
    ) -> Result<(), ControlError> {
        let winner = decision.winner;
        let green = Duration::from_secs(decision.green_duration_seconds as u64);

        let losers: Vec<DirectionId> = self
            .states
            .iter()
            .map(|s| s.direction)
            .filter(|d| *d != winner)
            .collect();

        for loser in &losers {
            self.transition(*loser, SignalPhase::Red, self.timing.loser_red, actuator, sink);
        }
        self.hold(self.timing.loser_red, shutdown).await?;

        self.transition(winner, SignalPhase::Yellow, self.timing.prepare, actuator, sink);
        self.hold(self.timing.prepare, shutdown).await?;

        self.transition(winner, SignalPhase::Green, green, actuator, sink);
        self.hold(green, shutdown).await?;

        self.transition(winner, SignalPhase::Red, self.timing.loser_red, actuator, sink);
        self.hold(self.timing.loser_red, shutdown).await?;

        self.cycles_completed += 1;
        debug!("cycle {} complete", self.cycles_completed);
        Ok(())
    }

    /// Drive every approach to RED immediately
    ///
    /// Teardown path: actuates all approaches regardless of tracked state so
    /// the junction is safe even when a cycle was interrupted mid-hold.
    pub fn force_all_red(&mut self, actuator: &mut dyn SignalActuator) {
        info!("forcing all approaches to RED");
        for state in &mut self.states {
            state.phase = SignalPhase::Red;
            state.phase_deadline = None;
            actuator.set(state.direction, SignalPhase::Red);
        }
    }

    fn transition(
        &mut self,
        direction: DirectionId,
        phase: SignalPhase,
        hold: Duration,
        actuator: &mut dyn SignalActuator,
        sink: &mut dyn StatusSink,
    ) {
        {
            let state = &mut self.states[direction.0];
            state.phase = phase;
            state.phase_deadline = Some(Instant::now() + hold);
        }
        debug_assert!(self.green_count() <= 1);

        info!("approach {} -> {} for {:?}", direction, phase, hold);
        actuator.set(direction, phase);
        sink.phase_change(direction, phase, hold);
    }

    /// Block for the phase duration or until shutdown is signalled
    async fn hold(
        &self,
        duration: Duration,
        shutdown: &mut watch::Receiver<bool>,
    ) -> Result<(), ControlError> {
        if *shutdown.borrow() {
            return Err(ControlError::Cancelled);
        }

        tokio::select! {
            _ = sleep(duration) => Ok(()),
            _ = shutdown.changed() => Err(ControlError::Cancelled),
        }
    }
}
