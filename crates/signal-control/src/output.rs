//! Outward seams: lamp actuation and status output

use std::time::Duration;

use crate::density::DensityReading;
use crate::phase::{DirectionId, SignalPhase};

/// Drives the junction lamps
///
/// Fire-and-forget with no acknowledgement: the scheduler calls `set` exactly
/// once per phase transition and assumes it returns. Hardware-free
/// environments plug in a no-op implementation.
pub trait SignalActuator: Send {
    fn set(&mut self, direction: DirectionId, phase: SignalPhase);
}

/// Observes per-cycle densities and phase holds
///
/// Purely observational; nothing reported here feeds back into decisions.
pub trait StatusSink: Send {
    /// All approaches' density readings for the cycle, in approach order
    fn cycle_densities(&mut self, readings: &[DensityReading]);

    /// A phase was entered and will be held for `hold`
    fn phase_change(&mut self, direction: DirectionId, phase: SignalPhase, hold: Duration);
}
