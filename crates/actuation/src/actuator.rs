//! Actuator backends

use signal_control::{DirectionId, SignalActuator, SignalPhase};
use tracing::{debug, info, warn};

use crate::config::{ActuatorConfig, ActuatorKind, SignalPins};

/// Logs transitions and drives nothing
///
/// Default backend; keeps development runs free of hardware requirements.
pub struct NoopActuator;

impl SignalActuator for NoopActuator {
    fn set(&mut self, direction: DirectionId, phase: SignalPhase) {
        debug!(%direction, %phase, "noop transition");
    }
}

/// Drives one GPIO line per lamp, one triple per approach
///
/// Every transition writes all three lines for the approach: the active
/// lamp's line goes high, the other two go low. Lamps of other approaches
/// are untouched.
pub struct GpioActuator {
    pins: Vec<SignalPins>,
    writes: u64,
}

impl GpioActuator {
    pub fn new(pins: Vec<SignalPins>) -> Self {
        info!(approaches = pins.len(), "initializing gpio actuator");
        Self { pins, writes: 0 }
    }

    /// Total line writes since startup
    pub fn writes(&self) -> u64 {
        self.writes
    }

    fn write_line(&mut self, line: u32, high: bool) {
        // Sysfs access happens on the target controller; host builds record
        // the write at debug level only.
        debug!(line, high, "gpio write");
        self.writes += 1;
    }
}

impl SignalActuator for GpioActuator {
    fn set(&mut self, direction: DirectionId, phase: SignalPhase) {
        let Some(pins) = self.pins.get(direction.0).copied() else {
            warn!(%direction, "no pin mapping for approach");
            return;
        };
        for lamp in [SignalPhase::Red, SignalPhase::Yellow, SignalPhase::Green] {
            self.write_line(pins.pin_for(lamp), lamp == phase);
        }
    }
}

/// Build the configured backend
pub fn build_actuator(config: &ActuatorConfig) -> Box<dyn SignalActuator> {
    match config.kind {
        ActuatorKind::Noop => Box::new(NoopActuator),
        ActuatorKind::Gpio => Box::new(GpioActuator::new(config.pins.clone())),
    }
}
