//! Signal Head Actuation
//!
//! Backends that turn phase transitions into lamp writes, plus the console
//! sink that prints per-cycle densities and phase banners for the operator.
//! The default backend discards writes so the pipeline runs on any machine.

mod actuator;
mod config;
mod console;

pub use actuator::{build_actuator, GpioActuator, NoopActuator};
pub use config::{ActuatorConfig, ActuatorKind, SignalPins};
pub use console::ConsoleSink;

use thiserror::Error;

/// Errors raised while building or validating an actuation backend
#[derive(Debug, Error)]
pub enum ActuationError {
    /// Actuator configuration cannot drive the configured junction
    #[error("invalid actuator config: {0}")]
    InvalidConfig(String),
}
