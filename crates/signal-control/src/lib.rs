//! Density-to-timing decision engine
//!
//! The junction's decision logic lives here:
//! - Density estimation from per-frame detection sets
//! - Green-duration policy and per-cycle winner decision
//! - Phase scheduling with a mutual-exclusion guarantee
//!
//! Everything outward (lamps, status output) sits behind the actuator and
//! sink traits; everything inward (frames, detections) arrives as plain data.

pub mod config;
pub mod density;
pub mod error;
pub mod output;
pub mod phase;
pub mod scheduler;
pub mod timing;

pub use config::ControlConfig;
pub use density::{DensityEstimator, DensityReading, FrameGeometry};
pub use error::ControlError;
pub use output::{SignalActuator, StatusSink};
pub use phase::{DirectionId, DirectionState, SignalPhase};
pub use scheduler::{PhaseScheduler, PhaseTiming};
pub use timing::{TimingDecision, TimingPolicy};
