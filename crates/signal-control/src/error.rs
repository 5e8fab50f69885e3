//! Control error taxonomy

use thiserror::Error;

/// Errors that stop the control loop
#[derive(Error, Debug)]
pub enum ControlError {
    /// A frame source failed. Fatal to the run, never retried.
    #[error("frame acquisition failed for approach {approach}: {reason}")]
    Acquisition { approach: String, reason: String },

    /// Invalid settings, surfaced at startup before the loop begins
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Shutdown signal observed during a hold or between cycles
    #[error("cancellation requested")]
    Cancelled,
}
