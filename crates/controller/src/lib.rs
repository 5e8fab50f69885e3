//! Junction Signal Pipeline
//!
//! Ties the pipeline together: per-approach frame sources feed detectors,
//! detections become density readings, the decision engine picks the winning
//! approach, and the scheduler walks the signal heads through one cycle.

pub mod run;
pub mod settings;

pub use run::{ApproachRuntime, ControlLoop, CycleReport};
pub use settings::{ApproachConfig, Settings};

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Initialize logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}
