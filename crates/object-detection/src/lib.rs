//! Object detection seam for junction approach frames
//!
//! The control loop only needs (bounding box, class, confidence) tuples per
//! frame; where they come from is behind the [`Detector`] trait:
//! - Synthetic detector: deterministic luminance heuristic for simulation
//! - Fixture detector: replays per-frame detection sets from a JSON file
//!
//! A production model plugs in behind the same trait. The confidence
//! threshold is applied here, upstream of any density math.

pub mod class;
pub mod detector;

pub use class::{AllowedClasses, ObjectClass};
pub use detector::{build_detector, Detection, Detector, DetectorConfig};
pub use detector::{FixtureDetector, SyntheticDetector};

use thiserror::Error;

/// Detector construction error types
#[derive(Error, Debug)]
pub enum DetectionError {
    #[error("Failed to read fixture {path}: {reason}")]
    Fixture { path: String, reason: String },

    #[error("Fixture parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
