//! Decision-engine configuration

use std::time::Duration;

use object_detection::AllowedClasses;
use serde::{Deserialize, Serialize};

use crate::density::FrameGeometry;
use crate::error::ControlError;
use crate::scheduler::PhaseTiming;
use crate::timing::TimingPolicy;

/// Options recognized by the decision engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Minimum green duration (seconds)
    pub base_time: u32,
    /// Maximum green duration (seconds)
    pub max_time: u32,
    /// Red hold for losing approaches and the closing red (seconds)
    pub loser_red_seconds: u64,
    /// Yellow preparation hold for the winner (seconds)
    pub prepare_seconds: u64,
    /// Frame dimensions for the density denominator
    pub frame_geometry: FrameGeometry,
    /// Class ids counted as traffic
    pub allowed_classes: AllowedClasses,
    /// Count overlapping box area once instead of summing raw areas
    pub merge_overlapping_boxes: bool,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            base_time: 10,
            max_time: 25,
            loser_red_seconds: 5,
            prepare_seconds: 5,
            frame_geometry: FrameGeometry::default(),
            allowed_classes: AllowedClasses::default(),
            merge_overlapping_boxes: false,
        }
    }
}

impl ControlConfig {
    /// Short holds for demos and development runs
    pub fn fast_cycle() -> Self {
        Self {
            base_time: 3,
            max_time: 8,
            loser_red_seconds: 1,
            prepare_seconds: 1,
            ..Default::default()
        }
    }

    /// Reject configurations the loop could not run safely
    pub fn validate(&self) -> Result<(), ControlError> {
        if self.frame_geometry.area() == 0 {
            return Err(ControlError::Configuration(format!(
                "frame geometry {}x{} has zero area",
                self.frame_geometry.width, self.frame_geometry.height
            )));
        }
        if self.base_time == 0 {
            return Err(ControlError::Configuration(
                "base_time must be at least 1 second".into(),
            ));
        }
        if self.base_time > self.max_time {
            return Err(ControlError::Configuration(format!(
                "base_time {} exceeds max_time {}",
                self.base_time, self.max_time
            )));
        }
        if self.loser_red_seconds == 0 || self.prepare_seconds == 0 {
            return Err(ControlError::Configuration(
                "phase holds must be at least 1 second".into(),
            ));
        }
        Ok(())
    }

    pub fn timing_policy(&self) -> TimingPolicy {
        TimingPolicy {
            base_time: self.base_time,
            max_time: self.max_time,
        }
    }

    pub fn phase_timing(&self) -> PhaseTiming {
        PhaseTiming {
            loser_red: Duration::from_secs(self.loser_red_seconds),
            prepare: Duration::from_secs(self.prepare_seconds),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_validates() {
        assert!(ControlConfig::default().validate().is_ok());
        assert!(ControlConfig::fast_cycle().validate().is_ok());
    }

    #[test]
    fn test_zero_area_geometry_rejected() {
        let config = ControlConfig {
            frame_geometry: FrameGeometry::new(0, 480),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ControlError::Configuration(_))
        ));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let config = ControlConfig {
            base_time: 30,
            max_time: 25,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_holds_rejected() {
        let config = ControlConfig {
            loser_red_seconds: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ControlConfig {
            prepare_seconds: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_policy_and_timing_from_config() {
        let config = ControlConfig::default();
        assert_eq!(config.timing_policy(), TimingPolicy::default());
        assert_eq!(config.phase_timing().loser_red, Duration::from_secs(5));
        assert_eq!(config.phase_timing().prepare, Duration::from_secs(5));
    }
}
