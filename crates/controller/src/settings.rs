//! Pipeline settings
//!
//! Settings come from an optional TOML file plus `JUNCTION_*` environment
//! variables (nested keys separated by `__`, e.g.
//! `JUNCTION_CONTROL__BASE_TIME=12`). Every section has defaults, so an
//! empty configuration runs two synthetic approaches against the noop
//! actuator.

use std::collections::BTreeSet;

use actuation::ActuatorConfig;
use config::{Config, Environment, File};
use frame_capture::SourceConfig;
use object_detection::DetectorConfig;
use serde::{Deserialize, Serialize};
use signal_control::{ControlConfig, ControlError};
use tracing::info;

/// One monitored approach
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApproachConfig {
    /// Operator-facing name; list order is the tie-break priority
    pub label: String,
    /// Frame source for this approach
    #[serde(default)]
    pub source: SourceConfig,
    /// Detection fixture replayed for this approach, overriding the
    /// detector-level default
    #[serde(default)]
    pub fixture: Option<String>,
}

impl ApproachConfig {
    pub fn synthetic(label: &str, intensity: f32) -> Self {
        Self {
            label: label.to_string(),
            source: SourceConfig::synthetic(intensity),
            fixture: None,
        }
    }
}

/// Top-level pipeline settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Decision engine options
    pub control: ControlConfig,
    /// Detector options shared by all approaches
    pub detector: DetectorConfig,
    /// Monitored approaches, in priority order
    pub approaches: Vec<ApproachConfig>,
    /// Signal head backend
    pub actuator: ActuatorConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            control: ControlConfig::default(),
            detector: DetectorConfig::default(),
            approaches: vec![
                ApproachConfig::synthetic("B", 0.6),
                ApproachConfig::synthetic("C", 0.2),
            ],
            actuator: ActuatorConfig::default(),
        }
    }
}

impl Settings {
    /// Load settings from `path` (or `junction.*` in the working directory
    /// when no path is given) merged with `JUNCTION_*` environment variables
    pub fn load(path: Option<&str>) -> Result<Self, ControlError> {
        let builder = match path {
            Some(explicit) => {
                info!("loading settings from {}", explicit);
                Config::builder().add_source(File::with_name(explicit))
            }
            None => Config::builder().add_source(File::with_name("junction").required(false)),
        };

        let raw = builder
            .add_source(Environment::with_prefix("JUNCTION").separator("__"))
            .build()
            .map_err(|e| ControlError::Configuration(e.to_string()))?;

        raw.try_deserialize()
            .map_err(|e| ControlError::Configuration(e.to_string()))
    }

    /// Reject settings the pipeline cannot start with
    pub fn validate(&self) -> Result<(), ControlError> {
        self.control.validate()?;

        if self.approaches.len() < 2 {
            return Err(ControlError::Configuration(format!(
                "at least two approaches required, found {}",
                self.approaches.len()
            )));
        }

        let mut labels = BTreeSet::new();
        for approach in &self.approaches {
            if approach.label.trim().is_empty() {
                return Err(ControlError::Configuration(
                    "approach labels must be non-empty".into(),
                ));
            }
            if !labels.insert(approach.label.as_str()) {
                return Err(ControlError::Configuration(format!(
                    "duplicate approach label '{}'",
                    approach.label
                )));
            }
        }

        self.actuator
            .validate(self.approaches.len())
            .map_err(|e| ControlError::Configuration(e.to_string()))
    }

    /// Approach labels in priority order
    pub fn labels(&self) -> Vec<String> {
        self.approaches.iter().map(|a| a.label.clone()).collect()
    }
}
