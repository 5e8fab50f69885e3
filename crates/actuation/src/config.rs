//! Actuation backend configuration

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use signal_control::SignalPhase;

use crate::ActuationError;

/// Which backend receives phase transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActuatorKind {
    /// Log transitions, drive nothing
    Noop,
    /// Drive one GPIO line per lamp
    Gpio,
}

/// GPIO line numbers for one approach's signal head
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalPins {
    pub red: u32,
    pub yellow: u32,
    pub green: u32,
}

impl SignalPins {
    pub fn pin_for(&self, phase: SignalPhase) -> u32 {
        match phase {
            SignalPhase::Red => self.red,
            SignalPhase::Yellow => self.yellow,
            SignalPhase::Green => self.green,
        }
    }

    fn lines(&self) -> [u32; 3] {
        [self.red, self.yellow, self.green]
    }
}

/// Actuation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActuatorConfig {
    /// Backend selection (default: noop)
    pub kind: ActuatorKind,
    /// One pin triple per approach, in approach order (gpio only)
    pub pins: Vec<SignalPins>,
}

impl Default for ActuatorConfig {
    fn default() -> Self {
        Self {
            kind: ActuatorKind::Noop,
            pins: Vec::new(),
        }
    }
}

impl ActuatorConfig {
    /// Check that the backend can drive `approach_count` signal heads
    pub fn validate(&self, approach_count: usize) -> Result<(), ActuationError> {
        match self.kind {
            ActuatorKind::Noop => Ok(()),
            ActuatorKind::Gpio => {
                if self.pins.len() != approach_count {
                    return Err(ActuationError::InvalidConfig(format!(
                        "gpio actuator needs {} pin triples, found {}",
                        approach_count,
                        self.pins.len()
                    )));
                }
                let mut seen = BTreeSet::new();
                for pins in &self.pins {
                    for line in pins.lines() {
                        if !seen.insert(line) {
                            return Err(ActuationError::InvalidConfig(format!(
                                "gpio line {} assigned more than once",
                                line
                            )));
                        }
                    }
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_noop() {
        let config = ActuatorConfig::default();
        assert_eq!(config.kind, ActuatorKind::Noop);
        assert!(config.validate(2).is_ok());
        assert!(config.validate(8).is_ok());
    }

    #[test]
    fn test_gpio_pin_count_must_match() {
        let config = ActuatorConfig {
            kind: ActuatorKind::Gpio,
            pins: vec![SignalPins {
                red: 22,
                yellow: 27,
                green: 17,
            }],
        };
        assert!(config.validate(1).is_ok());
        assert!(config.validate(2).is_err());
    }

    #[test]
    fn test_gpio_rejects_shared_lines() {
        let config = ActuatorConfig {
            kind: ActuatorKind::Gpio,
            pins: vec![
                SignalPins {
                    red: 22,
                    yellow: 27,
                    green: 17,
                },
                SignalPins {
                    red: 25,
                    yellow: 24,
                    green: 17,
                },
            ],
        };
        assert!(config.validate(2).is_err());
    }

    #[test]
    fn test_pin_lookup_by_phase() {
        let pins = SignalPins {
            red: 5,
            yellow: 6,
            green: 13,
        };
        assert_eq!(pins.pin_for(SignalPhase::Red), 5);
        assert_eq!(pins.pin_for(SignalPhase::Yellow), 6);
        assert_eq!(pins.pin_for(SignalPhase::Green), 13);
    }
}
