//! Signal phases and per-approach state

use std::fmt;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

/// Instantaneous signal state of one approach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalPhase {
    Red,
    Yellow,
    Green,
}

impl SignalPhase {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalPhase::Red => "RED",
            SignalPhase::Yellow => "YELLOW",
            SignalPhase::Green => "GREEN",
        }
    }
}

impl fmt::Display for SignalPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Index of an approach in the configured list
///
/// List order is the tie-break priority: the lower index wins an equal-density
/// cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DirectionId(pub usize);

impl fmt::Display for DirectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One approach's live signal state
///
/// Mutated only by the phase scheduler, from the single control task.
#[derive(Debug, Clone)]
pub struct DirectionState {
    /// Which approach this is
    pub direction: DirectionId,
    /// Current phase
    pub phase: SignalPhase,
    /// When the current hold ends; `None` before the first cycle
    pub phase_deadline: Option<Instant>,
}

impl DirectionState {
    pub fn initial(direction: DirectionId) -> Self {
        Self {
            direction,
            phase: SignalPhase::Red,
            phase_deadline: None,
        }
    }
}
