//! Green-duration policy and the per-cycle winner decision

use crate::density::DensityReading;
use crate::phase::DirectionId;

/// Maps a density percentage to a bounded green duration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingPolicy {
    /// Minimum green duration (seconds)
    pub base_time: u32,
    /// Maximum green duration (seconds)
    pub max_time: u32,
}

impl Default for TimingPolicy {
    fn default() -> Self {
        Self {
            base_time: 10,
            max_time: 25,
        }
    }
}

impl TimingPolicy {
    /// Green seconds for a density percentage: base + density/2, bounded to
    /// [base, max] and truncated to whole seconds.
    pub fn green_duration(&self, density_percentage: f64) -> u32 {
        let density = if density_percentage.is_finite() {
            density_percentage
        } else {
            0.0
        };
        let raw = self.base_time as f64 + density / 2.0;
        raw.min(self.max_time as f64).max(self.base_time as f64) as u32
    }

    /// Pick the cycle winner: maximum density, ties broken toward the
    /// earliest-listed approach. The winner's own density sets the duration.
    pub fn decide(&self, readings: &[DensityReading]) -> Option<TimingDecision> {
        let mut winner = readings.first()?;
        for reading in &readings[1..] {
            if reading.percentage > winner.percentage {
                winner = reading;
            }
        }

        Some(TimingDecision {
            winner: winner.direction,
            green_duration_seconds: self.green_duration(winner.percentage),
        })
    }
}

/// The cycle's outcome: which approach gets green, and for how long
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingDecision {
    pub winner: DirectionId,
    pub green_duration_seconds: u32,
}
