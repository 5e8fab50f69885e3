//! Operator-facing console output

use std::time::Duration;

use signal_control::{DensityReading, DirectionId, SignalPhase, StatusSink};

/// Prints cycle densities and phase banners to standard output
///
/// One density line per approach at the top of each cycle, then one banner
/// per transition, e.g. `Density B: 40.00%` followed by `B: GREEN 25s`.
pub struct ConsoleSink {
    labels: Vec<String>,
}

impl ConsoleSink {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    fn label(&self, direction: DirectionId) -> &str {
        self.labels
            .get(direction.0)
            .map(String::as_str)
            .unwrap_or("?")
    }

    fn density_line(&self, reading: &DensityReading) -> String {
        format!(
            "Density {}: {:.2}%",
            self.label(reading.direction),
            reading.percentage
        )
    }

    fn phase_line(&self, direction: DirectionId, phase: SignalPhase, hold: Duration) -> String {
        format!("{}: {} {}s", self.label(direction), phase, hold.as_secs())
    }
}

impl StatusSink for ConsoleSink {
    fn cycle_densities(&mut self, readings: &[DensityReading]) {
        for reading in readings {
            println!("{}", self.density_line(reading));
        }
    }

    fn phase_change(&mut self, direction: DirectionId, phase: SignalPhase, hold: Duration) {
        println!("{}", self.phase_line(direction, phase, hold));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_sink() -> ConsoleSink {
        ConsoleSink::new(vec!["B".to_string(), "C".to_string()])
    }

    #[test]
    fn test_density_line_format() {
        let sink = test_sink();
        let reading = DensityReading {
            direction: DirectionId(0),
            percentage: 40.0,
        };
        assert_eq!(sink.density_line(&reading), "Density B: 40.00%");

        let reading = DensityReading {
            direction: DirectionId(1),
            percentage: 9.876,
        };
        assert_eq!(sink.density_line(&reading), "Density C: 9.88%");
    }

    #[test]
    fn test_phase_line_format() {
        let sink = test_sink();
        let line = sink.phase_line(DirectionId(0), SignalPhase::Green, Duration::from_secs(25));
        assert_eq!(line, "B: GREEN 25s");

        let line = sink.phase_line(DirectionId(1), SignalPhase::Red, Duration::from_secs(5));
        assert_eq!(line, "C: RED 5s");
    }

    #[test]
    fn test_unknown_direction_label() {
        let sink = test_sink();
        let line = sink.phase_line(DirectionId(9), SignalPhase::Red, Duration::from_secs(5));
        assert_eq!(line, "?: RED 5s");
    }
}
