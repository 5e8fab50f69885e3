//! The junction control loop
//!
//! One async task repeats the same cycle: read a frame per approach, run
//! detection, estimate densities, pick the winner, then drive the scheduler
//! through RED/YELLOW/GREEN. Acquisition failures are terminal; whatever ends
//! the loop, every approach is driven back to RED before returning.

use actuation::{build_actuator, ConsoleSink};
use frame_capture::{open_source, FrameSource};
use object_detection::{build_detector, Detector, DetectorConfig};
use signal_control::{
    ControlConfig, ControlError, DensityEstimator, DensityReading, DirectionId, FrameGeometry,
    PhaseScheduler, SignalActuator, StatusSink, TimingDecision, TimingPolicy,
};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::settings::Settings;

/// One approach's live pipeline: frames in, detections out
pub struct ApproachRuntime {
    pub label: String,
    pub source: Box<dyn FrameSource>,
    pub detector: Box<dyn Detector>,
}

/// What one cycle measured and decided
#[derive(Debug, Clone)]
pub struct CycleReport {
    /// Density per approach, in approach order
    pub readings: Vec<DensityReading>,
    /// Candidate green seconds per approach, in approach order
    pub candidates: Vec<u32>,
    /// The winning approach and its green duration
    pub decision: TimingDecision,
}

/// Owns every pipeline stage and repeats signal cycles until shutdown or a
/// terminal error
pub struct ControlLoop {
    approaches: Vec<ApproachRuntime>,
    estimator: DensityEstimator,
    policy: TimingPolicy,
    scheduler: PhaseScheduler,
    actuator: Box<dyn SignalActuator>,
    sink: Box<dyn StatusSink>,
    geometry: FrameGeometry,
}

impl ControlLoop {
    /// Assemble a loop from already-built stages
    pub fn new(
        approaches: Vec<ApproachRuntime>,
        control: &ControlConfig,
        actuator: Box<dyn SignalActuator>,
        sink: Box<dyn StatusSink>,
    ) -> Result<Self, ControlError> {
        control.validate()?;
        let estimator = DensityEstimator::from_config(control)?;
        let scheduler = PhaseScheduler::new(approaches.len(), control.phase_timing());
        Ok(Self {
            approaches,
            estimator,
            policy: control.timing_policy(),
            scheduler,
            actuator,
            sink,
            geometry: control.frame_geometry,
        })
    }

    /// Build the full pipeline described by validated settings
    pub fn from_settings(settings: &Settings) -> Result<Self, ControlError> {
        settings.validate()?;

        let mut approaches = Vec::with_capacity(settings.approaches.len());
        for approach in &settings.approaches {
            let source =
                open_source(&approach.source).map_err(|e| ControlError::Acquisition {
                    approach: approach.label.clone(),
                    reason: e.to_string(),
                })?;
            let detector_config = DetectorConfig {
                confidence_threshold: settings.detector.confidence_threshold,
                fixture_path: approach
                    .fixture
                    .clone()
                    .or_else(|| settings.detector.fixture_path.clone()),
            };
            let detector = build_detector(&detector_config).map_err(|e| {
                ControlError::Configuration(format!(
                    "detector for approach '{}': {}",
                    approach.label, e
                ))
            })?;
            info!("approach '{}' ready", approach.label);
            approaches.push(ApproachRuntime {
                label: approach.label.clone(),
                source,
                detector,
            });
        }

        let actuator = build_actuator(&settings.actuator);
        let sink = Box::new(ConsoleSink::new(settings.labels()));
        Self::new(approaches, &settings.control, actuator, sink)
    }

    pub fn scheduler(&self) -> &PhaseScheduler {
        &self.scheduler
    }

    /// Run cycles until shutdown or a terminal error
    ///
    /// Cancellation is a clean exit. Every return path leaves all approaches
    /// at RED; frame sources are released when the loop is dropped.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> Result<(), ControlError> {
        info!(approaches = self.approaches.len(), "control loop running");
        let outcome = loop {
            if *shutdown.borrow() {
                info!("shutdown requested, stopping control loop");
                break Ok(());
            }
            match self.run_once(&mut shutdown).await {
                Ok(report) => {
                    debug!(
                        cycle = self.scheduler.cycles_completed(),
                        winner = %report.decision.winner,
                        "cycle complete"
                    );
                }
                Err(ControlError::Cancelled) => {
                    info!("shutdown requested, stopping control loop");
                    break Ok(());
                }
                Err(err) => break Err(err),
            }
        };
        self.scheduler.force_all_red(self.actuator.as_mut());
        outcome
    }

    /// Measure every approach, decide a winner, and run one signal cycle
    pub async fn run_once(
        &mut self,
        shutdown: &mut watch::Receiver<bool>,
    ) -> Result<CycleReport, ControlError> {
        let readings = self.sample_densities()?;
        self.sink.cycle_densities(&readings);

        let candidates: Vec<u32> = readings
            .iter()
            .map(|r| self.policy.green_duration(r.percentage))
            .collect();
        for (reading, seconds) in readings.iter().zip(&candidates) {
            debug!(
                approach = %reading.direction,
                density = reading.percentage,
                candidate_green = seconds,
                "candidate"
            );
        }

        let decision = self
            .policy
            .decide(&readings)
            .ok_or_else(|| ControlError::Configuration("no approaches configured".into()))?;
        info!(
            winner = %decision.winner,
            green = decision.green_duration_seconds,
            "cycle decision"
        );

        self.scheduler
            .run_cycle(&decision, self.actuator.as_mut(), self.sink.as_mut(), shutdown)
            .await?;

        Ok(CycleReport {
            readings,
            candidates,
            decision,
        })
    }

    fn sample_densities(&mut self) -> Result<Vec<DensityReading>, ControlError> {
        let mut readings = Vec::with_capacity(self.approaches.len());
        for (index, approach) in self.approaches.iter_mut().enumerate() {
            let frame = approach.source.read().map_err(|e| ControlError::Acquisition {
                approach: approach.label.clone(),
                reason: e.to_string(),
            })?;
            let frame = if (frame.width, frame.height) != (self.geometry.width, self.geometry.height)
            {
                frame.resize(self.geometry.width, self.geometry.height)
            } else {
                frame
            };

            let detections = approach.detector.infer(&frame);
            let percentage = self.estimator.estimate(&detections);
            debug!(
                approach = %approach.label,
                detections = detections.len(),
                density = percentage,
                "sampled"
            );
            readings.push(DensityReading {
                direction: DirectionId(index),
                percentage,
            });
        }
        Ok(readings)
    }
}
