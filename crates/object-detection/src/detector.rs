//! Detector trait and simulation stand-ins

use std::fs::File;
use std::io::BufReader;
use std::sync::atomic::{AtomicUsize, Ordering};

use frame_capture::Frame;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{DetectionError, ObjectClass};

/// One detected object in a single frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Detector class id
    pub class_id: u32,

    /// Bounding box [x1, y1, x2, y2] in pixel coordinates
    pub bbox: [f32; 4],

    /// Detection confidence
    pub confidence: f32,
}

impl Detection {
    pub fn new(class_id: u32, bbox: [f32; 4], confidence: f32) -> Self {
        Self {
            class_id,
            bbox,
            confidence,
        }
    }
}

/// Detector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Minimum confidence for a detection to be reported
    pub confidence_threshold: f32,
    /// JSON file of per-frame detection sets; synthetic heuristic when unset
    pub fixture_path: Option<String>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.25,
            fixture_path: None,
        }
    }
}

/// One approach's object detector
///
/// Infallible by contract: a detector that has nothing to report returns an
/// empty set. The confidence threshold is applied inside implementations.
pub trait Detector: Send {
    fn infer(&self, frame: &Frame) -> Vec<Detection>;
}

// Grid cells cycle through vehicle-heavy classes so synthetic traffic
// resembles what a road model reports.
const GRID_COLS: u32 = 4;
const GRID_ROWS: u32 = 3;
const CELL_CLASSES: [ObjectClass; 5] = [
    ObjectClass::Car,
    ObjectClass::Truck,
    ObjectClass::Bus,
    ObjectClass::Motorbike,
    ObjectClass::Person,
];

/// Deterministic stand-in detector for simulation runs
///
/// Splits the frame into a coarse grid and reports a box for every cell
/// bright enough to hold a synthetic vehicle. Purely a function of the frame
/// contents: the same frame always yields the same detections.
pub struct SyntheticDetector {
    confidence_threshold: f32,
}

impl SyntheticDetector {
    pub fn new(confidence_threshold: f32) -> Self {
        Self {
            confidence_threshold,
        }
    }
}

impl Detector for SyntheticDetector {
    fn infer(&self, frame: &Frame) -> Vec<Detection> {
        let cell_w = frame.width / GRID_COLS;
        let cell_h = frame.height / GRID_ROWS;
        if cell_w == 0 || cell_h == 0 {
            return Vec::new();
        }

        let mut detections = Vec::new();
        for row in 0..GRID_ROWS {
            for col in 0..GRID_COLS {
                let x = col * cell_w;
                let y = row * cell_h;
                let luma = frame.region_luma(x, y, cell_w, cell_h);
                if luma <= 96.0 {
                    continue;
                }

                let class = CELL_CLASSES[((row * GRID_COLS + col) % 5) as usize];
                let confidence = (luma / 255.0).min(0.99);
                if confidence < self.confidence_threshold {
                    continue;
                }

                let inset_x = cell_w as f32 * 0.05;
                let inset_y = cell_h as f32 * 0.05;
                detections.push(Detection::new(
                    class.class_id(),
                    [
                        x as f32 + inset_x,
                        y as f32 + inset_y,
                        (x + cell_w) as f32 - inset_x,
                        (y + cell_h) as f32 - inset_y,
                    ],
                    confidence,
                ));
            }
        }

        debug!(
            "synthetic detector: {} objects in frame {}",
            detections.len(),
            frame.sequence
        );
        detections
    }
}

/// Replays per-frame detection sets from a JSON fixture
///
/// The fixture is an array of detection arrays, one per frame, cycled when
/// the run is longer than the fixture. An empty fixture reports no objects.
pub struct FixtureDetector {
    sets: Vec<Vec<Detection>>,
    cursor: AtomicUsize,
    confidence_threshold: f32,
}

impl FixtureDetector {
    pub fn from_path(path: &str, confidence_threshold: f32) -> Result<Self, DetectionError> {
        let file = File::open(path).map_err(|e| DetectionError::Fixture {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        let sets: Vec<Vec<Detection>> = serde_json::from_reader(BufReader::new(file))?;

        info!("detection fixture {}: {} frame sets", path, sets.len());
        Ok(Self::from_sets(sets, confidence_threshold))
    }

    pub fn from_sets(sets: Vec<Vec<Detection>>, confidence_threshold: f32) -> Self {
        Self {
            sets,
            cursor: AtomicUsize::new(0),
            confidence_threshold,
        }
    }
}

impl Detector for FixtureDetector {
    fn infer(&self, _frame: &Frame) -> Vec<Detection> {
        if self.sets.is_empty() {
            return Vec::new();
        }
        let idx = self.cursor.fetch_add(1, Ordering::Relaxed) % self.sets.len();
        self.sets[idx]
            .iter()
            .filter(|d| d.confidence >= self.confidence_threshold)
            .cloned()
            .collect()
    }
}

/// Build the detector selected by configuration
pub fn build_detector(config: &DetectorConfig) -> Result<Box<dyn Detector>, DetectionError> {
    match &config.fixture_path {
        Some(path) => Ok(Box::new(FixtureDetector::from_path(
            path,
            config.confidence_threshold,
        )?)),
        None => Ok(Box::new(SyntheticDetector::new(config.confidence_threshold))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bright_frame() -> Frame {
        Frame::new(vec![200u8; 64 * 48 * 3], 64, 48, 0, 0)
    }

    fn dark_frame() -> Frame {
        Frame::new(vec![10u8; 64 * 48 * 3], 64, 48, 0, 1)
    }

    #[test]
    fn test_synthetic_deterministic() {
        let detector = SyntheticDetector::new(0.25);
        let frame = bright_frame();
        assert_eq!(detector.infer(&frame), detector.infer(&frame));
    }

    #[test]
    fn test_synthetic_dark_frame_empty() {
        let detector = SyntheticDetector::new(0.25);
        assert!(detector.infer(&dark_frame()).is_empty());
    }

    #[test]
    fn test_synthetic_threshold_filters_all() {
        let detector = SyntheticDetector::new(1.1);
        assert!(detector.infer(&bright_frame()).is_empty());
    }

    #[test]
    fn test_synthetic_reports_traffic_classes() {
        let detector = SyntheticDetector::new(0.25);
        let detections = detector.infer(&bright_frame());
        assert_eq!(detections.len(), (GRID_COLS * GRID_ROWS) as usize);
        for d in &detections {
            assert!(ObjectClass::from_class_id(d.class_id).is_some());
            assert!(d.bbox[2] > d.bbox[0] && d.bbox[3] > d.bbox[1]);
        }
    }

    #[test]
    fn test_fixture_cycles() {
        let first = vec![Detection::new(2, [0.0, 0.0, 10.0, 10.0], 0.9)];
        let second = vec![
            Detection::new(7, [5.0, 5.0, 20.0, 20.0], 0.8),
            Detection::new(0, [1.0, 1.0, 3.0, 8.0], 0.7),
        ];
        let detector = FixtureDetector::from_sets(vec![first.clone(), second.clone()], 0.25);

        let frame = dark_frame();
        assert_eq!(detector.infer(&frame), first);
        assert_eq!(detector.infer(&frame), second);
        assert_eq!(detector.infer(&frame), first);
    }

    #[test]
    fn test_fixture_confidence_filter() {
        let sets = vec![vec![
            Detection::new(2, [0.0, 0.0, 10.0, 10.0], 0.9),
            Detection::new(2, [0.0, 0.0, 10.0, 10.0], 0.1),
        ]];
        let detector = FixtureDetector::from_sets(sets, 0.25);
        assert_eq!(detector.infer(&dark_frame()).len(), 1);
    }

    #[test]
    fn test_fixture_json_format() {
        let json = r#"[[{"class_id": 2, "bbox": [0.0, 0.0, 384.0, 320.0], "confidence": 0.9}], []]"#;
        let sets: Vec<Vec<Detection>> = serde_json::from_str(json).unwrap();
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0][0].class_id, 2);
        assert!(sets[1].is_empty());
    }
}
