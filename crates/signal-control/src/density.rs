//! Density estimation from detection sets
//!
//! Density is the ratio of detected traffic bounding-box area to frame area,
//! as a percentage. With overlap merging disabled (the default) box areas are
//! summed raw, so two stacked vehicles double-count and the value can exceed
//! 100; merging counts every covered pixel once and keeps the value within
//! 100.

use object_detection::{AllowedClasses, Detection};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::ControlConfig;
use crate::error::ControlError;
use crate::phase::DirectionId;

/// Frame dimensions used for the area denominator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameGeometry {
    pub width: u32,
    pub height: u32,
}

impl Default for FrameGeometry {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
        }
    }
}

impl FrameGeometry {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Total frame area in pixels
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// One approach's density for the current cycle
#[derive(Debug, Clone, Copy)]
pub struct DensityReading {
    pub direction: DirectionId,
    /// Percentage of frame area covered by traffic; may exceed 100 when
    /// overlap merging is disabled
    pub percentage: f64,
}

/// Converts detection sets into density percentages
///
/// Pure and deterministic: identical inputs produce bit-identical output.
pub struct DensityEstimator {
    geometry: FrameGeometry,
    allowed: AllowedClasses,
    merge_overlaps: bool,
}

impl DensityEstimator {
    /// Create an estimator; zero-area geometry is rejected here so the loop
    /// never divides by zero per frame.
    pub fn new(
        geometry: FrameGeometry,
        allowed: AllowedClasses,
        merge_overlaps: bool,
    ) -> Result<Self, ControlError> {
        if geometry.area() == 0 {
            return Err(ControlError::Configuration(format!(
                "frame geometry {}x{} has zero area",
                geometry.width, geometry.height
            )));
        }
        if allowed.is_empty() {
            warn!("allowed class set is empty; every density will be 0");
        }

        Ok(Self {
            geometry,
            allowed,
            merge_overlaps,
        })
    }

    pub fn from_config(config: &ControlConfig) -> Result<Self, ControlError> {
        Self::new(
            config.frame_geometry,
            config.allowed_classes.clone(),
            config.merge_overlapping_boxes,
        )
    }

    /// Density percentage for one frame's detections
    pub fn estimate(&self, detections: &[Detection]) -> f64 {
        let covered = if self.merge_overlaps {
            self.coverage_area(detections) as f64
        } else {
            self.summed_area(detections)
        };
        100.0 * covered / self.geometry.area() as f64
    }

    fn retained<'a>(&'a self, detections: &'a [Detection]) -> impl Iterator<Item = &'a Detection> {
        detections.iter().filter(|d| self.allowed.contains(d.class_id))
    }

    /// Raw per-box areas, coordinates rounded to integer pixels first.
    /// Degenerate boxes clamp to zero area; overlaps double-count.
    fn summed_area(&self, detections: &[Detection]) -> f64 {
        self.retained(detections)
            .map(|d| {
                let x1 = (d.bbox[0] as f64).round();
                let y1 = (d.bbox[1] as f64).round();
                let x2 = (d.bbox[2] as f64).round();
                let y2 = (d.bbox[3] as f64).round();
                let w = (x2 - x1).max(0.0);
                let h = (y2 - y1).max(0.0);
                (w * h).max(0.0)
            })
            .sum()
    }

    /// Exact union area: rasterize boxes clamped to the frame and count each
    /// covered pixel once.
    fn coverage_area(&self, detections: &[Detection]) -> u64 {
        let width = self.geometry.width as i64;
        let height = self.geometry.height as i64;
        let mut covered = vec![false; (width * height) as usize];

        for d in self.retained(detections) {
            let x1 = (d.bbox[0].round() as i64).clamp(0, width);
            let y1 = (d.bbox[1].round() as i64).clamp(0, height);
            let x2 = (d.bbox[2].round() as i64).clamp(0, width);
            let y2 = (d.bbox[3].round() as i64).clamp(0, height);

            for row in y1..y2 {
                let base = (row * width) as usize;
                for col in x1..x2 {
                    covered[base + col as usize] = true;
                }
            }
        }

        covered.iter().filter(|c| **c).count() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn estimator(merge: bool) -> DensityEstimator {
        DensityEstimator::new(FrameGeometry::default(), AllowedClasses::default(), merge).unwrap()
    }

    fn car(bbox: [f32; 4]) -> Detection {
        Detection::new(2, bbox, 0.9)
    }

    #[test]
    fn test_empty_detections_zero() {
        assert_eq!(estimator(false).estimate(&[]), 0.0);
        assert_eq!(estimator(true).estimate(&[]), 0.0);
    }

    #[test]
    fn test_full_frame_box_is_100() {
        let detections = [car([0.0, 0.0, 640.0, 480.0])];
        assert_eq!(estimator(false).estimate(&detections), 100.0);
        assert_eq!(estimator(true).estimate(&detections), 100.0);
    }

    #[test]
    fn test_disallowed_classes_ignored() {
        // Class 1 (bicycle) is outside the default allowed set
        let detections = [
            Detection::new(1, [0.0, 0.0, 640.0, 480.0], 0.9),
            car([0.0, 0.0, 64.0, 48.0]),
        ];
        assert_eq!(estimator(false).estimate(&detections), 1.0);
    }

    #[test]
    fn test_coordinates_rounded_before_area() {
        // 99.6 - 0.4 rounds to 100 - 0 = 100px per side
        let detections = [car([0.4, 0.4, 99.6, 99.6])];
        let expected = 100.0 * (100.0 * 100.0) / (640.0 * 480.0);
        assert_eq!(estimator(false).estimate(&detections), expected);
    }

    #[test]
    fn test_degenerate_box_counts_zero() {
        let detections = [car([50.0, 50.0, 40.0, 60.0])];
        assert_eq!(estimator(false).estimate(&detections), 0.0);
    }

    #[test]
    fn test_overlap_double_counts_past_100() {
        let detections = [
            car([0.0, 0.0, 640.0, 480.0]),
            car([0.0, 0.0, 640.0, 480.0]),
        ];
        assert_eq!(estimator(false).estimate(&detections), 200.0);
    }

    #[test]
    fn test_merge_counts_overlap_once() {
        let detections = [
            car([0.0, 0.0, 640.0, 480.0]),
            car([0.0, 0.0, 640.0, 480.0]),
        ];
        assert_eq!(estimator(true).estimate(&detections), 100.0);
    }

    #[test]
    fn test_merge_exact_union() {
        // Two 100x100 boxes overlapping in a 50x100 strip: union = 15000px
        let detections = [car([0.0, 0.0, 100.0, 100.0]), car([50.0, 0.0, 150.0, 100.0])];
        let expected = 100.0 * 15_000.0 / (640.0 * 480.0);
        assert_eq!(estimator(true).estimate(&detections), expected);
    }

    #[test]
    fn test_merge_clamps_out_of_frame() {
        let detections = [car([-100.0, -100.0, 10_000.0, 10_000.0])];
        assert_eq!(estimator(true).estimate(&detections), 100.0);
    }

    #[test]
    fn test_zero_area_geometry_rejected() {
        let result =
            DensityEstimator::new(FrameGeometry::new(640, 0), AllowedClasses::default(), false);
        assert!(matches!(result, Err(ControlError::Configuration(_))));
    }

    #[test]
    fn test_bit_identical_repeat() {
        let detections = [
            car([12.3, 45.6, 432.1, 210.9]),
            Detection::new(7, [100.0, 50.0, 300.5, 400.2], 0.7),
        ];
        let est = estimator(false);
        assert_eq!(
            est.estimate(&detections).to_bits(),
            est.estimate(&detections).to_bits()
        );
    }

    fn arb_detection() -> impl Strategy<Value = Detection> {
        (
            0u32..12,
            -200.0f32..900.0,
            -200.0f32..700.0,
            -200.0f32..900.0,
            -200.0f32..700.0,
            0.0f32..1.0,
        )
            .prop_map(|(class_id, x1, y1, x2, y2, confidence)| {
                Detection::new(class_id, [x1, y1, x2, y2], confidence)
            })
    }

    proptest! {
        #[test]
        fn prop_estimate_non_negative(
            detections in proptest::collection::vec(arb_detection(), 0..24),
            merge in proptest::bool::ANY,
        ) {
            let est = estimator(merge);
            prop_assert!(est.estimate(&detections) >= 0.0);
        }

        #[test]
        fn prop_estimate_deterministic(
            detections in proptest::collection::vec(arb_detection(), 0..24),
        ) {
            let est = estimator(false);
            prop_assert_eq!(
                est.estimate(&detections).to_bits(),
                est.estimate(&detections).to_bits()
            );
        }

        #[test]
        fn prop_merged_never_exceeds_100(
            detections in proptest::collection::vec(arb_detection(), 0..24),
        ) {
            let est = estimator(true);
            prop_assert!(est.estimate(&detections) <= 100.0);
        }
    }
}
