//! Numeric helpers.

use std::cmp::Ordering;

/// Wrapper giving `f32` the total order defined by [`f32::total_cmp`].
///
/// Landmark coordinates get wrapped in this when they need to pass through `Ord`-based adaptors,
/// like the min/max reduction that derives a region's bounding box.
#[derive(Debug, Clone, Copy)]
pub struct TotalF32(pub f32);

impl Ord for TotalF32 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl PartialOrd for TotalF32 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for TotalF32 {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TotalF32 {}

/// The logistic function `1 / (1 + e^-x)`.
///
/// Detector and landmark networks commonly report confidence as a raw logit; this maps it into
/// the 0 to 1 range that the pipeline's thresholds compare against.
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}
