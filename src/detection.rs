//! The full-frame detector boundary.

use anyhow::Result;

use crate::image::Frame;
use crate::rect::Rect;

/// A single object found by the [`FrameDetector`].
///
/// Consists of a [`Rect`] enclosing the detected object, a confidence value, and a small set of
/// seed keypoints (eg. the 6 coarse face keypoints of a BlazeFace-style detector). The keypoints
/// are used to derive the region's initial rotation before the first landmark pass; afterwards
/// the much richer landmark set takes over that role.
///
/// Per convention, the confidence value lies between 0.0 and 1.0, which can be achieved by
/// passing the raw network output through [`crate::num::sigmoid`] (but the network documentation
/// should be consulted).
#[derive(Debug, Clone)]
pub struct Detection {
    confidence: f32,
    rect: Rect,
    keypoints: Vec<[f32; 2]>,
}

impl Detection {
    pub fn new(confidence: f32, rect: Rect) -> Self {
        Self {
            confidence,
            rect,
            keypoints: Vec::new(),
        }
    }

    pub fn with_keypoints(confidence: f32, rect: Rect, keypoints: Vec<[f32; 2]>) -> Self {
        Self {
            confidence,
            rect,
            keypoints,
        }
    }

    pub fn push_keypoint(&mut self, keypoint: [f32; 2]) {
        self.keypoints.push(keypoint);
    }

    #[inline]
    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    /// Returns the axis-aligned bounding rectangle containing the detected object, in image
    /// coordinates.
    #[inline]
    pub fn bounding_rect(&self) -> Rect {
        self.rect
    }

    #[inline]
    pub fn keypoints(&self) -> &[[f32; 2]] {
        &self.keypoints
    }
}

/// A detector that locates all instances of the tracked object class in a full frame.
///
/// This is the expensive model of the pipeline; the [`RegionTracker`] decides per frame whether
/// it runs at all or whether the previous frame's regions are reused instead.
///
/// Errors returned here indicate a configuration or model-loading defect and are propagated to
/// the caller of [`Pipeline::process_frame`] unchanged.
///
/// [`RegionTracker`]: crate::tracker::RegionTracker
/// [`Pipeline::process_frame`]: crate::pipeline::Pipeline::process_frame
pub trait FrameDetector: Send {
    /// Runs detection on `frame`, returning all detections in image coordinates.
    fn detect(&mut self, frame: &Frame<'_>) -> Result<Vec<Detection>>;
}
