//! The per-frame redetect-vs-reuse state machine.
//!
//! The [`RegionTracker`] owns the set of tracked regions across frames. Each frame it decides
//! whether the expensive full-frame detector runs, and if it did, whether its output replaces the
//! working set or the previous frame's regions (already updated with that frame's final
//! landmarks) are reused untouched.

use crate::landmark::Landmarks;
use crate::rect::Rect;

/// A region carried from one frame to the next.
///
/// Holds the region's box, its most recently computed landmarks (image space), and the confidence
/// of the stage that produced them. Fresh detections seed a region with the detector's coarse
/// keypoints; every successfully processed frame replaces the landmarks with the region's own
/// output, which is what closes the tracking feedback loop.
#[derive(Debug, Clone)]
pub struct TrackedRegion {
    rect: Rect,
    landmarks: Landmarks,
    confidence: f32,
}

impl TrackedRegion {
    pub fn new(rect: Rect, landmarks: Landmarks, confidence: f32) -> Self {
        Self {
            rect,
            landmarks,
            confidence,
        }
    }

    #[inline]
    pub fn rect(&self) -> &Rect {
        &self.rect
    }

    #[inline]
    pub fn landmarks(&self) -> &Landmarks {
        &self.landmarks
    }

    #[inline]
    pub fn confidence(&self) -> f32 {
        self.confidence
    }
}

/// Owns the tracked regions and the detector scheduling counter.
///
/// One instance per [`Pipeline`]; multiple pipelines never share tracker state.
///
/// [`Pipeline`]: crate::pipeline::Pipeline
#[derive(Debug)]
pub struct RegionTracker {
    regions: Vec<TrackedRegion>,
    /// Frames since the detector last ran. 0 means "no usable tracked state": either nothing has
    /// run yet or the working set was cleared.
    skipped_frames: u32,
    skip_interval: u32,
    max_regions: usize,
}

impl RegionTracker {
    pub fn new(skip_interval: u32, max_regions: usize) -> Self {
        Self {
            regions: Vec::new(),
            skipped_frames: 0,
            skip_interval,
            max_regions,
        }
    }

    #[inline]
    pub fn regions(&self) -> &[TrackedRegion] {
        &self.regions
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    #[inline]
    pub fn skipped_frames(&self) -> u32 {
        self.skipped_frames
    }

    /// Drops all tracked state. The detector will run on the next frame.
    pub fn clear(&mut self) {
        self.regions.clear();
        self.skipped_frames = 0;
    }

    /// Decides whether the full-frame detector must run this frame.
    ///
    /// It runs when there is no usable tracked state, when the configured number of frames has
    /// been skipped since the last run, or when frame skipping doesn't apply at all (landmark
    /// stage disabled, or single-shot mode).
    pub fn should_run_detector(
        &self,
        landmarks_enabled: bool,
        frame_skipping_enabled: bool,
    ) -> bool {
        self.skipped_frames == 0
            || self.skipped_frames > self.skip_interval
            || !landmarks_enabled
            || !frame_skipping_enabled
    }

    /// Advances the tracker by one frame.
    ///
    /// `fresh` is the detector output for this frame, or [`None`] if the detector did not run.
    /// The working set is replaced wholesale when the fresh count diverges from the tracked count
    /// and the tracked set isn't already full; a fresh empty result always clears it. In all
    /// other cases the previous regions are reused untouched.
    ///
    /// Returns `true` if the working set was replaced with the fresh detections.
    pub fn step(&mut self, fresh: Option<Vec<TrackedRegion>>) -> bool {
        let Some(mut fresh) = fresh else {
            self.skipped_frames += 1;
            return false;
        };

        self.skipped_frames = 1;

        if fresh.is_empty() {
            if !self.regions.is_empty() {
                log::debug!("detector found no regions, clearing tracked set");
            }
            self.clear();
            return false;
        }

        if fresh.len() != self.regions.len() && self.regions.len() != self.max_regions {
            fresh.truncate(self.max_regions);
            log::debug!(
                "replacing working set: {} tracked -> {} fresh",
                self.regions.len(),
                fresh.len(),
            );
            self.regions = fresh;
            true
        } else {
            false
        }
    }

    /// Installs the post-processing working set for the next frame.
    ///
    /// `next` contains one entry per region that survived this frame's landmark stage. An empty
    /// set resets the skip counter so that the next frame re-detects.
    pub fn install(&mut self, next: Vec<TrackedRegion>) {
        self.regions = next;
        if self.regions.is_empty() {
            self.skipped_frames = 0;
        }
    }
}
