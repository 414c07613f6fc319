//! The per-frame tracking pipeline.
//!
//! [`Pipeline`] wires the collaborators together: per frame it asks the [`RegionTracker`] whether
//! the full-frame detector runs, derotates and crops every region of the working set, runs the
//! landmark (and optionally refinement) models on the crops, maps the results back into image
//! space, and derives each region's box for the next frame from its final landmarks.
//!
//! A pipeline instance owns all of its state; independent instances can track independent
//! streams. Frames must be processed one at a time per instance. There is no mid-frame
//! cancellation, and a frame that is never passed in simply leaves the tracked state untouched.

use anyhow::Result;
use itertools::Itertools;

use crate::detection::{Detection, FrameDetector};
use crate::image::Frame;
use crate::landmark::{LandmarkModel, Landmarks};
use crate::num::TotalF32;
use crate::rect::Rect;
use crate::refine::{self, RefineOutcome, RefinePlan, RefinementModel};
use crate::rotation::{rotation_between, transform_point, RotationState};
use crate::sampler::Sampler;
use crate::tracker::{RegionTracker, TrackedRegion};

/// Describes the primary landmark model's relationship to the tracked object.
#[derive(Debug, Clone)]
pub struct MeshSpec {
    /// Number of landmarks the primary model outputs. Landmark sets at least this long are
    /// considered "rich" (produced by the landmark model rather than the detector).
    pub landmark_count: usize,
    /// Symmetry-line reference pair, as indices into a detector's seed keypoints.
    pub seed_rotation_pair: [usize; 2],
    /// Symmetry-line reference pair, as indices into the rich landmark set.
    pub mesh_rotation_pair: [usize; 2],
}

impl MeshSpec {
    /// The 468-point face mesh: rotation from mouth-center → forehead for rich landmarks, and
    /// from the matching coarse keypoints of a BlazeFace-style detector otherwise.
    pub fn face() -> Self {
        Self {
            landmark_count: 468,
            seed_rotation_pair: [3, 2],
            mesh_rotation_pair: [13, 10],
        }
    }
}

/// Tuning knobs of a [`Pipeline`].
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Derotate regions before cropping. When disabled, every region uses the identity rotation.
    pub rotation_enabled: bool,
    /// When disabled, the full-frame detector runs every frame ("single image" mode).
    pub frame_skipping_enabled: bool,
    /// Number of frames the detector may be skipped once a full working set is tracked.
    pub detector_skip_interval: u32,
    /// Maximum number of simultaneously tracked regions.
    pub max_regions: usize,
    pub detector_enabled: bool,
    pub landmarks_enabled: bool,
    pub refinement_enabled: bool,
    /// Detections below this confidence are discarded before the working-set decision.
    pub min_detection_confidence: f32,
    /// Landmark predictions below this confidence drop their region from tracking.
    pub min_landmark_confidence: f32,
    /// Margin factor applied when deriving a region box from a detection or from landmarks.
    pub region_enlarge_factor: f32,
    /// Margin factor applied to the refinement stage's sub-region crops.
    pub refinement_enlarge_factor: f32,
    /// Also return each region's model-space landmarks in the results.
    pub return_raw_coordinates: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            rotation_enabled: true,
            frame_skipping_enabled: true,
            detector_skip_interval: 5,
            max_regions: 1,
            detector_enabled: true,
            landmarks_enabled: true,
            refinement_enabled: true,
            min_detection_confidence: 0.5,
            min_landmark_confidence: 0.5,
            region_enlarge_factor: 1.5,
            refinement_enlarge_factor: 2.3,
            return_raw_coordinates: false,
        }
    }
}

/// One tracked region's output for one frame.
#[derive(Debug, Clone)]
pub struct RegionResult {
    rect: Rect,
    confidence: f32,
    landmarks: Landmarks,
    raw_landmarks: Option<Landmarks>,
}

impl RegionResult {
    /// The region's box in image space: the enlarged, squarified bounding box of the final
    /// landmarks (also the box that seeds this region on the next frame).
    #[inline]
    pub fn rect(&self) -> &Rect {
        &self.rect
    }

    #[inline]
    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    /// The final landmarks, in image space.
    #[inline]
    pub fn landmarks(&self) -> &Landmarks {
        &self.landmarks
    }

    /// The landmarks in model space, if [`PipelineConfig::return_raw_coordinates`] is set.
    #[inline]
    pub fn raw_landmarks(&self) -> Option<&Landmarks> {
        self.raw_landmarks.as_ref()
    }
}

enum Outcome {
    Tracked {
        result: RegionResult,
        next: TrackedRegion,
    },
    /// Confidence fell below the threshold; the tracked entry is cleared.
    Lost,
    /// A crop source went away; no result this frame, but the tracked entry is kept.
    Skipped,
}

/// The temporal multi-stage landmark tracking pipeline.
pub struct Pipeline {
    config: PipelineConfig,
    mesh: MeshSpec,
    detector: Box<dyn FrameDetector>,
    landmarker: Box<dyn LandmarkModel>,
    refiner: Option<(Box<dyn RefinementModel>, RefinePlan)>,
    sampler: Box<dyn Sampler>,
    tracker: RegionTracker,
}

impl Pipeline {
    /// Creates a pipeline without a refinement stage.
    pub fn new<D, L, S>(
        detector: D,
        landmarker: L,
        sampler: S,
        mesh: MeshSpec,
        config: PipelineConfig,
    ) -> Self
    where
        D: FrameDetector + 'static,
        L: LandmarkModel + 'static,
        S: Sampler + 'static,
    {
        let tracker = RegionTracker::new(config.detector_skip_interval, config.max_regions);
        Self {
            config,
            mesh,
            detector: Box::new(detector),
            landmarker: Box::new(landmarker),
            refiner: None,
            sampler: Box::new(sampler),
            tracker,
        }
    }

    /// Attaches a refinement model and its index tables.
    pub fn with_refiner<R: RefinementModel + 'static>(mut self, model: R, plan: RefinePlan) -> Self {
        self.refiner = Some((Box::new(model), plan));
        self
    }

    #[inline]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The regions currently carried to the next frame.
    #[inline]
    pub fn tracked_regions(&self) -> &[TrackedRegion] {
        self.tracker.regions()
    }

    /// Drops all tracked state; the detector will run on the next frame.
    pub fn reset(&mut self) {
        self.tracker.clear();
    }

    /// Processes one frame and returns the per-region results.
    ///
    /// Calls must be serialized per pipeline instance: the tracked state is read and written
    /// across the whole call.
    ///
    /// An empty result list means no region survived this frame (nothing detected, or all
    /// regions dropped); tracking recovers on a later frame's detector run. Errors come from the
    /// detector or model collaborators only and indicate a configuration or model-loading
    /// defect, not a per-frame condition.
    pub fn process_frame(&mut self, frame: &Frame<'_>) -> Result<Vec<RegionResult>> {
        let run_detector = self.config.detector_enabled
            && self.tracker.should_run_detector(
                self.config.landmarks_enabled,
                self.config.frame_skipping_enabled,
            );

        let fresh = if run_detector {
            let detections = self.detector.detect(frame)?;
            log::trace!("full-frame detector returned {} regions", detections.len());
            let confident: Vec<Detection> = detections
                .into_iter()
                .filter(|det| det.confidence() >= self.config.min_detection_confidence)
                .collect();

            if !self.config.landmarks_enabled {
                // Detector-only mode: emit the detections themselves, track nothing.
                return Ok(confident.iter().map(detection_result).collect());
            }

            Some(
                confident
                    .into_iter()
                    .map(|det| self.seed_region(det))
                    .collect(),
            )
        } else {
            None
        };

        if self.tracker.step(fresh) {
            log::trace!("working set replaced with fresh detections");
        }

        let working = self.tracker.regions().to_vec();
        let mut results = Vec::with_capacity(working.len());
        let mut survivors = Vec::with_capacity(working.len());
        for region in &working {
            match self.process_region(frame, region)? {
                Outcome::Tracked { result, next } => {
                    results.push(result);
                    survivors.push(next);
                }
                Outcome::Lost => {}
                Outcome::Skipped => survivors.push(region.clone()),
            }
        }
        self.tracker.install(survivors);

        Ok(results)
    }

    /// Turns a fresh detection into a tracked region seeded with the detector's coarse
    /// keypoints.
    fn seed_region(&self, det: Detection) -> TrackedRegion {
        let rect = det
            .bounding_rect()
            .scale(self.config.region_enlarge_factor)
            .to_square();
        let landmarks = Landmarks::from_positions(
            det.keypoints().iter().map(|&[x, y]| [x, y, 0.0]).collect(),
        );
        TrackedRegion::new(rect, landmarks, det.confidence())
    }

    /// Runs the crop → landmark → refinement → back-transform sequence for one region.
    fn process_region(&mut self, frame: &Frame<'_>, region: &TrackedRegion) -> Result<Outcome> {
        let rotation = self.region_rotation(region);

        let input_size = self.landmarker.input_size();
        let Some(sample) = self
            .sampler
            .extract(frame, &rotation, region.rect(), input_size)
        else {
            log::warn!(
                "crop source for region at {:?} no longer valid, skipping region",
                region.rect(),
            );
            return Ok(Outcome::Skipped);
        };

        let prediction = self.landmarker.predict(&sample)?;
        if prediction.confidence() < self.config.min_landmark_confidence {
            log::debug!(
                "confidence {} below threshold {}, dropping region",
                prediction.confidence(),
                self.config.min_landmark_confidence,
            );
            return Ok(Outcome::Lost);
        }

        let confidence = prediction.confidence();
        let mut raw = prediction.into_landmarks();

        if self.config.refinement_enabled && raw.len() >= self.mesh.landmark_count {
            if let Some((model, plan)) = &mut self.refiner {
                let outcome = refine::refine_region(
                    plan,
                    model.as_mut(),
                    self.sampler.as_mut(),
                    &sample,
                    &mut raw,
                    self.config.refinement_enlarge_factor,
                )?;
                if outcome == RefineOutcome::SourceLost {
                    log::warn!("refinement crop source no longer valid, skipping region");
                    return Ok(Outcome::Skipped);
                }
            }
        }

        let landmarks = back_transform(&raw, region.rect(), &rotation, input_size);
        let rect = derive_region_rect(&landmarks, self.config.region_enlarge_factor);
        let next = TrackedRegion::new(rect, landmarks.clone(), confidence);
        let result = RegionResult {
            rect,
            confidence,
            landmarks,
            raw_landmarks: self.config.return_raw_coordinates.then_some(raw),
        };
        Ok(Outcome::Tracked { result, next })
    }

    /// Computes this frame's rotation state for a region from its current landmarks.
    ///
    /// The symmetry-line index pair depends on whether the landmarks came from the coarse
    /// detector or from a previous landmark pass.
    fn region_rotation(&self, region: &TrackedRegion) -> RotationState {
        if !self.config.rotation_enabled {
            return RotationState::identity();
        }

        let landmarks = region.landmarks();
        let [a, b] = if landmarks.len() >= self.mesh.landmark_count {
            self.mesh.mesh_rotation_pair
        } else {
            self.mesh.seed_rotation_pair
        };
        if a.max(b) >= landmarks.len() {
            log::trace!("region has no usable rotation references, using identity");
            return RotationState::identity();
        }

        let pa = landmarks.position(a);
        let pb = landmarks.position(b);
        let angle = rotation_between([pa[0], pa[1]], [pb[0], pb[1]]);
        RotationState::around(angle, region.rect().center())
    }
}

/// Maps model-space landmarks back into image space.
///
/// This is the exact algebraic inverse of the derotate + crop transform described by `rotation`
/// and `rect` that produced the model's input sample: coordinates are scaled from model-input
/// pixels into image pixels, recentered around the model-space midpoint, rotated by the region's
/// angle around the origin, and finally translated by the box center projected through the
/// inverse of the crop's rotation matrix.
pub fn back_transform(
    raw: &Landmarks,
    rect: &Rect,
    rotation: &RotationState,
    model_size: u32,
) -> Landmarks {
    let size = model_size as f32;
    let scale = [rect.width() / size, rect.height() / size];
    let half = size / 2.0;
    let center = transform_point(rotation.inverse(), rect.center());
    let (sin, cos) = rotation.angle().sin_cos();

    let mut out = raw.clone();
    out.map_positions(|[x, y, z]| {
        let local = [scale[0] * (x - half), scale[1] * (y - half)];
        let rotated = if rotation.is_identity() {
            local
        } else {
            [
                cos * local[0] - sin * local[1],
                sin * local[0] + cos * local[1],
            ]
        };
        [rotated[0] + center[0], rotated[1] + center[1], z * scale[0]]
    });
    out
}

/// Derives the region box fed back into the tracker from a region's final landmarks.
fn derive_region_rect(landmarks: &Landmarks, enlarge_factor: f32) -> Rect {
    let (min_x, max_x) = landmarks
        .positions()
        .iter()
        .map(|&[x, ..]| TotalF32(x))
        .minmax()
        .into_option()
        .unwrap();
    let (min_y, max_y) = landmarks
        .positions()
        .iter()
        .map(|&[_, y, ..]| TotalF32(y))
        .minmax()
        .into_option()
        .unwrap();

    Rect::from_ranges(min_x.0..=max_x.0, min_y.0..=max_y.0)
        .scale(enlarge_factor)
        .to_square()
}

fn detection_result(det: &Detection) -> RegionResult {
    RegionResult {
        rect: det.bounding_rect(),
        confidence: det.confidence(),
        landmarks: Landmarks::from_positions(
            det.keypoints().iter().map(|&[x, y]| [x, y, 0.0]).collect(),
        ),
        raw_landmarks: None,
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::PI;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use approx::assert_abs_diff_eq;

    use crate::image::{Resolution, Sample};

    use super::*;

    const MODEL_SIZE: u32 = 192;

    fn stub_sample(size: u32) -> Sample {
        let res = Resolution::square(size);
        Sample::new(vec![0.0; res.num_pixels() * 3].into(), res, 3)
    }

    fn frame_buf() -> Vec<u8> {
        vec![0; 640 * 480 * 3]
    }

    fn frame(buf: &[u8]) -> Frame<'_> {
        Frame::new(buf, Resolution::new(640, 480), 3)
    }

    /// Returns the same detections every call and counts invocations.
    struct FixedDetector {
        detections: Vec<Detection>,
        calls: Arc<AtomicUsize>,
    }

    impl FixedDetector {
        fn new(detections: Vec<Detection>) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    detections,
                    calls: calls.clone(),
                },
                calls,
            )
        }
    }

    impl FrameDetector for FixedDetector {
        fn detect(&mut self, _frame: &Frame<'_>) -> Result<Vec<Detection>> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            Ok(self.detections.clone())
        }
    }

    /// Produces a regular grid of landmarks over the model input square.
    struct GridLandmarker {
        confidence: f32,
        count: usize,
    }

    impl LandmarkModel for GridLandmarker {
        fn input_size(&self) -> u32 {
            MODEL_SIZE
        }

        fn predict(&mut self, _sample: &Sample) -> Result<crate::landmark::Prediction> {
            let side = (self.count as f32).sqrt().ceil() as usize;
            let step = MODEL_SIZE as f32 / side as f32;
            let positions = (0..self.count)
                .map(|i| {
                    let (row, col) = (i / side, i % side);
                    [col as f32 * step, row as f32 * step, 0.0]
                })
                .collect();
            Ok(crate::landmark::Prediction::new(
                self.confidence,
                Landmarks::from_positions(positions),
            ))
        }
    }

    struct StubSampler {
        fail: bool,
    }

    impl Sampler for StubSampler {
        fn extract(
            &mut self,
            _frame: &Frame<'_>,
            _rotation: &RotationState,
            _rect: &Rect,
            size: u32,
        ) -> Option<Sample> {
            (!self.fail).then(|| stub_sample(size))
        }

        fn extract_sub(
            &mut self,
            _sample: &Sample,
            _rect: &Rect,
            _flip_horizontal: bool,
            size: u32,
        ) -> Option<Sample> {
            (!self.fail).then(|| stub_sample(size))
        }
    }

    fn face_detection() -> Detection {
        Detection::with_keypoints(
            0.9,
            Rect::from_ranges(10.0..=110.0, 10.0..=110.0),
            // Seed pair [3, 2] is horizontal, so the seeded rotation angle is 0.
            vec![[40.0, 30.0], [80.0, 30.0], [70.0, 40.0], [50.0, 40.0]],
        )
    }

    fn pipeline(landmark_confidence: f32) -> Pipeline {
        let (detector, _) = FixedDetector::new(vec![face_detection()]);
        Pipeline::new(
            detector,
            GridLandmarker {
                confidence: landmark_confidence,
                count: 468,
            },
            StubSampler { fail: false },
            MeshSpec::face(),
            PipelineConfig::default(),
        )
    }

    #[test]
    fn confidence_gating_drops_region() {
        let buf = frame_buf();
        let mut pipeline = pipeline(0.2);
        let results = pipeline.process_frame(&frame(&buf)).unwrap();
        assert!(results.is_empty());
        assert!(pipeline.tracked_regions().is_empty());
    }

    #[test]
    fn detection_gate_filters_logit_mapped_confidences() {
        use crate::num::sigmoid;

        let buf = frame_buf();
        // A detector fake reporting sigmoid-mapped logits: one clearly positive, one clearly
        // negative. Only the first passes the 0.5 detection threshold.
        let (detector, _) = FixedDetector::new(vec![
            Detection::with_keypoints(
                sigmoid(2.0),
                Rect::from_ranges(10.0..=110.0, 10.0..=110.0),
                vec![[40.0, 30.0], [80.0, 30.0], [70.0, 40.0], [50.0, 40.0]],
            ),
            Detection::with_keypoints(
                sigmoid(-2.0),
                Rect::from_ranges(200.0..=300.0, 10.0..=110.0),
                vec![[230.0, 30.0], [270.0, 30.0], [260.0, 40.0], [240.0, 40.0]],
            ),
        ]);
        let config = PipelineConfig {
            max_regions: 2,
            ..PipelineConfig::default()
        };
        let mut pipeline = Pipeline::new(
            detector,
            GridLandmarker {
                confidence: 0.9,
                count: 468,
            },
            StubSampler { fail: false },
            MeshSpec::face(),
            config,
        );

        let results = pipeline.process_frame(&frame(&buf)).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(pipeline.tracked_regions().len(), 1);
    }

    #[test]
    fn tracked_region_survives_frames() {
        let buf = frame_buf();
        let (detector, calls) = FixedDetector::new(vec![face_detection()]);
        let mut pipeline = Pipeline::new(
            detector,
            GridLandmarker {
                confidence: 0.9,
                count: 468,
            },
            StubSampler { fail: false },
            MeshSpec::face(),
            PipelineConfig::default(),
        );

        for _ in 0..3 {
            let results = pipeline.process_frame(&frame(&buf)).unwrap();
            assert_eq!(results.len(), 1);
            assert_eq!(pipeline.tracked_regions().len(), 1);
        }
        // With a full working set, only the first frame consulted the detector.
        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn lost_region_forces_redetect() {
        let buf = frame_buf();
        let (detector, calls) = FixedDetector::new(vec![face_detection()]);
        let mut pipeline = Pipeline::new(
            detector,
            GridLandmarker {
                confidence: 0.2,
                count: 468,
            },
            StubSampler { fail: false },
            MeshSpec::face(),
            PipelineConfig::default(),
        );

        pipeline.process_frame(&frame(&buf)).unwrap();
        pipeline.process_frame(&frame(&buf)).unwrap();
        // Every frame loses its region again, so every frame re-detects.
        assert_eq!(calls.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn lost_crop_source_keeps_tracked_entry() {
        let buf = frame_buf();
        let mut pipeline = pipeline(0.9);
        pipeline.process_frame(&frame(&buf)).unwrap();
        let before = pipeline.tracked_regions()[0].rect().clone();

        // Swap in a sampler whose source is gone.
        pipeline.sampler = Box::new(StubSampler { fail: true });
        let results = pipeline.process_frame(&frame(&buf)).unwrap();
        assert!(results.is_empty());
        assert_eq!(pipeline.tracked_regions().len(), 1);
        assert_eq!(*pipeline.tracked_regions()[0].rect(), before);
    }

    #[test]
    fn detector_only_mode_emits_detections() {
        let buf = frame_buf();
        let (detector, calls) = FixedDetector::new(vec![face_detection()]);
        let config = PipelineConfig {
            landmarks_enabled: false,
            ..PipelineConfig::default()
        };
        let mut pipeline = Pipeline::new(
            detector,
            GridLandmarker {
                confidence: 0.9,
                count: 468,
            },
            StubSampler { fail: false },
            MeshSpec::face(),
            config,
        );

        for _ in 0..2 {
            let results = pipeline.process_frame(&frame(&buf)).unwrap();
            assert_eq!(results.len(), 1);
            assert_eq!(*results[0].rect(), face_detection().bounding_rect());
            assert!(pipeline.tracked_regions().is_empty());
        }
        // No frame skipping without a landmark stage.
        assert_eq!(calls.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn raw_coordinates_are_returned_when_configured() {
        let buf = frame_buf();
        let (detector, _) = FixedDetector::new(vec![face_detection()]);
        let config = PipelineConfig {
            return_raw_coordinates: true,
            ..PipelineConfig::default()
        };
        let mut pipeline = Pipeline::new(
            detector,
            GridLandmarker {
                confidence: 0.9,
                count: 468,
            },
            StubSampler { fail: false },
            MeshSpec::face(),
            config,
        );

        let results = pipeline.process_frame(&frame(&buf)).unwrap();
        let raw = results[0].raw_landmarks().unwrap();
        assert_eq!(raw.len(), 468);
        // Raw coordinates stay in model space.
        assert!(raw.iter().all(|lm| lm.x() <= MODEL_SIZE as f32));
    }

    #[test]
    fn back_transform_zero_rotation_is_scale_translate() {
        let rect = Rect::from_ranges(10.0..=110.0, 30.0..=80.0);
        let raw = Landmarks::from_positions(vec![[0.0, 0.0, 0.0], [96.0, 96.0, 10.0], [192.0, 0.0, -4.0]]);
        let out = back_transform(&raw, &rect, &RotationState::identity(), MODEL_SIZE);

        let scale = [rect.width() / 192.0, rect.height() / 192.0];
        for (lm, &[x, y, z]) in out.iter().zip(raw.positions()) {
            assert_abs_diff_eq!(lm.x(), rect.x() + x * scale[0], epsilon = 1e-4);
            assert_abs_diff_eq!(lm.y(), rect.y() + y * scale[1], epsilon = 1e-4);
            assert_abs_diff_eq!(lm.z(), z * scale[0], epsilon = 1e-4);
        }
    }

    #[test]
    fn back_transform_inverts_derotated_crop() {
        // For any rotation state, mapping a model-space point through `back_transform` and then
        // through the forward derotate + crop transform must return the original point.
        for _ in 0..100 {
            let angle = (fastrand::f32() * 2.0 - 1.0) * PI;
            let rect = Rect::from_center(
                fastrand::f32() * 500.0 - 250.0,
                fastrand::f32() * 500.0 - 250.0,
                fastrand::f32() * 300.0 + 1.0,
                fastrand::f32() * 300.0 + 1.0,
            );
            let rotation = RotationState::around(angle, rect.center());

            let raw = Landmarks::from_positions(vec![[
                fastrand::f32() * MODEL_SIZE as f32,
                fastrand::f32() * MODEL_SIZE as f32,
                0.0,
            ]]);
            let out = back_transform(&raw, &rect, &rotation, MODEL_SIZE);

            // Forward: derotate the image point, then map the crop rect onto the model square.
            let p = transform_point(rotation.matrix(), [out.get(0).x(), out.get(0).y()]);
            let sx = (p[0] - rect.x()) * MODEL_SIZE as f32 / rect.width();
            let sy = (p[1] - rect.y()) * MODEL_SIZE as f32 / rect.height();
            assert_abs_diff_eq!(sx, raw.position(0)[0], epsilon = 1e-2);
            assert_abs_diff_eq!(sy, raw.position(0)[1], epsilon = 1e-2);
        }
    }

    #[test]
    fn derived_region_rect_is_square_around_landmarks() {
        let landmarks = Landmarks::from_positions(vec![
            [10.0, 20.0, 0.0],
            [110.0, 60.0, 0.0],
            [50.0, 40.0, 5.0],
        ]);
        let rect = derive_region_rect(&landmarks, 1.5);
        assert_eq!(rect.width(), rect.height());
        assert_eq!(rect.center(), [60.0, 40.0]);
        assert_eq!(rect.width(), 150.0);
    }
}
