//! End-to-end pipeline scenarios with synthetic collaborators.

use anyhow::Result;
use approx::assert_abs_diff_eq;

use meshtrack::detection::{Detection, FrameDetector};
use meshtrack::image::{Frame, Resolution, Sample};
use meshtrack::landmark::{LandmarkModel, Landmarks, Prediction};
use meshtrack::pipeline::{MeshSpec, Pipeline, PipelineConfig};
use meshtrack::rect::Rect;
use meshtrack::refine::{RefinePlan, RefinementModel};
use meshtrack::rotation::RotationState;
use meshtrack::sampler::Sampler;

const MODEL_SIZE: u32 = 192;
const MESH_LEN: usize = 468;

struct FixedDetector(Vec<Detection>);

impl FrameDetector for FixedDetector {
    fn detect(&mut self, _frame: &Frame<'_>) -> Result<Vec<Detection>> {
        Ok(self.0.clone())
    }
}

struct GridLandmarker {
    confidence: f32,
}

impl LandmarkModel for GridLandmarker {
    fn input_size(&self) -> u32 {
        MODEL_SIZE
    }

    fn predict(&mut self, _sample: &Sample) -> Result<Prediction> {
        let side = (MESH_LEN as f32).sqrt().ceil() as usize;
        let step = MODEL_SIZE as f32 / side as f32;
        let positions = (0..MESH_LEN)
            .map(|i| [(i % side) as f32 * step, (i / side) as f32 * step, 0.0])
            .collect();
        Ok(Prediction::new(
            self.confidence,
            Landmarks::from_positions(positions),
        ))
    }
}

struct ConstantRefiner;

impl RefinementModel for ConstantRefiner {
    fn input_size(&self) -> u32 {
        64
    }

    fn refine(&mut self, _sample: &Sample) -> Result<Vec<[f32; 3]>> {
        Ok(vec![[10.0, 20.0, 0.0]; 76])
    }
}

struct StubSampler;

impl Sampler for StubSampler {
    fn extract(
        &mut self,
        _frame: &Frame<'_>,
        _rotation: &RotationState,
        _rect: &Rect,
        size: u32,
    ) -> Option<Sample> {
        Some(stub_sample(size))
    }

    fn extract_sub(
        &mut self,
        _sample: &Sample,
        _rect: &Rect,
        _flip_horizontal: bool,
        size: u32,
    ) -> Option<Sample> {
        Some(stub_sample(size))
    }
}

fn stub_sample(size: u32) -> Sample {
    let res = Resolution::square(size);
    Sample::new(vec![0.0; res.num_pixels() * 3].into(), res, 3)
}

fn detection() -> Detection {
    Detection::with_keypoints(
        0.9,
        Rect::from_ranges(10.0..=110.0, 10.0..=110.0),
        // Seed symmetry pair [3, 2] lies on a horizontal line: the initial rotation is 0.
        vec![[40.0, 30.0], [80.0, 30.0], [70.0, 40.0], [50.0, 40.0]],
    )
}

#[test]
fn detect_track_emit() {
    let buf = vec![0u8; 640 * 480 * 3];
    let frame = Frame::new(&buf, Resolution::new(640, 480), 3);

    let config = PipelineConfig {
        refinement_enabled: false,
        ..PipelineConfig::default()
    };
    let mut pipeline = Pipeline::new(
        FixedDetector(vec![detection()]),
        GridLandmarker { confidence: 0.9 },
        StubSampler,
        MeshSpec::face(),
        config,
    );

    let results = pipeline.process_frame(&frame).unwrap();
    assert_eq!(results.len(), 1);
    let result = &results[0];

    assert_eq!(result.confidence(), 0.9);
    assert_eq!(result.landmarks().len(), MESH_LEN);

    // The emitted box is the enlarged, squarified bounding box of the final landmarks.
    let expected = Rect::bounding(result.landmarks().iter().map(|lm| [lm.x(), lm.y()]))
        .unwrap()
        .scale(1.5)
        .to_square();
    assert_abs_diff_eq!(result.rect().x(), expected.x(), epsilon = 1e-3);
    assert_abs_diff_eq!(result.rect().y(), expected.y(), epsilon = 1e-3);
    assert_abs_diff_eq!(result.rect().width(), expected.width(), epsilon = 1e-3);
    assert_eq!(result.rect().width(), result.rect().height());

    // The same box seeds the next frame.
    assert_eq!(pipeline.tracked_regions().len(), 1);
    assert_eq!(pipeline.tracked_regions()[0].rect(), result.rect());
    assert_eq!(pipeline.tracked_regions()[0].landmarks().len(), MESH_LEN);

    // A second frame reuses the tracked region and keeps emitting.
    let results = pipeline.process_frame(&frame).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].landmarks().len(), MESH_LEN);
}

#[test]
fn refinement_appends_clusters() {
    let buf = vec![0u8; 640 * 480 * 3];
    let frame = Frame::new(&buf, Resolution::new(640, 480), 3);

    let mut pipeline = Pipeline::new(
        FixedDetector(vec![detection()]),
        GridLandmarker { confidence: 0.9 },
        StubSampler,
        MeshSpec::face(),
        PipelineConfig::default(),
    )
    .with_refiner(ConstantRefiner, RefinePlan::iris());

    let results = pipeline.process_frame(&frame).unwrap();
    assert_eq!(results.len(), 1);
    // 468 mesh points plus one 5-point cluster per side.
    assert_eq!(results[0].landmarks().len(), MESH_LEN + 10);
}

#[test]
fn zero_detections_yield_empty_frames_until_recovery() {
    let buf = vec![0u8; 640 * 480 * 3];
    let frame = Frame::new(&buf, Resolution::new(640, 480), 3);

    let mut pipeline = Pipeline::new(
        FixedDetector(Vec::new()),
        GridLandmarker { confidence: 0.9 },
        StubSampler,
        MeshSpec::face(),
        PipelineConfig::default(),
    );

    for _ in 0..3 {
        assert!(pipeline.process_frame(&frame).unwrap().is_empty());
        assert!(pipeline.tracked_regions().is_empty());
    }
}
