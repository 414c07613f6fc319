//! Landmark storage and the landmark model boundary.

use anyhow::Result;

use crate::image::Sample;

type Position = [f32; 3];

/// A collection of 3D landmark positions.
///
/// Depending on where in the pipeline a value of this type sits, positions are either in *model
/// space* (the landmark model's fixed square input, `0..input_size`) or in *image space* (after
/// the back-transform). The Z coordinate is a relative depth unit in both cases.
#[derive(Clone, PartialEq)]
pub struct Landmarks {
    positions: Vec<Position>,
}

impl Landmarks {
    /// Creates a new [`Landmarks`] collection containing `len` preallocated landmarks.
    ///
    /// All landmarks will start with all coordinates at `0.0`.
    pub fn new(len: usize) -> Self {
        Self {
            positions: vec![[0.0, 0.0, 0.0]; len],
        }
    }

    pub fn from_positions(positions: Vec<Position>) -> Self {
        Self { positions }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Landmark> + Clone + '_ {
        self.positions.iter().map(|&pos| Landmark::new(pos))
    }

    pub fn get(&self, index: usize) -> Landmark {
        Landmark::new(self.positions[index])
    }

    #[inline]
    pub fn position(&self, index: usize) -> Position {
        self.positions[index]
    }

    #[inline]
    pub fn set_position(&mut self, index: usize, position: Position) {
        self.positions[index] = position;
    }

    /// Appends a landmark at the end of the collection.
    ///
    /// The refinement stage uses this to attach its per-side point clusters to the primary set.
    pub fn push(&mut self, position: Position) {
        self.positions.push(position);
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn positions_mut(&mut self) -> &mut [Position] {
        &mut self.positions
    }

    pub fn map_positions(&mut self, mut f: impl FnMut(Position) -> Position) {
        for pos in &mut self.positions {
            *pos = f(*pos);
        }
    }
}

impl std::fmt::Debug for Landmarks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Landmarks({})", self.positions.len())
    }
}

/// A landmark in 3D space.
#[derive(Debug, PartialEq, PartialOrd, Clone, Copy)]
pub struct Landmark {
    pos: Position,
}

impl Landmark {
    pub fn new(position: Position) -> Self {
        Self { pos: position }
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.pos
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.pos[0]
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.pos[1]
    }

    #[inline]
    pub fn z(&self) -> f32 {
        self.pos[2]
    }
}

/// The output of one landmark model invocation.
#[derive(Debug, Clone)]
pub struct Prediction {
    confidence: f32,
    landmarks: Landmarks,
}

impl Prediction {
    pub fn new(confidence: f32, landmarks: Landmarks) -> Self {
        Self {
            confidence,
            landmarks,
        }
    }

    /// Confidence value indicating whether the tracked object is actually present in the crop.
    ///
    /// By convention, this is in range 0.0 to 1.0. It is compared against the pipeline's
    /// landmark confidence threshold to decide when tracking of a region is lost.
    #[inline]
    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    /// The predicted landmarks, in model-input pixel space.
    #[inline]
    pub fn landmarks(&self) -> &Landmarks {
        &self.landmarks
    }

    pub fn into_landmarks(self) -> Landmarks {
        self.landmarks
    }
}

/// The primary landmark model of the pipeline.
///
/// Invoked once per tracked region per frame on a derotated, fixed-size crop of that region.
/// Landmark positions are expected in the coordinate system of the model's input
/// (`0..input_size` on X and Y).
///
/// Errors returned here indicate a configuration or model-loading defect and are propagated to
/// the caller of [`Pipeline::process_frame`] unchanged.
///
/// [`Pipeline::process_frame`]: crate::pipeline::Pipeline::process_frame
pub trait LandmarkModel: Send {
    /// Side length of the square input sample this model expects, in pixels.
    fn input_size(&self) -> u32;

    /// Runs the model on `sample`.
    fn predict(&mut self, sample: &Sample) -> Result<Prediction>;
}
