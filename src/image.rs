//! Frame and sample buffer types.
//!
//! The pipeline never inspects pixel data itself; these types exist so that frames and model
//! input samples can be passed between the caller, the [`Sampler`] and the model collaborators
//! with their dimensions attached.
//!
//! [`Sampler`]: crate::sampler::Sampler

use std::fmt;

use crate::rect::Rect;

/// Width and height of an image or model input, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution {
    width: u32,
    height: u32,
}

impl Resolution {
    #[inline]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A square resolution, as used by the fixed-size model inputs.
    #[inline]
    pub fn square(side: u32) -> Self {
        Self::new(side, side)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn num_pixels(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A borrowed view of one video frame: a rectangular pixel buffer with interleaved channels.
///
/// Row-major, top-left origin, `channels` bytes per pixel.
#[derive(Clone, Copy)]
pub struct Frame<'a> {
    data: &'a [u8],
    resolution: Resolution,
    channels: u8,
}

impl<'a> Frame<'a> {
    /// Creates a frame view over `data`.
    ///
    /// # Panics
    ///
    /// Panics if `data` is not exactly `width * height * channels` bytes long.
    pub fn new(data: &'a [u8], resolution: Resolution, channels: u8) -> Self {
        assert_eq!(
            data.len(),
            resolution.num_pixels() * usize::from(channels),
            "frame buffer size does not match {resolution} with {channels} channels",
        );
        Self {
            data,
            resolution,
            channels,
        }
    }

    #[inline]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    #[inline]
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    #[inline]
    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Returns the rectangle covering the whole frame.
    pub fn rect(&self) -> Rect {
        Rect::from_top_left(
            0.0,
            0.0,
            self.resolution.width() as f32,
            self.resolution.height() as f32,
        )
    }
}

impl fmt::Debug for Frame<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame({}, {} channels)", self.resolution, self.channels)
    }
}

/// A fixed-size square sample produced by the [`Sampler`], ready to be fed to a model.
///
/// Pixel values are `f32` in whatever range the consuming model was trained against; the pipeline
/// treats the contents as opaque.
///
/// [`Sampler`]: crate::sampler::Sampler
#[derive(Clone)]
pub struct Sample {
    data: Box<[f32]>,
    resolution: Resolution,
    channels: u8,
}

impl Sample {
    /// Creates a sample from raw interleaved data.
    ///
    /// # Panics
    ///
    /// Panics if `data` is not exactly `width * height * channels` values long.
    pub fn new(data: Box<[f32]>, resolution: Resolution, channels: u8) -> Self {
        assert_eq!(
            data.len(),
            resolution.num_pixels() * usize::from(channels),
            "sample buffer size does not match {resolution} with {channels} channels",
        );
        Self {
            data,
            resolution,
            channels,
        }
    }

    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    #[inline]
    pub fn channels(&self) -> u8 {
        self.channels
    }
}

impl fmt::Debug for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sample({}, {} channels)", self.resolution, self.channels)
    }
}
