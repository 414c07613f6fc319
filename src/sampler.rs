//! The crop/resize boundary.
//!
//! Cropping and bilinear resampling are an external primitive with an exact numeric contract:
//! normalized coordinate mapping and edge clamping must match whatever the landmark model was
//! trained against. The pipeline therefore only *describes* the crop (rectangle, derotation,
//! output size, mirroring) and leaves the pixel work to an implementation of [`Sampler`] provided
//! by the caller, typically backed by the same image library or accelerator as the models.

use crate::image::{Frame, Sample};
use crate::rect::Rect;
use crate::rotation::RotationState;

/// Produces fixed-size square model inputs from frames and from other samples.
pub trait Sampler: Send {
    /// Cuts `rect` out of `frame` and resamples it to a `size`×`size` square.
    ///
    /// The frame content must first be rotated by [`RotationState::matrix`] (a rotation about
    /// `rect`'s center); implementations should skip that step when
    /// [`RotationState::is_identity`] returns `true`. `rect` is in source-image pixel
    /// coordinates and may extend beyond the frame; out-of-bounds areas follow the
    /// implementation's edge-clamping contract.
    ///
    /// Returns [`None`] if the underlying frame resource has already been released or is
    /// otherwise invalid. This is a recoverable per-frame condition, not an error: the pipeline
    /// skips the region and retries naturally on a later frame.
    fn extract(
        &mut self,
        frame: &Frame<'_>,
        rotation: &RotationState,
        rect: &Rect,
        size: u32,
    ) -> Option<Sample>;

    /// Cuts `rect` (in the sample's own pixel coordinates) out of an existing sample and
    /// resamples it to a `size`×`size` square, mirroring it horizontally first if
    /// `flip_horizontal` is set.
    ///
    /// Used by the refinement stage to derive sub-region crops from the primary model input.
    /// Returns [`None`] under the same conditions as [`Sampler::extract`].
    fn extract_sub(
        &mut self,
        sample: &Sample,
        rect: &Rect,
        flip_horizontal: bool,
        size: u32,
    ) -> Option<Sample>;
}
