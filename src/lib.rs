//! Temporal multi-stage landmark tracking for deformable shapes.
//!
//! This crate implements the stateful part of a face-mesh/iris style perception stack: it decides
//! per frame whether to re-run a full-frame detector or reuse previously tracked regions,
//! normalizes each region's rotation before cropping, invokes landmark and refinement models,
//! merges sub-region refinements, and maps model-space coordinates back into image space while
//! deriving the next frame's tracked region.
//!
//! The neural networks themselves, as well as image cropping and resampling, are *collaborators*:
//! the caller provides them through the [`detection::FrameDetector`], [`landmark::LandmarkModel`],
//! [`refine::RefinementModel`] and [`sampler::Sampler`] traits. The crate contains no inference
//! engine and no pixel code.
//!
//! # Coordinates
//!
//! Image space has X pointing right and Y pointing *down*, in pixels of the frame passed to
//! [`pipeline::Pipeline::process_frame`]. Model space is the fixed square input of the landmark
//! model (`0..input_size` on both axes). Landmark Z is a relative depth unit shared with the
//! landmark model, not a metric distance.
//!
//! Angles are in radians and describe clockwise rotation in the y-down image coordinate system.

use log::LevelFilter;

pub mod detection;
pub mod image;
pub mod iter;
pub mod landmark;
pub mod num;
pub mod pipeline;
pub mod rect;
pub mod refine;
pub mod rotation;
pub mod sampler;
pub mod tracker;

/// macro-use only, not part of public API.
#[doc(hidden)]
pub fn init_logger(calling_crate: &'static str) {
    let log_level = LevelFilter::Debug;
    env_logger::Builder::new()
        .filter(Some(calling_crate), log_level)
        .filter(Some(env!("CARGO_PKG_NAME")), log_level)
        .parse_default_env()
        .try_init()
        .ok();
}

/// Initializes logging to *stderr*.
///
/// The calling crate and this library will log at *debug* level; everything else stays at the
/// `env_logger` default unless overridden via `RUST_LOG`.
///
/// If a global logger is already registered, this macro will do nothing.
#[macro_export]
macro_rules! init_logger {
    () => {
        $crate::init_logger(env!("CARGO_CRATE_NAME"))
    };
}
