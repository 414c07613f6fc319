//! The sub-region refinement stage.
//!
//! A second, higher-resolution model is run on small crops around two designated sub-regions of a
//! tracked object (for the face configuration: the two eyes). Its output selectively overwrites
//! the matching contour groups of the primary landmark set, depending on which way the object is
//! facing, and contributes two extra point clusters (the irises) that are appended to the set.
//!
//! The depth heuristics in here were tuned empirically upstream and are intentionally asymmetric;
//! they must not be "simplified".

use anyhow::{ensure, Result};

use crate::image::Sample;
use crate::iter::zip_exact;
use crate::landmark::Landmarks;
use crate::rect::Rect;
use crate::sampler::Sampler;

/// Below this absolute depth difference between the two sides' reference landmarks, the object
/// counts as facing forward and both sides are fully refined.
pub const FULL_REPLACE_DEPTH_RANGE: f32 = 30.0;

/// For larger depth differences, values below this cutoff mean the object faces away from its
/// right side, so only the left side's primary contours are refined (and vice versa).
pub const PARTIAL_REPLACE_CUTOFF: f32 = 1.0;

/// Cluster point that takes the upper reference landmark's depth verbatim.
const CLUSTER_UPPER_POINT: usize = 2;
/// Cluster point that takes the lower reference landmark's depth verbatim.
const CLUSTER_LOWER_POINT: usize = 4;

/// The refinement model of the pipeline.
///
/// Invoked once per sub-region per tracked region per frame, on a small fixed-size crop derived
/// from the primary model's input sample.
///
/// Errors returned here indicate a configuration or model-loading defect and are propagated to
/// the caller of [`Pipeline::process_frame`] unchanged.
///
/// [`Pipeline::process_frame`]: crate::pipeline::Pipeline::process_frame
pub trait RefinementModel: Send {
    /// Side length of the square input sample this model expects, in pixels.
    fn input_size(&self) -> u32;

    /// Runs the model on `sample`, returning its fixed-length coordinate list in the sample's
    /// pixel space.
    fn refine(&mut self, sample: &Sample) -> Result<Vec<[f32; 3]>>;
}

/// One contour of the primary landmark set together with its counterpart in the refinement
/// model's output.
#[derive(Debug, Clone, Copy)]
pub struct ContourGroup {
    /// Indices into the primary landmark set, ordered along the contour.
    pub mesh: &'static [usize],
    /// The same contour's indices into the refinement model output.
    pub refined: &'static [usize],
    /// Primary groups are the only ones replaced when the object is facing sideways.
    pub primary: bool,
}

/// The refinement layout of one sub-region (one eye).
#[derive(Debug, Clone, Copy)]
pub struct SidePlan {
    pub groups: &'static [ContourGroup],
    /// Primary-set indices of the two corner landmarks spanning the sub-region crop. The first
    /// one doubles as this side's depth reference.
    pub bounds: [usize; 2],
    /// Primary-set index whose depth seeds the appended cluster from above.
    pub upper_reference: usize,
    /// Primary-set index whose depth seeds the appended cluster from below.
    pub lower_reference: usize,
    /// Whether this side's crop is mirrored horizontally before inference.
    pub flip: bool,
}

/// Index tables tying a refinement model to the primary landmark set.
#[derive(Debug, Clone, Copy)]
pub struct RefinePlan {
    pub left: SidePlan,
    pub right: SidePlan,
    /// Number of leading contour coordinates in the refinement model output; the remainder is
    /// the appended cluster.
    pub contour_len: usize,
    /// Number of cluster coordinates per side.
    pub cluster_len: usize,
}

impl RefinePlan {
    /// Total number of coordinates the refinement model must output per invocation.
    pub fn output_len(&self) -> usize {
        self.contour_len + self.cluster_len
    }

    /// The MediaPipe Iris layout: eyelid/eyebrow contours of the 468-point face mesh mapped to
    /// the 76-point iris model output (71 contour points plus a 5-point iris cluster per side).
    pub fn iris() -> Self {
        // Refinement-output index runs, shared between the two sides.
        const UPPER_0: &[usize] = &[9, 10, 11, 12, 13, 14, 15];
        const LOWER_0: &[usize] = &[16, 17, 18, 19, 20, 21, 22, 23, 24];
        const UPPER_1: &[usize] = &[25, 26, 27, 28, 29, 30, 31];
        const LOWER_1: &[usize] = &[32, 33, 34, 35, 36, 37, 38, 39, 40];
        const UPPER_2: &[usize] = &[41, 42, 43, 44, 45, 46, 47];
        const LOWER_2: &[usize] = &[48, 49, 50, 51, 52, 53, 54, 55, 56];
        const LOWER_3: &[usize] = &[57, 58, 59, 60, 61, 62, 63, 64, 65];

        const LEFT: &[ContourGroup] = &[
            ContourGroup {
                mesh: &[246, 161, 160, 159, 158, 157, 173],
                refined: UPPER_0,
                primary: true,
            },
            ContourGroup {
                mesh: &[33, 7, 163, 144, 145, 153, 154, 155, 133],
                refined: LOWER_0,
                primary: true,
            },
            ContourGroup {
                mesh: &[247, 30, 29, 27, 28, 56, 190],
                refined: UPPER_1,
                primary: false,
            },
            ContourGroup {
                mesh: &[130, 25, 110, 24, 23, 22, 26, 112, 243],
                refined: LOWER_1,
                primary: false,
            },
            ContourGroup {
                mesh: &[113, 225, 224, 223, 222, 221, 189],
                refined: UPPER_2,
                primary: false,
            },
            ContourGroup {
                mesh: &[226, 31, 228, 229, 230, 231, 232, 233, 244],
                refined: LOWER_2,
                primary: false,
            },
            ContourGroup {
                mesh: &[143, 111, 117, 118, 119, 120, 121, 128, 245],
                refined: LOWER_3,
                primary: false,
            },
        ];

        const RIGHT: &[ContourGroup] = &[
            ContourGroup {
                mesh: &[466, 388, 387, 386, 385, 384, 398],
                refined: UPPER_0,
                primary: true,
            },
            ContourGroup {
                mesh: &[263, 249, 390, 373, 374, 380, 381, 382, 362],
                refined: LOWER_0,
                primary: true,
            },
            ContourGroup {
                mesh: &[467, 260, 259, 257, 258, 286, 414],
                refined: UPPER_1,
                primary: false,
            },
            ContourGroup {
                mesh: &[359, 255, 339, 254, 253, 252, 256, 341, 463],
                refined: LOWER_1,
                primary: false,
            },
            ContourGroup {
                mesh: &[342, 445, 444, 443, 442, 441, 413],
                refined: UPPER_2,
                primary: false,
            },
            ContourGroup {
                mesh: &[446, 261, 448, 449, 450, 451, 452, 453, 464],
                refined: LOWER_2,
                primary: false,
            },
            ContourGroup {
                mesh: &[372, 340, 346, 347, 348, 349, 350, 357, 465],
                refined: LOWER_3,
                primary: false,
            },
        ];

        Self {
            left: SidePlan {
                groups: LEFT,
                bounds: [33, 133],
                upper_reference: 159,
                lower_reference: 145,
                flip: true,
            },
            right: SidePlan {
                groups: RIGHT,
                bounds: [263, 362],
                upper_reference: 386,
                lower_reference: 374,
                flip: false,
            },
            contour_len: 71,
            cluster_len: 5,
        }
    }
}

/// Result of running the refinement stage on one region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RefineOutcome {
    /// `raw` was updated in place and the per-side clusters were appended.
    Applied,
    /// A sub-crop's source was no longer valid; `raw` is unchanged and the region should be
    /// skipped for this frame.
    SourceLost,
}

/// Runs both sub-regions' refinement and merges the results into `raw` (model-space landmarks of
/// the primary model).
pub(crate) fn refine_region(
    plan: &RefinePlan,
    model: &mut dyn RefinementModel,
    sampler: &mut dyn Sampler,
    parent: &Sample,
    raw: &mut Landmarks,
    enlarge_factor: f32,
) -> Result<RefineOutcome> {
    // Run both crops before touching `raw`, so a lost source leaves it untouched.
    let Some(left) = refine_side(plan, &plan.left, model, sampler, parent, raw, enlarge_factor)?
    else {
        return Ok(RefineOutcome::SourceLost);
    };
    let Some(right) = refine_side(plan, &plan.right, model, sampler, parent, raw, enlarge_factor)?
    else {
        return Ok(RefineOutcome::SourceLost);
    };

    let depth_diff =
        raw.position(plan.left.bounds[0])[2] - raw.position(plan.right.bounds[0])[2];
    if depth_diff.abs() < FULL_REPLACE_DEPTH_RANGE {
        // Facing forward: both sides are fully refined.
        replace_contours(raw, &left, &plan.left, false);
        replace_contours(raw, &right, &plan.right, false);
    } else if depth_diff < PARTIAL_REPLACE_CUTOFF {
        // Facing right: only the left side's primary contours can be trusted.
        replace_contours(raw, &left, &plan.left, true);
    } else {
        // Facing left.
        replace_contours(raw, &right, &plan.right, true);
    }

    append_cluster(raw, &left[plan.contour_len..], &plan.left);
    append_cluster(raw, &right[plan.contour_len..], &plan.right);

    Ok(RefineOutcome::Applied)
}

/// Crops one side, runs the refinement model on it, and maps its output from local crop
/// coordinates back into the parent sample's space (un-mirroring if the side is flipped).
///
/// Returns `Ok(None)` if the sampler reports the crop source as gone.
fn refine_side(
    plan: &RefinePlan,
    side: &SidePlan,
    model: &mut dyn RefinementModel,
    sampler: &mut dyn Sampler,
    parent: &Sample,
    raw: &Landmarks,
    enlarge_factor: f32,
) -> Result<Option<Vec<[f32; 3]>>> {
    let [ax, ay, _] = raw.position(side.bounds[0]);
    let [bx, by, _] = raw.position(side.bounds[1]);
    let rect = Rect::bounding([[ax, ay], [bx, by]])
        .unwrap()
        .scale(enlarge_factor)
        .to_square();

    let size = model.input_size();
    let Some(sample) = sampler.extract_sub(parent, &rect, side.flip, size) else {
        return Ok(None);
    };
    let coords = model.refine(&sample)?;
    ensure!(
        coords.len() == plan.output_len(),
        "refinement model returned {} coordinates, expected {}",
        coords.len(),
        plan.output_len(),
    );

    let inv_size = 1.0 / size as f32;
    Ok(Some(
        coords
            .iter()
            .map(|&[x, y, z]| {
                let x = if side.flip {
                    1.0 - x * inv_size
                } else {
                    x * inv_size
                };
                [
                    x * rect.width() + rect.x(),
                    y * inv_size * rect.height() + rect.y(),
                    z,
                ]
            })
            .collect(),
    ))
}

/// Overwrites contour groups of `raw` with refined coordinates. The new depth of each replaced
/// point is the average of its old and refined depth.
fn replace_contours(
    raw: &mut Landmarks,
    side_coords: &[[f32; 3]],
    side: &SidePlan,
    primary_only: bool,
) {
    for group in side.groups {
        if primary_only && !group.primary {
            continue;
        }
        for (&mesh_idx, &refined_idx) in zip_exact(group.mesh, group.refined) {
            let [x, y, z] = side_coords[refined_idx];
            let old_z = raw.position(mesh_idx)[2];
            raw.set_position(mesh_idx, [x, y, (z + old_z) / 2.0]);
        }
    }
}

/// Appends one side's cluster to `raw`, rewriting the cluster's depth from the side's reference
/// landmarks: two designated points take the upper resp. lower reference depth verbatim, all
/// others the average of the two.
fn append_cluster(raw: &mut Landmarks, cluster: &[[f32; 3]], side: &SidePlan) {
    let upper_z = raw.position(side.upper_reference)[2];
    let lower_z = raw.position(side.lower_reference)[2];
    let average_z = (upper_z + lower_z) / 2.0;

    for (i, &[x, y, _]) in cluster.iter().enumerate() {
        let z = match i {
            CLUSTER_UPPER_POINT => upper_z,
            CLUSTER_LOWER_POINT => lower_z,
            _ => average_z,
        };
        raw.push([x, y, z]);
    }
}
