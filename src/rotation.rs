//! Region rotation normalization.
//!
//! Landmark models are trained on upright objects, so each tracked region is derotated before
//! cropping. The rotation angle is derived from two "symmetry line" reference landmarks of the
//! region, and the exact same matrices are later used by the back-transform, so the two must stay
//! algebraic inverses of each other or tracking will drift across frames.

use nalgebra::{Matrix3, Vector3};

/// Computes the clockwise rotation angle of the line from `a` to `b`, in radians.
///
/// The angle is `atan2(dy, dx)` in the y-down image coordinate system and lies in `(-π, π]`.
pub fn rotation_between(a: [f32; 2], b: [f32; 2]) -> f32 {
    (b[1] - a[1]).atan2(b[0] - a[0])
}

/// Builds a homogeneous 3×3 matrix rotating by `angle` radians around `center`.
///
/// Passing `[0.0, 0.0]` as the center yields the coordinate-space-only rotation used by the
/// back-transform.
pub fn rotation_matrix(angle: f32, center: [f32; 2]) -> Matrix3<f32> {
    let (sin, cos) = angle.sin_cos();
    let [cx, cy] = center;
    // T(center) * R(angle) * T(-center), written out.
    Matrix3::new(
        cos,
        -sin,
        cx - cos * cx + sin * cy,
        sin,
        cos,
        cy - sin * cx - cos * cy,
        0.0,
        0.0,
        1.0,
    )
}

/// Inverts a rigid transform produced by [`rotation_matrix`].
///
/// Uses the closed form for rotation + translation matrices (transposed rotation block, re-rotated
/// negated translation) rather than a general matrix inverse, so the result is exact up to
/// floating-point rounding.
pub fn invert_rotation(m: &Matrix3<f32>) -> Matrix3<f32> {
    let (r00, r01) = (m[(0, 0)], m[(0, 1)]);
    let (r10, r11) = (m[(1, 0)], m[(1, 1)]);
    let (tx, ty) = (m[(0, 2)], m[(1, 2)]);
    Matrix3::new(
        r00,
        r10,
        -(r00 * tx + r10 * ty),
        r01,
        r11,
        -(r01 * tx + r11 * ty),
        0.0,
        0.0,
        1.0,
    )
}

/// Applies a homogeneous transform to a 2D point.
pub fn transform_point(m: &Matrix3<f32>, [x, y]: [f32; 2]) -> [f32; 2] {
    let out = m * Vector3::new(x, y, 1.0);
    [out.x, out.y]
}

/// The rotation applied to one region for one frame.
///
/// `matrix` is the derotation transform handed to the [`Sampler`]: it rotates image content by
/// `-angle` around the region's center so that the object appears upright in the crop. `inverse`
/// is its exact inverse and is consumed by the back-transform.
///
/// A [`RotationState`] is recomputed from the region's current landmarks every frame and never
/// persisted.
///
/// [`Sampler`]: crate::sampler::Sampler
#[derive(Debug, Clone, PartialEq)]
pub struct RotationState {
    angle: f32,
    matrix: Matrix3<f32>,
    inverse: Matrix3<f32>,
}

impl RotationState {
    /// Returns the identity state: no derotation is performed and the sampler may skip the
    /// (comparatively expensive) image rotation entirely.
    pub fn identity() -> Self {
        Self {
            angle: 0.0,
            matrix: Matrix3::identity(),
            inverse: Matrix3::identity(),
        }
    }

    /// Creates the rotation state for a region rotated by `angle` around `center`.
    ///
    /// An `angle` of exactly `0.0` yields the identity state.
    pub fn around(angle: f32, center: [f32; 2]) -> Self {
        if angle == 0.0 {
            return Self::identity();
        }
        let matrix = rotation_matrix(-angle, center);
        Self {
            angle,
            inverse: invert_rotation(&matrix),
            matrix,
        }
    }

    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Returns `true` if this state performs no rotation.
    #[inline]
    pub fn is_identity(&self) -> bool {
        self.angle == 0.0
    }

    /// The derotation transform to apply to the image before cropping.
    #[inline]
    pub fn matrix(&self) -> &Matrix3<f32> {
        &self.matrix
    }

    /// The inverse of [`RotationState::matrix`], mapping derotated coordinates back to image
    /// space.
    #[inline]
    pub fn inverse(&self) -> &Matrix3<f32> {
        &self.inverse
    }
}
