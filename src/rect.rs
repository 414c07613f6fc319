//! Axis-aligned rectangles.
//!
//! [`Rect`] is used for detector boxes, tracked regions, and the sub-region crops of the
//! refinement stage. All coordinates are `f32` image (or model-space) pixels.

use std::{fmt, ops::RangeInclusive};

/// An axis-aligned rectangle, stored as center point and size.
///
/// Rectangles are allowed to have zero height and/or width. Negative dimensions are not allowed.
#[derive(Clone, Copy, PartialEq)]
pub struct Rect {
    center: [f32; 2],
    size: [f32; 2],
}

impl Rect {
    /// Creates a rectangle extending outwards from a center point.
    #[inline]
    pub fn from_center(x_center: f32, y_center: f32, width: f32, height: f32) -> Self {
        Self {
            center: [x_center, y_center],
            size: [width, height],
        }
    }

    /// Creates a rectangle extending downwards and right from a point.
    #[inline]
    pub fn from_top_left(top_left_x: f32, top_left_y: f32, width: f32, height: f32) -> Self {
        Self::from_center(
            top_left_x + width * 0.5,
            top_left_y + height * 0.5,
            width,
            height,
        )
    }

    /// Constructs a [`Rect`] that spans a range of X and Y coordinates.
    pub fn from_ranges(x: RangeInclusive<f32>, y: RangeInclusive<f32>) -> Self {
        Self::span_inner(*x.start(), *y.start(), *x.end(), *y.end())
    }

    /// Computes the axis-aligned bounding rectangle that encompasses `points`.
    ///
    /// Returns [`None`] if `points` is an empty iterator.
    pub fn bounding<I: IntoIterator<Item = [f32; 2]>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();

        let [mut min_x, mut min_y] = iter.next()?;
        let [mut max_x, mut max_y] = [min_x, min_y];

        for [x, y] in iter {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }

        Some(Self::span_inner(min_x, min_y, max_x, max_y))
    }

    fn span_inner(x_min: f32, y_min: f32, x_max: f32, y_max: f32) -> Self {
        assert!(x_min <= x_max, "x_min={}, x_max={}", x_min, x_max);
        assert!(y_min <= y_max, "y_min={}, y_max={}", y_min, y_max);
        Self::from_top_left(x_min, y_min, x_max - x_min, y_max - y_min)
    }

    /// Scales the width and height of this [`Rect`] by the given amount.
    ///
    /// The center position of the [`Rect`] remains the same. This is the "enlarge" operation used
    /// when deriving a tracked region from a detection or from landmarks.
    #[must_use]
    pub fn scale(&self, scale: f32) -> Self {
        Self {
            center: self.center,
            size: [self.size[0] * scale, self.size[1] * scale],
        }
    }

    /// Forces width and height to be equal by symmetrically expanding the shorter dimension.
    ///
    /// The center position of the [`Rect`] remains the same.
    #[must_use]
    pub fn to_square(&self) -> Self {
        let side = f32::max(self.size[0], self.size[1]);
        Self {
            center: self.center,
            size: [side, side],
        }
    }

    #[inline]
    pub fn top_left(&self) -> [f32; 2] {
        [
            self.center[0] - self.size[0] * 0.5,
            self.center[1] - self.size[1] * 0.5,
        ]
    }

    /// Returns the X coordinate of the left side of the rectangle.
    #[inline]
    pub fn x(&self) -> f32 {
        self.top_left()[0]
    }

    /// Returns the Y coordinate of the top side of the rectangle.
    #[inline]
    pub fn y(&self) -> f32 {
        self.top_left()[1]
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size[0]
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size[1]
    }

    #[inline]
    pub fn area(&self) -> f32 {
        self.size[0] * self.size[1]
    }

    #[inline]
    pub fn center(&self) -> [f32; 2] {
        self.center
    }

    #[inline]
    pub fn size(&self) -> [f32; 2] {
        self.size
    }

    pub fn contains_point(&self, [x, y]: [f32; 2]) -> bool {
        self.x() <= x
            && self.y() <= y
            && self.x() + self.width() >= x
            && self.y() + self.height() >= y
    }

    /// Computes the intersection of `self` and `other`.
    ///
    /// Returns [`None`] when the intersection is empty (ie. the rectangles do not overlap).
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let min_x = self.x().max(other.x());
        let min_y = self.y().max(other.y());
        let max_x = (self.x() + self.width()).min(other.x() + other.width());
        let max_y = (self.y() + self.height()).min(other.y() + other.height());
        if min_x > max_x || min_y > max_y {
            return None;
        }

        Some(Rect::span_inner(min_x, min_y, max_x, max_y))
    }

    fn intersection_area(&self, other: &Self) -> f32 {
        self.intersection(other).map_or(0.0, |rect| rect.area())
    }

    fn union_area(&self, other: &Self) -> f32 {
        self.area() + other.area() - self.intersection_area(other)
    }

    /// Computes the Intersection over Union (IOU) of `self` and `other`.
    pub fn iou(&self, other: &Self) -> f32 {
        self.intersection_area(other) / self.union_area(other)
    }
}

impl fmt::Debug for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rect @ ({},{})/{}x{}",
            self.center[0], self.center[1], self.size[0], self.size[1]
        )
    }
}
