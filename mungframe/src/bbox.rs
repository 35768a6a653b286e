//! Axis-aligned bounding boxes in integer pixel coordinates.

use std::fmt::{Debug, Display, Formatter};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// The bounding box of a notation object on the page.  Both edges are **inclusive**: a box with
/// `left == right` is exactly one pixel wide.  This is the convention used by every area and
/// overlap computation in this crate.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
pub struct BoundingBox {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl BoundingBox {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Creates a `BoundingBox` from its top-left corner and its size in pixels (the way MuNG files
    /// store them).  A `width` of `1` gives a box where `left == right`.  Returns `None` if either
    /// size isn't positive, or if the far edge doesn't fit in an `i32`.
    pub fn from_size(left: i32, top: i32, width: i32, height: i32) -> Option<Self> {
        if width <= 0 || height <= 0 {
            return None;
        }
        let right = left.checked_add(width - 1)?;
        let bottom = top.checked_add(height - 1)?;
        Some(Self::new(left, top, right, bottom))
    }

    /// Number of pixel columns covered by this box
    pub fn width(&self) -> i64 {
        self.right as i64 - self.left as i64 + 1
    }

    /// Number of pixel rows covered by this box
    pub fn height(&self) -> i64 {
        self.bottom as i64 - self.top as i64 + 1
    }

    pub fn area(&self) -> i64 {
        self.width() * self.height()
    }

    /// Returns the `(width, height)` of the region shared by `self` and `other`, or `None` if they
    /// share no pixels.  Boxes which touch along a single row or column of pixels _do_ overlap.
    pub fn intersection_size(&self, other: &Self) -> Option<(i64, i64)> {
        let iw = self.right.min(other.right) as i64 - self.left.max(other.left) as i64 + 1;
        if iw <= 0 {
            return None;
        }
        let ih = self.bottom.min(other.bottom) as i64 - self.top.max(other.top) as i64 + 1;
        if ih <= 0 {
            return None;
        }
        Some((iw, ih))
    }

    /// Intersection-over-Union of two boxes, or `None` if the boxes don't overlap at all.
    ///
    /// # Example
    /// ```
    /// use mungframe::BoundingBox;
    ///
    /// let a = BoundingBox::new(0, 0, 9, 9);
    /// let b = BoundingBox::new(5, 5, 14, 14);
    /// // 5x5 pixels are shared, out of 100 + 100 - 25 = 175
    /// assert_eq!(a.overlap_iou(&b), Some(25.0 / 175.0));
    /// assert_eq!(a.overlap_iou(&a), Some(1.0));
    /// assert_eq!(a.overlap_iou(&BoundingBox::new(11, 0, 20, 9)), None);
    /// ```
    pub fn overlap_iou(&self, other: &Self) -> Option<f64> {
        let (iw, ih) = self.intersection_size(other)?;
        let intersection = iw * ih;
        let union = self.area() + other.area() - intersection;
        Some(intersection as f64 / union as f64)
    }

    /// Intersection-over-Union of two boxes, which is `0.0` for boxes which don't overlap.
    pub fn iou(&self, other: &Self) -> f64 {
        self.overlap_iou(other).unwrap_or(0.0)
    }
}

impl Debug for BoundingBox {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "BoundingBox({})", self)
    }
}

impl Display for BoundingBox {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{},{}]..=[{},{}]",
            self.left, self.top, self.right, self.bottom
        )
    }
}

#[cfg(test)]
use quickcheck::{Arbitrary, Gen};

#[cfg(test)]
impl Arbitrary for BoundingBox {
    fn arbitrary(gen: &mut Gen) -> Self {
        // Keep coordinates small so that random boxes actually overlap reasonably often
        let mut coord = || i32::from(i8::arbitrary(gen));
        let (x1, x2, y1, y2) = (coord(), coord(), coord(), coord());
        Self::new(x1.min(x2), y1.min(y2), x1.max(x2), y1.max(y2))
    }
}
