use serde::{Deserialize, Serialize};

use crate::error::AlignError;

/// Number of annotated landmarks per image.
pub const NUM_LANDMARKS: usize = 7;

/// A 2D point in pixel coordinates.
///
/// Serialized as a `[x, y]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point2 {
    /// Horizontal coordinate (column direction)
    pub x: f64,
    /// Vertical coordinate (row direction)
    pub y: f64,
}

impl Point2 {
    /// Create a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f64; 2]> for Point2 {
    fn from(p: [f64; 2]) -> Self {
        Self::new(p[0], p[1])
    }
}

impl From<Point2> for [f64; 2] {
    fn from(p: Point2) -> Self {
        [p.x, p.y]
    }
}

impl std::ops::Add for Point2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Point2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// The 7 annotated landmarks of one image, in the image's pixel frame.
///
/// The order is fixed by the annotation protocol:
///
/// * 0 and 4: first anchor pair, kept level and centered
/// * 1 and 3: second anchor pair, kept level and centered
/// * 2: annotated but not used by the alignment
/// * 5 and 6: the vertical axis, mapped to the bottom and the top of the
///   canonical frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet([Point2; NUM_LANDMARKS]);

impl LandmarkSet {
    /// Create a landmark set from `[x, y]` pairs.
    pub fn new(points: [[f64; 2]; NUM_LANDMARKS]) -> Self {
        Self(points.map(Point2::from))
    }

    /// Create a landmark set from points.
    pub fn from_points(points: [Point2; NUM_LANDMARKS]) -> Self {
        Self(points)
    }

    /// The landmarks in annotation order.
    pub fn points(&self) -> &[Point2; NUM_LANDMARKS] {
        &self.0
    }

    /// Iterate over the landmarks in annotation order.
    pub fn iter(&self) -> impl Iterator<Item = &Point2> {
        self.0.iter()
    }

    /// Rescale the coordinates, e.g. after resizing the image.
    ///
    /// `sx` multiplies the x coordinates and `sy` the y coordinates.
    pub fn scaled(&self, sx: f64, sy: f64) -> Self {
        Self(self.0.map(|p| Point2::new(p.x * sx, p.y * sy)))
    }

    /// Apply a point-wise map to every landmark.
    pub fn map(&self, f: impl FnMut(Point2) -> Point2) -> Self {
        Self(self.0.map(f))
    }

    /// Index of the first landmark with a NaN or infinite coordinate.
    pub(crate) fn first_non_finite(&self) -> Option<usize> {
        self.0.iter().position(|p| !p.is_finite())
    }
}

impl std::ops::Index<usize> for LandmarkSet {
    type Output = Point2;

    fn index(&self, idx: usize) -> &Self::Output {
        &self.0[idx]
    }
}

impl TryFrom<Vec<Point2>> for LandmarkSet {
    type Error = AlignError;

    fn try_from(points: Vec<Point2>) -> Result<Self, Self::Error> {
        let actual = points.len();
        let points: [Point2; NUM_LANDMARKS] =
            points.try_into().map_err(|_| AlignError::LandmarkCount {
                expected: NUM_LANDMARKS,
                actual,
            })?;
        Ok(Self(points))
    }
}
