use crate::error::AlignError;
use crate::landmarks::Point2;

/// A 2D similarity transform (rotation, uniform scale and translation).
///
/// The transform is stored as the 4 free parameters of the matrix
///
/// | a  -b  tx |
/// | b   a  ty |
/// | 0   0   1 |
///
/// where `a = s·cos(θ)` and `b = s·sin(θ)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityTransform {
    a: f64,
    b: f64,
    tx: f64,
    ty: f64,
}

impl SimilarityTransform {
    /// Create a transform from its parameters `(a, b, tx, ty)`.
    pub const fn new(a: f64, b: f64, tx: f64, ty: f64) -> Self {
        Self { a, b, tx, ty }
    }

    /// The identity transform.
    pub const fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0)
    }

    /// Create a transform from a rotation angle in radians, a scale and a translation.
    pub fn from_angle_scale(angle: f64, scale: f64, tx: f64, ty: f64) -> Self {
        Self::new(scale * angle.cos(), scale * angle.sin(), tx, ty)
    }

    /// The parameters `[a, b, tx, ty]`.
    pub fn params(&self) -> [f64; 4] {
        [self.a, self.b, self.tx, self.ty]
    }

    /// The 3x3 homogeneous matrix, row-major.
    pub fn matrix(&self) -> [[f64; 3]; 3] {
        [
            [self.a, -self.b, self.tx],
            [self.b, self.a, self.ty],
            [0.0, 0.0, 1.0],
        ]
    }

    /// The uniform scale factor `s`.
    pub fn scale(&self) -> f64 {
        self.a.hypot(self.b)
    }

    /// The rotation angle `θ` in radians, in `(-π, π]`.
    pub fn angle(&self) -> f64 {
        self.b.atan2(self.a)
    }

    /// Determinant of the linear part, `s²`.
    pub fn determinant(&self) -> f64 {
        self.a * self.a + self.b * self.b
    }

    /// Whether all parameters are finite.
    pub fn is_finite(&self) -> bool {
        self.params().iter().all(|v| v.is_finite())
    }

    /// Apply the transform to a point.
    pub fn apply(&self, p: Point2) -> Point2 {
        Point2::new(
            self.a * p.x - self.b * p.y + self.tx,
            self.b * p.x + self.a * p.y + self.ty,
        )
    }

    /// Compose two transforms: the result applies `other` first, then `self`.
    pub fn compose(&self, other: &SimilarityTransform) -> Self {
        let origin = self.apply(Point2::new(other.tx, other.ty));
        Self::new(
            self.a * other.a - self.b * other.b,
            self.b * other.a + self.a * other.b,
            origin.x,
            origin.y,
        )
    }

    /// Invert the transform.
    ///
    /// # Errors
    ///
    /// Returns [`AlignError::DegenerateGeometry`] when the scale is zero or the
    /// parameters are not finite.
    pub fn inverse(&self) -> Result<Self, AlignError> {
        let determinant = self.determinant();
        if !self.is_finite() || !determinant.is_normal() {
            return Err(AlignError::DegenerateGeometry(format!(
                "transform is not invertible (determinant {determinant})"
            )));
        }

        let a = self.a / determinant;
        let b = -self.b / determinant;
        let tx = -(a * self.tx - b * self.ty);
        let ty = -(b * self.tx + a * self.ty);

        Ok(Self::new(a, b, tx, ty))
    }
}

impl Default for SimilarityTransform {
    fn default() -> Self {
        Self::identity()
    }
}
