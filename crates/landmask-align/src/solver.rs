use glam::{DMat4, DVec4};

use crate::error::AlignError;
use crate::landmarks::LandmarkSet;
use crate::transform::SimilarityTransform;

/// Relative tolerance on `det(AᵗA) / ∏ diag(AᵗA)`.
///
/// By Hadamard's inequality the ratio lies in `[0, 1]` for the positive
/// semi-definite normal matrix, independently of the pixel scale.
const SINGULARITY_EPS: f64 = 1e-12;

/// Relative tolerance on `det(S) / tr(S)²` for the scatter matrix `S` of
/// the landmarks. The ratio is 0 for collinear points and at most 1/4.
const COLLINEAR_EPS: f64 = 1e-9;

/// Reject landmarks that do not span two dimensions.
fn check_spread(landmarks: &LandmarkSet) -> Result<(), AlignError> {
    let n = landmarks.points().len() as f64;
    let (sum_x, sum_y) = landmarks
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    let (mean_x, mean_y) = (sum_x / n, sum_y / n);

    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for p in landmarks.iter() {
        let (dx, dy) = (p.x - mean_x, p.y - mean_y);
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    let trace = sxx + syy;
    let det = sxx * syy - sxy * sxy;
    if !trace.is_normal() || det <= COLLINEAR_EPS * trace * trace {
        return Err(AlignError::DegenerateGeometry(
            "landmarks are coincident or collinear".to_string(),
        ));
    }
    Ok(())
}

/// One equation `row · [a, b, tx, ty] = rhs` of the alignment system.
struct Constraint {
    row: [f64; 4],
    rhs: f64,
}

/// Build the 8 equations tying the landmarks to the canonical frame.
fn constraints(landmarks: &LandmarkSet) -> [Constraint; 8] {
    let p1 = landmarks[0];
    let p2 = landmarks[1];
    let p4 = landmarks[3];
    let p5 = landmarks[4];
    let p6 = landmarks[5];
    let p7 = landmarks[6];

    [
        // p6 maps to (0.5, 1)
        Constraint {
            row: [p6.x, -p6.y, 1.0, 0.0],
            rhs: 0.5,
        },
        Constraint {
            row: [p6.y, p6.x, 0.0, 1.0],
            rhs: 1.0,
        },
        // p7 maps to (0.5, 0)
        Constraint {
            row: [p7.x, -p7.y, 1.0, 0.0],
            rhs: 0.5,
        },
        Constraint {
            row: [p7.y, p7.x, 0.0, 1.0],
            rhs: 0.0,
        },
        // the midpoints of both anchor pairs lie on x = 0.5
        Constraint {
            row: [p1.x + p5.x, -(p1.y + p5.y), 2.0, 0.0],
            rhs: 1.0,
        },
        Constraint {
            row: [p2.x + p4.x, -(p2.y + p4.y), 2.0, 0.0],
            rhs: 1.0,
        },
        // both anchor pairs are level after the transform
        Constraint {
            row: [p1.y - p5.y, p1.x - p5.x, 0.0, 0.0],
            rhs: 0.0,
        },
        Constraint {
            row: [p2.y - p4.y, p2.x - p4.x, 0.0, 0.0],
            rhs: 0.0,
        },
    ]
}

/// Compute the similarity transform aligning the landmarks to the canonical frame.
///
/// The returned transform maps image pixels to the canonical unit square:
/// landmark 5 goes to `(0.5, 1)`, landmark 6 to `(0.5, 0)`, the midpoints of
/// the anchor pairs (0, 4) and (1, 3) to `x = 0.5`, and each anchor pair ends
/// up level. The 8 constraints over-determine the 4 parameters `(a, b, tx, ty)`,
/// which are found in the least-squares sense through the normal equations
/// `AᵗA u = Aᵗv`.
///
/// # Arguments
///
/// * `landmarks` - The 7 landmarks of one image, in pixel coordinates.
///
/// # Errors
///
/// * [`AlignError::NonFinite`] if a landmark coordinate is NaN or infinite.
/// * [`AlignError::DegenerateGeometry`] if the landmarks are coincident or all
///   lie on one line, or if the normal matrix is singular.
///
/// # Example
///
/// ```
/// use landmask_align::{solve, LandmarkSet, Point2};
///
/// let landmarks = LandmarkSet::new([
///     [20.0, 35.0],
///     [40.0, 60.0],
///     [50.0, 50.0],
///     [60.0, 60.0],
///     [80.0, 35.0],
///     [50.0, 100.0],
///     [50.0, 0.0],
/// ]);
///
/// let transform = solve(&landmarks).unwrap();
/// let top = transform.apply(Point2::new(50.0, 0.0));
/// assert!((top.x - 0.5).abs() < 1e-9 && top.y.abs() < 1e-9);
/// ```
pub fn solve(landmarks: &LandmarkSet) -> Result<SimilarityTransform, AlignError> {
    if let Some(index) = landmarks.first_non_finite() {
        return Err(AlignError::NonFinite(index));
    }
    check_spread(landmarks)?;

    // accumulate AᵗA and Aᵗv row by row
    let mut ata = [[0.0f64; 4]; 4];
    let mut atv = [0.0f64; 4];
    for Constraint { row, rhs } in constraints(landmarks) {
        for i in 0..4 {
            for j in 0..4 {
                ata[i][j] += row[i] * row[j];
            }
            atv[i] += row[i] * rhs;
        }
    }

    let diag_product: f64 = (0..4).map(|i| ata[i][i]).product();
    if !diag_product.is_normal() {
        return Err(AlignError::DegenerateGeometry(
            "an unknown is not constrained by the landmarks".to_string(),
        ));
    }

    // symmetric, so the column-major interpretation is the same matrix
    let normal = DMat4::from_cols_array_2d(&ata);
    let determinant = normal.determinant();
    if !determinant.is_finite() || determinant.abs() <= SINGULARITY_EPS * diag_product {
        return Err(AlignError::DegenerateGeometry(format!(
            "normal equations are singular (det {determinant:e})"
        )));
    }

    let u = normal.inverse() * DVec4::from_array(atv);
    let transform = SimilarityTransform::new(u.x, u.y, u.z, u.w);

    if !transform.is_finite() {
        return Err(AlignError::DegenerateGeometry(
            "least-squares solution is not finite".to_string(),
        ));
    }

    Ok(transform)
}
