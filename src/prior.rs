//! Gaussian pose prior and its rectangular lower bound.
//!
//! The prior is a quadratic loss `eᵀ·Λ·e` over the pose error
//! `e = (x - μx, y - μy, wrap(θ - μθ))`. Grouping translation error as `e1`
//! and rotation error as `e2`, with `Λ = [A B; Bᵀ C]`:
//!
//! ```text
//! eᵀΛe = (e1 + A⁻¹B·e2)ᵀ A (e1 + A⁻¹B·e2) + e2·(C - BᵀA⁻¹B)·e2
//! ```
//!
//! For a fixed rotation the second term is a constant and the first is a 2D
//! quadratic around a shifted mean, which [`min_quadratic`] bounds over a
//! translation rectangle.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::core::{Pose2D, normalize_angle};

const RANK_TOLERANCE: f64 = 1e-12;
const DEGENERATE_DIAG: f64 = 1e-12;

/// Axis-aligned rectangle, bounds inclusive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    /// Minimum x
    pub x0: f64,
    /// Maximum x
    pub x1: f64,
    /// Minimum y
    pub y0: f64,
    /// Maximum y
    pub y1: f64,
}

impl Rect {
    /// Create a rectangle from its x and y extents.
    pub fn new(x0: f64, x1: f64, y0: f64, y1: f64) -> Self {
        debug_assert!(x1 >= x0 && y1 >= y0);
        Self { x0, x1, y0, y1 }
    }

    /// True if (x, y) lies inside or on the boundary.
    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.x0 <= x && x <= self.x1 && self.y0 <= y && y <= self.y1
    }
}

#[inline]
fn quad2(inf: &[[f64; 2]; 2], ex: f64, ey: f64) -> f64 {
    inf[0][0] * ex * ex + 2.0 * inf[0][1] * ex * ey + inf[1][1] * ey * ey
}

/// Lower bound of `(p - mean)ᵀ·information·(p - mean)` over `rect`.
///
/// Zero when the mean is inside. Otherwise the minimum of a convex quadratic
/// lies on the boundary: each edge fixes one coordinate, the other is set to
/// its stationary point and clamped to the edge. When the diagonal that
/// defines the stationary point vanishes, the restricted quadratic is linear
/// or constant and both edge endpoints are evaluated instead.
///
/// `information` must be positive semidefinite.
pub fn min_quadratic(mean: [f64; 2], information: [[f64; 2]; 2], rect: &Rect) -> f64 {
    if rect.contains(mean[0], mean[1]) {
        return 0.0;
    }

    let a = information[0][0];
    let b = information[0][1];
    let d = information[1][1];

    let mut best = f64::INFINITY;

    for x in [rect.x0, rect.x1] {
        let ex = x - mean[0];
        if d.abs() > DEGENERATE_DIAG {
            let y = (mean[1] - b * ex / d).clamp(rect.y0, rect.y1);
            best = best.min(quad2(&information, ex, y - mean[1]));
        } else {
            for y in [rect.y0, rect.y1] {
                best = best.min(quad2(&information, ex, y - mean[1]));
            }
        }
    }

    for y in [rect.y0, rect.y1] {
        let ey = y - mean[1];
        if a.abs() > DEGENERATE_DIAG {
            let x = (mean[0] - b * ey / a).clamp(rect.x0, rect.x1);
            best = best.min(quad2(&information, x - mean[0], ey));
        } else {
            for x in [rect.x0, rect.x1] {
                best = best.min(quad2(&information, x - mean[0], ey));
            }
        }
    }

    best
}

/// Quadratic prior over (x, y, theta), in meters and radians.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GaussianPrior {
    /// Mean pose (x, y, theta)
    pub mean: [f64; 3],
    /// Symmetric information (inverse covariance) matrix
    pub information: [[f64; 3]; 3],
}

impl GaussianPrior {
    /// Prior with the given mean and information matrix.
    pub fn new(mean: [f64; 3], information: [[f64; 3]; 3]) -> Self {
        debug_assert!(
            information[0][0] >= 0.0 && information[1][1] >= 0.0 && information[2][2] >= 0.0,
            "information matrix diagonal must be non-negative"
        );
        Self { mean, information }
    }

    /// Prior with a diagonal information matrix built from standard
    /// deviations (meters, meters, radians).
    pub fn from_std_devs(mean: Pose2D, sigma_xy: f64, sigma_theta: f64) -> Self {
        let ixy = 1.0 / (sigma_xy * sigma_xy);
        let it = 1.0 / (sigma_theta * sigma_theta);
        Self::new(
            [mean.x, mean.y, mean.theta],
            [[ixy, 0.0, 0.0], [0.0, ixy, 0.0], [0.0, 0.0, it]],
        )
    }

    /// Full quadratic penalty at `pose`; the theta residual is wrapped.
    pub fn penalty(&self, pose: &Pose2D) -> f64 {
        let e = [
            pose.x - self.mean[0],
            pose.y - self.mean[1],
            normalize_angle(pose.theta - self.mean[2]),
        ];
        let inf = &self.information;
        let mut sum = 0.0;
        for i in 0..3 {
            for j in 0..3 {
                sum += e[i] * inf[i][j] * e[j];
            }
        }
        sum
    }

    /// Condition the prior on a fixed rotation.
    ///
    /// Returns the Schur-complement rotation penalty and the translation
    /// quadratic around the shifted mean. A rank-deficient translation block
    /// is conditioned through its pseudo-inverse, so a prior that only
    /// constrains heading keeps its full rotation penalty.
    pub fn condition_on_rotation(&self, theta: f64) -> ConditionedPrior {
        let inf = &self.information;
        let a = [[inf[0][0], inf[0][1]], [inf[0][1], inf[1][1]]];
        let b = [inf[0][2], inf[1][2]];
        let c = inf[2][2];

        let pinv = pseudo_inverse(&a);
        // A⁺B, the translation shift per radian of rotation error.
        let shift = [
            pinv[0][0] * b[0] + pinv[0][1] * b[1],
            pinv[1][0] * b[0] + pinv[1][1] * b[1],
        ];

        // B must lie in the range of A for the split to be exact.
        let residual = [
            b[0] - (a[0][0] * shift[0] + a[0][1] * shift[1]),
            b[1] - (a[1][0] * shift[0] + a[1][1] * shift[1]),
        ];
        let scale = b[0].abs().max(b[1].abs()).max(RANK_TOLERANCE);
        if residual[0].abs().max(residual[1].abs()) > 1e-9 * scale {
            warn!(
                "[Prior] rotation coupling outside translation range (residual {:?})",
                residual
            );
        }

        let e2 = normalize_angle(theta - self.mean[2]);
        let schur = c - (b[0] * shift[0] + b[1] * shift[1]);

        ConditionedPrior {
            mean_xy: [self.mean[0] - e2 * shift[0], self.mean[1] - e2 * shift[1]],
            information_xy: a,
            rotation_penalty: e2 * schur * e2,
        }
    }
}

/// Moore-Penrose pseudo-inverse of a symmetric positive semidefinite 2x2
/// matrix. Eigenvalues below `RANK_TOLERANCE` times the largest are treated
/// as zero.
fn pseudo_inverse(a: &[[f64; 2]; 2]) -> [[f64; 2]; 2] {
    let (a00, a01, a11) = (a[0][0], a[0][1], a[1][1]);
    let half_trace = 0.5 * (a00 + a11);
    let radius = (0.25 * (a00 - a11) * (a00 - a11) + a01 * a01).sqrt();
    let lmax = half_trace + radius;
    if lmax <= 0.0 {
        return [[0.0; 2]; 2];
    }

    let det = a00 * a11 - a01 * a01;
    let lmin = det / lmax;
    if lmin > RANK_TOLERANCE * lmax {
        return [[a11 / det, -a01 / det], [-a01 / det, a00 / det]];
    }

    // Rank one: A⁺ = u·uᵀ / λ for the unit eigenvector u of λ = lmax.
    let (ux, uy) = if (lmax - a11).abs() >= (lmax - a00).abs() {
        (lmax - a11, a01)
    } else {
        (a01, lmax - a00)
    };
    let norm2 = ux * ux + uy * uy;
    if norm2 <= 0.0 {
        return [[0.0; 2]; 2];
    }
    let k = 1.0 / (lmax * norm2);
    [[k * ux * ux, k * ux * uy], [k * ux * uy, k * uy * uy]]
}

/// A [`GaussianPrior`] restricted to one rotation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConditionedPrior {
    /// Conditional translation mean
    pub mean_xy: [f64; 2],
    /// Translation information block
    pub information_xy: [[f64; 2]; 2],
    /// Constant penalty for the rotation residual
    pub rotation_penalty: f64,
}

impl ConditionedPrior {
    /// Lower bound of the prior penalty over a translation rectangle.
    #[inline]
    pub fn min_penalty(&self, rect: &Rect) -> f64 {
        self.rotation_penalty + min_quadratic(self.mean_xy, self.information_xy, rect)
    }
}
