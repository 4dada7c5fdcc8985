//! Symmetric point-to-point ICP with a weak-marriage consistency rule.
//!
//! Each iteration matches every point of B (under the current transform) to
//! its nearest point in A and every point of A to its nearest transformed B.
//! A pair `a -> b` is kept only if `a` is not much farther from `b` than
//! `b`'s own favourite is:
//!
//! ```text
//! keep a->b  iff  |a - Tb| <= ratio * |nearest_A(Tb) - Tb|
//! keep b->a  iff  |a - Tb| <= ratio * |a - nearest_TB(a)|
//! ```
//!
//! Surviving pairs feed a closed-form rigid fit from the original B
//! coordinates onto A, which becomes the next transform.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::core::{Point2D, Pose2D, angle_diff, sq};

/// ICP parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IcpParams {
    /// Weak-marriage ratio; larger keeps more correspondences.
    #[serde(default = "default_max_dist_ratio")]
    pub max_dist_ratio: f64,

    /// Stop when the translation update is below this (meters).
    #[serde(default = "default_trans_thresh")]
    pub trans_thresh: f64,

    /// Stop when the rotation update is below this (radians).
    #[serde(default = "default_rad_thresh")]
    pub rad_thresh: f64,

    /// Hard iteration limit.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
}

impl Default for IcpParams {
    fn default() -> Self {
        Self {
            max_dist_ratio: default_max_dist_ratio(),
            trans_thresh: default_trans_thresh(),
            rad_thresh: default_rad_thresh(),
            max_iterations: default_max_iterations(),
        }
    }
}

fn default_max_dist_ratio() -> f64 {
    2.0
}

fn default_trans_thresh() -> f64 {
    0.001 // 1mm
}

fn default_rad_thresh() -> f64 {
    0.01f64.to_radians()
}

fn default_max_iterations() -> u32 {
    100
}

/// Outcome of [`icp`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IcpResult {
    /// Transform taking B into A's frame.
    pub pose: Pose2D,
    /// Number of accepted correspondences in the last fit (both directions).
    pub weight: f64,
    /// Iterations performed.
    pub iterations: u32,
}

/// Align `points_b` onto `points_a` starting from `initial`.
///
/// Nearest neighbours are found by brute force. Returns `initial` with zero
/// weight if either cloud is empty or no correspondence survives.
pub fn icp(points_a: &[Point2D], points_b: &[Point2D], initial: Pose2D, params: &IcpParams) -> IcpResult {
    let mut pose = initial;
    let mut result = IcpResult {
        pose,
        weight: 0.0,
        iterations: 0,
    };
    if points_a.is_empty() || points_b.is_empty() {
        return result;
    }

    let mut transformed = vec![(0.0f64, 0.0f64); points_b.len()];
    let mut b_nearest = vec![0usize; points_b.len()];
    let mut b_dist2 = vec![f64::INFINITY; points_b.len()];
    let mut a_nearest = vec![0usize; points_a.len()];
    let mut a_dist2 = vec![f64::INFINITY; points_a.len()];

    while result.iterations < params.max_iterations {
        result.iterations += 1;
        let (s, c) = pose.theta.sin_cos();

        for (ib, b) in points_b.iter().enumerate() {
            let (bx, by) = (b.x as f64, b.y as f64);
            transformed[ib] = (bx * c - by * s + pose.x, bx * s + by * c + pose.y);
        }

        for (ib, &(tx, ty)) in transformed.iter().enumerate() {
            let (idx, d2) = nearest(points_a.iter().map(|a| (a.x as f64, a.y as f64)), tx, ty);
            b_nearest[ib] = idx;
            b_dist2[ib] = d2;
        }

        for (ia, a) in points_a.iter().enumerate() {
            let (idx, d2) = nearest(transformed.iter().copied(), a.x as f64, a.y as f64);
            a_nearest[ia] = idx;
            a_dist2[ia] = d2;
        }

        let mut fit = RigidFit::default();
        let ratio = params.max_dist_ratio;

        // a -> b: the pair distance is a's own best distance.
        for (ia, &ib) in a_nearest.iter().enumerate() {
            if a_dist2[ia].sqrt() > ratio * b_dist2[ib].sqrt() {
                continue;
            }
            fit.add(&points_b[ib], &points_a[ia]);
        }

        // b -> a: the pair distance is b's own best distance.
        for (ib, &ia) in b_nearest.iter().enumerate() {
            if b_dist2[ib].sqrt() > ratio * a_dist2[ia].sqrt() {
                continue;
            }
            fit.add(&points_b[ib], &points_a[ia]);
        }

        result.weight = fit.weight;
        let Some(next) = fit.solve() else {
            warn!("[ICP] no correspondences survived at iteration {}", result.iterations);
            result.weight = 0.0;
            break;
        };

        let dtrans2 = sq(pose.x - next.x) + sq(pose.y - next.y);
        let drad = angle_diff(next.theta, pose.theta).abs();
        pose = next;
        result.pose = pose;

        if dtrans2 < sq(params.trans_thresh) && drad < params.rad_thresh {
            break;
        }
    }

    debug!(
        "[ICP] ({:.4}, {:.4}, {:.4}) weight {} after {} iterations",
        result.pose.x, result.pose.y, result.pose.theta, result.weight, result.iterations
    );
    result
}

/// Index and squared distance of the point nearest (x, y).
fn nearest(points: impl Iterator<Item = (f64, f64)>, x: f64, y: f64) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (i, (px, py)) in points.enumerate() {
        let d2 = sq(px - x) + sq(py - y);
        if d2 < best.1 {
            best = (i, d2);
        }
    }
    best
}

/// First and second moments of source/target pairs; solves the rigid
/// transform minimizing squared error from source onto target.
#[derive(Clone, Copy, Debug, Default)]
struct RigidFit {
    sx: f64,
    sy: f64,
    tx: f64,
    ty: f64,
    sx_ty: f64,
    sy_tx: f64,
    sx_tx: f64,
    sy_ty: f64,
    weight: f64,
}

impl RigidFit {
    fn add(&mut self, source: &Point2D, target: &Point2D) {
        let (sx, sy) = (source.x as f64, source.y as f64);
        let (tx, ty) = (target.x as f64, target.y as f64);
        self.sx += sx;
        self.sy += sy;
        self.tx += tx;
        self.ty += ty;
        self.sx_ty += sx * ty;
        self.sy_tx += sy * tx;
        self.sx_tx += sx * tx;
        self.sy_ty += sy * ty;
        self.weight += 1.0;
    }

    fn solve(&self) -> Option<Pose2D> {
        if self.weight <= 0.0 {
            return None;
        }
        let w = self.weight;
        let (sxc, syc) = (self.sx / w, self.sy / w);
        let (txc, tyc) = (self.tx / w, self.ty / w);

        // Centered cross (m) and dot (n) sums.
        let m = (self.sx_ty - self.sx * tyc - self.ty * sxc + sxc * tyc * w)
            - (self.sy_tx - self.sy * txc - self.tx * syc + syc * txc * w);
        let n = (self.sx_tx - self.sx * txc - self.tx * sxc + sxc * txc * w)
            + (self.sy_ty - self.sy * tyc - self.ty * syc + syc * tyc * w);

        let theta = m.atan2(n);
        let (s, c) = theta.sin_cos();
        Some(Pose2D::new(
            txc - c * sxc + s * syc,
            tyc - s * sxc - c * syc,
            theta,
        ))
    }
}
