//! Gradient-free pose refinement against the full-resolution model.
//!
//! Coordinate descent: from the current best pose try one step up and one
//! step down along x, y and theta. Any improvement becomes the new reference
//! and the same steps are tried again; otherwise all steps shrink. Scans are
//! used at float precision, so results are not limited to the pixel grid.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::{CostGrid, Point2D, Pose2D, normalize_angle};
use crate::points::QuantizedPointCache;
use crate::prior::GaussianPrior;
use crate::pyramid::CostPyramid;

/// Hill-climbing parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HillClimbParams {
    /// Initial x step (meters).
    #[serde(default = "default_step_xy")]
    pub step_x: f64,

    /// Initial y step (meters).
    #[serde(default = "default_step_xy")]
    pub step_y: f64,

    /// Initial theta step (radians).
    #[serde(default = "default_step_theta")]
    pub step_theta: f64,

    /// Factor applied to every step when no trial improves.
    #[serde(default = "default_shrink_factor")]
    pub shrink_factor: f64,

    /// Number of shrinks before giving up.
    #[serde(default = "default_max_shrinks")]
    pub max_shrinks: u32,

    /// Hard limit on iterations (each iteration is six evaluations).
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
}

impl Default for HillClimbParams {
    fn default() -> Self {
        Self {
            step_x: default_step_xy(),
            step_y: default_step_xy(),
            step_theta: default_step_theta(),
            shrink_factor: default_shrink_factor(),
            max_shrinks: default_max_shrinks(),
            max_iterations: default_max_iterations(),
        }
    }
}

impl HillClimbParams {
    /// Defaults with translation steps of half a pixel at `meters_per_pixel`.
    pub fn for_resolution(meters_per_pixel: f32) -> Self {
        let half = meters_per_pixel as f64 / 2.0;
        Self {
            step_x: half,
            step_y: half,
            ..Self::default()
        }
    }
}

fn default_step_xy() -> f64 {
    0.025 // half a pixel at 5cm
}

fn default_step_theta() -> f64 {
    0.5f64.to_radians()
}

fn default_shrink_factor() -> f64 {
    0.5
}

fn default_max_shrinks() -> u32 {
    8
}

fn default_max_iterations() -> u32 {
    1000
}

/// Outcome of [`hill_climb`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HillClimbResult {
    /// Best pose found (theta in [-π, π)).
    pub pose: Pose2D,
    /// Scaled match score minus prior penalty at `pose`.
    pub score: f64,
    /// Prior penalty at `pose` (0 without a prior).
    pub penalty: f64,
    /// Iterations performed.
    pub iterations: u32,
}

/// Refine `seed` by coordinate descent on the level-0 model.
///
/// Lookups truncate rather than round, with the model origin pre-shifted by
/// half a pixel so that a pose reported by the search engine scores exactly
/// as the search scored it. Correcting for a biased model is left to the
/// caller. The accepted score never decreases.
pub fn hill_climb(
    cache: &QuantizedPointCache,
    pyramid: &CostPyramid,
    seed: Pose2D,
    params: &HillClimbParams,
    scale: f64,
    prior: Option<&GaussianPrior>,
) -> HillClimbResult {
    let scorer = PoseScorer {
        points: cache.points(),
        grid: pyramid.level(0),
        meters_per_pixel: pyramid.meters_per_pixel() as f64,
        scale,
        prior,
    };

    let mut best = seed.normalized();
    let (mut best_score, mut best_penalty) = scorer.evaluate(&best);
    let mut steps = [params.step_x, params.step_y, params.step_theta];
    let mut shrinks = 0;
    let mut iterations = 0;

    while iterations < params.max_iterations {
        iterations += 1;

        // All six trials start from the same reference.
        let reference = best;
        let mut improved = false;
        for (axis, &step) in steps.iter().enumerate() {
            for direction in [-1.0, 1.0] {
                let mut q = [reference.x, reference.y, reference.theta];
                q[axis] += step * direction;
                let trial = Pose2D::new(q[0], q[1], normalize_angle(q[2]));

                let (score, penalty) = scorer.evaluate(&trial);
                if score > best_score {
                    best = trial;
                    best_score = score;
                    best_penalty = penalty;
                    improved = true;
                }
            }
        }

        if improved {
            continue;
        }
        if shrinks == params.max_shrinks {
            break;
        }
        for step in &mut steps {
            *step *= params.shrink_factor;
        }
        shrinks += 1;
    }

    debug!(
        "[HillClimb] ({:.4}, {:.4}, {:.4}) score {:.3} after {} iterations, {} shrinks",
        best.x, best.y, best.theta, best_score, iterations, shrinks
    );

    HillClimbResult {
        pose: best,
        score: best_score,
        penalty: best_penalty,
        iterations,
    }
}

/// Scores a pose against the full-resolution grid.
struct PoseScorer<'a> {
    points: &'a [Point2D],
    grid: &'a CostGrid,
    meters_per_pixel: f64,
    scale: f64,
    prior: Option<&'a GaussianPrior>,
}

impl PoseScorer<'_> {
    /// Returns (score, penalty).
    fn evaluate(&self, pose: &Pose2D) -> (f64, f64) {
        let mpp = self.meters_per_pixel;
        let (s, c) = pose.theta.sin_cos();
        let x0 = self.grid.x0() as f64 * mpp - 0.5 * mpp;
        let y0 = self.grid.y0() as f64 * mpp - 0.5 * mpp;

        let mut raw = 0i64;
        for p in self.points {
            let (px, py) = (p.x as f64, p.y as f64);
            let tx = px * c - py * s + pose.x;
            let ty = px * s + py * c + pose.y;
            // floor rejects small negatives that a cast would send to 0
            let ix = ((tx - x0) / mpp).floor();
            let iy = ((ty - y0) / mpp).floor();
            if ix < 0.0 || iy < 0.0 || ix > i32::MAX as f64 || iy > i32::MAX as f64 {
                continue;
            }
            if let Some(v) = self.grid.get_checked(ix as i32, iy as i32) {
                raw += v as i64;
            }
        }

        let penalty = self.prior.map_or(0.0, |prior| prior.penalty(pose));
        (self.scale * raw as f64 - penalty, penalty)
    }
}
