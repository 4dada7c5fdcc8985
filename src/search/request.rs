//! Search request parameters.

use crate::prior::GaussianPrior;

/// Tolerance when counting rotation samples, so a range that is an exact
/// multiple of the step includes its upper end.
const ROTATION_COUNT_EPS: f64 = 1e-9;

/// One search window registered with a [`SearchEngine`](super::SearchEngine).
///
/// Translation bounds are inclusive, in full-resolution pixels. Rotations are
/// sampled at `rotation_min + i * rotation_step` up to `rotation_max`.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchRequest {
    /// Minimum x translation (pixels)
    pub tx0: i32,
    /// Maximum x translation (pixels)
    pub tx1: i32,
    /// Minimum y translation (pixels)
    pub ty0: i32,
    /// Maximum y translation (pixels)
    pub ty1: i32,
    /// First rotation sample (radians)
    pub rotation_min: f64,
    /// Last admissible rotation (radians)
    pub rotation_max: f64,
    /// Spacing between rotation samples (radians)
    pub rotation_step: f64,
    /// Multiplier applied to the raw correlation score
    pub scale: f64,
    /// Optional prior; its penalty is subtracted from the scaled score
    pub prior: Option<GaussianPrior>,
    /// Children whose scaled score (before the prior penalty) falls below
    /// this are dropped
    pub min_score: f64,
}

impl SearchRequest {
    /// Translation-only request at rotation 0, scale 1, no prior, no cutoff.
    pub fn new(tx0: i32, tx1: i32, ty0: i32, ty1: i32) -> Self {
        Self {
            tx0,
            tx1,
            ty0,
            ty1,
            rotation_min: 0.0,
            rotation_max: 0.0,
            rotation_step: 0.0,
            scale: 1.0,
            prior: None,
            min_score: f64::NEG_INFINITY,
        }
    }

    /// Square window of `radius` pixels around (cx, cy).
    pub fn around(cx: i32, cy: i32, radius: i32) -> Self {
        Self::new(cx - radius, cx + radius, cy - radius, cy + radius)
    }

    /// Set the rotation range and step.
    pub fn with_rotation(mut self, min: f64, max: f64, step: f64) -> Self {
        self.rotation_min = min;
        self.rotation_max = max;
        self.rotation_step = step;
        self
    }

    /// Set the score scale.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Attach a prior.
    pub fn with_prior(mut self, prior: GaussianPrior) -> Self {
        self.prior = Some(prior);
        self
    }

    /// Set the pre-penalty score cutoff.
    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score;
        self
    }

    /// Rotation samples, computed by index so there is no accumulated drift.
    ///
    /// Panics on an inverted range or a non-positive step over a non-empty
    /// range.
    pub fn rotations(&self) -> Vec<f64> {
        assert!(
            self.rotation_max >= self.rotation_min,
            "rotation range inverted: {} > {}",
            self.rotation_min,
            self.rotation_max
        );
        let span = self.rotation_max - self.rotation_min;
        if span == 0.0 {
            return vec![self.rotation_min];
        }
        assert!(
            self.rotation_step > 0.0,
            "rotation step must be positive, got {}",
            self.rotation_step
        );
        let count = (span / self.rotation_step + ROTATION_COUNT_EPS).floor() as usize + 1;
        (0..count)
            .map(|i| self.rotation_min + i as f64 * self.rotation_step)
            .collect()
    }
}
