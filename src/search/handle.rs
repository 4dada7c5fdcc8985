//! A registered search window and its per-rotation state.

use crate::points::QuantizedPointCache;
use crate::prior::{ConditionedPrior, Rect};
use crate::pyramid::CostPyramid;

use super::request::SearchRequest;

/// Identifies the request a [`SearchResult`](super::SearchResult) came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(pub(crate) usize);

impl HandleId {
    /// Position of the request in registration order.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Borrowed inputs plus everything precomputed once at registration.
#[derive(Debug)]
pub struct SearchHandle<'a> {
    pub(crate) cache: &'a QuantizedPointCache,
    pub(crate) pyramid: &'a CostPyramid,
    pub(crate) request: SearchRequest,
    pub(crate) rotations: Vec<f64>,
    /// One conditioned prior per rotation sample, when a prior was given.
    pub(crate) priors: Option<Vec<ConditionedPrior>>,
}

impl<'a> SearchHandle<'a> {
    pub(crate) fn new(
        cache: &'a QuantizedPointCache,
        pyramid: &'a CostPyramid,
        request: SearchRequest,
    ) -> Self {
        let rotations = request.rotations();
        let priors = request.prior.as_ref().map(|prior| {
            rotations
                .iter()
                .map(|&theta| prior.condition_on_rotation(theta))
                .collect()
        });
        Self {
            cache,
            pyramid,
            request,
            rotations,
            priors,
        }
    }

    /// The request as registered.
    pub fn request(&self) -> &SearchRequest {
        &self.request
    }

    /// Rotation samples in evaluation order.
    pub fn rotations(&self) -> &[f64] {
        &self.rotations
    }

    /// True if block `b` at decimation `d`, covering `[b*d, b*d + d - 1]`,
    /// overlaps `[t0, t1]`.
    #[inline]
    pub(crate) fn block_in_range(b: i32, d: i32, t0: i32, t1: i32) -> bool {
        !(b * d > t1 || b * d + d - 1 < t0)
    }

    /// Raw correlation of the rotated scan against pyramid `level` with the
    /// scan shifted by block (block_x, block_y).
    ///
    /// Points landing outside the grid contribute nothing.
    pub(crate) fn correlate(&self, rotation: usize, level: usize, block_x: i32, block_y: i32) -> i64 {
        let grid = self.pyramid.level(level);
        let points = self
            .cache
            .get(self.pyramid.meters_per_pixel(), self.rotations[rotation], level);
        let d = 1i32 << level;

        // Level origins are multiples of d.
        let off_x = block_x - grid.x0() / d;
        let off_y = block_y - grid.y0() / d;

        let mut sum = 0i64;
        for p in points.cells() {
            if let Some(v) = grid.get_checked(p.x + off_x, p.y + off_y) {
                sum += p.weight as i64 * v as i64;
            }
        }
        sum
    }

    /// Lower bound of the prior penalty over every pose reported from this
    /// block, or 0 without a prior.
    ///
    /// The rectangle is the set of bias-corrected translations
    /// `(t - 0.5) * mpp` for integer `t` in the block, so a level-0 block
    /// evaluates the prior exactly at the pose it reports.
    pub(crate) fn prior_penalty(&self, rotation: usize, level: usize, block_x: i32, block_y: i32) -> f64 {
        let Some(priors) = &self.priors else {
            return 0.0;
        };
        let mpp = self.pyramid.meters_per_pixel() as f64;
        let d = (1i64 << level) as f64;
        let edges = |b: i32| {
            let lo = b as f64 * d;
            ((lo - 0.5) * mpp, (lo + d - 1.5) * mpp)
        };
        let (x0, x1) = edges(block_x);
        let (y0, y1) = edges(block_y);
        priors[rotation].min_penalty(&Rect::new(x0, x1, y0, y1))
    }
}
