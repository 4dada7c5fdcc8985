//! Best-first branch-and-bound over translation blocks and rotations.

use std::collections::BinaryHeap;

use log::{debug, trace};

use crate::core::{Pose2D, floor_div};
use crate::points::QuantizedPointCache;
use crate::pyramid::CostPyramid;

use super::handle::{HandleId, SearchHandle};
use super::node::SearchNode;
use super::request::SearchRequest;

/// Relative slack allowed when checking that a child never outscores its
/// parent.
const BOUND_TOLERANCE: f64 = 1e-6;

/// A pixel-exact match.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchResult {
    /// Request that produced this match.
    pub handle: HandleId,
    /// Bias-corrected transform in meters and radians.
    pub pose: Pose2D,
    /// Scaled score minus prior penalty.
    pub score: f64,
}

/// Counters accumulated over the engine's lifetime.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SearchStats {
    /// Nodes popped and split into children.
    pub nodes_expanded: usize,
    /// Children whose correlation was evaluated.
    pub children_scored: usize,
    /// Children dropped for lying outside the window or under the cutoff.
    pub children_pruned: usize,
    /// Level-0 nodes returned to the caller.
    pub results_returned: usize,
    /// Largest amount by which a child scored above its (finite) parent.
    /// Stays at or near zero when the pyramid bound holds.
    pub max_bound_excess: f64,
}

/// Best-first search over any number of registered requests.
///
/// Requests share one priority queue, so [`next`](Iterator::next) always
/// returns the best remaining pixel-exact match across all of them. Results
/// come out in non-increasing score order; keep calling to enumerate runner
/// ups. The engine borrows its inputs, so pyramids and point caches outlive
/// it by construction.
///
/// ```rust,ignore
/// let mut engine = SearchEngine::new();
/// engine.add(&cache, &pyramid, SearchRequest::around(0, 0, 40).with_rotation(-0.3, 0.3, 0.01));
/// if let Some(best) = engine.next() {
///     println!("{:?} scored {}", best.pose, best.score);
/// }
/// ```
#[derive(Debug, Default)]
pub struct SearchEngine<'a> {
    handles: Vec<SearchHandle<'a>>,
    heap: BinaryHeap<SearchNode>,
    stats: SearchStats,
}

impl<'a> SearchEngine<'a> {
    /// Empty engine.
    pub fn new() -> Self {
        Self {
            handles: Vec::new(),
            heap: BinaryHeap::new(),
            stats: SearchStats::default(),
        }
    }

    /// Register a request and seed the queue with one unscored node per
    /// rotation and coarse block.
    ///
    /// The pyramid and cache must use the same meters-per-pixel. Panics on
    /// inverted translation or rotation bounds, a non-positive rotation step
    /// over a non-empty range, or a pyramid with fewer than two levels.
    pub fn add(
        &mut self,
        cache: &'a QuantizedPointCache,
        pyramid: &'a CostPyramid,
        request: SearchRequest,
    ) -> HandleId {
        assert!(request.tx1 >= request.tx0, "tx1 < tx0");
        assert!(request.ty1 >= request.ty0, "ty1 < ty0");
        assert!(
            pyramid.num_levels() >= 2,
            "search needs a pyramid with at least two levels"
        );

        let level = initial_level(&request, pyramid.num_levels() - 1);
        let d = 1i32 << level;

        let id = HandleId(self.handles.len());
        let handle = SearchHandle::new(cache, pyramid, request);
        let req = handle.request();

        let before = self.heap.len();
        for rotation in 0..handle.rotations().len() {
            let mut block_y = floor_div(req.ty0, d);
            while d * block_y <= req.ty1 {
                let mut block_x = floor_div(req.tx0, d);
                while d * block_x <= req.tx1 {
                    self.heap.push(SearchNode {
                        handle: id.0,
                        level,
                        rotation,
                        block_x,
                        block_y,
                        score: f64::INFINITY,
                    });
                    block_x += 1;
                }
                block_y += 1;
            }
        }

        debug!(
            "[Search] handle {}: {} rotations, start level {}, {} seed nodes",
            id.0,
            handle.rotations().len(),
            level,
            self.heap.len() - before
        );

        self.handles.push(handle);
        id
    }

    /// Registered request by id.
    pub fn handle(&self, id: HandleId) -> &SearchHandle<'a> {
        &self.handles[id.0]
    }

    /// Nodes waiting in the queue.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// True once every hypothesis has been returned or pruned.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Counters so far.
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    fn expand(&mut self, parent: SearchNode) {
        let handle = &self.handles[parent.handle];
        let req = handle.request();
        let child_level = parent.level - 1;
        let child_d = 1i32 << child_level;

        trace!(
            "[Search] expand level {} block ({}, {}) rot {:.4} score {:.3}",
            parent.level,
            parent.block_x,
            parent.block_y,
            handle.rotations()[parent.rotation],
            parent.score
        );

        self.stats.nodes_expanded += 1;
        for (block_x, block_y) in parent.children() {
            if !SearchHandle::block_in_range(block_y, child_d, req.ty0, req.ty1)
                || !SearchHandle::block_in_range(block_x, child_d, req.tx0, req.tx1)
            {
                self.stats.children_pruned += 1;
                continue;
            }

            self.stats.children_scored += 1;
            let raw = handle.correlate(parent.rotation, child_level, block_x, block_y);
            let mut score = raw as f64 * req.scale;
            if score < req.min_score {
                self.stats.children_pruned += 1;
                continue;
            }
            score -= handle.prior_penalty(parent.rotation, child_level, block_x, block_y);

            if parent.score.is_finite() {
                let excess = score - parent.score;
                let tolerance = BOUND_TOLERANCE * score.abs().max(parent.score.abs()).max(1.0);
                debug_assert!(
                    excess <= tolerance,
                    "child at level {} scored {} above parent {}",
                    child_level,
                    score,
                    parent.score
                );
                self.stats.max_bound_excess = self.stats.max_bound_excess.max(excess);
            }

            self.heap.push(SearchNode {
                level: child_level,
                block_x,
                block_y,
                score,
                ..parent
            });
        }
    }
}

impl Iterator for SearchEngine<'_> {
    type Item = SearchResult;

    /// Expand the queue until the best remaining node is pixel-exact.
    /// `None` once the search space is exhausted.
    fn next(&mut self) -> Option<SearchResult> {
        while let Some(node) = self.heap.pop() {
            if node.level > 0 {
                self.expand(node);
                continue;
            }

            let handle = &self.handles[node.handle];
            let mpp = handle.pyramid.meters_per_pixel() as f64;
            // Flooring during point quantization applied an unreported
            // -0.5 cell shift.
            let pose = Pose2D::new(
                (node.block_x as f64 - 0.5) * mpp,
                (node.block_y as f64 - 0.5) * mpp,
                handle.rotations()[node.rotation],
            );
            self.stats.results_returned += 1;
            debug!(
                "[Search] result handle {}: ({:.4}, {:.4}, {:.4}) score {:.3}",
                node.handle, pose.x, pose.y, pose.theta, node.score
            );
            return Some(SearchResult {
                handle: HandleId(node.handle),
                pose,
                score: node.score,
            });
        }
        None
    }
}

/// Coarsest level giving a small branching factor over the window, clamped
/// to `[1, max_level]`. A degenerate window starts at level 1.
fn initial_level(request: &SearchRequest, max_level: usize) -> usize {
    let span = (request.tx1 - request.tx0).max(request.ty1 - request.ty0);
    if span <= 1 {
        return 1;
    }
    let level = (span as f64).log2().floor() as i64 - 1;
    level.clamp(1, max_level as i64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_level() {
        let lvl = |span: i32, max| initial_level(&SearchRequest::new(0, span, 0, 0), max);
        assert_eq!(lvl(0, 5), 1);
        assert_eq!(lvl(1, 5), 1);
        assert_eq!(lvl(4, 5), 1);
        assert_eq!(lvl(8, 5), 2);
        assert_eq!(lvl(16, 5), 3);
        assert_eq!(lvl(31, 5), 3);
        assert_eq!(lvl(1000, 5), 5);
        assert_eq!(lvl(1000, 1), 1);
    }
}
