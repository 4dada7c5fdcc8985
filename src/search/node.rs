//! Search node for the branch-and-bound queue.

use std::cmp::Ordering;

/// One hypothesis: a `2^level` pixel square of translations at one rotation.
///
/// Block `(block_x, block_y)` covers full-resolution translations
/// `[block_x * 2^level, (block_x + 1) * 2^level)` (same for y).
#[derive(Clone, Copy, Debug)]
pub(crate) struct SearchNode {
    /// Index of the owning handle in the engine.
    pub handle: usize,
    /// Pyramid level (0 = pixel-exact).
    pub level: usize,
    /// Index into the handle's rotation samples.
    pub rotation: usize,
    pub block_x: i32,
    pub block_y: i32,
    /// Upper bound on the score of every pose under this node.
    pub score: f64,
}

impl SearchNode {
    /// The up to four children one level down. Empty at level 0.
    pub fn children(&self) -> impl Iterator<Item = (i32, i32)> + use<> {
        let (bx, by) = (self.block_x, self.block_y);
        let n = if self.level == 0 { 0 } else { 4 };
        (0..n).map(move |i| (2 * bx + (i & 1), 2 * by + (i >> 1)))
    }
}

// The heap is a max-heap on score.
impl PartialEq for SearchNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SearchNode {}

impl PartialOrd for SearchNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SearchNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score.total_cmp(&other.score)
    }
}
