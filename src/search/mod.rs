//! Branch-and-bound correlative search.
//!
//! Each queued node is a square block of `2^k x 2^k` pixel translations at
//! one rotation, scored by correlating the scan (quantized to level k)
//! against pyramid level k. Because level k stores window maxima, that score
//! bounds every translation inside the block, so popping the best node and
//! splitting it into four children reaches the best pixel-exact match first.
//!
//! ```text
//!   level 3            level 2              level 1       level 0
//! ┌───────────┐     ┌─────┬─────┐        ┌──┬──┐
//! │           │ ──► │ 41  │ 37  │  ──►   │41│29│   ...   pose + score
//! │    +inf   │     ├─────┼─────┤        ├──┼──┤
//! │           │     │ 12  │  -  │        │33│40│
//! └───────────┘     └─────┴─────┘        └──┴──┘
//!                      (pruned: outside window or under cutoff)
//! ```
//!
//! A Gaussian prior is folded in by conditioning it once per rotation and
//! subtracting a lower bound of its penalty over each child's translation
//! block, which keeps every child at or below its parent.
//!
//! ## Bias
//!
//! Points are floored to cells, which shifts them by -0.5 cell on average.
//! Reported poses are `(block - 0.5) * meters_per_pixel` to undo that. Models
//! are assumed to be rendered without bias; otherwise the caller adds its own
//! correction.

mod engine;
mod handle;
mod node;
mod request;

pub use engine::{SearchEngine, SearchResult, SearchStats};
pub use handle::{HandleId, SearchHandle};
pub use request::SearchRequest;
