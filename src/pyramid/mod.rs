//! Multi-resolution cost pyramid.
//!
//! Level 0 is the caller's model grid. Level k (decimation `D = 2^k`) stores,
//! for each cell, the maximum level-0 value over a `(2D-1) x (2D-1)` window.
//! Any point that lands in a level-k cell lands, after adding any translation
//! inside the cell's `D x D` block, somewhere in that window, so a level-k
//! score never underestimates the score of a finer translation.
//!
//! ## Window layout (one axis, D = 4)
//!
//! ```text
//! base pixels:  . . . . |a b c d e f g| . . .
//!                        ^ D*x + x0_k
//!                        <-- 2D-1 --->
//! level-2 cell x = max(a..g)
//! ```
//!
//! Level origins are pulled back to `D*floor(x0/D) - 2D` and sizes padded by
//! four cells so the windows of every base pixel are represented.

mod decimate;

use log::debug;

use crate::core::CostGrid;

use decimate::{decimate_level, reference_level};

/// Ordered max-decimated grids, finest first.
#[derive(Clone, Debug)]
pub struct CostPyramid {
    levels: Vec<CostGrid>,
    meters_per_pixel: f32,
}

impl CostPyramid {
    /// Build `num_levels` levels incrementally (3x3 max filter + subsample
    /// per level). The base grid becomes level 0.
    pub fn build(base: CostGrid, meters_per_pixel: f32, num_levels: usize) -> Self {
        assert!(num_levels >= 1, "pyramid needs at least one level");
        let mut levels = Vec::with_capacity(num_levels);
        levels.push(base);
        for level in 1..num_levels {
            let next = decimate_level(&levels[level - 1], &levels[0], level);
            levels.push(next);
        }
        debug!(
            "[Pyramid] built {} levels from {}x{} base at {:.3} m/px",
            num_levels,
            levels[0].width(),
            levels[0].height(),
            meters_per_pixel
        );
        Self {
            levels,
            meters_per_pixel,
        }
    }

    /// Build every level by brute force from the base grid.
    ///
    /// Slow; produces the same grids as [`build`](Self::build) and exists to
    /// validate it.
    pub fn build_reference(base: CostGrid, meters_per_pixel: f32, num_levels: usize) -> Self {
        assert!(num_levels >= 1, "pyramid needs at least one level");
        let mut levels = Vec::with_capacity(num_levels);
        for level in 1..num_levels {
            levels.push(reference_level(&base, level));
        }
        levels.insert(0, base);
        Self {
            levels,
            meters_per_pixel,
        }
    }

    /// Grid at `level`. Panics if `level >= num_levels()`.
    #[inline]
    pub fn level(&self, level: usize) -> &CostGrid {
        &self.levels[level]
    }

    /// All levels, finest first.
    #[inline]
    pub fn levels(&self) -> &[CostGrid] {
        &self.levels
    }

    /// Number of levels including the base.
    #[inline]
    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    /// Resolution of level 0.
    #[inline]
    pub fn meters_per_pixel(&self) -> f32 {
        self.meters_per_pixel
    }

    /// True when both pyramids have the same levels, origins and cell values.
    pub fn is_identical(&self, other: &CostPyramid) -> bool {
        self.levels == other.levels
    }
}
