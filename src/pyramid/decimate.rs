//! Level construction for [`CostPyramid`](super::CostPyramid).

use crate::core::{CostGrid, floor_div};

/// Geometry of pyramid level `level` for a base grid.
///
/// The origin is pulled back by `2D` so that every cell's `(2D-1)`-wide
/// window of base pixels fits, and the size gains four cells of slack.
pub(super) fn level_geometry(base: &CostGrid, level: usize) -> (i32, i32, usize, usize) {
    let d = 1i32 << level;
    let x0 = d * floor_div(base.x0(), d) - 2 * d;
    let y0 = d * floor_div(base.y0(), d) - 2 * d;
    let width = base.width() / d as usize + 4;
    let height = base.height() / d as usize + 4;

    assert!(x0 + 2 * d - 2 <= base.x0(), "level {} misses left edge", level);
    assert!(y0 + 2 * d - 2 <= base.y0(), "level {} misses top edge", level);
    assert!(
        x0 as i64 + (width as i64) * d as i64 - 1 >= base.x0() as i64 + base.width() as i64 - 1,
        "level {} misses right edge",
        level
    );
    assert!(
        y0 as i64 + (height as i64) * d as i64 - 1 >= base.y0() as i64 + base.height() as i64 - 1,
        "level {} misses bottom edge",
        level
    );

    (x0, y0, width, height)
}

/// Build level `level` from level `level - 1` with a 3x3 max filter and a
/// factor-2 subsample.
///
/// The window for output (x, y) starts at previous-level cell
/// `(2x - pad_x, 2y - pad_y)`, where the pads absorb the difference between
/// the two origins. Cells outside the previous grid read as zero.
pub(super) fn decimate_level(prev: &CostGrid, base: &CostGrid, level: usize) -> CostGrid {
    let (x0, y0, width, height) = level_geometry(base, level);
    let half = 1i32 << (level - 1);
    let pad_x = (prev.x0() - x0) / half;
    let pad_y = (prev.y0() - y0) / half;

    CostGrid::from_fn(width, height, x0, y0, |x, y| {
        let mut max = 0u8;
        for dy in 0..3 {
            let iy = 2 * y as i32 - pad_y + dy;
            for dx in 0..3 {
                let ix = 2 * x as i32 - pad_x + dx;
                if let Some(v) = prev.get_checked(ix, iy) {
                    max = max.max(v);
                }
            }
        }
        max
    })
}

/// Build level `level` directly from the base grid: each cell is the maximum
/// over base pixels `[D*x + x0 - base.x0, .. + 2D - 2]` in each axis.
pub(super) fn reference_level(base: &CostGrid, level: usize) -> CostGrid {
    let (x0, y0, width, height) = level_geometry(base, level);
    let d = 1i32 << level;

    CostGrid::from_fn(width, height, x0, y0, |x, y| {
        let mut max = 0u8;
        for ty in 0..=(2 * d - 2) {
            let py = d * y as i32 + y0 - base.y0() + ty;
            for tx in 0..=(2 * d - 2) {
                let px = d * x as i32 + x0 - base.x0() + tx;
                if let Some(v) = base.get_checked(px, py) {
                    max = max.max(v);
                }
            }
        }
        max
    })
}
