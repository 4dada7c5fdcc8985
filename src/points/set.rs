//! Integer point sets for one (resolution, rotation, level) key.

use std::collections::HashMap;

use crate::core::{Point2D, floor_div};

/// One occupied cell of a quantized scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct QuantizedPoint {
    /// Cell x at the set's level
    pub x: i32,
    /// Cell y at the set's level
    pub y: i32,
    /// Number of scan points merged into this cell
    pub weight: u32,
}

/// A scan rotated, quantized to a pyramid level, and merged by cell.
///
/// Cells are ordered by (y, x) so iteration order does not depend on hashing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuantizedPointSet {
    cells: Vec<QuantizedPoint>,
    total_weight: u32,
}

impl QuantizedPointSet {
    /// Rotate every point by `rotation`, floor to level-0 pixels, then floor
    /// divide by `2^level`.
    ///
    /// The float portion is the same for every level, so a point can never
    /// round differently at a coarse level than at level 0. Flooring leaves a
    /// -0.5 cell bias which the search compensates for when it reports poses.
    ///
    /// With `merge` false every point keeps its own weight-1 entry.
    pub(crate) fn quantize(
        points: &[Point2D],
        meters_per_pixel: f32,
        rotation: f64,
        level: usize,
        merge: bool,
    ) -> Self {
        let (s, c) = rotation.sin_cos();
        let mpp = meters_per_pixel as f64;
        let d = 1i32 << level;

        let cell_of = |p: &Point2D| {
            let (px, py) = (p.x as f64, p.y as f64);
            let x = c * px - s * py;
            let y = s * px + c * py;
            let ix = (x / mpp).floor() as i32;
            let iy = (y / mpp).floor() as i32;
            (floor_div(ix, d), floor_div(iy, d))
        };

        let mut cells: Vec<QuantizedPoint> = if merge {
            let mut counts: HashMap<(i32, i32), u32> = HashMap::with_capacity(points.len());
            for p in points {
                *counts.entry(cell_of(p)).or_insert(0) += 1;
            }
            counts
                .into_iter()
                .map(|((x, y), weight)| QuantizedPoint { x, y, weight })
                .collect()
        } else {
            points
                .iter()
                .map(|p| {
                    let (x, y) = cell_of(p);
                    QuantizedPoint { x, y, weight: 1 }
                })
                .collect()
        };
        cells.sort_by_key(|q| (q.y, q.x));

        let total_weight = cells.iter().map(|q| q.weight).sum();
        debug_assert_eq!(total_weight as usize, points.len());

        Self {
            cells,
            total_weight,
        }
    }

    /// Occupied cells.
    #[inline]
    pub fn cells(&self) -> &[QuantizedPoint] {
        &self.cells
    }

    /// Number of distinct entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True for an empty scan.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Sum of weights; always the number of points in the source scan.
    #[inline]
    pub fn total_weight(&self) -> u32 {
        self.total_weight
    }
}
