//! Observed scans and their quantized, rotation-specific groupings.
//!
//! The search evaluates the same scan at many rotations and pyramid levels.
//! [`QuantizedPointCache`] owns the scan and memoizes one
//! [`QuantizedPointSet`] per (resolution, rotation, level), where points that
//! fall into the same cell collapse into one weighted entry:
//!
//! ```text
//! level 0:  (3,4)x1 (3,5)x1 (4,5)x1 (9,1)x1
//! level 1:  (1,2)x3          (4,0)x1
//! ```

mod cache;
mod set;

pub use cache::{PointSetKey, QuantizedPointCache};
pub use set::{QuantizedPoint, QuantizedPointSet};

use crate::core::{CostGrid, Point2D};

/// Every cell of `grid` whose value equals `value`, as a point at the cell
/// center in meters.
///
/// `origin` is the metric position of the grid's cell (0, 0) corner. Useful
/// for turning a rasterized scan into a point cloud.
pub fn points_from_grid(
    grid: &CostGrid,
    value: u8,
    origin: (f32, f32),
    meters_per_pixel: f32,
) -> Vec<Point2D> {
    let mut points = Vec::new();
    for iy in 0..grid.height() {
        for ix in 0..grid.width() {
            if grid.get(ix, iy) == value {
                points.push(Point2D::new(
                    origin.0 + (ix as f32 + 0.5) * meters_per_pixel,
                    origin.1 + (iy as f32 + 0.5) * meters_per_pixel,
                ));
            }
        }
    }
    points
}
