//! Core types for scan matching.
//!
//! - [`Point2D`]: observed scan point in meters
//! - [`Pose2D`]: rigid transform (match result, refinement seed)
//! - [`CostGrid`]: byte-valued model raster with a pixel origin
//! - [`math`]: angle wrapping and floor division

mod grid;
pub mod math;
mod point;
mod pose;

pub use grid::CostGrid;
pub use math::{angle_diff, floor_div, normalize_angle, sq};
pub use point::Point2D;
pub use pose::Pose2D;
