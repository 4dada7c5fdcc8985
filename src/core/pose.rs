//! Rigid 2D transform used for match results and refinement seeds.

use serde::{Deserialize, Serialize};

use super::math::normalize_angle;
use super::point::Point2D;

/// Rigid transform in the plane.
///
/// Position (x, y) in meters and heading (theta) in radians. Poses are kept
/// in f64 because search results are exact multiples of the grid resolution
/// and refiners accumulate many small steps.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose2D {
    /// X translation in meters
    pub x: f64,
    /// Y translation in meters
    pub y: f64,
    /// Rotation in radians
    pub theta: f64,
}

impl Pose2D {
    /// Create a new pose. Theta is stored as given.
    #[inline]
    pub fn new(x: f64, y: f64, theta: f64) -> Self {
        Self { x, y, theta }
    }

    /// Identity transform.
    #[inline]
    pub fn identity() -> Self {
        Self::default()
    }

    /// Copy of this pose with theta wrapped to [-π, π).
    #[inline]
    pub fn normalized(&self) -> Self {
        Self::new(self.x, self.y, normalize_angle(self.theta))
    }

    /// Compose two poses: self ⊕ other
    ///
    /// ```text
    /// C = A ⊕ B:
    ///   C.x = A.x + B.x * cos(A.θ) - B.y * sin(A.θ)
    ///   C.y = A.y + B.x * sin(A.θ) + B.y * cos(A.θ)
    ///   C.θ = normalize(A.θ + B.θ)
    /// ```
    #[inline]
    pub fn compose(&self, other: &Pose2D) -> Pose2D {
        let (s, c) = self.theta.sin_cos();
        Pose2D::new(
            self.x + other.x * c - other.y * s,
            self.y + other.x * s + other.y * c,
            normalize_angle(self.theta + other.theta),
        )
    }

    /// Inverse of this pose.
    #[inline]
    pub fn inverse(&self) -> Pose2D {
        let (s, c) = self.theta.sin_cos();
        Pose2D::new(
            -self.x * c - self.y * s,
            self.x * s - self.y * c,
            normalize_angle(-self.theta),
        )
    }

    /// Apply this transform to a point.
    #[inline]
    pub fn transform_point(&self, point: &Point2D) -> Point2D {
        let (s, c) = self.theta.sin_cos();
        let (px, py) = (point.x as f64, point.y as f64);
        Point2D::new(
            (self.x + px * c - py * s) as f32,
            (self.y + px * s + py * c) as f32,
        )
    }
}
