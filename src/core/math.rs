//! Angle and integer grid arithmetic shared by all matchers.
//!
//! Angles are in radians, counter-clockwise positive.

use std::f64::consts::{PI, TAU};

/// Normalize angle to [-π, π).
///
/// # Example
/// ```
/// use vastu_match::core::math::normalize_angle;
/// use std::f64::consts::PI;
///
/// assert!((normalize_angle(3.0 * PI).abs() - PI).abs() < 1e-9);
/// assert!((normalize_angle(PI / 2.0) - PI / 2.0).abs() < 1e-12);
/// assert!((normalize_angle(-PI / 2.0 - 2.0 * PI) + PI / 2.0).abs() < 1e-9);
/// ```
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    let mut a = angle % TAU;
    if a >= PI {
        a -= TAU;
    } else if a < -PI {
        a += TAU;
    }
    a
}

/// Signed shortest rotation from `from` to `to`, in [-π, π).
#[inline]
pub fn angle_diff(from: f64, to: f64) -> f64 {
    normalize_angle(to - from)
}

/// Square of a value.
#[inline]
pub fn sq(x: f64) -> f64 {
    x * x
}

/// Integer division rounding toward negative infinity.
///
/// Cell indices at coarse pyramid levels are obtained by dividing level-0
/// indices by a power of two; truncating division would merge the cells on
/// either side of zero.
///
/// # Example
/// ```
/// use vastu_match::core::math::floor_div;
///
/// assert_eq!(floor_div(7, 4), 1);
/// assert_eq!(floor_div(-1, 4), -1);
/// assert_eq!(floor_div(-4, 4), -1);
/// assert_eq!(floor_div(-5, 4), -2);
/// ```
#[inline]
pub fn floor_div(a: i32, b: i32) -> i32 {
    a.div_euclid(b)
}
