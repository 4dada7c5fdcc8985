//! Default value functions for serde deserialization.

pub fn pyramid_levels() -> usize {
    8
}

pub fn translation_window() -> f64 {
    1.0
}

pub fn rotation_window() -> f64 {
    20f64.to_radians()
}

pub fn rotation_step() -> f64 {
    1f64.to_radians()
}

pub fn min_score() -> f64 {
    -100.0
}

pub fn enabled() -> bool {
    true
}
