//! Pyramid and search configuration sections.

use serde::{Deserialize, Serialize};

use crate::core::Pose2D;
use crate::search::SearchRequest;

use super::defaults;

/// Cost pyramid settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PyramidSection {
    /// Number of levels including full resolution
    #[serde(default = "defaults::pyramid_levels")]
    pub levels: usize,
}

impl Default for PyramidSection {
    fn default() -> Self {
        Self {
            levels: defaults::pyramid_levels(),
        }
    }
}

/// Search window settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchSection {
    /// Half-width of the translation window around the estimate (meters)
    #[serde(default = "defaults::translation_window")]
    pub translation_window: f64,

    /// Half-width of the rotation window around the estimate (radians)
    #[serde(default = "defaults::rotation_window")]
    pub rotation_window: f64,

    /// Spacing of rotation samples (radians)
    #[serde(default = "defaults::rotation_step")]
    pub rotation_step: f64,

    /// Score cutoff applied before the prior penalty
    #[serde(default = "defaults::min_score")]
    pub min_score: f64,

    /// Scale raw scores by 1 / number of scan points
    #[serde(default = "defaults::enabled")]
    pub scale_by_point_count: bool,
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            translation_window: defaults::translation_window(),
            rotation_window: defaults::rotation_window(),
            rotation_step: defaults::rotation_step(),
            min_score: defaults::min_score(),
            scale_by_point_count: defaults::enabled(),
        }
    }
}

impl SearchSection {
    /// Request covering this section's windows around `estimate`.
    ///
    /// Translation bounds are widened outward to whole pixels.
    pub fn request_around(&self, estimate: Pose2D, meters_per_pixel: f32, num_points: usize) -> SearchRequest {
        let mpp = meters_per_pixel as f64;
        let lo = |c: f64| ((c - self.translation_window) / mpp).floor() as i32;
        let hi = |c: f64| ((c + self.translation_window) / mpp).ceil() as i32;

        let scale = if self.scale_by_point_count && num_points > 0 {
            1.0 / num_points as f64
        } else {
            1.0
        };

        SearchRequest::new(lo(estimate.x), hi(estimate.x), lo(estimate.y), hi(estimate.y))
            .with_rotation(
                estimate.theta - self.rotation_window,
                estimate.theta + self.rotation_window,
                self.rotation_step,
            )
            .with_scale(scale)
            .with_min_score(self.min_score)
    }
}
