//! Configuration loading for vastu-match.
//!
//! All parameters come from a single YAML file with defaults for every key.
//! The library never reads files on its own; callers load a [`MatchConfig`]
//! and pass sections to the matchers.
//!
//! ## Configuration Sections
//!
//! | Section | Description |
//! |---------|-------------|
//! | [`PyramidSection`] | Number of pyramid levels |
//! | [`SearchSection`] | Translation/rotation windows, cutoff, score scaling |
//! | [`HillClimbParams`](crate::refine::HillClimbParams) | Step sizes and shrink schedule |
//! | [`IcpParams`](crate::refine::IcpParams) | Correspondence ratio and stopping rules |
//!
//! ## Example YAML
//!
//! ```yaml
//! pyramid:
//!   levels: 8
//! search:
//!   translation_window: 1.0   # meters
//!   rotation_window: 0.35     # radians
//!   rotation_step: 0.0175
//!   min_score: -100.0
//! hill_climb:
//!   step_x: 0.015
//!   step_y: 0.015
//!   shrink_factor: 0.5
//! icp:
//!   max_dist_ratio: 2.0
//!   max_iterations: 100
//! ```

mod defaults;
mod match_config;
mod sections;

pub use match_config::MatchConfig;
pub use sections::{PyramidSection, SearchSection};
