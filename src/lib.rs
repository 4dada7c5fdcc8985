//! # VastuMatch
//!
//! Correlative 2D scan matching: find the rigid transform that best aligns a
//! laser scan with a rasterized cost model, then refine it below the pixel.
//!
//! ## Overview
//!
//! - **Cost pyramid** ([`CostPyramid`]): max-decimated copies of the model so
//!   coarse scores bound fine ones
//! - **Point cache** ([`QuantizedPointCache`]): the scan rotated and merged per
//!   (resolution, rotation, level), built on demand
//! - **Branch-and-bound search** ([`SearchEngine`]): best-first expansion of
//!   translation blocks and rotation samples, with an optional Gaussian prior
//! - **Refinement**: [`hill_climb`] against the model, or symmetric [`icp`]
//!   between two scans
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use vastu_match::{CostGrid, CostPyramid, QuantizedPointCache, SearchEngine, SearchRequest};
//!
//! let pyramid = CostPyramid::build(model, 0.05, 8);
//! let cache = QuantizedPointCache::new(scan_points);
//!
//! let mut engine = SearchEngine::new();
//! engine.add(&cache, &pyramid, SearchRequest::around(0, 0, 40).with_rotation(-0.3, 0.3, 0.0175));
//!
//! if let Some(best) = engine.next() {
//!     let refined = hill_climb(&cache, &pyramid, best.pose, &HillClimbParams::for_resolution(0.05), 1.0, None);
//!     println!("{:?} score {}", refined.pose, refined.score);
//! }
//! ```
//!
//! ## Coordinate System
//!
//! - Model pixel `(ix, iy)` of a grid with origin `(x0, y0)` sits at
//!   `((x0 + ix) * mpp, (y0 + iy) * mpp)` meters
//! - Theta: radians, counter-clockwise positive from +X
//! - Reported poses include the -0.5 cell correction for point flooring

#![warn(missing_docs)]

// Core types
pub mod core;

// Errors
pub mod error;

// Configuration
pub mod config;

// Multi-resolution model
pub mod pyramid;

// Observed scans
pub mod points;

// Gaussian prior
pub mod prior;

// Branch-and-bound search
pub mod search;

// Refiners
pub mod refine;

pub use crate::core::{CostGrid, Point2D, Pose2D};
pub use config::MatchConfig;
pub use error::{Error, Result};
pub use points::{QuantizedPointCache, QuantizedPointSet, points_from_grid};
pub use prior::{GaussianPrior, Rect, min_quadratic};
pub use pyramid::CostPyramid;
pub use refine::{HillClimbParams, HillClimbResult, IcpParams, IcpResult, hill_climb, icp};
pub use search::{HandleId, SearchEngine, SearchRequest, SearchResult, SearchStats};
