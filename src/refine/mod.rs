//! Post-search pose refinement.
//!
//! | Refiner | Input | Uses model | Precision |
//! |---------|-------|------------|-----------|
//! | [`hill_climb`] | scan + pyramid + seed | level 0 | sub-pixel, gradient free |
//! | [`icp`] | two scans + seed | no | continuous, closed form |

mod hill_climb;
mod icp;

pub use hill_climb::{HillClimbParams, HillClimbResult, hill_climb};
pub use icp::{IcpParams, IcpResult, icp};
