//! LEO Conjunction - orbital propagation and collision screening
//!
//! Propagates Two-Line Element sets with a J2 secular model and flags pairs
//! of tracked objects that come within a distance threshold.

pub mod api;
pub mod collision;
pub mod ephemeris;
pub mod physics;
pub mod prediction;
pub mod time;
pub mod tle;
pub mod types;

#[cfg(test)]
pub mod test_utils;
