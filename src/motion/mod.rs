//! Motion estimation
//!
//! Turns camera frames into a normalized, smoothed [`PoseSignal`]. Nothing in
//! here knows about games; the input layer maps the signal onto controls.

pub mod estimator;
pub mod frame_diff;
pub mod heatmap;

pub use estimator::{EstimatorMode, MotionEstimator, PoseSignal, Tracking};
pub use heatmap::{Heatmap, Peak, PoseModel};
