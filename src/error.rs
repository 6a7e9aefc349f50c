//! Error types
//!
//! None of these are fatal inside a simulation tick. Estimator errors demote
//! the estimator to its fallback; settings errors fall back to defaults.

use thiserror::Error;

/// Failures from the pose model path
#[derive(Debug, Error)]
pub enum EstimatorError {
    #[error("pose model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("pose model inference failed: {0}")]
    Inference(String),

    #[error("pose model output has no heatmap channel {0}")]
    MissingJoint(usize),
}

/// Failures loading a settings file
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid settings: {0}")]
    Invalid(String),
}
