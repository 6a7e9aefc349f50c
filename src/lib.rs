//! Motion Arcade - camera-controlled mini-games
//!
//! Core modules:
//! - `motion`: Frame to control-signal estimation (heatmap model or frame difference)
//! - `input`: Per-game fusion of the pose signal with keyboard/mouse fallback
//! - `sim`: Fixed-tick game simulations (pickleball, tennis, boxing, archery, rhythm)
//! - `session`: Per-tick driver tying camera, estimator, input and simulation together
//! - `platform`: Frame source, manual input and render sink seams
//! - `audio`: Music/effect sink

pub mod audio;
pub mod error;
pub mod input;
pub mod motion;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::{EstimatorError, SettingsError};
pub use session::{Session, TickOutcome};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (~60 Hz)
    pub const SIM_DT: f32 = 0.016;

    /// Logical playfield dimensions
    pub const GAME_WIDTH: f32 = 800.0;
    pub const GAME_HEIGHT: f32 = 600.0;

    /// Camera preview panel (drawn next to the playfield)
    pub const CAM_WIDTH: u32 = 320;
    pub const CAM_HEIGHT: u32 = 240;

    /// Neutral value for every pose coordinate before any estimate exists
    pub const NEUTRAL: f32 = 0.5;
}

/// Clamp a normalized coordinate to [0, 1]
#[inline]
pub fn clamp01(v: f32) -> f32 {
    if v.is_nan() { consts::NEUTRAL } else { v.clamp(0.0, 1.0) }
}

/// Exponential smoothing: blend `sample` into `current` with weight `alpha`
#[inline]
pub fn blend(current: f32, sample: f32, alpha: f32) -> f32 {
    current * (1.0 - alpha) + sample * alpha
}

/// Map a normalized point onto playfield pixels
#[inline]
pub fn to_screen(p: Vec2, width: f32, height: f32) -> Vec2 {
    Vec2::new(p.x * width, p.y * height)
}
