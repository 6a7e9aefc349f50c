//! Session settings
//!
//! Everything a component needs at construction (playfield size, colors,
//! estimator tuning) is passed in through this value rather than read from
//! globals. Loaded from a JSON file; every field has a default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{GAME_HEIGHT, GAME_WIDTH, SIM_DT};
use crate::error::SettingsError;
use crate::sim::boxing::SPAWN_MARGIN;
use crate::sim::pickleball::{COURT_MARGIN, PADDLE_HEIGHT};
use crate::sim::render::Color;

/// Playfields must be wider than this to leave room for the boxing spawn band
pub const MIN_PLAYFIELD_WIDTH: f32 = 2.0 * SPAWN_MARGIN;
/// Playfields must be taller than this to fit the pickleball court and paddle
pub const MIN_PLAYFIELD_HEIGHT: f32 = 2.0 * COURT_MARGIN + PADDLE_HEIGHT;

/// Logical playfield size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: GAME_WIDTH,
            height: GAME_HEIGHT,
        }
    }
}

/// Named colors shared by every game's render description
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub white: Color,
    pub black: Color,
    pub yellow: Color,
    pub blue: Color,
    pub red: Color,
    pub orange: Color,
    pub green: Color,
    pub pink: Color,
    pub brown: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            white: Color::rgb(255, 255, 255),
            black: Color::rgb(0, 0, 0),
            yellow: Color::rgb(255, 255, 0),
            blue: Color::rgb(30, 144, 255),
            red: Color::rgb(255, 69, 0),
            orange: Color::rgb(255, 165, 0),
            green: Color::rgb(0, 200, 0),
            pink: Color::rgb(255, 105, 180),
            brown: Color::rgb(139, 69, 19),
        }
    }
}

/// Motion estimator tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorSettings {
    /// Use a pose model when one is supplied
    pub prefer_model: bool,
    /// Minimum heatmap peak for a joint to count
    pub confidence_threshold: f32,
    /// New-sample weight for the model-mode arm height
    pub model_weight: f32,
    /// New-sample weight for the fallback single-signal arm height
    pub single_weight: f32,
    /// New-sample weight for each fallback hand coordinate
    pub dual_weight: f32,
    /// Gaussian blur sigma applied before differencing
    pub blur_sigma: f32,
    /// Absolute difference above which a pixel counts as motion
    pub diff_threshold: u8,
    /// Minimum motion pixels before a centroid is accepted
    pub min_motion_mass: f32,
    /// Elliptical structuring element size (odd)
    pub morph_kernel: u32,
    /// Dilation passes after the single erosion
    pub dilate_iterations: u32,
}

impl Default for EstimatorSettings {
    fn default() -> Self {
        Self {
            prefer_model: true,
            confidence_threshold: 0.1,
            model_weight: 0.3,
            single_weight: 0.2,
            dual_weight: 0.4,
            blur_sigma: 2.0,
            diff_threshold: 40,
            min_motion_mass: 800.0,
            morph_kernel: 5,
            dilate_iterations: 2,
        }
    }
}

/// Camera read policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Consecutive read misses covered by reusing the last frame
    pub max_stale_frames: u32,
    /// Flip frames horizontally so the feed acts as a mirror
    pub mirror: bool,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            max_stale_frames: 3,
            mirror: true,
        }
    }
}

/// Top-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub playfield: Playfield,
    /// Seconds advanced per simulation tick
    pub tick_seconds: f32,
    /// Session RNG seed (None = derive from the clock)
    pub seed: Option<u64>,
    /// Pickleball AI accuracy in [0, 1]
    pub difficulty: f32,
    /// Arrows per archery round
    pub arrows_per_round: u32,
    pub palette: Palette,
    pub estimator: EstimatorSettings,
    pub camera: CameraSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            playfield: Playfield::default(),
            tick_seconds: SIM_DT,
            seed: None,
            difficulty: 0.7,
            arrows_per_round: 10,
            palette: Palette::default(),
            estimator: EstimatorSettings::default(),
            camera: CameraSettings::default(),
        }
    }
}

impl Settings {
    /// Parse and validate settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the engines cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        let Playfield { width, height } = self.playfield;
        // Negated comparisons also reject NaN
        if !(width > MIN_PLAYFIELD_WIDTH && width.is_finite()) {
            return Err(SettingsError::Invalid(format!(
                "playfield width {width} must exceed {MIN_PLAYFIELD_WIDTH}"
            )));
        }
        if !(height > MIN_PLAYFIELD_HEIGHT && height.is_finite()) {
            return Err(SettingsError::Invalid(format!(
                "playfield height {height} must exceed {MIN_PLAYFIELD_HEIGHT}"
            )));
        }
        if !(self.tick_seconds > 0.0 && self.tick_seconds.is_finite()) {
            return Err(SettingsError::Invalid(format!(
                "tick_seconds {} must be positive",
                self.tick_seconds
            )));
        }
        Ok(())
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("{err}; using default settings");
                Self::default()
            }
        }
    }

    /// Resolve the session seed
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0x5eed)
        })
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::sim::{AxisControl, DrawControl, GameKind, TickInput};

    #[test]
    fn test_defaults_match_tuning() {
        let settings = Settings::default();
        assert_eq!(settings.playfield.width, 800.0);
        assert_eq!(settings.playfield.height, 600.0);
        assert!((settings.difficulty - 0.7).abs() < 1e-6);
        assert_eq!(settings.estimator.diff_threshold, 40);
        assert_eq!(settings.arrows_per_round, 10);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings =
            Settings::from_json(r#"{ "seed": 42, "estimator": { "dual_weight": 0.5 } }"#)
                .expect("valid json");
        assert_eq!(settings.seed, Some(42));
        assert!((settings.estimator.dual_weight - 0.5).abs() < 1e-6);
        assert!((settings.estimator.single_weight - 0.2).abs() < 1e-6);
        assert_eq!(settings.camera.max_stale_frames, 3);
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        let err = Settings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_small_playfield_rejected() {
        let err = Settings::from_json(r#"{ "playfield": { "width": 190, "height": 150 } }"#)
            .unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
        let err = Settings::from_json(r#"{ "playfield": { "height": 90 } }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
        let err = Settings::from_json(r#"{ "tick_seconds": 0.0 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_smallest_valid_playfield_runs_every_game() {
        let settings =
            Settings::from_json(r#"{ "seed": 3, "playfield": { "width": 201, "height": 201 } }"#)
                .expect("valid settings");
        for kind in GameKind::ALL {
            let mut sim = crate::sim::create(kind, &settings, 3);
            for tick in 0..400 {
                let t = tick as f32 * 0.1;
                let hand = Vec2::new(100.0 + 100.0 * t.cos(), 100.0 + 100.0 * t.sin());
                sim.step(&TickInput {
                    axis: if tick % 2 == 0 {
                        AxisControl::Track(200.0 * t.sin().abs())
                    } else {
                        AxisControl::Nudge(-10.0)
                    },
                    left_hand: hand,
                    right_hand: hand,
                    draw: DrawControl {
                        pressed: tick % 60 == 0,
                        released: tick % 60 == 30,
                        arm_delta: None,
                    },
                    serve: tick == 0,
                    ..Default::default()
                });
            }
        }
    }

    #[test]
    fn test_missing_file_falls_back() {
        let settings = Settings::load_or_default("/nonexistent/motion-arcade.json");
        assert_eq!(settings.arrows_per_round, 10);
    }
}
