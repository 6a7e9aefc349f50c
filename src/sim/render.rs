//! Per-tick render description handed to the external renderer

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{GameEvent, ScoreState};

/// RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Same color with alpha scaled by `t` in [0, 1]
    pub fn faded(self, t: f32) -> Self {
        Self {
            a: (t.clamp(0.0, 1.0) * 255.0) as u8,
            ..self
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::rgb(255, 255, 255)
    }
}

/// A single draw primitive in playfield pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCmd {
    Rect { pos: Vec2, size: Vec2, color: Color },
    Circle { center: Vec2, radius: f32, color: Color },
    Line { from: Vec2, to: Vec2, color: Color },
}

/// Score and status overlay
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Hud {
    pub score: ScoreState,
    /// Opponent points (paddle games only)
    pub opponent_score: Option<u32>,
    /// Fraction of the current pose window elapsed (rhythm only)
    pub progress: Option<f32>,
    /// Name of the pose to match (rhythm only)
    pub caption: Option<String>,
    /// Current pose is matched (rhythm only)
    pub matched: bool,
    /// Waiting for a serve (pickleball only)
    pub waiting: bool,
}

/// Everything the renderer and audio sinks need from one tick
#[derive(Debug, Clone, Default, Serialize)]
pub struct RenderState {
    pub hud: Hud,
    pub shapes: Vec<DrawCmd>,
    pub events: Vec<GameEvent>,
}

impl RenderState {
    pub fn rect(&mut self, pos: Vec2, size: Vec2, color: Color) {
        self.shapes.push(DrawCmd::Rect { pos, size, color });
    }

    pub fn circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.shapes.push(DrawCmd::Circle {
            center,
            radius,
            color,
        });
    }

    pub fn line(&mut self, from: Vec2, to: Vec2, color: Color) {
        self.shapes.push(DrawCmd::Line { from, to, color });
    }
}
