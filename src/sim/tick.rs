//! Fixed-timestep tick interface shared by every game
//!
//! Each game owns its entities and advances them one tick at a time from a
//! fused [`TickInput`]. The session drives whichever game is active.

use glam::Vec2;

use super::render::RenderState;
use super::state::{GameKind, ScoreState};
use crate::consts::SIM_DT;

/// Vertical control for a paddle, racket or bow
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum AxisControl {
    /// No input this tick
    #[default]
    Hold,
    /// Absolute target in playfield pixels (camera)
    Track(f32),
    /// Relative step in pixels (keyboard)
    Nudge(f32),
}

/// Bow draw input for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DrawControl {
    /// Draw key went down this tick
    pub pressed: bool,
    /// Draw key came up this tick
    pub released: bool,
    /// Absolute frame-to-frame change of the arm height (camera only)
    pub arm_delta: Option<f32>,
}

/// Input commands for a single tick
#[derive(Debug, Clone)]
pub struct TickInput {
    /// Seconds this tick advances timers by
    pub dt: f32,
    /// Paddle / racket / aim control
    pub axis: AxisControl,
    /// Left hand in playfield pixels
    pub left_hand: Vec2,
    /// Right hand in playfield pixels
    pub right_hand: Vec2,
    pub draw: DrawControl,
    /// Start play / serve
    pub serve: bool,
}

impl Default for TickInput {
    fn default() -> Self {
        Self {
            dt: SIM_DT,
            axis: AxisControl::Hold,
            left_hand: Vec2::ZERO,
            right_hand: Vec2::ZERO,
            draw: DrawControl::default(),
            serve: false,
        }
    }
}

/// A game simulation advanced one fixed tick at a time
pub trait Simulation {
    fn kind(&self) -> GameKind;

    /// Start over: fresh entities and zeroed score
    fn reset(&mut self);

    /// Advance by one tick and describe the result
    fn step(&mut self, input: &TickInput) -> RenderState;

    fn score(&self) -> &ScoreState;

    /// Round finished (the caller decides what to do about it)
    fn is_over(&self) -> bool {
        false
    }
}
