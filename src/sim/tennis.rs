//! Tennis: one ball rallied between two hit zones near the side edges
//!
//! Rackets are tracked by their centre Y. A return is only possible while the
//! ball travels toward that racket, which rules out double hits.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::render::{Color, RenderState};
use super::state::{Ball, GameEvent, GameKind, ScoreState, Side, session_rng};
use super::tick::{AxisControl, Simulation, TickInput};
use crate::settings::Settings;

pub const BALL_RADIUS: f32 = 15.0;
pub const SERVE_SPEED: f32 = 8.0;
/// Serve `vy` is drawn from `[-SERVE_SPREAD, SERVE_SPREAD)`
pub const SERVE_SPREAD: f32 = 3.0;
/// Ball reflects off lines this far from the top and bottom
pub const WALL_INSET: f32 = 30.0;
/// Rackets stay this far from the top and bottom
pub const RACKET_INSET: f32 = 50.0;
/// Width of each hit zone measured from its edge
pub const HIT_ZONE: f32 = 80.0;
/// Maximum vertical offset between ball and racket centre for a hit
pub const HIT_REACH: f32 = 60.0;
pub const PLAYER_BOOST: f32 = 1.05;
pub const AI_BOOST: f32 = 1.02;
pub const PLAYER_SPIN: f32 = 0.1;
pub const AI_SPIN: f32 = 0.08;
/// Fraction of the remaining gap the AI closes each tick
pub const AI_LAG: f32 = 0.05;
const RACKET_SIZE: Vec2 = Vec2::new(20.0, 80.0);
const RACKET_EDGE: f32 = 30.0;

/// Tennis game state
pub struct TennisSim {
    width: f32,
    height: f32,
    player_color: Color,
    ai_color: Color,
    ball_color: Color,
    line_color: Color,
    pub ball: Ball,
    /// Ball is heading toward the AI side
    pub going_right: bool,
    pub player_y: f32,
    pub ai_y: f32,
    pub score: ScoreState,
    pub opponent_score: u32,
    rng: Pcg32,
}

impl TennisSim {
    pub fn new(settings: &Settings, seed: u64) -> Self {
        let width = settings.playfield.width;
        let height = settings.playfield.height;
        let mut sim = Self {
            width,
            height,
            player_color: settings.palette.blue,
            ai_color: settings.palette.red,
            ball_color: settings.palette.yellow,
            line_color: settings.palette.white,
            ball: Ball::new(Vec2::new(width / 2.0, height / 2.0), BALL_RADIUS),
            going_right: false,
            player_y: height / 2.0,
            ai_y: height / 2.0,
            score: ScoreState::default(),
            opponent_score: 0,
            rng: session_rng(seed, GameKind::Tennis),
        };
        sim.serve_toward(Side::Left);
        sim
    }

    /// Put the ball in play from the far end, heading toward `receiver`
    pub fn serve_toward(&mut self, receiver: Side) {
        let to_player = receiver == Side::Left;
        self.ball.pos = Vec2::new(
            if to_player { self.width - 100.0 } else { 100.0 },
            self.height / 2.0,
        );
        self.ball.vel = Vec2::new(
            if to_player { -SERVE_SPEED } else { SERVE_SPEED },
            self.rng.random_range(-SERVE_SPREAD..SERVE_SPREAD),
        );
        self.going_right = !to_player;
    }

    fn clamp_racket(&self, y: f32) -> f32 {
        y.clamp(RACKET_INSET, self.height - RACKET_INSET)
    }

    fn advance(&mut self, events: &mut Vec<GameEvent>) {
        if self.going_right {
            self.ai_y += (self.ball.pos.y - self.ai_y) * AI_LAG;
        }
        self.ai_y = self.clamp_racket(self.ai_y);

        self.ball.pos += self.ball.vel;

        let (top, bottom) = (WALL_INSET, self.height - WALL_INSET);
        if self.ball.pos.y < top {
            self.ball.vel.y = self.ball.vel.y.abs();
            self.ball.pos.y = top;
        } else if self.ball.pos.y > bottom {
            self.ball.vel.y = -self.ball.vel.y.abs();
            self.ball.pos.y = bottom;
        }

        if !self.going_right
            && self.ball.pos.x < HIT_ZONE
            && (self.ball.pos.y - self.player_y).abs() < HIT_REACH
        {
            self.ball.vel.x = self.ball.vel.x.abs() * PLAYER_BOOST;
            self.ball.vel.y = (self.ball.pos.y - self.player_y) * PLAYER_SPIN;
            self.going_right = true;
            events.push(GameEvent::PaddleHit { side: Side::Left });
        }
        if self.going_right
            && self.ball.pos.x > self.width - HIT_ZONE
            && (self.ball.pos.y - self.ai_y).abs() < HIT_REACH
        {
            self.ball.vel.x = -self.ball.vel.x.abs() * AI_BOOST;
            self.ball.vel.y = (self.ball.pos.y - self.ai_y) * AI_SPIN;
            self.going_right = false;
            events.push(GameEvent::PaddleHit { side: Side::Right });
        }

        if self.ball.pos.x < 0.0 {
            self.opponent_score += 1;
            events.push(GameEvent::Point { side: Side::Right });
            self.serve_toward(Side::Left);
        } else if self.ball.pos.x > self.width {
            self.score.add(1);
            events.push(GameEvent::Point { side: Side::Left });
            self.serve_toward(Side::Right);
        }
    }

    fn render(&self, events: Vec<GameEvent>) -> RenderState {
        let mut out = RenderState {
            events,
            ..Default::default()
        };
        out.hud.score = self.score.clone();
        out.hud.opponent_score = Some(self.opponent_score);

        let (w, h) = (self.width, self.height);
        out.line(Vec2::new(w / 2.0, 0.0), Vec2::new(w / 2.0, h), self.line_color);
        out.line(Vec2::new(0.0, WALL_INSET), Vec2::new(w, WALL_INSET), self.line_color);
        out.line(
            Vec2::new(0.0, h - WALL_INSET),
            Vec2::new(w, h - WALL_INSET),
            self.line_color,
        );

        let half = RACKET_SIZE.y / 2.0;
        out.rect(
            Vec2::new(RACKET_EDGE, self.player_y - half),
            RACKET_SIZE,
            self.player_color,
        );
        out.rect(
            Vec2::new(w - RACKET_EDGE - RACKET_SIZE.x, self.ai_y - half),
            RACKET_SIZE,
            self.ai_color,
        );
        out.circle(self.ball.pos, self.ball.radius, self.ball_color);
        out
    }
}

impl Simulation for TennisSim {
    fn kind(&self) -> GameKind {
        GameKind::Tennis
    }

    fn reset(&mut self) {
        self.score = ScoreState::default();
        self.opponent_score = 0;
        self.player_y = self.height / 2.0;
        self.ai_y = self.height / 2.0;
        self.serve_toward(Side::Left);
    }

    fn step(&mut self, input: &TickInput) -> RenderState {
        let mut events = Vec::new();

        match input.axis {
            AxisControl::Track(y) => self.player_y = y,
            AxisControl::Nudge(dy) => self.player_y += dy,
            AxisControl::Hold => {}
        }
        self.player_y = self.clamp_racket(self.player_y);

        self.advance(&mut events);
        self.render(events)
    }

    fn score(&self) -> &ScoreState {
        &self.score
    }
}
