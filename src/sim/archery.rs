//! Archery: a single arrow under gravity against a fixed ringed target
//!
//! The bow sits at a fixed x and follows the aim height. A draw gesture
//! builds power; its release launches the arrow horizontally.

use glam::Vec2;

use super::collision::ring_band;
use super::render::{Color, RenderState};
use super::state::{Arrow, GameEvent, GameKind, ScoreState};
use super::tick::{AxisControl, Simulation, TickInput};
use crate::input::DrawGesture;
use crate::settings::Settings;

/// Ring radii, outer to inner
pub const RINGS: [f32; 5] = [60.0, 48.0, 36.0, 24.0, 12.0];
/// Points for each ring band, outer to inner
pub const RING_SCORES: [u32; 5] = [20, 40, 60, 80, 100];
pub const GRAVITY: f32 = 0.3;
/// Launch speed at full draw
pub const MAX_LAUNCH_SPEED: f32 = 20.0;
/// Arrows launch from this x
pub const BOW_X: f32 = 100.0;
/// Target centre distance from the right edge
pub const TARGET_INSET: f32 = 150.0;
/// Aim stays this far from the top and bottom
pub const AIM_MARGIN: f32 = 50.0;
const GROUND_HEIGHT: f32 = 100.0;
const ARROW_LENGTH: f32 = 40.0;

/// Points for an arrow landing `dist` pixels from the target centre
pub fn score_for_distance(dist: f32) -> Option<u32> {
    ring_band(dist, &RINGS).map(|band| RING_SCORES[band])
}

/// Bow-and-target game state
pub struct ArcherySim {
    width: f32,
    height: f32,
    arrows_per_round: u32,
    ring_colors: [Color; 5],
    bow_color: Color,
    string_color: Color,
    ground_color: Color,
    tip_color: Color,
    pub target: Vec2,
    pub arrow: Arrow,
    pub aim_y: f32,
    pub arrows_left: u32,
    pub gesture: DrawGesture,
    pub score: ScoreState,
}

impl ArcherySim {
    pub fn new(settings: &Settings) -> Self {
        let width = settings.playfield.width;
        let height = settings.playfield.height;
        let palette = &settings.palette;
        let arrows = settings.arrows_per_round;
        Self {
            width,
            height,
            arrows_per_round: arrows,
            ring_colors: [
                palette.white,
                palette.black,
                palette.blue,
                palette.red,
                palette.yellow,
            ],
            bow_color: palette.brown,
            string_color: Color::rgb(200, 200, 200),
            ground_color: palette.green,
            tip_color: palette.red,
            target: Vec2::new(width - TARGET_INSET, height / 2.0),
            arrow: Arrow::default(),
            aim_y: height / 2.0,
            arrows_left: arrows,
            gesture: DrawGesture::default(),
            score: ScoreState {
                remaining: Some(arrows),
                ..Default::default()
            },
        }
    }

    /// Launch the arrow from the bow at the current aim with `draw_amount`
    /// power. Returns the launch event, or None if an arrow is already in
    /// flight or none are left.
    pub fn release(&mut self, draw_amount: f32) -> Option<GameEvent> {
        if self.arrow.flying || self.arrows_left == 0 {
            return None;
        }
        let vel = Vec2::new(draw_amount.clamp(0.0, 1.0) * MAX_LAUNCH_SPEED, 0.0);
        self.arrow = Arrow {
            pos: Vec2::new(BOW_X, self.aim_y),
            vel,
            flying: true,
        };
        self.arrows_left = self.arrows_left.saturating_sub(1);
        self.score.remaining = Some(self.arrows_left);
        log::debug!("Arrow loosed at {:?} ({} left)", vel, self.arrows_left);
        Some(GameEvent::ArrowLoosed { vel })
    }

    fn aim(&mut self, axis: AxisControl) {
        match axis {
            AxisControl::Track(y) => self.aim_y = y,
            AxisControl::Nudge(dy) => self.aim_y += dy,
            AxisControl::Hold => {}
        }
        self.aim_y = self.aim_y.clamp(AIM_MARGIN, self.height - AIM_MARGIN);
    }

    fn advance_arrow(&mut self, events: &mut Vec<GameEvent>) {
        if !self.arrow.flying {
            return;
        }
        self.arrow.pos.x += self.arrow.vel.x;
        self.arrow.vel.y += GRAVITY;
        self.arrow.pos.y += self.arrow.vel.y;

        let dist = self.arrow.pos.distance(self.target);
        if let Some(points) = score_for_distance(dist) {
            self.arrow.flying = false;
            self.score.add(points);
            events.push(GameEvent::ArrowScored { points });
            return;
        }

        let pos = self.arrow.pos;
        if pos.x > self.width || pos.x < 0.0 || pos.y > self.height || pos.y < 0.0 {
            self.arrow.flying = false;
            events.push(GameEvent::ArrowMissed);
        }
    }

    fn render(&self, events: Vec<GameEvent>) -> RenderState {
        let mut out = RenderState {
            events,
            ..Default::default()
        };
        out.hud.score = self.score.clone();

        out.rect(
            Vec2::new(0.0, self.height - GROUND_HEIGHT),
            Vec2::new(self.width, GROUND_HEIGHT),
            self.ground_color,
        );
        for (radius, color) in RINGS.iter().zip(self.ring_colors) {
            out.circle(self.target, *radius, color);
        }

        if self.arrow.flying {
            let heading = self.arrow.angle();
            let tail = self.arrow.pos - Vec2::from_angle(heading) * ARROW_LENGTH;
            out.line(self.arrow.pos, tail, self.bow_color);
            out.circle(self.arrow.pos, 4.0, self.tip_color);
        } else {
            out.rect(
                Vec2::new(70.0, self.aim_y - 50.0),
                Vec2::new(10.0, 100.0),
                self.bow_color,
            );
            if self.gesture.drawing {
                let nock = Vec2::new(BOW_X - self.gesture.amount * 50.0, self.aim_y);
                out.line(Vec2::new(75.0, self.aim_y - 50.0), nock, self.string_color);
                out.line(Vec2::new(75.0, self.aim_y + 50.0), nock, self.string_color);
            }
        }
        out
    }
}

impl Simulation for ArcherySim {
    fn kind(&self) -> GameKind {
        GameKind::Archery
    }

    fn reset(&mut self) {
        self.arrow = Arrow::default();
        self.aim_y = self.height / 2.0;
        self.arrows_left = self.arrows_per_round;
        self.gesture = DrawGesture::default();
        self.score = ScoreState {
            remaining: Some(self.arrows_per_round),
            ..Default::default()
        };
    }

    fn step(&mut self, input: &TickInput) -> RenderState {
        let mut events = Vec::new();

        self.aim(input.axis);
        if let Some(amount) =
            self.gesture
                .update(&input.draw, self.arrow.flying, self.arrows_left)
        {
            events.extend(self.release(amount));
        }
        self.advance_arrow(&mut events);

        self.render(events)
    }

    fn score(&self) -> &ScoreState {
        &self.score
    }

    fn is_over(&self) -> bool {
        self.arrows_left == 0 && !self.arrow.flying
    }
}
