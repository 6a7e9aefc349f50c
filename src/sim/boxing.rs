//! Boxing: punch timed targets with either hand
//!
//! Targets spawn on a timer into a small pool, count down their lifetime,
//! and break the combo if they expire unhit.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::render::{Color, RenderState};
use super::state::{GameEvent, GameKind, ScoreState, Target, session_rng};
use super::tick::{Simulation, TickInput};
use crate::settings::Settings;

/// Maximum concurrent targets
pub const MAX_TARGETS: usize = 5;
/// Seconds between spawns
pub const SPAWN_INTERVAL: f32 = 1.5;
/// Seconds a target stays up
pub const TARGET_LIFETIME: f32 = 3.0;
/// Radius range (inclusive min, exclusive max)
pub const MIN_RADIUS: u32 = 40;
pub const MAX_RADIUS: u32 = 60;
/// Targets spawn at least this far from every edge
pub const SPAWN_MARGIN: f32 = 100.0;
pub const HIT_POINTS: u32 = 100;
const FIST_RADIUS: f32 = 25.0;

/// Target-punching game state
pub struct BoxingSim {
    width: f32,
    height: f32,
    target_colors: [Color; 3],
    left_color: Color,
    right_color: Color,
    pub targets: Vec<Target>,
    pub spawn_timer: f32,
    pub score: ScoreState,
    rng: Pcg32,
}

impl BoxingSim {
    pub fn new(settings: &Settings, seed: u64) -> Self {
        let palette = &settings.palette;
        Self {
            width: settings.playfield.width,
            height: settings.playfield.height,
            target_colors: [palette.red, palette.orange, palette.yellow],
            left_color: palette.blue,
            right_color: palette.red,
            targets: Vec::with_capacity(MAX_TARGETS),
            spawn_timer: 0.0,
            score: ScoreState::default(),
            rng: session_rng(seed, GameKind::Boxing),
        }
    }

    /// Add a target to the pool if there is room
    pub fn insert_target(&mut self, target: Target) -> bool {
        if self.targets.len() < MAX_TARGETS {
            self.targets.push(target);
            true
        } else {
            false
        }
    }

    fn spawn_random(&mut self) -> Target {
        let x = self.rng.random_range(SPAWN_MARGIN..self.width - SPAWN_MARGIN);
        let y = self.rng.random_range(SPAWN_MARGIN..self.height - SPAWN_MARGIN);
        let radius = self.rng.random_range(MIN_RADIUS..MAX_RADIUS) as f32;
        let color = self.target_colors[self.rng.random_range(0..self.target_colors.len())];
        Target::new(Vec2::new(x, y), radius, TARGET_LIFETIME, color)
    }

    fn update_spawner(&mut self, dt: f32, events: &mut Vec<GameEvent>) {
        self.spawn_timer += dt;
        if self.spawn_timer > SPAWN_INTERVAL && self.targets.len() < MAX_TARGETS {
            let target = self.spawn_random();
            events.push(GameEvent::TargetSpawned { pos: target.pos });
            self.targets.push(target);
            self.spawn_timer = 0.0;
        }
    }

    fn update_targets(&mut self, input: &TickInput, events: &mut Vec<GameEvent>) {
        let hands = [input.left_hand, input.right_hand];
        for target in self.targets.iter_mut().filter(|t| t.active) {
            target.ttl -= input.dt;
            if target.ttl <= 0.0 {
                target.active = false;
                self.score.break_combo();
                log::debug!("Boxing target expired at {:?}", target.pos);
                events.push(GameEvent::TargetExpired);
                continue;
            }

            if hands.iter().any(|&hand| target.contains(hand)) {
                target.active = false;
                let points = self.score.award_combo(HIT_POINTS);
                events.push(GameEvent::TargetHit {
                    points,
                    combo: self.score.combo,
                });
            }
        }
        self.targets.retain(|t| t.active);
    }

    fn render(&self, input: &TickInput, events: Vec<GameEvent>) -> RenderState {
        let mut out = RenderState {
            events,
            ..Default::default()
        };
        out.hud.score = self.score.clone();

        for target in &self.targets {
            out.circle(target.pos, target.radius, target.color.faded(target.life_fraction()));
        }
        out.circle(input.left_hand, FIST_RADIUS, self.left_color);
        out.circle(input.right_hand, FIST_RADIUS, self.right_color);
        out
    }
}

impl Simulation for BoxingSim {
    fn kind(&self) -> GameKind {
        GameKind::Boxing
    }

    fn reset(&mut self) {
        self.targets.clear();
        self.spawn_timer = 0.0;
        self.score = ScoreState::default();
    }

    fn step(&mut self, input: &TickInput) -> RenderState {
        let mut events = Vec::new();
        self.update_spawner(input.dt, &mut events);
        self.update_targets(input, &mut events);
        self.render(input, events)
    }

    fn score(&self) -> &ScoreState {
        &self.score
    }
}
