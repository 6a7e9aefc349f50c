//! Pickleball: player paddle vs. predictive AI paddle
//!
//! Units are pixels per tick. The court band is `[COURT_MARGIN, height -
//! COURT_MARGIN]`; the ball reflects off its edges and scores when it leaves
//! past either paddle.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::ai::AiOpponent;
use super::collision::{deflect_off_paddle, paddle_contact, reflect_off_walls};
use super::render::{Color, RenderState};
use super::state::{Ball, GameEvent, GameKind, Paddle, ScoreState, Side, session_rng};
use super::tick::{AxisControl, Simulation, TickInput};
use crate::settings::Settings;

pub const COURT_MARGIN: f32 = 60.0;
pub const PADDLE_WIDTH: f32 = 15.0;
pub const PADDLE_HEIGHT: f32 = 80.0;
pub const PADDLE_SPEED: f32 = 8.0;
/// Player paddle distance from the left edge
pub const PLAYER_X: f32 = 70.0;
/// AI paddle distance from the right edge
pub const OPPONENT_INSET: f32 = 85.0;
pub const BALL_RADIUS: f32 = 12.0;
pub const SERVE_SPEED_X: f32 = 7.0;
pub const SERVE_SPEED_Y: f32 = 5.0;
pub const MAX_BALL_SPEED: f32 = 15.0;

/// Paddle-and-ball game state
pub struct PickleballSim {
    width: f32,
    height: f32,
    player_color: Color,
    opponent_color: Color,
    ball_color: Color,
    pub player: Paddle,
    pub opponent: Paddle,
    pub ball: Ball,
    pub ai: AiOpponent,
    pub score: ScoreState,
    pub opponent_score: u32,
    /// Ball is in play (set by the first serve)
    pub started: bool,
    rng: Pcg32,
}

impl PickleballSim {
    pub fn new(settings: &Settings, seed: u64) -> Self {
        let width = settings.playfield.width;
        let height = settings.playfield.height;
        let rest_y = height / 2.0 - PADDLE_HEIGHT / 2.0;
        let size = Vec2::new(PADDLE_WIDTH, PADDLE_HEIGHT);

        let mut sim = Self {
            width,
            height,
            player_color: settings.palette.blue,
            opponent_color: settings.palette.red,
            ball_color: settings.palette.yellow,
            player: Paddle::new(Vec2::new(PLAYER_X, rest_y), size, PADDLE_SPEED, Side::Left),
            opponent: Paddle::new(
                Vec2::new(width - OPPONENT_INSET, rest_y),
                size,
                PADDLE_SPEED,
                Side::Right,
            ),
            ball: Ball::new(Vec2::new(width / 2.0, height / 2.0), BALL_RADIUS),
            ai: AiOpponent::new(settings.difficulty, rest_y),
            score: ScoreState::default(),
            opponent_score: 0,
            started: false,
            rng: session_rng(seed, GameKind::Pickleball),
        };
        sim.serve();
        sim
    }

    fn court_top(&self) -> f32 {
        COURT_MARGIN
    }

    fn court_bottom(&self) -> f32 {
        self.height - COURT_MARGIN
    }

    /// Centre the ball with a randomized serve angle and direction
    pub fn serve(&mut self) {
        self.ball.pos = Vec2::new(self.width / 2.0, self.height / 2.0);
        let angle: f32 = self.rng.random_range(-0.5..0.5);
        let direction = if self.rng.random_bool(0.5) { 1.0 } else { -1.0 };
        self.ball.vel = Vec2::new(SERVE_SPEED_X * direction, SERVE_SPEED_Y * angle);
        self.ball.clear_trail();
    }

    fn move_player(&mut self, axis: AxisControl) {
        let (top, bottom) = (self.court_top(), self.court_bottom());
        match axis {
            // Camera tracking only takes over once play has started
            AxisControl::Track(y) if self.started => self.player.move_toward(y, top, bottom),
            AxisControl::Nudge(dy) => {
                let target = self.player.pos.y + dy;
                self.player.move_toward(target, top, bottom);
            }
            _ => {}
        }
    }

    fn advance_ball(&mut self, events: &mut Vec<GameEvent>) {
        let (top, bottom) = (self.court_top(), self.court_bottom());

        self.ball.record_trail();
        self.ball.pos += self.ball.vel;
        reflect_off_walls(&mut self.ball, top, bottom);

        self.ai
            .update(&mut self.opponent, &self.ball, top, bottom, &mut self.rng);

        for paddle in [&self.player, &self.opponent] {
            if paddle_contact(&self.ball, paddle) {
                deflect_off_paddle(&mut self.ball, paddle, MAX_BALL_SPEED);
                events.push(GameEvent::PaddleHit { side: paddle.side });
            }
        }

        if self.ball.pos.x < 0.0 {
            self.opponent_score += 1;
            log::debug!("Pickleball point to AI ({})", self.opponent_score);
            events.push(GameEvent::Point { side: Side::Right });
            self.serve();
        } else if self.ball.pos.x > self.width {
            self.score.add(1);
            log::debug!("Pickleball point to player ({})", self.score.score);
            events.push(GameEvent::Point { side: Side::Left });
            self.serve();
        }
    }

    fn render(&self, events: Vec<GameEvent>) -> RenderState {
        let mut out = RenderState {
            events,
            ..Default::default()
        };
        out.hud.score = self.score.clone();
        out.hud.opponent_score = Some(self.opponent_score);
        out.hud.waiting = !self.started;

        let len = self.ball.trail.len();
        for (i, p) in self.ball.trail.iter().enumerate() {
            // Newest point is drawn largest
            let r = (self.ball.radius * (len - i) as f32 / len as f32).max(2.0);
            out.circle(*p, r, self.ball_color.faded(0.6));
        }
        out.circle(self.ball.pos, self.ball.radius, self.ball_color);
        out.rect(self.player.pos, self.player.size, self.player_color);
        out.rect(self.opponent.pos, self.opponent.size, self.opponent_color);
        out
    }
}

impl Simulation for PickleballSim {
    fn kind(&self) -> GameKind {
        GameKind::Pickleball
    }

    /// Re-serve and zero both scores; play continues if it had started
    fn reset(&mut self) {
        self.score = ScoreState::default();
        self.opponent_score = 0;
        self.serve();
    }

    fn step(&mut self, input: &TickInput) -> RenderState {
        let mut events = Vec::new();

        if input.serve && !self.started {
            self.started = true;
            self.serve();
        }

        self.move_player(input.axis);

        if self.started {
            self.advance_ball(&mut events);
        }

        self.render(events)
    }

    fn score(&self) -> &ScoreState {
        &self.score
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn started_sim() -> PickleballSim {
        let mut sim = PickleballSim::new(&Settings::default(), 1234);
        sim.step(&TickInput {
            serve: true,
            ..Default::default()
        });
        sim
    }

    #[test]
    fn test_waits_for_serve() {
        let mut sim = PickleballSim::new(&Settings::default(), 1);
        let start = sim.ball.pos;
        let out = sim.step(&TickInput::default());
        assert_eq!(sim.ball.pos, start);
        assert!(out.hud.waiting);
    }

    #[test]
    fn test_serve_speed() {
        let sim = started_sim();
        assert!(sim.started);
        assert!((sim.ball.vel.x.abs() - SERVE_SPEED_X).abs() < 1e-6);
        assert!(sim.ball.vel.y.abs() <= SERVE_SPEED_Y * 0.5);
    }

    #[test]
    fn test_camera_tracking_ignored_before_serve() {
        let mut sim = PickleballSim::new(&Settings::default(), 1);
        let y = sim.player.pos.y;
        sim.step(&TickInput {
            axis: AxisControl::Track(60.0),
            ..Default::default()
        });
        assert_eq!(sim.player.pos.y, y);

        sim.step(&TickInput {
            axis: AxisControl::Nudge(-10.0),
            ..Default::default()
        });
        assert_eq!(sim.player.pos.y, y - PADDLE_SPEED);
    }

    #[test]
    fn test_player_return() {
        let mut sim = started_sim();
        sim.player.pos.y = 260.0;
        sim.ball.pos = Vec2::new(95.0, 300.0);
        sim.ball.vel = Vec2::new(-7.0, 0.0);
        let out = sim.step(&TickInput::default());
        assert!(sim.ball.vel.x > 0.0);
        assert!(out.events.contains(&GameEvent::PaddleHit { side: Side::Left }));
    }

    #[test]
    fn test_player_scores_past_ai() {
        let mut sim = started_sim();
        sim.opponent.pos.y = COURT_MARGIN;
        sim.ball.pos = Vec2::new(798.0, 500.0);
        sim.ball.vel = Vec2::new(7.0, 0.0);
        let out = sim.step(&TickInput::default());
        assert_eq!(sim.score.score, 1);
        assert_eq!(sim.opponent_score, 0);
        assert!(out.events.contains(&GameEvent::Point { side: Side::Left }));
        assert_eq!(sim.ball.pos, Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_reset_zeroes_scores() {
        let mut sim = started_sim();
        sim.score.add(3);
        sim.opponent_score = 2;
        sim.reset();
        assert_eq!(sim.score.score, 0);
        assert_eq!(sim.opponent_score, 0);
        assert!(sim.started);
    }

    #[test]
    fn test_determinism() {
        let mut a = PickleballSim::new(&Settings::default(), 99999);
        let mut b = PickleballSim::new(&Settings::default(), 99999);
        let inputs = [
            TickInput {
                serve: true,
                ..Default::default()
            },
            TickInput {
                axis: AxisControl::Track(100.0),
                ..Default::default()
            },
            TickInput::default(),
        ];
        for _ in 0..200 {
            for input in &inputs {
                a.step(input);
                b.step(input);
            }
        }
        assert_eq!(a.ball.pos, b.ball.pos);
        assert_eq!(a.opponent.pos, b.opponent.pos);
        assert_eq!(a.opponent_score, b.opponent_score);
    }

    #[test]
    fn test_ai_scores_when_player_misses() {
        let mut sim = started_sim();
        sim.player.pos.y = COURT_MARGIN;
        sim.ball.pos = Vec2::new(3.0, 500.0);
        sim.ball.vel = Vec2::new(-7.0, 0.0);
        let out = sim.step(&TickInput::default());
        assert_eq!(sim.opponent_score, 1);
        assert_eq!(sim.score.score, 0);
        assert!(out.events.contains(&GameEvent::Point { side: Side::Right }));
        assert_eq!(sim.ball.pos, Vec2::new(400.0, 300.0));
        assert_eq!(sim.ball.vel.x.abs(), SERVE_SPEED_X);
    }

    proptest! {
        #[test]
        fn test_ball_speed_never_exceeds_cap(
            seed in any::<u64>(),
            moves in proptest::collection::vec(-20.0f32..20.0, 1..300),
        ) {
            let mut sim = PickleballSim::new(&Settings::default(), seed);
            sim.step(&TickInput { serve: true, ..Default::default() });
            for dy in moves {
                sim.step(&TickInput { axis: AxisControl::Nudge(dy), ..Default::default() });
                prop_assert!(sim.ball.speed() <= MAX_BALL_SPEED + 1e-3);
                prop_assert!(sim.player.pos.y >= COURT_MARGIN);
                prop_assert!(sim.player.pos.y + PADDLE_HEIGHT <= 600.0 - COURT_MARGIN + 1e-3);
            }
        }
    }
}
