//! Rhythm dance: hold both hands on the shown pose until its timer runs out
//!
//! Hands arrive in playfield pixels and are compared against the pose in
//! normalized coordinates.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::render::{Color, RenderState};
use super::state::{DancePose, GameEvent, GameKind, ScoreState, session_rng};
use super::tick::{Simulation, TickInput};
use crate::settings::Settings;
use crate::to_screen;

/// Maximum normalized distance from each hand to its pose target
pub const MATCH_THRESHOLD: f32 = 0.2;
/// Seconds each pose is held
pub const POSE_DURATION: f32 = 2.0;
pub const POSE_POINTS: u32 = 100;
const TARGET_RADIUS: f32 = 20.0;

const fn pose(name: &'static str, left: (f32, f32), right: (f32, f32)) -> DancePose {
    DancePose {
        name,
        left: Vec2::new(left.0, left.1),
        right: Vec2::new(right.0, right.1),
        duration: POSE_DURATION,
    }
}

/// The choreography, in menu order
pub const POSES: [DancePose; 6] = [
    pose("ARMS UP", (0.3, 0.2), (0.7, 0.2)),
    pose("ARMS DOWN", (0.3, 0.8), (0.7, 0.8)),
    pose("LEFT HIGH", (0.2, 0.2), (0.7, 0.6)),
    pose("RIGHT HIGH", (0.3, 0.6), (0.8, 0.2)),
    pose("T POSE", (0.1, 0.5), (0.9, 0.5)),
    pose("HANDS CENTER", (0.45, 0.4), (0.55, 0.4)),
];

/// Both hands within the threshold of their targets
pub fn pose_matched(pose: &DancePose, left: Vec2, right: Vec2) -> bool {
    left.distance(pose.left) < MATCH_THRESHOLD && right.distance(pose.right) < MATCH_THRESHOLD
}

/// Pose-matching game state
pub struct RhythmSim {
    width: f32,
    height: f32,
    target_color: Color,
    matched_color: Color,
    pending_color: Color,
    track_color: Color,
    pub pose_index: usize,
    pub pose_timer: f32,
    pub matched: bool,
    pub score: ScoreState,
    rng: Pcg32,
}

impl RhythmSim {
    pub fn new(settings: &Settings, seed: u64) -> Self {
        let palette = &settings.palette;
        Self {
            width: settings.playfield.width,
            height: settings.playfield.height,
            target_color: palette.pink,
            matched_color: palette.green,
            pending_color: palette.orange,
            track_color: Color::rgb(50, 50, 50),
            pose_index: 0,
            pose_timer: 0.0,
            matched: false,
            score: ScoreState::default(),
            rng: session_rng(seed, GameKind::Rhythm),
        }
    }

    pub fn current_pose(&self) -> &DancePose {
        &POSES[self.pose_index]
    }

    /// Elapsed fraction of the current pose window. The window switches
    /// as soon as this passes 1, so after a step it stays in [0, 1].
    pub fn progress(&self) -> f32 {
        self.pose_timer / self.current_pose().duration
    }

    fn normalize(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x / self.width, p.y / self.height)
    }

    fn render(&self, events: Vec<GameEvent>) -> RenderState {
        let mut out = RenderState {
            events,
            ..Default::default()
        };
        let pose = self.current_pose();
        out.hud.score = self.score.clone();
        out.hud.progress = Some(self.progress());
        out.hud.caption = Some(pose.name.to_string());
        out.hud.matched = self.matched;

        // Targets are drawn on the left half next to the silhouette
        let (half_w, h) = (self.width / 2.0, self.height);
        let shoulder = Vec2::new(self.width / 4.0, h / 2.0 - 50.0);
        for target in [pose.left, pose.right] {
            let p = to_screen(target, half_w, h);
            out.line(shoulder, p, self.target_color);
            out.circle(p, TARGET_RADIUS, self.target_color);
        }

        let bar_w = self.width - 100.0;
        out.rect(Vec2::new(50.0, h - 40.0), Vec2::new(bar_w, 20.0), self.track_color);
        let bar_color = if self.matched {
            self.matched_color
        } else {
            self.pending_color
        };
        out.rect(
            Vec2::new(50.0, h - 40.0),
            Vec2::new(bar_w * (1.0 - self.progress()), 20.0),
            bar_color,
        );
        out
    }
}

impl Simulation for RhythmSim {
    fn kind(&self) -> GameKind {
        GameKind::Rhythm
    }

    fn reset(&mut self) {
        self.pose_index = 0;
        self.pose_timer = 0.0;
        self.matched = false;
        self.score = ScoreState::default();
    }

    fn step(&mut self, input: &TickInput) -> RenderState {
        let mut events = Vec::new();
        self.pose_timer += input.dt;

        let left = self.normalize(input.left_hand);
        let right = self.normalize(input.right_hand);
        self.matched = pose_matched(self.current_pose(), left, right);

        if self.pose_timer > self.current_pose().duration {
            if self.matched {
                let points = self.score.award_combo(POSE_POINTS);
                events.push(GameEvent::PoseScored {
                    points,
                    combo: self.score.combo,
                });
            } else {
                self.score.break_combo();
                events.push(GameEvent::PoseMissed);
            }
            self.pose_index = self.rng.random_range(0..POSES.len());
            self.pose_timer = 0.0;
            log::debug!("Next pose: {}", self.current_pose().name);
            events.push(GameEvent::PoseChanged {
                name: self.current_pose().name,
            });
        }

        self.render(events)
    }

    fn score(&self) -> &ScoreState {
        &self.score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hands_on(sim: &RhythmSim) -> TickInput {
        let pose = sim.current_pose();
        TickInput {
            left_hand: to_screen(pose.left, 800.0, 600.0),
            right_hand: to_screen(pose.right, 800.0, 600.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_pose_match_needs_both_hands() {
        let pose = &POSES[0];
        assert!(pose_matched(pose, pose.left, pose.right));
        assert!(pose_matched(pose, pose.left + Vec2::new(0.19, 0.0), pose.right));
        assert!(!pose_matched(pose, pose.left, pose.right + Vec2::new(0.0, 0.21)));
        assert!(!pose_matched(pose, Vec2::ZERO, pose.right));
    }

    #[test]
    fn test_held_pose_scores_with_combo() {
        let mut sim = RhythmSim::new(&Settings::default(), 3);
        let mut scored = Vec::new();
        for _ in 0..400 {
            let input = hands_on(&sim);
            let out = sim.step(&input);
            assert!(out.hud.matched);
            scored.extend(
                out.events
                    .into_iter()
                    .filter(|e| matches!(e, GameEvent::PoseScored { .. })),
            );
        }
        // Each window lasts about 125 ticks
        assert_eq!(scored.len(), 3);
        assert_eq!(sim.score.combo, 3);
        assert_eq!(sim.score.score, 100 + 200 + 300);
    }

    #[test]
    fn test_missed_pose_breaks_combo() {
        let mut sim = RhythmSim::new(&Settings::default(), 3);
        sim.score.combo = 5;
        let away = TickInput {
            left_hand: Vec2::new(-400.0, -400.0),
            right_hand: Vec2::new(-400.0, -400.0),
            ..Default::default()
        };
        let mut missed = false;
        for _ in 0..130 {
            let out = sim.step(&away);
            missed |= out.events.contains(&GameEvent::PoseMissed);
        }
        assert!(missed);
        assert_eq!(sim.score.combo, 0);
        assert_eq!(sim.score.score, 0);
    }

    #[test]
    fn test_progress_stays_in_unit_range() {
        let mut sim = RhythmSim::new(&Settings::default(), 8);
        for _ in 0..300 {
            let out = sim.step(&TickInput::default());
            let raw = sim.pose_timer / sim.current_pose().duration;
            assert!((0.0..=1.0).contains(&raw), "raw progress {raw}");
            assert_eq!(out.hud.progress, Some(raw));
            assert!(out.hud.caption.is_some());
        }
    }
}
