//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (one long-lived generator per game session)
//! - No camera, audio or platform dependencies

pub mod ai;
pub mod archery;
pub mod boxing;
pub mod collision;
pub mod pickleball;
pub mod render;
pub mod rhythm;
pub mod state;
pub mod tennis;
pub mod tick;

pub use ai::{AiOpponent, predict_arrival_y};
pub use archery::ArcherySim;
pub use boxing::BoxingSim;
pub use pickleball::PickleballSim;
pub use render::{Color, DrawCmd, Hud, RenderState};
pub use rhythm::RhythmSim;
pub use state::{Arrow, Ball, GameEvent, GameKind, Paddle, ScoreState, Side, Target};
pub use tennis::TennisSim;
pub use tick::{AxisControl, DrawControl, Simulation, TickInput};

use crate::settings::Settings;

/// Build a fresh engine for `kind`
pub fn create(kind: GameKind, settings: &Settings, seed: u64) -> Box<dyn Simulation> {
    log::info!("Starting {} (seed {})", kind.as_str(), seed);
    match kind {
        GameKind::Pickleball => Box::new(PickleballSim::new(settings, seed)),
        GameKind::Boxing => Box::new(BoxingSim::new(settings, seed)),
        GameKind::Tennis => Box::new(TennisSim::new(settings, seed)),
        GameKind::Archery => Box::new(ArcherySim::new(settings)),
        GameKind::Rhythm => Box::new(RhythmSim::new(settings, seed)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_matches_kind() {
        let settings = Settings::default();
        for kind in GameKind::ALL {
            let sim = create(kind, &settings, 1);
            assert_eq!(sim.kind(), kind);
            assert_eq!(sim.score().score, 0);
        }
    }

    fn scripted(tick: usize) -> TickInput {
        let t = tick as f32 * 0.05;
        let hand = glam::Vec2::new(400.0 + 300.0 * t.cos(), 300.0 + 200.0 * t.sin());
        TickInput {
            axis: AxisControl::Track(300.0 + 250.0 * t.sin()),
            left_hand: hand,
            right_hand: glam::Vec2::new(800.0, 600.0) - hand,
            draw: DrawControl {
                pressed: tick % 90 == 10,
                released: tick % 90 == 50,
                arm_delta: None,
            },
            serve: tick == 0,
            ..Default::default()
        }
    }

    #[test]
    fn test_same_seed_same_frames() {
        let settings = Settings::default();
        for kind in GameKind::ALL {
            let mut a = create(kind, &settings, 2024);
            let mut b = create(kind, &settings, 2024);
            for tick in 0..600 {
                let input = scripted(tick);
                let left = serde_json::to_string(&a.step(&input)).unwrap_or_default();
                let right = serde_json::to_string(&b.step(&input)).unwrap_or_default();
                assert_eq!(left, right, "{} diverged at tick {}", kind.as_str(), tick);
            }
            assert_eq!(a.score(), b.score());
        }
    }
}
