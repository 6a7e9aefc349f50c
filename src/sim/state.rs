//! Shared entity records and scoring state
//!
//! Plain data plus small free-standing update helpers. Each simulation owns
//! its entities exclusively for the lifetime of one game session.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::render::Color;

/// The five playable games
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameKind {
    Pickleball,
    Boxing,
    Tennis,
    Archery,
    Rhythm,
}

impl GameKind {
    /// Menu order
    pub const ALL: [GameKind; 5] = [
        GameKind::Pickleball,
        GameKind::Boxing,
        GameKind::Tennis,
        GameKind::Archery,
        GameKind::Rhythm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameKind::Pickleball => "Pickleball",
            GameKind::Boxing => "Boxing",
            GameKind::Tennis => "Tennis",
            GameKind::Archery => "Archery",
            GameKind::Rhythm => "Rhythm Dance",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pickleball" | "1" => Some(GameKind::Pickleball),
            "boxing" | "2" => Some(GameKind::Boxing),
            "tennis" | "3" => Some(GameKind::Tennis),
            "archery" | "4" => Some(GameKind::Archery),
            "rhythm" | "dance" | "5" => Some(GameKind::Rhythm),
            _ => None,
        }
    }

    /// Whether the game tracks two hands instead of a single arm height
    pub fn tracks_both_hands(&self) -> bool {
        matches!(self, GameKind::Boxing | GameKind::Rhythm)
    }

    /// Index used to derive per-game RNG streams
    pub fn index(&self) -> u64 {
        match self {
            GameKind::Pickleball => 0,
            GameKind::Boxing => 1,
            GameKind::Tennis => 2,
            GameKind::Archery => 3,
            GameKind::Rhythm => 4,
        }
    }
}

/// Long-lived seeded generator for one game session
pub fn session_rng(seed: u64, kind: GameKind) -> Pcg32 {
    Pcg32::seed_from_u64(seed.wrapping_mul(0x9E37_79B9_7F4A_7C15).wrapping_add(kind.index()))
}

/// Which edge of the court a paddle defends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Horizontal sign of a ball leaving this side's paddle
    pub fn outward(&self) -> f32 {
        match self {
            Side::Left => 1.0,
            Side::Right => -1.0,
        }
    }
}

/// Maximum number of trail points to store
pub const TRAIL_LENGTH: usize = 10;

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Trail history for rendering (newest first)
    #[serde(skip)]
    pub trail: Vec<Vec2>,
}

impl Ball {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius,
            trail: Vec::with_capacity(TRAIL_LENGTH + 1),
        }
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Record current position to trail (call each tick before moving)
    pub fn record_trail(&mut self) {
        self.trail.insert(0, self.pos);
        self.trail.truncate(TRAIL_LENGTH);
    }

    pub fn clear_trail(&mut self) {
        self.trail.clear();
    }
}

/// A paddle or racket. `pos` is the top-left corner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub pos: Vec2,
    pub size: Vec2,
    /// Maximum travel per tick
    pub speed: f32,
    pub side: Side,
}

impl Paddle {
    pub fn new(pos: Vec2, size: Vec2, speed: f32, side: Side) -> Self {
        Self {
            pos,
            size,
            speed,
            side,
        }
    }

    /// Step toward `target_y` by at most `speed`, then clamp the top edge to
    /// `[min_y, max_y - height]`
    pub fn move_toward(&mut self, target_y: f32, min_y: f32, max_y: f32) {
        let delta = (target_y - self.pos.y).clamp(-self.speed, self.speed);
        self.pos.y += delta;
        self.pos.y = self.pos.y.clamp(min_y, max_y - self.size.y);
    }
}

/// A timed circular target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub pos: Vec2,
    pub radius: f32,
    /// Remaining lifetime in seconds
    pub ttl: f32,
    pub max_ttl: f32,
    pub color: Color,
    pub active: bool,
}

impl Target {
    pub fn new(pos: Vec2, radius: f32, max_ttl: f32, color: Color) -> Self {
        Self {
            pos,
            radius,
            ttl: max_ttl,
            max_ttl,
            color,
            active: true,
        }
    }

    /// Remaining lifetime as a fraction of the full lifetime
    pub fn life_fraction(&self) -> f32 {
        if self.max_ttl > 0.0 {
            (self.ttl / self.max_ttl).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.distance(self.pos) < self.radius
    }
}

/// An arrow in flight (or nocked when `flying` is false)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Arrow {
    pub pos: Vec2,
    pub vel: Vec2,
    pub flying: bool,
}

impl Arrow {
    /// Heading of the shaft in radians
    pub fn angle(&self) -> f32 {
        self.vel.y.atan2(self.vel.x)
    }
}

/// A target pose: where each hand should be, in normalized coordinates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DancePose {
    pub name: &'static str,
    pub left: Vec2,
    pub right: Vec2,
    /// Seconds the pose is held on screen
    pub duration: f32,
}

/// Score, combo and remaining shots for one session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreState {
    pub score: u32,
    pub combo: u32,
    /// Arrows (or lives) left, for games that have them
    pub remaining: Option<u32>,
}

impl ScoreState {
    /// Extend the combo and award `base * combo`; returns the points added
    pub fn award_combo(&mut self, base: u32) -> u32 {
        self.combo += 1;
        let points = base * self.combo;
        self.score = self.score.saturating_add(points);
        points
    }

    pub fn break_combo(&mut self) {
        self.combo = 0;
    }

    pub fn add(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }
}

/// Things that happened during a tick (for audio and logging)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    /// Ball or racket contact
    PaddleHit { side: Side },
    /// A point was won by `side`
    Point { side: Side },
    TargetSpawned { pos: Vec2 },
    TargetHit { points: u32, combo: u32 },
    TargetExpired,
    ArrowLoosed { vel: Vec2 },
    ArrowScored { points: u32 },
    ArrowMissed,
    PoseScored { points: u32, combo: u32 },
    PoseMissed,
    PoseChanged { name: &'static str },
}
