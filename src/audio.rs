//! Audio seam
//!
//! Playback itself lives outside the crate. The session tells an [`AudioSink`]
//! which music track to run and which effects to fire; game events are mapped
//! to effects here.

use crate::sim::{GameEvent, GameKind};

/// Background music tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Track {
    Menu,
    Pickleball,
    Boxing,
    Tennis,
    Archery,
    Rhythm,
}

impl Track {
    /// Track played while `kind` is active
    pub fn for_game(kind: GameKind) -> Self {
        match kind {
            GameKind::Pickleball => Track::Pickleball,
            GameKind::Boxing => Track::Boxing,
            GameKind::Tennis => Track::Tennis,
            GameKind::Archery => Track::Archery,
            GameKind::Rhythm => Track::Rhythm,
        }
    }

    /// Playback volume (0.0 - 1.0)
    pub fn volume(&self) -> f32 {
        match self {
            Track::Rhythm => 0.5,
            _ => 1.0 / 3.0,
        }
    }
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ball hits paddle or racket
    PaddleHit,
    /// A rally point was scored
    Point,
    /// Punch landed
    TargetHit,
    /// Bow released
    ArrowRelease,
    /// Arrow struck the target
    ArrowHit,
    /// Pose held through its window
    PoseMatched,
}

impl SoundEffect {
    /// Effect for a game event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::PaddleHit { .. } => Some(SoundEffect::PaddleHit),
            GameEvent::Point { .. } => Some(SoundEffect::Point),
            GameEvent::TargetHit { .. } => Some(SoundEffect::TargetHit),
            GameEvent::ArrowLoosed { .. } => Some(SoundEffect::ArrowRelease),
            GameEvent::ArrowScored { .. } => Some(SoundEffect::ArrowHit),
            GameEvent::PoseScored { .. } => Some(SoundEffect::PoseMatched),
            _ => None,
        }
    }
}

/// Receiver for music and effect commands
pub trait AudioSink {
    /// Start `track` looping, replacing whatever is playing
    fn play_music(&mut self, track: Track);

    fn stop_music(&mut self);

    fn play(&mut self, effect: SoundEffect);
}

/// Sink that records commands to the log (headless runs)
#[derive(Debug, Default)]
pub struct LogAudio {
    current: Option<Track>,
    muted: bool,
}

impl LogAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mute/unmute effects
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn current(&self) -> Option<Track> {
        self.current
    }
}

impl AudioSink for LogAudio {
    fn play_music(&mut self, track: Track) {
        log::info!("Music: {:?} (volume {:.2})", track, track.volume());
        self.current = Some(track);
    }

    fn stop_music(&mut self) {
        if let Some(track) = self.current.take() {
            log::info!("Music stopped: {:?}", track);
        }
    }

    fn play(&mut self, effect: SoundEffect) {
        if !self.muted {
            log::debug!("Effect: {:?}", effect);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Side;

    #[test]
    fn test_event_effects() {
        assert_eq!(
            SoundEffect::for_event(&GameEvent::PaddleHit { side: Side::Left }),
            Some(SoundEffect::PaddleHit)
        );
        assert_eq!(SoundEffect::for_event(&GameEvent::TargetExpired), None);
        assert_eq!(
            SoundEffect::for_event(&GameEvent::ArrowLoosed {
                vel: glam::Vec2::new(10.0, 0.0)
            }),
            Some(SoundEffect::ArrowRelease)
        );
    }

    #[test]
    fn test_log_audio_tracks_music() {
        let mut audio = LogAudio::new();
        audio.play_music(Track::Menu);
        audio.play_music(Track::for_game(GameKind::Archery));
        assert_eq!(audio.current(), Some(Track::Archery));
        audio.stop_music();
        assert_eq!(audio.current(), None);
    }
}
