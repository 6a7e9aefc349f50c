//! Per-tick driver
//!
//! One session lives for the whole program. It owns the camera feed, the
//! motion estimator and the audio sink, and runs at most one game at a time.
//! Each tick samples commands once, reads the camera, fuses input and steps
//! the active game.

use crate::audio::{AudioSink, SoundEffect, Track};
use crate::input::InputFusion;
use crate::motion::{MotionEstimator, PoseSignal, Tracking};
use crate::platform::{CameraFeed, FrameSource, Key, ManualInput};
use crate::settings::Settings;
use crate::sim::{self, GameKind, RenderState, Simulation};

/// What the caller should do after a tick
#[derive(Debug, Clone)]
pub enum TickOutcome {
    /// Game still running; present this frame
    Continue(RenderState),
    /// Game ended (or none active); show the menu
    ReturnToMenu,
    /// Window closed
    Quit,
}

struct ActiveGame {
    kind: GameKind,
    sim: Box<dyn Simulation>,
    round_over: bool,
}

pub struct Session<S, A> {
    settings: Settings,
    seed: u64,
    games_started: u64,
    camera: CameraFeed<S>,
    estimator: MotionEstimator,
    fusion: InputFusion,
    audio: A,
    active: Option<ActiveGame>,
    last_signal: Option<PoseSignal>,
}

impl<S: FrameSource, A: AudioSink> Session<S, A> {
    pub fn new(settings: Settings, source: S, estimator: MotionEstimator, mut audio: A) -> Self {
        let seed = settings.resolve_seed();
        log::info!("Session seed {}", seed);
        audio.play_music(Track::Menu);
        Self {
            camera: CameraFeed::new(source, &settings.camera),
            fusion: InputFusion::new(&settings),
            settings,
            seed,
            games_started: 0,
            estimator,
            audio,
            active: None,
            last_signal: None,
        }
    }

    /// Leave the menu and start `kind` with fresh entities
    pub fn start(&mut self, kind: GameKind) {
        if self.active.is_some() {
            self.end_game();
        }
        let seed = self.seed.wrapping_add(self.games_started);
        self.games_started += 1;
        self.fusion.reset();
        self.audio.stop_music();
        self.audio.play_music(Track::for_game(kind));
        self.active = Some(ActiveGame {
            kind,
            sim: sim::create(kind, &self.settings, seed),
            round_over: false,
        });
    }

    pub fn active(&self) -> Option<GameKind> {
        self.active.as_ref().map(|g| g.kind)
    }

    pub fn simulation(&self) -> Option<&dyn Simulation> {
        self.active.as_ref().map(|g| g.sim.as_ref())
    }

    pub fn estimator(&self) -> &MotionEstimator {
        &self.estimator
    }

    /// Signal from the most recent tick that had a camera frame
    pub fn last_signal(&self) -> Option<PoseSignal> {
        self.last_signal
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// Run one tick. Clears the manual input's one-shot edges.
    pub fn tick(&mut self, manual: &mut ManualInput) -> TickOutcome {
        let outcome = self.tick_inner(manual);
        manual.end_tick();
        outcome
    }

    fn tick_inner(&mut self, manual: &ManualInput) -> TickOutcome {
        if manual.quit_requested() {
            self.end_game();
            return TickOutcome::Quit;
        }
        if manual.was_pressed(Key::Escape) || manual.was_pressed(Key::Q) {
            self.end_game();
            return TickOutcome::ReturnToMenu;
        }
        let Some(game) = self.active.as_mut() else {
            return TickOutcome::ReturnToMenu;
        };

        if manual.was_pressed(Key::R) {
            log::info!("{} reset", game.kind.as_str());
            game.sim.reset();
            game.round_over = false;
        }

        let tracking = if game.kind.tracks_both_hands() {
            Tracking::BothHands
        } else {
            Tracking::SingleArm
        };
        let signal = self
            .camera
            .next_frame()
            .map(|frame| self.estimator.estimate(frame, tracking));
        if signal.is_some() {
            self.last_signal = signal;
        }

        let input = self.fusion.fuse(game.kind, signal.as_ref(), manual);
        let state = game.sim.step(&input);

        for event in &state.events {
            log::debug!("{}: {:?}", game.kind.as_str(), event);
            if let Some(effect) = SoundEffect::for_event(event) {
                self.audio.play(effect);
            }
        }

        if game.sim.is_over() && !game.round_over {
            game.round_over = true;
            log::info!(
                "{} round over, final score {}",
                game.kind.as_str(),
                game.sim.score().score
            );
        }

        TickOutcome::Continue(state)
    }

    fn end_game(&mut self) {
        if let Some(game) = self.active.take() {
            log::info!(
                "Leaving {} with score {}",
                game.kind.as_str(),
                game.sim.score().score
            );
            self.audio.stop_music();
            self.audio.play_music(Track::Menu);
        }
    }
}
