//! Platform abstraction layer
//!
//! Seams to the outside world:
//! - Frames (camera capture)
//! - Keyboard/mouse events
//! - Presenting a tick's render description

pub mod camera;
pub mod keyboard;

use std::io::Write;

use serde::Serialize;

pub use camera::{CameraFeed, FrameSource, NoCamera, SyntheticCamera};
pub use keyboard::{InputEvent, Key, ManualInput};

use crate::sim::{GameKind, RenderState};

/// Receiver for each tick's render description
pub trait RenderSink {
    fn present(&mut self, game: GameKind, state: &RenderState);
}

/// Logs the HUD every `every` frames
#[derive(Debug)]
pub struct LogRenderer {
    every: u64,
    frames: u64,
}

impl LogRenderer {
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
            frames: 0,
        }
    }
}

impl RenderSink for LogRenderer {
    fn present(&mut self, game: GameKind, state: &RenderState) {
        if self.frames % self.every == 0 {
            let hud = &state.hud;
            log::info!(
                "[{}] frame {} score {} combo {}{}{}",
                game.as_str(),
                self.frames,
                hud.score.score,
                hud.score.combo,
                hud.opponent_score
                    .map(|s| format!(" vs {s}"))
                    .unwrap_or_default(),
                hud.caption
                    .as_ref()
                    .map(|c| format!(" pose {c}"))
                    .unwrap_or_default(),
            );
        }
        self.frames += 1;
    }
}

#[derive(Serialize)]
struct DumpLine<'a> {
    game: GameKind,
    state: &'a RenderState,
}

/// Writes one JSON object per tick (for replay tooling)
pub struct JsonLinesRenderer<W> {
    out: W,
    failed: bool,
}

impl<W: Write> JsonLinesRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, failed: false }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderSink for JsonLinesRenderer<W> {
    fn present(&mut self, game: GameKind, state: &RenderState) {
        if self.failed {
            return;
        }
        let result = serde_json::to_string(&DumpLine { game, state })
            .map_err(std::io::Error::from)
            .and_then(|line| writeln!(self.out, "{line}"));
        if let Err(err) = result {
            log::warn!("Render dump failed: {err}; disabling");
            self.failed = true;
        }
    }
}
