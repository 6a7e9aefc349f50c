//! Frame sources
//!
//! Capture hardware lives outside the crate; anything that can hand over RGB
//! frames implements [`FrameSource`]. [`CameraFeed`] wraps a source with the
//! miss-tolerance policy the session relies on.

use image::{Rgb, RgbImage};

use crate::consts::{CAM_HEIGHT, CAM_WIDTH};
use crate::settings::CameraSettings;

/// A camera or camera-like producer of frames
pub trait FrameSource {
    /// Next frame, or None on a (possibly transient) miss
    fn read(&mut self) -> Option<RgbImage>;
}

/// Source for sessions without a camera
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCamera;

impl FrameSource for NoCamera {
    fn read(&mut self) -> Option<RgbImage> {
        None
    }
}

/// Deterministic test pattern: a bright block sweeping up and down on a dark
/// background, for headless runs of the motion pipeline
#[derive(Debug, Clone)]
pub struct SyntheticCamera {
    width: u32,
    height: u32,
    block: u32,
    /// Ticks for one full sweep down and back
    period: u32,
    frame: u32,
}

impl Default for SyntheticCamera {
    fn default() -> Self {
        Self::new(CAM_WIDTH, CAM_HEIGHT, 40)
    }
}

impl SyntheticCamera {
    pub fn new(width: u32, height: u32, period: u32) -> Self {
        Self {
            width,
            height,
            block: (width.min(height) / 3).max(1),
            period: period.max(2),
            frame: 0,
        }
    }

    /// Top edge of the block for frame `n`
    fn block_top(&self, n: u32) -> u32 {
        let travel = self.height.saturating_sub(self.block);
        let half = self.period / 2;
        let phase = n % self.period;
        let step = if phase < half { phase } else { self.period - phase };
        travel * step / half
    }
}

impl FrameSource for SyntheticCamera {
    fn read(&mut self) -> Option<RgbImage> {
        let top = self.block_top(self.frame);
        let left = (self.width - self.block) / 2;
        let block = self.block;
        self.frame = self.frame.wrapping_add(1);
        Some(RgbImage::from_fn(self.width, self.height, |x, y| {
            if x >= left && x < left + block && y >= top && y < top + block {
                Rgb([235, 235, 235])
            } else {
                Rgb([25, 25, 25])
            }
        }))
    }
}

/// Camera wrapper that rides out short dropouts.
///
/// Up to `max_stale_frames` consecutive misses reuse the last good frame;
/// past that the feed reports no frame until the source recovers.
pub struct CameraFeed<S> {
    source: S,
    mirror: bool,
    max_stale: u32,
    misses: u32,
    last: Option<RgbImage>,
}

impl<S: FrameSource> CameraFeed<S> {
    pub fn new(source: S, settings: &CameraSettings) -> Self {
        Self {
            source,
            mirror: settings.mirror,
            max_stale: settings.max_stale_frames,
            misses: 0,
            last: None,
        }
    }

    /// Frame for this tick (fresh or stale), or None if the camera is lost
    pub fn next_frame(&mut self) -> Option<&RgbImage> {
        match self.source.read() {
            Some(mut frame) => {
                if self.misses > self.max_stale {
                    log::info!("Camera recovered after {} missed frames", self.misses);
                }
                if self.mirror {
                    image::imageops::flip_horizontal_in_place(&mut frame);
                }
                self.misses = 0;
                self.last = Some(frame);
            }
            None => {
                self.misses = self.misses.saturating_add(1);
                if self.misses == self.max_stale.saturating_add(1) && self.last.is_some() {
                    log::warn!("Camera lost; using manual input");
                }
                if self.misses > self.max_stale {
                    return None;
                }
            }
        }
        self.last.as_ref()
    }

    /// Consecutive read misses so far
    pub fn misses(&self) -> u32 {
        self.misses
    }
}
