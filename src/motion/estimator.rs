//! Frame to pose-signal estimation
//!
//! Two strategies share one smoothed [`PoseSignal`]:
//! - Model: wrist heatmap peaks from a [`PoseModel`], gated by confidence
//! - Motion difference: centroid of the change against the previous frame
//!
//! A model failure demotes the estimator to motion difference for the rest
//! of the session.

use glam::Vec2;
use image::{GrayImage, RgbImage};
use imageproc::morphology::Mask;
use serde::Serialize;

use super::frame_diff::{self, Centroid};
use super::heatmap::{Peak, PoseModel, wrist_peaks};
use crate::consts::NEUTRAL;
use crate::settings::EstimatorSettings;
use crate::{blend, clamp01};

/// Smoothed control signal, every coordinate normalized to [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PoseSignal {
    pub arm_center_y: f32,
    pub left_hand: Vec2,
    pub right_hand: Vec2,
}

impl Default for PoseSignal {
    fn default() -> Self {
        Self {
            arm_center_y: NEUTRAL,
            left_hand: Vec2::splat(NEUTRAL),
            right_hand: Vec2::splat(NEUTRAL),
        }
    }
}

impl PoseSignal {
    fn clamped(self) -> Self {
        Self {
            arm_center_y: clamp01(self.arm_center_y),
            left_hand: Vec2::new(clamp01(self.left_hand.x), clamp01(self.left_hand.y)),
            right_hand: Vec2::new(clamp01(self.right_hand.x), clamp01(self.right_hand.y)),
        }
    }
}

/// What the active game needs from a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tracking {
    /// One vertical arm height
    SingleArm,
    /// Independent left and right hand points
    BothHands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimatorMode {
    Model,
    MotionDifference,
}

pub struct MotionEstimator {
    settings: EstimatorSettings,
    model: Option<Box<dyn PoseModel>>,
    kernel: Mask,
    signal: PoseSignal,
    /// Dimensions of the last frame seen
    frame_size: Option<(u32, u32)>,
    /// Preprocessed previous frame (motion-difference mode only)
    previous: Option<GrayImage>,
}

impl MotionEstimator {
    /// Motion-difference estimator
    pub fn new(settings: &EstimatorSettings) -> Self {
        log::info!("Motion estimator using motion-difference fallback");
        Self {
            settings: settings.clone(),
            model: None,
            kernel: frame_diff::ellipse_kernel(settings.morph_kernel),
            signal: PoseSignal::default(),
            frame_size: None,
            previous: None,
        }
    }

    /// Model-backed estimator. Falls back to motion difference when the
    /// model could not be loaded or the settings disable it.
    pub fn with_model<M>(settings: &EstimatorSettings, model: Result<M, crate::EstimatorError>) -> Self
    where
        M: PoseModel + 'static,
    {
        let mut estimator = Self::new(settings);
        match model {
            Ok(model) if settings.prefer_model => {
                log::info!("Motion estimator using pose model");
                estimator.model = Some(Box::new(model));
            }
            Ok(_) => log::info!("Pose model disabled by settings"),
            Err(err) => log::warn!("{err}; using motion-difference fallback"),
        }
        estimator
    }

    pub fn mode(&self) -> EstimatorMode {
        if self.model.is_some() {
            EstimatorMode::Model
        } else {
            EstimatorMode::MotionDifference
        }
    }

    /// Fold one frame into the signal.
    ///
    /// The first frame (or one whose size differs from the last) only
    /// restarts the history; the current signal is returned unchanged.
    pub fn estimate(&mut self, frame: &RgbImage, tracking: Tracking) -> PoseSignal {
        let size = frame.dimensions();
        match self.frame_size.replace(size) {
            Some(known) if known == size => {}
            known => {
                if known.is_some() {
                    log::debug!("Frame size changed; restarting motion history");
                }
                self.previous = self
                    .model
                    .is_none()
                    .then(|| frame_diff::preprocess(frame, self.settings.blur_sigma));
                return self.signal;
            }
        }

        if self.model.is_some() && self.estimate_model(frame) {
            return self.signal;
        }

        // A frame that just demoted the model only seeds the fallback history
        let current = frame_diff::preprocess(frame, self.settings.blur_sigma);
        if let Some(previous) = self.previous.replace(current) {
            self.estimate_motion(&previous, tracking);
        }
        self.signal
    }

    /// Returns false when the model failed and was dropped
    fn estimate_model(&mut self, frame: &RgbImage) -> bool {
        let Some(model) = self.model.as_mut() else {
            return false;
        };
        match model.infer(frame).and_then(|maps| wrist_peaks(&maps)) {
            Ok((left, right)) => {
                self.apply_peaks(left, right);
                true
            }
            Err(err) => {
                log::warn!("{err}; switching to motion-difference fallback");
                self.model = None;
                false
            }
        }
    }

    fn apply_peaks(&mut self, left: Option<Peak>, right: Option<Peak>) {
        let threshold = self.settings.confidence_threshold;
        let confident = |peak: Option<Peak>| peak.filter(|p| p.confidence > threshold);

        // The neutral height is always part of the average
        let mut sum = NEUTRAL;
        let mut count = 0;
        if let Some(p) = confident(left) {
            self.signal.left_hand = Vec2::new(p.x, p.y);
            sum += p.y;
            count += 1;
        }
        if let Some(p) = confident(right) {
            self.signal.right_hand = Vec2::new(p.x, p.y);
            sum += p.y;
            count += 1;
        }
        let sample = sum / (count + 1) as f32;
        self.signal.arm_center_y =
            blend(self.signal.arm_center_y, sample, self.settings.model_weight);
        self.signal = self.signal.clamped();
    }

    /// Denoised binary mask of what changed between two preprocessed frames
    fn motion_mask(&self, previous: &GrayImage, current: &GrayImage) -> GrayImage {
        let raw = frame_diff::threshold_diff(previous, current, self.settings.diff_threshold);
        frame_diff::denoise(&raw, &self.kernel, self.settings.dilate_iterations)
    }

    fn estimate_motion(&mut self, previous: &GrayImage, tracking: Tracking) {
        let Some(current) = self.previous.as_ref() else {
            return;
        };
        let mask = self.motion_mask(previous, current);
        let (width, height) = mask.dimensions();
        let (w, h) = (width as f32, height as f32);
        let min_mass = self.settings.min_motion_mass;
        let heavy = |c: Option<Centroid>| c.filter(|c| c.mass > min_mass);

        match tracking {
            Tracking::SingleArm => {
                if let Some(c) = heavy(frame_diff::centroid(&mask, 0, width)) {
                    self.signal.arm_center_y =
                        blend(self.signal.arm_center_y, c.y / h, self.settings.single_weight);
                }
            }
            Tracking::BothHands => {
                let half = width / 2;
                let alpha = self.settings.dual_weight;
                if let Some(c) = heavy(frame_diff::centroid(&mask, 0, half)) {
                    let sample = Vec2::new(c.x / w, c.y / h);
                    self.signal.left_hand = self.signal.left_hand.lerp(sample, alpha);
                }
                if let Some(c) = heavy(frame_diff::centroid(&mask, half, half * 2)) {
                    let sample = Vec2::new(0.5 + c.x / w, c.y / h);
                    self.signal.right_hand = self.signal.right_hand.lerp(sample, alpha);
                }
            }
        }
        self.signal = self.signal.clamped();
    }
}
