//! Pose model seam and heatmap peak extraction
//!
//! A model returns one confidence map per joint in COCO order. Only the two
//! wrists are read.

use image::RgbImage;

use crate::error::EstimatorError;

/// COCO joint index of the right wrist
pub const RIGHT_WRIST: usize = 4;
/// COCO joint index of the left wrist
pub const LEFT_WRIST: usize = 7;

/// Per-pixel confidence map for one joint (row-major)
#[derive(Debug, Clone, PartialEq)]
pub struct Heatmap {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f32>,
}

/// Location and value of a heatmap maximum
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    /// Column divided by heatmap width
    pub x: f32,
    /// Row divided by heatmap height
    pub y: f32,
    pub confidence: f32,
}

impl Heatmap {
    pub fn new(width: usize, height: usize, data: Vec<f32>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    pub fn zeros(width: usize, height: usize) -> Self {
        Self::new(width, height, vec![0.0; width * height])
    }

    /// Gaussian blob centred on normalized `(x, y)` with unit peak
    pub fn gaussian(width: usize, height: usize, x: f32, y: f32, sigma: f32) -> Self {
        let cx = x * width as f32;
        let cy = y * height as f32;
        let two_sigma_sq = 2.0 * sigma * sigma;
        let mut data = Vec::with_capacity(width * height);
        for r in 0..height {
            for c in 0..width {
                let dx = c as f32 - cx;
                let dy = r as f32 - cy;
                data.push((-(dx * dx + dy * dy) / two_sigma_sq).exp());
            }
        }
        Self::new(width, height, data)
    }

    /// First maximum in row-major order. None for an empty map.
    pub fn peak(&self) -> Option<Peak> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        let (index, confidence) = self
            .data
            .iter()
            .take(self.width * self.height)
            .copied()
            .enumerate()
            .fold(None, |best: Option<(usize, f32)>, (i, v)| match best {
                Some((_, b)) if b >= v => best,
                _ => Some((i, v)),
            })?;
        Some(Peak {
            x: (index % self.width) as f32 / self.width as f32,
            y: (index / self.width) as f32 / self.height as f32,
            confidence,
        })
    }
}

/// A loaded pose-estimation network
pub trait PoseModel {
    /// Run inference on one frame, returning a heatmap per joint
    fn infer(&mut self, frame: &RgbImage) -> Result<Vec<Heatmap>, EstimatorError>;
}

/// Peaks for (left wrist, right wrist)
pub fn wrist_peaks(heatmaps: &[Heatmap]) -> Result<(Option<Peak>, Option<Peak>), EstimatorError> {
    let joint = |index: usize| {
        heatmaps
            .get(index)
            .map(Heatmap::peak)
            .ok_or(EstimatorError::MissingJoint(index))
    };
    Ok((joint(LEFT_WRIST)?, joint(RIGHT_WRIST)?))
}
