//! Motion-difference pipeline
//!
//! grayscale -> Gaussian blur -> |prev - curr| -> binary threshold ->
//! erode -> dilate -> centroid of the motion pixels.

use image::{GrayImage, Luma, RgbImage};
use imageproc::contrast::{ThresholdType, threshold};
use imageproc::filter::gaussian_blur_f32;
use imageproc::map::map_colors2;
use imageproc::morphology::{Mask, grayscale_dilate, grayscale_erode};

/// Largest structuring element a [`Mask`] image may describe
const MAX_KERNEL: u32 = 255;

/// Grayscale and blur a camera frame ready for differencing
pub fn preprocess(frame: &RgbImage, sigma: f32) -> GrayImage {
    let gray = image::imageops::grayscale(frame);
    if sigma > 0.0 {
        gaussian_blur_f32(&gray, sigma)
    } else {
        gray
    }
}

/// Per-pixel absolute difference. Both images must have the same dimensions.
pub fn abs_diff(prev: &GrayImage, curr: &GrayImage) -> GrayImage {
    map_colors2(prev, curr, |a: Luma<u8>, b: Luma<u8>| Luma([a[0].abs_diff(b[0])]))
}

/// Binary mask (0 or 255) of pixels whose absolute difference exceeds
/// `thresh`
pub fn threshold_diff(prev: &GrayImage, curr: &GrayImage, thresh: u8) -> GrayImage {
    threshold(&abs_diff(prev, curr), thresh, ThresholdType::Binary)
}

/// Elliptical structuring element of `size` x `size` as an image (size is
/// forced odd). A 5x5 element is a full block with the four corner pairs
/// removed.
pub fn ellipse_image(size: u32) -> GrayImage {
    let size = (size.min(MAX_KERNEL) | 1) as i32;
    let r = size / 2;
    GrayImage::from_fn(size as u32, size as u32, |x, y| {
        let dy = y as i32 - r;
        let span = if r == 0 {
            0
        } else {
            let ratio = ((r * r - dy * dy) as f64) / (r * r) as f64;
            (r as f64 * ratio.sqrt()).round() as i32
        };
        if (x as i32 - r).abs() <= span {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}

/// Elliptical [`Mask`] centred on its middle pixel
pub fn ellipse_kernel(size: u32) -> Mask {
    let image = ellipse_image(size);
    let center = (image.width() / 2) as u8;
    Mask::from_image(&image, center, center)
}

pub fn erode(mask: &GrayImage, kernel: &Mask) -> GrayImage {
    grayscale_erode(mask, kernel)
}

pub fn dilate(mask: &GrayImage, kernel: &Mask, iterations: u32) -> GrayImage {
    let mut out = mask.clone();
    for _ in 0..iterations {
        out = grayscale_dilate(&out, kernel);
    }
    out
}

/// Denoise a raw motion mask: one erosion then `dilate_iterations` dilations
pub fn denoise(mask: &GrayImage, kernel: &Mask, dilate_iterations: u32) -> GrayImage {
    dilate(&erode(mask, kernel), kernel, dilate_iterations)
}

/// Mean position of the set pixels in a column band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Centroid {
    /// Relative to the band's first column, in pixels
    pub x: f32,
    pub y: f32,
    /// Number of set pixels
    pub mass: f32,
}

/// Centroid of set pixels with `x0 <= x < x1`. None when the band is empty.
pub fn centroid(mask: &GrayImage, x0: u32, x1: u32) -> Option<Centroid> {
    let (width, height) = mask.dimensions();
    let x1 = x1.min(width);
    let (mut sum_x, mut sum_y, mut mass) = (0.0f64, 0.0f64, 0u64);
    for y in 0..height {
        for x in x0..x1 {
            if mask.get_pixel(x, y)[0] > 0 {
                sum_x += (x - x0) as f64;
                sum_y += y as f64;
                mass += 1;
            }
        }
    }
    (mass > 0).then(|| Centroid {
        x: (sum_x / mass as f64) as f32,
        y: (sum_y / mass as f64) as f32,
        mass: mass as f32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(width: u32, height: u32, x0: u32, y0: u32, side: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| {
            if x >= x0 && x < x0 + side && y >= y0 && y < y0 + side {
                Luma([255])
            } else {
                Luma([0])
            }
        })
    }

    #[test]
    fn test_ellipse_kernel_shape() {
        let element = ellipse_image(5);
        let set = |x, y| element.get_pixel(x, y)[0] > 0;
        assert_eq!(element.pixels().filter(|p| p[0] > 0).count(), 17);
        assert!(set(2, 0));
        assert!(set(0, 1));
        assert!(!set(1, 0));
        assert!(!set(4, 4));
        assert_eq!(ellipse_image(0).dimensions(), (1, 1));
    }

    #[test]
    fn test_dilate_grows_by_kernel_shape() {
        let dot = square(11, 11, 5, 5, 1);
        let grown = dilate(&dot, &ellipse_kernel(5), 1);
        assert_eq!(grown.pixels().filter(|p| p[0] > 0).count(), 17);
        assert_eq!(grown.get_pixel(5, 3)[0], 255);
        assert_eq!(grown.get_pixel(4, 3)[0], 0);
    }

    #[test]
    fn test_threshold_is_strict() {
        let a = GrayImage::from_pixel(4, 4, Luma([100]));
        let mut b = GrayImage::from_pixel(4, 4, Luma([140]));
        b.put_pixel(1, 1, Luma([141]));
        let mask = threshold_diff(&a, &b, 40);
        assert_eq!(mask.get_pixel(0, 0)[0], 0);
        assert_eq!(mask.get_pixel(1, 1)[0], 255);
    }

    #[test]
    fn test_erode_removes_speckle() {
        let mut mask = square(40, 40, 10, 10, 12);
        mask.put_pixel(35, 35, Luma([255]));
        let kernel = ellipse_kernel(5);
        let cleaned = denoise(&mask, &kernel, 2);
        assert_eq!(cleaned.get_pixel(35, 35)[0], 0);
        assert_eq!(cleaned.get_pixel(15, 15)[0], 255);
    }

    #[test]
    fn test_centroid_of_band() {
        let mask = square(40, 20, 24, 4, 6);
        let full = centroid(&mask, 0, 40);
        assert_eq!(
            full,
            Some(Centroid {
                x: 26.5,
                y: 6.5,
                mass: 36.0
            })
        );
        let right = centroid(&mask, 20, 40);
        assert_eq!(right.map(|c| c.x), Some(6.5));
        assert_eq!(centroid(&mask, 0, 20), None);
    }

    #[test]
    fn test_identical_frames_have_no_motion() {
        let frame = RgbImage::from_pixel(32, 24, image::Rgb([90, 120, 30]));
        let a = preprocess(&frame, 2.0);
        let mask = threshold_diff(&a, &a, 40);
        assert_eq!(centroid(&mask, 0, 32), None);
    }
}
