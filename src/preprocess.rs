//! Intensity-based foreground mask.
//!
//! The resulting mask is produced alongside the plant mask but does not feed region selection
//! or color profiling.

use image::{GrayImage, RgbImage, imageops};
use imageproc::{contrast::otsu_level, filter::gaussian_blur_f32};

use crate::{
    config::PreprocessConfig,
    segmentation::{BACKGROUND, FOREGROUND, Mask, clean_mask},
};

/// Sigma picked for a blur kernel of `size` taps when none is given explicitly.
pub fn auto_sigma(size: u32) -> f32 {
    0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Grayscale, blur, inverted Otsu binarization, then opening and closing.
pub fn preprocess(raster: &RgbImage, config: &PreprocessConfig) -> Mask {
    let gray = imageops::grayscale(raster);
    let blurred = gaussian_blur_f32(&gray, auto_sigma(config.blur_kernel_size));
    let threshold = otsu_level(&blurred);
    tracing::debug!(threshold, "computed Otsu threshold");

    let binary = binarize_inverted(&blurred, threshold);
    clean_mask(&binary, &config.morphology)
}

/// Pixels at or below `threshold` become foreground.
pub fn binarize_inverted(gray: &GrayImage, threshold: u8) -> Mask {
    let mut binary = gray.clone();
    for pixel in binary.pixels_mut() {
        if pixel.0[0] <= threshold {
            *pixel = FOREGROUND;
        } else {
            *pixel = BACKGROUND;
        }
    }
    binary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segmentation::foreground_count;
    use image::{Luma, Rgb};

    #[test]
    fn auto_sigma_for_five_taps() {
        assert!((auto_sigma(5) - 1.1).abs() < 1e-6);
    }

    #[test]
    fn binarization_is_inverted_and_inclusive() {
        let gray = GrayImage::from_fn(3, 1, |x, _| Luma([[10, 100, 200][x as usize]]));
        let binary = binarize_inverted(&gray, 100);
        assert_eq!(binary.get_pixel(0, 0), &FOREGROUND);
        assert_eq!(binary.get_pixel(1, 0), &FOREGROUND);
        assert_eq!(binary.get_pixel(2, 0), &BACKGROUND);
    }

    #[test]
    fn dark_object_on_light_background_is_foreground() {
        let raster = RgbImage::from_fn(80, 80, |x, y| {
            if (20..60).contains(&x) && (20..60).contains(&y) {
                Rgb([20, 40, 20])
            } else {
                Rgb([230, 230, 230])
            }
        });
        let mask = preprocess(&raster, &PreprocessConfig::default());
        assert_eq!(mask.dimensions(), (80, 80));
        assert_eq!(mask.get_pixel(40, 40), &FOREGROUND);
        assert_eq!(mask.get_pixel(5, 5), &BACKGROUND);
        let count = foreground_count(&mask);
        assert!((1400..=1800).contains(&count), "unexpected foreground {count}");
    }
}
