//! Plant segmentation on a fixed green HSV band.

use image::{GrayImage, Luma, RgbImage};
use imageproc::{
    distance_transform::Norm,
    morphology::{close, open},
};

use crate::{
    colors::to_hsv8,
    config::{MorphologyConfig, SegmentationConfig},
};

/// Binary foreground/background classification; foreground pixels are `255`, background `0`.
pub type Mask = GrayImage;

pub(crate) const FOREGROUND: Luma<u8> = Luma([255]);
pub(crate) const BACKGROUND: Luma<u8> = Luma([0]);

/// Builds the plant mask: pixels whose HSV triple lies in the configured band, cleaned by an
/// opening then a closing.
pub fn segment_plant(raster: &RgbImage, config: &SegmentationConfig) -> Mask {
    let band = GrayImage::from_fn(raster.width(), raster.height(), |x, y| {
        if config.contains(to_hsv8(*raster.get_pixel(x, y))) {
            FOREGROUND
        } else {
            BACKGROUND
        }
    });

    let mask = clean_mask(&band, &config.morphology);
    tracing::debug!(
        band_pixels = foreground_count(&band),
        mask_pixels = foreground_count(&mask),
        "segmented green band"
    );
    mask
}

/// Opening then closing with a square kernel. `N`-sized kernels applied `k` times are a single
/// L∞ step of radius `(N / 2) * k`.
pub fn clean_mask(mask: &Mask, morphology: &MorphologyConfig) -> Mask {
    let open_radius = morphology.radius(morphology.open_iterations);
    let close_radius = morphology.radius(morphology.close_iterations);

    let opened = if open_radius > 0 {
        open(mask, Norm::LInf, open_radius)
    } else {
        mask.clone()
    };

    if close_radius > 0 {
        close(&opened, Norm::LInf, close_radius)
    } else {
        opened
    }
}

pub fn foreground_count(mask: &Mask) -> usize {
    mask.pixels().filter(|p| p.0[0] > 0).count()
}
