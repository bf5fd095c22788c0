use image::{Rgb, RgbImage};
use palette::{FromColor, Hsv, Srgb};

use crate::{record::ColorSignature, segmentation::Mask};

/// Converts an RGB pixel to 8-bit HSV: hue in half-degrees `0..180`, saturation and value in
/// `0..=255`.
pub fn to_hsv8(pixel: Rgb<u8>) -> [u8; 3] {
    let [red, green, blue] = pixel.0;
    let srgb: Srgb<f32> = Srgb::new(red, green, blue).into_format();
    let hsv: Hsv = Hsv::from_color(srgb);

    let hue = (hsv.hue.into_positive_degrees() / 2.0).round() as u32 % 180;
    let saturation = (hsv.saturation * 255.0).round().clamp(0.0, 255.0);
    let value = (hsv.value * 255.0).round().clamp(0.0, 255.0);

    [hue as u8, saturation as u8, value as u8]
}

/// Copy of `raster` with every pixel outside `mask` set to black.
pub fn apply_mask(raster: &RgbImage, mask: &Mask) -> RgbImage {
    RgbImage::from_fn(raster.width(), raster.height(), |x, y| {
        if mask.get_pixel(x, y).0[0] > 0 {
            *raster.get_pixel(x, y)
        } else {
            Rgb([0, 0, 0])
        }
    })
}

/// Mean 8-bit HSV over the foreground pixels of `mask`.
///
/// The population is every foreground pixel of the mask, not only those inside the selected
/// contour, so disconnected specks contribute. An empty mask yields all zeros.
pub fn color_profile(raster: &RgbImage, mask: &Mask) -> ColorSignature {
    let masked = apply_mask(raster, mask);

    let mut sums = [0u64; 3];
    let mut count = 0u64;
    for (pixel, m) in masked.pixels().zip(mask.pixels()) {
        if m.0[0] == 0 {
            continue;
        }
        let hsv = to_hsv8(*pixel);
        for (sum, channel) in sums.iter_mut().zip(hsv) {
            *sum += u64::from(channel);
        }
        count += 1;
    }

    if count == 0 {
        return ColorSignature::default();
    }

    let mean = |sum: u64| sum as f64 / count as f64;
    ColorSignature {
        hue: mean(sums[0]),
        saturation: mean(sums[1]),
        value: mean(sums[2]),
    }
}
