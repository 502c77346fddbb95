//! Spatial effects: vignette and tilt-shift.

use super::blur::gaussian;
use super::{check_input, clip, kernel_size};
use crate::core::error::FilterResult;
use crate::core::metadata::FilterMetadata;
use crate::core::params::{ParamName, ParameterSet};
use crate::filters::kind::FilterKind;
use crate::filters::registry::FilterRegistry;
use image::RgbImage;

/// Register effect filters.
pub fn register(registry: &mut FilterRegistry) {
    registry.register(
        FilterMetadata::builder(FilterKind::Vignette, "Vignette")
            .description("Darken the corners with a Gaussian falloff")
            .parameter(ParamName::Vignette)
            .tag("falloff")
            .build(),
    );
    registry.register(
        FilterMetadata::builder(FilterKind::TiltShift, "Tilt Shift")
            .description("Keep a horizontal band sharp and blur above and below it")
            .parameter(ParamName::BlurRadius)
            .tag("miniature")
            .tag("focus")
            .build(),
    );
}

/// Gaussian profile over `len` samples with sigma `len / 2`, peak 1.
fn profile(len: u32) -> Vec<f32> {
    let sigma = (len as f32 / 2.0).max(f32::EPSILON);
    let center = (len as f32 - 1.0) / 2.0;
    let raw: Vec<f32> = (0..len)
        .map(|i| {
            let d = i as f32 - center;
            (-(d * d) / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let peak = raw.iter().copied().fold(0.0f32, f32::max);
    raw.into_iter().map(|v| v / peak).collect()
}

/// Row-major vignette mask in `(0, 1]` with its maximum at the center.
pub(crate) fn vignette_mask(width: u32, height: u32) -> Vec<f32> {
    let px = profile(width);
    let py = profile(height);
    py.iter()
        .flat_map(|&y| px.iter().map(move |&x| x * y))
        .collect()
}

/// Multiply every channel by `mask ^ exponent`.
pub(crate) fn apply_mask(image: &RgbImage, mask: &[f32], exponent: f32) -> RgbImage {
    let mut out = image.clone();
    for (pixel, weight) in out.pixels_mut().zip(mask) {
        let factor = weight.powf(exponent);
        for channel in pixel.0.iter_mut() {
            *channel = clip(*channel as f32 * factor);
        }
    }
    out
}

/// Darken toward the corners with a Gaussian falloff.
pub fn vignette(image: &RgbImage, params: &ParameterSet) -> FilterResult<RgbImage> {
    check_input(FilterKind::Vignette, image)?;
    let (width, height) = image.dimensions();
    let exponent = 2.0 * params.vignette() as f32;
    Ok(apply_mask(image, &vignette_mask(width, height), exponent))
}

/// Weight of the sharp image for a row: 1 at the center, falling linearly
/// to 0 at `height / 3` rows away.
fn focus_weight(y: u32, height: u32) -> f32 {
    let center = (height / 2) as f32;
    let band = (height / 3).max(1) as f32;
    (1.0 - (y as f32 - center).abs() / band).clamp(0.0, 1.0)
}

/// Sharp horizontal band over a heavily blurred copy.
pub fn tilt_shift(image: &RgbImage, params: &ParameterSet) -> FilterResult<RgbImage> {
    check_input(FilterKind::TiltShift, image)?;
    let blurred = gaussian(image, kernel_size(3 * params.blur_radius()));
    let height = image.height();

    let mut out = blurred;
    for (x, y, pixel) in out.enumerate_pixels_mut() {
        let weight = focus_weight(y, height);
        let sharp = image.get_pixel(x, y);
        for c in 0..3 {
            let blended = sharp[c] as f32 * weight + pixel[c] as f32 * (1.0 - weight);
            pixel[c] = clip(blended);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_mask_peaks_at_center() {
        let mask = vignette_mask(5, 5);
        assert!((mask[12] - 1.0).abs() < 1e-6);
        assert!(mask.iter().all(|&m| m > 0.0 && m <= 1.0));
        assert!(mask[0] < mask[6]);
        assert!(mask[6] < mask[12]);
    }

    #[test]
    fn test_even_sized_mask_is_normalized() {
        let mask = vignette_mask(4, 6);
        let peak = mask.iter().copied().fold(0.0f32, f32::max);
        assert!((peak - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_strength_is_identity() {
        let image = RgbImage::from_fn(9, 7, |x, y| Rgb([(x * 25) as u8, (y * 30) as u8, 200]));
        let params = ParameterSet::default().with(ParamName::Vignette, 0.0).unwrap();
        assert_eq!(vignette(&image, &params).unwrap(), image);
    }

    #[test]
    fn test_vignette_darkens_corners_only() {
        let image = RgbImage::from_pixel(9, 9, Rgb([200, 200, 200]));
        let out = vignette(&image, &ParameterSet::default()).unwrap();
        assert_eq!(out.get_pixel(4, 4), &Rgb([200, 200, 200]));
        assert!(out.get_pixel(0, 0)[0] < 200);
        assert!(out.get_pixel(0, 0)[0] <= out.get_pixel(2, 2)[0]);
    }

    #[test]
    fn test_focus_weight_ramp() {
        assert_eq!(focus_weight(30, 60), 1.0);
        assert_eq!(focus_weight(10, 60), 0.0);
        assert_eq!(focus_weight(59, 60), 0.0);
        assert!((focus_weight(20, 60) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_tilt_shift_keeps_center_row_sharp() {
        let image = RgbImage::from_fn(12, 30, |x, _| if x % 2 == 0 { Rgb([0, 0, 0]) } else { Rgb([255, 255, 255]) });
        let params = ParameterSet::default().with(ParamName::BlurRadius, 1.0).unwrap();
        let out = tilt_shift(&image, &params).unwrap();
        for x in 0..12 {
            assert_eq!(out.get_pixel(x, 15), image.get_pixel(x, 15));
        }
        let top = out.get_pixel(5, 0)[0];
        assert!(top > 0 && top < 255);
    }
}
