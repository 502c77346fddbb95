//! Built-in filter implementations.
//!
//! Each submodule registers its filters' metadata with the registry; the
//! kind-to-function mapping lives in [`function`] so it is resolved by a
//! single exhaustive `match`.

mod advanced;
mod blur;
mod color;
mod edge;
mod effects;
mod point;

use crate::core::error::{FilterError, FilterResult};
use crate::core::io::ensure_not_empty;
use crate::core::params::ParameterSet;
use crate::filters::kind::FilterKind;
use crate::filters::registry::FilterRegistry;
use image::{GrayImage, Rgb, RgbImage};

/// Signature shared by every filter.
pub type FilterFn = fn(&RgbImage, &ParameterSet) -> FilterResult<RgbImage>;

/// Register all built-in filters.
pub fn register_all(registry: &mut FilterRegistry) {
    point::register(registry);
    color::register(registry);
    blur::register(registry);
    edge::register(registry);
    effects::register(registry);
    advanced::register(registry);
}

/// Function implementing a filter.
pub fn function(kind: FilterKind) -> FilterFn {
    match kind {
        FilterKind::Color => point::color,
        FilterKind::Gray => point::gray,
        FilterKind::Threshold => point::threshold,
        FilterKind::IncreaseContrast => point::increase_contrast,
        FilterKind::DecreaseContrast => point::decrease_contrast,
        FilterKind::LogTransformation => point::log_transformation,
        FilterKind::PowerLaw => point::power_law,
        FilterKind::Negative => point::negative,
        FilterKind::Temperature => color::temperature,
        FilterKind::Saturation => color::saturation,
        FilterKind::Gauss => blur::gauss,
        FilterKind::Median => blur::median,
        FilterKind::Average => blur::average,
        FilterKind::Min => blur::min,
        FilterKind::Max => blur::max,
        FilterKind::Sobel => edge::sobel,
        FilterKind::Laplace => edge::laplace,
        FilterKind::Prewitt => edge::prewitt,
        FilterKind::Vignette => effects::vignette,
        FilterKind::TiltShift => effects::tilt_shift,
        FilterKind::Denoise => advanced::denoise,
        FilterKind::Unsharp => advanced::unsharp,
        FilterKind::HistogramEqualization => advanced::histogram_equalization,
        FilterKind::Hdr => advanced::hdr,
        FilterKind::Sepia => advanced::sepia,
        FilterKind::Vintage => advanced::vintage,
    }
}

// ============================================================================
// Shared helpers
// ============================================================================

/// Fail with `InvalidInput` on an empty image.
pub(crate) fn check_input(kind: FilterKind, image: &RgbImage) -> FilterResult<()> {
    ensure_not_empty(image).map_err(|reason| FilterError::invalid_input(kind.id(), reason))
}

/// Odd kernel size for a radius.
pub(crate) fn kernel_size(radius: u32) -> u32 {
    2 * radius + 1
}

/// Gaussian sigma for a kernel size when none is given explicitly.
pub(crate) fn sigma_for_kernel(size: u32) -> f32 {
    0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Clamp a float sample into `u8`, truncating the fraction.
#[inline]
pub(crate) fn clip(value: f32) -> u8 {
    value.clamp(0.0, 255.0) as u8
}

/// Replicate a single channel into three.
pub(crate) fn gray_to_rgb(gray: &GrayImage) -> RgbImage {
    RgbImage::from_fn(gray.width(), gray.height(), |x, y| {
        let v = gray.get_pixel(x, y)[0];
        Rgb([v, v, v])
    })
}

/// Apply a per-sample lookup table to every channel.
pub(crate) fn apply_lut(image: &RgbImage, lut: &[u8; 256]) -> RgbImage {
    let mut out = image.clone();
    for sample in out.iter_mut() {
        *sample = lut[*sample as usize];
    }
    out
}

/// Build a lookup table from a per-sample function.
pub(crate) fn build_lut(f: impl Fn(f32) -> f32) -> [u8; 256] {
    let mut lut = [0u8; 256];
    for (i, entry) in lut.iter_mut().enumerate() {
        *entry = clip(f(i as f32));
    }
    lut
}

/// Scale a non-negative response map so its maximum becomes 255.
///
/// A map whose maximum is zero (solid input) is returned unscaled.
pub(crate) fn normalize_by_max(width: u32, height: u32, values: &[f32]) -> GrayImage {
    let max = values.iter().copied().fold(0.0f32, f32::max);
    let scale = if max > 0.0 && max.is_finite() { 255.0 / max } else { 1.0 };
    GrayImage::from_fn(width, height, |x, y| {
        let v = values[(y * width + x) as usize];
        image::Luma([clip(v * scale)])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_size_is_odd() {
        for radius in 1..=21 {
            assert_eq!(kernel_size(radius) % 2, 1);
        }
    }

    #[test]
    fn test_sigma_for_kernel() {
        assert!((sigma_for_kernel(3) - 0.8).abs() < 1e-6);
        assert!(sigma_for_kernel(11) > sigma_for_kernel(3));
    }

    #[test]
    fn test_normalize_degenerate_map() {
        let gray = normalize_by_max(2, 2, &[0.0; 4]);
        assert!(gray.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn test_normalize_spans_full_range() {
        let gray = normalize_by_max(2, 1, &[2.0, 4.0]);
        assert_eq!(gray.get_pixel(0, 0)[0], 127);
        assert_eq!(gray.get_pixel(1, 0)[0], 255);
    }

    #[test]
    fn test_every_kind_has_a_function() {
        let image = RgbImage::from_pixel(6, 5, Rgb([90, 120, 200]));
        let params = ParameterSet::default();
        for kind in FilterKind::ALL {
            let out = function(kind)(&image, &params).unwrap();
            assert_eq!(out.dimensions(), image.dimensions(), "{kind}");
        }
    }

    #[test]
    fn test_every_kind_rejects_empty_input() {
        let empty = RgbImage::new(0, 0);
        let params = ParameterSet::default();
        for kind in FilterKind::ALL {
            let err = function(kind)(&empty, &params).unwrap_err();
            assert!(matches!(err, FilterError::InvalidInput { .. }), "{kind}");
        }
    }
}
