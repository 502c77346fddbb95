//! Point transforms: each output sample depends only on the input sample.

use super::{apply_lut, build_lut, check_input, gray_to_rgb};
use crate::core::error::FilterResult;
use crate::core::metadata::FilterMetadata;
use crate::core::params::{ParamName, ParameterSet};
use crate::filters::kind::FilterKind;
use crate::filters::registry::FilterRegistry;
use image::RgbImage;

/// Register point filters.
pub fn register(registry: &mut FilterRegistry) {
    registry.register(
        FilterMetadata::builder(FilterKind::Color, "Color")
            .description("Original colors scaled by the intensity parameter")
            .parameter(ParamName::Intensity)
            .tag("brightness")
            .build(),
    );
    registry.register(
        FilterMetadata::builder(FilterKind::Gray, "Grayscale")
            .description("Luminance replicated to three channels")
            .tag("monochrome")
            .build(),
    );
    registry.register(
        FilterMetadata::builder(FilterKind::Threshold, "Threshold")
            .description("Binary black/white split of the grayscale image")
            .parameter(ParamName::Threshold)
            .tag("binarize")
            .build(),
    );
    registry.register(
        FilterMetadata::builder(FilterKind::IncreaseContrast, "Increase Contrast")
            .description("Scale every sample by 1.5")
            .build(),
    );
    registry.register(
        FilterMetadata::builder(FilterKind::DecreaseContrast, "Decrease Contrast")
            .description("Scale every sample by 0.5")
            .build(),
    );
    registry.register(
        FilterMetadata::builder(FilterKind::LogTransformation, "Log Transform")
            .description("Logarithmic tone curve stretched to the full range")
            .tag("tone")
            .build(),
    );
    registry.register(
        FilterMetadata::builder(FilterKind::PowerLaw, "Power Law")
            .description("Gamma curve with gamma taken from the intensity parameter")
            .parameter(ParamName::Intensity)
            .tag("gamma")
            .tag("tone")
            .build(),
    );
    registry.register(
        FilterMetadata::builder(FilterKind::Negative, "Negative")
            .description("Invert every sample (255 - value)")
            .tag("invert")
            .build(),
    );
}

/// Contrast scale `clip(in * alpha + beta)`, rounded like a saturating cast.
pub(crate) fn scale_abs(image: &RgbImage, alpha: f32, beta: f32) -> RgbImage {
    apply_lut(image, &build_lut(|v| (v * alpha + beta).round()))
}

/// Samples scaled by the intensity parameter.
pub fn color(image: &RgbImage, params: &ParameterSet) -> FilterResult<RgbImage> {
    check_input(FilterKind::Color, image)?;
    Ok(scale_abs(image, params.intensity() as f32, 0.0))
}

/// Luminance grayscale.
pub fn gray(image: &RgbImage, _params: &ParameterSet) -> FilterResult<RgbImage> {
    check_input(FilterKind::Gray, image)?;
    Ok(gray_to_rgb(&image::imageops::grayscale(image)))
}

/// Binary threshold on grayscale: above the cut-off is white.
pub fn threshold(image: &RgbImage, params: &ParameterSet) -> FilterResult<RgbImage> {
    check_input(FilterKind::Threshold, image)?;
    let cutoff = params.threshold();
    let mut gray = image::imageops::grayscale(image);
    for pixel in gray.pixels_mut() {
        pixel[0] = if pixel[0] > cutoff { 255 } else { 0 };
    }
    Ok(gray_to_rgb(&gray))
}

/// `clip(in * 1.5)`.
pub fn increase_contrast(image: &RgbImage, _params: &ParameterSet) -> FilterResult<RgbImage> {
    check_input(FilterKind::IncreaseContrast, image)?;
    Ok(scale_abs(image, 1.5, 0.0))
}

/// `clip(in * 0.5)`.
pub fn decrease_contrast(image: &RgbImage, _params: &ParameterSet) -> FilterResult<RgbImage> {
    check_input(FilterKind::DecreaseContrast, image)?;
    Ok(scale_abs(image, 0.5, 0.0))
}

/// `c * ln(1 + in)` with `c` chosen so the brightest sample maps to 255.
pub fn log_transformation(image: &RgbImage, _params: &ParameterSet) -> FilterResult<RgbImage> {
    check_input(FilterKind::LogTransformation, image)?;
    let brightest = image.iter().copied().max().unwrap_or(0);
    if brightest == 0 {
        // ln(1) == 0 everywhere, nothing to normalize by.
        return Ok(image.clone());
    }
    let peak = (brightest as f32 / 255.0).ln_1p();
    let lut = build_lut(|v| 255.0 * ((v / 255.0).ln_1p() / peak));
    Ok(apply_lut(image, &lut))
}

/// Gamma curve, gamma from the intensity parameter.
pub fn power_law(image: &RgbImage, params: &ParameterSet) -> FilterResult<RgbImage> {
    check_input(FilterKind::PowerLaw, image)?;
    let gamma = (params.intensity() as f32).max(0.05);
    let lut = build_lut(|v| (255.0 * (v / 255.0).powf(gamma)).round());
    Ok(apply_lut(image, &lut))
}

/// `255 - in`.
pub fn negative(image: &RgbImage, _params: &ParameterSet) -> FilterResult<RgbImage> {
    check_input(FilterKind::Negative, image)?;
    let mut out = image.clone();
    image::imageops::invert(&mut out);
    Ok(out)
}
