//! Edge magnitude filters on the grayscale image.
//!
//! Responses are stretched so the strongest edge becomes 255. A flat image
//! has no edges at all and yields black.

use super::{check_input, gray_to_rgb, normalize_by_max};
use crate::core::error::FilterResult;
use crate::core::metadata::FilterMetadata;
use crate::core::params::ParameterSet;
use crate::filters::kind::FilterKind;
use crate::filters::registry::FilterRegistry;
use image::{GrayImage, Luma, RgbImage};
use imageproc::definitions::Image;
use imageproc::filter::laplacian_filter;
use imageproc::gradients::{horizontal_prewitt, horizontal_sobel, vertical_prewitt, vertical_sobel};

/// Register edge filters.
pub fn register(registry: &mut FilterRegistry) {
    registry.register(
        FilterMetadata::builder(FilterKind::Sobel, "Sobel")
            .description("Gradient magnitude from the 3x3 Sobel pair")
            .tag("edges")
            .tag("gradient")
            .build(),
    );
    registry.register(
        FilterMetadata::builder(FilterKind::Laplace, "Laplacian")
            .description("Absolute second derivative")
            .tag("edges")
            .build(),
    );
    registry.register(
        FilterMetadata::builder(FilterKind::Prewitt, "Prewitt")
            .description("Gradient magnitude from the 3x3 Prewitt pair")
            .tag("edges")
            .tag("gradient")
            .build(),
    );
}

/// Sobel gradient magnitude.
pub fn sobel(image: &RgbImage, _params: &ParameterSet) -> FilterResult<RgbImage> {
    check_input(FilterKind::Sobel, image)?;
    let gray = image::imageops::grayscale(image);
    Ok(gradient_magnitude(&gray, &horizontal_sobel(&gray), &vertical_sobel(&gray)))
}

/// Absolute Laplacian.
pub fn laplace(image: &RgbImage, _params: &ParameterSet) -> FilterResult<RgbImage> {
    check_input(FilterKind::Laplace, image)?;
    let gray = image::imageops::grayscale(image);
    let response: Vec<f32> = laplacian_filter(&gray)
        .pixels()
        .map(|p| (p[0] as f32).abs())
        .collect();
    Ok(gray_to_rgb(&normalize_by_max(gray.width(), gray.height(), &response)))
}

/// Prewitt gradient magnitude.
pub fn prewitt(image: &RgbImage, _params: &ParameterSet) -> FilterResult<RgbImage> {
    check_input(FilterKind::Prewitt, image)?;
    let gray = image::imageops::grayscale(image);
    Ok(gradient_magnitude(&gray, &horizontal_prewitt(&gray), &vertical_prewitt(&gray)))
}

fn gradient_magnitude(gray: &GrayImage, gx: &Image<Luma<i16>>, gy: &Image<Luma<i16>>) -> RgbImage {
    let magnitude: Vec<f32> = gx
        .pixels()
        .zip(gy.pixels())
        .map(|(x, y)| (x[0] as f32).hypot(y[0] as f32))
        .collect();
    gray_to_rgb(&normalize_by_max(gray.width(), gray.height(), &magnitude))
}
