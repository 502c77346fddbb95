//! Blur and rank filters. All kernels are `2 * blur_radius + 1` wide.

use super::{check_input, kernel_size, sigma_for_kernel};
use crate::core::error::FilterResult;
use crate::core::metadata::FilterMetadata;
use crate::core::params::{ParamName, ParameterSet};
use crate::filters::kind::FilterKind;
use crate::filters::registry::FilterRegistry;
use image::RgbImage;

/// Register blur filters.
pub fn register(registry: &mut FilterRegistry) {
    registry.register(
        FilterMetadata::builder(FilterKind::Gauss, "Gaussian Blur")
            .description("Gaussian smoothing with sigma derived from the kernel size")
            .parameter(ParamName::BlurRadius)
            .tag("smooth")
            .tag("soften")
            .build(),
    );
    registry.register(
        FilterMetadata::builder(FilterKind::Median, "Median Blur")
            .description("Per-channel median of the neighborhood")
            .parameter(ParamName::BlurRadius)
            .tag("denoise")
            .build(),
    );
    registry.register(
        FilterMetadata::builder(FilterKind::Average, "Box Blur")
            .description("Unweighted mean of the neighborhood")
            .parameter(ParamName::BlurRadius)
            .tag("smooth")
            .build(),
    );
    registry.register(
        FilterMetadata::builder(FilterKind::Min, "Minimum")
            .description("Per-channel minimum of the neighborhood (erode)")
            .parameter(ParamName::BlurRadius)
            .tag("erode")
            .build(),
    );
    registry.register(
        FilterMetadata::builder(FilterKind::Max, "Maximum")
            .description("Per-channel maximum of the neighborhood (dilate)")
            .parameter(ParamName::BlurRadius)
            .tag("dilate")
            .build(),
    );
}

/// Gaussian blur with the sigma a `size`-wide kernel implies.
pub(crate) fn gaussian(image: &RgbImage, size: u32) -> RgbImage {
    imageproc::filter::gaussian_blur_f32(image, sigma_for_kernel(size).max(0.1))
}

/// Gaussian blur.
pub fn gauss(image: &RgbImage, params: &ParameterSet) -> FilterResult<RgbImage> {
    check_input(FilterKind::Gauss, image)?;
    Ok(gaussian(image, kernel_size(params.blur_radius())))
}

/// Median filter.
pub fn median(image: &RgbImage, params: &ParameterSet) -> FilterResult<RgbImage> {
    check_input(FilterKind::Median, image)?;
    let radius = params.blur_radius();
    Ok(imageproc::filter::median_filter(image, radius, radius))
}

/// Box mean.
pub fn average(image: &RgbImage, params: &ParameterSet) -> FilterResult<RgbImage> {
    check_input(FilterKind::Average, image)?;
    let size = kernel_size(params.blur_radius()) as usize;
    let kernel = vec![1.0f32 / size as f32; size];
    Ok(imageproc::filter::separable_filter(image, &kernel, &kernel))
}

/// Per-channel window minimum (erosion).
pub fn min(image: &RgbImage, params: &ParameterSet) -> FilterResult<RgbImage> {
    check_input(FilterKind::Min, image)?;
    Ok(rank_window(image, params.blur_radius(), u8::min))
}

/// Per-channel window maximum (dilation).
pub fn max(image: &RgbImage, params: &ParameterSet) -> FilterResult<RgbImage> {
    check_input(FilterKind::Max, image)?;
    Ok(rank_window(image, params.blur_radius(), u8::max))
}

/// Separable square-window reduction with replicated borders.
fn rank_window(image: &RgbImage, radius: u32, pick: fn(u8, u8) -> u8) -> RgbImage {
    let horizontal = reduce_pass(image, radius, pick, true);
    reduce_pass(&horizontal, radius, pick, false)
}

fn reduce_pass(image: &RgbImage, radius: u32, pick: fn(u8, u8) -> u8, horizontal: bool) -> RgbImage {
    let (width, height) = image.dimensions();
    let r = radius as i64;
    let mut out = RgbImage::new(width, height);

    for (x, y, pixel) in out.enumerate_pixels_mut() {
        let mut acc = *image.get_pixel(x, y);
        for offset in -r..=r {
            let (sx, sy) = if horizontal {
                ((x as i64 + offset).clamp(0, width as i64 - 1) as u32, y)
            } else {
                (x, (y as i64 + offset).clamp(0, height as i64 - 1) as u32)
            };
            let sample = image.get_pixel(sx, sy);
            for c in 0..3 {
                acc[c] = pick(acc[c], sample[c]);
            }
        }
        *pixel = acc;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn dot() -> RgbImage {
        let mut image = RgbImage::from_pixel(9, 9, Rgb([10, 10, 10]));
        image.put_pixel(4, 4, Rgb([250, 250, 250]));
        image
    }

    fn radius(r: f64) -> ParameterSet {
        ParameterSet::default().with(ParamName::BlurRadius, r).unwrap()
    }

    #[test]
    fn test_solid_image_unchanged_by_rank_filters() {
        let image = RgbImage::from_pixel(7, 5, Rgb([80, 90, 100]));
        let params = radius(2.0);
        for f in [median, min, max] {
            assert_eq!(f(&image, &params).unwrap(), image);
        }
        let smoothed = gauss(&image, &params).unwrap();
        assert!(smoothed.pixels().all(|p| p[0].abs_diff(80) <= 1));
    }

    #[test]
    fn test_median_removes_isolated_dot() {
        let out = median(&dot(), &radius(1.0)).unwrap();
        assert_eq!(out.get_pixel(4, 4), &Rgb([10, 10, 10]));
    }

    #[test]
    fn test_gauss_spreads_dot() {
        let out = gauss(&dot(), &radius(1.0)).unwrap();
        assert!(out.get_pixel(4, 4)[0] < 250);
        assert!(out.get_pixel(5, 4)[0] > 10);
    }

    #[test]
    fn test_min_and_max_window() {
        let image = dot();
        let eroded = min(&image, &radius(1.0)).unwrap();
        assert!(eroded.pixels().all(|p| p[0] == 10));

        let dilated = max(&image, &radius(1.0)).unwrap();
        for y in 3..=5 {
            for x in 3..=5 {
                assert_eq!(dilated.get_pixel(x, y)[0], 250);
            }
        }
        assert_eq!(dilated.get_pixel(2, 4)[0], 10);
        assert_eq!(dilated.get_pixel(4, 6)[0], 10);
    }

    #[test]
    fn test_average_lowers_peak() {
        let out = average(&dot(), &radius(1.0)).unwrap();
        let center = out.get_pixel(4, 4)[0];
        assert!(center > 10 && center < 250);
    }
}
