//! Color adjustments: white-balance temperature and saturation.

use super::check_input;
use crate::core::error::FilterResult;
use crate::core::metadata::FilterMetadata;
use crate::core::params::{ParamName, ParameterSet};
use crate::filters::kind::FilterKind;
use crate::filters::registry::FilterRegistry;
use image::{Pixel, RgbImage};

/// Register color filters.
pub fn register(registry: &mut FilterRegistry) {
    registry.register(
        FilterMetadata::builder(FilterKind::Temperature, "Temperature")
            .description("Shift white balance: negative values cool, positive values warm")
            .parameter(ParamName::Temperature)
            .tag("white balance")
            .build(),
    );
    registry.register(
        FilterMetadata::builder(FilterKind::Saturation, "Saturation")
            .description("Scale color saturation in HSV space")
            .parameter(ParamName::Saturation)
            .tag("vibrance")
            .build(),
    );
}

/// Scale red and blue in opposite directions.
///
/// Warming (t > 0) multiplies red by `1 + t/100` and blue by `1 - t/200`;
/// cooling does the mirror image. A negative value therefore never lowers
/// blue nor raises red.
pub fn temperature(image: &RgbImage, params: &ParameterSet) -> FilterResult<RgbImage> {
    check_input(FilterKind::Temperature, image)?;
    let t = params.temperature() as f32;
    let (red_gain, blue_gain) = if t > 0.0 {
        (1.0 + t / 100.0, 1.0 - t / 200.0)
    } else {
        (1.0 + t / 200.0, 1.0 - t / 100.0)
    };

    let mut result = image.clone();
    for pixel in result.pixels_mut() {
        let channels = pixel.channels_mut();
        channels[0] = (channels[0] as f32 * red_gain).clamp(0.0, 255.0) as u8;
        channels[2] = (channels[2] as f32 * blue_gain).clamp(0.0, 255.0) as u8;
    }
    Ok(result)
}

/// Scale HSV saturation.
pub fn saturation(image: &RgbImage, params: &ParameterSet) -> FilterResult<RgbImage> {
    check_input(FilterKind::Saturation, image)?;
    let factor = params.saturation() as f32;

    let mut result = image.clone();
    for pixel in result.pixels_mut() {
        let channels = pixel.channels_mut();
        let (h, s, v) = rgb_to_hsv(channels[0], channels[1], channels[2]);
        let [r, g, b] = hsv_to_rgb(h, (s * factor).clamp(0.0, 1.0), v);
        channels[0] = r;
        channels[1] = g;
        channels[2] = b;
    }
    Ok(result)
}

/// RGB to HSV with hue in degrees, saturation and value in [0, 1].
pub(crate) fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (f32, f32, f32) {
    let r = r as f32 / 255.0;
    let g = g as f32 / 255.0;
    let b = b as f32 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    let s = if max == 0.0 { 0.0 } else { delta / max };
    (h, s, max)
}

pub(crate) fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [u8; 3] {
    let c = v * s;
    let h_prime = (h / 60.0).rem_euclid(6.0);
    let x = c * (1.0 - (h_prime % 2.0 - 1.0).abs());
    let (r, g, b) = match h_prime as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = v - c;
    let to_u8 = |value: f32| ((value + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    [to_u8(r), to_u8(g), to_u8(b)]
}
