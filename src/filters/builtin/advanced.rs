//! Sharpening, equalization and stylized looks.

use super::blur::gaussian;
use super::effects::{apply_mask, vignette_mask};
use super::{check_input, clip};
use crate::core::error::FilterResult;
use crate::core::metadata::FilterMetadata;
use crate::core::params::{ParamName, ParameterSet};
use crate::filters::kind::FilterKind;
use crate::filters::registry::FilterRegistry;
use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::filter::bilateral_filter;
use std::ops::Range;

const SEPIA: [[f32; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

const UNSHARP_SIGMA: f32 = 2.0;
const VINTAGE_TINT: [f32; 3] = [240.0, 200.0, 150.0];

const DENOISE_WINDOW: u32 = 7;
const DENOISE_SPATIAL_SIGMA: f32 = 2.0;
/// Color sigma per unit of denoise strength.
const DENOISE_COLOR_SCALE: f32 = 2.5;

const HDR_GRID: u32 = 8;
const HDR_CLIP_LIMIT: f32 = 3.0;

/// Register advanced filters.
pub fn register(registry: &mut FilterRegistry) {
    registry.register(
        FilterMetadata::builder(FilterKind::Denoise, "Denoise")
            .description("Edge-preserving bilateral smoothing per channel")
            .parameter(ParamName::DenoiseStrength)
            .tag("denoise")
            .tag("smooth")
            .build(),
    );
    registry.register(
        FilterMetadata::builder(FilterKind::Unsharp, "Unsharp Mask")
            .description("Sharpen by subtracting half of a blurred copy")
            .tag("sharpen")
            .build(),
    );
    registry.register(
        FilterMetadata::builder(FilterKind::HistogramEqualization, "Histogram Equalization")
            .description("Equalize luma while keeping chroma")
            .tag("contrast")
            .tag("auto")
            .build(),
    );
    registry.register(
        FilterMetadata::builder(FilterKind::Hdr, "HDR")
            .description("Tile-local contrast-limited equalization of luma")
            .tag("contrast")
            .tag("local")
            .build(),
    );
    registry.register(
        FilterMetadata::builder(FilterKind::Sepia, "Sepia")
            .description("Classic brown-toned color matrix")
            .tag("retro")
            .build(),
    );
    registry.register(
        FilterMetadata::builder(FilterKind::Vintage, "Vintage")
            .description("Faded warm look with darkened corners")
            .parameter(ParamName::Vignette)
            .tag("retro")
            .tag("film")
            .build(),
    );
}

/// Bilateral filter on each channel. Strength zero returns the input.
pub fn denoise(image: &RgbImage, params: &ParameterSet) -> FilterResult<RgbImage> {
    check_input(FilterKind::Denoise, image)?;
    let strength = params.denoise_strength();
    if strength == 0 {
        return Ok(image.clone());
    }
    let sigma_color = DENOISE_COLOR_SCALE * strength as f32;

    let (width, height) = image.dimensions();
    let mut out = image.clone();
    for c in 0..3 {
        let channel = GrayImage::from_fn(width, height, |x, y| Luma([image.get_pixel(x, y)[c]]));
        let smoothed = bilateral_filter(&channel, DENOISE_WINDOW, sigma_color, DENOISE_SPATIAL_SIGMA);
        for (pixel, value) in out.pixels_mut().zip(smoothed.pixels()) {
            pixel[c] = value[0];
        }
    }
    Ok(out)
}

/// `1.5 * image - 0.5 * blur(image)`, clipped.
pub fn unsharp(image: &RgbImage, _params: &ParameterSet) -> FilterResult<RgbImage> {
    check_input(FilterKind::Unsharp, image)?;
    let blurred = imageproc::filter::gaussian_blur_f32(image, UNSHARP_SIGMA);
    let mut out = image.clone();
    for (pixel, soft) in out.pixels_mut().zip(blurred.pixels()) {
        for c in 0..3 {
            pixel[c] = clip((1.5 * pixel[c] as f32 - 0.5 * soft[c] as f32).round());
        }
    }
    Ok(out)
}

/// Global histogram equalization of luma; chroma is kept.
pub fn histogram_equalization(image: &RgbImage, _params: &ParameterSet) -> FilterResult<RgbImage> {
    check_input(FilterKind::HistogramEqualization, image)?;
    let ycbcr: Vec<[f32; 3]> = image.pixels().map(rgb_to_ycbcr).collect();
    let luma = luma_plane(image.width(), image.height(), &ycbcr);
    let equalized = imageproc::contrast::equalize_histogram(&luma);
    Ok(with_luma(&equalized, &ycbcr))
}

/// Local tone mapping: CLAHE on an 8x8 tile grid over luma, chroma kept.
pub fn hdr(image: &RgbImage, _params: &ParameterSet) -> FilterResult<RgbImage> {
    check_input(FilterKind::Hdr, image)?;
    let ycbcr: Vec<[f32; 3]> = image.pixels().map(rgb_to_ycbcr).collect();
    let luma = luma_plane(image.width(), image.height(), &ycbcr);
    let mapped = clahe(&luma, HDR_GRID, HDR_CLIP_LIMIT);
    Ok(with_luma(&mapped, &ycbcr))
}

/// Sepia color matrix.
pub fn sepia(image: &RgbImage, _params: &ParameterSet) -> FilterResult<RgbImage> {
    check_input(FilterKind::Sepia, image)?;
    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        let src = [pixel[0] as f32, pixel[1] as f32, pixel[2] as f32];
        for (c, row) in SEPIA.iter().enumerate() {
            let v: f32 = row.iter().zip(&src).map(|(w, s)| w * s).sum();
            pixel[c] = clip(v.round());
        }
    }
    Ok(out)
}

/// Contrast lift, warm tint overlay, corner falloff and a light blur.
pub fn vintage(image: &RgbImage, params: &ParameterSet) -> FilterResult<RgbImage> {
    check_input(FilterKind::Vintage, image)?;
    let (width, height) = image.dimensions();

    let mut toned = image.clone();
    for pixel in toned.pixels_mut() {
        for c in 0..3 {
            let lifted = (pixel[c] as f32 * 1.1 + 10.0).min(255.0);
            pixel[c] = clip(0.8 * lifted + 0.2 * VINTAGE_TINT[c]);
        }
    }

    let exponent = 2.0 * params.vignette() as f32;
    let faded = apply_mask(&toned, &vignette_mask(width, height), exponent);
    Ok(gaussian(&faded, 3))
}

fn luma_plane(width: u32, height: u32, ycbcr: &[[f32; 3]]) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| {
        Luma([clip(ycbcr[(y * width + x) as usize][0].round())])
    })
}

/// Recombine a replacement luma plane with the original chroma.
fn with_luma(luma: &GrayImage, ycbcr: &[[f32; 3]]) -> RgbImage {
    let width = luma.width();
    RgbImage::from_fn(width, luma.height(), |x, y| {
        let [_, cb, cr] = ycbcr[(y * width + x) as usize];
        ycbcr_to_rgb(luma.get_pixel(x, y)[0] as f32, cb, cr)
    })
}

/// Contrast-limited adaptive histogram equalization.
///
/// The image is cut into at most `grid` x `grid` tiles. Each tile gets an
/// equalization table from its histogram, clipped at `clip_limit` times the
/// mean bin height with the excess spread evenly over all bins. Pixels
/// blend the tables of the four nearest tile centers bilinearly.
fn clahe(luma: &GrayImage, grid: u32, clip_limit: f32) -> GrayImage {
    let (width, height) = luma.dimensions();
    let tile_w = width.div_ceil(grid.clamp(1, width));
    let tile_h = height.div_ceil(grid.clamp(1, height));
    // Recount so the last row and column of tiles are never empty.
    let tiles_x = width.div_ceil(tile_w);
    let tiles_y = height.div_ceil(tile_h);

    let mut luts = Vec::with_capacity((tiles_x * tiles_y) as usize);
    for ty in 0..tiles_y {
        for tx in 0..tiles_x {
            let xs = tx * tile_w..((tx + 1) * tile_w).min(width);
            let ys = ty * tile_h..((ty + 1) * tile_h).min(height);
            luts.push(tile_lut(luma, xs, ys, clip_limit));
        }
    }

    let neighbours = |pos: u32, tile: u32, tiles: u32| {
        let center = (pos as f32 + 0.5) / tile as f32 - 0.5;
        let first = (center.floor().max(0.0) as u32).min(tiles - 1);
        let second = (first + 1).min(tiles - 1);
        let weight = (center - first as f32).clamp(0.0, 1.0);
        (first, second, weight)
    };

    GrayImage::from_fn(width, height, |x, y| {
        let (x0, x1, wx) = neighbours(x, tile_w, tiles_x);
        let (y0, y1, wy) = neighbours(y, tile_h, tiles_y);
        let v = luma.get_pixel(x, y)[0] as usize;
        let at = |tx: u32, ty: u32| luts[(ty * tiles_x + tx) as usize][v] as f32;

        let top = at(x0, y0) * (1.0 - wx) + at(x1, y0) * wx;
        let bottom = at(x0, y1) * (1.0 - wx) + at(x1, y1) * wx;
        Luma([clip((top * (1.0 - wy) + bottom * wy).round())])
    })
}

fn tile_lut(luma: &GrayImage, xs: Range<u32>, ys: Range<u32>, clip_limit: f32) -> [u8; 256] {
    let mut hist = [0u32; 256];
    for y in ys.clone() {
        for x in xs.clone() {
            hist[luma.get_pixel(x, y)[0] as usize] += 1;
        }
    }
    let area = (xs.len() * ys.len()) as u32;

    let limit = ((clip_limit * area as f32 / 256.0) as u32).max(1);
    let mut excess = 0;
    for bin in hist.iter_mut() {
        if *bin > limit {
            excess += *bin - limit;
            *bin = limit;
        }
    }
    let share = excess / 256;
    let remainder = (excess % 256) as usize;
    for (i, bin) in hist.iter_mut().enumerate() {
        *bin += share + u32::from(i < remainder);
    }

    let scale = 255.0 / area as f32;
    let mut lut = [0u8; 256];
    let mut running = 0;
    for (entry, count) in lut.iter_mut().zip(hist) {
        running += count;
        *entry = clip((running as f32 * scale).round());
    }
    lut
}

/// Full-range BT.601 conversion.
fn rgb_to_ycbcr(p: &Rgb<u8>) -> [f32; 3] {
    let (r, g, b) = (p[0] as f32, p[1] as f32, p[2] as f32);
    [
        0.299 * r + 0.587 * g + 0.114 * b,
        128.0 - 0.168_736 * r - 0.331_264 * g + 0.5 * b,
        128.0 + 0.5 * r - 0.418_688 * g - 0.081_312 * b,
    ]
}

fn ycbcr_to_rgb(y: f32, cb: f32, cr: f32) -> Rgb<u8> {
    let (cb, cr) = (cb - 128.0, cr - 128.0);
    Rgb([
        clip((y + 1.402 * cr).round()),
        clip((y - 0.344_136 * cb - 0.714_136 * cr).round()),
        clip((y + 1.772 * cb).round()),
    ])
}
