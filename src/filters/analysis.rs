//! Image statistics: histogram, brightness, spread and edge density.

use crate::core::error::{FilterError, FilterResult};
use crate::core::io::ensure_not_empty;
use image::RgbImage;
use rayon::prelude::*;
use serde::Serialize;

const CANNY_LOW: f32 = 100.0;
const CANNY_HIGH: f32 = 200.0;

/// Summary statistics of an image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageStats {
    /// 256-bin histogram of the first (red) channel.
    pub histogram: Vec<u64>,
    /// Mean over every channel sample.
    pub mean_brightness: f64,
    /// Population standard deviation over every channel sample.
    pub std_dev: f64,
    /// Fraction of pixels marked as edges by Canny (100, 200).
    pub edge_density: f64,
}

/// Compute [`ImageStats`] for an image.
pub fn analyze(image: &RgbImage) -> FilterResult<ImageStats> {
    ensure_not_empty(image).map_err(|reason| FilterError::invalid_input("analyze", reason))?;

    let histogram = image
        .as_raw()
        .par_chunks(3)
        .fold(
            || vec![0u64; 256],
            |mut bins, pixel| {
                bins[pixel[0] as usize] += 1;
                bins
            },
        )
        .reduce(
            || vec![0u64; 256],
            |mut a, b| {
                a.iter_mut().zip(b).for_each(|(x, y)| *x += y);
                a
            },
        );

    let samples = image.as_raw();
    let count = samples.len() as f64;
    let (sum, sum_sq) = samples
        .par_iter()
        .map(|&s| {
            let v = s as f64;
            (v, v * v)
        })
        .reduce(|| (0.0, 0.0), |a, b| (a.0 + b.0, a.1 + b.1));
    let mean = sum / count;
    let variance = (sum_sq / count - mean * mean).max(0.0);

    let gray = image::imageops::grayscale(image);
    let edges = imageproc::edges::canny(&gray, CANNY_LOW, CANNY_HIGH);
    let edge_pixels = edges.pixels().filter(|p| p[0] != 0).count();
    let edge_density = edge_pixels as f64 / (gray.width() as f64 * gray.height() as f64);

    Ok(ImageStats {
        histogram,
        mean_brightness: mean,
        std_dev: variance.sqrt(),
        edge_density,
    })
}
