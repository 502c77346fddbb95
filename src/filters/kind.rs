//! The closed catalog of filters.

use crate::core::error::{FilterResult, FiltrawyError};
use crate::core::metadata::Category;
use crate::core::params::ParameterSet;
use crate::filters::builtin;
use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a built-in filter.
///
/// Variants are declared in compositing order, and the derived `Ord`
/// follows that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)] // described by the registry metadata
pub enum FilterKind {
    // Basic
    Color,
    Gray,
    Threshold,
    // Enhancement
    IncreaseContrast,
    DecreaseContrast,
    LogTransformation,
    PowerLaw,
    Negative,
    // Color
    Temperature,
    Saturation,
    // Blur
    Gauss,
    Median,
    Average,
    Min,
    Max,
    // Edge
    Sobel,
    Laplace,
    Prewitt,
    // Effects
    Vignette,
    TiltShift,
    // Advanced
    Denoise,
    Unsharp,
    HistogramEqualization,
    Hdr,
    Sepia,
    Vintage,
}

impl FilterKind {
    /// Every filter in compositing order.
    pub const ALL: [FilterKind; 26] = [
        FilterKind::Color,
        FilterKind::Gray,
        FilterKind::Threshold,
        FilterKind::IncreaseContrast,
        FilterKind::DecreaseContrast,
        FilterKind::LogTransformation,
        FilterKind::PowerLaw,
        FilterKind::Negative,
        FilterKind::Temperature,
        FilterKind::Saturation,
        FilterKind::Gauss,
        FilterKind::Median,
        FilterKind::Average,
        FilterKind::Min,
        FilterKind::Max,
        FilterKind::Sobel,
        FilterKind::Laplace,
        FilterKind::Prewitt,
        FilterKind::Vignette,
        FilterKind::TiltShift,
        FilterKind::Denoise,
        FilterKind::Unsharp,
        FilterKind::HistogramEqualization,
        FilterKind::Hdr,
        FilterKind::Sepia,
        FilterKind::Vintage,
    ];

    /// Stable identifier.
    pub fn id(self) -> &'static str {
        match self {
            FilterKind::Color => "color",
            FilterKind::Gray => "gray",
            FilterKind::Threshold => "threshold",
            FilterKind::IncreaseContrast => "increase_contrast",
            FilterKind::DecreaseContrast => "decrease_contrast",
            FilterKind::LogTransformation => "log_transformation",
            FilterKind::PowerLaw => "power_law",
            FilterKind::Negative => "negative",
            FilterKind::Temperature => "temperature",
            FilterKind::Saturation => "saturation",
            FilterKind::Gauss => "gauss",
            FilterKind::Median => "median",
            FilterKind::Average => "average",
            FilterKind::Min => "min",
            FilterKind::Max => "max",
            FilterKind::Sobel => "sobel",
            FilterKind::Laplace => "laplace",
            FilterKind::Prewitt => "prewitt",
            FilterKind::Vignette => "vignette",
            FilterKind::TiltShift => "tilt_shift",
            FilterKind::Denoise => "denoise",
            FilterKind::Unsharp => "unsharp",
            FilterKind::HistogramEqualization => "histogram_equalization",
            FilterKind::Hdr => "hdr",
            FilterKind::Sepia => "sepia",
            FilterKind::Vintage => "vintage",
        }
    }

    /// Compositing group.
    pub fn category(self) -> Category {
        match self {
            FilterKind::Color | FilterKind::Gray | FilterKind::Threshold => Category::Basic,
            FilterKind::IncreaseContrast
            | FilterKind::DecreaseContrast
            | FilterKind::LogTransformation
            | FilterKind::PowerLaw
            | FilterKind::Negative => Category::Enhancement,
            FilterKind::Temperature | FilterKind::Saturation => Category::Color,
            FilterKind::Gauss
            | FilterKind::Median
            | FilterKind::Average
            | FilterKind::Min
            | FilterKind::Max => Category::Blur,
            FilterKind::Sobel | FilterKind::Laplace | FilterKind::Prewitt => Category::Edge,
            FilterKind::Vignette | FilterKind::TiltShift => Category::Effects,
            FilterKind::Denoise
            | FilterKind::Unsharp
            | FilterKind::HistogramEqualization
            | FilterKind::Hdr
            | FilterKind::Sepia
            | FilterKind::Vintage => Category::Advanced,
        }
    }

    /// Run the filter.
    pub fn apply(self, image: &RgbImage, params: &ParameterSet) -> FilterResult<RgbImage> {
        builtin::function(self)(image, params)
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for FilterKind {
    type Err = FiltrawyError;

    /// Accepts the snake_case ids as well as the legacy camelCase menu names
    /// (`increaseContrast`, `histogramEqualization`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(kind) = FilterKind::ALL.into_iter().find(|k| k.id() == trimmed) {
            return Ok(kind);
        }
        let kind = match trimmed {
            "increaseContrast" => FilterKind::IncreaseContrast,
            "decreaseContrast" => FilterKind::DecreaseContrast,
            "logTransformation" => FilterKind::LogTransformation,
            "powerLowEnhancement" | "powerLaw" => FilterKind::PowerLaw,
            "negativeEnhancement" => FilterKind::Negative,
            "histogramEqualization" => FilterKind::HistogramEqualization,
            "tiltShift" => FilterKind::TiltShift,
            "hdrEffect" | "hdr_effect" => FilterKind::Hdr,
            "gaussian_blur" => FilterKind::Gauss,
            "grayscale" => FilterKind::Gray,
            _ => return Err(FiltrawyError::UnsupportedFilterName(s.to_string())),
        };
        Ok(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_round_trip_through_parse() {
        for kind in FilterKind::ALL {
            assert_eq!(kind.id().parse::<FilterKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_legacy_names() {
        assert_eq!(
            "histogramEqualization".parse::<FilterKind>().unwrap(),
            FilterKind::HistogramEqualization
        );
        assert_eq!(
            "powerLowEnhancement".parse::<FilterKind>().unwrap(),
            FilterKind::PowerLaw
        );
        assert_eq!("hdr_effect".parse::<FilterKind>().unwrap(), FilterKind::Hdr);
    }

    #[test]
    fn test_unknown_name() {
        let err = "sharpen_more".parse::<FilterKind>().unwrap_err();
        assert!(matches!(err, FiltrawyError::UnsupportedFilterName(name) if name == "sharpen_more"));
    }

    #[test]
    fn test_all_is_sorted_and_grouped() {
        assert!(FilterKind::ALL.windows(2).all(|w| w[0] < w[1]));
        assert!(FilterKind::ALL
            .windows(2)
            .all(|w| w[0].category() <= w[1].category()));
    }
}
