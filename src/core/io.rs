//! Loading and saving images.
//!
//! Everything the engine works on is 8-bit RGB. Decoded files in any other
//! layout (alpha, 16-bit, grayscale) are converted on load.

use crate::core::error::{FiltrawyError, FiltrawyResult};
use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Raster formats recognized by file extension.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Bmp,
    WebP,
    Tiff,
    Unknown,
}

impl ImageFormat {
    /// Determine image format from file path extension.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => ImageFormat::Jpeg,
            "png" => ImageFormat::Png,
            "gif" => ImageFormat::Gif,
            "bmp" => ImageFormat::Bmp,
            "webp" => ImageFormat::WebP,
            "tiff" | "tif" => ImageFormat::Tiff,
            _ => ImageFormat::Unknown,
        }
    }

    /// Whether the batch runner picks up files of this format.
    ///
    /// Batch runs are limited to PNG, JPEG, BMP and GIF.
    pub fn is_batch_input(&self) -> bool {
        matches!(
            self,
            ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::Gif | ImageFormat::Bmp
        )
    }

    /// Convert to image crate's ImageFormat.
    pub fn to_image_format(&self) -> Option<image::ImageFormat> {
        match self {
            ImageFormat::Jpeg => Some(image::ImageFormat::Jpeg),
            ImageFormat::Png => Some(image::ImageFormat::Png),
            ImageFormat::Gif => Some(image::ImageFormat::Gif),
            ImageFormat::Bmp => Some(image::ImageFormat::Bmp),
            ImageFormat::WebP => Some(image::ImageFormat::WebP),
            ImageFormat::Tiff => Some(image::ImageFormat::Tiff),
            ImageFormat::Unknown => None,
        }
    }
}

/// Load an image from disk as 8-bit RGB.
pub fn load_rgb(path: impl AsRef<Path>) -> FiltrawyResult<RgbImage> {
    let path = path.as_ref();
    let image = image::open(path)?.to_rgb8();
    ensure_not_empty(&image).map_err(|_| {
        FiltrawyError::InvalidInput(format!("{} decoded to an empty image", path.display()))
    })?;
    log::debug!(
        "Loaded {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    Ok(image)
}

/// Save an RGB image, choosing the encoder from the extension.
pub fn save_rgb(image: &RgbImage, path: impl AsRef<Path>) -> FiltrawyResult<()> {
    let path = path.as_ref();
    let format = ImageFormat::from_path(path)
        .to_image_format()
        .ok_or_else(|| {
            FiltrawyError::InvalidInput(format!(
                "cannot infer an image format from '{}'",
                path.display()
            ))
        })?;
    image.save_with_format(path, format)?;
    Ok(())
}

/// Reject zero-sized images.
pub fn ensure_not_empty(image: &RgbImage) -> Result<(), &'static str> {
    if image.width() == 0 || image.height() == 0 {
        Err("image has no pixels")
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_format_from_path() {
        assert_eq!(ImageFormat::from_path(Path::new("a/b.JPG")), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_path(Path::new("x.tif")), ImageFormat::Tiff);
        assert_eq!(ImageFormat::from_path(Path::new("notes.txt")), ImageFormat::Unknown);
    }

    #[test]
    fn test_batch_inputs() {
        assert!(ImageFormat::Png.is_batch_input());
        assert!(ImageFormat::Gif.is_batch_input());
        assert!(!ImageFormat::Tiff.is_batch_input());
        assert!(!ImageFormat::Unknown.is_batch_input());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("square.png");
        let image = RgbImage::from_pixel(4, 3, Rgb([10, 20, 30]));

        save_rgb(&image, &path).unwrap();
        let loaded = load_rgb(&path).unwrap();
        assert_eq!(loaded, image);
    }

    #[test]
    fn test_save_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let image = RgbImage::new(1, 1);
        assert!(save_rgb(&image, dir.path().join("out.xyz")).is_err());
    }

    #[test]
    fn test_empty_image_rejected() {
        assert!(ensure_not_empty(&RgbImage::new(0, 5)).is_err());
        assert!(ensure_not_empty(&RgbImage::new(1, 1)).is_ok());
    }
}
