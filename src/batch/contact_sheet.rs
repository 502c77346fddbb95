//! Contact sheets: thumbnails tiled row-major on a black canvas.

use crate::core::error::{FiltrawyError, FiltrawyResult};
use crate::core::io::load_rgb;
use image::imageops::{self, FilterType};
use image::RgbImage;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// Build a contact sheet from image files.
///
/// Files that fail to load are skipped with a warning. The canvas is
/// `columns * thumb_w` wide and `ceil(n / columns) * thumb_h` tall, where
/// `n` counts the images that loaded.
pub fn contact_sheet<P>(
    paths: &[P],
    columns: u32,
    thumb_size: (u32, u32),
) -> FiltrawyResult<RgbImage>
where
    P: AsRef<Path> + Sync,
{
    let images: Vec<RgbImage> = paths
        .par_iter()
        .filter_map(|path| {
            let path = path.as_ref();
            match load_rgb(path) {
                Ok(image) => Some(image),
                Err(e) => {
                    log::warn!("Skipping {} in contact sheet: {e}", path.display());
                    None
                }
            }
        })
        .collect();

    contact_sheet_from_images(&images, columns, thumb_size)
}

/// Build a contact sheet from decoded images.
pub fn contact_sheet_from_images(
    images: &[RgbImage],
    columns: u32,
    (thumb_w, thumb_h): (u32, u32),
) -> FiltrawyResult<RgbImage> {
    if columns == 0 {
        return Err(FiltrawyError::InvalidInput(
            "contact sheet needs at least one column".into(),
        ));
    }
    if thumb_w == 0 || thumb_h == 0 {
        return Err(FiltrawyError::InvalidInput(format!(
            "invalid thumbnail size {thumb_w}x{thumb_h}"
        )));
    }
    if images.is_empty() {
        return Err(FiltrawyError::InvalidInput(
            "no images could be loaded for the contact sheet".into(),
        ));
    }

    let too_large = || {
        FiltrawyError::InvalidInput(format!(
            "contact sheet of {} images in {columns} columns of {thumb_w}x{thumb_h} is too large",
            images.len()
        ))
    };
    let count = u32::try_from(images.len()).map_err(|_| too_large())?;
    let rows = count.div_ceil(columns);
    let width = columns.checked_mul(thumb_w).ok_or_else(too_large)?;
    let height = rows.checked_mul(thumb_h).ok_or_else(too_large)?;
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(3))
        .ok_or_else(too_large)?;
    let mut canvas = RgbImage::new(width, height);

    let thumbs: Vec<RgbImage> = images
        .par_iter()
        .map(|image| imageops::resize(image, thumb_w, thumb_h, FilterType::Triangle))
        .collect();

    for (index, thumb) in thumbs.iter().enumerate() {
        let index = index as u32;
        let x = (index % columns) * thumb_w;
        let y = (index / columns) * thumb_h;
        imageops::replace(&mut canvas, thumb, x as i64, y as i64);
    }

    log::info!(
        "Contact sheet: {} images, {}x{} grid, {}x{} px",
        count,
        columns,
        rows,
        canvas.width(),
        canvas.height()
    );
    Ok(canvas)
}

/// Paths of the images in `dir` the batch runner would pick up.
pub fn sheet_inputs(dir: &Path) -> FiltrawyResult<Vec<PathBuf>> {
    crate::batch::BatchRunner::new(dir, dir).collect_inputs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use tempfile::TempDir;

    #[test]
    fn test_dimensions_round_up_rows() {
        let images: Vec<RgbImage> = (0..5).map(|_| RgbImage::new(30, 20)).collect();
        let sheet = contact_sheet_from_images(&images, 2, (10, 8)).unwrap();
        assert_eq!(sheet.dimensions(), (20, 24));
    }

    #[test]
    fn test_thumbnails_placed_row_major_on_black() {
        let images = vec![
            RgbImage::from_pixel(4, 4, Rgb([255, 0, 0])),
            RgbImage::from_pixel(4, 4, Rgb([0, 255, 0])),
            RgbImage::from_pixel(4, 4, Rgb([0, 0, 255])),
        ];
        let sheet = contact_sheet_from_images(&images, 2, (4, 4)).unwrap();
        assert_eq!(sheet.get_pixel(1, 1), &Rgb([255, 0, 0]));
        assert_eq!(sheet.get_pixel(5, 1), &Rgb([0, 255, 0]));
        assert_eq!(sheet.get_pixel(1, 5), &Rgb([0, 0, 255]));
        assert_eq!(sheet.get_pixel(6, 6), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_zero_columns_rejected() {
        let images = vec![RgbImage::new(2, 2)];
        assert!(matches!(
            contact_sheet_from_images(&images, 0, (4, 4)),
            Err(FiltrawyError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_oversized_canvas_rejected() {
        let images = vec![RgbImage::new(2, 2); 3];
        for (columns, thumb) in [(2, (u32::MAX, 2)), (1, (2, u32::MAX / 2 + 1))] {
            assert!(matches!(
                contact_sheet_from_images(&images, columns, thumb),
                Err(FiltrawyError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_unreadable_files_skipped() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("good.png");
        let bad = dir.path().join("bad.png");
        RgbImage::from_pixel(8, 8, Rgb([1, 2, 3])).save(&good).unwrap();
        std::fs::write(&bad, b"not a png").unwrap();

        let sheet = contact_sheet(&[good, bad], 3, (5, 5)).unwrap();
        assert_eq!(sheet.dimensions(), (15, 5));
    }

    #[test]
    fn test_nothing_loaded() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.png");
        assert!(matches!(
            contact_sheet(&[missing], 2, (5, 5)),
            Err(FiltrawyError::InvalidInput(_))
        ));
    }
}
