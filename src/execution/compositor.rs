//! Applies a selection of filters to an original image.

use crate::core::error::RenderError;
use crate::core::params::ParameterSet;
use crate::execution::selection::FilterSelection;
use image::RgbImage;

/// Render `selection` over `original`.
///
/// Enabled filters run in compositing order, each consuming the previous
/// output. Rendering always starts from `original`, so repeated calls with
/// equal arguments produce equal images. The first failing filter aborts
/// the render.
pub fn render(
    original: &RgbImage,
    selection: &FilterSelection,
    params: &ParameterSet,
) -> Result<RgbImage, RenderError> {
    let mut current = original.clone();
    for kind in selection.active() {
        log::trace!("Applying {kind}");
        current = kind
            .apply(&current, params)
            .map_err(|source| RenderError { filter: kind, source })?;
    }
    Ok(current)
}
