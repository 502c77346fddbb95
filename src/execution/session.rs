//! Interactive editing session.
//!
//! An [`EditorSession`] owns the original image, the active filter
//! selection, the parameters and the undo history. Every change to the
//! selection or the parameters re-renders from the original.

use crate::batch::{BatchOptions, BatchReport, BatchRunner};
use crate::core::error::{FiltrawyError, FiltrawyResult};
use crate::core::io::{ensure_not_empty, load_rgb, save_rgb};
use crate::core::params::{ParamName, ParameterSet};
use crate::execution::cache::{CacheKey, CacheStats, RenderCache, DEFAULT_CACHE_CAPACITY};
use crate::execution::compositor;
use crate::execution::history::{History, DEFAULT_CAPACITY};
use crate::execution::selection::FilterSelection;
use crate::filters::FilterKind;
use image::RgbImage;
use std::path::Path;

/// Single-image editor state.
pub struct EditorSession {
    original: Option<RgbImage>,
    displayed: Option<RgbImage>,
    selection: FilterSelection,
    params: ParameterSet,
    history: History,
    cache: RenderCache,
}

impl EditorSession {
    /// Empty session with default history and cache sizes.
    pub fn new() -> Self {
        Self::with_capacities(DEFAULT_CAPACITY, DEFAULT_CACHE_CAPACITY)
    }

    /// Session with custom history and render cache sizes.
    pub fn with_capacities(history: usize, cache: usize) -> Self {
        Self {
            original: None,
            displayed: None,
            selection: FilterSelection::none(),
            params: ParameterSet::default(),
            history: History::with_capacity(history),
            cache: RenderCache::new(cache),
        }
    }

    /// Load an image from disk and make it the new original.
    pub fn load_image(&mut self, path: impl AsRef<Path>) -> FiltrawyResult<()> {
        let path = path.as_ref();
        let image = load_rgb(path)?;
        log::info!("Opened {} ({}x{})", path.display(), image.width(), image.height());
        self.set_image(image)
    }

    /// Replace the original with an in-memory image, such as a camera frame.
    ///
    /// Clears the selection, the history and the render cache. Parameters
    /// are kept.
    pub fn set_image(&mut self, image: RgbImage) -> FiltrawyResult<()> {
        ensure_not_empty(&image).map_err(|r| FiltrawyError::InvalidInput(r.to_string()))?;
        self.history.reset(image.clone());
        self.cache.clear();
        self.selection = FilterSelection::none();
        self.displayed = Some(image.clone());
        self.original = Some(image);
        Ok(())
    }

    /// Change one parameter and re-render if it changed.
    pub fn set_parameter(&mut self, name: ParamName, value: f64) -> FiltrawyResult<()> {
        if self.params.set(name, value)? {
            log::debug!("Parameter {name} = {}", self.params.get(name));
            self.refresh();
        }
        Ok(())
    }

    /// Replace all parameters.
    pub fn set_parameters(&mut self, params: ParameterSet) -> FiltrawyResult<()> {
        let params = params.normalized()?;
        if params != self.params {
            self.params = params;
            self.refresh();
        }
        Ok(())
    }

    /// Make `kind` the only active filter.
    pub fn set_active_filter(&mut self, kind: FilterKind) {
        log::debug!("Active filter: {kind}");
        self.set_selection(FilterSelection::exclusive(kind));
    }

    /// Like [`EditorSession::set_active_filter`], by name. Unknown names are
    /// logged and ignored.
    pub fn set_active_filter_by_name(&mut self, name: &str) {
        match name.parse::<FilterKind>() {
            Ok(kind) => self.set_active_filter(kind),
            Err(e) => log::warn!("Ignoring filter selection: {e}"),
        }
    }

    /// Replace the selection, possibly enabling several filters.
    pub fn set_selection(&mut self, selection: FilterSelection) {
        self.selection = selection;
        self.refresh();
    }

    /// Render the current selection and record the result in the history.
    ///
    /// A failing filter is logged and the original is shown instead; the
    /// history is left untouched in that case.
    pub fn render(&mut self) -> FiltrawyResult<&RgbImage> {
        let original = self.original.as_ref().ok_or(FiltrawyError::NoImageLoaded)?;
        let key = CacheKey::new(&self.selection, &self.params);

        let rendered = match self.cache.get(&key) {
            Some(image) => Some(image),
            None => match compositor::render(original, &self.selection, &self.params) {
                Ok(image) => {
                    self.cache.put(key, image.clone());
                    Some(image)
                }
                Err(e) => {
                    log::error!("Render failed, showing original: {e}");
                    None
                }
            },
        };

        let shown = match rendered {
            Some(image) => {
                self.history.commit(image.clone());
                image
            }
            None => original.clone(),
        };
        Ok(self.displayed.insert(shown))
    }

    /// Step back in the history.
    pub fn undo(&mut self) -> Option<&RgbImage> {
        let image = self.history.undo()?.clone();
        Some(self.displayed.insert(image))
    }

    /// Step forward in the history.
    pub fn redo(&mut self) -> Option<&RgbImage> {
        let image = self.history.redo()?.clone();
        Some(self.displayed.insert(image))
    }

    /// Drop all filters and the history, showing the original again.
    pub fn reset(&mut self) -> FiltrawyResult<()> {
        let original = self.original.clone().ok_or(FiltrawyError::NoImageLoaded)?;
        self.selection = FilterSelection::none();
        self.history.reset(original.clone());
        self.displayed = Some(original);
        Ok(())
    }

    /// Save the displayed image; the format follows the extension.
    pub fn save_image(&self, path: impl AsRef<Path>) -> FiltrawyResult<()> {
        let path = path.as_ref();
        let image = self.displayed.as_ref().ok_or(FiltrawyError::NoImageLoaded)?;
        save_rgb(image, path)?;
        log::info!("Saved {}", path.display());
        Ok(())
    }

    /// Apply `kind` to every image in `input_dir`.
    pub fn run_batch(
        &self,
        input_dir: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
        kind: FilterKind,
        params: ParameterSet,
    ) -> FiltrawyResult<BatchReport> {
        BatchRunner::new(input_dir.as_ref(), output_dir.as_ref())
            .with_options(BatchOptions::new().with_params(params))
            .run(kind)
    }

    /// The loaded image, untouched by filters.
    pub fn original(&self) -> Option<&RgbImage> {
        self.original.as_ref()
    }

    /// The image currently shown.
    pub fn displayed(&self) -> Option<&RgbImage> {
        self.displayed.as_ref()
    }

    /// Enabled filters.
    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    /// Current parameter values.
    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// Undo/redo history.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Render cache counters.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Whether an image is loaded.
    pub fn has_image(&self) -> bool {
        self.original.is_some()
    }

    fn refresh(&mut self) {
        if self.original.is_some() {
            // Failures are already logged inside `render`.
            let _ = self.render();
        }
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}
