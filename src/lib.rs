//! # Filtrawy - Photo Filter Engine
//!
//! Filtrawy applies a fixed catalog of photo filters to RGB images, either
//! interactively through an [`EditorSession`](execution::EditorSession) with
//! undo/redo, or over whole directories with a [`BatchRunner`](batch::BatchRunner).
//!
//! ## Features
//!
//! - **Filter catalog**: 26 filters from tone curves to edge detection and
//!   stylized looks, identified by [`FilterKind`](filters::FilterKind)
//! - **Compositing**: several filters can be active at once and always run
//!   in a fixed order, starting from the untouched original
//! - **History**: bounded undo/redo of rendered results
//! - **Batch**: worker pool over a directory with per-file failure reporting
//! - **Contact sheets** and basic **image statistics**
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use filtrawy::prelude::*;
//!
//! let mut session = EditorSession::new();
//! session.load_image("input.jpg")?;
//!
//! session.set_parameter(ParamName::Temperature, 40.0)?;
//! session.set_active_filter(FilterKind::Temperature);
//! session.save_image("warm.jpg")?;
//!
//! session.undo();
//!
//! let report = BatchRunner::new("photos", "out")
//!     .with_options(BatchOptions::new().with_workers(8))
//!     .run(FilterKind::Sepia)?;
//! println!("{} of {} converted", report.succeeded(), report.len());
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: Errors, parameters, metadata and image I/O
//! - [`filters`]: Filter catalog, registry, implementations and analysis
//! - [`execution`]: Selection, compositor, history, render cache and session
//! - [`batch`]: Directory batch runner, progress events and contact sheets

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod batch;
pub mod core;
pub mod execution;
pub mod filters;

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust,ignore
/// use filtrawy::prelude::*;
/// ```
pub mod prelude {
    // Errors
    pub use crate::core::error::{
        BatchError, FilterError, FilterResult, FiltrawyError, FiltrawyResult, RenderError,
    };

    // Parameters and metadata
    pub use crate::core::metadata::{Category, FilterMetadata};
    pub use crate::core::params::{ParamName, ParameterDefinition, ParameterSet};

    // I/O
    pub use crate::core::io::{load_rgb, save_rgb, ImageFormat};

    // Filters
    pub use crate::filters::analysis::{analyze, ImageStats};
    pub use crate::filters::kind::FilterKind;
    pub use crate::filters::registry::FilterRegistry;

    // Execution
    pub use crate::execution::cache::{CacheStats, RenderCache};
    pub use crate::execution::compositor::render;
    pub use crate::execution::history::History;
    pub use crate::execution::selection::FilterSelection;
    pub use crate::execution::session::EditorSession;

    // Batch
    pub use crate::batch::contact_sheet::{contact_sheet, contact_sheet_from_images};
    pub use crate::batch::progress::{BatchProgress, ProgressCallback};
    pub use crate::batch::runner::{BatchItem, BatchOptions, BatchReport, BatchRunner};
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
        assert_eq!(super::NAME, "filtrawy");
    }

    #[test]
    fn test_registry_with_builtins() {
        let registry = FilterRegistry::with_builtins();

        assert!(registry.contains("color"));
        assert!(registry.contains("gauss"));
        assert!(registry.contains("sobel"));
        assert!(registry.contains("tilt_shift"));
        assert!(registry.contains("vintage"));
    }

    #[test]
    fn test_session_round_trip() {
        let mut session = EditorSession::new();
        session.set_image(RgbImage::from_pixel(4, 4, Rgb([50, 100, 150]))).unwrap();
        session.set_active_filter(FilterKind::Negative);
        assert_eq!(session.displayed().unwrap().get_pixel(0, 0), &Rgb([205, 155, 105]));
        session.undo();
        assert_eq!(session.displayed(), session.original());
    }
}
