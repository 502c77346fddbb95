//! Directory-level processing: batch filtering and contact sheets.

pub mod contact_sheet;
pub mod progress;
pub mod runner;

pub use contact_sheet::{contact_sheet, contact_sheet_from_images, sheet_inputs};
pub use progress::{BatchProgress, BatchTracker, ProgressCallback};
pub use runner::{BatchItem, BatchOptions, BatchReport, BatchRunner, DEFAULT_PREFIX, DEFAULT_WORKERS};
