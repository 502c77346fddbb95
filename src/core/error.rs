//! Error types for Filtrawy.
//!
//! Uses thiserror for structured errors with context. Errors are split by
//! the layer that raises them:
//! - [`FilterError`] from a single filter invocation
//! - [`RenderError`] from the compositor, naming the filter that failed
//! - [`BatchError`] for directory-level batch failures
//! - [`FiltrawyError`] as the umbrella type returned by the session and I/O

use crate::filters::FilterKind;
use thiserror::Error;

/// Top-level error type for Filtrawy.
///
/// This enum encompasses all error categories and enables automatic
/// conversion between specific error types.
#[derive(Error, Debug)]
pub enum FiltrawyError {
    /// A name that is neither a filter id nor a legacy menu name.
    #[error("Unsupported filter name: '{0}'")]
    UnsupportedFilterName(String),

    /// A parameter id that does not exist.
    #[error("Unknown parameter: '{0}'")]
    UnknownParameter(String),

    /// A value outside its parameter's inclusive range. The stored value
    /// is left unchanged.
    #[error("Parameter '{name}' = {value} is outside [{min}, {max}]")]
    ParameterOutOfRange {
        /// Parameter id.
        name: &'static str,
        /// Rejected value.
        value: f64,
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },

    /// The operation needs a loaded image.
    #[error("No image loaded")]
    NoImageLoaded,

    /// Arguments that cannot be processed, such as a zero-column sheet.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A filter failed.
    #[error("Filter error: {0}")]
    Filter(#[from] FilterError),

    /// A compositing stage failed.
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Batch setup failed.
    #[error("Batch error: {0}")]
    Batch(#[from] BatchError),

    /// File system error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Decoding or encoding failed.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Malformed JSON parameter file.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Malformed TOML parameter file.
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}

/// Errors raised by a single filter.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    /// The image handed to the filter cannot be processed (e.g. it is empty).
    #[error("Invalid input for '{filter}': {reason}")]
    InvalidInput {
        /// Id of the filter.
        filter: &'static str,
        /// What was wrong with the input.
        reason: String,
    },
}

impl FilterError {
    /// Shorthand for an [`FilterError::InvalidInput`].
    pub fn invalid_input(filter: &'static str, reason: impl Into<String>) -> Self {
        FilterError::InvalidInput {
            filter,
            reason: reason.into(),
        }
    }

    /// Name of the filter that raised the error.
    pub fn filter(&self) -> &'static str {
        match self {
            FilterError::InvalidInput { filter, .. } => filter,
        }
    }
}

/// Failure of one compositing stage.
///
/// The compositor stops at the first failing stage; callers decide whether
/// to fall back to the original image.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("filter '{filter}' failed: {source}")]
pub struct RenderError {
    /// The filter that failed.
    pub filter: FilterKind,
    /// Underlying filter error.
    #[source]
    pub source: FilterError,
}

/// Errors during batch processing.
///
/// Per-file failures are never raised; they are recorded in the batch report.
#[derive(Error, Debug)]
pub enum BatchError {
    /// The input path is not a directory.
    #[error("Input directory does not exist: {path}")]
    InputDirectoryMissing {
        /// Offending path.
        path: String,
    },

    /// The file pattern does not compile.
    #[error("Invalid file pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// Pattern as given.
        pattern: String,
        /// Parser message.
        reason: String,
    },

    /// Worker count of zero.
    #[error("Batch needs at least one worker")]
    NoWorkers,

    /// A worker thread panicked; its in-flight file has no result.
    #[error("A batch worker panicked")]
    WorkerPanicked,
}

/// Result type alias for Filtrawy operations.
pub type FiltrawyResult<T> = Result<T, FiltrawyError>;

/// Result type alias for filter invocations.
pub type FilterResult<T> = Result<T, FilterError>;
