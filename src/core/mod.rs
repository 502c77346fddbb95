//! Core types for Filtrawy.
//!
//! This module contains the foundational pieces shared by filters, the
//! editor session and batch processing:
//! - Error types
//! - Filter parameters and their ranges
//! - Filter metadata and categories
//! - Image loading and saving

pub mod error;
pub mod io;
pub mod metadata;
pub mod params;

// Re-export commonly used types
pub use error::{BatchError, FilterError, FiltrawyError, FiltrawyResult, RenderError};
pub use io::{load_rgb, save_rgb, ImageFormat};
pub use metadata::{Category, FilterMetadata};
pub use params::{ParamName, ParameterDefinition, ParameterSet};
