//! Filter module.
//!
//! Contains the filter catalog, the registry, built-in filter
//! implementations and image analysis.

pub mod analysis;
pub mod builtin;
pub mod kind;
pub mod registry;

pub use analysis::{analyze, ImageStats};
pub use kind::FilterKind;
pub use registry::FilterRegistry;
