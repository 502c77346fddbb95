//! Filter categories and descriptive metadata.
//!
//! Categories double as compositing groups: when several filters are enabled
//! at once they run group by group in [`Category::all`] order.

use crate::core::params::{ParamName, ParameterDefinition};
use crate::filters::FilterKind;
use serde::{Deserialize, Serialize};

/// Category for organizing filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Pass-through, grayscale, threshold
    Basic,
    /// Tone curves and contrast
    Enhancement,
    /// Temperature and saturation
    Color,
    /// Smoothing and rank filters
    Blur,
    /// Edge magnitude
    Edge,
    /// Vignette and tilt-shift
    Effects,
    /// Sharpening, equalization and stylized looks
    Advanced,
}

impl Category {
    /// Get the display name for this category.
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Basic => "Basic",
            Category::Enhancement => "Enhancement",
            Category::Color => "Color",
            Category::Blur => "Blur",
            Category::Edge => "Edge Detection",
            Category::Effects => "Effects",
            Category::Advanced => "Advanced",
        }
    }

    /// Get all categories in compositing order.
    pub fn all() -> &'static [Category] {
        &[
            Category::Basic,
            Category::Enhancement,
            Category::Color,
            Category::Blur,
            Category::Edge,
            Category::Effects,
            Category::Advanced,
        ]
    }
}

/// Metadata describing a filter.
#[derive(Debug, Clone, Serialize)]
pub struct FilterMetadata {
    /// The filter this describes.
    pub kind: FilterKind,
    /// Unique identifier (e.g., "gauss")
    pub id: &'static str,
    /// Human-readable name (e.g., "Gaussian Blur")
    pub name: &'static str,
    /// Category for organization and ordering
    pub category: Category,
    /// Detailed description
    pub description: &'static str,
    /// Parameters the filter reads
    pub parameters: Vec<ParamName>,
    /// Searchable tags
    pub tags: Vec<&'static str>,
}

impl FilterMetadata {
    /// Create a new metadata builder.
    pub fn builder(kind: FilterKind, name: &'static str) -> FilterMetadataBuilder {
        FilterMetadataBuilder::new(kind, name)
    }

    /// Whether the filter reads the given parameter.
    pub fn reads(&self, name: ParamName) -> bool {
        self.parameters.contains(&name)
    }

    /// Full definitions of the parameters the filter reads.
    pub fn parameter_definitions(&self) -> Vec<ParameterDefinition> {
        self.parameters.iter().map(|p| p.definition()).collect()
    }
}

/// Builder for FilterMetadata.
pub struct FilterMetadataBuilder {
    kind: FilterKind,
    name: &'static str,
    description: &'static str,
    parameters: Vec<ParamName>,
    tags: Vec<&'static str>,
}

impl FilterMetadataBuilder {
    /// Create a new builder with required fields.
    pub fn new(kind: FilterKind, name: &'static str) -> Self {
        Self {
            kind,
            name,
            description: "",
            parameters: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// Set the description.
    pub fn description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    /// Declare a parameter the filter reads.
    pub fn parameter(mut self, name: ParamName) -> Self {
        self.parameters.push(name);
        self
    }

    /// Add a tag.
    pub fn tag(mut self, tag: &'static str) -> Self {
        self.tags.push(tag);
        self
    }

    /// Build the metadata.
    pub fn build(self) -> FilterMetadata {
        FilterMetadata {
            kind: self.kind,
            id: self.kind.id(),
            name: self.name,
            category: self.kind.category(),
            description: self.description,
            parameters: self.parameters,
            tags: self.tags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_fills_id_and_category() {
        let metadata = FilterMetadata::builder(FilterKind::Median, "Median Blur")
            .description("Median of the neighborhood")
            .parameter(ParamName::BlurRadius)
            .tag("denoise")
            .build();

        assert_eq!(metadata.id, "median");
        assert_eq!(metadata.category, Category::Blur);
        assert!(metadata.reads(ParamName::BlurRadius));
        assert!(!metadata.reads(ParamName::Intensity));
        assert_eq!(metadata.parameter_definitions()[0].max, 21.0);
    }

    #[test]
    fn test_category_order() {
        let all = Category::all();
        assert_eq!(all.first(), Some(&Category::Basic));
        assert_eq!(all.last(), Some(&Category::Advanced));
        assert!(all.windows(2).all(|w| w[0] < w[1]));
    }
}
