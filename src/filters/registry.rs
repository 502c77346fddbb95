//! Filter registry for looking up filters and their metadata.

use crate::core::error::{FiltrawyError, FiltrawyResult};
use crate::core::metadata::{Category, FilterMetadata};
use crate::filters::builtin;
use crate::filters::kind::FilterKind;
use indexmap::IndexMap;

/// Registry of the available filters.
///
/// Entries keep registration order, which for the built-ins is the
/// compositing order. Lookups accept ids as well as the legacy menu names
/// understood by [`FilterKind`]'s `FromStr`. Running a filter goes through
/// [`FilterKind::apply`]; the registry only describes.
pub struct FilterRegistry {
    /// Metadata indexed by filter id.
    filters: IndexMap<&'static str, FilterMetadata>,
}

impl FilterRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            filters: IndexMap::new(),
        }
    }

    /// Create a registry pre-populated with built-in filters.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        builtin::register_all(&mut registry);
        registry
    }

    /// Register a filter. Registering the same kind twice replaces the
    /// metadata but keeps its original position.
    pub fn register(&mut self, metadata: FilterMetadata) {
        self.filters.insert(metadata.id, metadata);
    }

    /// Get metadata for a filter id.
    pub fn get_metadata(&self, id: &str) -> Option<&FilterMetadata> {
        self.filters.get(id)
    }

    /// Metadata for a kind.
    pub fn metadata_for(&self, kind: FilterKind) -> Option<&FilterMetadata> {
        self.get_metadata(kind.id())
    }

    /// Resolve a filter name to a registered kind.
    pub fn lookup(&self, name: &str) -> FiltrawyResult<FilterKind> {
        let kind: FilterKind = name.parse()?;
        if self.contains(kind.id()) {
            Ok(kind)
        } else {
            Err(FiltrawyError::UnsupportedFilterName(name.to_string()))
        }
    }

    /// Check if a filter is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.filters.contains_key(id)
    }

    /// All registered filters in registration order.
    pub fn filters(&self) -> impl Iterator<Item = &FilterMetadata> {
        self.filters.values()
    }

    /// Search filters by id, name, description or tag.
    pub fn search(&self, query: &str) -> Vec<&FilterMetadata> {
        let query = query.trim().to_lowercase();

        self.filters
            .values()
            .filter(|metadata| {
                metadata.id.contains(&query)
                    || metadata.name.to_lowercase().contains(&query)
                    || metadata.description.to_lowercase().contains(&query)
                    || metadata.tags.iter().any(|t| t.to_lowercase().contains(&query))
            })
            .collect()
    }

    /// Get the total number of registered filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Filters grouped by category in compositing order.
    pub fn grouped_by_category(&self) -> IndexMap<Category, Vec<&FilterMetadata>> {
        let mut grouped: IndexMap<Category, Vec<&FilterMetadata>> = IndexMap::new();
        for metadata in self.filters.values() {
            grouped.entry(metadata.category).or_default().push(metadata);
        }
        grouped.sort_keys();
        for filters in grouped.values_mut() {
            filters.sort_by_key(|m| m.kind);
        }
        grouped
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(found: Vec<&FilterMetadata>) -> Vec<&'static str> {
        found.into_iter().map(|m| m.id).collect()
    }

    #[test]
    fn test_builtins_cover_every_kind() {
        let registry = FilterRegistry::with_builtins();
        assert_eq!(registry.len(), FilterKind::ALL.len());
        for kind in FilterKind::ALL {
            assert!(registry.contains(kind.id()), "{kind} not registered");
        }
    }

    #[test]
    fn test_registration_order_is_compositing_order() {
        let registry = FilterRegistry::with_builtins();
        let kinds: Vec<FilterKind> = registry.filters().map(|m| m.kind).collect();
        assert_eq!(kinds, FilterKind::ALL.to_vec());
    }

    #[test]
    fn test_lookup() {
        let registry = FilterRegistry::with_builtins();
        assert_eq!(registry.lookup("sepia").unwrap(), FilterKind::Sepia);
        assert_eq!(registry.lookup("tiltShift").unwrap(), FilterKind::TiltShift);
        assert!(matches!(
            registry.lookup("posterize"),
            Err(FiltrawyError::UnsupportedFilterName(_))
        ));
    }

    #[test]
    fn test_lookup_rejects_unregistered_kind() {
        let mut registry = FilterRegistry::new();
        assert!(registry.is_empty());
        registry.register(FilterMetadata::builder(FilterKind::Gauss, "Gaussian Blur").build());
        assert!(registry.lookup("gauss").is_ok());
        assert!(matches!(
            registry.lookup("sepia"),
            Err(FiltrawyError::UnsupportedFilterName(_))
        ));
    }

    #[test]
    fn test_search() {
        let registry = FilterRegistry::with_builtins();
        let results = ids(registry.search("retro"));
        assert!(results.contains(&"sepia"));
        assert!(results.contains(&"vintage"));
        assert_eq!(ids(registry.search("  SOBEL ")), vec!["sobel"]);
        assert!(registry.search("nonexistent").is_empty());
    }

    #[test]
    fn test_grouped_by_category() {
        let registry = FilterRegistry::with_builtins();
        let grouped = registry.grouped_by_category();
        let categories: Vec<Category> = grouped.keys().copied().collect();
        assert_eq!(categories, Category::all().to_vec());
        assert_eq!(grouped[&Category::Color].len(), 2);
        let edges: Vec<&str> = grouped[&Category::Edge].iter().map(|m| m.id).collect();
        assert_eq!(edges, vec!["sobel", "laplace", "prewitt"]);
    }

    #[test]
    fn test_reregistration_keeps_position() {
        let mut registry = FilterRegistry::with_builtins();
        registry.register(
            FilterMetadata::builder(FilterKind::Gray, "Monochrome")
                .description("replaced")
                .build(),
        );
        assert_eq!(registry.len(), FilterKind::ALL.len());
        assert_eq!(registry.get_metadata("gray").unwrap().name, "Monochrome");
        let kinds: Vec<FilterKind> = registry.filters().map(|m| m.kind).collect();
        assert_eq!(kinds, FilterKind::ALL.to_vec());
    }
}
