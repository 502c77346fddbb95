//! Render result caching.
//!
//! Caches composited images so that toggling back to a previously seen
//! selection and parameter combination skips re-rendering.

use crate::core::params::ParameterSet;
use crate::execution::selection::FilterSelection;
use image::RgbImage;
use lru::LruCache;
use std::num::NonZeroUsize;

/// Default number of cached renders.
pub const DEFAULT_CACHE_CAPACITY: usize = 16;

/// A cache key combining the selection with the parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Enabled filters.
    pub selection: FilterSelection,
    /// Parameter values.
    pub params: ParameterSet,
}

impl CacheKey {
    /// Key for a selection and parameter set.
    pub fn new(selection: &FilterSelection, params: &ParameterSet) -> Self {
        Self {
            selection: selection.clone(),
            params: *params,
        }
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
}

impl CacheStats {
    /// Calculate hit ratio.
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            return 0.0;
        }
        self.hits as f64 / total as f64
    }
}

/// LRU cache of rendered images for one original.
pub struct RenderCache {
    cache: LruCache<CacheKey, RgbImage>,
    stats: CacheStats,
}

impl RenderCache {
    /// Create a new cache holding up to `capacity` renders.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
            stats: CacheStats::default(),
        }
    }

    /// Get a cached render.
    pub fn get(&mut self, key: &CacheKey) -> Option<RgbImage> {
        match self.cache.get(key) {
            Some(image) => {
                self.stats.hits += 1;
                log::debug!(
                    "Render cache hit ({} filters, hit ratio {:.2})",
                    key.selection.len(),
                    self.stats.hit_ratio()
                );
                Some(image.clone())
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Store a render.
    pub fn put(&mut self, key: CacheKey, image: RgbImage) {
        self.cache.put(key, image);
    }

    /// Drop every entry. Called when the original image changes.
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Get number of cached entries.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

impl Default for RenderCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::params::ParamName;
    use crate::filters::FilterKind;

    fn key(kind: FilterKind, intensity: f64) -> CacheKey {
        let params = ParameterSet::default()
            .with(ParamName::Intensity, intensity)
            .unwrap();
        CacheKey::new(&FilterSelection::exclusive(kind), &params)
    }

    #[test]
    fn test_cache_key_equality() {
        assert_eq!(key(FilterKind::Color, 1.0), key(FilterKind::Color, 1.0));
        assert_ne!(key(FilterKind::Color, 1.0), key(FilterKind::Color, 1.5));
        assert_ne!(key(FilterKind::Color, 1.0), key(FilterKind::Gray, 1.0));
    }

    #[test]
    fn test_cache_put_get() {
        let mut cache = RenderCache::new(4);
        cache.put(key(FilterKind::Gray, 1.0), RgbImage::new(3, 3));
        assert_eq!(cache.get(&key(FilterKind::Gray, 1.0)).unwrap().dimensions(), (3, 3));
        assert!(cache.get(&key(FilterKind::Sepia, 1.0)).is_none());

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_ratio() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_least_recently_used_is_evicted() {
        let mut cache = RenderCache::new(2);
        cache.put(key(FilterKind::Gray, 1.0), RgbImage::new(1, 1));
        cache.put(key(FilterKind::Sepia, 1.0), RgbImage::new(1, 1));
        cache.get(&key(FilterKind::Gray, 1.0));
        cache.put(key(FilterKind::Sobel, 1.0), RgbImage::new(1, 1));

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&key(FilterKind::Sepia, 1.0)).is_none());
        assert!(cache.get(&key(FilterKind::Gray, 1.0)).is_some());
    }

    #[test]
    fn test_clear() {
        let mut cache = RenderCache::default();
        cache.put(key(FilterKind::Gray, 1.0), RgbImage::new(1, 1));
        cache.clear();
        assert!(cache.is_empty());
    }
}
