//! Which filters are active.

use crate::filters::FilterKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Immutable set of enabled filters.
///
/// Iteration follows [`FilterKind`]'s ordering, which is the compositing
/// order, regardless of the order filters were enabled in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSelection {
    enabled: BTreeSet<FilterKind>,
}

impl FilterSelection {
    /// Nothing enabled.
    pub fn none() -> Self {
        Self::default()
    }

    /// Only `kind` enabled.
    pub fn exclusive(kind: FilterKind) -> Self {
        Self::none().with_enabled(kind)
    }

    /// Copy with `kind` also enabled.
    pub fn with_enabled(&self, kind: FilterKind) -> Self {
        let mut enabled = self.enabled.clone();
        enabled.insert(kind);
        Self { enabled }
    }

    /// Copy with `kind` disabled.
    pub fn without(&self, kind: FilterKind) -> Self {
        let mut enabled = self.enabled.clone();
        enabled.remove(&kind);
        Self { enabled }
    }

    /// Whether `kind` is enabled.
    pub fn is_enabled(&self, kind: FilterKind) -> bool {
        self.enabled.contains(&kind)
    }

    /// Enabled filters in compositing order.
    pub fn active(&self) -> impl Iterator<Item = FilterKind> + '_ {
        self.enabled.iter().copied()
    }

    /// Whether no filter is enabled.
    pub fn is_empty(&self) -> bool {
        self.enabled.is_empty()
    }

    /// Number of enabled filters.
    pub fn len(&self) -> usize {
        self.enabled.len()
    }
}

impl FromIterator<FilterKind> for FilterSelection {
    fn from_iter<I: IntoIterator<Item = FilterKind>>(iter: I) -> Self {
        Self {
            enabled: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_is_empty() {
        let selection = FilterSelection::none();
        assert!(selection.is_empty());
        assert!(FilterKind::ALL.iter().all(|k| !selection.is_enabled(*k)));
    }

    #[test]
    fn test_exclusive_enables_one() {
        let selection = FilterSelection::exclusive(FilterKind::Sepia);
        assert_eq!(selection.len(), 1);
        assert!(selection.is_enabled(FilterKind::Sepia));
    }

    #[test]
    fn test_active_in_compositing_order() {
        let selection = FilterSelection::none()
            .with_enabled(FilterKind::Vintage)
            .with_enabled(FilterKind::Gray)
            .with_enabled(FilterKind::Gauss);
        let order: Vec<_> = selection.active().collect();
        assert_eq!(order, vec![FilterKind::Gray, FilterKind::Gauss, FilterKind::Vintage]);
    }

    #[test]
    fn test_without_leaves_original_untouched() {
        let both = FilterSelection::exclusive(FilterKind::Sobel).with_enabled(FilterKind::Negative);
        let one = both.without(FilterKind::Sobel);
        assert!(both.is_enabled(FilterKind::Sobel));
        assert!(!one.is_enabled(FilterKind::Sobel));
        assert!(one.is_enabled(FilterKind::Negative));
    }

    #[test]
    fn test_serializes_as_list_of_ids() {
        let selection: FilterSelection = [FilterKind::TiltShift, FilterKind::Color].into_iter().collect();
        let json = serde_json::to_string(&selection).unwrap();
        assert_eq!(json, r#"["color","tilt_shift"]"#);
    }
}
