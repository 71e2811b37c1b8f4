//! Annotation visibility filtering

use crate::annotation::{Annotation, MentionType};
use alloc::collections::BTreeSet;
use alloc::string::String;

/// Which annotations take part in a render
///
/// Empty sets allow everything. Toggling visibility means rendering again
/// from the pristine source with another filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationFilter {
    /// Allowed mention types (empty = all)
    pub mention_types: BTreeSet<MentionType>,
    /// Allowed entity types (empty = all), compared case-insensitively
    pub entity_types: BTreeSet<String>,
    /// Minimum confidence, inclusive
    pub min_confidence: f64,
}

impl AnnotationFilter {
    /// A filter that lets every annotation through
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Restrict to the given mention types
    pub fn with_mention_types(mut self, kinds: impl IntoIterator<Item = MentionType>) -> Self {
        self.mention_types = kinds.into_iter().collect();
        self
    }

    /// Restrict to the given entity types
    pub fn with_entity_types<S: AsRef<str>>(mut self, kinds: impl IntoIterator<Item = S>) -> Self {
        self.entity_types = kinds
            .into_iter()
            .map(|kind| kind.as_ref().to_lowercase())
            .collect();
        self
    }

    /// Require at least `min_confidence`
    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    /// Whether this filter lets everything through
    pub fn is_pass_through(&self) -> bool {
        self.mention_types.is_empty() && self.entity_types.is_empty() && self.min_confidence <= 0.0
    }

    /// Whether `annotation` is visible under this filter
    pub fn allows(&self, annotation: &Annotation) -> bool {
        if !self.mention_types.is_empty() && !self.mention_types.contains(&annotation.mention_type)
        {
            return false;
        }
        if !self.entity_types.is_empty()
            && !self
                .entity_types
                .contains(&annotation.entity_type.to_lowercase())
        {
            return false;
        }
        // NaN confidence never passes a positive threshold
        self.min_confidence <= 0.0 || annotation.confidence >= self.min_confidence
    }
}
