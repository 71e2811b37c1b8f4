//! Annotation records produced by the extraction pipeline

use alloc::string::{String, ToString};
use core::fmt;
use core::str::FromStr;

/// How an entity is referred to by a mention
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MentionType {
    /// The entity's canonical name
    #[default]
    DirectName,
    /// An alternative name or title
    Alias,
    /// A pronoun resolved to the entity
    Pronoun,
    /// A mention found by the model-driven extraction pass
    Langextract,
}

impl MentionType {
    /// All mention types, in declaration order
    pub const ALL: [MentionType; 4] = [
        MentionType::DirectName,
        MentionType::Alias,
        MentionType::Pronoun,
        MentionType::Langextract,
    ];

    /// Wire name of the mention type
    pub fn as_str(&self) -> &'static str {
        match self {
            MentionType::DirectName => "direct_name",
            MentionType::Alias => "alias",
            MentionType::Pronoun => "pronoun",
            MentionType::Langextract => "langextract",
        }
    }
}

impl fmt::Display for MentionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown mention type name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMentionTypeError {
    name: String,
}

impl fmt::Display for ParseMentionTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown mention type '{}'", self.name)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseMentionTypeError {}

impl FromStr for MentionType {
    type Err = ParseMentionTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MentionType::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseMentionTypeError {
                name: s.to_string(),
            })
    }
}

/// A span of narrative text linked to a named entity
///
/// Offsets are counted in chars (Unicode scalar values) against the text
/// snapshot the extractor saw, end-exclusive. They are signed because upstream
/// data is untrusted; negative or inverted spans are dropped at render time.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Annotation {
    /// Canonical entity name
    pub entity_name: String,
    /// Entity category (character, skill, location, ...)
    pub entity_type: String,
    /// Start char offset (inclusive)
    pub char_offset_start: i64,
    /// End char offset (exclusive)
    pub char_offset_end: i64,
    /// Literal text recorded at extraction time
    #[cfg_attr(feature = "serde", serde(default))]
    pub extraction_text: String,
    /// How the entity is referred to
    #[cfg_attr(feature = "serde", serde(default))]
    pub mention_type: MentionType,
    /// Extractor confidence in `[0, 1]`
    #[cfg_attr(feature = "serde", serde(default = "default_confidence"))]
    pub confidence: f64,
}

#[cfg(feature = "serde")]
fn default_confidence() -> f64 {
    1.0
}

impl Annotation {
    /// Create a direct-name annotation whose extraction text is the entity name
    pub fn new(
        entity_name: impl Into<String>,
        entity_type: impl Into<String>,
        char_offset_start: i64,
        char_offset_end: i64,
    ) -> Self {
        let entity_name = entity_name.into();
        Self {
            extraction_text: entity_name.clone(),
            entity_name,
            entity_type: entity_type.into(),
            char_offset_start,
            char_offset_end,
            mention_type: MentionType::DirectName,
            confidence: 1.0,
        }
    }

    /// Replace the extraction text
    pub fn with_extraction_text(mut self, text: impl Into<String>) -> Self {
        self.extraction_text = text.into();
        self
    }

    /// Replace the mention type
    pub fn with_mention_type(mut self, mention_type: MentionType) -> Self {
        self.mention_type = mention_type;
        self
    }

    /// Replace the confidence
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Validated span relative to `base`, for a text of `len` chars
    ///
    /// Returns `None` when the span is negative, empty, starts before `base`
    /// or runs past `base + len`.
    pub fn span_within(&self, base: usize, len: usize) -> Option<(usize, usize)> {
        let start = usize::try_from(self.char_offset_start).ok()?;
        let end = usize::try_from(self.char_offset_end).ok()?;
        if end <= start || start < base || end > base.checked_add(len)? {
            return None;
        }
        Some((start - base, end - base))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mention_type_round_trip_names() {
        for kind in MentionType::ALL {
            assert_eq!(kind.as_str().parse::<MentionType>(), Ok(kind));
        }
        assert_eq!(" Alias ".parse::<MentionType>(), Ok(MentionType::Alias));
        assert!("nickname".parse::<MentionType>().is_err());
    }

    #[test]
    fn test_span_within() {
        let a = Annotation::new("Bob", "character", 10, 13);
        assert_eq!(a.span_within(0, 20), Some((10, 13)));
        assert_eq!(a.span_within(10, 3), Some((0, 3)));
        assert_eq!(a.span_within(11, 10), None);
        assert_eq!(a.span_within(0, 12), None);
    }

    #[test]
    fn test_span_within_rejects_malformed() {
        assert_eq!(Annotation::new("x", "t", -1, 3).span_within(0, 10), None);
        assert_eq!(Annotation::new("x", "t", 4, 4).span_within(0, 10), None);
        assert_eq!(Annotation::new("x", "t", 5, 2).span_within(0, 10), None);
    }

    #[test]
    fn test_builder_methods() {
        let a = Annotation::new("Gandalf", "character", 0, 7)
            .with_extraction_text("the wizard")
            .with_mention_type(MentionType::Alias)
            .with_confidence(0.5);
        assert_eq!(a.extraction_text, "the wizard");
        assert_eq!(a.mention_type, MentionType::Alias);
        assert_eq!(a.confidence, 0.5);
    }
}
