//! Pattern segment classification
//!
//! Pure parsing of route pattern segments into typed segments.

use once_cell::sync::Lazy;
use regex::Regex;

static PARAM_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("parameter name regex is valid")
});

/// Represents the kinds of route pattern segments
///
/// # Examples
///
/// ```
/// use pagewire_router::route::pattern::{classify_segment, PatternSegmentType};
///
/// assert!(matches!(classify_segment("users"), PatternSegmentType::Static(_)));
/// assert!(matches!(classify_segment(":id"), PatternSegmentType::Variable(_)));
/// assert!(matches!(classify_segment("*rest"), PatternSegmentType::Wildcard(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSegmentType {
    /// Literal text that must match exactly
    Static(String),
    /// `:name`, matches exactly one non-empty segment
    Variable(String),
    /// `*name`, matches one or more trailing segments
    Wildcard(String),
}

impl PatternSegmentType {
    /// Specificity rank of this segment; lower ranks win.
    pub fn rank(&self) -> u8 {
        match self {
            PatternSegmentType::Static(_) => 0,
            PatternSegmentType::Variable(_) => 1,
            PatternSegmentType::Wildcard(_) => 2,
        }
    }

    /// Placeholder name for variable and wildcard segments
    pub fn param_name(&self) -> Option<&str> {
        match self {
            PatternSegmentType::Static(_) => None,
            PatternSegmentType::Variable(name) | PatternSegmentType::Wildcard(name) => Some(name),
        }
    }
}

/// Classifies a segment into a pattern type (pure function)
///
/// 1. **Wildcard**: `*name`
/// 2. **Variable**: `:name`
/// 3. **Static**: any other text
pub fn classify_segment(segment: &str) -> PatternSegmentType {
    if let Some(name) = segment.strip_prefix('*') {
        return PatternSegmentType::Wildcard(name.to_string());
    }
    match segment.strip_prefix(':') {
        Some(name) => PatternSegmentType::Variable(name.to_string()),
        None => PatternSegmentType::Static(segment.to_string()),
    }
}

/// Checks a placeholder name against `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_valid_param_name(name: &str) -> bool {
    PARAM_NAME.is_match(name)
}
