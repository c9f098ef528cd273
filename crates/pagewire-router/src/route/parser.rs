//! Pattern parsing and specificity ranking for routes
//!
//! Pure parsers that turn `/users/:id` or `#/docs/*path` into typed segments.

use std::collections::HashSet;

use super::pattern::{classify_segment, is_valid_param_name, PatternSegmentType};
use crate::RouteError;

/// Which part of the location a pattern is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternTarget {
    /// The URL path, e.g. `/users/:id`
    Path,
    /// The URL fragment, e.g. `#/users/:id` or `#about`
    Hash,
}

/// A fully parsed route pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPattern {
    pub target: PatternTarget,
    pub segments: Vec<PatternSegmentType>,
    pub params: Vec<String>,
}

impl ParsedPattern {
    /// Whether the last segment is a trailing wildcard
    pub fn has_wildcard(&self) -> bool {
        matches!(self.segments.last(), Some(PatternSegmentType::Wildcard(_)))
    }

    /// Per-segment specificity ranks, compared lexicographically.
    ///
    /// Static beats variable beats wildcard at the first differing position.
    pub fn rank(&self) -> Vec<u8> {
        self.segments.iter().map(PatternSegmentType::rank).collect()
    }
}

/// Parses a route pattern (pure function)
///
/// A leading `#` selects the fragment as the match target. Placeholders are
/// `:name` for one segment and `*name` for the remaining segments; a wildcard
/// is only allowed in last position and names must be unique.
///
/// # Examples
///
/// ```
/// use pagewire_router::route::parser::{parse_pattern, PatternTarget};
///
/// let parsed = parse_pattern("/users/:id").unwrap();
/// assert_eq!(parsed.target, PatternTarget::Path);
/// assert_eq!(parsed.params, vec!["id".to_string()]);
///
/// let parsed = parse_pattern("#/docs/*path").unwrap();
/// assert_eq!(parsed.target, PatternTarget::Hash);
/// assert!(parsed.has_wildcard());
///
/// assert!(parse_pattern("/files/*path/edit").is_err());
/// ```
pub fn parse_pattern(pattern: &str) -> Result<ParsedPattern, RouteError> {
    let invalid = |reason: &str| RouteError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: reason.to_string(),
    };

    let (target, body) = match pattern.strip_prefix('#') {
        Some(rest) => (PatternTarget::Hash, rest),
        None => (PatternTarget::Path, pattern),
    };

    let segments: Vec<PatternSegmentType> = body
        .split('/')
        .filter(|s| !s.is_empty())
        .map(classify_segment)
        .collect();

    let mut seen = HashSet::new();
    let mut params = Vec::new();
    for (index, segment) in segments.iter().enumerate() {
        if let PatternSegmentType::Wildcard(_) = segment {
            if index + 1 != segments.len() {
                return Err(invalid("a wildcard must be the last segment"));
            }
        }
        if let Some(name) = segment.param_name() {
            if !is_valid_param_name(name) {
                return Err(invalid(&format!("invalid placeholder name {:?}", name)));
            }
            if !seen.insert(name.to_string()) {
                return Err(invalid(&format!("placeholder {:?} is declared twice", name)));
            }
            params.push(name.to_string());
        }
    }

    Ok(ParsedPattern {
        target,
        segments,
        params,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pattern_static() {
        let parsed = parse_pattern("/about").unwrap();
        assert_eq!(parsed.target, PatternTarget::Path);
        assert_eq!(
            parsed.segments,
            vec![PatternSegmentType::Static("about".to_string())]
        );
        assert!(parsed.params.is_empty());
    }

    #[test]
    fn test_parse_pattern_root() {
        let parsed = parse_pattern("/").unwrap();
        assert!(parsed.segments.is_empty());
        let parsed = parse_pattern("#").unwrap();
        assert_eq!(parsed.target, PatternTarget::Hash);
        assert!(parsed.segments.is_empty());
    }

    #[test]
    fn test_parse_pattern_hash_without_slash() {
        let parsed = parse_pattern("#about").unwrap();
        assert_eq!(parsed.target, PatternTarget::Hash);
        assert_eq!(
            parsed.segments,
            vec![PatternSegmentType::Static("about".to_string())]
        );
    }

    #[test]
    fn test_parse_pattern_rejects_duplicate_names() {
        let err = parse_pattern("/a/:id/b/:id").unwrap_err();
        assert!(matches!(err, RouteError::InvalidPattern { .. }));
    }

    #[test]
    fn test_parse_pattern_rejects_bad_names() {
        assert!(parse_pattern("/a/:").is_err());
        assert!(parse_pattern("/a/:user-id").is_err());
        assert!(parse_pattern("/a/*").is_err());
    }

    #[test]
    fn test_rank_prefers_static_prefix() {
        let a = parse_pattern("/:a/b").unwrap().rank();
        let b = parse_pattern("/a/:b").unwrap().rank();
        assert!(b < a);
    }

    #[test]
    fn test_rank_prefers_longer_wildcard_prefix() {
        let short = parse_pattern("/docs/*rest").unwrap().rank();
        let long = parse_pattern("/docs/api/*rest").unwrap().rank();
        assert!(long < short);
    }
}
