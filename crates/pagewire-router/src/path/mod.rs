//! Path utilities for validation, normalization and segment splitting
//!
//! All functions are **pure**: given same input, always produce same output with no side effects.

use std::borrow::Cow;

/// Validates if a path is in canonical form
///
/// # Rules
///
/// - Must start with `/`
/// - Must not contain `//` or `\`
/// - Must not end with `/` (except root `/`)
/// - Must not be empty
///
/// # Examples
///
/// ```
/// use pagewire_router::path::is_valid_path;
///
/// assert!(is_valid_path("/"));
/// assert!(is_valid_path("/users/123"));
///
/// assert!(!is_valid_path(""));
/// assert!(!is_valid_path("about"));
/// assert!(!is_valid_path("/about/"));
/// assert!(!is_valid_path("/about//page"));
/// ```
pub fn is_valid_path(path: &str) -> bool {
    if path.is_empty() || !path.starts_with('/') {
        return false;
    }

    if path.contains("//") || path.contains('\\') {
        return false;
    }

    path == "/" || !path.ends_with('/')
}

/// Normalize a path to canonical form
///
/// Returns `Cow::Borrowed` when input is already valid (zero allocations).
///
/// - Trailing slashes: `/path/` → `/path`
/// - Double slashes: `/path//to` → `/path/to`
/// - Backslashes: `\path\to` → `/path/to`
///
/// ```
/// use pagewire_router::path::normalize_path;
/// use std::borrow::Cow;
///
/// assert!(matches!(normalize_path("/about"), Cow::Borrowed("/about")));
/// assert_eq!(normalize_path("/about/"), "/about");
/// assert_eq!(normalize_path("\\users\\123"), "/users/123");
/// ```
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    if is_valid_path(path) {
        return Cow::Borrowed(path);
    }

    let normalized = path
        .replace('\\', "/")
        .split('/')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    if normalized.is_empty() {
        Cow::Borrowed("/")
    } else {
        Cow::Owned(format!("/{}", normalized))
    }
}

/// Splits a location path or hash into the segments a pattern is matched against.
///
/// Empty segments are dropped. When `keep_trailing` is set, a trailing `/` on a
/// non-root input yields a final empty segment, so `/about/` no longer equals
/// `/about`.
///
/// ```
/// use pagewire_router::path::split_segments;
///
/// assert_eq!(split_segments("/users/42", false), vec!["users", "42"]);
/// assert_eq!(split_segments("/users/42/", true), vec!["users", "42", ""]);
/// assert!(split_segments("/", true).is_empty());
/// ```
pub fn split_segments(input: &str, keep_trailing: bool) -> Vec<&str> {
    let mut segments: Vec<&str> = input.split('/').filter(|s| !s.is_empty()).collect();
    if keep_trailing && input.len() > 1 && input.ends_with('/') && !segments.is_empty() {
        segments.push("");
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_path() {
        assert!(is_valid_path("/"));
        assert!(is_valid_path("/about"));
        assert!(is_valid_path("/blog/posts/hello-world"));

        assert!(!is_valid_path(""));
        assert!(!is_valid_path("about"));
        assert!(!is_valid_path("/about/"));
        assert!(!is_valid_path("/about\\page"));
    }

    #[test]
    fn test_normalize_path_double_slash() {
        assert_eq!(normalize_path("/about//page"), "/about/page");
        assert_eq!(normalize_path("/path///to////page"), "/path/to/page");
    }

    #[test]
    fn test_normalize_path_empty() {
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/"), "/");
    }

    #[test]
    fn test_split_segments_hash_fragment() {
        assert_eq!(split_segments("/users/7", false), vec!["users", "7"]);
        assert_eq!(split_segments("about", false), vec!["about"]);
        assert!(split_segments("", false).is_empty());
    }

    #[test]
    fn test_split_segments_trailing_slash() {
        assert_eq!(split_segments("/about/", false), vec!["about"]);
        assert_eq!(split_segments("/about/", true), vec!["about", ""]);
    }
}
