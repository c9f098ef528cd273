//! Route definitions and matching
//!
//! Parsing lives in [`parser`], segment classification in [`pattern`]. This
//! module ties a parsed pattern to a name and a handler and walks location
//! segments against it.

pub mod parser;
pub mod pattern;

use std::fmt;
use std::rc::Rc;

use url::Url;

pub use parser::{parse_pattern, ParsedPattern, PatternTarget};
pub use pattern::{classify_segment, PatternSegmentType};

use crate::path::split_segments;
use crate::{HandlerError, RouteError, Vars};

/// Callback run when a route is resolved
pub type Handler = Rc<dyn Fn(&Vars, &Url) -> Result<(), HandlerError>>;

/// Options that change how location segments are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    pub case_insensitive: bool,
    pub skip_trailing_slash: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            case_insensitive: false,
            skip_trailing_slash: true,
        }
    }
}

/// A named route: a parsed pattern plus an optional handler
#[derive(Clone)]
pub struct Route {
    /// Unique route name
    pub name: String,
    /// Pattern as registered, e.g. `/users/:id`
    pub pattern: String,
    parsed: ParsedPattern,
    handler: Option<Handler>,
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("name", &self.name)
            .field("pattern", &self.pattern)
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}

impl Route {
    /// Parses `pattern` and builds a route without a handler
    ///
    /// ```
    /// use pagewire_router::Route;
    ///
    /// let route = Route::new("user", "/users/:id").unwrap();
    /// assert_eq!(route.params(), ["id".to_string()]);
    /// ```
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Result<Self, RouteError> {
        let pattern = pattern.into();
        let parsed = parse_pattern(&pattern)?;
        Ok(Self {
            name: name.into(),
            pattern,
            parsed,
            handler: None,
        })
    }

    /// Attaches a handler
    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Vars, &Url) -> Result<(), HandlerError> + 'static,
    {
        self.handler = Some(Rc::new(handler));
        self
    }

    pub(crate) fn set_handler(&mut self, handler: Option<Handler>) {
        self.handler = handler;
    }

    pub(crate) fn handler(&self) -> Option<Handler> {
        self.handler.clone()
    }

    pub fn target(&self) -> PatternTarget {
        self.parsed.target
    }

    pub fn params(&self) -> &[String] {
        &self.parsed.params
    }

    pub(crate) fn rank(&self) -> Vec<u8> {
        self.parsed.rank()
    }

    /// Matches the route against a path or fragment with default options
    ///
    /// ```
    /// use pagewire_router::Route;
    ///
    /// let route = Route::new("user", "/users/:id").unwrap();
    /// let vars = route.matches("/users/42").unwrap();
    /// assert_eq!(vars.get("id"), Some("42"));
    /// assert!(route.matches("/users/42/edit").is_none());
    /// ```
    pub fn matches(&self, input: &str) -> Option<Vars> {
        self.matches_with_options(input, MatchOptions::default())
    }

    /// Matches this route against a path or fragment
    ///
    /// Walks pattern and input segments together. Static segments compare
    /// literally, variables take one non-empty segment, a trailing wildcard
    /// takes one or more remaining segments joined by `/`. Segment counts must
    /// be equal unless a wildcard is declared. Captured values are
    /// percent-decoded.
    pub fn matches_with_options(&self, input: &str, options: MatchOptions) -> Option<Vars> {
        let path_segments = split_segments(input, !options.skip_trailing_slash);

        fn match_segments(
            pattern_segments: &[PatternSegmentType],
            path_segments: &[&str],
            vars: Vars,
            case_insensitive: bool,
        ) -> Option<Vars> {
            let Some((pattern_seg, rest_pattern)) = pattern_segments.split_first() else {
                return if path_segments.is_empty() {
                    Some(vars)
                } else {
                    None
                };
            };

            match pattern_seg {
                PatternSegmentType::Wildcard(name) => {
                    if path_segments.is_empty() || path_segments.iter().all(|s| s.is_empty()) {
                        return None;
                    }
                    let joined = path_segments
                        .iter()
                        .map(|s| decode(s))
                        .collect::<Vec<_>>()
                        .join("/");
                    let mut vars = vars;
                    vars.insert(name.clone(), joined);
                    Some(vars)
                }
                PatternSegmentType::Variable(name) => {
                    let (segment, rest_path) = path_segments.split_first()?;
                    if segment.is_empty() {
                        return None;
                    }
                    let mut vars = vars;
                    vars.insert(name.clone(), decode(segment));
                    match_segments(rest_pattern, rest_path, vars, case_insensitive)
                }
                PatternSegmentType::Static(literal) => {
                    let (segment, rest_path) = path_segments.split_first()?;
                    let segment = decode(segment);
                    let matches = if case_insensitive {
                        literal.eq_ignore_ascii_case(&segment)
                    } else {
                        *literal == segment
                    };
                    if !matches {
                        return None;
                    }
                    match_segments(rest_pattern, rest_path, vars, case_insensitive)
                }
            }
        }

        match_segments(
            &self.parsed.segments,
            &path_segments,
            Vars::default(),
            options.case_insensitive,
        )
    }

    /// Generates a location for this route by substituting variables
    ///
    /// Hash routes produce `#/...`, path routes `/...`. Returns `None` when a
    /// placeholder has no value.
    ///
    /// ```
    /// use pagewire_router::{Route, Vars};
    ///
    /// let route = Route::new("user", "/users/:id").unwrap();
    /// let vars = Vars::from_iter([("id", "42")]);
    /// assert_eq!(route.generate_url(&vars), Some("/users/42".to_string()));
    /// ```
    pub fn generate_url(&self, vars: &Vars) -> Option<String> {
        let segments: Option<Vec<String>> = self
            .parsed
            .segments
            .iter()
            .map(|segment| match segment {
                PatternSegmentType::Static(literal) => Some(literal.clone()),
                PatternSegmentType::Variable(name) => vars
                    .get(name)
                    .map(|value| urlencoding::encode(value).into_owned()),
                PatternSegmentType::Wildcard(name) => vars.get(name).map(str::to_string),
            })
            .collect();

        let body = format!("/{}", segments?.join("/"));
        Some(match self.parsed.target {
            PatternTarget::Path => body,
            PatternTarget::Hash => format!("#{}", body),
        })
    }
}

fn decode(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|value| value.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_match() {
        let route = Route::new("user", "/users/:id").unwrap();
        let vars = route.matches("/users/42").unwrap();
        assert_eq!(vars.get("id"), Some("42"));
    }

    #[test]
    fn test_exact_segment_count() {
        let route = Route::new("user", "/users/:id").unwrap();
        assert!(route.matches("/users/42/edit").is_none());
        assert!(route.matches("/users").is_none());
    }

    #[test]
    fn test_trailing_wildcard() {
        let route = Route::new("files", "/files/*path").unwrap();
        let vars = route.matches("/files/a/b/c.txt").unwrap();
        assert_eq!(vars.get("path"), Some("a/b/c.txt"));
        assert!(route.matches("/files").is_none());
    }

    #[test]
    fn test_percent_decoding() {
        let route = Route::new("tag", "/tags/:name").unwrap();
        let vars = route.matches("/tags/rust%20lang").unwrap();
        assert_eq!(vars.get("name"), Some("rust lang"));
    }

    #[test]
    fn test_trailing_slash_option() {
        let route = Route::new("about", "/about").unwrap();
        assert!(route.matches("/about/").is_some());
        let strict = MatchOptions {
            case_insensitive: false,
            skip_trailing_slash: false,
        };
        assert!(route.matches_with_options("/about/", strict).is_none());
        assert!(route.matches_with_options("/about", strict).is_some());
    }

    #[test]
    fn test_case_insensitive_option() {
        let route = Route::new("about", "/About").unwrap();
        assert!(route.matches("/about").is_none());
        let options = MatchOptions {
            case_insensitive: true,
            skip_trailing_slash: true,
        };
        assert!(route.matches_with_options("/about", options).is_some());
    }

    #[test]
    fn test_generate_hash_url() {
        let route = Route::new("doc", "#/docs/:page").unwrap();
        let vars = Vars::from_iter([("page", "intro")]);
        assert_eq!(route.generate_url(&vars), Some("#/docs/intro".to_string()));
        assert_eq!(route.generate_url(&Vars::default()), None);
    }
}
