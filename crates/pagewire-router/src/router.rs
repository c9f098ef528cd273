//! Router: resolution plus the navigation lifecycle.
//!
//! The router is a cheap handle over shared single-threaded state. User
//! callbacks are always invoked after the internal borrow is released, so a
//! handler may call [`Router::redirect`] or register further routes.

use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, error, info, warn};
use url::Url;

use crate::path::normalize_path;
use crate::route::{Handler, MatchOptions, PatternTarget, Route};
use crate::{HandlerError, RouteError, Vars};

/// Prefix marking an href as a router-internal link
pub const ROUTE_PREFIX: &str = "router:";

/// Prefix marking an href as an external link in raw element lists
pub const EXTERNAL_PREFIX: &str = "external:";

/// Hook receiving the resolved variables and location
pub type NavigationHook = Rc<dyn Fn(&Vars, &Url)>;
/// Hook receiving only the location
pub type LocationHook = Rc<dyn Fn(&Url)>;
/// Hook receiving a resolution or handler error
pub type ErrorHook = Rc<dyn Fn(&RouteError)>;
/// Hook without arguments
pub type LoadHook = Rc<dyn Fn()>;
/// Receives the document title when `name_to_title` is enabled
pub type TitleSink = Rc<dyn Fn(&str)>;

/// Router behaviour switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouterOptions {
    /// Treat `/about/` like `/about`
    pub skip_trailing_slash: bool,
    /// Compare static segments ignoring ASCII case
    pub case_insensitive: bool,
    /// Set the document title to the route name on every navigation
    pub name_to_title: bool,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            skip_trailing_slash: true,
            case_insensitive: false,
            name_to_title: false,
        }
    }
}

impl RouterOptions {
    fn match_options(&self) -> MatchOptions {
        MatchOptions {
            case_insensitive: self.case_insensitive,
            skip_trailing_slash: self.skip_trailing_slash,
        }
    }
}

#[derive(Clone, Default)]
struct Hooks {
    before_load: Option<LocationHook>,
    on_page_change: Option<NavigationHook>,
    after_page_change: Option<NavigationHook>,
    on_load: Option<LoadHook>,
    on_error: Option<ErrorHook>,
    title: Option<TitleSink>,
    history: Option<LocationHook>,
}

#[derive(Default)]
struct RouterState {
    path_routes: Vec<Route>,
    hash_routes: Vec<Route>,
    options: RouterOptions,
    hooks: Hooks,
    current: Option<Url>,
    loaded: bool,
}

impl RouterState {
    fn routes_mut(&mut self, target: PatternTarget) -> &mut Vec<Route> {
        match target {
            PatternTarget::Path => &mut self.path_routes,
            PatternTarget::Hash => &mut self.hash_routes,
        }
    }

    fn all_routes(&self) -> impl Iterator<Item = &Route> {
        self.path_routes.iter().chain(self.hash_routes.iter())
    }

    fn find_route_mut(&mut self, name: &str) -> Option<&mut Route> {
        self.path_routes
            .iter_mut()
            .chain(self.hash_routes.iter_mut())
            .find(|r| r.name == name)
    }
}

/// Resolves locations against registered routes and runs the lifecycle
///
/// # Matching
///
/// - exact segment count unless the pattern ends in a `*name` wildcard
/// - static segments beat variables, variables beat wildcards, compared
///   position by position from the left
/// - registration order breaks remaining ties
/// - a non-empty fragment is tried against hash routes first, then the path
///   against path routes
///
/// # Lifecycle
///
/// `before_load` → resolution → `on_page_change` → handler →
/// `after_page_change`. Misses and handler failures go to `on_error`.
/// `on_load` fires once, after the first navigation done by [`Router::run`].
///
/// # Examples
///
/// ```
/// use pagewire_router::Router;
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use url::Url;
///
/// let seen = Rc::new(RefCell::new(None));
/// let router = Router::new();
/// let sink = seen.clone();
/// router
///     .register("user", "/users/:id", move |vars, _url| {
///         *sink.borrow_mut() = vars.get("id").map(str::to_string);
///         Ok(())
///     })
///     .unwrap();
///
/// router.run(&Url::parse("https://app.test/users/42").unwrap()).unwrap();
/// assert_eq!(seen.borrow().as_deref(), Some("42"));
/// ```
#[derive(Clone, Default)]
pub struct Router {
    inner: Rc<RefCell<RouterState>>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: RouterOptions) -> Self {
        let router = Self::new();
        router.inner.borrow_mut().options = options;
        router
    }

    pub fn options(&self) -> RouterOptions {
        self.inner.borrow().options
    }

    pub fn set_options(&self, options: RouterOptions) -> &Self {
        self.inner.borrow_mut().options = options;
        self
    }

    pub fn skip_trailing_slash(&self, skip: bool) -> &Self {
        self.inner.borrow_mut().options.skip_trailing_slash = skip;
        self
    }

    pub fn case_insensitive(&self, case_insensitive: bool) -> &Self {
        self.inner.borrow_mut().options.case_insensitive = case_insensitive;
        self
    }

    pub fn name_to_title(&self, enabled: bool) -> &Self {
        self.inner.borrow_mut().options.name_to_title = enabled;
        self
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Registers a named route with a handler
    ///
    /// Fails with `DuplicateRoute` when the name is taken and with
    /// `InvalidPattern` when the pattern does not parse. The router is left
    /// unchanged on failure.
    pub fn register<F>(&self, name: &str, pattern: &str, handler: F) -> Result<(), RouteError>
    where
        F: Fn(&Vars, &Url) -> Result<(), HandlerError> + 'static,
    {
        self.add_route(Route::new(name, pattern)?.with_handler(handler))
    }

    /// Registers a pre-built route
    pub fn add_route(&self, route: Route) -> Result<(), RouteError> {
        let mut state = self.inner.borrow_mut();
        if state.all_routes().any(|r| r.name == route.name) {
            return Err(RouteError::DuplicateRoute { name: route.name });
        }

        debug!(name = %route.name, pattern = %route.pattern, "registered route");
        let routes = state.routes_mut(route.target());
        routes.push(route);
        // Stable sort keeps registration order as the final tie-break
        routes.sort_by_key(Route::rank);
        Ok(())
    }

    /// Rebinds the handler of an existing route
    pub fn set_handler<F>(&self, name: &str, handler: F) -> Result<(), RouteError>
    where
        F: Fn(&Vars, &Url) -> Result<(), HandlerError> + 'static,
    {
        let handler: Handler = Rc::new(handler);
        let mut state = self.inner.borrow_mut();
        let route = state
            .find_route_mut(name)
            .ok_or_else(|| RouteError::UnknownRoute {
                name: name.to_string(),
            })?;
        route.set_handler(Some(handler));
        Ok(())
    }

    /// Returns a copy of the named route
    pub fn route(&self, name: &str) -> Option<Route> {
        self.inner
            .borrow()
            .all_routes()
            .find(|r| r.name == name)
            .cloned()
    }

    pub fn len(&self) -> usize {
        let state = self.inner.borrow();
        state.path_routes.len() + state.hash_routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ========================================================================
    // Hooks
    // ========================================================================

    /// Runs at the start of every navigation, before resolution
    pub fn before_load(&self, hook: impl Fn(&Url) + 'static) -> &Self {
        self.inner.borrow_mut().hooks.before_load = Some(Rc::new(hook));
        self
    }

    /// Runs after resolution, before the handler renders
    pub fn on_page_change(&self, hook: impl Fn(&Vars, &Url) + 'static) -> &Self {
        self.inner.borrow_mut().hooks.on_page_change = Some(Rc::new(hook));
        self
    }

    /// Runs after the handler returned successfully
    pub fn after_page_change(&self, hook: impl Fn(&Vars, &Url) + 'static) -> &Self {
        self.inner.borrow_mut().hooks.after_page_change = Some(Rc::new(hook));
        self
    }

    /// Runs once, after the first navigation done by [`Router::run`]
    pub fn on_load(&self, hook: impl Fn() + 'static) -> &Self {
        self.inner.borrow_mut().hooks.on_load = Some(Rc::new(hook));
        self
    }

    /// Receives resolution misses and handler failures
    pub fn on_error(&self, hook: impl Fn(&RouteError) + 'static) -> &Self {
        self.inner.borrow_mut().hooks.on_error = Some(Rc::new(hook));
        self
    }

    /// Where titles go when `name_to_title` is enabled
    pub fn set_title_sink(&self, sink: impl Fn(&str) + 'static) -> &Self {
        self.inner.borrow_mut().hooks.title = Some(Rc::new(sink));
        self
    }

    /// Called with the target of every redirect before it is resolved
    pub fn set_history_sink(&self, sink: impl Fn(&Url) + 'static) -> &Self {
        self.inner.borrow_mut().hooks.history = Some(Rc::new(sink));
        self
    }

    // ========================================================================
    // Resolution and navigation
    // ========================================================================

    /// Finds the route and variables for a location without running anything
    pub fn resolve(&self, url: &Url) -> Option<(Route, Vars)> {
        let state = self.inner.borrow();
        let options = state.options.match_options();
        let find = |routes: &[Route], input: &str| {
            routes.iter().find_map(|route| {
                route
                    .matches_with_options(input, options)
                    .map(|vars| (route.clone(), vars))
            })
        };

        let fragment = url.fragment().unwrap_or("");
        if !fragment.is_empty() {
            if let Some(found) = find(&state.hash_routes, fragment) {
                return Some(found);
            }
        }

        let path = if options.skip_trailing_slash {
            normalize_path(url.path())
        } else {
            Cow::Borrowed(url.path())
        };
        find(&state.path_routes, &path).or_else(|| {
            if fragment.is_empty() {
                find(&state.hash_routes, fragment)
            } else {
                None
            }
        })
    }

    /// Resolves `url` and runs the lifecycle once
    ///
    /// Misses and handler failures are reported to `on_error` and returned.
    pub fn navigate(&self, url: &Url) -> Result<(), RouteError> {
        let (hooks, options) = {
            let mut state = self.inner.borrow_mut();
            state.current = Some(url.clone());
            (state.hooks.clone(), state.options)
        };

        if let Some(before_load) = &hooks.before_load {
            before_load(url);
        }

        let Some((route, vars)) = self.resolve(url) else {
            let err = RouteError::NotFound {
                url: url.to_string(),
            };
            warn!(%url, "no route matches location");
            if let Some(on_error) = &hooks.on_error {
                on_error(&err);
            }
            return Err(err);
        };

        debug!(route = %route.name, %url, vars = vars.len(), "resolved route");

        if let Some(on_page_change) = &hooks.on_page_change {
            on_page_change(&vars, url);
        }

        if options.name_to_title {
            if let Some(title) = &hooks.title {
                title(&route.name);
            }
        }

        if let Some(handler) = route.handler() {
            if let Err(source) = handler(&vars, url) {
                let err = RouteError::Handler {
                    name: route.name.clone(),
                    source,
                };
                error!(route = %route.name, error = %err, "route handler failed");
                if let Some(on_error) = &hooks.on_error {
                    on_error(&err);
                }
                return Err(err);
            }
        }

        if let Some(after_page_change) = &hooks.after_page_change {
            after_page_change(&vars, url);
        }
        Ok(())
    }

    /// Resolves the initial location, then fires `on_load` once
    pub fn run(&self, url: &Url) -> Result<(), RouteError> {
        let result = self.navigate(url);

        let on_load = {
            let mut state = self.inner.borrow_mut();
            if state.loaded {
                None
            } else {
                state.loaded = true;
                state.hooks.on_load.clone()
            }
        };
        if let Some(on_load) = on_load {
            info!(%url, "router loaded");
            on_load();
        }
        result
    }

    /// The location of the most recent navigation
    pub fn current_url(&self) -> Option<Url> {
        self.inner.borrow().current.clone()
    }

    /// Navigates to `target`, a path, hash or absolute URL
    ///
    /// The target is joined onto the current location, handed to the history
    /// sink and then resolved through the normal lifecycle.
    pub fn redirect(&self, target: &str) -> Result<(), RouteError> {
        let base = self.current_url().ok_or(RouteError::NotRunning)?;
        let url = base.join(target).map_err(|source| RouteError::InvalidUrl {
            target: target.to_string(),
            source,
        })?;

        let history = self.inner.borrow().hooks.history.clone();
        if let Some(history) = history {
            history(&url);
        }
        debug!(%url, "redirect");
        self.navigate(&url)
    }

    /// Follows a link href if it is router-internal
    ///
    /// Returns `None` for hrefs without [`ROUTE_PREFIX`], which the browser
    /// should handle itself.
    pub fn handle_link(&self, href: &str) -> Option<Result<(), RouteError>> {
        href.strip_prefix(ROUTE_PREFIX)
            .map(|target| self.redirect(target))
    }

    /// Generates the location of a named route
    ///
    /// ```
    /// use pagewire_router::{Router, Vars};
    ///
    /// let router = Router::new();
    /// router.register("user", "/users/:id", |_, _| Ok(())).unwrap();
    /// let vars = Vars::from_iter([("id", "7")]);
    /// assert_eq!(router.url_for("user", &vars), Some("/users/7".to_string()));
    /// ```
    pub fn url_for(&self, name: &str, vars: &Vars) -> Option<String> {
        self.route(name)?.generate_url(vars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn url(s: &str) -> Url {
        Url::parse(&format!("https://app.test{}", s)).unwrap()
    }

    #[test]
    fn test_static_beats_variable_regardless_of_order() {
        let router = Router::new();
        router.register("user", "/users/:id", |_, _| Ok(())).unwrap();
        router.register("new-user", "/users/new", |_, _| Ok(())).unwrap();

        let (route, vars) = router.resolve(&url("/users/new")).unwrap();
        assert_eq!(route.name, "new-user");
        assert!(vars.is_empty());

        let (route, vars) = router.resolve(&url("/users/9")).unwrap();
        assert_eq!(route.name, "user");
        assert_eq!(vars.get("id"), Some("9"));
    }

    #[test]
    fn test_registration_order_breaks_ties() {
        let router = Router::new();
        router.register("first", "/a/:x", |_, _| Ok(())).unwrap();
        router.register("second", "/a/:y", |_, _| Ok(())).unwrap();
        let (route, _) = router.resolve(&url("/a/1")).unwrap();
        assert_eq!(route.name, "first");
    }

    #[test]
    fn test_duplicate_route_name_fails() {
        let router = Router::new();
        router.register("home", "/", |_, _| Ok(())).unwrap();
        let err = router.register("home", "/home", |_, _| Ok(())).unwrap_err();
        assert!(matches!(err, RouteError::DuplicateRoute { .. }));
        assert_eq!(router.len(), 1);
    }

    #[test]
    fn test_hash_route_wins_over_path() {
        let router = Router::new();
        router.register("index", "/", |_, _| Ok(())).unwrap();
        router.register("about", "#about", |_, _| Ok(())).unwrap();

        let (route, _) = router.resolve(&url("/#about")).unwrap();
        assert_eq!(route.name, "about");
        let (route, _) = router.resolve(&url("/")).unwrap();
        assert_eq!(route.name, "index");
    }

    #[test]
    fn test_redirect_before_run_fails() {
        let router = Router::new();
        assert!(matches!(router.redirect("/x"), Err(RouteError::NotRunning)));
    }

    #[test]
    fn test_handle_link_ignores_plain_hrefs() {
        let router = Router::new();
        assert!(router.handle_link("https://example.com").is_none());
    }

    #[test]
    fn test_on_load_fires_once() {
        let router = Router::new();
        let count = Rc::new(RefCell::new(0));
        let c = count.clone();
        router.register("home", "/", |_, _| Ok(())).unwrap();
        router.on_load(move || *c.borrow_mut() += 1);

        router.run(&url("/")).unwrap();
        router.run(&url("/")).unwrap();
        assert_eq!(*count.borrow(), 1);
    }
}
