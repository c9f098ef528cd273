//! Router-driven application shell
//!
//! An [`Application`] owns the mount node, an optional navbar and footer,
//! a loader, a router and a free-form data map. Route handlers render into
//! the mount node through [`Application::render`] and friends; the navbar
//! always stays the first child and the footer the last.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::rc::{Rc, Weak};

use pagewire_router::{HandlerError, RouteError, Router, RouterOptions, UrlRegistry, Vars};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use crate::client::{default_client_factory, ApiClient, ClientFactory};
use crate::component::Renderable;
use crate::config::{PagewireConfig, DEFAULT_PRELOADER_ID};
use crate::dom::{Element, Event, EventKind, Platform};
use crate::error::AppError;
use crate::exit::ExitSignal;
use crate::loader::Loader;

pub const NOT_FOUND_TEXT: &str = "404 - Page not found";

type ErrorView = Rc<dyn Fn(&Application, &RouteError)>;
type Hook = Rc<dyn Fn()>;

struct AppState {
    root: Element,
    navbar: Option<Element>,
    footer: Option<Element>,
    loader: Loader,
    client_factory: ClientFactory,
    on_error: Option<ErrorView>,
    before_load: Option<Hook>,
    on_load: Option<Hook>,
    data: HashMap<String, Value>,
    preloader_id: String,
    running: bool,
}

struct Shared {
    platform: Rc<dyn Platform>,
    router: Router,
    state: RefCell<AppState>,
    exit: ExitSignal,
}

/// Handle to the application; clones share state
#[derive(Clone)]
pub struct Application {
    shared: Rc<Shared>,
}

/// Router options of the default shell router
pub fn default_router_options() -> RouterOptions {
    RouterOptions {
        skip_trailing_slash: true,
        case_insensitive: false,
        name_to_title: true,
    }
}

impl Application {
    /// Mounts on the node matching `selector`, or on `<body>` when it is empty
    pub fn new(platform: Rc<dyn Platform>, selector: &str) -> Result<Self, AppError> {
        Self::with_router(
            platform,
            selector,
            Router::with_options(default_router_options()),
        )
    }

    /// Like [`Application::new`] with a caller-supplied router
    pub fn with_router(
        platform: Rc<dyn Platform>,
        selector: &str,
        router: Router,
    ) -> Result<Self, AppError> {
        let root = if selector.is_empty() {
            platform.body()
        } else {
            platform
                .query_selector(selector)
                .ok_or_else(|| AppError::RootNotFound {
                    selector: selector.to_string(),
                })?
        };
        let loader = Loader::new(platform.as_ref(), &root);

        let app = Self {
            shared: Rc::new(Shared {
                platform,
                router,
                state: RefCell::new(AppState {
                    root,
                    navbar: None,
                    footer: None,
                    loader,
                    client_factory: default_client_factory(),
                    on_error: None,
                    before_load: None,
                    on_load: None,
                    data: HashMap::new(),
                    preloader_id: DEFAULT_PRELOADER_ID.to_string(),
                    running: false,
                }),
                exit: ExitSignal::new(),
            }),
        };
        app.wire_router();
        Ok(app)
    }

    /// Builds from the `[app]` and `[router]` sections
    pub fn from_config(
        platform: Rc<dyn Platform>,
        config: &PagewireConfig,
    ) -> Result<Self, AppError> {
        let router = Router::with_options(config.router_options());
        let app = Self::with_router(platform, &config.app.root_selector, router)?;
        app.state_mut().preloader_id = config.app.preloader_id.clone();
        if let Some(title) = &config.app.title {
            app.set_title(title);
        }
        Ok(app)
    }

    fn state(&self) -> std::cell::Ref<'_, AppState> {
        self.shared.state.borrow()
    }

    fn state_mut(&self) -> std::cell::RefMut<'_, AppState> {
        self.shared.state.borrow_mut()
    }

    fn downgrade(&self) -> Weak<Shared> {
        Rc::downgrade(&self.shared)
    }

    fn upgrade(weak: &Weak<Shared>) -> Option<Application> {
        weak.upgrade().map(|shared| Application { shared })
    }

    /// Connects router sinks and the error view to this shell
    fn wire_router(&self) {
        let platform = Rc::downgrade(&self.shared.platform);
        self.shared.router.set_title_sink(move |title| {
            if let Some(platform) = platform.upgrade() {
                platform.set_title(title);
            }
        });

        let platform = Rc::downgrade(&self.shared.platform);
        self.shared.router.set_history_sink(move |url| {
            if let Some(platform) = platform.upgrade() {
                platform.push_url(url.as_str());
            }
        });

        let weak = self.downgrade();
        self.shared.router.on_error(move |err| {
            let Some(app) = Application::upgrade(&weak) else {
                return;
            };
            let view = app.state().on_error.clone();
            match view {
                Some(view) => view(&app, err),
                None => app.render_error(err),
            }
        });
    }

    pub fn platform(&self) -> Rc<dyn Platform> {
        self.shared.platform.clone()
    }

    pub fn router(&self) -> &Router {
        &self.shared.router
    }

    pub fn root(&self) -> Element {
        self.state().root.clone()
    }

    pub fn loader(&self) -> Loader {
        self.state().loader.clone()
    }

    // ========================================================================
    // Setup
    // ========================================================================

    pub fn set_navbar(&self, navbar: impl Into<Renderable>) -> &Self {
        let el = navbar.into().to_element(self.shared.platform.as_ref());
        self.state_mut().navbar = Some(el);
        self
    }

    pub fn set_footer(&self, footer: impl Into<Renderable>) -> &Self {
        let el = footer.into().to_element(self.shared.platform.as_ref());
        let loader = {
            let mut state = self.state_mut();
            state.footer = Some(el.clone());
            state.loader.clone()
        };
        loader.set_anchor(Some(el));
        self
    }

    pub fn set_loader(&self, loader: Loader) -> &Self {
        let footer = self.state().footer.clone();
        loader.set_anchor(footer);
        self.state_mut().loader = loader;
        self
    }

    /// Sets the `style` attribute of the mount node
    pub fn set_style(&self, style: &str) -> &Self {
        self.root().set_attribute("style", style);
        self
    }

    /// Sets the `class` attribute of the mount node
    pub fn set_classes(&self, classes: &str) -> &Self {
        self.root().set_attribute("class", classes);
        self
    }

    pub fn set_title(&self, title: &str) -> &Self {
        self.shared.platform.set_title(title);
        self
    }

    pub fn set_client_factory(&self, factory: impl Fn() -> reqwest::Client + 'static) -> &Self {
        self.state_mut().client_factory = Rc::new(factory);
        self
    }

    /// Replaces the default "404 - Page not found" view
    pub fn on_error(&self, view: impl Fn(&Application, &RouteError) + 'static) -> &Self {
        self.state_mut().on_error = Some(Rc::new(view));
        self
    }

    /// Runs once before the router starts
    pub fn before_load(&self, hook: impl Fn() + 'static) -> &Self {
        self.state_mut().before_load = Some(Rc::new(hook));
        self
    }

    /// Runs once after the router started
    pub fn on_load(&self, hook: impl Fn() + 'static) -> &Self {
        self.state_mut().on_load = Some(Rc::new(hook));
        self
    }

    /// Runs when the router finished its first navigation
    pub fn on_router_load(&self, hook: impl Fn() + 'static) -> &Self {
        self.shared.router.on_load(hook);
        self
    }

    /// Runs before every page renders
    pub fn on_page_change(&self, hook: impl Fn(&Application, &Vars, &Url) + 'static) -> &Self {
        let weak = self.downgrade();
        self.shared.router.on_page_change(move |vars, url| {
            if let Some(app) = Application::upgrade(&weak) {
                hook(&app, vars, url);
            }
        });
        self
    }

    /// Runs after every page rendered
    pub fn after_page_change(&self, hook: impl Fn(&Application, &Vars, &Url) + 'static) -> &Self {
        let weak = self.downgrade();
        self.shared.router.after_page_change(move |vars, url| {
            if let Some(app) = Application::upgrade(&weak) {
                hook(&app, vars, url);
            }
        });
        self
    }

    /// Registers a route whose handler receives the application
    pub fn register<F>(&self, name: &str, pattern: &str, handler: F) -> Result<(), AppError>
    where
        F: Fn(&Application, &Vars, &Url) -> Result<(), HandlerError> + 'static,
    {
        let weak = self.downgrade();
        self.shared
            .router
            .register(name, pattern, move |vars, url| match Application::upgrade(&weak) {
                Some(app) => handler(&app, vars, url),
                None => Ok(()),
            })?;
        Ok(())
    }

    // ========================================================================
    // Data
    // ========================================================================

    pub fn set_data(&self, key: impl Into<String>, value: Value) -> &Self {
        self.state_mut().data.insert(key.into(), value);
        self
    }

    pub fn data(&self, key: &str) -> Option<Value> {
        self.state().data.get(key).cloned()
    }

    /// Deserializes a data entry; `None` when missing or of another shape
    pub fn data_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        serde_json::from_value(self.data(key)?).ok()
    }

    pub fn remove_data(&self, key: &str) -> Option<Value> {
        self.state_mut().data.remove(key)
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Replaces the content of the mount node
    pub fn render<I, R>(&self, items: I) -> &Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Renderable>,
    {
        let root = self.root();
        root.set_inner_html("");
        for item in items {
            root.append(&item.into().to_element(self.shared.platform.as_ref()));
        }
        self.render_bases();
        self
    }

    pub fn render_html(&self, html: &str) -> &Self {
        self.root().set_inner_html(html);
        self.render_bases();
        self
    }

    pub fn render_text(&self, text: &str) -> &Self {
        self.root().set_text(text);
        self.render_bases();
        self
    }

    /// Adds content after the current one, keeping the footer last
    pub fn append_child<I, R>(&self, items: I) -> &Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Renderable>,
    {
        let (root, footer) = {
            let state = self.state();
            (state.root.clone(), state.footer.clone())
        };
        let footer = footer.filter(|f| f.parent().is_some_and(|p| p.ptr_eq(&root)));
        for item in items {
            let el = item.into().to_element(self.shared.platform.as_ref());
            match &footer {
                Some(footer) => root.insert_before(&el, footer),
                None => root.append(&el),
            };
        }
        self
    }

    fn render_bases(&self) {
        let (root, navbar, footer, loader) = {
            let state = self.state();
            (
                state.root.clone(),
                state.navbar.clone(),
                state.footer.clone(),
                state.loader.clone(),
            )
        };
        if let Some(navbar) = navbar {
            root.prepend(&navbar);
        }
        if let Some(footer) = footer {
            root.append(&footer);
        }
        if loader.is_visible() {
            loader.attach();
        }
    }

    fn render_error(&self, err: &RouteError) {
        let platform = self.shared.platform.as_ref();
        let heading = platform.create_element("h1");
        if err.is_not_found() {
            heading.set_text(NOT_FOUND_TEXT);
            self.render([heading]);
        } else {
            heading.set_text("500 - Something went wrong");
            let detail = platform.create_element("p");
            detail.set_text(&err.to_string());
            self.render([heading, detail]);
        }
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Navigates to `target` and records it in history
    ///
    /// Misses are shown by the error view as well as returned.
    pub fn redirect(&self, target: &str) -> Result<(), AppError> {
        self.shared.router.redirect(target)?;
        Ok(())
    }

    /// Follows a `router:` link; returns false for hrefs the browser owns
    pub fn follow_link(&self, href: &str) -> bool {
        match self.shared.router.handle_link(href) {
            Some(Err(err)) => {
                debug!(%href, error = %err, "link navigation failed");
                true
            }
            Some(Ok(())) => true,
            None => false,
        }
    }

    /// Routes clicks on every link of `registry` through [`Application::follow_link`]
    pub fn route_links(&self, registry: &UrlRegistry<Element>) {
        let weak = self.downgrade();
        registry.on_click(move |link: &Element| {
            let (Some(app), Some(href)) = (Application::upgrade(&weak), link.attribute("href"))
            else {
                return;
            };
            app.follow_link(&href);
        });
    }

    fn on_location_change(&self) {
        let location = self.shared.platform.location();
        if self.shared.router.current_url().as_ref() == Some(&location) {
            return;
        }
        debug!(%location, "location changed");
        // Misses are already reported to the error view
        let _ = self.shared.router.navigate(&location);
    }

    fn listen(&self) {
        for kind in [EventKind::PopState, EventKind::HashChange] {
            let weak = self.downgrade();
            self.shared.platform.listen(
                kind,
                Rc::new(move |_: &Event| {
                    if let Some(app) = Application::upgrade(&weak) {
                        app.on_location_change();
                    }
                }),
            );
        }
    }

    // ========================================================================
    // Background work
    // ========================================================================

    /// A client that shows the loader for the duration of each call
    pub fn client(&self) -> ApiClient {
        let (factory, loader) = {
            let state = self.state();
            (state.client_factory.clone(), state.loader.clone())
        };
        let after = loader.clone();
        ApiClient::new(factory())
            .before(move || loader.show())
            .after(move || after.finalize())
    }

    /// Runs `task` on the local executor with the loader shown
    pub fn load(&self, task: impl Future<Output = ()> + 'static) {
        let loader = self.loader();
        loader.show();
        self.shared.platform.spawn_local(Box::pin(async move {
            task.await;
            loader.finalize();
        }));
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Starts routing and waits for [`Application::exit`]
    ///
    /// Returns the exit code.
    pub async fn run(&self) -> Result<i32, AppError> {
        let (before_load, on_load, preloader_id) = {
            let mut state = self.state_mut();
            if state.running {
                return Err(AppError::AlreadyRunning);
            }
            state.running = true;
            (
                state.before_load.clone(),
                state.on_load.clone(),
                state.preloader_id.clone(),
            )
        };

        if let Some(hook) = before_load {
            hook();
        }
        self.listen();
        let location = self.shared.platform.location();
        if let Err(err) = self.shared.router.run(&location) {
            warn!(%location, error = %err, "initial navigation failed");
        }
        if let Some(hook) = on_load {
            hook();
        }
        if let Some(preloader) = self
            .shared
            .platform
            .query_selector(&format!("#{}", preloader_id))
        {
            preloader.remove();
        }

        info!(%location, "application running");
        self.shared.exit.wait().await;
        info!("application stopped");
        Ok(0)
    }

    /// Handle on the signal [`Application::exit`] fires
    pub fn exit_signal(&self) -> ExitSignal {
        self.shared.exit.clone()
    }

    /// Lets [`Application::run`] return; a second call fails with `AlreadySignalled`
    pub fn exit(&self) -> Result<(), AppError> {
        self.shared.exit.fire()
    }
}

impl fmt::Debug for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("Application")
            .field("root", &state.root)
            .field("routes", &self.shared.router.len())
            .field("running", &state.running)
            .finish()
    }
}
