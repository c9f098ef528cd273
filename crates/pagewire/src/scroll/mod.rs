//! Full-screen pages navigated by keys, wheel and hash links
//!
//! A [`ScrollApp`] lays its pages out as one snap-scrolling strip along an
//! [`Axis`]. The current page is tracked by a [`Navigator`]; every change
//! runs the same effect sequence: outgoing `on_hide`, document title,
//! `#hash` history entry, scroll, incoming `on_show`, then the global
//! page-change hook. Changes caused by a hash event skip the history entry.

mod navigator;
mod style;

pub use navigator::{Axis, EdgePolicy, Navigator, PageDirection, Transition};
pub use style::{Background, Gradient, DEFAULT_BACKGROUND};

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use pagewire_router::slug::slugify;
use tracing::{debug, info, warn};

use crate::client::{default_client_factory, ApiClient, ClientFactory};
use crate::component::{Component, Renderable};
use crate::config::{PagewireConfig, DEFAULT_PRELOADER_ID};
use crate::dom::{Element, Event, EventKind, Platform};
use crate::error::AppError;
use crate::exit::ExitSignal;
use crate::loader::Loader;

pub const DEFAULT_CLASS_PREFIX: &str = "pagewire-scrollable-app";
pub const DEFAULT_WHEEL_THRESHOLD: f64 = 10.0;
pub const DEFAULT_WHEEL_DEBOUNCE: Duration = Duration::from_millis(500);

/// Layout and input settings of a [`ScrollApp`]
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollOptions {
    pub axis: Axis,
    /// Prefix of every generated class name
    pub class_prefix: String,
    pub edge_policy: EdgePolicy,
    /// Smallest wheel delta that turns a page
    pub wheel_threshold: f64,
    /// Wheel events inside this window after a page turn are dropped
    pub wheel_debounce: Duration,
}

impl Default for ScrollOptions {
    fn default() -> Self {
        Self {
            axis: Axis::default(),
            class_prefix: DEFAULT_CLASS_PREFIX.to_string(),
            edge_policy: EdgePolicy::default(),
            wheel_threshold: DEFAULT_WHEEL_THRESHOLD,
            wheel_debounce: DEFAULT_WHEEL_DEBOUNCE,
        }
    }
}

impl ScrollOptions {
    fn class(&self, suffix: &str) -> String {
        format!("{}-{}", self.class_prefix, suffix)
    }
}

/// Called with the page's rendered content
pub type PageHook = Rc<dyn Fn(&Element, PageDirection)>;

/// One full-screen page
#[derive(Clone)]
pub struct Page {
    title: String,
    hash: String,
    component: Rc<dyn Component>,
    on_show: Option<PageHook>,
    on_hide: Option<PageHook>,
}

impl Page {
    /// The hash is the slug of `title`
    pub fn new(title: impl Into<String>, component: impl Component + 'static) -> Self {
        let title = title.into();
        Self {
            hash: slugify(&title),
            title,
            component: Rc::new(component),
            on_show: None,
            on_hide: None,
        }
    }

    pub fn on_show(mut self, hook: impl Fn(&Element, PageDirection) + 'static) -> Self {
        self.on_show = Some(Rc::new(hook));
        self
    }

    pub fn on_hide(mut self, hook: impl Fn(&Element, PageDirection) + 'static) -> Self {
        self.on_hide = Some(Rc::new(hook));
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("title", &self.title)
            .field("hash", &self.hash)
            .finish()
    }
}

/// Page nodes built by `run`
#[derive(Clone)]
struct Mounted {
    section: Element,
    content: Element,
}

struct ScrollState {
    root: Element,
    options: ScrollOptions,
    preloader_id: String,
    pages: Vec<Page>,
    mounted: Vec<Mounted>,
    navbar: Option<Renderable>,
    footer: Option<Renderable>,
    backgrounds: Vec<Background>,
    loader: Option<Loader>,
    client_factory: ClientFactory,
    on_page_change: Option<Rc<dyn Fn(usize)>>,
    navigator: Navigator,
    running: bool,
    wheel_locked: bool,
}

/// Scroll-snap page application
#[derive(Clone)]
pub struct ScrollApp {
    platform: Rc<dyn Platform>,
    inner: Rc<RefCell<ScrollState>>,
    exit: ExitSignal,
}

impl ScrollApp {
    /// Mounts on the node matching `selector`, or on `<body>` when it is empty
    pub fn new(
        platform: Rc<dyn Platform>,
        selector: &str,
        options: ScrollOptions,
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

        let navigator = Navigator::new(0, options.axis, options.edge_policy);
        Ok(Self {
            platform,
            inner: Rc::new(RefCell::new(ScrollState {
                root,
                options,
                preloader_id: DEFAULT_PRELOADER_ID.to_string(),
                pages: Vec::new(),
                mounted: Vec::new(),
                navbar: None,
                footer: None,
                backgrounds: Vec::new(),
                loader: None,
                client_factory: default_client_factory(),
                on_page_change: None,
                navigator,
                running: false,
                wheel_locked: false,
            })),
            exit: ExitSignal::new(),
        })
    }

    /// Builds from the `[app]` and `[scroll]` sections
    pub fn from_config(
        platform: Rc<dyn Platform>,
        config: &PagewireConfig,
    ) -> Result<Self, AppError> {
        let app = Self::new(platform, &config.app.root_selector, config.scroll_options())?;
        app.inner.borrow_mut().preloader_id = config.app.preloader_id.clone();
        if let Some(title) = &config.app.title {
            app.platform.set_title(title);
        }
        Ok(app)
    }

    pub fn options(&self) -> ScrollOptions {
        self.inner.borrow().options.clone()
    }

    pub fn root(&self) -> Element {
        self.inner.borrow().root.clone()
    }

    // ========================================================================
    // Setup
    // ========================================================================

    pub fn set_navbar(&self, navbar: impl Into<Renderable>) -> &Self {
        self.inner.borrow_mut().navbar = Some(navbar.into());
        self
    }

    pub fn set_footer(&self, footer: impl Into<Renderable>) -> &Self {
        self.inner.borrow_mut().footer = Some(footer.into());
        self
    }

    pub fn set_loader(&self, loader: Loader) -> &Self {
        self.inner.borrow_mut().loader = Some(loader);
        self
    }

    /// Adds backgrounds, cycled over the pages in order
    pub fn backgrounds(&self, backgrounds: impl IntoIterator<Item = Background>) -> &Self {
        self.inner.borrow_mut().backgrounds.extend(backgrounds);
        self
    }

    pub fn set_client_factory(&self, factory: impl Fn() -> reqwest::Client + 'static) -> &Self {
        self.inner.borrow_mut().client_factory = Rc::new(factory);
        self
    }

    /// Called with the new index after every page change
    pub fn on_page_change(&self, hook: impl Fn(usize) + 'static) -> &Self {
        self.inner.borrow_mut().on_page_change = Some(Rc::new(hook));
        self
    }

    /// Appends a page and returns its index
    ///
    /// Fails once the application runs or when the page's hash is taken.
    pub fn add_page(&self, page: Page) -> Result<usize, AppError> {
        let mut state = self.inner.borrow_mut();
        if state.running {
            return Err(AppError::PagesFrozen);
        }
        if state.pages.iter().any(|p| p.hash == page.hash) {
            return Err(AppError::DuplicatePage { hash: page.hash });
        }
        debug!(title = %page.title, hash = %page.hash, "added page");
        state.pages.push(page);
        Ok(state.pages.len() - 1)
    }

    /// A client that shows the loader for the duration of each call
    pub fn client(&self) -> ApiClient {
        let (factory, loader) = {
            let state = self.inner.borrow();
            (state.client_factory.clone(), state.loader.clone())
        };
        let client = ApiClient::new(factory());
        match loader {
            Some(loader) => {
                let after = loader.clone();
                client
                    .before(move || loader.show())
                    .after(move || after.finalize())
            }
            None => client,
        }
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    pub fn pages(&self) -> Vec<Page> {
        self.inner.borrow().pages.clone()
    }

    pub fn page_count(&self) -> usize {
        self.inner.borrow().pages.len()
    }

    pub fn current_index(&self) -> usize {
        self.inner.borrow().navigator.current()
    }

    pub fn current_page(&self) -> Option<Page> {
        let state = self.inner.borrow();
        state.pages.get(state.navigator.current()).cloned()
    }

    pub fn page_by_hash(&self, hash: &str) -> Option<(usize, Page)> {
        self.find_page(|page| page.hash == hash)
    }

    pub fn page_by_title(&self, title: &str) -> Option<(usize, Page)> {
        self.find_page(|page| page.title == title)
    }

    /// The section element of the page with this title, once running
    pub fn container_by_title(&self, title: &str) -> Option<Element> {
        let (index, _) = self.page_by_title(title)?;
        self.inner
            .borrow()
            .mounted
            .get(index)
            .map(|m| m.section.clone())
    }

    fn find_page(&self, predicate: impl Fn(&Page) -> bool) -> Option<(usize, Page)> {
        self.inner
            .borrow()
            .pages
            .iter()
            .enumerate()
            .find(|(_, page)| predicate(page))
            .map(|(index, page)| (index, page.clone()))
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    pub fn next_page(&self) {
        let transition = self.inner.borrow_mut().navigator.next();
        if let Some(transition) = transition {
            self.apply(transition, true);
        }
    }

    pub fn previous_page(&self) {
        let transition = self.inner.borrow_mut().navigator.previous();
        if let Some(transition) = transition {
            self.apply(transition, true);
        }
    }

    /// Shows the page with this hash, as a hash change would
    ///
    /// Accepts the hash with or without `#`, percent-encoded or not. Unknown
    /// hashes and the current page are ignored. Returns whether the page
    /// changed.
    pub fn go_to_hash(&self, hash: &str) -> bool {
        let hash = decode_hash(hash);
        let Some((index, _)) = self.page_by_hash(&hash) else {
            debug!(%hash, "no page for hash");
            return false;
        };
        let transition = self.inner.borrow_mut().navigator.jump(index);
        match transition {
            Some(transition) => {
                self.apply(transition, false);
                true
            }
            None => false,
        }
    }

    fn apply(&self, transition: Transition, push_history: bool) {
        let (pages, mounted, on_page_change) = {
            let state = self.inner.borrow();
            (
                state.pages.clone(),
                state.mounted.clone(),
                state.on_page_change.clone(),
            )
        };
        let (Some(from), Some(to)) = (pages.get(transition.from), pages.get(transition.to)) else {
            return;
        };
        let direction = transition.direction;
        debug!(from = %from.hash, to = %to.hash, ?direction, "page transition");

        if let (Some(hook), Some(m)) = (&from.on_hide, mounted.get(transition.from)) {
            hook(&m.content, direction);
        }
        self.platform.set_title(&to.title);
        if push_history {
            self.platform.push_url(&format!("#{}", to.hash));
        }
        if let Some(m) = mounted.get(transition.to) {
            m.section.scroll_into_view();
            if let Some(hook) = &to.on_show {
                hook(&m.content, direction);
            }
        }
        if let Some(hook) = on_page_change {
            hook(transition.to);
        }
    }

    // ========================================================================
    // Input
    // ========================================================================

    fn on_key(&self, key: &str) {
        let axis = self.inner.borrow().options.axis;
        match (axis, key) {
            (Axis::Y, "ArrowDown") | (Axis::X, "ArrowRight") => self.next_page(),
            (Axis::Y, "ArrowUp") | (Axis::X, "ArrowLeft") => self.previous_page(),
            _ => {}
        }
    }

    fn on_wheel(&self, delta_x: f64, delta_y: f64) {
        let (delta, threshold, debounce) = {
            let state = self.inner.borrow();
            if state.wheel_locked {
                debug!(delta_y, "wheel event dropped inside debounce window");
                return;
            }
            let delta = match state.options.axis {
                Axis::X if delta_x.abs() > delta_y.abs() => delta_x,
                _ => delta_y,
            };
            (
                delta,
                state.options.wheel_threshold,
                state.options.wheel_debounce,
            )
        };
        if delta.abs() <= threshold {
            return;
        }

        self.inner.borrow_mut().wheel_locked = true;
        let inner = Rc::downgrade(&self.inner);
        self.platform.set_timeout(
            debounce,
            Box::new(move || {
                if let Some(inner) = inner.upgrade() {
                    inner.borrow_mut().wheel_locked = false;
                }
            }),
        );

        if delta > 0.0 {
            self.next_page();
        } else {
            self.previous_page();
        }
    }

    fn on_hash_change(&self) {
        let hash = self.platform.location().fragment().unwrap_or("").to_string();
        self.go_to_hash(&hash);
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Builds the document, installs listeners and waits for [`ScrollApp::close`]
    ///
    /// Returns the exit code.
    pub async fn run(&self) -> Result<i32, AppError> {
        self.mount()?;
        info!(pages = self.page_count(), "scroll app running");
        self.exit.wait().await;
        info!("scroll app stopped");
        Ok(0)
    }

    pub fn exit_signal(&self) -> ExitSignal {
        self.exit.clone()
    }

    /// Fires the exit signal; a second call fails with `AlreadySignalled`
    pub fn close(&self) -> Result<(), AppError> {
        self.exit.fire()
    }

    fn mount(&self) -> Result<(), AppError> {
        let platform = self.platform.as_ref();
        let (root, options, pages, navbar, footer, backgrounds, preloader_id) = {
            let mut state = self.inner.borrow_mut();
            if state.running {
                return Err(AppError::AlreadyRunning);
            }
            state.running = true;
            state.navigator =
                Navigator::new(state.pages.len(), state.options.axis, state.options.edge_policy);
            (
                state.root.clone(),
                state.options.clone(),
                state.pages.clone(),
                state.navbar.clone(),
                state.footer.clone(),
                state.backgrounds.clone(),
                state.preloader_id.clone(),
            )
        };

        if let Some(navbar) = &navbar {
            let el = navbar.to_element(platform);
            el.add_class(&options.class("navbar"));
            root.append(&el);
        }

        let hashes: Vec<String> = pages.iter().map(|p| p.hash.clone()).collect();
        let css = style::stylesheet(
            &options,
            &style::Layout {
                page_hashes: &hashes,
                backgrounds: &backgrounds,
                navbar: navbar.is_some(),
                footer: footer.is_some(),
            },
        );
        platform.inject_style(&options.class("style"), &css);

        let container = platform.create_element("section");
        container.add_class(&options.class("scrollable-page-container"));
        let strip = platform.create_element("section");
        strip.add_class(&options.class("scrollable-page"));
        let mut mounted = Vec::with_capacity(pages.len());
        for page in &pages {
            let section = platform.create_element("section");
            section
                .set_attribute("id", &page.hash)
                .add_class(&options.class("page"));
            let content = page.component.render(platform);
            content.add_class(&options.class("page-content"));
            section.append(&content);
            strip.append(&section);
            mounted.push(Mounted { section, content });
        }
        container.append(&strip);
        root.append(&container);

        if let Some(footer) = &footer {
            let el = footer.to_element(platform);
            el.add_class(&options.class("footer"));
            root.append(&el);
        }
        self.inner.borrow_mut().mounted = mounted;

        self.listen();

        if let Some(preloader) = platform.query_selector(&format!("#{}", preloader_id)) {
            preloader.remove();
        }

        self.show_initial();
        Ok(())
    }

    fn downgrade(&self) -> WeakScrollApp {
        WeakScrollApp {
            platform: Rc::downgrade(&self.platform),
            inner: Rc::downgrade(&self.inner),
            exit: self.exit.clone(),
        }
    }

    /// Listeners do nothing once the app is closed or dropped
    fn listen(&self) {
        let weak = self.downgrade();
        self.platform.listen(
            EventKind::KeyDown,
            Rc::new(move |event: &Event| {
                if let (Some(app), Event::KeyDown { key }) = (weak.upgrade(), event) {
                    app.on_key(key);
                }
            }),
        );

        let weak = self.downgrade();
        self.platform.listen(
            EventKind::Wheel,
            Rc::new(move |event: &Event| {
                if let (Some(app), Event::Wheel { delta_x, delta_y }) = (weak.upgrade(), event) {
                    app.on_wheel(*delta_x, *delta_y);
                }
            }),
        );

        let weak = self.downgrade();
        self.platform.listen(
            EventKind::HashChange,
            Rc::new(move |_: &Event| {
                if let Some(app) = weak.upgrade() {
                    app.on_hash_change();
                }
            }),
        );
    }

    fn show_initial(&self) {
        let hash = decode_hash(self.platform.location().fragment().unwrap_or(""));
        let from_hash = if hash.is_empty() {
            None
        } else {
            let found = self.page_by_hash(&hash).map(|(index, _)| index);
            if found.is_none() {
                warn!(%hash, "initial hash names no page");
            }
            found
        };

        let index = from_hash.unwrap_or(0);
        let (page, mounted) = {
            let mut state = self.inner.borrow_mut();
            state.navigator.reset(index);
            (state.pages.get(index).cloned(), state.mounted.get(index).cloned())
        };
        let (Some(page), Some(mounted)) = (page, mounted) else {
            return;
        };
        if from_hash.is_some() {
            mounted.section.scroll_into_view();
        }
        if let Some(hook) = &page.on_show {
            hook(&mounted.content, PageDirection::Initial);
        }
    }
}

/// Handle held by document listeners
struct WeakScrollApp {
    platform: Weak<dyn Platform>,
    inner: Weak<RefCell<ScrollState>>,
    exit: ExitSignal,
}

impl WeakScrollApp {
    /// `None` once the app is dropped or closed
    fn upgrade(&self) -> Option<ScrollApp> {
        if self.exit.is_fired() {
            return None;
        }
        Some(ScrollApp {
            platform: self.platform.upgrade()?,
            inner: self.inner.upgrade()?,
            exit: self.exit.clone(),
        })
    }
}

fn decode_hash(hash: &str) -> String {
    let hash = hash.trim_start_matches('#');
    urlencoding::decode(hash)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| hash.to_string())
}
