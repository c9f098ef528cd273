//! `Platform` over the browser window

use std::rc::Rc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use futures::future::LocalBoxFuture;
use pagewire::dom::{Element, EventKind, Listener, Platform};
use tracing::{debug, warn};
use url::Url;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

use crate::node::{add_listener, BrowserNode};

/// The live browser document
pub struct BrowserPlatform {
    window: web_sys::Window,
    document: web_sys::Document,
    body: Element,
    /// Location at startup, used when the current href cannot be read
    fallback_location: Url,
}

impl BrowserPlatform {
    pub fn new() -> Result<Rc<Self>> {
        let window = web_sys::window().context("no global window")?;
        let document = window.document().context("window has no document")?;
        let body = document.body().context("document has no body")?;
        let href = window
            .location()
            .href()
            .map_err(|err| anyhow!("cannot read location: {:?}", err))?;
        let fallback_location =
            Url::parse(&href).with_context(|| format!("invalid location {:?}", href))?;

        Ok(Rc::new(Self {
            window,
            document,
            body: BrowserNode::wrap(body),
            fallback_location,
        }))
    }

    pub fn window(&self) -> &web_sys::Window {
        &self.window
    }

    pub fn document(&self) -> &web_sys::Document {
        &self.document
    }

    fn head(&self) -> Option<web_sys::HtmlHeadElement> {
        self.document.head()
    }
}

impl Platform for BrowserPlatform {
    fn create_element(&self, tag: &str) -> Element {
        match self.document.create_element(tag) {
            Ok(el) => BrowserNode::wrap(el),
            Err(err) => {
                warn!(%tag, error = ?err, "cannot create element");
                self.create_text("")
            }
        }
    }

    fn create_text(&self, text: &str) -> Element {
        BrowserNode::wrap(self.document.create_text_node(text))
    }

    fn body(&self) -> Element {
        self.body.clone()
    }

    fn query_selector(&self, selector: &str) -> Option<Element> {
        self.document
            .query_selector(selector)
            .ok()
            .flatten()
            .map(BrowserNode::wrap)
    }

    fn title(&self) -> String {
        self.document.title()
    }

    fn set_title(&self, title: &str) {
        self.document.set_title(title);
    }

    fn location(&self) -> Url {
        self.window
            .location()
            .href()
            .ok()
            .and_then(|href| Url::parse(&href).ok())
            .unwrap_or_else(|| self.fallback_location.clone())
    }

    fn push_url(&self, target: &str) {
        let pushed = self
            .window
            .history()
            .and_then(|history| history.push_state_with_url(&JsValue::NULL, "", Some(target)));
        match pushed {
            Ok(()) => debug!(%target, "push history"),
            Err(err) => warn!(%target, error = ?err, "cannot push history"),
        }
    }

    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) {
        let callback = Closure::once_into_js(callback);
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        if let Err(err) = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref::<js_sys::Function>(),
                millis,
            )
        {
            warn!(error = ?err, "cannot schedule timeout");
        }
    }

    fn spawn_local(&self, future: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(future);
    }

    fn inject_style(&self, id: &str, css: &str) {
        if let Some(existing) = self.document.get_element_by_id(id) {
            existing.set_text_content(Some(css));
            return;
        }
        let Some(head) = self.head() else {
            warn!(%id, "document has no head for style block");
            return;
        };
        let style = self.create_element("style");
        style.set_attribute("id", id).set_text(css);
        BrowserNode::wrap(head).append(&style);
    }

    fn listen(&self, kind: EventKind, listener: Listener) {
        match kind {
            EventKind::HashChange | EventKind::PopState => {
                add_listener(&self.window, kind, listener, false)
            }
            EventKind::Click | EventKind::KeyDown | EventKind::Wheel => {
                add_listener(&self.document, kind, listener, false)
            }
        }
    }
}
