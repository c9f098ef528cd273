//! `DomNode` over live `web_sys` nodes

use std::any::Any;
use std::rc::Rc;

use pagewire::dom::{DomNode, Element, Event, EventKind, Listener};
use pagewire::router::ROUTE_PREFIX;
use tracing::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

/// A document node handled through `web_sys`
pub struct BrowserNode {
    node: web_sys::Node,
}

impl BrowserNode {
    pub fn wrap(node: impl Into<web_sys::Node>) -> Element {
        Element::new(Rc::new(Self { node: node.into() }))
    }

    pub fn node(&self) -> &web_sys::Node {
        &self.node
    }

    fn element(&self) -> Option<&web_sys::Element> {
        self.node.dyn_ref::<web_sys::Element>()
    }

    fn html_element(&self) -> Option<&web_sys::HtmlElement> {
        self.node.dyn_ref::<web_sys::HtmlElement>()
    }
}

/// The `web_sys::Node` behind a handle created by the browser platform
pub fn web_node(el: &Element) -> Option<&web_sys::Node> {
    el.downcast_ref::<BrowserNode>().map(BrowserNode::node)
}

pub(crate) fn event_name(kind: EventKind) -> &'static str {
    match kind {
        EventKind::Click => "click",
        EventKind::KeyDown => "keydown",
        EventKind::Wheel => "wheel",
        EventKind::HashChange => "hashchange",
        EventKind::PopState => "popstate",
    }
}

pub(crate) fn convert_event(kind: EventKind, event: &web_sys::Event) -> Event {
    match kind {
        EventKind::Click => Event::Click,
        EventKind::KeyDown => Event::KeyDown {
            key: event
                .dyn_ref::<web_sys::KeyboardEvent>()
                .map(|e| e.key())
                .unwrap_or_default(),
        },
        EventKind::Wheel => match event.dyn_ref::<web_sys::WheelEvent>() {
            Some(wheel) => Event::Wheel {
                delta_x: wheel.delta_x(),
                delta_y: wheel.delta_y(),
            },
            None => Event::wheel(0.0),
        },
        EventKind::HashChange => Event::HashChange,
        EventKind::PopState => Event::PopState,
    }
}

/// Registers `listener` on `target`; the closure lives as long as the page
pub(crate) fn add_listener(
    target: &web_sys::EventTarget,
    kind: EventKind,
    listener: Listener,
    prevent_router_links: bool,
) {
    let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
        if prevent_router_links && is_router_link(&event) {
            event.prevent_default();
        }
        listener(&convert_event(kind, &event));
    });
    if let Err(err) =
        target.add_event_listener_with_callback(event_name(kind), closure.as_ref().unchecked_ref())
    {
        warn!(event = event_name(kind), error = ?err, "failed to add event listener");
    }
    closure.forget();
}

fn is_router_link(event: &web_sys::Event) -> bool {
    event
        .current_target()
        .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
        .and_then(|el| el.get_attribute("href"))
        .is_some_and(|href| href.starts_with(ROUTE_PREFIX))
}

fn log_js_error(op: &str, result: Result<(), JsValue>) {
    if let Err(err) = result {
        warn!(op, error = ?err, "dom operation failed");
    }
}

impl DomNode for BrowserNode {
    fn tag_name(&self) -> String {
        self.element()
            .map(|el| el.tag_name().to_ascii_lowercase())
            .unwrap_or_default()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.element()?.get_attribute(name)
    }

    fn set_attribute(&self, name: &str, value: &str) {
        if let Some(el) = self.element() {
            log_js_error("set_attribute", el.set_attribute(name, value));
        }
    }

    fn remove_attribute(&self, name: &str) {
        if let Some(el) = self.element() {
            log_js_error("remove_attribute", el.remove_attribute(name));
        }
    }

    fn text_content(&self) -> String {
        self.node.text_content().unwrap_or_default()
    }

    fn set_text_content(&self, text: &str) {
        self.node.set_text_content(Some(text));
    }

    fn inner_html(&self) -> String {
        self.element().map(|el| el.inner_html()).unwrap_or_default()
    }

    fn set_inner_html(&self, html: &str) {
        match self.element() {
            Some(el) => el.set_inner_html(html),
            None => self.node.set_text_content(Some(html)),
        }
    }

    fn append_child(&self, child: &Element) {
        if let Some(child) = web_node(child) {
            log_js_error("append_child", self.node.append_child(child).map(|_| ()));
        }
    }

    fn prepend_child(&self, child: &Element) {
        let Some(child) = web_node(child) else { return };
        let first = self.node.first_child();
        log_js_error(
            "prepend_child",
            self.node.insert_before(child, first.as_ref()).map(|_| ()),
        );
    }

    fn insert_before(&self, child: &Element, reference: &Element) {
        let Some(child) = web_node(child) else { return };
        let reference = web_node(reference)
            .filter(|r| r.parent_node().is_some_and(|p| p.is_same_node(Some(&self.node))));
        log_js_error(
            "insert_before",
            self.node.insert_before(child, reference).map(|_| ()),
        );
    }

    fn remove(&self) {
        if let Some(parent) = self.node.parent_node() {
            log_js_error("remove", parent.remove_child(&self.node).map(|_| ()));
        }
    }

    fn children(&self) -> Vec<Element> {
        let nodes = self.node.child_nodes();
        (0..nodes.length())
            .filter_map(|i| nodes.get(i))
            .filter(|n| {
                n.node_type() == web_sys::Node::ELEMENT_NODE
                    || n.node_type() == web_sys::Node::TEXT_NODE
            })
            .map(BrowserNode::wrap)
            .collect()
    }

    fn parent(&self) -> Option<Element> {
        self.node.parent_node().map(BrowserNode::wrap)
    }

    fn add_class(&self, class: &str) {
        if let Some(el) = self.element() {
            log_js_error("add_class", el.class_list().add_1(class));
        }
    }

    fn has_class(&self, class: &str) -> bool {
        self.element()
            .is_some_and(|el| el.class_list().contains(class))
    }

    fn style_property(&self, name: &str) -> Option<String> {
        self.html_element()?
            .style()
            .get_property_value(name)
            .ok()
            .filter(|v| !v.is_empty())
    }

    fn set_style_property(&self, name: &str, value: &str) {
        if let Some(el) = self.html_element() {
            log_js_error("set_style_property", el.style().set_property(name, value));
        }
    }

    fn scroll_into_view(&self) {
        if let Some(el) = self.element() {
            el.scroll_into_view();
        }
    }

    fn add_event_listener(&self, kind: EventKind, listener: Listener) {
        add_listener(&self.node, kind, listener, kind == EventKind::Click);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
