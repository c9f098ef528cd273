//! The document seam
//!
//! Everything pagewire does to a page goes through [`Element`] handles and
//! a [`Platform`]. The browser crate backs them with `web-sys`; the
//! [`memory`] module backs them with an in-process tree, timers driven by
//! the caller and a local executor.

pub mod memory;

use std::any::Any;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use futures::future::LocalBoxFuture;
use pagewire_router::LinkElement;
use url::Url;

pub use memory::{MemoryNode, MemoryPlatform};

/// Document-level events the application listens for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    KeyDown,
    Wheel,
    HashChange,
    PopState,
}

/// A dispatched event, reduced to the fields pagewire reads
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Click,
    KeyDown { key: String },
    Wheel { delta_x: f64, delta_y: f64 },
    HashChange,
    PopState,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Click => EventKind::Click,
            Event::KeyDown { .. } => EventKind::KeyDown,
            Event::Wheel { .. } => EventKind::Wheel,
            Event::HashChange => EventKind::HashChange,
            Event::PopState => EventKind::PopState,
        }
    }

    pub fn key(key: impl Into<String>) -> Self {
        Event::KeyDown { key: key.into() }
    }

    pub fn wheel(delta_y: f64) -> Self {
        Event::Wheel {
            delta_x: 0.0,
            delta_y,
        }
    }
}

/// Callback registered for events
pub type Listener = Rc<dyn Fn(&Event)>;

/// One node of a document tree
///
/// Implementations share state behind the handle, so every method takes
/// `&self`. Nodes passed as arguments are always created by the same
/// platform.
pub trait DomNode {
    /// Lowercase tag name, empty for text nodes
    fn tag_name(&self) -> String;

    fn attribute(&self, name: &str) -> Option<String>;
    fn set_attribute(&self, name: &str, value: &str);
    fn remove_attribute(&self, name: &str);

    fn text_content(&self) -> String;
    fn set_text_content(&self, text: &str);
    fn inner_html(&self) -> String;
    fn set_inner_html(&self, html: &str);

    /// Appends `child`, moving it out of any previous parent
    fn append_child(&self, child: &Element);
    fn prepend_child(&self, child: &Element);
    /// Inserts `child` before `reference`; appends when `reference` is not a child
    fn insert_before(&self, child: &Element, reference: &Element);
    /// Detaches this node from its parent
    fn remove(&self);
    fn children(&self) -> Vec<Element>;
    fn parent(&self) -> Option<Element>;

    fn add_class(&self, class: &str);
    fn has_class(&self, class: &str) -> bool;
    fn style_property(&self, name: &str) -> Option<String>;
    fn set_style_property(&self, name: &str, value: &str);

    fn scroll_into_view(&self);
    fn add_event_listener(&self, kind: EventKind, listener: Listener);

    fn as_any(&self) -> &dyn Any;
}

/// Cheap, clonable handle to a document node
#[derive(Clone)]
pub struct Element(Rc<dyn DomNode>);

impl Element {
    pub fn new(node: Rc<dyn DomNode>) -> Self {
        Self(node)
    }

    pub fn node(&self) -> &dyn DomNode {
        self.0.as_ref()
    }

    /// Borrow the concrete node type behind this handle
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    /// Whether both handles point at the same node
    pub fn ptr_eq(&self, other: &Element) -> bool {
        std::ptr::eq(
            Rc::as_ptr(&self.0) as *const (),
            Rc::as_ptr(&other.0) as *const (),
        )
    }

    pub fn tag_name(&self) -> String {
        self.0.tag_name()
    }

    pub fn id(&self) -> Option<String> {
        self.attribute("id")
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.0.attribute(name)
    }

    pub fn set_attribute(&self, name: &str, value: &str) -> &Self {
        self.0.set_attribute(name, value);
        self
    }

    pub fn remove_attribute(&self, name: &str) -> &Self {
        self.0.remove_attribute(name);
        self
    }

    pub fn text(&self) -> String {
        self.0.text_content()
    }

    pub fn set_text(&self, text: &str) -> &Self {
        self.0.set_text_content(text);
        self
    }

    pub fn inner_html(&self) -> String {
        self.0.inner_html()
    }

    pub fn set_inner_html(&self, html: &str) -> &Self {
        self.0.set_inner_html(html);
        self
    }

    pub fn append(&self, child: &Element) -> &Self {
        self.0.append_child(child);
        self
    }

    pub fn prepend(&self, child: &Element) -> &Self {
        self.0.prepend_child(child);
        self
    }

    pub fn insert_before(&self, child: &Element, reference: &Element) -> &Self {
        self.0.insert_before(child, reference);
        self
    }

    pub fn remove(&self) {
        self.0.remove();
    }

    pub fn children(&self) -> Vec<Element> {
        self.0.children()
    }

    pub fn first_child(&self) -> Option<Element> {
        self.children().into_iter().next()
    }

    pub fn last_child(&self) -> Option<Element> {
        self.children().pop()
    }

    pub fn parent(&self) -> Option<Element> {
        self.0.parent()
    }

    pub fn add_class(&self, class: &str) -> &Self {
        self.0.add_class(class);
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.0.has_class(class)
    }

    pub fn style(&self, name: &str) -> Option<String> {
        self.0.style_property(name)
    }

    pub fn set_style(&self, name: &str, value: &str) -> &Self {
        self.0.set_style_property(name, value);
        self
    }

    pub fn scroll_into_view(&self) {
        self.0.scroll_into_view();
    }

    pub fn on(&self, kind: EventKind, listener: impl Fn(&Event) + 'static) -> &Self {
        self.0.add_event_listener(kind, Rc::new(listener));
        self
    }

    /// Depth-first search below this node
    pub fn find(&self, predicate: &dyn Fn(&Element) -> bool) -> Option<Element> {
        self.children().into_iter().find_map(|child| {
            if predicate(&child) {
                Some(child)
            } else {
                child.find(predicate)
            }
        })
    }

    /// Every descendant matching `predicate`, in document order
    pub fn find_all(&self, predicate: &dyn Fn(&Element) -> bool) -> Vec<Element> {
        let mut found = Vec::new();
        for child in self.children() {
            if predicate(&child) {
                found.push(child.clone());
            }
            found.extend(child.find_all(predicate));
        }
        found
    }

    /// Descendant with the given id attribute
    pub fn find_by_id(&self, id: &str) -> Option<Element> {
        self.find(&|el| el.id().as_deref() == Some(id))
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("tag", &self.tag_name())
            .field("id", &self.id())
            .finish()
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl LinkElement for Element {
    fn attribute(&self, name: &str) -> Option<String> {
        Element::attribute(self, name)
    }

    fn set_attribute(&self, name: &str, value: &str) {
        Element::set_attribute(self, name, value);
    }

    fn text(&self) -> String {
        Element::text(self)
    }

    fn set_text(&self, text: &str) {
        Element::set_text(self, text);
    }

    fn set_style_property(&self, name: &str, value: &str) {
        self.set_style(name, value);
    }

    fn remove(&self) {
        Element::remove(self);
    }

    fn add_click_listener(&self, callback: Box<dyn Fn()>) {
        self.on(EventKind::Click, move |_| callback());
    }
}

/// Everything outside the document tree: history, timers, tasks and
/// document-level events
pub trait Platform {
    fn create_element(&self, tag: &str) -> Element;
    fn create_text(&self, text: &str) -> Element;
    fn body(&self) -> Element;

    /// Supports `#id`, `.class` and bare tag selectors
    fn query_selector(&self, selector: &str) -> Option<Element>;

    fn title(&self) -> String;
    fn set_title(&self, title: &str);

    /// The current absolute location
    fn location(&self) -> Url;
    /// Pushes a history entry without reloading; `target` is joined onto the
    /// current location
    fn push_url(&self, target: &str);

    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>);
    fn spawn_local(&self, future: LocalBoxFuture<'static, ()>);

    /// Installs or replaces the `<style>` block with this id
    fn inject_style(&self, id: &str, css: &str);
    fn listen(&self, kind: EventKind, listener: Listener);
}

/// Builds an element with a tag, id and text in one go
pub fn element(platform: &dyn Platform, tag: &str, id: Option<&str>, text: &str) -> Element {
    let el = platform.create_element(tag);
    if let Some(id) = id {
        el.set_attribute("id", id);
    }
    if !text.is_empty() {
        el.set_text(text);
    }
    el
}

/// Matches one simple selector against an element
pub(crate) fn matches_selector(el: &Element, selector: &str) -> bool {
    if let Some(id) = selector.strip_prefix('#') {
        el.id().as_deref() == Some(id)
    } else if let Some(class) = selector.strip_prefix('.') {
        el.has_class(class)
    } else {
        !selector.is_empty() && el.tag_name().eq_ignore_ascii_case(selector)
    }
}
