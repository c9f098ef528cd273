//! In-process document and platform
//!
//! `MemoryPlatform` is deterministic: time only moves when the caller calls
//! [`MemoryPlatform::advance`], spawned tasks only run inside
//! [`MemoryPlatform::run_until_stalled`] or `advance`, and events are
//! delivered by [`MemoryPlatform::dispatch`].

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};
use std::time::Duration;

use futures::executor::{LocalPool, LocalSpawner};
use futures::future::LocalBoxFuture;
use futures::task::LocalSpawnExt;
use tracing::{debug, warn};
use url::Url;

use super::{matches_selector, DomNode, Element, Event, EventKind, Listener, Platform};

#[derive(Debug, Clone, PartialEq, Eq)]
enum NodeKind {
    Element(String),
    Text,
    /// Markup assigned through `set_inner_html`, kept verbatim
    Html,
}

struct NodeData {
    kind: NodeKind,
    attributes: BTreeMap<String, String>,
    styles: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
    listeners: Vec<(EventKind, Listener)>,
    scrolled_into_view: usize,
}

/// Node of the in-memory document
pub struct MemoryNode {
    data: RefCell<NodeData>,
    parent: RefCell<Weak<MemoryNode>>,
    this: Weak<MemoryNode>,
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn strip_tags(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }
    text
}

fn memory_node(el: &Element) -> Option<&MemoryNode> {
    el.downcast_ref::<MemoryNode>()
}

impl MemoryNode {
    fn create(kind: NodeKind, text: &str) -> Rc<MemoryNode> {
        Rc::new_cyclic(|this| MemoryNode {
            data: RefCell::new(NodeData {
                kind,
                attributes: BTreeMap::new(),
                styles: Vec::new(),
                text: text.to_string(),
                children: Vec::new(),
                listeners: Vec::new(),
                scrolled_into_view: 0,
            }),
            parent: RefCell::new(Weak::new()),
            this: this.clone(),
        })
    }

    pub fn element(tag: &str) -> Element {
        Element::new(Self::create(NodeKind::Element(tag.to_ascii_lowercase()), ""))
    }

    pub fn text(text: &str) -> Element {
        Element::new(Self::create(NodeKind::Text, text))
    }

    fn html(html: &str) -> Element {
        Element::new(Self::create(NodeKind::Html, html))
    }

    /// How often `scroll_into_view` was called on this node
    pub fn scroll_count(&self) -> usize {
        self.data.borrow().scrolled_into_view
    }

    /// Delivers `event` to this node's listeners
    pub fn dispatch(&self, event: &Event) {
        let listeners: Vec<Listener> = self
            .data
            .borrow()
            .listeners
            .iter()
            .filter(|(kind, _)| *kind == event.kind())
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(event);
        }
    }

    /// Serialized markup of this node including itself
    pub fn outer_html(&self) -> String {
        let data = self.data.borrow();
        match &data.kind {
            NodeKind::Text => escape(&data.text),
            NodeKind::Html => data.text.clone(),
            NodeKind::Element(tag) => {
                let mut html = format!("<{}", tag);
                for (name, value) in self.rendered_attributes(&data) {
                    html.push_str(&format!(" {}=\"{}\"", name, escape(&value)));
                }
                html.push('>');
                for child in &data.children {
                    html.push_str(&outer_html(child));
                }
                html.push_str(&format!("</{}>", tag));
                html
            }
        }
    }

    fn rendered_attributes(&self, data: &NodeData) -> Vec<(String, String)> {
        let mut attributes: Vec<(String, String)> = data
            .attributes
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        if !data.styles.is_empty() {
            attributes.push(("style".to_string(), render_styles(&data.styles)));
            attributes.sort();
        }
        attributes
    }

    fn is(&self, el: &Element) -> bool {
        memory_node(el).is_some_and(|node| std::ptr::eq(node, self))
    }

    fn detach(&self) {
        let parent = self.parent.replace(Weak::new());
        if let Some(parent) = parent.upgrade() {
            parent.data.borrow_mut().children.retain(|c| !self.is(c));
        }
    }

    fn adopt(&self, child: &Element) {
        match memory_node(child) {
            Some(node) => {
                node.detach();
                *node.parent.borrow_mut() = self.this.clone();
            }
            None => warn!("appending a node from another platform"),
        }
    }

    fn clear_children(&self) {
        let children = std::mem::take(&mut self.data.borrow_mut().children);
        for child in children {
            if let Some(node) = memory_node(&child) {
                *node.parent.borrow_mut() = Weak::new();
            }
        }
    }
}

fn outer_html(el: &Element) -> String {
    memory_node(el).map(MemoryNode::outer_html).unwrap_or_default()
}

fn render_styles(styles: &[(String, String)]) -> String {
    styles
        .iter()
        .map(|(k, v)| format!("{}: {};", k, v))
        .collect::<Vec<_>>()
        .join(" ")
}

fn parse_styles(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| decl.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .filter(|(k, _)| !k.is_empty())
        .collect()
}

impl DomNode for MemoryNode {
    fn tag_name(&self) -> String {
        match &self.data.borrow().kind {
            NodeKind::Element(tag) => tag.clone(),
            NodeKind::Text | NodeKind::Html => String::new(),
        }
    }

    fn attribute(&self, name: &str) -> Option<String> {
        let data = self.data.borrow();
        if name == "style" && !data.styles.is_empty() {
            return Some(render_styles(&data.styles));
        }
        data.attributes.get(name).cloned()
    }

    fn set_attribute(&self, name: &str, value: &str) {
        let mut data = self.data.borrow_mut();
        if name == "style" {
            data.styles = parse_styles(value);
        } else {
            data.attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn remove_attribute(&self, name: &str) {
        let mut data = self.data.borrow_mut();
        if name == "style" {
            data.styles.clear();
        }
        data.attributes.remove(name);
    }

    fn text_content(&self) -> String {
        let data = self.data.borrow();
        match data.kind {
            NodeKind::Text => data.text.clone(),
            NodeKind::Html => strip_tags(&data.text),
            NodeKind::Element(_) => data.children.iter().map(Element::text).collect(),
        }
    }

    fn set_text_content(&self, text: &str) {
        let is_element = matches!(self.data.borrow().kind, NodeKind::Element(_));
        if !is_element {
            self.data.borrow_mut().text = text.to_string();
            return;
        }
        self.clear_children();
        if !text.is_empty() {
            self.append_child(&MemoryNode::text(text));
        }
    }

    fn inner_html(&self) -> String {
        let data = self.data.borrow();
        match data.kind {
            NodeKind::Text => escape(&data.text),
            NodeKind::Html => data.text.clone(),
            NodeKind::Element(_) => data.children.iter().map(outer_html).collect(),
        }
    }

    fn set_inner_html(&self, html: &str) {
        self.clear_children();
        if !html.is_empty() {
            self.append_child(&MemoryNode::html(html));
        }
    }

    fn append_child(&self, child: &Element) {
        self.adopt(child);
        self.data.borrow_mut().children.push(child.clone());
    }

    fn prepend_child(&self, child: &Element) {
        self.adopt(child);
        self.data.borrow_mut().children.insert(0, child.clone());
    }

    fn insert_before(&self, child: &Element, reference: &Element) {
        self.adopt(child);
        let mut data = self.data.borrow_mut();
        match data.children.iter().position(|c| c.ptr_eq(reference)) {
            Some(index) => data.children.insert(index, child.clone()),
            None => data.children.push(child.clone()),
        }
    }

    fn remove(&self) {
        self.detach();
    }

    fn children(&self) -> Vec<Element> {
        self.data.borrow().children.clone()
    }

    fn parent(&self) -> Option<Element> {
        let parent = self.parent.borrow().upgrade()?;
        Some(Element::new(parent))
    }

    fn add_class(&self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let mut data = self.data.borrow_mut();
        let classes = data.attributes.entry("class".to_string()).or_default();
        if !classes.is_empty() {
            classes.push(' ');
        }
        classes.push_str(class);
    }

    fn has_class(&self, class: &str) -> bool {
        self.data
            .borrow()
            .attributes
            .get("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    fn style_property(&self, name: &str) -> Option<String> {
        self.data
            .borrow()
            .styles
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    }

    fn set_style_property(&self, name: &str, value: &str) {
        let mut data = self.data.borrow_mut();
        match data.styles.iter_mut().find(|(k, _)| k == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => data.styles.push((name.to_string(), value.to_string())),
        }
    }

    fn scroll_into_view(&self) {
        self.data.borrow_mut().scrolled_into_view += 1;
    }

    fn add_event_listener(&self, kind: EventKind, listener: Listener) {
        self.data.borrow_mut().listeners.push((kind, listener));
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct Timer {
    due: Duration,
    seq: u64,
    callback: Box<dyn FnOnce()>,
}

/// Deterministic platform backed by an in-memory document
pub struct MemoryPlatform {
    document: Element,
    head: Element,
    body: Element,
    title: RefCell<String>,
    location: RefCell<Url>,
    history: RefCell<Vec<Url>>,
    now: Cell<Duration>,
    next_seq: Cell<u64>,
    timers: RefCell<Vec<Timer>>,
    pool: RefCell<LocalPool>,
    spawner: LocalSpawner,
    listeners: RefCell<Vec<(EventKind, Listener)>>,
}

impl MemoryPlatform {
    /// Creates an empty `<html><head/><body/></html>` document at `location`
    pub fn new(location: Url) -> Rc<Self> {
        let document = MemoryNode::element("html");
        let head = MemoryNode::element("head");
        let body = MemoryNode::element("body");
        document.append(&head).append(&body);

        let pool = LocalPool::new();
        let spawner = pool.spawner();
        Rc::new(Self {
            document,
            head,
            body,
            title: RefCell::new(String::new()),
            location: RefCell::new(location.clone()),
            history: RefCell::new(vec![location]),
            now: Cell::new(Duration::ZERO),
            next_seq: Cell::new(0),
            timers: RefCell::new(Vec::new()),
            pool: RefCell::new(pool),
            spawner,
            listeners: RefCell::new(Vec::new()),
        })
    }

    pub fn document(&self) -> Element {
        self.document.clone()
    }

    pub fn head(&self) -> Element {
        self.head.clone()
    }

    /// Every location visited, oldest first, starting with the initial one
    pub fn history(&self) -> Vec<Url> {
        self.history.borrow().clone()
    }

    pub fn now(&self) -> Duration {
        self.now.get()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    /// Text of the `<style>` block with this id
    pub fn style_block(&self, id: &str) -> Option<String> {
        self.head.find_by_id(id).map(|el| el.text())
    }

    /// Runs spawned tasks until none can make progress
    pub fn run_until_stalled(&self) {
        // Nested calls come from inside a running task; the outer run drains the pool
        if let Ok(mut pool) = self.pool.try_borrow_mut() {
            pool.run_until_stalled();
        }
    }

    /// Moves the clock forward, firing due timers in order
    pub fn advance(&self, by: Duration) {
        let target = self.now.get() + by;
        loop {
            let next = {
                let mut timers = self.timers.borrow_mut();
                let due = timers
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= target)
                    .min_by_key(|(_, t)| (t.due, t.seq))
                    .map(|(i, _)| i);
                due.map(|i| timers.remove(i))
            };
            let Some(timer) = next else { break };
            self.now.set(timer.due);
            (timer.callback)();
            self.run_until_stalled();
        }
        self.now.set(target);
        self.run_until_stalled();
    }

    /// Delivers a document-level event to every listener for its kind
    pub fn dispatch(&self, event: Event) {
        let listeners: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(kind, _)| *kind == event.kind())
            .map(|(_, listener)| listener.clone())
            .collect();
        debug!(?event, listeners = listeners.len(), "dispatch");
        for listener in listeners {
            listener(&event);
        }
        self.run_until_stalled();
    }

    /// Clicks an element, as a user would
    pub fn click(&self, el: &Element) {
        if let Some(node) = memory_node(el) {
            node.dispatch(&Event::Click);
        }
        self.run_until_stalled();
    }

    /// Follows a fragment link: new history entry, then `hashchange`
    pub fn set_hash(&self, hash: &str) {
        let mut url = self.location();
        url.set_fragment(Some(hash.trim_start_matches('#')));
        self.history.borrow_mut().push(url.clone());
        *self.location.borrow_mut() = url;
        self.dispatch(Event::HashChange);
    }

    /// Goes one history entry back: `popstate`, then `hashchange` if only
    /// the fragment changed
    pub fn back(&self) {
        let (from, to) = {
            let mut history = self.history.borrow_mut();
            if history.len() < 2 {
                return;
            }
            let from = history.pop();
            (from, history.last().cloned())
        };
        let (Some(from), Some(to)) = (from, to) else {
            return;
        };
        *self.location.borrow_mut() = to.clone();
        self.dispatch(Event::PopState);
        if from.fragment() != to.fragment() {
            self.dispatch(Event::HashChange);
        }
    }
}

impl Platform for MemoryPlatform {
    fn create_element(&self, tag: &str) -> Element {
        MemoryNode::element(tag)
    }

    fn create_text(&self, text: &str) -> Element {
        MemoryNode::text(text)
    }

    fn body(&self) -> Element {
        self.body.clone()
    }

    fn query_selector(&self, selector: &str) -> Option<Element> {
        if matches_selector(&self.document, selector) {
            return Some(self.document.clone());
        }
        self.document.find(&|el| matches_selector(el, selector))
    }

    fn title(&self) -> String {
        self.title.borrow().clone()
    }

    fn set_title(&self, title: &str) {
        *self.title.borrow_mut() = title.to_string();
    }

    fn location(&self) -> Url {
        self.location.borrow().clone()
    }

    fn push_url(&self, target: &str) {
        let url = match self.location().join(target) {
            Ok(url) => url,
            Err(err) => {
                warn!(%target, error = %err, "cannot push invalid url");
                return;
            }
        };
        debug!(%url, "push history");
        self.history.borrow_mut().push(url.clone());
        *self.location.borrow_mut() = url;
    }

    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) {
        let seq = self.next_seq.get();
        self.next_seq.set(seq + 1);
        self.timers.borrow_mut().push(Timer {
            due: self.now.get() + delay,
            seq,
            callback,
        });
    }

    fn spawn_local(&self, future: LocalBoxFuture<'static, ()>) {
        if let Err(err) = self.spawner.spawn_local(future) {
            warn!(error = %err, "failed to spawn task");
        }
    }

    fn inject_style(&self, id: &str, css: &str) {
        match self.head.find_by_id(id) {
            Some(style) => {
                style.set_text(css);
            }
            None => {
                let style = MemoryNode::element("style");
                style.set_attribute("id", id).set_text(css);
                self.head.append(&style);
            }
        }
    }

    fn listen(&self, kind: EventKind, listener: Listener) {
        self.listeners.borrow_mut().push((kind, listener));
    }
}
