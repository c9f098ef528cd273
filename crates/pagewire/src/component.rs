//! What can be rendered into the document

use std::fmt;
use std::rc::Rc;

use crate::dom::{Element, Platform};

/// Anything that can produce a node
pub trait Component {
    fn render(&self, platform: &dyn Platform) -> Element;
}

impl<F> Component for F
where
    F: Fn(&dyn Platform) -> Element,
{
    fn render(&self, platform: &dyn Platform) -> Element {
        self(platform)
    }
}

impl Component for Element {
    fn render(&self, _platform: &dyn Platform) -> Element {
        self.clone()
    }
}

/// The closed set of things the shells accept for rendering
#[derive(Clone)]
pub enum Renderable {
    /// Plain text, inserted as a text node
    Text(String),
    Node(Element),
    Component(Rc<dyn Component>),
}

impl Renderable {
    pub fn component(component: impl Component + 'static) -> Self {
        Renderable::Component(Rc::new(component))
    }

    pub fn to_element(&self, platform: &dyn Platform) -> Element {
        match self {
            Renderable::Text(text) => platform.create_text(text),
            Renderable::Node(el) => el.clone(),
            Renderable::Component(component) => component.render(platform),
        }
    }
}

impl fmt::Debug for Renderable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Renderable::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Renderable::Node(el) => f.debug_tuple("Node").field(el).finish(),
            Renderable::Component(_) => f.write_str("Component(..)"),
        }
    }
}

impl From<&str> for Renderable {
    fn from(text: &str) -> Self {
        Renderable::Text(text.to_string())
    }
}

impl From<String> for Renderable {
    fn from(text: String) -> Self {
        Renderable::Text(text)
    }
}

impl From<Element> for Renderable {
    fn from(el: Element) -> Self {
        Renderable::Node(el)
    }
}

impl From<&Element> for Renderable {
    fn from(el: &Element) -> Self {
        Renderable::Node(el.clone())
    }
}

impl From<Rc<dyn Component>> for Renderable {
    fn from(component: Rc<dyn Component>) -> Self {
        Renderable::Component(component)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{element, MemoryPlatform};
    use url::Url;

    #[test]
    fn test_each_variant_renders() {
        let platform = MemoryPlatform::new(Url::parse("https://app.test/").unwrap());
        let p: &dyn Platform = platform.as_ref();

        let text = Renderable::from("hello").to_element(p);
        assert_eq!(text.tag_name(), "");
        assert_eq!(text.text(), "hello");

        let node = p.create_element("p");
        assert!(Renderable::from(&node).to_element(p).ptr_eq(&node));

        let card =
            Renderable::component(|p: &dyn Platform| element(p, "div", Some("card"), "Card"));
        let rendered = card.to_element(p);
        assert_eq!(rendered.id().as_deref(), Some("card"));
        assert_eq!(rendered.text(), "Card");
    }
}
