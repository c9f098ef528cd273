//! Reference-counted loading indicator

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::debug;

use crate::dom::{Element, Platform};

pub const LOADER_ID: &str = "pagewire-loader";
const LOADER_STYLE_ID: &str = "pagewire-loader-style";

const RING_CSS: &str = "
#pagewire-loader {
    position: fixed;
    inset: 0;
    display: flex;
    align-items: center;
    justify-content: center;
    background: rgba(0, 0, 0, 0.25);
    z-index: 2000;
}
#pagewire-loader .pagewire-loader-ring {
    width: 48px;
    height: 48px;
    border: 6px solid #ffffff;
    border-color: #ffffff transparent #ffffff transparent;
    border-radius: 50%;
    animation: pagewire-loader-spin 1.2s linear infinite;
}
@keyframes pagewire-loader-spin {
    0% { transform: rotate(0deg); }
    100% { transform: rotate(360deg); }
}
";

struct LoaderState {
    parent: Element,
    element: Element,
    /// The overlay goes right before this child of `parent` when set
    anchor: RefCell<Option<Element>>,
    pending: Cell<usize>,
}

/// Overlay shown while work is pending
///
/// Every [`Loader::show`] must be matched by a [`Loader::finalize`]; the
/// overlay stays attached until the last one.
#[derive(Clone)]
pub struct Loader {
    inner: Rc<LoaderState>,
}

impl Loader {
    /// Ring spinner overlay mounted into `parent`
    pub fn new(platform: &dyn Platform, parent: &Element) -> Self {
        platform.inject_style(LOADER_STYLE_ID, RING_CSS);
        let element = platform.create_element("div");
        element.set_attribute("id", LOADER_ID);
        let ring = platform.create_element("div");
        ring.add_class("pagewire-loader-ring");
        element.append(&ring);
        Self::from_element(parent, element)
    }

    /// Uses an existing node as the overlay
    pub fn from_element(parent: &Element, element: Element) -> Self {
        Self {
            inner: Rc::new(LoaderState {
                parent: parent.clone(),
                element,
                anchor: RefCell::new(None),
                pending: Cell::new(0),
            }),
        }
    }

    pub fn element(&self) -> &Element {
        &self.inner.element
    }

    /// Keeps the overlay in front of `anchor` whenever it is attached
    pub fn set_anchor(&self, anchor: Option<Element>) {
        *self.inner.anchor.borrow_mut() = anchor;
        if self.is_visible() {
            self.attach();
        }
    }

    /// Re-inserts the overlay at its place in the parent
    pub(crate) fn attach(&self) {
        let parent = &self.inner.parent;
        let anchor = self.inner.anchor.borrow().clone();
        match anchor.filter(|a| a.parent().is_some_and(|p| p.ptr_eq(parent))) {
            Some(anchor) => parent.insert_before(&self.inner.element, &anchor),
            None => parent.append(&self.inner.element),
        };
    }

    pub fn show(&self) {
        let pending = self.inner.pending.get();
        if pending == 0 {
            self.attach();
        }
        self.inner.pending.set(pending + 1);
        debug!(pending = pending + 1, "loader shown");
    }

    pub fn finalize(&self) {
        let pending = self.inner.pending.get().saturating_sub(1);
        self.inner.pending.set(pending);
        if pending == 0 {
            self.inner.element.remove();
        }
        debug!(pending, "loader finalized");
    }

    pub fn pending(&self) -> usize {
        self.inner.pending.get()
    }

    pub fn is_visible(&self) -> bool {
        self.pending() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryPlatform;
    use url::Url;

    #[test]
    fn test_loader_stays_until_last_finalize() {
        let platform = MemoryPlatform::new(Url::parse("https://app.test/").unwrap());
        let root = platform.body();
        let loader = Loader::new(platform.as_ref(), &root);
        assert!(root.find_by_id(LOADER_ID).is_none());
        assert!(platform.style_block(LOADER_STYLE_ID).is_some());

        loader.show();
        loader.show();
        assert_eq!(loader.pending(), 2);
        assert!(root.find_by_id(LOADER_ID).is_some());

        loader.finalize();
        assert!(loader.is_visible());
        loader.finalize();
        assert!(!loader.is_visible());
        assert!(root.find_by_id(LOADER_ID).is_none());

        loader.finalize();
        assert_eq!(loader.pending(), 0);
    }

    #[test]
    fn test_loader_goes_before_anchor() {
        let platform = MemoryPlatform::new(Url::parse("https://app.test/").unwrap());
        let root = platform.body();
        let footer = platform.create_element("footer");
        root.append(&footer);
        let loader = Loader::new(platform.as_ref(), &root);
        loader.set_anchor(Some(footer.clone()));

        loader.show();
        assert!(root.last_child().unwrap().ptr_eq(&footer));
        assert!(root.children()[0].ptr_eq(loader.element()));

        footer.remove();
        loader.finalize();
        loader.show();
        assert!(root.last_child().unwrap().ptr_eq(loader.element()));
    }
}
