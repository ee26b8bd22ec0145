//! `web-sys` element adapter.

use pagefx_core::Error;
use pagefx_core::platform::Element;
use pagefx_core::result::Result;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Node, NodeList};

/// A DOM element handle. Equality is node identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomElement(web_sys::Element);

impl DomElement {
    #[must_use]
    pub const fn new(element: web_sys::Element) -> Self {
        Self(element)
    }

    #[must_use]
    pub const fn inner(&self) -> &web_sys::Element {
        &self.0
    }
}

impl From<web_sys::Element> for DomElement {
    fn from(element: web_sys::Element) -> Self {
        Self(element)
    }
}

/// Render a thrown JS value for an error message.
pub(crate) fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// Elements of a node list, skipping any non-element nodes.
pub(crate) fn elements_of(list: &NodeList) -> Vec<DomElement> {
    (0..list.length())
        .filter_map(|index| list.get(index))
        .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
        .map(DomElement)
        .collect()
}

impl Element for DomElement {
    fn add_class(&self, class: &str) -> Result<()> {
        self.0
            .class_list()
            .add_1(class)
            .map_err(|e| Error::dom("classList.add", describe(&e)))
    }

    fn remove_class(&self, class: &str) -> Result<()> {
        self.0
            .class_list()
            .remove_1(class)
            .map_err(|e| Error::dom("classList.remove", describe(&e)))
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.class_list().contains(class)
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }

    fn set_attribute(&self, name: &str, value: &str) -> Result<()> {
        self.0
            .set_attribute(name, value)
            .map_err(|e| Error::dom("setAttribute", describe(&e)))
    }

    fn set_text(&self, text: &str) {
        self.0.set_text_content(Some(text));
    }

    fn contains(&self, other: &Self) -> bool {
        let node: &Node = other.0.as_ref();
        self.0.contains(Some(node))
    }

    fn is_connected(&self) -> bool {
        self.0.is_connected()
    }

    fn query_all(&self, selector: &str) -> Result<Vec<Self>> {
        self.0
            .query_selector_all(selector)
            .map(|list| elements_of(&list))
            .map_err(|e| Error::dom("querySelectorAll", describe(&e)))
    }
}
