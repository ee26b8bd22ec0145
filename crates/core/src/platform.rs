//! Capabilities the behaviors need from the host page.
//!
//! The browser crate implements these on top of `web-sys`; `crate::fake`
//! implements them in memory so every behavior can be driven synchronously.
//!
//! Subscribing means registering a handler. Interval handlers unsubscribe
//! themselves by returning [`ControlFlow::Break`]; click and intersection
//! handlers live for the page session.

use std::ops::ControlFlow;

use crate::reveal::{Intersection, Threshold};
use crate::result::Result;

/// A page element as seen by the behaviors.
///
/// Equality must be identity: two handles are equal when they refer to the
/// same node.
pub trait Element: Clone + PartialEq + 'static {
    /// Add a class to the element's class list.
    ///
    /// # Errors
    ///
    /// Returns `Error::Dom` if the platform rejects the class name.
    fn add_class(&self, class: &str) -> Result<()>;

    /// Remove a class from the element's class list.
    ///
    /// # Errors
    ///
    /// Returns `Error::Dom` if the platform rejects the class name.
    fn remove_class(&self, class: &str) -> Result<()>;

    fn has_class(&self, class: &str) -> bool;

    fn attribute(&self, name: &str) -> Option<String>;

    /// Set an attribute value.
    ///
    /// # Errors
    ///
    /// Returns `Error::Dom` if the attribute name is invalid.
    fn set_attribute(&self, name: &str, value: &str) -> Result<()>;

    /// Replace the element's text content.
    fn set_text(&self, text: &str);

    /// Whether `other` is this element or one of its descendants.
    fn contains(&self, other: &Self) -> bool;

    /// Whether the element is still attached to the document.
    fn is_connected(&self) -> bool;

    /// Descendants of this element matching `selector`, in document order.
    ///
    /// # Errors
    ///
    /// Returns `Error::Dom` if the selector is invalid.
    fn query_all(&self, selector: &str) -> Result<Vec<Self>>;
}

/// Whether a click keeps bubbling after a handler ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Continue,
    Stop,
}

/// Handler for a click; receives the element the click originated on.
pub type ClickHandler<E> = Box<dyn FnMut(&E) -> Propagation>;

/// Handler for a batch of intersection changes.
pub type IntersectionHandler<E> = Box<dyn FnMut(Vec<Intersection<E>>)>;

/// Handler for one interval tick; `Break` cancels the interval.
pub type TickHandler = Box<dyn FnMut() -> ControlFlow<()>>;

/// Where a click listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget<'a, E> {
    Element(&'a E),
    Document,
}

/// Event sources and queries offered by the host page.
pub trait Platform {
    type Element: Element;

    /// All document elements matching `selector`, in document order.
    ///
    /// # Errors
    ///
    /// Returns `Error::Dom` if the selector is invalid.
    fn query_all(&self, selector: &str) -> Result<Vec<Self::Element>>;

    /// First document element matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Dom` if the selector is invalid.
    fn query(&self, selector: &str) -> Result<Option<Self::Element>>;

    /// Observe viewport intersection of `targets`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Observer` if the observer cannot be created.
    fn observe_intersections(
        &self,
        targets: &[Self::Element],
        threshold: Threshold,
        handler: IntersectionHandler<Self::Element>,
    ) -> Result<()>;

    /// Listen for clicks on an element or on the whole document.
    ///
    /// # Errors
    ///
    /// Returns `Error::Dom` if the listener cannot be registered.
    fn listen_click(
        &self,
        target: ClickTarget<'_, Self::Element>,
        handler: ClickHandler<Self::Element>,
    ) -> Result<()>;

    /// Run `tick` every `period_ms` until it returns `Break`.
    fn set_interval(&self, period_ms: u32, tick: TickHandler);
}
