//! In-memory page for driving the behaviors without a browser.
//!
//! `FakePlatform` keeps a small element tree with class, attribute and text
//! state, dispatches clicks with bubbling, delivers intersection changes on
//! demand and runs interval timers on a virtual clock. Everything happens
//! synchronously inside the calling test.
//!
//! Selectors are limited to a single `.class`, `[attribute]` or `tag`.
//! Query results come back in creation order.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::ControlFlow;
use std::rc::Rc;

use crate::error::Error;
use crate::platform::{
    ClickHandler, ClickTarget, Element, IntersectionHandler, Platform, Propagation, TickHandler,
};
use crate::result::Result;
use crate::reveal::{Intersection, Threshold};

const ROOT: usize = 0;

type Shared<T> = Rc<RefCell<T>>;

#[derive(Debug, Default)]
struct Node {
    tag: String,
    parent: Option<usize>,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    text: String,
    text_history: Vec<String>,
    class_writes: usize,
}

struct Listener {
    node: Option<usize>,
    handler: Shared<ClickHandler<FakeElement>>,
}

struct Observer {
    targets: Vec<usize>,
    threshold: Threshold,
    handler: Shared<IntersectionHandler<FakeElement>>,
}

struct Timer {
    period: u64,
    next_due: u64,
    active: bool,
    handler: Shared<TickHandler>,
}

#[derive(Default)]
struct Page {
    nodes: Vec<Node>,
    listeners: Vec<Listener>,
    observers: Vec<Observer>,
    timers: Vec<Timer>,
    now: u64,
}

impl Page {
    fn parent_of(&self, id: usize) -> Option<usize> {
        self.nodes.get(id).and_then(|node| node.parent)
    }

    /// Ids from `id` up to the topmost ancestor, and whether that is the root.
    fn ancestry(&self, id: usize) -> (Vec<usize>, bool) {
        let mut path = vec![id];
        let mut current = id;
        while let Some(parent) = self.parent_of(current) {
            path.push(parent);
            current = parent;
        }
        (path, current == ROOT)
    }

    fn is_ancestor_or_self(&self, ancestor: usize, id: usize) -> bool {
        self.ancestry(id).0.contains(&ancestor)
    }

    fn push_node(&mut self, tag: &str, parent: Option<usize>) -> usize {
        self.nodes.push(Node {
            tag: tag.to_string(),
            parent,
            ..Node::default()
        });
        self.nodes.len().saturating_sub(1)
    }
}

enum Selector {
    Class(String),
    Attribute(String),
    Tag(String),
}

impl Selector {
    fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let invalid = || Error::dom("querySelectorAll", format!("unsupported selector '{raw}'"));
        let is_name = |s: &str| {
            !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        };

        if let Some(class) = raw.strip_prefix('.') {
            return is_name(class)
                .then(|| Self::Class(class.to_string()))
                .ok_or_else(invalid);
        }
        if let Some(attribute) = raw.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            return is_name(attribute)
                .then(|| Self::Attribute(attribute.to_string()))
                .ok_or_else(invalid);
        }
        is_name(raw)
            .then(|| Self::Tag(raw.to_ascii_lowercase()))
            .ok_or_else(invalid)
    }

    fn matches(&self, node: &Node) -> bool {
        match self {
            Self::Class(class) => node.classes.iter().any(|c| c == class),
            Self::Attribute(name) => node.attributes.contains_key(name),
            Self::Tag(tag) => node.tag.eq_ignore_ascii_case(tag),
        }
    }
}

fn check_token(operation: &str, token: &str) -> Result<()> {
    if token.is_empty() || token.chars().any(char::is_whitespace) {
        return Err(Error::dom(operation, format!("invalid token '{token}'")));
    }
    Ok(())
}

/// Handle to a node in a [`FakePlatform`] page.
#[derive(Clone)]
pub struct FakeElement {
    page: Shared<Page>,
    id: usize,
}

impl PartialEq for FakeElement {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && Rc::ptr_eq(&self.page, &other.page)
    }
}

impl fmt::Debug for FakeElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeElement").field("id", &self.id).finish()
    }
}

impl FakeElement {
    fn read<R>(&self, f: impl FnOnce(&Node) -> R) -> Option<R> {
        self.page.borrow().nodes.get(self.id).map(f)
    }

    fn write<R>(&self, f: impl FnOnce(&mut Node) -> R) -> Option<R> {
        self.page.borrow_mut().nodes.get_mut(self.id).map(f)
    }

    /// Builder: add a class without validation.
    #[must_use]
    pub fn with_class(self, class: &str) -> Self {
        self.write(|node| node.classes.push(class.to_string()));
        self
    }

    /// Builder: set an attribute without validation.
    #[must_use]
    pub fn with_attribute(self, name: &str, value: &str) -> Self {
        self.write(|node| node.attributes.insert(name.to_string(), value.to_string()));
        self
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.read(|node| node.text.clone()).unwrap_or_default()
    }

    /// Every text value written, oldest first.
    #[must_use]
    pub fn text_history(&self) -> Vec<String> {
        self.read(|node| node.text_history.clone())
            .unwrap_or_default()
    }

    /// Number of `add_class` calls made on this element.
    #[must_use]
    pub fn class_writes(&self) -> usize {
        self.read(|node| node.class_writes).unwrap_or_default()
    }

    /// Remove the element (and its subtree) from the document.
    pub fn detach(&self) {
        self.write(|node| node.parent = None);
    }
}

impl Element for FakeElement {
    fn add_class(&self, class: &str) -> Result<()> {
        check_token("classList.add", class)?;
        self.write(|node| {
            node.class_writes = node.class_writes.saturating_add(1);
            if !node.classes.iter().any(|c| c == class) {
                node.classes.push(class.to_string());
            }
        });
        Ok(())
    }

    fn remove_class(&self, class: &str) -> Result<()> {
        check_token("classList.remove", class)?;
        self.write(|node| node.classes.retain(|c| c != class));
        Ok(())
    }

    fn has_class(&self, class: &str) -> bool {
        self.read(|node| node.classes.iter().any(|c| c == class))
            .unwrap_or(false)
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.read(|node| node.attributes.get(name).cloned()).flatten()
    }

    fn set_attribute(&self, name: &str, value: &str) -> Result<()> {
        check_token("setAttribute", name)?;
        self.write(|node| node.attributes.insert(name.to_string(), value.to_string()));
        Ok(())
    }

    fn set_text(&self, text: &str) {
        self.write(|node| {
            node.text = text.to_string();
            node.text_history.push(text.to_string());
        });
    }

    fn contains(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.page, &other.page)
            && self.page.borrow().is_ancestor_or_self(self.id, other.id)
    }

    fn is_connected(&self) -> bool {
        self.page.borrow().ancestry(self.id).1
    }

    fn query_all(&self, selector: &str) -> Result<Vec<Self>> {
        let selector = Selector::parse(selector)?;
        let page = self.page.borrow();
        let ids: Vec<usize> = page
            .nodes
            .iter()
            .enumerate()
            .filter(|(id, node)| {
                *id != self.id && selector.matches(node) && page.is_ancestor_or_self(self.id, *id)
            })
            .map(|(id, _)| id)
            .collect();
        Ok(ids
            .into_iter()
            .map(|id| Self {
                page: Rc::clone(&self.page),
                id,
            })
            .collect())
    }
}

/// An in-memory page implementing [`Platform`].
#[derive(Clone)]
pub struct FakePlatform {
    page: Shared<Page>,
}

impl Default for FakePlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl FakePlatform {
    /// A page holding only an empty `body`.
    #[must_use]
    pub fn new() -> Self {
        let mut page = Page::default();
        page.push_node("body", None);
        Self {
            page: Rc::new(RefCell::new(page)),
        }
    }

    fn element(&self, id: usize) -> FakeElement {
        FakeElement {
            page: Rc::clone(&self.page),
            id,
        }
    }

    #[must_use]
    pub fn body(&self) -> FakeElement {
        self.element(ROOT)
    }

    /// Create an element as the last child of `body`.
    #[must_use]
    pub fn create(&self, tag: &str) -> FakeElement {
        let id = self.page.borrow_mut().push_node(tag, Some(ROOT));
        self.element(id)
    }

    /// Create an element as the last child of `parent`.
    #[must_use]
    pub fn create_in(&self, parent: &FakeElement, tag: &str) -> FakeElement {
        let id = self.page.borrow_mut().push_node(tag, Some(parent.id));
        self.element(id)
    }

    /// Virtual milliseconds elapsed since the page was created.
    #[must_use]
    pub fn now(&self) -> u64 {
        self.page.borrow().now
    }

    #[must_use]
    pub fn active_timers(&self) -> usize {
        self.page.borrow().timers.iter().filter(|t| t.active).count()
    }

    /// Periods of the intervals still running, in registration order.
    #[must_use]
    pub fn timer_periods(&self) -> Vec<u64> {
        self.page
            .borrow()
            .timers
            .iter()
            .filter(|t| t.active)
            .map(|t| t.period)
            .collect()
    }

    /// Threshold of the first observer watching `target`.
    #[must_use]
    pub fn observed_threshold(&self, target: &FakeElement) -> Option<Threshold> {
        self.page
            .borrow()
            .observers
            .iter()
            .find(|o| o.targets.contains(&target.id))
            .map(|o| o.threshold)
    }

    /// Click `target`: its own listeners run first, then each ancestor's,
    /// then the document's. A handler returning `Stop` ends bubbling after
    /// the remaining listeners of the same element. Clicks on detached
    /// elements never reach the document.
    pub fn click(&self, target: &FakeElement) {
        let (path, connected) = self.page.borrow().ancestry(target.id);
        let mut nodes: Vec<Option<usize>> = path.into_iter().map(Some).collect();
        if connected {
            nodes.push(None);
        }

        for node in nodes {
            let handlers: Vec<_> = self
                .page
                .borrow()
                .listeners
                .iter()
                .filter(|l| l.node == node)
                .map(|l| Rc::clone(&l.handler))
                .collect();
            let mut stopped = false;
            for handler in handlers {
                if (handler.borrow_mut())(target) == Propagation::Stop {
                    stopped = true;
                }
            }
            if stopped {
                return;
            }
        }
    }

    /// Report `target` as visible at `ratio` to every observer watching it.
    pub fn intersect(&self, target: &FakeElement, ratio: f64) {
        let handlers: Vec<_> = self
            .page
            .borrow()
            .observers
            .iter()
            .filter(|o| o.targets.contains(&target.id))
            .map(|o| Rc::clone(&o.handler))
            .collect();
        for handler in handlers {
            (handler.borrow_mut())(vec![Intersection {
                target: target.clone(),
                is_intersecting: ratio > 0.0,
                ratio,
            }]);
        }
    }

    /// Move the virtual clock forward, firing due ticks in time order.
    /// Ticks due at the same instant fire in registration order.
    pub fn advance(&self, ms: u64) {
        let until = self.now().saturating_add(ms);
        loop {
            let due = self
                .page
                .borrow()
                .timers
                .iter()
                .enumerate()
                .filter(|(_, t)| t.active && t.next_due <= until)
                .min_by_key(|(index, t)| (t.next_due, *index))
                .map(|(index, t)| (index, t.next_due, Rc::clone(&t.handler)));
            let Some((index, at, handler)) = due else {
                break;
            };

            self.page.borrow_mut().now = at;
            let flow = (handler.borrow_mut())();

            let mut page = self.page.borrow_mut();
            if let Some(timer) = page.timers.get_mut(index) {
                match flow {
                    ControlFlow::Break(()) => timer.active = false,
                    ControlFlow::Continue(()) => {
                        timer.next_due = timer.next_due.saturating_add(timer.period);
                    }
                }
            }
        }
        self.page.borrow_mut().now = until;
    }
}

impl Platform for FakePlatform {
    type Element = FakeElement;

    fn query_all(&self, selector: &str) -> Result<Vec<FakeElement>> {
        self.body().query_all(selector)
    }

    fn query(&self, selector: &str) -> Result<Option<FakeElement>> {
        Ok(self.query_all(selector)?.into_iter().next())
    }

    fn observe_intersections(
        &self,
        targets: &[FakeElement],
        threshold: Threshold,
        handler: IntersectionHandler<FakeElement>,
    ) -> Result<()> {
        self.page.borrow_mut().observers.push(Observer {
            targets: targets.iter().map(|t| t.id).collect(),
            threshold,
            handler: Rc::new(RefCell::new(handler)),
        });
        Ok(())
    }

    fn listen_click(
        &self,
        target: ClickTarget<'_, FakeElement>,
        handler: ClickHandler<FakeElement>,
    ) -> Result<()> {
        let node = match target {
            ClickTarget::Element(element) => Some(element.id),
            ClickTarget::Document => None,
        };
        self.page.borrow_mut().listeners.push(Listener {
            node,
            handler: Rc::new(RefCell::new(handler)),
        });
        Ok(())
    }

    fn set_interval(&self, period_ms: u32, tick: TickHandler) {
        let mut page = self.page.borrow_mut();
        let period = u64::from(period_ms.max(1));
        let next_due = page.now.saturating_add(period);
        page.timers.push(Timer {
            period,
            next_due,
            active: true,
            handler: Rc::new(RefCell::new(tick)),
        });
    }
}
