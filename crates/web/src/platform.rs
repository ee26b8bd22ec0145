//! Browser implementation of the page capabilities.
//!
//! Listener and observer closures are leaked with `forget`: they live for
//! the page session. Interval closures are released once their tick
//! handler breaks.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::{Interval, Timeout};
use pagefx_core::Error;
use pagefx_core::platform::{
    ClickHandler, ClickTarget, IntersectionHandler, Platform, Propagation, TickHandler,
};
use pagefx_core::result::Result;
use pagefx_core::reveal::{Intersection, Threshold};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Event, EventTarget, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, Node,
};

use crate::element::{DomElement, describe, elements_of};

/// The live document.
#[derive(Debug, Clone)]
pub struct BrowserPlatform {
    document: Document,
}

impl BrowserPlatform {
    /// # Errors
    ///
    /// Returns `Error::Dom` outside a browser context.
    pub fn new() -> Result<Self> {
        let window = web_sys::window().ok_or_else(|| Error::dom("window", "not available"))?;
        let document = window
            .document()
            .ok_or_else(|| Error::dom("document", "not available"))?;
        Ok(Self { document })
    }

    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    /// Run `callback` once the document has been parsed: right away when it
    /// already has, otherwise on `DOMContentLoaded`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Dom` if the listener cannot be registered.
    pub fn when_ready<F>(&self, callback: F) -> Result<()>
    where
        F: FnOnce() + 'static,
    {
        if self.document.ready_state() != "loading" {
            callback();
            return Ok(());
        }

        let closure = Closure::once(callback);
        self.document
            .add_event_listener_with_callback("DOMContentLoaded", closure.as_ref().unchecked_ref())
            .map_err(|e| Error::dom("addEventListener", describe(&e)))?;
        closure.forget();
        Ok(())
    }
}

/// The element a click originated on, climbing out of text nodes.
fn click_origin(event: &Event) -> Option<DomElement> {
    let target = event.target()?;
    match target.dyn_into::<web_sys::Element>() {
        Ok(element) => Some(DomElement::new(element)),
        Err(other) => other
            .dyn_into::<Node>()
            .ok()
            .and_then(|node| node.parent_element())
            .map(DomElement::new),
    }
}

impl Platform for BrowserPlatform {
    type Element = DomElement;

    fn query_all(&self, selector: &str) -> Result<Vec<DomElement>> {
        self.document
            .query_selector_all(selector)
            .map(|list| elements_of(&list))
            .map_err(|e| Error::dom("querySelectorAll", describe(&e)))
    }

    fn query(&self, selector: &str) -> Result<Option<DomElement>> {
        self.document
            .query_selector(selector)
            .map(|found| found.map(DomElement::new))
            .map_err(|e| Error::dom("querySelector", describe(&e)))
    }

    fn observe_intersections(
        &self,
        targets: &[DomElement],
        threshold: Threshold,
        handler: IntersectionHandler<DomElement>,
    ) -> Result<()> {
        let mut handler = handler;
        let callback = Closure::wrap(Box::new(
            move |entries: js_sys::Array, _observer: IntersectionObserver| {
                let batch = entries
                    .iter()
                    .filter_map(|value| value.dyn_into::<IntersectionObserverEntry>().ok())
                    .map(|entry| Intersection {
                        target: DomElement::new(entry.target()),
                        is_intersecting: entry.is_intersecting(),
                        ratio: entry.intersection_ratio(),
                    })
                    .collect();
                handler(batch);
            },
        )
            as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(threshold.value()));
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
                .map_err(|e| Error::observer(describe(&e)))?;
        for target in targets {
            observer.observe(target.inner());
        }

        // Keep closure alive
        callback.forget();
        Ok(())
    }

    fn listen_click(
        &self,
        target: ClickTarget<'_, DomElement>,
        handler: ClickHandler<DomElement>,
    ) -> Result<()> {
        let event_target: EventTarget = match target {
            ClickTarget::Element(element) => element.inner().clone().into(),
            ClickTarget::Document => self.document.clone().into(),
        };

        let mut handler = handler;
        let callback = Closure::wrap(Box::new(move |event: Event| {
            let Some(origin) = click_origin(&event) else {
                return;
            };
            if handler(&origin) == Propagation::Stop {
                event.stop_propagation();
            }
        }) as Box<dyn FnMut(Event)>);

        event_target
            .add_event_listener_with_callback("click", callback.as_ref().unchecked_ref())
            .map_err(|e| Error::dom("addEventListener", describe(&e)))?;

        // Keep closure alive
        callback.forget();
        Ok(())
    }

    fn set_interval(&self, period_ms: u32, tick: TickHandler) {
        let slot: Rc<RefCell<Option<Interval>>> = Rc::new(RefCell::new(None));
        let own_slot = Rc::clone(&slot);
        let mut tick = tick;

        let interval = Interval::new(period_ms, move || {
            if tick().is_break() {
                if let Some(interval) = own_slot.borrow_mut().take() {
                    // Cleared now; the running closure is freed on the next turn.
                    let callback = interval.cancel();
                    Timeout::new(0, move || drop(callback)).forget();
                }
            }
        });
        *slot.borrow_mut() = Some(interval);
    }
}
