//! Browser tests for the DOM wiring
//!
//! Run with `wasm-pack test --headless --firefox crates/web`.

#![cfg(target_arch = "wasm32")]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::cell::Cell;
use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use pagefx_core::platform::Element;
use pagefx_core::{EnhanceConfig, enhance};
use pagefx_web::{BrowserPlatform, DomElement};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::HtmlElement;

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

fn append(parent: &web_sys::Element, tag: &str) -> HtmlElement {
    let element = document()
        .create_element(tag)
        .unwrap()
        .dyn_into::<HtmlElement>()
        .unwrap();
    parent.append_child(&element).unwrap();
    element
}

fn fresh_body() -> web_sys::Element {
    let body = document().body().unwrap();
    body.set_inner_html("");
    body.into()
}

#[wasm_bindgen_test]
fn test_dom_element_class_and_attribute_roundtrip() {
    let body = fresh_body();
    let el = DomElement::new(append(&body, "div").into());

    el.add_class("visible").unwrap();
    assert!(el.has_class("visible"));
    el.remove_class("visible").unwrap();
    assert!(!el.has_class("visible"));

    el.set_attribute("aria-expanded", "true").unwrap();
    assert_eq!(el.attribute("aria-expanded").as_deref(), Some("true"));
    assert!(el.add_class("").is_err());
}

#[wasm_bindgen_test]
fn test_navigation_toggle_in_dom() {
    let body = fresh_body();
    let toggle = append(&body, "button");
    toggle.set_class_name("nav-toggle");
    let menu = append(&body, "nav");
    menu.set_class_name("nav");
    let link = append(&menu, "a");
    let outside = append(&body, "main");

    let platform = BrowserPlatform::new().unwrap();
    let enhancement = enhance(&platform, &EnhanceConfig::default());
    assert!(enhancement.report().nav_wired);

    toggle.click();
    assert!(menu.class_list().contains("open"));
    assert_eq!(toggle.get_attribute("aria-expanded").as_deref(), Some("true"));

    link.click();
    assert!(!menu.class_list().contains("open"));

    toggle.click();
    outside.click();
    assert!(!menu.class_list().contains("open"));
    assert!(!toggle.class_list().contains("open"));
}

#[wasm_bindgen_test]
async fn test_counter_reaches_target_in_dom() {
    let body = fresh_body();
    let counter = append(&body, "span");
    counter.set_attribute("data-count", "5").unwrap();

    let platform = BrowserPlatform::new().unwrap();
    let enhancement = enhance(&platform, &EnhanceConfig::default());
    assert_eq!(enhancement.report().counters_started, 1);
    assert_eq!(counter.text_content().as_deref(), Some("0"));

    TimeoutFuture::new(1300).await;
    assert_eq!(counter.text_content().as_deref(), Some("5"));
}

#[wasm_bindgen_test]
fn test_when_ready_runs_immediately_after_load() {
    let platform = BrowserPlatform::new().unwrap();
    let ran = Rc::new(Cell::new(false));
    let flag = Rc::clone(&ran);

    platform.when_ready(move || flag.set(true)).unwrap();

    assert!(ran.get());
}

#[wasm_bindgen_test]
async fn test_reveal_marks_element_in_viewport() {
    let body = fresh_body();
    let seen = append(&body, "section");
    seen.set_class_name("reveal");
    seen.set_attribute("style", "height: 100px").unwrap();
    let spacer = append(&body, "div");
    spacer.set_attribute("style", "height: 400vh").unwrap();
    let below = append(&body, "section");
    below.set_class_name("reveal");
    below.set_attribute("style", "height: 100px").unwrap();

    let platform = BrowserPlatform::new().unwrap();
    let enhancement = enhance(&platform, &EnhanceConfig::default());
    assert_eq!(enhancement.report().reveal_targets, 2);

    TimeoutFuture::new(300).await;
    assert!(seen.class_list().contains("visible"));
    assert!(!below.class_list().contains("visible"));
}

#[wasm_bindgen_test]
async fn test_run_applies_page_config() {
    let body = fresh_body();
    let config = append(&body, "script");
    config.set_id(pagefx_web::config::CONFIG_ELEMENT_ID);
    config.set_attribute("type", "application/json").unwrap();
    config.set_text_content(Some(r#"{"reveal": {"visible_class": "shown"}}"#));
    let seen = append(&body, "section");
    seen.set_class_name("reveal");
    seen.set_attribute("style", "height: 100px").unwrap();

    pagefx_web::run(&BrowserPlatform::new().unwrap());

    TimeoutFuture::new(300).await;
    assert!(seen.class_list().contains("shown"));
    assert!(!seen.class_list().contains("visible"));
}
