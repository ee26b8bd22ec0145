//! WASM page script for pagefx
//!
//! Wires reveal-on-scroll, counter animation and the navigation toggle onto
//! the live document once it has been parsed.
//!
//! ## Module Structure
//! - `element`: `web-sys` element adapter
//! - `platform`: observer, click listener and interval plumbing
//! - `config`: page-embedded JSON overrides
//! - `logging`: `tracing` events to the browser console

#![forbid(unsafe_code)]

pub mod config;
pub mod element;
pub mod logging;
pub mod platform;

use pagefx_core::{EnhanceConfig, enhance};
use wasm_bindgen::prelude::*;

pub use element::DomElement;
pub use platform::BrowserPlatform;

/// Load config, install logging and enhance the page.
pub fn run(platform: &BrowserPlatform) {
    let (config, rejected) = match config::read(platform.document()) {
        Ok(found) => (found.unwrap_or_default(), None),
        Err(e) => (EnhanceConfig::default(), Some(e)),
    };

    logging::init(config.log.level().unwrap_or(tracing::Level::WARN));
    if let Some(e) = rejected {
        tracing::warn!("ignoring invalid page config: {}", e);
    }

    enhance(platform, &config);
}

/// Module entry point.
///
/// # Errors
///
/// Returns an error outside a browser context or if the ready listener
/// cannot be registered.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Set up panic hook for better error messages in browser console
    console_error_panic_hook::set_once();

    let platform = BrowserPlatform::new().map_err(|e| JsValue::from_str(&e.to_string()))?;
    let ready = platform.clone();
    platform
        .when_ready(move || run(&ready))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Default config as JSON, for pages that want a starting point.
#[wasm_bindgen(js_name = defaultConfig)]
#[must_use]
pub fn default_config() -> String {
    serde_json::to_string_pretty(&EnhanceConfig::default()).unwrap_or_default()
}
