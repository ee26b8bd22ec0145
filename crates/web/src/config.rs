//! Page-embedded configuration.
//!
//! A page may override the defaults with
//! `<script type="application/json" id="pagefx-config">{ ... }</script>`.

use pagefx_core::EnhanceConfig;
use pagefx_core::result::Result;
use web_sys::Document;

/// Id of the element holding the JSON overrides.
pub const CONFIG_ELEMENT_ID: &str = "pagefx-config";

/// Read the embedded config.
///
/// Returns `Ok(None)` when the page carries no config element.
///
/// # Errors
///
/// Returns the parse or validation error of an invalid config document.
pub fn read(document: &Document) -> Result<Option<EnhanceConfig>> {
    document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|element| element.text_content())
        .map(|raw| EnhanceConfig::from_json(&raw))
        .transpose()
}
