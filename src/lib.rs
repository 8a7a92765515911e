/// Channel Queue - browser extension that finds a channel's id on the
/// video site and queues it with the companion service
/// Built with Rust + WASM + Yew

pub mod bridge;
pub mod cache;
pub mod config;
pub mod extractor;
pub mod navigation;
pub mod page;
pub mod submit;
pub mod ui;

use wasm_bindgen::prelude::*;

use crate::config::ExtensionConfig;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Run the extraction chain against the current page
#[wasm_bindgen]
pub fn resolve_channel_id() -> Option<String> {
    let config = ExtensionConfig::default();
    extractor::locate_on_page(&config.storage_key)
        .channel_id
        .map(String::from)
}

// Same as `resolve_channel_id`, with the provenance of the answer
#[wasm_bindgen]
pub fn locate() -> Result<JsValue, JsValue> {
    let config = ExtensionConfig::default();
    let result = extractor::locate_on_page(&config.storage_key);
    serde_wasm_bindgen::to_value(&result).map_err(JsValue::from)
}

// Page-context entry point: publish page state over the bridge event
#[wasm_bindgen]
pub fn start_page_observer() -> Result<(), JsValue> {
    bridge::start_page_observer(&ExtensionConfig::default())
}

// Content-script entry point: cache ids received over the bridge event
#[wasm_bindgen]
pub fn start_content_bridge() -> Result<(), JsValue> {
    bridge::start_content_listener(&ExtensionConfig::default())
}

// Content-script entry point: keep the controls injected on watch pages
#[wasm_bindgen]
pub fn start_controls() -> Result<(), JsValue> {
    ui::start_controls(&ExtensionConfig::default())
}

#[wasm_bindgen]
pub fn stop_controls() {
    ui::stop_controls();
}
