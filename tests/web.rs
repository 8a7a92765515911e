//! Browser tests: run with `wasm-pack test --headless --firefox`
#![cfg(target_arch = "wasm32")]

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use channel_id::ChannelId;
use channel_queue_extension::bridge::{publish, start_content_listener};
use channel_queue_extension::config::ExtensionConfig;
use channel_queue_extension::navigation::watch_mutations;
use channel_queue_extension::ui::insert_controls;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;
use web_sys::{Document, Element};
use yew::platform::time::sleep;

wasm_bindgen_test_configure!(run_in_browser);

const ID: &str = "UC1234567890123456789012";

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

fn navigate(path: &str) {
    web_sys::window()
        .unwrap()
        .history()
        .unwrap()
        .push_state_with_url(&JsValue::NULL, "", Some(path))
        .unwrap();
}

fn owner_fixture(document: &Document) -> Element {
    if let Some(existing) = document.query_selector("#owner").unwrap() {
        return existing;
    }
    let owner = document.create_element("div").unwrap();
    owner.set_id("owner");
    document.body().unwrap().append_child(&owner).unwrap();
    owner
}

fn count(document: &Document, selector: &str) -> u32 {
    document.query_selector_all(selector).unwrap().length()
}

#[wasm_bindgen_test]
async fn repeated_insertion_leaves_one_wrapper() {
    let document = document();
    navigate("/watch?v=abc");
    let owner = owner_fixture(&document);
    let config = Rc::new(ExtensionConfig::default());

    for _ in 0..4 {
        assert!(insert_controls(config.clone()).unwrap());
    }
    // Let the renderer flush the mounted component
    sleep(Duration::ZERO).await;

    assert_eq!(count(&document, ".yt-watch-buttons-container"), 1);
    assert_eq!(count(&document, "#yt-ext-find"), 1);
    assert_eq!(count(&document, "#yt-ext-add"), 1);
    assert_eq!(count(&document, ".yt-watch-buttons-container #yt-ext-find"), 1);
    assert_eq!(count(&document, ".yt-watch-buttons-container #yt-ext-add"), 1);
    assert_eq!(owner.query_selector_all(".yt-watch-buttons-container").unwrap().length(), 1);
}

#[wasm_bindgen_test]
fn insertion_removes_stray_buttons() {
    let document = document();
    navigate("/watch?v=abc");
    owner_fixture(&document);

    let stray = document.create_element("button").unwrap();
    stray.set_id("yt-ext-add");
    document.body().unwrap().append_child(&stray).unwrap();

    insert_controls(Rc::new(ExtensionConfig::default())).unwrap();

    assert_eq!(count(&document, "body > #yt-ext-add"), 0);
    assert_eq!(count(&document, ".yt-watch-buttons-container"), 1);
}

#[wasm_bindgen_test]
fn no_controls_outside_watch_pages() {
    let document = document();
    owner_fixture(&document);
    navigate("/@somebody");

    assert!(!insert_controls(Rc::new(ExtensionConfig::default())).unwrap());
    assert_eq!(count(&document, ".yt-watch-buttons-container"), 0);
}

#[wasm_bindgen_test]
fn bridge_event_reaches_local_storage() {
    let config = ExtensionConfig::default();
    start_content_listener(&config).unwrap();

    let id = ChannelId::parse(ID).unwrap();
    publish(&document(), &config.bridge_event, &id).unwrap();

    let storage = web_sys::window().unwrap().local_storage().unwrap().unwrap();
    assert_eq!(
        storage.get_item(&config.storage_key).unwrap(),
        Some(ID.to_string())
    );
    assert_eq!(
        channel_queue_extension::resolve_channel_id(),
        Some(ID.to_string())
    );
}

#[wasm_bindgen_test]
async fn dropped_mutation_watch_stops_reporting() {
    let document = document();
    navigate("/watch?v=abc");
    let root = document.create_element("div").unwrap();
    document.body().unwrap().append_child(&root).unwrap();

    let hits = Rc::new(Cell::new(0));
    let watch = {
        let hits = hits.clone();
        watch_mutations(&root, move || hits.set(hits.get() + 1)).unwrap()
    };

    let owner = document.create_element("div").unwrap();
    owner.set_id("owner");
    root.append_child(&owner).unwrap();
    sleep(Duration::ZERO).await;
    assert_eq!(hits.get(), 1);

    drop(watch);
    let rebuilt = document.create_element("div").unwrap();
    rebuilt.set_id("owner");
    root.append_child(&rebuilt).unwrap();
    sleep(Duration::ZERO).await;
    assert_eq!(hits.get(), 1);

    root.remove();
}
