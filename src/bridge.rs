/// Page-context to content-script handoff
///
/// Code running in the page context can read page globals but cannot touch
/// extension APIs; the content script is the other way around. The page side
/// publishes a `BridgePayload` as the JSON-string `detail` of a custom DOM
/// event, and a single content-side listener validates it and writes it to
/// the session cache.
use channel_id::{ChannelId, ParseError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wasm_bindgen::prelude::*;
use web_sys::{CustomEvent, CustomEventInit, Document, Event};

use crate::cache::{self, CacheError, SessionCache};
use crate::config::ExtensionConfig;
use crate::extractor::page_state::{INITIAL_DATA, observed_channel};
use crate::page::{LiveDocument, PageSurface, is_watch_page};

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("event carried no string detail")]
    MissingDetail,
    #[error("payload is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("payload has no channelId")]
    MissingChannelId,
    #[error("payload channelId rejected: {0}")]
    Invalid(#[from] ParseError),
    #[error(transparent)]
    Cache(#[from] CacheError),
    #[error("could not dispatch event: {0}")]
    Dispatch(String),
}

/// Wire shape of the event detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgePayload {
    #[serde(rename = "channelId", default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
}

impl BridgePayload {
    pub fn new(id: &ChannelId) -> Self {
        BridgePayload {
            channel_id: Some(id.to_string()),
        }
    }

    pub fn encode(&self) -> String {
        // A struct with one optional string field always serializes
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Validate a received detail string and store the id it carries
pub fn accept_payload(
    detail: &str,
    cache: &dyn SessionCache,
    storage_key: &str,
) -> Result<ChannelId, BridgeError> {
    let payload: BridgePayload = serde_json::from_str(detail)?;
    let raw = payload.channel_id.ok_or(BridgeError::MissingChannelId)?;
    let id = ChannelId::parse(&raw)?;
    cache.set(storage_key, id.as_str())?;
    Ok(id)
}

/// Fire the bridge event on `document`
pub fn publish(document: &Document, event_name: &str, id: &ChannelId) -> Result<(), BridgeError> {
    let init = CustomEventInit::new();
    init.set_detail(&JsValue::from_str(&BridgePayload::new(id).encode()));
    let event = CustomEvent::new_with_event_init_dict(event_name, &init)
        .map_err(|e| BridgeError::Dispatch(format!("{:?}", e)))?;
    document
        .dispatch_event(&event)
        .map(|_| ())
        .map_err(|e| BridgeError::Dispatch(format!("{:?}", e)))
}

/// Page context: derive the id from page state and publish it
fn publish_from_page_state(event_name: &str) {
    let Some(page) = LiveDocument::current() else {
        return;
    };
    let data = match page.global_json(INITIAL_DATA) {
        Ok(Some(data)) => data,
        Ok(None) => return,
        Err(e) => {
            log::debug!("page state unreadable: {}", e);
            return;
        }
    };
    let Some(id) = observed_channel(&data, is_watch_page(&page.location())) else {
        return;
    };
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    if let Err(e) = publish(&document, event_name, &id) {
        log::debug!("bridge publish failed: {}", e);
    }
}

/// Page context: publish now and after every page-data update
pub fn start_page_observer(config: &ExtensionConfig) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let event_name = config.bridge_event.clone();

    let on_update = Closure::wrap(Box::new(move |_: Event| {
        publish_from_page_state(&event_name);
    }) as Box<dyn FnMut(Event)>);
    window.add_event_listener_with_callback_and_bool(
        &config.page_update_event,
        on_update.as_ref().unchecked_ref(),
        true,
    )?;
    // Listener lives as long as the page
    on_update.forget();

    publish_from_page_state(&config.bridge_event);
    Ok(())
}

/// Content-script side: the single consumer of bridge events
pub fn start_content_listener(config: &ExtensionConfig) -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let store = cache::open();
    let storage_key = config.storage_key.clone();

    let on_payload = Closure::wrap(Box::new(move |event: Event| {
        let detail = event
            .dyn_ref::<CustomEvent>()
            .and_then(|e| e.detail().as_string())
            .ok_or(BridgeError::MissingDetail);
        match detail.and_then(|d| accept_payload(&d, store.as_ref(), &storage_key)) {
            Ok(id) => log::debug!("cached channel id {}", id),
            Err(e) => log::debug!("dropped bridge payload: {}", e),
        }
    }) as Box<dyn FnMut(Event)>);
    document.add_event_listener_with_callback_and_bool(
        &config.bridge_event,
        on_payload.as_ref().unchecked_ref(),
        false,
    )?;
    on_payload.forget();
    Ok(())
}
