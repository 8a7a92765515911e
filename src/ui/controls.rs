/// "Find ID" / "Add to DB" buttons injected next to the video owner
///
/// The host page rebuilds the owner area on client-side navigation, so the
/// controls are torn down and re-inserted whenever any trigger fires. Every
/// insertion starts by removing whatever a previous insertion left behind.
use std::cell::RefCell;
use std::rc::Rc;

use channel_id::ChannelId;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, Window};
use yew::platform::spawn_local;
use yew::prelude::*;
use yew::AppHandle;

use super::components::{ControlButton, ToastKind};
use super::toast::show_toast;
use crate::config::ExtensionConfig;
use crate::extractor::locate_on_page;
use crate::navigation::{MutationWatch, PeriodicTask, defer, watch_location, watch_mutations};
use crate::page::is_watch_page;
use crate::submit::{Submission, SubmitError, submit_channel};

pub const WRAPPER_CLASS: &str = "yt-watch-buttons-container";
pub const FIND_BUTTON_ID: &str = "yt-ext-find";
pub const ADD_BUTTON_ID: &str = "yt-ext-add";

/// Owner-area containers, most specific first
pub const OWNER_CANDIDATES: [&str; 3] = ["#owner #upload-info", "#owner.ytd-watch-metadata", "#owner"];

const STARTUP_DELAY_MS: i32 = 500;

/// Toast text and style for a "Find ID" click
pub fn locate_feedback(id: Option<&ChannelId>) -> (String, ToastKind) {
    match id {
        Some(id) => (format!("Channel ID: {}", id), ToastKind::Info),
        None => ("Channel ID not found.".to_string(), ToastKind::Error),
    }
}

pub const MISSING_ID_MESSAGE: &str = "Channel ID not found. Please click \"Find ID\" first!";

pub fn sending_message(id: &ChannelId) -> String {
    format!("Sending channel ID {} to database...", id)
}

/// Toast text and style for a finished submission
pub fn submission_feedback(outcome: &Result<Submission, SubmitError>) -> (String, ToastKind) {
    match outcome {
        Ok(submission) if submission.inserted() => {
            (submission.reply.message.clone(), ToastKind::Success)
        }
        Ok(submission) => (submission.reply.message.clone(), ToastKind::Info),
        Err(e) => (
            format!(
                "Database error: {}. Please check if your backend server is running.",
                e
            ),
            ToastKind::Error,
        ),
    }
}

#[derive(Properties, PartialEq)]
pub struct ControlBarProps {
    pub config: Rc<ExtensionConfig>,
}

#[function_component(ControlBar)]
pub fn control_bar(props: &ControlBarProps) -> Html {
    let located = use_mut_ref(|| None::<ChannelId>);
    let submitting = use_state(|| false);

    let on_find = {
        let located = located.clone();
        let config = props.config.clone();
        Callback::from(move |_: MouseEvent| {
            let id = locate_on_page(&config.storage_key).channel_id;
            let (message, kind) = locate_feedback(id.as_ref());
            show_toast(message, kind, id.as_ref().map(ChannelId::to_string));
            *located.borrow_mut() = id;
        })
    };

    let on_add = {
        let located = located.clone();
        let submitting = submitting.clone();
        let config = props.config.clone();
        Callback::from(move |_: MouseEvent| {
            let known = located.borrow().clone();
            let Some(id) = known.or_else(|| locate_on_page(&config.storage_key).channel_id) else {
                show_toast(MISSING_ID_MESSAGE, ToastKind::Error, None);
                return;
            };
            *located.borrow_mut() = Some(id.clone());

            let loading = show_toast(sending_message(&id), ToastKind::Info, None);
            let endpoint = config.endpoint.clone();
            let submitting = submitting.clone();
            submitting.set(true);
            spawn_local(async move {
                let outcome = submit_channel(&endpoint, &id).await;
                loading.dismiss();
                submitting.set(false);
                if let Err(e) = &outcome {
                    log::warn!("submitting {} failed: {}", id, e);
                }
                let (message, kind) = submission_feedback(&outcome);
                let copy = outcome.is_ok().then(|| id.to_string());
                show_toast(message, kind, copy);
            });
        })
    };

    html! {
        <>
            <ControlButton id={FIND_BUTTON_ID} onclick={on_find}>{"Find ID"}</ControlButton>
            <ControlButton id={ADD_BUTTON_ID} onclick={on_add} disabled={*submitting}>{"Add to DB"}</ControlButton>
        </>
    }
}

thread_local! {
    static MOUNTED: RefCell<Vec<AppHandle<ControlBar>>> = const { RefCell::new(Vec::new()) };
    static WATCHERS: RefCell<Option<ControlWatchers>> = const { RefCell::new(None) };
}

fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))
}

/// Remove every injected wrapper and any stray button outside one
pub fn clean_up_controls(document: &Document) {
    for app in MOUNTED.with(|mounted| mounted.borrow_mut().drain(..).collect::<Vec<_>>()) {
        app.destroy();
    }

    let selector = format!(".{}, #{}, #{}", WRAPPER_CLASS, FIND_BUTTON_ID, ADD_BUTTON_ID);
    let Ok(leftovers) = document.query_selector_all(&selector) else {
        return;
    };
    let wrapper_selector = format!(".{}", WRAPPER_CLASS);
    for node in (0..leftovers.length()).filter_map(|i| leftovers.item(i)) {
        let Ok(element) = node.dyn_into::<Element>() else {
            continue;
        };
        let target = element
            .closest(&wrapper_selector)
            .ok()
            .flatten()
            .unwrap_or(element);
        target.remove();
    }
}

fn owner_container(document: &Document) -> Option<Element> {
    OWNER_CANDIDATES
        .iter()
        .find_map(|selector| document.query_selector(selector).ok().flatten())
}

/// Clean up, then inject one control pair if this is a watch page with an
/// owner area. Returns whether controls were inserted.
pub fn insert_controls(config: Rc<ExtensionConfig>) -> Result<bool, JsValue> {
    let document = document()?;
    clean_up_controls(&document);

    let href = document.location().and_then(|l| l.href().ok()).unwrap_or_default();
    if !is_watch_page(&href) {
        return Ok(false);
    }
    let Some(container) = owner_container(&document) else {
        return Ok(false);
    };

    let wrapper = document.create_element("div")?;
    wrapper.set_class_name(WRAPPER_CLASS);
    container.append_child(&wrapper)?;

    let app = yew::Renderer::<ControlBar>::with_root_and_props(wrapper, ControlBarProps { config })
        .render();
    MOUNTED.with(|mounted| mounted.borrow_mut().push(app));
    Ok(true)
}

/// Everything that keeps the controls alive across navigations
struct ControlWatchers {
    _location: PeriodicTask,
    _mutations: MutationWatch,
    window: Window,
    document: Document,
    page_update_event: String,
    on_page_update: Closure<dyn FnMut(Event)>,
    on_load: Closure<dyn FnMut(Event)>,
}

impl Drop for ControlWatchers {
    fn drop(&mut self) {
        let _ = self.document.remove_event_listener_with_callback_and_bool(
            &self.page_update_event,
            self.on_page_update.as_ref().unchecked_ref(),
            true,
        );
        let _ = self
            .window
            .remove_event_listener_with_callback("load", self.on_load.as_ref().unchecked_ref());
    }
}

fn reinserter(config: Rc<ExtensionConfig>) -> impl Fn() + Clone + 'static {
    move || {
        // Timers queued before `stop_controls` may still fire
        if !WATCHERS.with(|w| w.borrow().is_some()) {
            return;
        }
        if let Err(e) = insert_controls(config.clone()) {
            log::warn!("inserting controls failed: {:?}", e);
        }
    }
}

/// Install every re-insertion trigger; replaces a previous installation
pub fn start_controls(config: &ExtensionConfig) -> Result<(), JsValue> {
    stop_controls();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = document()?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("no body"))?;
    let config = Rc::new(config.clone());
    let reinsert = reinserter(config.clone());

    let location = watch_location(config.poll_interval_ms, config.navigation_settle_ms, reinsert.clone())?;

    let on_page_update = {
        let reinsert = reinsert.clone();
        let settle_ms = config.page_update_settle_ms;
        Closure::wrap(Box::new(move |_: Event| {
            defer(settle_ms, reinsert.clone());
        }) as Box<dyn FnMut(Event)>)
    };
    document.add_event_listener_with_callback_and_bool(
        &config.page_update_event,
        on_page_update.as_ref().unchecked_ref(),
        true,
    )?;

    let on_load = {
        let reinsert = reinsert.clone();
        Closure::wrap(Box::new(move |_: Event| reinsert()) as Box<dyn FnMut(Event)>)
    };
    window.add_event_listener_with_callback("load", on_load.as_ref().unchecked_ref())?;

    let mutations = watch_mutations(&body, reinsert.clone())?;

    WATCHERS.with(|w| {
        *w.borrow_mut() = Some(ControlWatchers {
            _location: location,
            _mutations: mutations,
            window,
            document,
            page_update_event: config.page_update_event.clone(),
            on_page_update,
            on_load,
        })
    });

    defer(STARTUP_DELAY_MS, reinsert);
    Ok(())
}

/// Cancel every trigger and remove the controls
pub fn stop_controls() {
    let watchers = WATCHERS.with(|w| w.borrow_mut().take());
    if let Some(watchers) = watchers {
        clean_up_controls(&watchers.document);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submit::interpret_response;

    const ID: &str = "UC1234567890123456789012";

    #[test]
    fn test_locate_feedback() {
        let id = ChannelId::parse(ID).unwrap();
        assert_eq!(
            locate_feedback(Some(&id)),
            (format!("Channel ID: {}", ID), ToastKind::Info)
        );
        assert_eq!(
            locate_feedback(None),
            ("Channel ID not found.".to_string(), ToastKind::Error)
        );
    }

    #[test]
    fn test_sending_message() {
        let id = ChannelId::parse(ID).unwrap();
        assert_eq!(
            sending_message(&id),
            "Sending channel ID UC1234567890123456789012 to database..."
        );
    }

    #[test]
    fn test_submission_feedback_styles() {
        let inserted = interpret_response(201, r#"{"message":"Inserted"}"#);
        assert_eq!(
            submission_feedback(&inserted),
            ("Inserted".to_string(), ToastKind::Success)
        );

        let duplicate = interpret_response(200, r#"{"message":"Channel ID already exists"}"#);
        assert_eq!(
            submission_feedback(&duplicate),
            ("Channel ID already exists".to_string(), ToastKind::Info)
        );
    }

    #[test]
    fn test_submission_failure_message() {
        let failed = interpret_response(500, r#"{"error":"Internal server error"}"#);
        let (message, kind) = submission_feedback(&failed);
        assert_eq!(
            message,
            "Database error: Internal server error. Please check if your backend server is running."
        );
        assert_eq!(kind, ToastKind::Error);
    }

    #[test]
    fn test_owner_candidates_prefer_specific_containers() {
        assert_eq!(OWNER_CANDIDATES.last(), Some(&"#owner"));
        assert!(OWNER_CANDIDATES[0].contains("#upload-info"));
    }
}
