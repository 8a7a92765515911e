/// Client-side navigation detection for the single-page host
///
/// Polling the URL is a stand-in for a native navigation event; it sits
/// behind `PeriodicTask` so it can be swapped without touching callers.
use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{Element, MutationObserver, MutationObserverInit, MutationRecord, Node};

/// Remembers the last seen URL
#[derive(Debug, Clone, Default)]
pub struct LocationTracker {
    last: Option<String>,
}

impl LocationTracker {
    pub fn new(initial: &str) -> Self {
        LocationTracker {
            last: Some(initial.to_string()),
        }
    }

    /// Record `href`; true when it differs from the previous observation
    pub fn observe(&mut self, href: &str) -> bool {
        if self.last.as_deref() == Some(href) {
            return false;
        }
        self.last = Some(href.to_string());
        true
    }
}

/// Summary of one node added to the document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddedNode {
    pub id: String,
    pub contains_owner: bool,
    pub contains_meta: bool,
}

/// Mutation batches larger than this always trigger a re-insert
pub const MUTATION_BURST: usize = 5;

/// Whether a batch of DOM mutations may have (re)built the owner area
pub fn mutation_needs_reinsert(record_count: usize, added: &[AddedNode], watch_page: bool) -> bool {
    let owner_added = added.iter().any(|node| {
        node.id == "owner"
            || node.contains_owner
            || (watch_page && (node.id == "meta" || node.contains_meta))
    });
    owner_added || record_count > MUTATION_BURST
}

/// A cancellable `setInterval`; cleared on drop
pub struct PeriodicTask {
    handle: i32,
    _callback: Closure<dyn FnMut()>,
}

impl PeriodicTask {
    pub fn start<F>(interval_ms: i32, callback: F) -> Result<Self, JsValue>
    where
        F: FnMut() + 'static,
    {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let callback = Closure::wrap(Box::new(callback) as Box<dyn FnMut()>);
        let handle = window.set_interval_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            interval_ms,
        )?;
        Ok(PeriodicTask {
            handle,
            _callback: callback,
        })
    }
}

impl Drop for PeriodicTask {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            window.clear_interval_with_handle(self.handle);
        }
    }
}

/// Run `f` once after `delay_ms`
pub fn defer<F>(delay_ms: i32, f: F)
where
    F: FnOnce() + 'static,
{
    let Some(window) = web_sys::window() else {
        return;
    };
    let callback = Closure::once_into_js(f);
    if let Err(e) = window
        .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay_ms)
    {
        log::warn!("setTimeout failed: {:?}", e);
    }
}

fn current_href() -> String {
    web_sys::window()
        .and_then(|w| w.location().href().ok())
        .unwrap_or_default()
}

/// Polls the URL and calls `on_change` `settle_ms` after each change
pub fn watch_location<F>(interval_ms: i32, settle_ms: i32, on_change: F) -> Result<PeriodicTask, JsValue>
where
    F: Fn() + 'static,
{
    let tracker = RefCell::new(LocationTracker::new(&current_href()));
    let on_change = Rc::new(on_change);
    PeriodicTask::start(interval_ms, move || {
        if tracker.borrow_mut().observe(&current_href()) {
            let on_change = on_change.clone();
            defer(settle_ms, move || (*on_change)());
        }
    })
}

fn describe_added(node: &Node) -> Option<AddedNode> {
    let element = node.dyn_ref::<Element>()?;
    let contains = |selector: &str| matches!(element.query_selector(selector), Ok(Some(_)));
    Some(AddedNode {
        id: element.id(),
        contains_owner: contains("#owner"),
        contains_meta: contains("#meta"),
    })
}

/// A `MutationObserver` together with its callback; disconnected on drop
pub struct MutationWatch {
    observer: MutationObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, MutationObserver)>,
}

impl Drop for MutationWatch {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// Observe `root` for subtree changes that may need the controls re-inserted
pub fn watch_mutations<F>(root: &Node, on_burst: F) -> Result<MutationWatch, JsValue>
where
    F: Fn() + 'static,
{
    let callback = Closure::wrap(Box::new(move |records: js_sys::Array, _: MutationObserver| {
        let mut added = Vec::new();
        for record in records.iter() {
            let Ok(record) = record.dyn_into::<MutationRecord>() else {
                continue;
            };
            let nodes = record.added_nodes();
            added.extend(
                (0..nodes.length())
                    .filter_map(|i| nodes.item(i))
                    .filter_map(|node| describe_added(&node)),
            );
        }
        let watch_page = crate::page::is_watch_page(&current_href());
        if mutation_needs_reinsert(records.length() as usize, &added, watch_page) {
            on_burst();
        }
    }) as Box<dyn FnMut(js_sys::Array, MutationObserver)>);

    let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;
    let options = MutationObserverInit::new();
    options.set_child_list(true);
    options.set_subtree(true);
    observer.observe_with_options(root, &options)?;
    Ok(MutationWatch {
        observer,
        _callback: callback,
    })
}
