/// Single on-screen notification, mounted as its own Yew app under `<body>`
use std::cell::{Cell, RefCell};
use std::time::Duration;

use wasm_bindgen::prelude::*;
use web_sys::Element;
use yew::platform::spawn_local;
use yew::platform::time::sleep;
use yew::prelude::*;
use yew::AppHandle;

use super::components::{Toast, ToastKind, ToastProps};

pub const TOAST_CONTAINER_CLASS: &str = "yt-ext-toast-container";
const AUTO_HIDE: Duration = Duration::from_secs(5);

struct MountedToast {
    generation: u64,
    app: AppHandle<Toast>,
    container: Element,
}

thread_local! {
    static ACTIVE: RefCell<Option<MountedToast>> = const { RefCell::new(None) };
    static GENERATION: Cell<u64> = const { Cell::new(0) };
}

/// Refers to one particular toast; dismissing a replaced toast is a no-op
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToastHandle {
    generation: u64,
}

impl ToastHandle {
    pub fn dismiss(&self) {
        let mounted = ACTIVE.with(|active| {
            let mut active = active.borrow_mut();
            match active.as_ref() {
                Some(m) if m.generation == self.generation => active.take(),
                _ => None,
            }
        });
        if let Some(mounted) = mounted {
            unmount(mounted);
        }
    }
}

fn unmount(mounted: MountedToast) {
    mounted.app.destroy();
    mounted.container.remove();
}

/// Remove every toast container, including ones this module did not mount
fn clear_toasts(document: &web_sys::Document) {
    if let Some(mounted) = ACTIVE.with(|active| active.borrow_mut().take()) {
        unmount(mounted);
    }
    let selector = format!(".{}", TOAST_CONTAINER_CLASS);
    if let Ok(stale) = document.query_selector_all(&selector) {
        for node in (0..stale.length()).filter_map(|i| stale.item(i)) {
            if let Ok(element) = node.dyn_into::<Element>() {
                element.remove();
            }
        }
    }
}

fn mount(
    message: String,
    kind: ToastKind,
    copy_text: Option<String>,
    generation: u64,
) -> Result<MountedToast, JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("no body"))?;

    clear_toasts(&document);

    let container = document.create_element("div")?;
    container.set_class_name(TOAST_CONTAINER_CLASS);
    body.append_child(&container)?;

    // Deferred so a toast can close itself from its own click handler
    let on_close = Callback::from(move |_: ()| {
        spawn_local(async move { ToastHandle { generation }.dismiss() });
    });
    let props = ToastProps {
        message: message.into(),
        kind,
        copy_text: copy_text.map(AttrValue::from),
        on_close,
    };
    let app = yew::Renderer::<Toast>::with_root_and_props(container.clone(), props).render();

    Ok(MountedToast {
        generation,
        app,
        container,
    })
}

/// Replace any visible toast with `message`; it hides itself after 5 s
pub fn show_toast(message: impl Into<String>, kind: ToastKind, copy_text: Option<String>) -> ToastHandle {
    let generation = GENERATION.with(|g| {
        let next = g.get() + 1;
        g.set(next);
        next
    });
    let handle = ToastHandle { generation };

    match mount(message.into(), kind, copy_text, generation) {
        Ok(mounted) => {
            ACTIVE.with(|active| *active.borrow_mut() = Some(mounted));
            spawn_local(async move {
                sleep(AUTO_HIDE).await;
                handle.dismiss();
            });
        }
        Err(e) => log::warn!("could not show toast: {:?}", e),
    }
    handle
}
