/// Injected UI pieces: the toast body and the control buttons

use std::time::Duration;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use yew::platform::spawn_local;
use yew::platform::time::sleep;
use yew::prelude::*;

pub const COPY_LABEL: &str = "Copy";
pub const COPIED_LABEL: &str = "✓ Copied";
pub const COPY_FAILED_LABEL: &str = "Failed";
const COPY_LABEL_RESET: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastKind {
    #[default]
    Info,
    Success,
    Error,
}

impl ToastKind {
    pub fn background(&self) -> &'static str {
        match self {
            ToastKind::Info => "rgba(33, 33, 33, 0.9)",
            ToastKind::Success => "rgba(46, 125, 50, 0.9)",
            ToastKind::Error => "rgba(198, 40, 40, 0.9)",
        }
    }
}

/// `navigator.clipboard.writeText`, looked up dynamically
async fn write_clipboard(text: &str) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let clipboard = js_sys::Reflect::get(&window.navigator(), &JsValue::from_str("clipboard"))?;
    let write_text: js_sys::Function =
        js_sys::Reflect::get(&clipboard, &JsValue::from_str("writeText"))?.dyn_into()?;
    let promise: js_sys::Promise = write_text
        .call1(&clipboard, &JsValue::from_str(text))?
        .dyn_into()?;
    JsFuture::from(promise).await?;
    Ok(())
}

#[derive(Properties, PartialEq)]
pub struct CopyButtonProps {
    pub text: AttrValue,
}

#[function_component(CopyButton)]
pub fn copy_button(props: &CopyButtonProps) -> Html {
    let label = use_state(|| COPY_LABEL);

    let onclick = {
        let label = label.clone();
        let text = props.text.clone();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            let label = label.clone();
            let text = text.clone();
            spawn_local(async move {
                match write_clipboard(&text).await {
                    Ok(()) => label.set(COPIED_LABEL),
                    Err(e) => {
                        log::debug!("clipboard write failed: {:?}", e);
                        label.set(COPY_FAILED_LABEL);
                    }
                }
                sleep(COPY_LABEL_RESET).await;
                label.set(COPY_LABEL);
            });
        })
    };

    html! {
        <button
            onclick={onclick}
            style="padding: 4px 8px; border-radius: 4px; background-color: #ffffff; color: #000000; border: none; cursor: pointer; font-size: 12px; font-weight: 500; margin-left: 8px;"
        >
            {*label}
        </button>
    }
}

#[derive(Properties, PartialEq)]
pub struct ToastProps {
    pub message: AttrValue,
    #[prop_or_default]
    pub kind: ToastKind,
    /// Text for the optional Copy button
    #[prop_or_default]
    pub copy_text: Option<AttrValue>,
    pub on_close: Callback<()>,
}

#[function_component(Toast)]
pub fn toast(props: &ToastProps) -> Html {
    let style = format!(
        "position: fixed; top: 20px; right: 20px; z-index: 9999; background-color: {}; color: white; padding: 12px 16px; border-radius: 4px; font-family: \"Roboto\", \"Arial\", sans-serif; font-size: 14px; max-width: 400px; box-shadow: 0 3px 6px rgba(0, 0, 0, 0.16); display: flex; align-items: center; justify-content: space-between;",
        props.kind.background()
    );
    let on_close = props.on_close.reform(|_: MouseEvent| ());

    html! {
        <div class="yt-ext-toast" style={style}>
            <div style="display: flex; align-items: center; gap: 8px; flex-grow: 1;">
                <span>{props.message.clone()}</span>
                if let Some(text) = &props.copy_text {
                    <CopyButton text={text.clone()} />
                }
            </div>
            <button
                onclick={on_close}
                style="background-color: transparent; border: none; color: white; cursor: pointer; font-size: 20px; font-weight: bold; margin-left: 8px; padding: 0 5px; line-height: 1;"
            >
                {"×"}
            </button>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ControlButtonProps {
    pub id: AttrValue,
    pub onclick: Callback<MouseEvent>,
    pub children: Children,
    #[prop_or(false)]
    pub disabled: bool,
}

#[function_component(ControlButton)]
pub fn control_button(props: &ControlButtonProps) -> Html {
    let disabled_style = if props.disabled {
        "opacity: 0.5; cursor: not-allowed;"
    } else {
        ""
    };
    let style = format!(
        "padding: 6px 12px; margin-left: 8px; border: none; border-radius: 18px; font-size: 14px; cursor: pointer; font-weight: 500; background-color: #f2f2f2; color: #0f0f0f; {}",
        disabled_style
    );

    html! {
        <button
            id={props.id.clone()}
            class="yt-extension-btn"
            onclick={props.onclick.clone()}
            disabled={props.disabled}
            style={style}
        >
            {props.children.clone()}
        </button>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_palette_is_distinct() {
        let colors = [
            ToastKind::Info.background(),
            ToastKind::Success.background(),
            ToastKind::Error.background(),
        ];
        assert_ne!(colors[0], colors[1]);
        assert_ne!(colors[1], colors[2]);
        assert_eq!(ToastKind::default(), ToastKind::Info);
    }
}
