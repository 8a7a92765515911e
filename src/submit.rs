/// HTTP client for the queue service's intake endpoint
use channel_id::ChannelId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("{0}")]
    Network(String),
    #[error("{message}")]
    Server { status: u16, message: String },
    #[error("unexpected response body: {0}")]
    UnexpectedBody(String),
    #[error("could not encode request: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct SubmitRequest<'a> {
    #[serde(rename = "channelId")]
    channel_id: &'a str,
}

/// Success body of `POST /api/add-channel`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubmitReply {
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub webhook: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub status: u16,
    pub reply: SubmitReply,
}

impl Submission {
    /// First insert (201) as opposed to "already queued" (200)
    pub fn inserted(&self) -> bool {
        self.status == 201
    }
}

/// Turn a status code and raw body into an outcome
pub fn interpret_response(status: u16, body: &str) -> Result<Submission, SubmitError> {
    if (200..300).contains(&status) {
        let reply: SubmitReply = serde_json::from_str(body)
            .map_err(|e| SubmitError::UnexpectedBody(e.to_string()))?;
        return Ok(Submission { status, reply });
    }
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            ["error", "message"]
                .iter()
                .find_map(|key| v.get(key).and_then(Value::as_str).map(str::to_string))
        })
        .unwrap_or_else(|| format!("Server error: {}", status));
    Err(SubmitError::Server { status, message })
}

fn js_error(e: JsValue) -> SubmitError {
    SubmitError::Network(
        e.as_string()
            .or_else(|| {
                e.dyn_ref::<js_sys::Error>()
                    .map(|err| String::from(err.message()))
            })
            .unwrap_or_else(|| "Failed to fetch".to_string()),
    )
}

/// POST the id to `endpoint`
pub async fn submit_channel(endpoint: &str, id: &ChannelId) -> Result<Submission, SubmitError> {
    let window = web_sys::window().ok_or_else(|| SubmitError::Network("no window".to_string()))?;
    let body = serde_json::to_string(&SubmitRequest {
        channel_id: id.as_str(),
    })?;

    let init = RequestInit::new();
    init.set_method("POST");
    init.set_mode(RequestMode::Cors);
    init.set_body(&JsValue::from_str(&body));

    let request = Request::new_with_str_and_init(endpoint, &init).map_err(js_error)?;
    let headers = request.headers();
    headers.set("Content-Type", "application/json").map_err(js_error)?;
    headers.set("Accept", "application/json").map_err(js_error)?;

    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_error)?
        .dyn_into()
        .map_err(js_error)?;
    let text = JsFuture::from(response.text().map_err(js_error)?)
        .await
        .map_err(js_error)?
        .as_string()
        .unwrap_or_default();

    interpret_response(response.status(), &text)
}
