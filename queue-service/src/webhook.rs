//! Workflow webhook notified after a first-time insert.

use std::time::Duration;

use channel_id::ChannelId;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

/// Webhook error types.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The webhook answered with a non-success status.
    #[error("Request failed with status code {status}")]
    Status {
        status: u16,
        reason: String,
        body: String,
    },

    /// The request never got a response.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
}

impl WebhookError {
    /// Short machine-readable failure class.
    pub fn code(&self) -> &'static str {
        match self {
            WebhookError::Status { status, .. } if *status >= 500 => "ERR_BAD_RESPONSE",
            WebhookError::Status { .. } => "ERR_BAD_REQUEST",
            WebhookError::Transport(e) if e.is_timeout() => "ETIMEDOUT",
            WebhookError::Transport(e) if e.is_connect() => "ECONNREFUSED",
            WebhookError::Transport(_) => "ERR_NETWORK",
        }
    }
}

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    channel_id: &'a str,
}

/// Successful webhook call, as reported back to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookAck {
    pub status: u16,
    pub message: String,
}

/// Failed webhook call, as reported back to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookFailure {
    pub error: String,
    pub code: String,
}

impl From<&WebhookError> for WebhookFailure {
    fn from(err: &WebhookError) -> Self {
        Self {
            error: err.to_string(),
            code: err.code().to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, WebhookError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// POST `{"channel_id": id}` to the webhook.
    pub async fn notify(&self, id: &ChannelId) -> Result<WebhookAck, WebhookError> {
        let response = self
            .client
            .post(&self.url)
            .json(&WebhookPayload {
                channel_id: id.as_str(),
            })
            .send()
            .await?;

        let status = response.status();
        let reason = status.canonical_reason().unwrap_or_default().to_string();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WebhookError::Status {
                status: status.as_u16(),
                reason,
                body,
            });
        }

        info!(channel_id = %id, status = status.as_u16(), "Webhook triggered");
        Ok(WebhookAck {
            status: status.as_u16(),
            message: reason,
        })
    }
}

/// Log a webhook failure with whatever response detail exists.
pub fn log_failure(id: &ChannelId, err: &WebhookError) {
    match err {
        WebhookError::Status {
            status,
            reason,
            body,
        } => error!(
            channel_id = %id,
            code = err.code(),
            status,
            reason = %reason,
            body = %body,
            "Webhook error: {}", err
        ),
        WebhookError::Transport(_) => error!(
            channel_id = %id,
            code = err.code(),
            "Webhook error: {} (no response)", err
        ),
    }
}

#[cfg(test)]
#[path = "webhook_tests.rs"]
mod tests;
