//! HTTP route definitions.
//!
//! ```text
//! GET  /                 - Health check (database round-trip)
//! POST /api/add-channel  - Queue a channel id, then notify the webhook
//! ```

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use channel_id::ChannelId;
use serde::Serialize;
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

use crate::error::ServiceError;
use crate::state::AppState;
use crate::store::QueueEntry;
use crate::webhook::{self, WebhookAck, WebhookFailure};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/api/add-channel", post(add_channel))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthReply {
    status: &'static str,
    database: &'static str,
    message: &'static str,
}

/// GET /
async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthReply {
                status: "ok",
                database: "connected",
                message: "Server is running and connected to the database",
            }),
        ),
        Err(e) => {
            error!("Health check failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthReply {
                    status: "error",
                    database: "disconnected",
                    message: "Server is running but database connection failed",
                }),
            )
        }
    }
}

/// Webhook part of a 201 reply.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum WebhookOutcome {
    Triggered(WebhookAck),
    Failed(WebhookFailure),
}

#[derive(Debug, Serialize)]
struct AddChannelReply {
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<QueueEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    webhook: Option<WebhookOutcome>,
}

/// Pull a valid channel id out of the request body.
fn requested_channel(payload: Result<Json<Value>, JsonRejection>) -> Result<ChannelId, ServiceError> {
    let Json(body) = payload.map_err(|e| {
        debug!("Rejected add-channel body: {}", e);
        ServiceError::InvalidChannelId
    })?;
    let raw = body
        .get("channelId")
        .and_then(Value::as_str)
        .ok_or(ServiceError::InvalidChannelId)?;
    ChannelId::parse(raw).map_err(|e| {
        debug!("Rejected channelId {:?}: {}", raw, e);
        ServiceError::InvalidChannelId
    })
}

/// POST /api/add-channel
async fn add_channel(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ServiceError> {
    let id = requested_channel(payload)?;
    state.ensure_schema().await.map_err(ServiceError::SchemaSetup)?;

    let Some(entry) = state
        .store
        .enqueue(&id)
        .await
        .map_err(ServiceError::Storage)?
    else {
        debug!(channel_id = %id, "Already queued");
        let reply = AddChannelReply {
            message: "Channel ID already exists",
            data: None,
            webhook: None,
        };
        return Ok((StatusCode::OK, Json(reply)).into_response());
    };
    info!(channel_id = %id, row = entry.id, "Queued channel");

    let reply = match &state.webhook {
        None => AddChannelReply {
            message: "Inserted",
            data: Some(entry),
            webhook: None,
        },
        Some(notifier) => match notifier.notify(&id).await {
            Ok(ack) => AddChannelReply {
                message: "Inserted & webhook triggered successfully",
                data: Some(entry),
                webhook: Some(WebhookOutcome::Triggered(ack)),
            },
            Err(e) => {
                webhook::log_failure(&id, &e);
                AddChannelReply {
                    message: "Inserted but webhook failed",
                    data: Some(entry),
                    webhook: Some(WebhookOutcome::Failed(WebhookFailure::from(&e))),
                }
            }
        },
    };
    Ok((StatusCode::CREATED, Json(reply)).into_response())
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
