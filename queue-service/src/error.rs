//! Request error types and their HTTP mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;

/// Service error types.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Body missing, not JSON, or `channelId` not a channel id.
    #[error("Invalid or missing channelId")]
    InvalidChannelId,

    /// Queue table could not be created.
    #[error("Database setup error")]
    SchemaSetup(#[source] StoreError),

    /// Insert failed.
    #[error("Internal server error")]
    Storage(#[source] StoreError),
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::InvalidChannelId => StatusCode::BAD_REQUEST,
            ServiceError::SchemaSetup(_) | ServiceError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        match &self {
            ServiceError::InvalidChannelId => {}
            ServiceError::SchemaSetup(e) => error!("Database setup error: {}", e),
            ServiceError::Storage(e) => error!("Database error: {}", e),
        }
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
