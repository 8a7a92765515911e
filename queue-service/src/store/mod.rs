//! Queue persistence.
//!
//! Handlers only see the [`QueueStore`] trait; Postgres backs it in
//! production and an in-memory table backs it in tests.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use channel_id::ChannelId;
use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;

pub use memory::MemoryQueueStore;
pub use postgres::PgQueueStore;

/// Store error types.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database driver error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Backend not reachable.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// One row of `channel_fetch_queue`.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct QueueEntry {
    pub id: i32,
    pub channel_id: String,
    pub created_at: Option<NaiveDateTime>,
    pub processed: Option<bool>,
}

#[async_trait]
pub trait QueueStore: Send + Sync {
    /// Round-trip to the backend.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Create the queue table if missing.
    async fn ensure_schema(&self) -> Result<(), StoreError>;

    /// Insert `id` unless already queued.
    ///
    /// Returns the new row, or `None` when the id was already present.
    async fn enqueue(&self, id: &ChannelId) -> Result<Option<QueueEntry>, StoreError>;
}
