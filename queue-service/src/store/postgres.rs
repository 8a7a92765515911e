//! Postgres-backed queue.

use async_trait::async_trait;
use channel_id::ChannelId;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::debug;

use super::{QueueEntry, QueueStore, StoreError};
use crate::config::ServiceConfig;

pub const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS channel_fetch_queue (
    id SERIAL PRIMARY KEY,
    channel_id TEXT UNIQUE NOT NULL,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    processed BOOLEAN DEFAULT FALSE
)";

const INSERT_CHANNEL: &str = "INSERT INTO channel_fetch_queue (channel_id) VALUES ($1)
    ON CONFLICT (channel_id) DO NOTHING
    RETURNING id, channel_id, created_at, processed";

#[derive(Debug, Clone)]
pub struct PgQueueStore {
    pool: PgPool,
}

impl PgQueueStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Build a pool without connecting; the first query opens a connection.
    pub fn connect_lazy(config: &ServiceConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout())
            .idle_timeout(config.idle_timeout())
            .connect_lazy_with(config.connect_options()?);
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl QueueStore for PgQueueStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT NOW()").execute(&self.pool).await?;
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        debug!("channel_fetch_queue is present");
        Ok(())
    }

    async fn enqueue(&self, id: &ChannelId) -> Result<Option<QueueEntry>, StoreError> {
        let entry = sqlx::query_as::<_, QueueEntry>(INSERT_CHANNEL)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;
        Ok(entry)
    }
}
