//! In-memory queue with switchable failures, for tests and local runs.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use channel_id::ChannelId;
use chrono::Utc;

use super::{QueueEntry, QueueStore, StoreError};

#[derive(Debug, Default)]
pub struct MemoryQueueStore {
    rows: Mutex<Vec<QueueEntry>>,
    offline: AtomicBool,
    schema_broken: AtomicBool,
    schema_runs: AtomicUsize,
}

impl MemoryQueueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `ping` and `enqueue` fail.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Make `ensure_schema` fail.
    pub fn set_schema_broken(&self, broken: bool) {
        self.schema_broken.store(broken, Ordering::SeqCst);
    }

    /// Successful `ensure_schema` calls so far.
    pub fn schema_runs(&self) -> usize {
        self.schema_runs.load(Ordering::SeqCst)
    }

    pub fn rows(&self) -> Vec<QueueEntry> {
        self.rows.lock().map(|rows| rows.clone()).unwrap_or_default()
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl QueueStore for MemoryQueueStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.check_online()
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        if self.schema_broken.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("permission denied for schema".to_string()));
        }
        self.schema_runs.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn enqueue(&self, id: &ChannelId) -> Result<Option<QueueEntry>, StoreError> {
        self.check_online()?;
        let mut rows = self
            .rows
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        if rows.iter().any(|row| row.channel_id == id.as_str()) {
            return Ok(None);
        }
        let entry = QueueEntry {
            id: rows.len() as i32 + 1,
            channel_id: id.to_string(),
            created_at: Some(Utc::now().naive_utc()),
            processed: Some(false),
        };
        rows.push(entry.clone());
        Ok(Some(entry))
    }
}
