//! Once-per-process table bootstrap.
//!
//! A failed attempt leaves the guard unset, so the next caller retries.

use tokio::sync::OnceCell;
use tracing::info;

use crate::store::{QueueStore, StoreError};

#[derive(Debug, Default)]
pub struct SchemaGuard {
    ready: OnceCell<()>,
}

impl SchemaGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        self.ready.initialized()
    }

    pub async fn ensure(&self, store: &dyn QueueStore) -> Result<(), StoreError> {
        self.ready
            .get_or_try_init(|| async {
                store.ensure_schema().await?;
                info!("Queue table ready");
                Ok::<(), StoreError>(())
            })
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryQueueStore;

    #[tokio::test]
    async fn test_runs_once() {
        let store = MemoryQueueStore::new();
        let guard = SchemaGuard::new();

        guard.ensure(&store).await.unwrap();
        guard.ensure(&store).await.unwrap();

        assert!(guard.is_ready());
        assert_eq!(store.schema_runs(), 1);
    }

    #[tokio::test]
    async fn test_failure_is_retried() {
        let store = MemoryQueueStore::new();
        let guard = SchemaGuard::new();

        store.set_schema_broken(true);
        assert!(guard.ensure(&store).await.is_err());
        assert!(!guard.is_ready());

        store.set_schema_broken(false);
        guard.ensure(&store).await.unwrap();
        assert!(guard.is_ready());
        assert_eq!(store.schema_runs(), 1);
    }
}
