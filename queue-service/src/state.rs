//! Application state.

use std::sync::Arc;

use crate::schema::SchemaGuard;
use crate::store::QueueStore;
use crate::webhook::WebhookNotifier;

/// Application state shared across handlers.
pub struct AppState {
    pub store: Arc<dyn QueueStore>,
    pub schema: SchemaGuard,
    pub webhook: Option<WebhookNotifier>,
}

impl AppState {
    pub fn new(store: Arc<dyn QueueStore>, webhook: Option<WebhookNotifier>) -> Self {
        Self {
            store,
            schema: SchemaGuard::new(),
            webhook,
        }
    }

    /// Run the table bootstrap unless it already succeeded.
    pub async fn ensure_schema(&self) -> Result<(), crate::store::StoreError> {
        self.schema.ensure(self.store.as_ref()).await
    }
}
