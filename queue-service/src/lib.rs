//! Intake service for the channel queue.
//!
//! Accepts channel ids from the browser extension, stores each one once in
//! `channel_fetch_queue`, and notifies a workflow webhook about new rows.

pub mod config;
pub mod error;
pub mod routes;
pub mod schema;
pub mod state;
pub mod store;
pub mod webhook;

pub use config::{SchemaBootstrap, ServiceConfig};
pub use error::ServiceError;
pub use routes::create_router;
pub use state::AppState;
pub use store::{MemoryQueueStore, PgQueueStore, QueueEntry, QueueStore, StoreError};
pub use webhook::WebhookNotifier;
