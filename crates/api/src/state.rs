use std::sync::Arc;

use cheddit_db::Store;
use cheddit_events::EventBus;
use cheddit_storage::ObjectStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; every storage handle is constructed once in `main` and
/// injected here.
#[derive(Clone)]
pub struct AppState {
    /// Relational storage (users, documents, queries, push registrations).
    pub store: Arc<dyn Store>,
    /// Object storage holding the PDF bytes.
    pub objects: Arc<dyn ObjectStore>,
    pub config: Arc<ServerConfig>,
    /// Publishes domain events for background consumers.
    pub event_bus: Arc<EventBus>,
}
