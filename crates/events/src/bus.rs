//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`PlatformEvent`]s. Handlers
//! publish only after the triggering write has committed; the request never
//! waits for subscribers. Share it via `Arc<EventBus>`.

use chrono::{DateTime, Utc};
use cheddit_core::types::DbId;
use serde::Serialize;
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// A question was recorded against a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryCreated {
    pub query_id: DbId,
    pub document_path: String,
    pub question: String,
    pub asker_id: DbId,
    /// Recipient of the new-query notification.
    pub document_owner_id: DbId,
    pub timestamp: DateTime<Utc>,
}

/// A domain event that occurred on the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum PlatformEvent {
    QueryCreated(QueryCreated),
}

impl PlatformEvent {
    /// Dot-separated event name, used in logs.
    pub fn event_type(&self) -> &'static str {
        match self {
            PlatformEvent::QueryCreated(_) => "query.created",
        }
    }
}

impl From<QueryCreated> for PlatformEvent {
    fn from(event: QueryCreated) -> Self {
        PlatformEvent::QueryCreated(event)
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`PlatformEvent`].
pub struct EventBus {
    sender: broadcast::Sender<PlatformEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// With no subscribers (push delivery disabled) the event is dropped.
    pub fn publish(&self, event: impl Into<PlatformEvent>) {
        // A SendError only means there are zero receivers.
        let _ = self.sender.send(event.into());
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlatformEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
