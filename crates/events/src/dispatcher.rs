//! New-query push notifications.
//!
//! [`NotificationDispatcher`] subscribes to the event bus and, for every
//! [`QueryCreated`], pushes a notification to the document owner's single
//! registration. Delivery is best-effort: a missing registration is a no-op
//! and transport failures are logged, never surfaced to the asker.

use std::sync::Arc;

use cheddit_core::push::NotificationPayload;
use cheddit_db::Store;
use reqwest::Url;
use tokio::sync::broadcast;

use crate::bus::{PlatformEvent, QueryCreated};
use crate::delivery::PushTransport;

/// What happened to one notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Delivered,
    /// The owner has no push registration.
    NoRegistration,
    /// Lookup or delivery failed; already logged.
    Failed,
}

pub struct NotificationDispatcher {
    store: Arc<dyn Store>,
    transport: Arc<dyn PushTransport>,
    public_base_url: String,
}

impl NotificationDispatcher {
    pub fn new(
        store: Arc<dyn Store>,
        transport: Arc<dyn PushTransport>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            store,
            transport,
            public_base_url: public_base_url.into(),
        }
    }

    /// Run the dispatch loop.
    ///
    /// Exits when the channel is closed (the [`EventBus`](crate::EventBus)
    /// is dropped during shutdown).
    pub async fn run(self, mut receiver: broadcast::Receiver<PlatformEvent>) {
        tracing::info!("Notification dispatcher started");
        loop {
            match receiver.recv().await {
                Ok(PlatformEvent::QueryCreated(event)) => {
                    self.dispatch(&event).await;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notification dispatcher lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification dispatcher shutting down");
                    break;
                }
            }
        }
    }

    /// Notify the owner of `event.document_path` about a new question.
    pub async fn dispatch(&self, event: &QueryCreated) -> DispatchOutcome {
        let registration = match self
            .store
            .find_push_subscription(event.document_owner_id)
            .await
        {
            Ok(Some(row)) => row,
            Ok(None) => {
                tracing::debug!(
                    owner_id = %event.document_owner_id,
                    "Document owner has no push registration"
                );
                return DispatchOutcome::NoRegistration;
            }
            Err(e) => {
                tracing::warn!(
                    owner_id = %event.document_owner_id,
                    error = %e,
                    "Failed to load push registration"
                );
                return DispatchOutcome::Failed;
            }
        };

        let payload =
            NotificationPayload::new_query(&event.question, self.document_link(&event.document_path));

        match self.transport.send(&registration.subscription, &payload).await {
            Ok(()) => {
                tracing::info!(
                    query_id = %event.query_id,
                    owner_id = %event.document_owner_id,
                    "New-query notification delivered"
                );
                DispatchOutcome::Delivered
            }
            Err(e) => {
                tracing::warn!(
                    query_id = %event.query_id,
                    owner_id = %event.document_owner_id,
                    error = %e,
                    "New-query notification failed"
                );
                DispatchOutcome::Failed
            }
        }
    }

    /// `<base>/?pdf=<path>`, falling back to the site root when the base URL
    /// does not parse.
    fn document_link(&self, document_path: &str) -> String {
        let root = format!("{}/", self.public_base_url.trim_end_matches('/'));
        match Url::parse_with_params(&root, &[("pdf", document_path)]) {
            Ok(url) => url.to_string(),
            Err(_) => "/".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
