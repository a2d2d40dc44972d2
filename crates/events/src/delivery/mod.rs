//! External delivery channels for platform notifications.
//!
//! [`PushTransport`] is the seam between the dispatcher and the network;
//! [`web_push::WebPushTransport`] is the production implementation.

pub mod web_push;

use async_trait::async_trait;
use cheddit_core::push::NotificationPayload;

/// Error type for push delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum PushError {
    /// The stored registration could not be parsed as a push subscription.
    #[error("Invalid push subscription: {0}")]
    InvalidSubscription(String),

    /// Signing, encryption, or the HTTP exchange with the push service failed.
    #[error("Push delivery failed: {0}")]
    Delivery(String),
}

/// Delivers one notification to one browser push registration.
#[async_trait]
pub trait PushTransport: Send + Sync {
    async fn send(
        &self,
        subscription: &serde_json::Value,
        payload: &NotificationPayload,
    ) -> Result<(), PushError>;
}
