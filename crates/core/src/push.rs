//! Push registration validation and the notification payload shape.
//!
//! A registration payload is the browser's `PushSubscription.toJSON()`
//! output: `{ "endpoint": "...", "keys": { "p256dh": "...", "auth": "..." } }`.
//! It is stored verbatim; only the endpoint is required here, the transport
//! validates the keys when it encrypts.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Title of the notification sent to a document owner on a new question.
pub const NEW_QUERY_TITLE: &str = "New Query on Your PDF!";

/// Require a JSON object with a non-empty string `endpoint`.
pub fn validate_subscription(subscription: &serde_json::Value) -> Result<(), CoreError> {
    let obj = subscription.as_object().ok_or_else(|| {
        CoreError::InvalidSubscription("Subscription must be a JSON object".into())
    })?;

    match obj.get("endpoint") {
        Some(serde_json::Value::String(endpoint)) if !endpoint.trim().is_empty() => Ok(()),
        _ => Err(CoreError::InvalidSubscription(
            "Subscription must contain a non-empty 'endpoint'".into(),
        )),
    }
}

/// JSON body delivered to the service worker's `push` handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub title: String,
    pub body: String,
    pub url: String,
}

impl NotificationPayload {
    /// Payload announcing a new question; `url` deep-links to the document.
    pub fn new_query(question: &str, url: impl Into<String>) -> Self {
        Self {
            title: NEW_QUERY_TITLE.to_string(),
            body: question.to_string(),
            url: url.into(),
        }
    }
}
