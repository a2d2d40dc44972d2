//! Per-user push registration.

use cheddit_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `push_subscriptions` table; at most one per user.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PushSubscription {
    pub user_id: DbId,
    /// The browser's `PushSubscription` JSON, stored verbatim.
    pub subscription: serde_json::Value,
    pub updated_at: Timestamp,
}
