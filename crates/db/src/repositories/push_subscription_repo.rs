//! Repository for the `push_subscriptions` table.

use cheddit_core::types::DbId;
use sqlx::PgPool;

use crate::models::push_subscription::PushSubscription;

const COLUMNS: &str = "user_id, subscription, updated_at";

pub struct PushSubscriptionRepo;

impl PushSubscriptionRepo {
    /// Insert or replace the user's registration (conflict key: `user_id`).
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        subscription: &serde_json::Value,
    ) -> Result<PushSubscription, sqlx::Error> {
        let query = format!(
            "INSERT INTO push_subscriptions (user_id, subscription)
             VALUES ($1, $2)
             ON CONFLICT (user_id) DO UPDATE
                SET subscription = EXCLUDED.subscription,
                    updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PushSubscription>(&query)
            .bind(user_id)
            .bind(subscription)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<PushSubscription>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM push_subscriptions WHERE user_id = $1");
        sqlx::query_as::<_, PushSubscription>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Number of registrations held for a user (0 or 1).
    pub async fn count_for_user(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM push_subscriptions WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }
}
