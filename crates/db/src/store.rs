//! Store traits: the narrow relational-storage contract every component is
//! handed at construction time.
//!
//! The traits mirror what the service needs from the backend: single-column
//! equality lookups, inserts, one update and one upsert. No operation spans
//! more than one row. [`PgStore`] implements them over a PostgreSQL pool by
//! delegating to the repositories; [`MemoryStore`](crate::memory::MemoryStore)
//! implements them in-process.

use async_trait::async_trait;
use cheddit_core::types::DbId;

use crate::models::document::{CreateDocument, Document};
use crate::models::push_subscription::PushSubscription;
use crate::models::query::{CreateQuery, Query};
use crate::models::user::{CreateUser, User};
use crate::repositories::{DocumentRepo, PushSubscriptionRepo, QueryRepo, UserRepo};
use crate::DbPool;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// PostgreSQL SQLSTATE for `unique_violation`.
const PG_UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An insert collided with a unique constraint (named by the payload).
    #[error("Duplicate value violates unique constraint: {0}")]
    UniqueViolation(String),

    /// Any other backend failure.
    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some(PG_UNIQUE_VIOLATION) {
                let constraint = db_err.constraint().unwrap_or("unknown").to_string();
                return StoreError::UniqueViolation(constraint);
            }
        }
        StoreError::Database(err)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Credential store.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, input: &CreateUser) -> StoreResult<User>;
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
}

/// Document metadata registry.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn create_document(&self, input: &CreateDocument) -> StoreResult<Document>;
    async fn find_document_by_path(&self, storage_path: &str) -> StoreResult<Option<Document>>;
}

/// Question/answer rows.
#[async_trait]
pub trait QueryStore: Send + Sync {
    async fn create_query(&self, input: &CreateQuery) -> StoreResult<Query>;
    async fn find_query(&self, id: DbId) -> StoreResult<Option<Query>>;
    /// Oldest first; ties broken by id.
    async fn list_queries_for_document(&self, document_path: &str) -> StoreResult<Vec<Query>>;
    async fn set_answer(&self, id: DbId, answer: &str) -> StoreResult<Option<Query>>;
}

/// One push registration per user, upserted on `user_id`.
#[async_trait]
pub trait PushSubscriptionStore: Send + Sync {
    async fn upsert_push_subscription(
        &self,
        user_id: DbId,
        subscription: &serde_json::Value,
    ) -> StoreResult<PushSubscription>;
    async fn find_push_subscription(&self, user_id: DbId) -> StoreResult<Option<PushSubscription>>;
    async fn count_push_subscriptions(&self, user_id: DbId) -> StoreResult<i64>;
}

/// Everything the HTTP layer needs, as one injectable handle.
pub trait Store: UserStore + DocumentStore + QueryStore + PushSubscriptionStore {}

impl<T> Store for T where T: UserStore + DocumentStore + QueryStore + PushSubscriptionStore {}

// ---------------------------------------------------------------------------
// PostgreSQL
// ---------------------------------------------------------------------------

/// [`Store`] backed by a PostgreSQL pool.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, input: &CreateUser) -> StoreResult<User> {
        Ok(UserRepo::create(&self.pool, input).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(UserRepo::find_by_email(&self.pool, email).await?)
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn create_document(&self, input: &CreateDocument) -> StoreResult<Document> {
        Ok(DocumentRepo::create(&self.pool, input).await?)
    }

    async fn find_document_by_path(&self, storage_path: &str) -> StoreResult<Option<Document>> {
        Ok(DocumentRepo::find_by_path(&self.pool, storage_path).await?)
    }
}

#[async_trait]
impl QueryStore for PgStore {
    async fn create_query(&self, input: &CreateQuery) -> StoreResult<Query> {
        Ok(QueryRepo::create(&self.pool, input).await?)
    }

    async fn find_query(&self, id: DbId) -> StoreResult<Option<Query>> {
        Ok(QueryRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_queries_for_document(&self, document_path: &str) -> StoreResult<Vec<Query>> {
        Ok(QueryRepo::list_for_document(&self.pool, document_path).await?)
    }

    async fn set_answer(&self, id: DbId, answer: &str) -> StoreResult<Option<Query>> {
        Ok(QueryRepo::set_answer(&self.pool, id, answer).await?)
    }
}

#[async_trait]
impl PushSubscriptionStore for PgStore {
    async fn upsert_push_subscription(
        &self,
        user_id: DbId,
        subscription: &serde_json::Value,
    ) -> StoreResult<PushSubscription> {
        Ok(PushSubscriptionRepo::upsert(&self.pool, user_id, subscription).await?)
    }

    async fn find_push_subscription(&self, user_id: DbId) -> StoreResult<Option<PushSubscription>> {
        Ok(PushSubscriptionRepo::find_by_user(&self.pool, user_id).await?)
    }

    async fn count_push_subscriptions(&self, user_id: DbId) -> StoreResult<i64> {
        Ok(PushSubscriptionRepo::count_for_user(&self.pool, user_id).await?)
    }
}
