//! In-process [`Store`](crate::Store) implementation.
//!
//! Enforces the same unique constraints as the migrations (`uq_users_email`,
//! `uq_documents_storage_path`, one push subscription per user) and the same
//! ordering for query listings. Foreign keys are not checked; callers look up
//! the referenced rows first, as they do against PostgreSQL.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use cheddit_core::types::{new_id, DbId};
use tokio::sync::RwLock;

use crate::models::document::{CreateDocument, Document};
use crate::models::push_subscription::PushSubscription;
use crate::models::query::{CreateQuery, Query};
use crate::models::user::{CreateUser, User};
use crate::store::{
    DocumentStore, PushSubscriptionStore, QueryStore, StoreError, StoreResult, UserStore,
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    documents: Vec<Document>,
    queries: Vec<Query>,
    push_subscriptions: HashMap<DbId, PushSubscription>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a query with an explicit creation time.
    ///
    /// Lets tests build threads whose insertion order differs from their
    /// chronological order.
    pub async fn insert_query_at(
        &self,
        input: &CreateQuery,
        created_at: cheddit_core::types::Timestamp,
    ) -> Query {
        let row = Query {
            id: new_id(),
            document_path: input.document_path.clone(),
            question: input.question.clone(),
            answer: None,
            asker_id: input.asker_id,
            document_owner_id: input.document_owner_id,
            created_at,
        };
        self.tables.write().await.queries.push(row.clone());
        row
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, input: &CreateUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == input.email) {
            return Err(StoreError::UniqueViolation("uq_users_email".into()));
        }
        let user = User {
            id: new_id(),
            name: input.name.clone(),
            email: input.email.clone(),
            password_hash: input.password_hash.clone(),
            is_faculty: input.is_faculty,
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create_document(&self, input: &CreateDocument) -> StoreResult<Document> {
        let mut tables = self.tables.write().await;
        if tables
            .documents
            .iter()
            .any(|d| d.storage_path == input.storage_path)
        {
            return Err(StoreError::UniqueViolation(
                "uq_documents_storage_path".into(),
            ));
        }
        let document = Document {
            id: new_id(),
            name: input.name.clone(),
            storage_path: input.storage_path.clone(),
            owner_id: input.owner_id,
            uploaded_at: Utc::now(),
        };
        tables.documents.push(document.clone());
        Ok(document)
    }

    async fn find_document_by_path(&self, storage_path: &str) -> StoreResult<Option<Document>> {
        let tables = self.tables.read().await;
        Ok(tables
            .documents
            .iter()
            .find(|d| d.storage_path == storage_path)
            .cloned())
    }
}

#[async_trait]
impl QueryStore for MemoryStore {
    async fn create_query(&self, input: &CreateQuery) -> StoreResult<Query> {
        Ok(self.insert_query_at(input, Utc::now()).await)
    }

    async fn find_query(&self, id: DbId) -> StoreResult<Option<Query>> {
        let tables = self.tables.read().await;
        Ok(tables.queries.iter().find(|q| q.id == id).cloned())
    }

    async fn list_queries_for_document(&self, document_path: &str) -> StoreResult<Vec<Query>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Query> = tables
            .queries
            .iter()
            .filter(|q| q.document_path == document_path)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn set_answer(&self, id: DbId, answer: &str) -> StoreResult<Option<Query>> {
        let mut tables = self.tables.write().await;
        Ok(tables.queries.iter_mut().find(|q| q.id == id).map(|q| {
            q.answer = Some(answer.to_string());
            q.clone()
        }))
    }
}

#[async_trait]
impl PushSubscriptionStore for MemoryStore {
    async fn upsert_push_subscription(
        &self,
        user_id: DbId,
        subscription: &serde_json::Value,
    ) -> StoreResult<PushSubscription> {
        let row = PushSubscription {
            user_id,
            subscription: subscription.clone(),
            updated_at: Utc::now(),
        };
        self.tables
            .write()
            .await
            .push_subscriptions
            .insert(user_id, row.clone());
        Ok(row)
    }

    async fn find_push_subscription(&self, user_id: DbId) -> StoreResult<Option<PushSubscription>> {
        let tables = self.tables.read().await;
        Ok(tables.push_subscriptions.get(&user_id).cloned())
    }

    async fn count_push_subscriptions(&self, user_id: DbId) -> StoreResult<i64> {
        let tables = self.tables.read().await;
        Ok(i64::from(tables.push_subscriptions.contains_key(&user_id)))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
