//! Question/answer rows scoped to a document.

use cheddit_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `queries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Query {
    pub id: DbId,
    /// Storage path of the document the question is about.
    pub document_path: String,
    pub question: String,
    /// `None` until the document owner answers.
    pub answer: Option<String>,
    pub asker_id: DbId,
    /// Owner of the document at the time the question was asked.
    pub document_owner_id: DbId,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateQuery {
    pub document_path: String,
    pub question: String,
    pub asker_id: DbId,
    pub document_owner_id: DbId,
}
