//! Repository for the `queries` table.

use cheddit_core::types::{new_id, DbId};
use sqlx::PgPool;

use crate::models::query::{CreateQuery, Query};

const COLUMNS: &str =
    "id, document_path, question, answer, asker_id, document_owner_id, created_at";

pub struct QueryRepo;

impl QueryRepo {
    /// Insert an unanswered query.
    pub async fn create(pool: &PgPool, input: &CreateQuery) -> Result<Query, sqlx::Error> {
        let query = format!(
            "INSERT INTO queries (id, document_path, question, answer, asker_id, document_owner_id)
             VALUES ($1, $2, $3, NULL, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Query>(&query)
            .bind(new_id())
            .bind(&input.document_path)
            .bind(&input.question)
            .bind(input.asker_id)
            .bind(input.document_owner_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Query>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM queries WHERE id = $1");
        sqlx::query_as::<_, Query>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All queries for a document, oldest first.
    pub async fn list_for_document(
        pool: &PgPool,
        document_path: &str,
    ) -> Result<Vec<Query>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM queries
             WHERE document_path = $1
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Query>(&query)
            .bind(document_path)
            .fetch_all(pool)
            .await
    }

    /// Overwrite the answer. Returns `None` if no row with `id` exists.
    pub async fn set_answer(
        pool: &PgPool,
        id: DbId,
        answer: &str,
    ) -> Result<Option<Query>, sqlx::Error> {
        let query = format!(
            "UPDATE queries SET answer = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Query>(&query)
            .bind(id)
            .bind(answer)
            .fetch_optional(pool)
            .await
    }
}
