//! Repository for the `documents` table.

use cheddit_core::types::new_id;
use sqlx::PgPool;

use crate::models::document::{CreateDocument, Document};

const COLUMNS: &str = "id, name, storage_path, owner_id, uploaded_at";

pub struct DocumentRepo;

impl DocumentRepo {
    /// Insert document metadata after its bytes were written to object storage.
    pub async fn create(pool: &PgPool, input: &CreateDocument) -> Result<Document, sqlx::Error> {
        let query = format!(
            "INSERT INTO documents (id, name, storage_path, owner_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(new_id())
            .bind(&input.name)
            .bind(&input.storage_path)
            .bind(input.owner_id)
            .fetch_one(pool)
            .await
    }

    /// Find a document by its storage path (the join key used by queries).
    pub async fn find_by_path(
        pool: &PgPool,
        storage_path: &str,
    ) -> Result<Option<Document>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM documents WHERE storage_path = $1");
        sqlx::query_as::<_, Document>(&query)
            .bind(storage_path)
            .fetch_optional(pool)
            .await
    }
}
