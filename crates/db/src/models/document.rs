//! Uploaded document metadata.

use cheddit_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `documents` table. The bytes live in object storage under
/// `storage_path`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Document {
    pub id: DbId,
    /// Original file name as uploaded.
    pub name: String,
    pub storage_path: String,
    pub owner_id: DbId,
    pub uploaded_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateDocument {
    pub name: String,
    pub storage_path: String,
    pub owner_id: DbId,
}
