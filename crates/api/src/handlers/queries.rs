//! Handlers for the per-document query ledger.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use cheddit_core::error::CoreError;
use cheddit_core::queries::{authorize_answer, validate_answer, validate_question, Answerer};
use cheddit_core::types::DbId;
use cheddit_db::models::query::{CreateQuery, Query};
use cheddit_events::QueryCreated;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::extract::{JsonBody, QueryParams};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ListQueriesParams {
    /// Storage path of the document.
    pub pdf: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateQueryRequest {
    #[serde(default)]
    pub question: String,
    /// Storage path of the document.
    #[serde(default)]
    pub pdf: String,
}

#[derive(Debug, Deserialize)]
pub struct AnswerQueryRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct QueryListResponse {
    pub queries: Vec<Query>,
}

#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub query: Query,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/queries?pdf=<path>
///
/// The thread for one document, oldest question first. Without `pdf` the
/// list is empty.
pub async fn list_queries(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ListQueriesParams>,
) -> AppResult<Json<QueryListResponse>> {
    let queries = match params.pdf.as_deref().filter(|p| !p.is_empty()) {
        Some(path) => state.store.list_queries_for_document(path).await?,
        None => Vec::new(),
    };
    Ok(Json(QueryListResponse { queries }))
}

/// POST /api/queries
///
/// Ask a question about a document. The document owner is copied onto the
/// row, then a `QueryCreated` event is published for push delivery; the
/// response does not wait on it.
pub async fn create_query(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(input): JsonBody<CreateQueryRequest>,
) -> AppResult<Json<QueryResponse>> {
    validate_question(&input.question, &input.pdf)?;

    let document = state
        .store
        .find_document_by_path(&input.pdf)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::document_not_found(&input.pdf)))?;

    let query = state
        .store
        .create_query(&CreateQuery {
            document_path: document.storage_path,
            question: input.question,
            asker_id: user.user_id,
            document_owner_id: document.owner_id,
        })
        .await?;

    tracing::info!(
        query_id = %query.id,
        user_id = %user.user_id,
        path = %query.document_path,
        "Query created"
    );

    state.event_bus.publish(QueryCreated {
        query_id: query.id,
        document_path: query.document_path.clone(),
        question: query.question.clone(),
        asker_id: query.asker_id,
        document_owner_id: query.document_owner_id,
        timestamp: Utc::now(),
    });

    Ok(Json(QueryResponse { query }))
}

/// PATCH /api/queries
///
/// Answer a query. Only the document owner, from a faculty session, may
/// answer; a second answer overwrites the first.
pub async fn answer_query(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(input): JsonBody<AnswerQueryRequest>,
) -> AppResult<Json<QueryResponse>> {
    let raw_id = input
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::Core(CoreError::Validation("Missing data".into())))?;
    validate_answer(&input.answer)?;

    let id: DbId = raw_id
        .parse()
        .map_err(|_| AppError::Core(CoreError::query_not_found(&raw_id)))?;

    let query = state
        .store
        .find_query(id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::query_not_found(id)))?;

    authorize_answer(
        Answerer {
            user_id: user.user_id,
            is_faculty: user.is_faculty,
        },
        query.document_owner_id,
    )?;

    let query = state
        .store
        .set_answer(id, &input.answer)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::query_not_found(id)))?;

    tracing::info!(query_id = %query.id, user_id = %user.user_id, "Query answered");

    Ok(Json(QueryResponse { query }))
}
