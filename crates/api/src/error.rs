use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cheddit_core::error::CoreError;
use cheddit_db::StoreError;
use cheddit_storage::StorageError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps the domain, relational-storage and object-storage errors and adds
/// HTTP-specific variants. Implements [`IntoResponse`] to produce consistent
/// `{ "error": ..., "code": ... }` JSON responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `cheddit_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A relational-storage error.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// An object-storage error.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

const INTERNAL_MESSAGE: &str = "An internal error occurred";

fn internal(detail: &dyn std::fmt::Display) -> (StatusCode, &'static str, String) {
    tracing::error!(error = %detail, "Internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        INTERNAL_MESSAGE.to_string(),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Store(err) => classify_store_error(err),
            AppError::Storage(err) => classify_storage_error(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => internal(msg),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn classify_core_error(err: &CoreError) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::Unauthenticated(msg) => {
            (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED", msg.clone())
        }
        CoreError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN", msg.clone()),
        CoreError::InvalidCredentials => (
            StatusCode::BAD_REQUEST,
            "INVALID_CREDENTIALS",
            err.to_string(),
        ),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::NotFound { entity, .. } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::UnsupportedMediaType(msg) => (
            StatusCode::BAD_REQUEST,
            "UNSUPPORTED_MEDIA_TYPE",
            msg.clone(),
        ),
        CoreError::InvalidSubscription(msg) => (
            StatusCode::BAD_REQUEST,
            "INVALID_SUBSCRIPTION",
            msg.clone(),
        ),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Internal(msg) => internal(msg),
    }
}

/// Unique violations map to 409; every other backend failure is a
/// sanitized 500.
fn classify_store_error(err: &StoreError) -> (StatusCode, &'static str, String) {
    match err {
        StoreError::UniqueViolation(_) => (StatusCode::CONFLICT, "CONFLICT", err.to_string()),
        StoreError::Database(db_err) => internal(db_err),
    }
}

fn classify_storage_error(err: &StorageError) -> (StatusCode, &'static str, String) {
    match err {
        StorageError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Object not found".to_string(),
        ),
        // The signed-object route does not exist for backends that sign
        // their own URLs.
        StorageError::Unsupported(_) => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Object not found".to_string(),
        ),
        StorageError::InvalidPath(_) => (StatusCode::BAD_REQUEST, "INVALID_PATH", err.to_string()),
        StorageError::Expired => (StatusCode::FORBIDDEN, "SIGNED_URL_EXPIRED", err.to_string()),
        StorageError::InvalidSignature => {
            (StatusCode::FORBIDDEN, "INVALID_SIGNATURE", err.to_string())
        }
        StorageError::Io(_) | StorageError::Backend(_) => internal(err),
    }
}
