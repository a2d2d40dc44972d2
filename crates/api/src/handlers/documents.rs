//! Handlers for the document registry: upload, listing, signed retrieval and
//! the local signed-object endpoint.

use std::time::Duration;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Path, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use cheddit_core::documents::{
    display_name_for, display_url_for, is_listed_document, storage_path_for,
    validate_object_path, validate_pdf_content_type, DOCUMENT_PREFIX, PDF_CONTENT_TYPE,
};
use cheddit_core::error::CoreError;
use cheddit_db::models::document::{CreateDocument, Document};
use cheddit_storage::StorageError;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::extract::QueryParams;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireFaculty;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: &'static str,
    pub record: Document,
}

/// One entry of the document listing.
#[derive(Debug, Serialize)]
pub struct DocumentEntry {
    pub key: String,
    /// API path that resolves to a signed URL for `key`.
    #[serde(rename = "displayUrl")]
    pub display_url: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct DocumentListResponse {
    pub pdfs: Vec<DocumentEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PdfParams {
    /// Stream the bytes instead of returning a signed URL.
    #[serde(default)]
    pub inline: bool,
}

#[derive(Debug, Serialize)]
pub struct SignedUrlResponse {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct SignedObjectParams {
    pub expires: i64,
    pub signature: String,
}

/// A file field read out of a multipart body.
struct UploadedFile {
    file_name: String,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

async fn read_file_field(mut multipart: Multipart) -> AppResult<UploadedFile> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("document.pdf").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        return Ok(UploadedFile {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }
    Err(AppError::BadRequest("No file uploaded".into()))
}

fn pdf_response(bytes: Vec<u8>, path: &str) -> Response {
    let disposition = format!("inline; filename=\"{}\"", display_name_for(path));
    (
        [
            (CONTENT_TYPE, PDF_CONTENT_TYPE.to_string()),
            (CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/upload
///
/// Multipart body with a `file` field holding a PDF. Faculty only. The blob
/// is written first; if the metadata insert then fails the blob is left
/// orphaned and logged.
pub async fn upload(
    State(state): State<AppState>,
    RequireFaculty(user): RequireFaculty,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<UploadResponse>> {
    let file = read_file_field(multipart?).await?;
    validate_pdf_content_type(file.content_type.as_deref())?;

    let storage_path = storage_path_for(&file.file_name, Utc::now());
    let size = file.bytes.len();

    state
        .objects
        .upload(&storage_path, file.bytes, PDF_CONTENT_TYPE)
        .await?;

    let record = state
        .store
        .create_document(&CreateDocument {
            name: file.file_name,
            storage_path: storage_path.clone(),
            owner_id: user.user_id,
        })
        .await
        .map_err(|e| {
            tracing::warn!(path = %storage_path, error = %e, "Orphaned blob: metadata insert failed");
            e
        })?;

    tracing::info!(
        user_id = %user.user_id,
        path = %record.storage_path,
        size,
        "Document uploaded"
    );

    Ok(Json(UploadResponse {
        message: "Upload successful",
        record,
    }))
}

/// GET /api/pdfs
///
/// Stored documents with a `.pdf` suffix, ordered by key.
pub async fn list_documents(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<DocumentListResponse>> {
    let pdfs = state
        .objects
        .list(DOCUMENT_PREFIX)
        .await?
        .into_iter()
        .filter(|entry| is_listed_document(&entry.name))
        .map(|entry| DocumentEntry {
            display_url: display_url_for(&entry.key),
            key: entry.key,
            name: entry.name,
        })
        .collect();

    Ok(Json(DocumentListResponse { pdfs }))
}

/// GET /api/pdf/{*path}
///
/// Exchange a storage path for a short-lived signed URL (`{url}`), or with
/// `?inline=true` stream the PDF itself.
pub async fn get_pdf(
    State(state): State<AppState>,
    user: AuthUser,
    Path(path): Path<String>,
    QueryParams(params): QueryParams<PdfParams>,
) -> AppResult<Response> {
    validate_object_path(&path)?;
    if !state.objects.exists(&path).await? {
        return Err(AppError::Core(CoreError::document_not_found(&path)));
    }

    if params.inline {
        let bytes = state.objects.download(&path).await?;
        return Ok(pdf_response(bytes, &path));
    }

    let ttl = Duration::from_secs(state.config.storage.signed_url_ttl_secs);
    let url = state.objects.create_signed_url(&path, ttl).await?;
    tracing::debug!(user_id = %user.user_id, path = %path, "Issued signed URL");

    Ok(Json(SignedUrlResponse { url }).into_response())
}

/// GET /api/objects/{*path}?expires=&signature=
///
/// Serve an object through a URL minted by the local storage backend. The
/// signature is the only credential.
pub async fn get_signed_object(
    State(state): State<AppState>,
    Path(path): Path<String>,
    QueryParams(params): QueryParams<SignedObjectParams>,
) -> AppResult<Response> {
    state
        .objects
        .verify_signed_request(&path, params.expires, &params.signature)?;

    let bytes = state.objects.download(&path).await.map_err(|e| match e {
        StorageError::NotFound(_) => AppError::Core(CoreError::document_not_found(&path)),
        other => other.into(),
    })?;
    Ok(pdf_response(bytes, &path))
}
