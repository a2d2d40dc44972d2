//! Route definitions for documents.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::documents;
use crate::state::AppState;

/// ```text
/// POST /upload            -> upload (faculty)
/// GET  /pdfs              -> list_documents
/// GET  /pdf/{*path}       -> get_pdf
/// GET  /objects/{*path}   -> get_signed_object
/// ```
///
/// The upload body limit is applied in the router builder.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(documents::upload))
        .route("/pdfs", get(documents::list_documents))
        .route("/pdf/{*path}", get(documents::get_pdf))
        .route("/objects/{*path}", get(documents::get_signed_object))
}
