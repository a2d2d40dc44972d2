pub mod auth;
pub mod documents;
pub mod health;
pub mod push;
pub mod queries;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /auth/signup                     POST   signup
/// /auth/login                      POST   login
/// /logout                          POST   logout
/// /userid                          GET    current user id (or null)
///
/// /upload                          POST   upload a PDF (faculty)
/// /pdfs                            GET    list documents
/// /pdf/{*path}                     GET    signed URL, or bytes with ?inline=true
/// /objects/{*path}                 GET    serve a locally signed object
///
/// /queries                         GET    thread for ?pdf=<path>
/// /queries                         POST   ask a question
/// /queries                         PATCH  answer a question (owner, faculty)
///
/// /push-subscribe                  POST   store push subscription
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(documents::router())
        .merge(queries::router())
        .merge(push::router())
}
