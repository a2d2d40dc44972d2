//! Route definitions for session endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// ```text
/// POST /auth/signup  -> signup
/// POST /auth/login   -> login
/// POST /logout       -> logout
/// GET  /userid       -> current_user_id
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/userid", get(auth::current_user_id))
}
