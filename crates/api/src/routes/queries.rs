//! Route definitions for the query ledger.

use axum::routing::get;
use axum::Router;

use crate::handlers::queries;
use crate::state::AppState;

/// ```text
/// GET   /queries  -> list_queries
/// POST  /queries  -> create_query
/// PATCH /queries  -> answer_query
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/queries",
        get(queries::list_queries)
            .post(queries::create_query)
            .patch(queries::answer_query),
    )
}
