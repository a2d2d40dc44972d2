use axum::routing::post;
use axum::Router;

use crate::handlers::push;
use crate::state::AppState;

/// ```text
/// POST /push-subscribe  -> subscribe
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/push-subscribe", post(push::subscribe))
}
