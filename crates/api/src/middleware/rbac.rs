//! Role extractors layered on [`AuthUser`].

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use cheddit_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires a faculty session. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn faculty_only(RequireFaculty(user): RequireFaculty) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireFaculty(pub AuthUser);

impl FromRequestParts<AppState> for RequireFaculty {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_faculty {
            return Err(AppError::Core(CoreError::Forbidden(
                "Faculty role required".into(),
            )));
        }
        Ok(RequireFaculty(user))
    }
}
