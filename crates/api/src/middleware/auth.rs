//! Session-token authentication extractors for Axum handlers.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum_extra::extract::cookie::CookieJar;
use cheddit_core::error::CoreError;
use cheddit_core::types::DbId;

use crate::auth::cookie::SESSION_COOKIE;
use crate::auth::jwt::{verify_session_token, JwtConfig};
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated identity decoded from the session token.
///
/// The token is read from the `authToken` cookie, or from an
/// `Authorization: Bearer` header for non-browser clients.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: DbId,
    pub email: String,
    pub is_faculty: bool,
}

/// Pull the raw session token out of the request headers.
fn session_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

/// Resolve the session carried by `headers`.
///
/// `Unauthenticated` when no token is present, `InvalidToken` when the
/// signature or expiry check fails.
pub fn authenticate(headers: &HeaderMap, config: &JwtConfig) -> Result<AuthUser, CoreError> {
    let token = session_token(headers)
        .ok_or_else(|| CoreError::Unauthenticated("Unauthorized".into()))?;

    let claims = verify_session_token(&token, config)
        .map_err(|_| CoreError::InvalidToken("Invalid or expired token".into()))?;

    Ok(AuthUser {
        user_id: claims.id,
        email: claims.email,
        is_faculty: claims.is_faculty,
    })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(authenticate(&parts.headers, &state.config.jwt)?)
    }
}

/// Optional identity: `None` for a missing or invalid session.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuthUser(
            authenticate(&parts.headers, &state.config.jwt).ok(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use axum::http::header::COOKIE;
    use axum::http::HeaderValue;
    use cheddit_core::types::new_id;

    use super::*;
    use crate::auth::jwt::issue_session_token;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "middleware-test-secret".into(),
            session_expiry_days: 7,
        }
    }

    fn headers_with(name: axum::http::HeaderName, value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn missing_token_is_unauthenticated() {
        assert_matches!(
            authenticate(&HeaderMap::new(), &config()),
            Err(CoreError::Unauthenticated(_))
        );
    }

    #[test]
    fn bad_token_is_invalid() {
        let headers = headers_with(COOKIE, "authToken=forged");
        assert_matches!(
            authenticate(&headers, &config()),
            Err(CoreError::InvalidToken(_))
        );
    }

    #[test]
    fn cookie_and_bearer_are_both_accepted() {
        let id = new_id();
        let token = issue_session_token(id, "s@campus.edu", false, &config()).unwrap();

        let from_cookie = headers_with(COOKIE, &format!("theme=dark; authToken={token}"));
        let user = authenticate(&from_cookie, &config()).unwrap();
        assert_eq!(user.user_id, id);
        assert!(!user.is_faculty);

        let from_bearer = headers_with(AUTHORIZATION, &format!("Bearer {token}"));
        assert_eq!(authenticate(&from_bearer, &config()).unwrap(), user);
    }
}
