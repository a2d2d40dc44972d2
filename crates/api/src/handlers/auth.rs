//! Handlers for signup, login, logout and the current-user lookup.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use cheddit_core::error::CoreError;
use cheddit_core::types::DbId;
use cheddit_db::models::user::{CreateUser, UserResponse};
use cheddit_db::StoreError;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::cookie::{cleared_session_cookie, session_cookie};
use crate::auth::jwt::issue_session_token;
use crate::auth::password::{hash_password, validate_password_strength, verify_password_or_dummy};
use crate::error::{AppError, AppResult};
use crate::extract::JsonBody;
use crate::middleware::auth::MaybeAuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/auth/signup`.
///
/// Absent fields deserialize as empty and are rejected by the handler.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, rename = "isFaculty", alias = "is_faculty")]
    pub is_faculty: bool,
}

/// Request body for `POST /api/auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Returned by signup and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct UserIdResponse {
    pub id: Option<DbId>,
}

fn token_error(e: jsonwebtoken::errors::Error) -> AppError {
    AppError::InternalError(format!("Token generation error: {e}"))
}

/// A concurrent signup for the same email loses at the unique constraint.
fn signup_store_error(err: StoreError) -> AppError {
    match err {
        StoreError::UniqueViolation(_) => {
            AppError::Core(CoreError::Conflict("User already exists".into()))
        }
        other => other.into(),
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/signup
///
/// Create an account. Returns the public user and a session token; no cookie
/// is set, the client logs in to obtain one.
pub async fn signup(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<SignupRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let name = input.name.trim().to_string();
    if name.is_empty() || input.email.trim().is_empty() || input.password.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Missing required fields".into(),
        )));
    }
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;
    validate_password_strength(&input.password, state.config.min_password_length)?;

    let email = input.email.trim().to_string();
    if state.store.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::Core(CoreError::Validation(
            "User already exists".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = state
        .store
        .create_user(&CreateUser {
            name,
            email,
            password_hash,
            is_faculty: input.is_faculty,
        })
        .await
        .map_err(signup_store_error)?;

    let token = issue_session_token(user.id, &user.email, user.is_faculty, &state.config.jwt)
        .map_err(token_error)?;

    tracing::info!(user_id = %user.id, is_faculty = user.is_faculty, "User signed up");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: user.into(),
            token,
        }),
    ))
}

/// POST /api/auth/login
///
/// Verify credentials, set the `authToken` cookie and return the token in the
/// body as well. Unknown email and wrong password are indistinguishable.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(input): JsonBody<LoginRequest>,
) -> AppResult<(CookieJar, Json<AuthResponse>)> {
    if input.email.trim().is_empty() || input.password.is_empty() {
        return Err(AppError::BadRequest("Missing email or password".into()));
    }

    let user = state.store.find_user_by_email(input.email.trim()).await?;

    let valid = verify_password_or_dummy(
        &input.password,
        user.as_ref().map(|u| u.password_hash.as_str()),
    )
    .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    let user = match user {
        Some(user) if valid => user,
        _ => return Err(AppError::Core(CoreError::InvalidCredentials)),
    };

    let token = issue_session_token(user.id, &user.email, user.is_faculty, &state.config.jwt)
        .map_err(token_error)?;

    tracing::info!(user_id = %user.id, "User logged in");

    let jar = jar.add(session_cookie(token.clone(), &state.config));
    Ok((
        jar,
        Json(AuthResponse {
            user: user.into(),
            token,
        }),
    ))
}

/// POST /api/logout
///
/// Clear the session cookie. Tokens are stateless, so nothing else changes.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<LogoutResponse>) {
    (
        jar.add(cleared_session_cookie(&state.config)),
        Json(LogoutResponse { success: true }),
    )
}

/// GET /api/userid
///
/// The caller's user id, or `null` without a valid session. Never fails.
pub async fn current_user_id(MaybeAuthUser(user): MaybeAuthUser) -> Json<UserIdResponse> {
    Json(UserIdResponse {
        id: user.map(|u| u.user_id),
    })
}
