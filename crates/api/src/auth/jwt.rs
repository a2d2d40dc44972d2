//! Session tokens.
//!
//! Tokens are HS256-signed JWTs carrying [`Claims`]. They are stateless:
//! nothing is stored server-side, so a token stays valid until it expires or
//! the client drops the cookie.

use chrono::Utc;
use cheddit_core::types::DbId;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Claims embedded in every session token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// The user's id.
    pub id: DbId,
    pub email: String,
    #[serde(rename = "isFaculty")]
    pub is_faculty: bool,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
}

/// Configuration for session-token issuing and verification.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Token lifetime and cookie max-age in days (default: 7).
    pub session_expiry_days: i64,
}

/// Default session lifetime in days.
const DEFAULT_SESSION_EXPIRY_DAYS: i64 = 7;

impl JwtConfig {
    /// Load session configuration from environment variables.
    ///
    /// | Env Var               | Required | Default |
    /// |-----------------------|----------|---------|
    /// | `JWT_SECRET`          | **yes**  | --      |
    /// | `SESSION_EXPIRY_DAYS` | no       | `7`     |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let session_expiry_days: i64 = std::env::var("SESSION_EXPIRY_DAYS")
            .unwrap_or_else(|_| DEFAULT_SESSION_EXPIRY_DAYS.to_string())
            .parse()
            .expect("SESSION_EXPIRY_DAYS must be a valid i64");

        Self {
            secret,
            session_expiry_days,
        }
    }

    pub fn session_expiry_secs(&self) -> i64 {
        self.session_expiry_days * 24 * 60 * 60
    }
}

/// Issue a session token for the given identity, valid from now.
pub fn issue_session_token(
    user_id: DbId,
    email: &str,
    is_faculty: bool,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        id: user_id,
        email: email.to_string(),
        is_faculty,
        exp: now + config.session_expiry_secs(),
        iat: now,
    };
    encode_claims(&claims, config)
}

/// Sign an arbitrary claim set.
pub fn encode_claims(
    claims: &Claims,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify signature and expiry and return the embedded [`Claims`].
///
/// Expiry is exact: no leeway is granted.
pub fn verify_session_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;
    // The library accepts `exp == now`; a session ends at its `exp` second.
    if token_data.claims.exp <= Utc::now().timestamp() {
        return Err(ErrorKind::ExpiredSignature.into());
    }
    Ok(token_data.claims)
}
