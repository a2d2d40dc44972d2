#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// No session cookie was presented.
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// A session token was presented but its signature or expiry is invalid.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Unknown email or wrong password. Deliberately does not say which.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Entity not found: {entity} {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Invalid subscription: {0}")]
    InvalidSubscription(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a missing document, keyed by its storage path.
    pub fn document_not_found(path: &str) -> Self {
        Self::NotFound {
            entity: "Document",
            key: path.to_string(),
        }
    }

    /// Shorthand for a missing query, keyed by its id.
    pub fn query_not_found(id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity: "Query",
            key: id.to_string(),
        }
    }
}
