use std::path::PathBuf;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// Everything except `DATABASE_URL` (read in `main`) and `JWT_SECRET` has a
/// default suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Body limit for multipart uploads (default: 20 MiB).
    pub max_upload_bytes: usize,
    /// Origin used when building absolute links (default: `http://localhost:3000`).
    pub public_base_url: String,
    /// Add `Secure` to the session cookie (default: `false`).
    pub cookie_secure: bool,
    /// Minimum signup password length (default: `8`).
    pub min_password_length: usize,
    /// Session token configuration.
    pub jwt: JwtConfig,
    pub storage: StorageConfig,
    pub push: PushConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `MAX_UPLOAD_BYTES`     | `20971520`                 |
    /// | `PUBLIC_BASE_URL`      | `http://localhost:3000`    |
    /// | `COOKIE_SECURE`        | `false`                    |
    /// | `MIN_PASSWORD_LENGTH`  | `8`                        |
    ///
    /// See [`JwtConfig::from_env`], [`StorageConfig::from_env`] and
    /// [`PushConfig::from_env`] for the rest.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| "20971520".into())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .trim_end_matches('/')
            .to_string();

        let cookie_secure: bool = std::env::var("COOKIE_SECURE")
            .unwrap_or_else(|_| "false".into())
            .parse()
            .expect("COOKIE_SECURE must be true or false");

        let min_password_length: usize = std::env::var("MIN_PASSWORD_LENGTH")
            .unwrap_or_else(|_| "8".into())
            .parse()
            .expect("MIN_PASSWORD_LENGTH must be a valid usize");

        let jwt = JwtConfig::from_env();
        let storage = StorageConfig::from_env(&jwt.secret);
        let push = PushConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_upload_bytes,
            public_base_url,
            cookie_secure,
            min_password_length,
            jwt,
            storage,
            push,
        }
    }
}

// ---------------------------------------------------------------------------
// Object storage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Files under a local directory, served back through `/api/objects`.
    Local,
    /// S3 or an S3-compatible gateway.
    S3,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub bucket: String,
    pub local_path: PathBuf,
    /// HMAC key for local signed URLs.
    pub signing_secret: String,
    pub s3_endpoint_url: Option<String>,
    /// Lifetime of signed retrieval URLs in seconds (default: `30`).
    pub signed_url_ttl_secs: u64,
}

impl StorageConfig {
    /// | Env Var                  | Default                 |
    /// |--------------------------|-------------------------|
    /// | `STORAGE_BACKEND`        | `local` (`local`/`s3`)  |
    /// | `STORAGE_BUCKET`         | `pdf`                   |
    /// | `STORAGE_LOCAL_PATH`     | `./data/objects`        |
    /// | `STORAGE_SIGNING_SECRET` | the JWT secret          |
    /// | `S3_ENDPOINT_URL`        | unset                   |
    /// | `SIGNED_URL_TTL_SECS`    | `30`                    |
    pub fn from_env(fallback_secret: &str) -> Self {
        let backend = match std::env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "local".into())
            .to_ascii_lowercase()
            .as_str()
        {
            "local" => StorageBackend::Local,
            "s3" => StorageBackend::S3,
            other => panic!("STORAGE_BACKEND must be 'local' or 's3', got '{other}'"),
        };

        let signing_secret = std::env::var("STORAGE_SIGNING_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| fallback_secret.to_string());

        let signed_url_ttl_secs: u64 = std::env::var("SIGNED_URL_TTL_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SIGNED_URL_TTL_SECS must be a valid u64");

        Self {
            backend,
            bucket: std::env::var("STORAGE_BUCKET").unwrap_or_else(|_| "pdf".into()),
            local_path: std::env::var("STORAGE_LOCAL_PATH")
                .unwrap_or_else(|_| "./data/objects".into())
                .into(),
            signing_secret,
            s3_endpoint_url: std::env::var("S3_ENDPOINT_URL")
                .ok()
                .filter(|s| !s.is_empty()),
            signed_url_ttl_secs,
        }
    }
}

// ---------------------------------------------------------------------------
// Push
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct PushConfig {
    /// URL-safe base64 VAPID private key. Push delivery is off when unset.
    pub vapid_private_key: Option<String>,
    pub vapid_subject: String,
}

impl PushConfig {
    /// | Env Var             | Default                  |
    /// |---------------------|--------------------------|
    /// | `VAPID_PRIVATE_KEY` | unset                    |
    /// | `VAPID_SUBJECT`     | `mailto:admin@localhost` |
    pub fn from_env() -> Self {
        Self {
            vapid_private_key: std::env::var("VAPID_PRIVATE_KEY")
                .ok()
                .filter(|s| !s.is_empty()),
            vapid_subject: std::env::var("VAPID_SUBJECT")
                .unwrap_or_else(|_| "mailto:admin@localhost".into()),
        }
    }
}
