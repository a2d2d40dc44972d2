//! Filesystem-backed object store.
//!
//! Objects live at `<root>/<bucket>/<path>`. Signed URLs have the form
//!
//! ```text
//! <public_base_url>/api/objects/<path>?expires=<unix secs>&signature=<hex>
//! ```
//!
//! where the signature is HMAC-SHA256 over `"<bucket>\n<path>\n<expires>"`.
//! A URL is accepted strictly before `expires`; at or after it, it is rejected.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use cheddit_core::documents::validate_object_path;
use cheddit_core::types::Timestamp;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::{ObjectEntry, ObjectStore, StorageError};

type HmacSha256 = Hmac<Sha256>;

/// Route (relative to the public base URL) that serves signed local objects.
pub const SIGNED_OBJECT_ROUTE: &str = "/api/objects";

pub struct LocalObjectStore {
    root: PathBuf,
    bucket: String,
    public_base_url: String,
    signing_key: Vec<u8>,
}

impl LocalObjectStore {
    pub fn new(
        root: impl Into<PathBuf>,
        bucket: impl Into<String>,
        public_base_url: impl Into<String>,
        signing_key: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            root: root.into(),
            bucket: bucket.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
            signing_key: signing_key.into(),
        }
    }

    /// Build a signed URL as if issued at `now`.
    pub fn signed_url_at(
        &self,
        path: &str,
        ttl: Duration,
        now: Timestamp,
    ) -> Result<String, StorageError> {
        check_path(path)?;
        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        let expires = now.timestamp().saturating_add(ttl_secs);
        let signature = self.sign(path, expires);
        Ok(format!(
            "{}{SIGNED_OBJECT_ROUTE}/{path}?expires={expires}&signature={signature}",
            self.public_base_url
        ))
    }

    /// Verify a signature as of `now`.
    pub fn verify_at(
        &self,
        path: &str,
        expires: i64,
        signature: &str,
        now: Timestamp,
    ) -> Result<(), StorageError> {
        check_path(path)?;
        let provided = hex::decode(signature).map_err(|_| StorageError::InvalidSignature)?;
        self.mac_for(path, expires)
            .verify_slice(&provided)
            .map_err(|_| StorageError::InvalidSignature)?;
        if now.timestamp() >= expires {
            return Err(StorageError::Expired);
        }
        Ok(())
    }

    fn sign(&self, path: &str, expires: i64) -> String {
        hex::encode(self.mac_for(path, expires).finalize().into_bytes())
    }

    fn mac_for(&self, path: &str, expires: i64) -> HmacSha256 {
        let mut mac = HmacSha256::new_from_slice(&self.signing_key)
            .expect("HMAC accepts keys of any length");
        mac.update(format!("{}\n{path}\n{expires}", self.bucket).as_bytes());
        mac
    }

    fn object_path(&self, path: &str) -> Result<PathBuf, StorageError> {
        check_path(path)?;
        Ok(self.root.join(&self.bucket).join(path))
    }
}

fn check_path(path: &str) -> Result<(), StorageError> {
    validate_object_path(path).map_err(|_| StorageError::InvalidPath(path.to_string()))
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let target = self.object_path(path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, &bytes).await?;
        tracing::debug!(path, content_type, size = bytes.len(), "Stored object on disk");
        Ok(())
    }

    async fn download(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let target = self.object_path(path)?;
        match tokio::fs::read(&target).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(path.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, path: &str) -> Result<bool, StorageError> {
        let target = self.object_path(path)?;
        match tokio::fs::metadata(&target).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self, prefix: &str) -> Result<Vec<ObjectEntry>, StorageError> {
        let dir = self.object_path(prefix)?;
        let mut read_dir = match tokio::fs::read_dir(&dir).await {
            Ok(rd) => rd,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut entries = Vec::new();
        while let Some(entry) = read_dir.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            entries.push(ObjectEntry {
                key: format!("{prefix}/{name}"),
                name,
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn create_signed_url(&self, path: &str, ttl: Duration) -> Result<String, StorageError> {
        self.signed_url_at(path, ttl, Utc::now())
    }

    fn verify_signed_request(
        &self,
        path: &str,
        expires: i64,
        signature: &str,
    ) -> Result<(), StorageError> {
        self.verify_at(path, expires, signature, Utc::now())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
