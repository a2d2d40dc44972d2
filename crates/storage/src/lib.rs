//! Object storage for uploaded documents.
//!
//! [`ObjectStore`] is the narrow contract the rest of the service uses:
//! upload, download, list, existence check, and short-lived signed
//! retrieval URLs. Storage credentials never leave the server; clients only
//! ever see signed URLs.
//!
//! - [`s3::S3ObjectStore`] -- any S3-compatible service; URLs are presigned GETs.
//! - [`local::LocalObjectStore`] -- a directory on disk; URLs point back at this
//!   service and carry an HMAC-SHA256 signature over the path and expiry.

use std::time::Duration;

use async_trait::async_trait;

pub mod error;
pub mod local;
pub mod s3;

pub use error::StorageError;
pub use local::LocalObjectStore;
pub use s3::S3ObjectStore;

/// One entry returned by [`ObjectStore::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectEntry {
    /// Full path inside the bucket, e.g. `pdf/1700000000000_report.pdf`.
    pub key: String,
    /// Final path segment, e.g. `1700000000000_report.pdf`.
    pub name: String,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str)
        -> Result<(), StorageError>;

    async fn download(&self, path: &str) -> Result<Vec<u8>, StorageError>;

    async fn exists(&self, path: &str) -> Result<bool, StorageError>;

    /// Entries directly under `prefix` (a folder name without trailing slash).
    async fn list(&self, prefix: &str) -> Result<Vec<ObjectEntry>, StorageError>;

    /// A URL granting read access to `path` for `ttl`.
    async fn create_signed_url(&self, path: &str, ttl: Duration) -> Result<String, StorageError>;

    /// Check a signed request that was routed back to this service.
    ///
    /// Only backends whose URLs point at this service support it.
    fn verify_signed_request(
        &self,
        _path: &str,
        _expires: i64,
        _signature: &str,
    ) -> Result<(), StorageError> {
        Err(StorageError::Unsupported(
            "signed URLs for this backend are served by the storage provider",
        ))
    }
}
