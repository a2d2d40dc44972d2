#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid object path: {0}")]
    InvalidPath(String),

    #[error("Signed URL has expired")]
    Expired,

    #[error("Signed URL signature is invalid")]
    InvalidSignature,

    #[error("Unsupported operation: {0}")]
    Unsupported(&'static str),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error reported by a remote storage provider.
    #[error("Storage backend error: {0}")]
    Backend(String),
}
