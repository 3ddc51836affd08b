//! Storage abstraction trait
//!
//! All store backends (S3-compatible, local filesystem) implement
//! [`SlideStore`]. Error messages carry the raw backend text so the upload
//! layer can classify them by substring inspection.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("List failed: {0}")]
    ListFailed(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid object name: {0}")]
    InvalidName(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Remote object store for slide assets.
///
/// Uploads are keyed by a flat remote name. `put` must fail when an object
/// with the same name already exists; overwrite semantics are implemented
/// above this trait as delete-then-put.
#[async_trait]
pub trait SlideStore: Send + Sync {
    /// Upload an object. Fails with a duplicate-classified error when the
    /// name is already taken.
    async fn put(&self, name: &str, data: Bytes, content_type: &str) -> StoreResult<()>;

    /// Check whether an object exists.
    async fn exists(&self, name: &str) -> StoreResult<bool>;

    /// Delete an object by name.
    async fn delete(&self, name: &str) -> StoreResult<()>;

    /// Public URL for an object; derivable without a network round-trip.
    fn public_url(&self, name: &str) -> String;

    /// List all object names in the bucket.
    async fn list(&self) -> StoreResult<Vec<String>>;
}
