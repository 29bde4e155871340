//! Storage abstraction trait
//!
//! Defines the Storage trait document-file backends must implement.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// The document record store persists metadata only; the file bytes go
/// through this trait, so the repository layer never couples to a specific
/// backend.
///
/// **Key format:** keys are user-scoped: `documents/{user_id}/{filename}`.
/// See the `keys` module.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store a file under the given key and return its public URL.
    async fn upload(&self, storage_key: &str, data: Bytes) -> StorageResult<String>;

    /// Fetch the file stored under the key.
    async fn download(&self, storage_key: &str) -> StorageResult<Bytes>;

    /// Remove the file stored under the key. Deleting a missing key is an error.
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Whether a file exists under the key.
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;
}
