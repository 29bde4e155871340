use crate::traits::{Storage, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage implementation
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "/var/lib/seva/documents")
    /// * `base_url` - Base URL under which files are addressable (e.g., "http://localhost:3001/files")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Convert a storage key to a filesystem path, rejecting keys that could
    /// escape the base directory.
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        if storage_key.is_empty()
            || storage_key.starts_with('/')
            || storage_key
                .split('/')
                .any(|segment| segment.is_empty() || segment == "." || segment == "..")
        {
            return Err(StorageError::InvalidKey(format!(
                "Storage key contains invalid path segments: {}",
                storage_key
            )));
        }
        Ok(self.base_path.join(storage_key))
    }

    fn key_to_url(&self, storage_key: &str) -> String {
        format!("{}/{}", self.base_url, storage_key)
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn upload(&self, storage_key: &str, data: Bytes) -> StorageResult<String> {
        let path = self.key_to_path(storage_key)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::UploadFailed(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let mut file = fs::File::create(&path)
            .await
            .map_err(|e| StorageError::UploadFailed(format!("Failed to create file: {}", e)))?;
        file.write_all(&data)
            .await
            .map_err(|e| StorageError::UploadFailed(format!("Failed to write file: {}", e)))?;
        file.flush()
            .await
            .map_err(|e| StorageError::UploadFailed(format!("Failed to flush file: {}", e)))?;

        tracing::debug!(storage_key = %storage_key, size = data.len(), "Stored document file");

        Ok(self.key_to_url(storage_key))
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Bytes> {
        let path = self.key_to_path(storage_key)?;
        match fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(storage_key.to_string()))
            }
            Err(e) => Err(StorageError::DownloadFailed(format!(
                "Failed to read {}: {}",
                storage_key, e
            ))),
        }
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        let path = self.key_to_path(storage_key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(storage_key.to_string()))
            }
            Err(e) => Err(StorageError::DeleteFailed(format!(
                "Failed to delete {}: {}",
                storage_key, e
            ))),
        }
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(storage_key)?;
        Ok(fs::try_exists(&path).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn test_storage() -> (TempDir, LocalStorage) {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path(), "http://localhost:3001/files".to_string())
            .await
            .unwrap();
        (dir, storage)
    }

    #[tokio::test]
    async fn test_upload_download_round_trip() {
        let (_dir, storage) = test_storage().await;

        let url = storage
            .upload("documents/u1/aadhar-card-1.pdf", Bytes::from_static(b"%PDF-1.4"))
            .await
            .unwrap();
        assert_eq!(
            url,
            "http://localhost:3001/files/documents/u1/aadhar-card-1.pdf"
        );

        let data = storage.download("documents/u1/aadhar-card-1.pdf").await.unwrap();
        assert_eq!(&data[..], b"%PDF-1.4");
        assert!(storage.exists("documents/u1/aadhar-card-1.pdf").await.unwrap());
    }

    #[tokio::test]
    async fn test_upload_overwrites() {
        let (_dir, storage) = test_storage().await;
        storage
            .upload("documents/u1/x.pdf", Bytes::from_static(b"old"))
            .await
            .unwrap();
        storage
            .upload("documents/u1/x.pdf", Bytes::from_static(b"new"))
            .await
            .unwrap();
        let data = storage.download("documents/u1/x.pdf").await.unwrap();
        assert_eq!(&data[..], b"new");
    }

    #[tokio::test]
    async fn test_delete() {
        let (_dir, storage) = test_storage().await;
        storage
            .upload("documents/u1/x.pdf", Bytes::from_static(b"data"))
            .await
            .unwrap();
        storage.delete("documents/u1/x.pdf").await.unwrap();
        assert!(!storage.exists("documents/u1/x.pdf").await.unwrap());

        let err = storage.delete("documents/u1/x.pdf").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_download_missing_is_not_found() {
        let (_dir, storage) = test_storage().await;
        let err = storage.download("documents/u1/absent.pdf").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_traversal_keys_rejected() {
        let (_dir, storage) = test_storage().await;
        for key in [
            "../outside.pdf",
            "documents/../../etc/passwd",
            "/absolute.pdf",
            "documents//double.pdf",
            "",
        ] {
            let err = storage.upload(key, Bytes::from_static(b"x")).await.unwrap_err();
            assert!(matches!(err, StorageError::InvalidKey(_)), "key: {:?}", key);
        }
    }
}
