use crate::traits::{SlideStore, StoreError, StoreResult};
use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;
use tokio::fs;

/// Local filesystem store implementation, used for dry runs and tests.
///
/// Mirrors the remote store's duplicate semantics: `put` fails with a
/// duplicate-classified message when the target file already exists.
#[derive(Clone)]
pub struct LocalStore {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStore {
    /// Create a new LocalStore rooted at `base_path`; files are served from
    /// `base_url`.
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StoreResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StoreError::Config(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStore {
            base_path,
            base_url,
        })
    }

    /// Convert an object name to a filesystem path, rejecting traversal.
    fn name_to_path(&self, name: &str) -> StoreResult<PathBuf> {
        if name.is_empty() || name.contains("..") || name.contains('/') || name.contains('\\') {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        Ok(self.base_path.join(name))
    }
}

#[async_trait]
impl SlideStore for LocalStore {
    async fn put(&self, name: &str, data: Bytes, _content_type: &str) -> StoreResult<()> {
        let path = self.name_to_path(name)?;

        if fs::try_exists(&path).await? {
            return Err(StoreError::UploadFailed(format!(
                "409 duplicate: object {} already exists",
                name
            )));
        }

        fs::write(&path, &data)
            .await
            .map_err(|e| StoreError::UploadFailed(e.to_string()))?;

        tracing::info!(
            name = %name,
            size_bytes = data.len() as u64,
            path = %path.display(),
            "Local store upload successful"
        );

        Ok(())
    }

    async fn exists(&self, name: &str) -> StoreResult<bool> {
        let path = self.name_to_path(name)?;
        Ok(fs::try_exists(&path).await?)
    }

    async fn delete(&self, name: &str) -> StoreResult<()> {
        let path = self.name_to_path(name)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(name.to_string()))
            }
            Err(e) => Err(StoreError::DeleteFailed(e.to_string())),
        }
    }

    fn public_url(&self, name: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), name)
    }

    async fn list(&self) -> StoreResult<Vec<String>> {
        let mut entries = fs::read_dir(&self.base_path)
            .await
            .map_err(|e| StoreError::ListFailed(e.to_string()))?;
        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::ListFailed(e.to_string()))?
        {
            if entry.file_type().await.map(|t| t.is_file()).unwrap_or(false) {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use slidemill_core::UploadErrorKind;

    async fn test_store() -> (tempfile::TempDir, LocalStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path(), "http://localhost:3000/media".to_string())
            .await
            .unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn put_then_exists_and_list() {
        let (_dir, store) = test_store().await;
        store
            .put("Slide_001.mp4", Bytes::from_static(b"abc"), "video/mp4")
            .await
            .unwrap();
        assert!(store.exists("Slide_001.mp4").await.unwrap());
        assert!(!store.exists("Slide_002.mp4").await.unwrap());
        assert_eq!(store.list().await.unwrap(), vec!["Slide_001.mp4"]);
    }

    #[tokio::test]
    async fn duplicate_put_classifies_as_duplicate() {
        let (_dir, store) = test_store().await;
        store
            .put("Slide_001.mp4", Bytes::from_static(b"abc"), "video/mp4")
            .await
            .unwrap();
        let err = store
            .put("Slide_001.mp4", Bytes::from_static(b"def"), "video/mp4")
            .await
            .unwrap_err();
        assert_eq!(classify(&err.to_string()), UploadErrorKind::Duplicate);
    }

    #[tokio::test]
    async fn delete_removes_object() {
        let (_dir, store) = test_store().await;
        store
            .put("Slide_001.jpg", Bytes::from_static(b"abc"), "image/jpeg")
            .await
            .unwrap();
        store.delete("Slide_001.jpg").await.unwrap();
        assert!(!store.exists("Slide_001.jpg").await.unwrap());
        assert!(matches!(
            store.delete("Slide_001.jpg").await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn rejects_traversal_names() {
        let (_dir, store) = test_store().await;
        for name in ["../evil", "a/b", ""] {
            assert!(matches!(
                store.put(name, Bytes::new(), "text/plain").await,
                Err(StoreError::InvalidName(_))
            ));
        }
    }

    #[tokio::test]
    async fn public_url_joins_base() {
        let (_dir, store) = test_store().await;
        assert_eq!(
            store.public_url("Slide_001.mp4"),
            "http://localhost:3000/media/Slide_001.mp4"
        );
    }
}
