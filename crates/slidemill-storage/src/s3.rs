use crate::traits::{SlideStore, StoreError, StoreResult};
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{ObjectStore, ObjectStoreExt, PutMode, PutOptions, PutPayload};

/// S3-compatible store implementation.
#[derive(Clone)]
pub struct S3Store {
    store: AmazonS3,
    bucket: String,
    region: String,
    endpoint_url: Option<String>, // Custom endpoint for S3-compatible providers
}

impl S3Store {
    /// Create a new S3Store.
    ///
    /// Credentials come from the environment. `endpoint_url` targets
    /// S3-compatible providers (e.g. "http://localhost:9000" for MinIO);
    /// public URLs become path-style when it is set.
    pub fn new(bucket: String, region: String, endpoint_url: Option<String>) -> StoreResult<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region.clone())
            .with_bucket_name(bucket.clone());

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StoreError::Config(e.to_string()))?;

        Ok(S3Store {
            store,
            bucket,
            region,
            endpoint_url,
        })
    }
}

#[async_trait]
impl SlideStore for S3Store {
    async fn put(&self, name: &str, data: Bytes, _content_type: &str) -> StoreResult<()> {
        let size = data.len() as u64;
        let location = Path::from(name.to_string());
        let start = std::time::Instant::now();

        // PutMode::Create so a name collision surfaces as an error instead
        // of silently replacing the existing object.
        let options = PutOptions::from(PutMode::Create);
        let result = self
            .store
            .put_opts(&location, PutPayload::from(data), options)
            .await;

        result.map_err(|e| {
            let message = match e {
                ObjectStoreError::AlreadyExists { path, .. } => {
                    format!("409 duplicate: object {} already exists", path)
                }
                other => other.to_string(),
            };
            tracing::error!(
                error = %message,
                bucket = %self.bucket,
                name = %name,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload failed"
            );
            StoreError::UploadFailed(message)
        })?;

        tracing::info!(
            bucket = %self.bucket,
            name = %name,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(())
    }

    async fn exists(&self, name: &str) -> StoreResult<bool> {
        let location = Path::from(name.to_string());
        match self.store.head(&location).await {
            Ok(_) => Ok(true),
            Err(ObjectStoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(StoreError::BackendError(e.to_string())),
        }
    }

    async fn delete(&self, name: &str) -> StoreResult<()> {
        let start = std::time::Instant::now();
        let location = Path::from(name.to_string());

        self.store.delete(&location).await.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                name = %name,
                "S3 delete failed"
            );
            StoreError::DeleteFailed(e.to_string())
        })?;

        tracing::info!(
            bucket = %self.bucket,
            name = %name,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 delete successful"
        );

        Ok(())
    }

    /// Public URL for an object.
    ///
    /// AWS S3 uses virtual-hosted-style; custom endpoints use path-style
    /// ({endpoint}/{bucket}/{name}) for compatibility.
    fn public_url(&self, name: &str) -> String {
        if let Some(ref endpoint) = self.endpoint_url {
            let base_url = endpoint.trim_end_matches('/');
            format!("{}/{}/{}", base_url, self.bucket, name)
        } else {
            format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, name
            )
        }
    }

    async fn list(&self) -> StoreResult<Vec<String>> {
        let mut stream = self.store.list(None);
        let mut names = Vec::new();
        while let Some(meta) = stream.next().await {
            let meta = meta.map_err(|e| StoreError::ListFailed(e.to_string()))?;
            if let Some(filename) = meta.location.filename() {
                names.push(filename.to_string());
            }
        }
        Ok(names)
    }
}
