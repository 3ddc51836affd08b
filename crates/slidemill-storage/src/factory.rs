use crate::{LocalStore, S3Store, SlideStore, StoreError, StoreResult};
use slidemill_core::{StoreBackend, StoreConfig};
use std::sync::Arc;

/// Create a slide store based on configuration.
pub async fn create_store(config: &StoreConfig) -> StoreResult<Arc<dyn SlideStore>> {
    match config.backend {
        StoreBackend::S3 => {
            if config.bucket.is_empty() {
                return Err(StoreError::Config("bucket not configured".to_string()));
            }
            let store = S3Store::new(
                config.bucket.clone(),
                config.region.clone(),
                config.endpoint.clone(),
            )?;
            Ok(Arc::new(store))
        }
        StoreBackend::Local => {
            let base_path = config.local_path.clone().ok_or_else(|| {
                StoreError::Config("local storage path not configured".to_string())
            })?;
            let base_url = config
                .local_base_url
                .clone()
                .unwrap_or_else(|| format!("file://{}", base_path.trim_end_matches('/')));

            let store = LocalStore::new(base_path, base_url).await?;
            Ok(Arc::new(store))
        }
    }
}
