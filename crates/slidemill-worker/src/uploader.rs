//! Transient-retry upload primitive.
//!
//! One [`Uploader::upload`] call is a complete upload sequence for a single
//! file: acquire the concurrency permit, read the file, then attempt the put
//! up to `max_attempts` times with exponential backoff on transient
//! failures. Duplicate and size-rejection failures are classified and
//! returned for the caller to act on; only network-shaped errors are retried
//! here.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use slidemill_core::{UploadErrorKind, UploadOutcome};
use slidemill_storage::{classify, is_transient, SlideStore};
use tokio::sync::Semaphore;

const MAX_ATTEMPTS: u32 = 3;
const INITIAL_BACKOFF: Duration = Duration::from_secs(2);

/// Uploads files to a [`SlideStore`] under a global concurrency limit.
pub struct Uploader {
    store: Arc<dyn SlideStore>,
    semaphore: Arc<Semaphore>,
    max_attempts: u32,
    initial_backoff: Duration,
}

impl Uploader {
    pub fn new(store: Arc<dyn SlideStore>, max_concurrent: usize) -> Self {
        Self {
            store,
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            max_attempts: MAX_ATTEMPTS,
            initial_backoff: INITIAL_BACKOFF,
        }
    }

    /// Override the transient-retry backoff. Tests use this to avoid
    /// multi-second sleeps.
    pub fn with_backoff(mut self, initial: Duration) -> Self {
        self.initial_backoff = initial;
        self
    }

    pub fn store(&self) -> &Arc<dyn SlideStore> {
        &self.store
    }

    /// Upload `path` as `remote_name`. Holds a concurrency permit for the
    /// whole attempt sequence so retries cannot amplify load on the store.
    pub async fn upload(
        &self,
        path: &Path,
        remote_name: &str,
        slide_name: &str,
        content_type: &str,
    ) -> UploadOutcome {
        let _permit = match self.semaphore.acquire().await {
            Ok(permit) => permit,
            // Closed only if the semaphore was dropped, which cannot happen
            // while `self` is alive.
            Err(_) => {
                return UploadOutcome::failure(UploadErrorKind::Other, "upload slots closed")
            }
        };

        let data = match tokio::fs::read(path).await {
            Ok(data) => Bytes::from(data),
            Err(e) => {
                return UploadOutcome::failure(
                    UploadErrorKind::Other,
                    format!("failed to read {}: {e}", path.display()),
                )
            }
        };

        let mut backoff = self.initial_backoff;
        let mut attempt = 1;
        loop {
            // On re-attempts the previous put may have landed before the
            // connection dropped; an existing object means we are done.
            if attempt > 1 {
                if let Ok(true) = self.store.exists(remote_name).await {
                    tracing::info!(
                        slide = %slide_name,
                        object = %remote_name,
                        "Object present after retry, treating as uploaded"
                    );
                    return UploadOutcome::success(self.store.public_url(remote_name));
                }
            }

            match self.store.put(remote_name, data.clone(), content_type).await {
                Ok(()) => {
                    tracing::info!(
                        slide = %slide_name,
                        object = %remote_name,
                        size_kb = data.len() as u64 / 1024,
                        "Upload successful"
                    );
                    return UploadOutcome::success(self.store.public_url(remote_name));
                }
                Err(e) => {
                    let message = e.to_string();
                    let kind = classify(&message);

                    // A duplicate on a re-attempt means the first put
                    // succeeded; idempotent success.
                    if kind == UploadErrorKind::Duplicate && attempt > 1 {
                        return UploadOutcome::success(self.store.public_url(remote_name));
                    }

                    if kind == UploadErrorKind::Other
                        && is_transient(&message)
                        && attempt < self.max_attempts
                    {
                        tracing::warn!(
                            slide = %slide_name,
                            attempt = attempt,
                            error = %message,
                            "Transient upload error, backing off"
                        );
                        tokio::time::sleep(backoff).await;
                        backoff *= 2;
                        attempt += 1;
                        continue;
                    }

                    return UploadOutcome::failure(kind, message);
                }
            }
        }
    }
}
