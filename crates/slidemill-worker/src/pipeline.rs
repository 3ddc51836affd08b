//! Per-slide pipeline: download, compression dispatch, upload, and the
//! recompression retry controller for size-rejected videos.
//!
//! [`SlidePipeline::process`] is total: every failure mode is folded into the
//! returned [`SlideStatus`], so callers always get exactly one status per
//! request.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use slidemill_core::config::QUALITY_STEP;
use slidemill_core::{
    CompressionOutcome, MediaKind, PipelineConfig, SlideRequest, SlideStatus, UploadErrorKind,
    UploadOutcome,
};
use slidemill_processing::{AssetFetcher, ImageTranscoder, VideoTranscoder};

use crate::observer::{PipelineObserver, TracingObserver};
use crate::uploader::Uploader;
use crate::workdir::WorkDirs;

/// Processes one slide end to end.
pub struct SlidePipeline {
    config: PipelineConfig,
    fetcher: Arc<dyn AssetFetcher>,
    video: Arc<dyn VideoTranscoder>,
    image: Arc<dyn ImageTranscoder>,
    uploader: Uploader,
    observer: Arc<dyn PipelineObserver>,
}

impl SlidePipeline {
    pub fn new(
        config: PipelineConfig,
        fetcher: Arc<dyn AssetFetcher>,
        video: Arc<dyn VideoTranscoder>,
        image: Arc<dyn ImageTranscoder>,
        uploader: Uploader,
    ) -> Self {
        Self {
            config,
            fetcher,
            video,
            image,
            uploader,
            observer: Arc::new(TracingObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the full pipeline for one slide. Never panics and never returns
    /// early without a finalized status.
    pub async fn process(&self, request: &SlideRequest, dirs: &WorkDirs) -> SlideStatus {
        let started = Instant::now();
        let mut status = SlideStatus::new(request);
        let name = status.slide_name.clone();
        let ext = request.extension();

        self.observer.slide_started(&name, &request.source_url);

        let original = dirs.download_dir.join(format!("{name}_original{ext}"));
        if let Err(e) = self.fetcher.fetch(&request.source_url, &original).await {
            let message = format!("Download failed: {e}");
            self.observer.stage_failed(&name, "download", &message);
            status.error_message = message;
            status.elapsed_secs = started.elapsed().as_secs_f64();
            return status;
        }
        status.download_success = true;

        // Compression dispatch. Compression failure is not terminal: the
        // original file is uploaded as-is with an uncompressed outcome.
        let (local, remote, mut outcome) = match status.media_kind {
            MediaKind::Video => {
                let compressed = dirs.compressed_dir.join(format!("{name}_compressed.mp4"));
                let remote = format!("{name}.mp4");
                match self
                    .video
                    .transcode(&original, &compressed, &name, self.config.initial_quality)
                    .await
                {
                    Ok(outcome) => (compressed, remote, outcome),
                    Err(e) => {
                        self.observer.stage_failed(&name, "compress", &e.to_string());
                        (original.clone(), remote, uncompressed_outcome(&original).await)
                    }
                }
            }
            MediaKind::Image => {
                let compressed = dirs.compressed_dir.join(format!("{name}_compressed.jpg"));
                match self.image.transcode(&original, &compressed, &name).await {
                    Ok(outcome) => (compressed, format!("{name}.jpg"), outcome),
                    Err(e) => {
                        self.observer.stage_failed(&name, "compress", &e.to_string());
                        (
                            original.clone(),
                            format!("{name}{ext}"),
                            uncompressed_outcome(&original).await,
                        )
                    }
                }
            }
            MediaKind::Other => (
                original.clone(),
                format!("{name}{ext}"),
                uncompressed_outcome(&original).await,
            ),
        };
        status.compression_success = outcome.was_compressed();

        let result = self
            .upload_with_retry(&local, &remote, &name, status.media_kind, &original, dirs, &mut outcome)
            .await;

        status.upload_attempts = outcome.attempts;
        status.compression = Some(outcome);
        match result {
            UploadOutcome::Success { url } => {
                status.upload_success = true;
                status.new_url = url;
            }
            UploadOutcome::Skipped { .. } => {
                status.skipped = true;
            }
            UploadOutcome::Failure { message, .. } => {
                self.observer.stage_failed(&name, "upload", &message);
                status.error_message = message;
            }
        }
        status.elapsed_secs = started.elapsed().as_secs_f64();
        status
    }

    /// Upload with the two slide-level retry policies layered on top of the
    /// transient retries inside [`Uploader`]: duplicate handling
    /// (overwrite or skip) and the video recompression loop on size
    /// rejection.
    async fn upload_with_retry(
        &self,
        local: &Path,
        remote: &str,
        name: &str,
        kind: MediaKind,
        original: &Path,
        dirs: &WorkDirs,
        outcome: &mut CompressionOutcome,
    ) -> UploadOutcome {
        let content_type = content_type_for(remote);
        let result = self.uploader.upload(local, remote, name, content_type).await;

        match result {
            UploadOutcome::Failure {
                kind: UploadErrorKind::Duplicate,
                ..
            } => {
                if self.config.overwrite {
                    tracing::info!(slide = %name, object = %remote, "Overwriting existing object");
                    if let Err(e) = self.uploader.store().delete(remote).await {
                        let message = format!("Overwrite delete failed: {e}");
                        self.observer.stage_failed(name, "overwrite", &message);
                        return UploadOutcome::failure(UploadErrorKind::Other, message);
                    }
                    self.uploader.upload(local, remote, name, content_type).await
                } else {
                    self.observer.slide_skipped(name, remote);
                    UploadOutcome::Skipped {
                        reason: format!("object {remote} already exists"),
                    }
                }
            }
            UploadOutcome::Failure {
                kind: UploadErrorKind::TooLarge,
                ..
            } if kind == MediaKind::Video => {
                self.recompress_until_fits(remote, name, original, dirs, outcome, result)
                    .await
            }
            other => other,
        }
    }

    /// Walk the quality parameter upward in fixed steps, re-transcoding from
    /// the original download and re-uploading, until the store accepts the
    /// file or the quality ceiling is reached. `failure` is the size
    /// rejection that triggered the loop and is returned if the ceiling is
    /// hit without success.
    async fn recompress_until_fits(
        &self,
        remote: &str,
        name: &str,
        original: &Path,
        dirs: &WorkDirs,
        outcome: &mut CompressionOutcome,
        mut failure: UploadOutcome,
    ) -> UploadOutcome {
        let content_type = content_type_for(remote);
        let mut current = outcome.final_quality.unwrap_or(self.config.initial_quality);

        while current < self.config.max_quality {
            let next = (current + QUALITY_STEP).min(self.config.max_quality);
            self.observer.recompression_retry(name, next);

            if !original.exists() {
                return UploadOutcome::failure(
                    UploadErrorKind::Other,
                    format!("original file missing for recompression: {}", original.display()),
                );
            }

            let retry_output = dirs.compressed_dir.join(format!("{name}_retry_q{next}.mp4"));

            let retried = match self
                .video
                .transcode(original, &retry_output, name, next)
                .await
            {
                Ok(retried) => retried,
                Err(e) => {
                    let message = format!("Recompression failed: {e}");
                    self.observer.stage_failed(name, "compress", &message);
                    return UploadOutcome::failure(UploadErrorKind::Other, message);
                }
            };
            outcome.compressed_size_kb = retried.compressed_size_kb;
            outcome.final_quality = retried.final_quality;
            outcome.attempts += 1;
            outcome.recalculate_ratio();

            match self
                .uploader
                .upload(&retry_output, remote, name, content_type)
                .await
            {
                UploadOutcome::Failure {
                    kind: UploadErrorKind::TooLarge,
                    message,
                } => {
                    failure = UploadOutcome::failure(UploadErrorKind::TooLarge, message);
                    current = next;
                }
                other => return other,
            }
        }

        failure
    }
}

async fn uncompressed_outcome(path: &Path) -> CompressionOutcome {
    let size_kb = tokio::fs::metadata(path)
        .await
        .map(|m| m.len() / 1024)
        .unwrap_or(0);
    CompressionOutcome::uncompressed(size_kb)
}

/// MIME type from the remote object name's extension.
pub fn content_type_for(name: &str) -> &'static str {
    match name.rsplit('.').next().map(str::to_ascii_lowercase).as_deref() {
        Some("mp4") => "video/mp4",
        Some("avi") => "video/x-msvideo",
        Some("mov") => "video/quicktime",
        Some("mkv") => "video/x-matroska",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}
