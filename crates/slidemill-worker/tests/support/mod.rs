//! Scripted test doubles for the pipeline seams.
#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use slidemill_core::{CompressionMethod, CompressionOutcome, PipelineConfig};
use slidemill_processing::{AssetFetcher, ImageTranscoder, ProcessingError, VideoTranscoder};
use slidemill_storage::{SlideStore, StoreError, StoreResult};
use slidemill_worker::{PipelineObserver, SlidePipeline, Uploader};

/// In-memory store whose `put` results follow a pre-loaded script.
///
/// Each `put` call pops the next scripted result; an exhausted script means
/// success. Successful puts land in an object set backing `exists`, `delete`
/// and `list`.
#[derive(Default)]
pub struct MockStore {
    script: Mutex<VecDeque<Result<(), String>>>,
    objects: Mutex<HashSet<String>>,
    puts: Mutex<Vec<String>>,
    deletes: Mutex<Vec<String>>,
}

impl MockStore {
    pub fn scripted(results: Vec<Result<(), String>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(results.into()),
            ..Default::default()
        })
    }

    pub fn with_object(self: Arc<Self>, name: &str) -> Arc<Self> {
        self.objects.lock().unwrap().insert(name.to_string());
        self
    }

    pub fn put_names(&self) -> Vec<String> {
        self.puts.lock().unwrap().clone()
    }

    pub fn deleted_names(&self) -> Vec<String> {
        self.deletes.lock().unwrap().clone()
    }
}

#[async_trait]
impl SlideStore for MockStore {
    async fn put(&self, name: &str, _data: Bytes, _content_type: &str) -> StoreResult<()> {
        self.puts.lock().unwrap().push(name.to_string());
        match self.script.lock().unwrap().pop_front() {
            Some(Err(message)) => Err(StoreError::UploadFailed(message)),
            _ => {
                self.objects.lock().unwrap().insert(name.to_string());
                Ok(())
            }
        }
    }

    async fn exists(&self, name: &str) -> StoreResult<bool> {
        Ok(self.objects.lock().unwrap().contains(name))
    }

    async fn delete(&self, name: &str) -> StoreResult<()> {
        self.deletes.lock().unwrap().push(name.to_string());
        self.objects.lock().unwrap().remove(name);
        Ok(())
    }

    fn public_url(&self, name: &str) -> String {
        format!("https://cdn.test/{name}")
    }

    async fn list(&self) -> StoreResult<Vec<String>> {
        let mut names: Vec<String> = self.objects.lock().unwrap().iter().cloned().collect();
        names.sort();
        Ok(names)
    }
}

/// Fetcher that writes fixed bytes, or fails for URLs containing `bad`.
pub struct StubFetcher;

#[async_trait]
impl AssetFetcher for StubFetcher {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<(), ProcessingError> {
        if url.contains("bad") {
            return Err(ProcessingError::Download(format!("HTTP 404 for {url}")));
        }
        tokio::fs::write(dest, b"original asset bytes").await?;
        Ok(())
    }
}

/// Video transcoder that records every call (quality and output path) and
/// writes a small output file.
#[derive(Default)]
pub struct StubVideo {
    calls: Mutex<Vec<(u32, PathBuf)>>,
    fail: bool,
}

impl StubVideo {
    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn qualities(&self) -> Vec<u32> {
        self.calls.lock().unwrap().iter().map(|(q, _)| *q).collect()
    }

    pub fn output_paths(&self) -> Vec<PathBuf> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, path)| path.clone())
            .collect()
    }
}

#[async_trait]
impl VideoTranscoder for StubVideo {
    async fn transcode(
        &self,
        input: &Path,
        output: &Path,
        _slide_name: &str,
        quality: u32,
    ) -> Result<CompressionOutcome, ProcessingError> {
        self.calls
            .lock()
            .unwrap()
            .push((quality, output.to_path_buf()));
        if self.fail {
            return Err(ProcessingError::TranscoderFailed("exit status 1".into()));
        }
        let original_len = tokio::fs::metadata(input).await?.len();
        tokio::fs::write(output, vec![0u8; 8]).await?;
        let mut outcome = CompressionOutcome::new(CompressionMethod::Video);
        outcome.original_size_kb = original_len / 1024;
        outcome.compressed_size_kb = 0;
        outcome.final_quality = Some(quality);
        outcome.recalculate_ratio();
        Ok(outcome)
    }
}

/// Image transcoder writing a tiny fixed output.
pub struct StubImage;

#[async_trait]
impl ImageTranscoder for StubImage {
    async fn transcode(
        &self,
        input: &Path,
        output: &Path,
        _slide_name: &str,
    ) -> Result<CompressionOutcome, ProcessingError> {
        let original_len = tokio::fs::metadata(input).await?.len();
        tokio::fs::write(output, vec![0u8; 4]).await?;
        let mut outcome = CompressionOutcome::new(CompressionMethod::Image);
        outcome.original_size_kb = original_len / 1024;
        outcome.compressed_size_kb = 0;
        outcome.recalculate_ratio();
        Ok(outcome)
    }
}

/// Observer that records which events fired, for asserting how outcomes
/// are reported.
#[derive(Default)]
pub struct RecordingObserver {
    failed_stages: Mutex<Vec<(String, String)>>,
    skips: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub fn failed_stages(&self) -> Vec<(String, String)> {
        self.failed_stages.lock().unwrap().clone()
    }

    pub fn skips(&self) -> Vec<String> {
        self.skips.lock().unwrap().clone()
    }
}

impl PipelineObserver for RecordingObserver {
    fn stage_failed(&self, slide_name: &str, stage: &str, _error: &str) {
        self.failed_stages
            .lock()
            .unwrap()
            .push((slide_name.to_string(), stage.to_string()));
    }

    fn slide_skipped(&self, slide_name: &str, _remote_name: &str) {
        self.skips.lock().unwrap().push(slide_name.to_string());
    }
}

/// Pipeline wired with the standard doubles and a fast retry backoff.
pub fn build_pipeline(
    config: PipelineConfig,
    store: Arc<MockStore>,
    video: Arc<StubVideo>,
) -> SlidePipeline {
    let uploads = config.max_concurrent_uploads;
    let uploader = Uploader::new(store, uploads).with_backoff(Duration::from_millis(1));
    SlidePipeline::new(
        config,
        Arc::new(StubFetcher),
        video,
        Arc::new(StubImage),
        uploader,
    )
}

pub const TOO_LARGE: &str = "HTTP 413: Request Entity Too Large";
pub const DUPLICATE: &str = "409 Conflict: duplicate object";
