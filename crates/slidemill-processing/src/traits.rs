//! Capability traits for download and compression.
//!
//! The worker crate depends on these seams rather than the concrete
//! implementations, so pipeline behavior can be tested with scripted
//! fetchers and transcoders.

use async_trait::async_trait;
use slidemill_core::CompressionOutcome;
use std::path::Path;

use crate::error::ProcessingError;

/// Fetches a remote asset to a local file.
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<(), ProcessingError>;
}

/// Compresses a video file at a given quality parameter.
///
/// On success the returned outcome carries the input and output sizes and
/// `final_quality = Some(quality)`. Failure leaves the output path in an
/// unspecified state; callers fall back to the original file.
#[async_trait]
pub trait VideoTranscoder: Send + Sync {
    async fn transcode(
        &self,
        input: &Path,
        output: &Path,
        slide_name: &str,
        quality: u32,
    ) -> Result<CompressionOutcome, ProcessingError>;
}

/// Compresses an image file (resize clamp + quality reduction).
#[async_trait]
pub trait ImageTranscoder: Send + Sync {
    async fn transcode(
        &self,
        input: &Path,
        output: &Path,
        slide_name: &str,
    ) -> Result<CompressionOutcome, ProcessingError>;
}
