//! Pipeline and storage configuration.
//!
//! Quality parameters follow the x264 constant-quality scale used by
//! HandBrakeCLI: lower values mean higher fidelity and larger files. The
//! recompression retry loop walks the quality upward in fixed steps until the
//! configured ceiling.

use crate::error::ConfigError;

/// Valid range for the video quality parameter.
pub const QUALITY_MIN: u32 = 18;
pub const QUALITY_MAX: u32 = 35;

/// Valid range for the worker pool size.
pub const WORKERS_MIN: usize = 1;
pub const WORKERS_MAX: usize = 50;

/// Quality increment applied on each recompression retry.
pub const QUALITY_STEP: u32 = 2;

/// Configuration for the slide processing pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Initial video quality parameter (lower = higher fidelity).
    pub initial_quality: u32,
    /// Quality ceiling for recompression retries.
    pub max_quality: u32,
    /// JPEG quality for image compression (0-100 scale).
    pub image_quality: u8,
    /// Number of parallel slide workers.
    pub workers: usize,
    /// Upper bound on concurrent uploads, independent of worker count.
    pub max_concurrent_uploads: usize,
    /// Delete and re-upload when the remote object already exists.
    pub overwrite: bool,
    /// Target bucket/container name.
    pub bucket: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            initial_quality: 28,
            max_quality: 35,
            image_quality: 85,
            workers: 10,
            max_concurrent_uploads: 5,
            overwrite: false,
            bucket: "slide-media".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Validate value ranges. Called once at startup; the pipeline assumes a
    /// validated config thereafter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for value in [self.initial_quality, self.max_quality] {
            if !(QUALITY_MIN..=QUALITY_MAX).contains(&value) {
                return Err(ConfigError::QualityOutOfRange {
                    value,
                    min: QUALITY_MIN,
                    max: QUALITY_MAX,
                });
            }
        }
        if self.max_quality < self.initial_quality {
            return Err(ConfigError::QualityCeilingBelowInitial {
                initial_quality: self.initial_quality,
                max_quality: self.max_quality,
            });
        }
        if !(WORKERS_MIN..=WORKERS_MAX).contains(&self.workers) {
            return Err(ConfigError::WorkersOutOfRange {
                value: self.workers,
                min: WORKERS_MIN,
                max: WORKERS_MAX,
            });
        }
        if self.max_concurrent_uploads == 0 {
            return Err(ConfigError::ZeroUploadConcurrency);
        }
        if self.bucket.is_empty() {
            return Err(ConfigError::EmptyBucket);
        }
        Ok(())
    }
}

/// Storage backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    S3,
    Local,
}

/// Configuration for building a slide store.
///
/// S3 credentials are picked up from the environment by the object store
/// builder; they never pass through this struct.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible providers (MinIO, Supabase Storage,
    /// DigitalOcean Spaces). Public URLs become path-style when set.
    pub endpoint: Option<String>,
    /// Root directory for the local backend.
    pub local_path: Option<String>,
    /// Base URL used to form public URLs for the local backend.
    pub local_base_url: Option<String>,
}
