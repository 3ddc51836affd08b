//! Configuration error types.

/// Errors produced while validating pipeline configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("video quality must be between {min} and {max}, got {value}")]
    QualityOutOfRange { value: u32, min: u32, max: u32 },

    #[error("maximum video quality ({max_quality}) must not be below initial quality ({initial_quality})")]
    QualityCeilingBelowInitial {
        initial_quality: u32,
        max_quality: u32,
    },

    #[error("worker count must be between {min} and {max}, got {value}")]
    WorkersOutOfRange { value: usize, min: usize, max: usize },

    #[error("upload concurrency must be at least 1")]
    ZeroUploadConcurrency,

    #[error("bucket name must not be empty")]
    EmptyBucket,

    #[error("invalid storage configuration: {0}")]
    Storage(String),
}
