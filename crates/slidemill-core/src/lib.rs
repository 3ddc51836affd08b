//! Slidemill core library
//!
//! Shared models and configuration for the slide media pipeline: the slide
//! request/status types, compression and upload outcome records, and the
//! pipeline configuration with its validation rules.

pub mod config;
pub mod error;
pub mod models;

pub use config::{PipelineConfig, StoreBackend, StoreConfig};
pub use error::ConfigError;
pub use models::{
    CompressionMethod, CompressionOutcome, MediaKind, SlideRequest, SlideStatus, UploadErrorKind,
    UploadOutcome,
};
