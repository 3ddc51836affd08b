//! Slidemill worker library
//!
//! The processing core of the slide pipeline: the per-slide pipeline
//! (download, compression dispatch, upload), the recompression retry
//! controller for size-rejected videos, the transient-retry upload
//! primitive, and the bounded worker pool that fans the pipeline out over a
//! batch of slide requests.

pub mod observer;
pub mod pipeline;
pub mod pool;
pub mod uploader;
pub mod workdir;

pub use observer::{PipelineObserver, TracingObserver};
pub use pipeline::SlidePipeline;
pub use pool::{ShutdownFlag, WorkerPool};
pub use uploader::Uploader;
pub use workdir::WorkDirs;
