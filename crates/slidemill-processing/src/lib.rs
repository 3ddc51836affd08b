//! Slidemill processing library
//!
//! Download and compression capabilities for the slide pipeline, behind
//! traits so the worker crate can be tested with scripted implementations:
//! an HTTP asset fetcher, a HandBrakeCLI video transcoder, and an in-process
//! image transcoder (resize + mozjpeg re-encode).

pub mod download;
pub mod error;
pub mod image;
pub mod traits;
pub mod video;

pub use download::HttpFetcher;
pub use error::ProcessingError;
pub use image::JpegTranscoder;
pub use traits::{AssetFetcher, ImageTranscoder, VideoTranscoder};
pub use video::HandbrakeTranscoder;
