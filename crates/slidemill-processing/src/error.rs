//! Processing error types.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("Download failed: {0}")]
    Download(String),

    #[error("Transcoder exited with failure: {0}")]
    TranscoderFailed(String),

    #[error("Transcoder timed out after {seconds}s")]
    TranscoderTimeout { seconds: u64 },

    #[error("Transcoder produced no output at {0}")]
    MissingOutput(PathBuf),

    #[error("Image decode failed: {0}")]
    ImageDecode(String),

    #[error("Image encode failed: {0}")]
    ImageEncode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
