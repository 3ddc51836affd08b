//! Compression and upload outcome records.

use serde::{Deserialize, Serialize};

/// How a file was (or was not) compressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionMethod {
    /// Pass-through: the original bytes were uploaded unchanged.
    None,
    /// External video transcoder.
    Video,
    /// In-process image resize + re-encode.
    Image,
}

/// The authoritative record of what was actually uploaded for one slide.
///
/// One instance flows through a slide's full lifecycle: the recompression
/// retry loop bumps `attempts` and `final_quality` each time it produces a
/// new candidate file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressionOutcome {
    pub original_size_kb: u64,
    pub compressed_size_kb: u64,
    pub ratio_percent: f64,
    pub method: CompressionMethod,
    pub attempts: u32,
    pub final_quality: Option<u32>,
}

impl CompressionOutcome {
    pub fn new(method: CompressionMethod) -> Self {
        Self {
            original_size_kb: 0,
            compressed_size_kb: 0,
            ratio_percent: 0.0,
            method,
            attempts: 1,
            final_quality: None,
        }
    }

    /// Outcome for a file uploaded without compression: original size stands
    /// in for both sizes and the ratio is zero.
    pub fn uncompressed(size_kb: u64) -> Self {
        Self {
            original_size_kb: size_kb,
            compressed_size_kb: size_kb,
            ratio_percent: 0.0,
            method: CompressionMethod::None,
            attempts: 1,
            final_quality: None,
        }
    }

    /// Recompute `ratio_percent` from the current sizes.
    pub fn recalculate_ratio(&mut self) {
        self.ratio_percent = if self.original_size_kb > 0 {
            (1.0 - self.compressed_size_kb as f64 / self.original_size_kb as f64) * 100.0
        } else {
            0.0
        };
    }

    pub fn was_compressed(&self) -> bool {
        self.method != CompressionMethod::None
    }
}

/// Classified upload failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadErrorKind {
    /// The store rejected the payload for exceeding a size limit.
    TooLarge,
    /// An object with the same name already exists.
    Duplicate,
    /// Anything else; the raw message is preserved for diagnostics.
    Other,
}

/// Result of one upload sequence, inspected by the retry controller to
/// decide the next action. Produced fresh per attempt, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    Success { url: String },
    /// Remote object already exists and overwrite was not requested.
    /// An intentional no-op, distinct from both success and failure.
    Skipped { reason: String },
    Failure { kind: UploadErrorKind, message: String },
}

impl UploadOutcome {
    pub fn success(url: impl Into<String>) -> Self {
        UploadOutcome::Success { url: url.into() }
    }

    pub fn failure(kind: UploadErrorKind, message: impl Into<String>) -> Self {
        UploadOutcome::Failure {
            kind,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, UploadOutcome::Success { .. })
    }
}
