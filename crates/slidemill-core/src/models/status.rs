//! Terminal per-slide status record.

use serde::{Deserialize, Serialize};

use super::outcome::CompressionOutcome;
use super::slide::{MediaKind, SlideRequest};

/// The terminal record for one slide, created once per pipeline invocation
/// and finalized exactly once before it is handed to the aggregator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideStatus {
    pub slide_id: String,
    pub slide_name: String,
    pub source_url: String,
    /// Public URL of the uploaded object; empty unless `upload_success`.
    pub new_url: String,
    pub media_kind: MediaKind,
    pub download_success: bool,
    pub compression_success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression: Option<CompressionOutcome>,
    pub upload_success: bool,
    /// True when the remote object already existed and overwrite was off.
    pub skipped: bool,
    pub upload_attempts: u32,
    pub error_message: String,
    pub elapsed_secs: f64,
}

impl SlideStatus {
    /// Fresh status for a request, with every stage unresolved.
    pub fn new(request: &SlideRequest) -> Self {
        Self {
            slide_id: request.slide_id.clone(),
            slide_name: request.slide_name(),
            source_url: request.source_url.clone(),
            new_url: String::new(),
            media_kind: request.media_kind(),
            download_success: false,
            compression_success: false,
            compression: None,
            upload_success: false,
            skipped: false,
            upload_attempts: 0,
            error_message: String::new(),
            elapsed_secs: 0.0,
        }
    }
}
