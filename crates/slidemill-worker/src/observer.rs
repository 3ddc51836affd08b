//! Pipeline progress observer.
//!
//! The pipeline reports stage transitions through this trait instead of
//! logging inline, which keeps the core logic silent and testable. The
//! default observer writes structured tracing events.

use slidemill_core::SlideStatus;

/// Receives pipeline events. All methods have no-op defaults.
pub trait PipelineObserver: Send + Sync {
    /// A slide pipeline has started.
    fn slide_started(&self, _slide_name: &str, _source_url: &str) {}

    /// A pipeline stage failed; `stage` is one of `download`, `compress`,
    /// `upload`, `overwrite`.
    fn stage_failed(&self, _slide_name: &str, _stage: &str, _error: &str) {}

    /// The recompression loop is about to re-transcode at a higher quality
    /// parameter.
    fn recompression_retry(&self, _slide_name: &str, _quality: u32) {}

    /// The remote object already exists and overwrite is off; the slide is
    /// skipped. An intentional no-op, not a failure.
    fn slide_skipped(&self, _slide_name: &str, _remote_name: &str) {}

    /// A slide finished (success or not). `completed` counts finished
    /// slides across the whole pool, out of `total`.
    fn slide_finished(&self, _status: &SlideStatus, _completed: usize, _total: usize) {}
}

/// Default observer: structured tracing events.
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn slide_started(&self, slide_name: &str, source_url: &str) {
        tracing::info!(slide = %slide_name, url = %source_url, "Processing slide");
    }

    fn stage_failed(&self, slide_name: &str, stage: &str, error: &str) {
        tracing::warn!(slide = %slide_name, stage = %stage, error = %error, "Stage failed");
    }

    fn recompression_retry(&self, slide_name: &str, quality: u32) {
        tracing::info!(
            slide = %slide_name,
            quality = quality,
            "File too large, retrying with higher compression"
        );
    }

    fn slide_skipped(&self, slide_name: &str, remote_name: &str) {
        tracing::info!(
            slide = %slide_name,
            object = %remote_name,
            "Object already exists, skipping"
        );
    }

    fn slide_finished(&self, status: &SlideStatus, completed: usize, total: usize) {
        if status.upload_success {
            tracing::info!(
                slide = %status.slide_name,
                url = %status.new_url,
                progress = %format!("{completed}/{total}"),
                "Slide completed"
            );
        } else if status.skipped {
            tracing::info!(
                slide = %status.slide_name,
                progress = %format!("{completed}/{total}"),
                "Slide skipped, remote object already exists"
            );
        } else {
            tracing::warn!(
                slide = %status.slide_name,
                error = %status.error_message,
                progress = %format!("{completed}/{total}"),
                "Slide failed"
            );
        }
    }
}
