//! Run reports: the slide-URL mapping file, the status inventory, and the
//! end-of-run summary log.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use slidemill_core::SlideStatus;

/// Aggregate counts for one run, used for the summary and the exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub uploaded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn from_statuses(statuses: &[SlideStatus]) -> Self {
        let uploaded = statuses.iter().filter(|s| s.upload_success).count();
        let skipped = statuses.iter().filter(|s| s.skipped).count();
        Self {
            total: statuses.len(),
            uploaded,
            skipped,
            failed: statuses.len() - uploaded - skipped,
        }
    }

    /// Process exit code: 0 when nothing failed, 1 when nothing was
    /// uploaded from a nonempty batch, 2 for partial success.
    pub fn exit_code(&self) -> i32 {
        if self.failed == 0 {
            0
        } else if self.uploaded == 0 {
            1
        } else {
            2
        }
    }
}

/// Write `slide_url_mapping.json` into `output_dir`.
pub fn write_mapping(
    output_dir: &Path,
    mapping: &BTreeMap<String, String>,
) -> anyhow::Result<PathBuf> {
    let path = output_dir.join("slide_url_mapping.json");
    let json = serde_json::to_string_pretty(mapping).context("serialize URL mapping")?;
    std::fs::write(&path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}

/// Write `status_inventory_<timestamp>.json` into `output_dir`.
pub fn write_inventory(output_dir: &Path, statuses: &[SlideStatus]) -> anyhow::Result<PathBuf> {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let path = output_dir.join(format!("status_inventory_{timestamp}.json"));
    let json = serde_json::to_string_pretty(statuses).context("serialize status inventory")?;
    std::fs::write(&path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}

/// Log the run summary, with one line per failed slide.
pub fn log_summary(summary: &RunSummary, statuses: &[SlideStatus]) {
    tracing::info!(
        total = summary.total,
        uploaded = summary.uploaded,
        skipped = summary.skipped,
        failed = summary.failed,
        "Run summary"
    );
    for status in statuses
        .iter()
        .filter(|s| !s.upload_success && !s.skipped)
    {
        tracing::warn!(
            slide = %status.slide_name,
            error = %status.error_message,
            "Slide not uploaded"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slidemill_core::SlideRequest;

    fn status(name: &str, uploaded: bool, skipped: bool) -> SlideStatus {
        let request = SlideRequest {
            slide_id: name.to_string(),
            source_url: format!("https://cdn.example.com/deck/{name}.mp4"),
        };
        let mut status = SlideStatus::new(&request);
        status.upload_success = uploaded;
        status.skipped = skipped;
        status
    }

    #[test]
    fn summary_counts_and_exit_codes() {
        let all_good = [status("Slide_001", true, false), status("Slide_002", false, true)];
        let summary = RunSummary::from_statuses(&all_good);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.exit_code(), 0);

        let partial = [status("Slide_001", true, false), status("Slide_002", false, false)];
        assert_eq!(RunSummary::from_statuses(&partial).exit_code(), 2);

        let none = [status("Slide_001", false, false)];
        assert_eq!(RunSummary::from_statuses(&none).exit_code(), 1);

        let empty: [SlideStatus; 0] = [];
        assert_eq!(RunSummary::from_statuses(&empty).exit_code(), 0);
    }

    #[test]
    fn mapping_file_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let mut mapping = BTreeMap::new();
        mapping.insert(
            "Slide_001".to_string(),
            "https://cdn.test/Slide_001.mp4".to_string(),
        );

        let path = write_mapping(dir.path(), &mapping).unwrap();
        let loaded: BTreeMap<String, String> =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(loaded, mapping);
    }

    #[test]
    fn inventory_file_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let statuses = [status("Slide_001", true, false)];
        let path = write_inventory(dir.path(), &statuses).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("status_inventory_"));
        assert!(name.ends_with(".json"));
        let loaded: Vec<SlideStatus> =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].slide_name, "Slide_001");
    }
}
