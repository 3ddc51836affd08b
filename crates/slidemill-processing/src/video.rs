//! HandBrakeCLI video transcoder.

use async_trait::async_trait;
use slidemill_core::{CompressionMethod, CompressionOutcome};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

use crate::error::ProcessingError;
use crate::traits::VideoTranscoder;

/// External-process timeout; a transcode still running after this is
/// treated as a compression failure, not a hang.
const TRANSCODE_TIMEOUT: Duration = Duration::from_secs(600);

/// Output width clamp for transcoded videos.
const OUTPUT_WIDTH: u32 = 720;

/// Video transcoder shelling out to HandBrakeCLI with the x264 encoder in
/// constant-quality mode.
#[derive(Clone)]
pub struct HandbrakeTranscoder {
    binary_path: String,
    timeout: Duration,
}

impl HandbrakeTranscoder {
    pub fn new(binary_path: impl Into<String>) -> Self {
        Self {
            binary_path: binary_path.into(),
            timeout: TRANSCODE_TIMEOUT,
        }
    }

    /// Verify the transcoder binary is runnable. Called once at startup.
    pub async fn check_available(&self) -> Result<(), ProcessingError> {
        let status = Command::new(&self.binary_path)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| {
                ProcessingError::TranscoderFailed(format!(
                    "{} not found: {}",
                    self.binary_path, e
                ))
            })?;
        if !status.success() {
            return Err(ProcessingError::TranscoderFailed(format!(
                "{} --version exited with {}",
                self.binary_path, status
            )));
        }
        Ok(())
    }
}

async fn file_size_kb(path: &Path) -> Result<u64, ProcessingError> {
    Ok(tokio::fs::metadata(path).await?.len() / 1024)
}

#[async_trait]
impl VideoTranscoder for HandbrakeTranscoder {
    async fn transcode(
        &self,
        input: &Path,
        output: &Path,
        slide_name: &str,
        quality: u32,
    ) -> Result<CompressionOutcome, ProcessingError> {
        let original_size_kb = file_size_kb(input).await?;

        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tracing::info!(
            slide = %slide_name,
            quality = quality,
            input_size_kb = original_size_kb,
            "Compressing video"
        );

        let run = Command::new(&self.binary_path)
            .arg("--input")
            .arg(input)
            .arg("--output")
            .arg(output)
            .args(["--encoder", "x264"])
            .args(["--quality", &quality.to_string()])
            .args(["--width", &OUTPUT_WIDTH.to_string()])
            .arg("--optimize")
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output();

        let result = tokio::time::timeout(self.timeout, run).await.map_err(|_| {
            tracing::error!(slide = %slide_name, quality = quality, "Transcoder timed out");
            ProcessingError::TranscoderTimeout {
                seconds: self.timeout.as_secs(),
            }
        })?;

        let result = result.map_err(|e| ProcessingError::TranscoderFailed(e.to_string()))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            tracing::error!(
                slide = %slide_name,
                quality = quality,
                stderr = %stderr,
                "Transcoder failed"
            );
            return Err(ProcessingError::TranscoderFailed(stderr.into_owned()));
        }

        if !tokio::fs::try_exists(output).await? {
            return Err(ProcessingError::MissingOutput(output.to_path_buf()));
        }

        let mut outcome = CompressionOutcome::new(CompressionMethod::Video);
        outcome.original_size_kb = original_size_kb;
        outcome.compressed_size_kb = file_size_kb(output).await?;
        outcome.final_quality = Some(quality);
        outcome.recalculate_ratio();

        tracing::info!(
            slide = %slide_name,
            quality = quality,
            original_kb = outcome.original_size_kb,
            compressed_kb = outcome.compressed_size_kb,
            ratio_percent = outcome.ratio_percent,
            "Video compression successful"
        );

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_binary_reports_failure() {
        let transcoder = HandbrakeTranscoder::new("/nonexistent/handbrake-cli");
        assert!(transcoder.check_available().await.is_err());

        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.mp4");
        tokio::fs::write(&input, b"not really a video").await.unwrap();
        let output = dir.path().join("out.mp4");

        let err = transcoder
            .transcode(&input, &output, "Slide_001", 28)
            .await
            .unwrap_err();
        assert!(matches!(err, ProcessingError::TranscoderFailed(_)));
    }
}
