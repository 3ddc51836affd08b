//! In-process image transcoder: dimension clamp + mozjpeg re-encode.

use async_trait::async_trait;
use image::imageops::FilterType;
use image::GenericImageView;
use slidemill_core::{CompressionMethod, CompressionOutcome};
use std::path::Path;

use crate::error::ProcessingError;
use crate::traits::ImageTranscoder;

/// Maximum output dimensions; larger images are scaled down to fit,
/// preserving aspect ratio.
const MAX_WIDTH: u32 = 1920;
const MAX_HEIGHT: u32 = 1080;

/// Image transcoder producing JPEG output via mozjpeg.
#[derive(Clone)]
pub struct JpegTranscoder {
    quality: u8,
}

impl JpegTranscoder {
    pub fn new(quality: u8) -> Self {
        Self { quality }
    }
}

fn encode_jpeg(img: &image::DynamicImage, quality: u8) -> Result<Vec<u8>, ProcessingError> {
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();

    let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
    comp.set_size(width as usize, height as usize);
    comp.set_quality(quality as f32);
    comp.set_progressive_mode();
    comp.set_optimize_coding(true);

    let mut comp = comp
        .start_compress(Vec::new())
        .map_err(|e| ProcessingError::ImageEncode(e.to_string()))?;
    comp.write_scanlines(rgb.as_raw())
        .map_err(|e| ProcessingError::ImageEncode(e.to_string()))?;
    comp.finish()
        .map_err(|e| ProcessingError::ImageEncode(e.to_string()))
}

#[async_trait]
impl ImageTranscoder for JpegTranscoder {
    async fn transcode(
        &self,
        input: &Path,
        output: &Path,
        slide_name: &str,
    ) -> Result<CompressionOutcome, ProcessingError> {
        let original_size_kb = tokio::fs::metadata(input).await?.len() / 1024;
        let quality = self.quality;

        let input_path = input.to_path_buf();
        // Decode, resize, and encode are CPU-bound; keep them off the
        // async worker threads.
        let jpeg_data = tokio::task::spawn_blocking(move || {
            let img = image::open(&input_path)
                .map_err(|e| ProcessingError::ImageDecode(e.to_string()))?;
            let (width, height) = img.dimensions();
            let img = if width > MAX_WIDTH || height > MAX_HEIGHT {
                img.resize(MAX_WIDTH, MAX_HEIGHT, FilterType::Lanczos3)
            } else {
                img
            };
            encode_jpeg(&img, quality)
        })
        .await
        .map_err(|e| ProcessingError::ImageEncode(format!("encoder task panicked: {e}")))??;

        tokio::fs::write(output, &jpeg_data).await?;

        let mut outcome = CompressionOutcome::new(CompressionMethod::Image);
        outcome.original_size_kb = original_size_kb;
        outcome.compressed_size_kb = jpeg_data.len() as u64 / 1024;
        outcome.recalculate_ratio();

        tracing::info!(
            slide = %slide_name,
            quality = quality,
            original_kb = outcome.original_size_kb,
            compressed_kb = outcome.compressed_size_kb,
            ratio_percent = outcome.ratio_percent,
            "Image compression successful"
        );

        Ok(outcome)
    }
}
