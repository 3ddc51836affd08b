//! slidemill: batch slide media pipeline.
//!
//! Reads a JSON list of `{"slide": ..., "url": ...}` records, downloads and
//! compresses each asset (video via HandBrakeCLI, images in-process), uploads
//! to an S3-compatible store, and writes the URL mapping and status
//! inventory. S3 credentials come from the environment (AWS_ACCESS_KEY_ID,
//! AWS_SECRET_ACCESS_KEY).

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use slidemill_cli::report::{log_summary, write_inventory, write_mapping, RunSummary};
use slidemill_cli::init_tracing;
use slidemill_core::{MediaKind, PipelineConfig, SlideRequest, StoreBackend, StoreConfig};
use slidemill_processing::{HandbrakeTranscoder, HttpFetcher, JpegTranscoder};
use slidemill_storage::create_store;
use slidemill_worker::{SlidePipeline, TracingObserver, Uploader, WorkerPool};

#[derive(Parser)]
#[command(name = "slidemill", about = "Batch slide media compression and upload")]
struct Cli {
    /// JSON file with slide records: [{"slide": "...", "url": "..."}]
    json_file: PathBuf,

    /// Initial video quality parameter (lower = higher fidelity)
    #[arg(long, default_value = "28")]
    video_quality: u32,

    /// Quality ceiling for size-rejection retries
    #[arg(long, default_value = "35")]
    max_video_quality: u32,

    /// JPEG quality for image compression
    #[arg(long, default_value = "85")]
    image_quality: u8,

    /// Number of parallel workers
    #[arg(long, default_value = "10")]
    workers: usize,

    /// Maximum concurrent uploads
    #[arg(long, default_value = "5")]
    upload_concurrency: usize,

    /// Target bucket name
    #[arg(long, default_value = "slide-media")]
    bucket: String,

    /// Delete and re-upload when the remote object already exists
    #[arg(long)]
    overwrite: bool,

    /// Custom S3-compatible endpoint (MinIO, Spaces, ...)
    #[arg(long)]
    endpoint: Option<String>,

    /// S3 region
    #[arg(long, default_value = "us-east-1")]
    region: String,

    /// Use a local directory as the store instead of S3 (dry runs)
    #[arg(long)]
    local_store: Option<PathBuf>,

    /// Path to the HandBrakeCLI binary
    #[arg(long, default_value = "HandBrakeCLI")]
    handbrake: String,

    /// Directory for the mapping and inventory reports
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

impl Cli {
    fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            initial_quality: self.video_quality,
            max_quality: self.max_video_quality,
            image_quality: self.image_quality,
            workers: self.workers,
            max_concurrent_uploads: self.upload_concurrency,
            overwrite: self.overwrite,
            bucket: self.bucket.clone(),
        }
    }

    fn store_config(&self) -> StoreConfig {
        match &self.local_store {
            Some(path) => StoreConfig {
                backend: StoreBackend::Local,
                bucket: self.bucket.clone(),
                region: self.region.clone(),
                endpoint: None,
                local_path: Some(path.to_string_lossy().into_owned()),
                local_base_url: None,
            },
            None => StoreConfig {
                backend: StoreBackend::S3,
                bucket: self.bucket.clone(),
                region: self.region.clone(),
                endpoint: self.endpoint.clone(),
                local_path: None,
                local_base_url: None,
            },
        }
    }
}

fn load_requests(path: &PathBuf) -> anyhow::Result<Vec<SlideRequest>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("read slide list {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("parse slide list {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = cli.pipeline_config();
    config.validate().context("invalid configuration")?;

    let requests = load_requests(&cli.json_file)?;
    tracing::info!(
        slides = requests.len(),
        bucket = %config.bucket,
        workers = config.workers,
        "Loaded slide list"
    );

    let video = HandbrakeTranscoder::new(cli.handbrake.clone());
    if requests
        .iter()
        .any(|request| request.media_kind() == MediaKind::Video)
    {
        video
            .check_available()
            .await
            .context("video transcoder unavailable")?;
    }

    let store = create_store(&cli.store_config())
        .await
        .context("failed to create store")?;
    let fetcher = HttpFetcher::new().context("failed to create HTTP client")?;
    let image = JpegTranscoder::new(config.image_quality);

    let uploader = Uploader::new(Arc::clone(&store), config.max_concurrent_uploads);
    let workers = config.workers;
    let pipeline = SlidePipeline::new(
        config,
        Arc::new(fetcher),
        Arc::new(video),
        Arc::new(image),
        uploader,
    );
    let pool = WorkerPool::new(Arc::new(pipeline), workers, Arc::new(TracingObserver));

    let shutdown = pool.shutdown_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing in-flight slides");
            shutdown.trigger();
        }
    });

    let (mapping, statuses) = pool.process_all(requests).await?;

    let mapping_path = write_mapping(&cli.output_dir, &mapping)?;
    let inventory_path = write_inventory(&cli.output_dir, &statuses)?;
    tracing::info!(
        mapping = %mapping_path.display(),
        inventory = %inventory_path.display(),
        "Reports written"
    );

    let summary = RunSummary::from_statuses(&statuses);
    log_summary(&summary, &statuses);

    std::process::exit(summary.exit_code());
}
