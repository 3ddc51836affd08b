//! Bounded worker pool.
//!
//! Fans the per-slide pipeline out over a batch of requests. Work is claimed
//! from a shared atomic cursor rather than pre-partitioned, so slow slides
//! do not strand work behind them. Each worker owns a disjoint directory
//! pair under one temp base that is removed when the batch completes.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Context;
use slidemill_core::{SlideRequest, SlideStatus};
use tokio::sync::mpsc;

use crate::observer::PipelineObserver;
use crate::pipeline::SlidePipeline;
use crate::workdir::WorkDirs;

/// Cooperative shutdown handle. Once triggered, workers finish the slide
/// they hold and stop claiming new ones.
#[derive(Clone, Default)]
pub struct ShutdownFlag(Arc<AtomicBool>);

impl ShutdownFlag {
    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Parallel executor for a batch of slide requests.
pub struct WorkerPool {
    pipeline: Arc<SlidePipeline>,
    workers: usize,
    observer: Arc<dyn PipelineObserver>,
    shutdown: ShutdownFlag,
}

impl WorkerPool {
    pub fn new(
        pipeline: Arc<SlidePipeline>,
        workers: usize,
        observer: Arc<dyn PipelineObserver>,
    ) -> Self {
        Self {
            pipeline,
            workers,
            observer,
            shutdown: ShutdownFlag::default(),
        }
    }

    /// Handle for external shutdown (e.g. a ctrl-c handler).
    pub fn shutdown_flag(&self) -> ShutdownFlag {
        self.shutdown.clone()
    }

    /// Process every request and return the slide-name → public-URL mapping
    /// (successful uploads only) plus one status per request, sorted by
    /// slide name.
    ///
    /// On early shutdown, unclaimed requests are returned as untouched
    /// statuses so the inventory still covers the whole batch.
    pub async fn process_all(
        &self,
        requests: Vec<SlideRequest>,
    ) -> anyhow::Result<(BTreeMap<String, String>, Vec<SlideStatus>)> {
        let total = requests.len();
        if total == 0 {
            return Ok((BTreeMap::new(), Vec::new()));
        }

        let temp_base = tempfile::tempdir().context("failed to create working directory")?;
        let requests = Arc::new(requests);
        let cursor = Arc::new(AtomicUsize::new(0));
        let completed = Arc::new(AtomicUsize::new(0));
        let worker_count = self.workers.min(total);
        let (tx, mut rx) = mpsc::channel::<SlideStatus>(total);

        tracing::info!(
            slides = total,
            workers = worker_count,
            "Starting batch processing"
        );

        let mut handles = Vec::with_capacity(worker_count);
        for worker_id in 0..worker_count {
            let dirs = WorkDirs::create(temp_base.path(), worker_id)
                .context("failed to create worker directories")?;
            let pipeline = Arc::clone(&self.pipeline);
            let requests = Arc::clone(&requests);
            let cursor = Arc::clone(&cursor);
            let completed = Arc::clone(&completed);
            let observer = Arc::clone(&self.observer);
            let shutdown = self.shutdown.clone();
            let tx = tx.clone();

            handles.push(tokio::spawn(async move {
                loop {
                    if shutdown.is_triggered() {
                        break;
                    }
                    let index = cursor.fetch_add(1, Ordering::SeqCst);
                    if index >= requests.len() {
                        break;
                    }
                    let status = pipeline.process(&requests[index], &dirs).await;
                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    observer.slide_finished(&status, done, requests.len());
                    if tx.send(status).await.is_err() {
                        break;
                    }
                }
            }));
        }
        drop(tx);

        let mut statuses = Vec::with_capacity(total);
        while let Some(status) = rx.recv().await {
            statuses.push(status);
        }
        for handle in handles {
            handle.await.context("worker task panicked")?;
        }

        // Requests never claimed before shutdown still get a status record.
        if statuses.len() < total {
            let processed: std::collections::HashSet<String> = statuses
                .iter()
                .map(|status| status.slide_id.clone())
                .collect();
            for request in requests.iter() {
                if !processed.contains(&request.slide_id) {
                    let mut status = SlideStatus::new(request);
                    status.error_message = "Cancelled before processing".to_string();
                    statuses.push(status);
                }
            }
        }

        statuses.sort_by(|a, b| a.slide_name.cmp(&b.slide_name));

        let mapping: BTreeMap<String, String> = statuses
            .iter()
            .filter(|status| status.upload_success)
            .map(|status| (status.slide_name.clone(), status.new_url.clone()))
            .collect();

        let failures = statuses
            .iter()
            .filter(|status| !status.upload_success && !status.skipped)
            .count();
        let skipped = statuses.iter().filter(|status| status.skipped).count();
        tracing::info!(
            total = total,
            uploaded = mapping.len(),
            skipped = skipped,
            failed = failures,
            "Batch complete"
        );

        Ok((mapping, statuses))
    }
}
