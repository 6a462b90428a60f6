//! Scheduler for raw asset downloads
//!
//! Downloads are independent of each other, so they run concurrently under
//! a global semaphore. Each job writes to its own cache file; nothing else
//! is shared between tasks.

use crate::crawler::Fetcher;
use crate::transcode::write_atomic;
use crate::ChefError;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

/// One asset to download into the cache
#[derive(Debug, Clone)]
pub struct DownloadJob {
    /// Identity key of the resource
    pub key: String,

    /// Where to fetch it from
    pub url: Url,

    /// Cache file to create
    pub destination: PathBuf,
}

/// Outcome of a batch of downloads
#[derive(Debug, Clone, Default)]
pub struct DownloadReport {
    /// Keys whose bytes are now cached
    pub completed: Vec<String>,

    /// Keys the fetcher gave up on
    pub failed: Vec<String>,
}

/// Runs download jobs with bounded concurrency
pub struct Scheduler {
    /// Global semaphore for limiting concurrent fetches
    semaphore: Arc<Semaphore>,

    fetcher: Fetcher,
}

impl Scheduler {
    /// Creates a new scheduler allowing `max_concurrent` downloads at once
    pub fn new(fetcher: Fetcher, max_concurrent: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent.max(1))),
            fetcher,
        }
    }

    /// Number of downloads that may start right now
    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Downloads every job, returning which keys succeeded
    ///
    /// A URL the fetcher cannot retrieve lands in `failed`; a cache write
    /// that fails aborts the batch.
    pub async fn run(&self, jobs: Vec<DownloadJob>) -> Result<DownloadReport, ChefError> {
        let mut report = DownloadReport::default();
        if jobs.is_empty() {
            return Ok(report);
        }

        tracing::info!(
            "Downloading {} files ({} at a time)",
            jobs.len(),
            self.semaphore.available_permits()
        );

        let mut tasks = JoinSet::new();

        for job in jobs {
            let semaphore = Arc::clone(&self.semaphore);
            let fetcher = self.fetcher.clone();

            tasks.spawn(async move {
                // The semaphore is never closed
                let _permit = semaphore.acquire_owned().await.ok();

                tracing::debug!("Downloading {} from {}", job.key, job.url);
                let downloaded = match fetcher.download(job.url.as_str()).await {
                    Some(response) => {
                        let destination = job.destination;
                        tokio::task::spawn_blocking(move || {
                            write_atomic(&destination, &response.body)
                        })
                        .await??;
                        true
                    }
                    None => false,
                };

                Ok::<_, ChefError>((job.key, downloaded))
            });
        }

        while let Some(joined) = tasks.join_next().await {
            let (key, downloaded) = joined??;
            if downloaded {
                report.completed.push(key);
            } else {
                tracing::warn!("Skipping {}: download failed", key);
                report.failed.push(key);
            }
        }

        report.completed.sort();
        report.failed.sort();

        Ok(report)
    }
}
