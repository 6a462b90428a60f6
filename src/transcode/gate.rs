//! Size gate for documents
//!
//! Every document ends up in the compressed namespace of the cache, either
//! as a verbatim copy (small enough) or as the output of the compaction
//! engine (too large). An existing compressed file short-circuits all work,
//! which makes reruns cheap and keeps the engine from running twice.

use crate::catalog::{ResourceKind, ResourcePool, ResourceRecord};
use crate::config::Config;
use crate::crawler::{DownloadJob, Fetcher, Scheduler};
use crate::transcode::cache::{staging_file, Cache};
use crate::transcode::compressor::{CompressOptions, Compressor, MutoolCompressor};
use crate::ChefError;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

/// A document whose publishable bytes are on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedDocument {
    pub record: ResourceRecord,

    /// File in the compressed namespace
    pub path: PathBuf,
}

/// Prepared documents keyed by identity
#[derive(Debug, Clone, Default)]
pub struct PreparedDocuments {
    documents: HashMap<String, PreparedDocument>,
}

impl PreparedDocuments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, document: PreparedDocument) {
        self.documents
            .insert(document.record.identity_key.clone(), document);
    }

    pub fn get(&self, key: &str) -> Option<&PreparedDocument> {
        self.documents.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.documents.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

pub struct TranscodeGate {
    cache: Cache,
    fetcher: Fetcher,
    compressor: Arc<dyn Compressor>,
    options: CompressOptions,
    size_limit: u64,
}

impl TranscodeGate {
    pub fn new(
        cache: Cache,
        fetcher: Fetcher,
        compressor: Arc<dyn Compressor>,
        size_limit: u64,
    ) -> Self {
        Self {
            cache,
            fetcher,
            compressor,
            options: CompressOptions::maximal(),
            size_limit,
        }
    }

    /// Builds a gate driving `mutool` as configured
    pub fn from_config(config: &Config, fetcher: Fetcher) -> Self {
        Self::new(
            Cache::from_config(&config.cache),
            fetcher,
            Arc::new(MutoolCompressor::new(&config.transcode.compressor)),
            config.transcode.size_limit_bytes,
        )
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Whether a document of `size` bytes must go through the engine
    ///
    /// A document exactly at the limit is within budget.
    pub fn needs_compression(&self, size: u64) -> bool {
        size > self.size_limit
    }

    /// Makes sure the compressed namespace holds a publishable copy
    ///
    /// # Returns
    ///
    /// * `Ok(Some(path))` - The compressed-namespace file for this document
    /// * `Ok(None)` - The raw bytes could not be downloaded; skip the document
    /// * `Err(ChefError::Transcode)` - The engine rejected the document
    pub async fn ensure_within_budget(
        &self,
        record: &ResourceRecord,
    ) -> Result<Option<PathBuf>, ChefError> {
        let key = &record.identity_key;
        let extension = ResourceKind::Document.extension();

        let compressed = self.cache.compressed_path(key, extension);
        if compressed.is_file() {
            tracing::debug!("{} already within budget", key);
            return Ok(Some(compressed));
        }

        let raw = self.cache.raw_path(key, extension);
        if !raw.is_file() {
            tracing::info!("Downloading document {}", raw.display());
            match self.fetcher.download(record.source_url.as_str()).await {
                Some(response) => {
                    self.cache.write_raw(key, extension, &response.body)?;
                }
                None => {
                    tracing::warn!("Skipping {}: could not download {}", key, record.source_url);
                    return Ok(None);
                }
            }
        }

        let size = tokio::fs::metadata(&raw).await?.len();

        if self.needs_compression(size) {
            tracing::info!(
                "Compressing document {} ({} bytes > {} bytes)",
                raw.display(),
                size,
                self.size_limit
            );
            self.compress(key, raw, compressed.clone()).await?;
        } else {
            self.cache.copy_to_compressed(key, extension)?;
        }

        Ok(Some(compressed))
    }

    /// Runs the engine into a staging file and moves the result into place
    async fn compress(&self, key: &str, raw: PathBuf, compressed: PathBuf) -> Result<(), ChefError> {
        let staging = staging_file(&compressed)?;
        let staging_path = staging.path().to_path_buf();
        let compressor = Arc::clone(&self.compressor);
        let options = self.options;

        let result = tokio::task::spawn_blocking(move || {
            compressor.compress(&raw, &staging_path, &options)
        })
        .await?;

        result.map_err(|source| ChefError::Transcode {
            key: key.to_string(),
            source,
        })?;

        staging.persist(&compressed).map_err(|e| e.error)?;

        let size = tokio::fs::metadata(&compressed).await?.len();
        if self.needs_compression(size) {
            tracing::warn!(
                "{} is still {} bytes after compression (limit {})",
                key,
                size,
                self.size_limit
            );
        }

        Ok(())
    }

    /// Prepares every document of a pool
    ///
    /// Raw bytes missing from both namespaces are downloaded first, up to
    /// `max_concurrent` at a time. Documents are then gated one by one.
    /// Documents that cannot be downloaded are left out of the result.
    pub async fn prepare_documents(
        &self,
        pool: &ResourcePool,
        max_concurrent: usize,
    ) -> Result<PreparedDocuments, ChefError> {
        self.cache.ensure_dirs()?;
        let extension = ResourceKind::Document.extension();
        let records = pool.sorted();

        let jobs: Vec<DownloadJob> = records
            .iter()
            .filter(|record| {
                !self.cache.has_compressed(&record.identity_key, extension)
                    && !self.cache.has_raw(&record.identity_key, extension)
            })
            .map(|record| DownloadJob {
                key: record.identity_key.clone(),
                url: record.source_url.clone(),
                destination: self.cache.raw_path(&record.identity_key, extension),
            })
            .collect();

        let scheduler = Scheduler::new(self.fetcher.clone(), max_concurrent);
        let report = scheduler.run(jobs).await?;
        let failed: HashSet<&str> = report.failed.iter().map(String::as_str).collect();

        let mut prepared = PreparedDocuments::new();
        for record in records {
            if failed.contains(record.identity_key.as_str()) {
                continue;
            }

            if let Some(path) = self.ensure_within_budget(record).await? {
                prepared.insert(PreparedDocument {
                    record: record.clone(),
                    path,
                });
            }
        }

        tracing::info!(
            "{} of {} documents ready for publishing",
            prepared.len(),
            pool.len()
        );

        Ok(prepared)
    }
}
