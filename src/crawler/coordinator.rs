//! Ingestion coordinator - end-to-end run orchestration
//!
//! A run walks the pipeline once, front to back:
//! - Fetching the document and video listings
//! - Extracting both resource pools into one shared topic grouping
//! - Preparing documents through the transcode gate
//! - Assembling the channel tree
//! - Publishing the tree and a run summary

use crate::catalog::{extract, ResourceKind, ResourcePool, TopicGroups};
use crate::config::Config;
use crate::crawler::parser::parse_listing;
use crate::crawler::Fetcher;
use crate::output::{
    generate_markdown_summary, print_statistics, ManifestPublisher, Publisher, RunSummary,
    TreeStatistics,
};
use crate::transcode::{PreparedDocument, PreparedDocuments, TranscodeGate};
use crate::tree::{assemble, Channel};
use crate::ChefError;
use std::path::Path;
use std::time::Instant;
use url::Url;

/// Main ingestion coordinator structure
pub struct Coordinator {
    config: Config,
    root: Url,
    fetcher: Fetcher,
    gate: TranscodeGate,
    config_hash: String,
}

impl Coordinator {
    /// Creates a coordinator with the HTTP client and engine from `config`
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(ChefError)` - The origin is not a URL or the client failed to build
    pub fn new(config: Config) -> Result<Self, ChefError> {
        let fetcher = Fetcher::from_config(&config.fetcher)?;
        let gate = TranscodeGate::from_config(&config, fetcher.clone());
        Self::with_gate(config, fetcher, gate)
    }

    /// Creates a coordinator around an existing fetcher and gate
    pub fn with_gate(config: Config, fetcher: Fetcher, gate: TranscodeGate) -> Result<Self, ChefError> {
        let root = Url::parse(&config.source.origin)?;
        Ok(Self {
            config,
            root,
            fetcher,
            gate,
            config_hash: String::new(),
        })
    }

    /// Records the configuration file hash in the run summary
    pub fn set_config_hash(&mut self, hash: impl Into<String>) {
        self.config_hash = hash.into();
    }

    /// Runs the pipeline once
    ///
    /// In a dry run nothing is downloaded or published; documents point at
    /// their prospective compressed path and statistics go to stdout.
    pub async fn run(&self, dry_run: bool) -> Result<Channel, ChefError> {
        let started_at = chrono::Utc::now();
        let start_time = Instant::now();
        tracing::info!(
            "Starting {}run against {}",
            if dry_run { "dry " } else { "" },
            self.root
        );

        // Documents first, so their topics lead the tree
        let mut topics = TopicGroups::new();
        let documents = self.crawl_listing(ResourceKind::Document, &mut topics).await?;
        let videos = self.crawl_listing(ResourceKind::Video, &mut topics).await?;

        let prepared = if dry_run {
            self.plan_documents(&documents)
        } else {
            self.gate
                .prepare_documents(
                    &documents,
                    self.config.fetcher.max_concurrent_downloads as usize,
                )
                .await?
        };

        let channel = assemble(
            &topics,
            &documents,
            &prepared,
            &videos,
            &self.config.channel,
        );

        let finished_at = chrono::Utc::now();
        let summary = RunSummary {
            started_at: started_at.to_rfc3339(),
            finished_at: Some(finished_at.to_rfc3339()),
            duration_seconds: Some(start_time.elapsed().as_secs()),
            status: "completed".to_string(),
            config_hash: self.config_hash.clone(),
            dry_run,
            documents_discovered: documents.len(),
            videos_discovered: videos.len(),
            documents_prepared: prepared.len(),
            statistics: TreeStatistics::from_channel(&channel),
        };

        if dry_run {
            print_statistics(&summary.statistics);
        } else {
            ManifestPublisher::from_config(&self.config.output).publish(&channel)?;
            generate_markdown_summary(&summary, Path::new(&self.config.output.summary_path))?;
            tracing::info!("Summary written to {}", self.config.output.summary_path);
        }

        tracing::info!(
            "Run completed: {} documents and {} videos in {:?}",
            summary.statistics.documents,
            summary.statistics.videos,
            start_time.elapsed()
        );

        Ok(channel)
    }

    /// Fetches one listing page and extracts its pool
    ///
    /// An unreachable listing yields an empty pool; the other listing still
    /// gets processed.
    async fn crawl_listing(
        &self,
        kind: ResourceKind,
        topics: &mut TopicGroups,
    ) -> Result<ResourcePool, ChefError> {
        let path = match kind {
            ResourceKind::Document => &self.config.source.document_listing,
            ResourceKind::Video => &self.config.source.video_listing,
        };
        let listing_url = self.root.join(path)?;

        tracing::info!("Crawling {:?} listing {}", kind, listing_url);

        let elements = match self.fetcher.fetch_page(listing_url.as_str()).await {
            Some((_, html)) => {
                parse_listing(&html, kind.element_kind(), &self.config.source.language_code)?
            }
            None => {
                tracing::error!(
                    "Listing {} unavailable, continuing without {:?} resources",
                    listing_url,
                    kind
                );
                Vec::new()
            }
        };

        extract(&elements, kind, &self.root, topics)
    }

    /// Dry-run stand-in for the gate: every document at its compressed path
    fn plan_documents(&self, pool: &ResourcePool) -> PreparedDocuments {
        let extension = ResourceKind::Document.extension();
        let mut planned = PreparedDocuments::new();

        for record in pool.sorted() {
            planned.insert(PreparedDocument {
                path: self
                    .gate
                    .cache()
                    .compressed_path(&record.identity_key, extension),
                record: record.clone(),
            });
        }

        planned
    }
}

/// Runs a complete ingestion
///
/// # Example
///
/// ```no_run
/// use wande_chef::config::load_config;
/// use wande_chef::crawler::run_pipeline;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("chef.toml"))?;
/// let channel = run_pipeline(config, false).await?;
/// println!("{} topics", channel.children.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_pipeline(config: Config, dry_run: bool) -> Result<Channel, ChefError> {
    let coordinator = Coordinator::new(config)?;
    coordinator.run(dry_run).await
}
