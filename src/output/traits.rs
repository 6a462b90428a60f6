//! Publisher trait and run summary types
//!
//! A publisher receives the finished channel tree exactly once per run.

use crate::output::stats::TreeStatistics;
use crate::tree::Channel;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize channel: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Summary of one ingestion run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    // Run metadata
    pub started_at: String,
    pub finished_at: Option<String>,
    pub duration_seconds: Option<u64>,
    pub status: String,
    pub config_hash: String,
    pub dry_run: bool,

    // What the listings yielded
    pub documents_discovered: usize,
    pub videos_discovered: usize,
    pub documents_prepared: usize,

    /// Shape of the assembled tree
    pub statistics: TreeStatistics,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Documents found on the listing that did not make it into the tree
    pub fn documents_skipped(&self) -> usize {
        self.documents_discovered
            .saturating_sub(self.documents_prepared)
    }

    /// Share of discovered resources that ended up as leaves
    pub fn coverage(&self) -> f64 {
        let discovered = self.documents_discovered + self.videos_discovered;
        if discovered == 0 {
            return 0.0;
        }
        (self.statistics.total_resources() as f64 / discovered as f64) * 100.0
    }
}

/// Destination for the assembled channel
pub trait Publisher {
    /// Hands off the complete tree
    fn publish(&self, channel: &Channel) -> OutputResult<()>;
}
