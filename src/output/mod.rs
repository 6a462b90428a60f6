//! Output module for publishing the channel and reporting on the run
//!
//! This module handles:
//! - Publishing the assembled tree as a JSON manifest
//! - Generating markdown summaries of a run
//! - Tree statistics for dry runs

mod manifest;
mod markdown;
pub mod stats;
mod traits;

pub use manifest::ManifestPublisher;
pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use stats::{print_statistics, TopicStatistics, TreeStatistics};
pub use traits::{OutputError, OutputResult, Publisher, RunSummary};
