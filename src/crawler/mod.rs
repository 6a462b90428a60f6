//! Crawler module for listing retrieval and asset downloads
//!
//! This module contains the network-facing side of a run, including:
//! - HTTP fetching with linear-backoff retries
//! - Listing page parsing
//! - Bounded-concurrency asset downloads
//! - Overall run coordination

mod coordinator;
mod fetcher;
mod parser;
mod scheduler;

pub use coordinator::{run_pipeline, Coordinator};
pub use fetcher::{backoff_delay, build_http_client, FetchedResponse, Fetcher};
pub use parser::{parse_listing, ElementKind, ListingElement};
pub use scheduler::{DownloadJob, DownloadReport, Scheduler};
