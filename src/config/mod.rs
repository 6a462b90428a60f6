//! Configuration module for Wande-Chef
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use wande_chef::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("chef.toml")).unwrap();
//! println!("Documents over {} bytes get compressed", config.transcode.size_limit_bytes);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CacheConfig, ChannelConfig, Config, FetcherConfig, OutputConfig, SourceConfig,
    TranscodeConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
