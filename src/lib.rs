//! Wande-Chef: an educational catalog ingester
//!
//! This crate crawls the Funda Wande resource listings, classifies the
//! documents and videos it finds, shrinks oversized documents, and assembles
//! everything into a topic tree ready to be handed to a publisher.

pub mod catalog;
pub mod config;
pub mod crawler;
pub mod output;
pub mod transcode;
pub mod tree;
pub mod url;

use thiserror::Error;

/// Main error type for Wande-Chef operations
///
/// Every variant here aborts the run. Recoverable conditions (a URL that
/// cannot be fetched, a key found in both pools) are logged instead.
#[derive(Debug, Error)]
pub enum ChefError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Listing element <{element}> is missing required attribute '{attribute}'")]
    MissingAttribute { element: String, attribute: String },

    #[error("Unparseable trigger action: {value:?}")]
    MalformedAction { value: String },

    #[error("Invalid listing selector: {0}")]
    Selector(String),

    #[error("Failed to compress {key}: {source}")]
    Transcode {
        key: String,
        source: transcode::CompressError,
    },

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to resolve '{href}' against {base}")]
    Resolve { base: String, href: String },

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),
}

/// Result type alias for Wande-Chef operations
pub type Result<T> = std::result::Result<T, ChefError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use catalog::{ResourceKind, ResourcePool, ResourceRecord, TopicGroups};
pub use config::Config;
pub use tree::{Channel, ContentNode, TopicNode};
