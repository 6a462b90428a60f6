//! JSON manifest publisher
//!
//! Writes the whole channel tree as a single pretty-printed JSON document.
//! The write is atomic, so a consumer never sees a partial manifest.

use crate::config::OutputConfig;
use crate::output::traits::{OutputResult, Publisher};
use crate::transcode::write_atomic;
use crate::tree::Channel;
use std::path::{Path, PathBuf};

/// Publishes the channel as a JSON file on disk
#[derive(Debug, Clone)]
pub struct ManifestPublisher {
    path: PathBuf,
}

impl ManifestPublisher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(&config.manifest_path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Publisher for ManifestPublisher {
    fn publish(&self, channel: &Channel) -> OutputResult<()> {
        let json = serde_json::to_vec_pretty(channel)?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        write_atomic(&self.path, &json)?;

        tracing::info!(
            "Published channel '{}' ({} topics) to {}",
            channel.title,
            channel.children.len(),
            self.path.display()
        );

        Ok(())
    }
}
