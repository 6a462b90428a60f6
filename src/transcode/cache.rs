//! Two-namespace on-disk cache
//!
//! Raw downloads and size-budget-compliant outputs live side by side under
//! separate roots, both named `{identity_key}.{extension}`. A file in the
//! compressed namespace means the resource is done.

use crate::config::CacheConfig;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[derive(Debug, Clone)]
pub struct Cache {
    raw_dir: PathBuf,
    compressed_dir: PathBuf,
}

impl Cache {
    pub fn new(raw_dir: impl Into<PathBuf>, compressed_dir: impl Into<PathBuf>) -> Self {
        Self {
            raw_dir: raw_dir.into(),
            compressed_dir: compressed_dir.into(),
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(&config.raw_dir, &config.compressed_dir)
    }

    /// Creates both cache roots
    pub fn ensure_dirs(&self) -> io::Result<()> {
        std::fs::create_dir_all(&self.raw_dir)?;
        std::fs::create_dir_all(&self.compressed_dir)
    }

    pub fn compressed_dir(&self) -> &Path {
        &self.compressed_dir
    }

    pub fn raw_path(&self, key: &str, extension: &str) -> PathBuf {
        self.raw_dir.join(format!("{}.{}", key, extension))
    }

    pub fn compressed_path(&self, key: &str, extension: &str) -> PathBuf {
        self.compressed_dir.join(format!("{}.{}", key, extension))
    }

    pub fn has_raw(&self, key: &str, extension: &str) -> bool {
        self.raw_path(key, extension).is_file()
    }

    pub fn has_compressed(&self, key: &str, extension: &str) -> bool {
        self.compressed_path(key, extension).is_file()
    }

    /// Stores downloaded bytes in the raw namespace
    pub fn write_raw(&self, key: &str, extension: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        let path = self.raw_path(key, extension);
        write_atomic(&path, bytes)?;
        Ok(path)
    }

    /// Copies the raw bytes verbatim into the compressed namespace
    pub fn copy_to_compressed(&self, key: &str, extension: &str) -> io::Result<PathBuf> {
        let source = self.raw_path(key, extension);
        let destination = self.compressed_path(key, extension);

        let mut staging = staging_file(&destination)?;
        let mut reader = std::fs::File::open(&source)?;
        io::copy(&mut reader, staging.as_file_mut())?;
        staging.as_file().sync_all()?;
        staging.persist(&destination).map_err(|e| e.error)?;

        Ok(destination)
    }
}

/// Temporary file next to `destination`, for a later rename onto it
pub fn staging_file(destination: &Path) -> io::Result<NamedTempFile> {
    let dir = destination.parent().unwrap_or_else(|| Path::new("."));
    tempfile::Builder::new()
        .prefix(".staging-")
        .tempfile_in(dir)
}

/// Writes `bytes` to `path` through a staging file and a rename
///
/// Readers only ever see no file or the complete file.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut staging = staging_file(path)?;
    staging.write_all(bytes)?;
    staging.as_file().sync_all()?;
    staging.persist(path).map_err(|e| e.error)?;
    Ok(())
}
