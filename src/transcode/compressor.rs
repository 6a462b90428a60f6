//! Document compaction engine boundary
//!
//! The engine is opaque: it gets a source path, a destination path and a
//! set of switches, and either produces the destination or fails.

use std::path::Path;
use std::process::Command;
use thiserror::Error;

/// Errors reported by a compaction engine
#[derive(Debug, Error)]
pub enum CompressError {
    #[error("not a well-formed document: {0}")]
    Malformed(String),

    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Switches passed to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressOptions {
    /// Drop unused objects, merge duplicates, compact the xref table
    pub maximal_cleanup: bool,
    pub deflate_streams: bool,
    pub clean_content: bool,
    pub deflate_images: bool,
}

impl CompressOptions {
    /// Everything switched on
    pub fn maximal() -> Self {
        Self {
            maximal_cleanup: true,
            deflate_streams: true,
            clean_content: true,
            deflate_images: true,
        }
    }
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self::maximal()
    }
}

/// A document compaction engine
///
/// Implementations block; callers run them off the async runtime.
pub trait Compressor: Send + Sync {
    /// Writes a compacted copy of `source` to `destination`
    fn compress(
        &self,
        source: &Path,
        destination: &Path,
        options: &CompressOptions,
    ) -> Result<(), CompressError>;
}

/// Runs MuPDF's `mutool clean`
#[derive(Debug, Clone)]
pub struct MutoolCompressor {
    program: String,
}

impl MutoolCompressor {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Command-line switches for `options`
    pub fn flags(options: &CompressOptions) -> Vec<&'static str> {
        let mut flags = Vec::new();
        if options.maximal_cleanup {
            flags.push("-gggg");
        }
        if options.deflate_streams {
            flags.push("-z");
        }
        if options.clean_content {
            flags.push("-c");
        }
        if options.deflate_images {
            flags.push("-i");
        }
        flags
    }
}

impl Default for MutoolCompressor {
    fn default() -> Self {
        Self::new("mutool")
    }
}

impl Compressor for MutoolCompressor {
    fn compress(
        &self,
        source: &Path,
        destination: &Path,
        options: &CompressOptions,
    ) -> Result<(), CompressError> {
        let output = Command::new(&self.program)
            .arg("clean")
            .args(Self::flags(options))
            .arg(source)
            .arg(destination)
            .output()
            .map_err(|source| CompressError::Launch {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CompressError::Malformed(stderr.trim().to_string()));
        }

        Ok(())
    }
}
