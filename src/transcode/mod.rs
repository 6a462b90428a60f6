//! Transcode module: keeping documents within the publishing size budget
//!
//! - `cache`: raw and compressed namespaces on disk
//! - `compressor`: the compaction engine boundary
//! - `gate`: the per-document size decision

mod cache;
mod compressor;
mod gate;

pub use cache::{staging_file, write_atomic, Cache};
pub use compressor::{CompressError, CompressOptions, Compressor, MutoolCompressor};
pub use gate::{PreparedDocument, PreparedDocuments, TranscodeGate};
