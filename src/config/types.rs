use serde::Deserialize;

/// Main configuration structure for Wande-Chef
///
/// Every section is optional; omitted sections reproduce the defaults used
/// for the public Funda Wande site.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub fetcher: FetcherConfig,
    pub transcode: TranscodeConfig,
    pub cache: CacheConfig,
    pub channel: ChannelConfig,
    pub output: OutputConfig,
}

/// Where the listings live
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Site root every listing path and asset href is resolved against
    pub origin: String,

    /// Value of `data-cat4` that selects listing elements
    #[serde(rename = "language-code")]
    pub language_code: String,

    /// Path of the page listing documents as plain links
    #[serde(rename = "document-listing")]
    pub document_listing: String,

    /// Path of the page listing videos as trigger buttons
    #[serde(rename = "video-listing")]
    pub video_listing: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            origin: "https://fundawande.org".to_string(),
            language_code: "ENG".to_string(),
            document_listing: "/learning-resources".to_string(),
            video_listing: "/video-resources".to_string(),
        }
    }
}

/// HTTP fetch behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Per-attempt timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Per-attempt timeout for document bodies (seconds)
    #[serde(rename = "download-timeout-secs")]
    pub download_timeout_secs: u64,

    /// Attempts made before a transient failure becomes terminal
    #[serde(rename = "max-attempts")]
    pub max_attempts: u32,

    /// Linear backoff unit (milliseconds); retry n waits n units
    #[serde(rename = "backoff-unit-ms")]
    pub backoff_unit_ms: u64,

    /// Upper bound on simultaneous raw document downloads
    #[serde(rename = "max-concurrent-downloads")]
    pub max_concurrent_downloads: u32,

    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 60,
            download_timeout_secs: 900,
            max_attempts: 5,
            backoff_unit_ms: 1000,
            max_concurrent_downloads: 4,
            user_agent: format!("wande-chef/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Document size gate
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TranscodeConfig {
    /// Documents strictly larger than this are compressed
    #[serde(rename = "size-limit-bytes")]
    pub size_limit_bytes: u64,

    /// Executable of the document compaction engine
    pub compressor: String,
}

impl Default for TranscodeConfig {
    fn default() -> Self {
        Self {
            size_limit_bytes: 15 * 1024 * 1024,
            compressor: "mutool".to_string(),
        }
    }
}

/// On-disk cache roots
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Raw downloaded bytes, `{key}.{ext}`
    #[serde(rename = "raw-dir")]
    pub raw_dir: String,

    /// Size-budget-compliant bytes, `{key}.{ext}`
    #[serde(rename = "compressed-dir")]
    pub compressed_dir: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            raw_dir: "chefdata".to_string(),
            compressed_dir: "chefdata/compressed".to_string(),
        }
    }
}

/// Channel metadata handed to the publisher
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    pub title: String,

    #[serde(rename = "source-domain")]
    pub source_domain: String,

    #[serde(rename = "source-id")]
    pub source_id: String,

    pub language: String,
    pub thumbnail: String,
    pub description: String,

    /// Author stamped on every leaf
    pub author: String,

    /// License identifier stamped on every leaf
    pub license: String,

    #[serde(rename = "copyright-holder")]
    pub copyright_holder: String,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            title: "Funda Wande Organization - English".to_string(),
            source_domain: "https://fundawande.org/".to_string(),
            source_id: "funda-wande".to_string(),
            language: "en".to_string(),
            thumbnail: "https://fundawande.org/img/funda-wande-logo.png".to_string(),
            description: "Funda Wande is a not-for-profit organization that aims to equip \
                          teachers to teach reading-for-meaning and calculating-with-confidence \
                          in Grades R-3 in South Africa."
                .to_string(),
            author: "Funda Wande".to_string(),
            license: "CC BY".to_string(),
            copyright_holder: "Funda Wande".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the JSON channel manifest
    #[serde(rename = "manifest-path")]
    pub manifest_path: String,

    /// Path to the markdown summary file
    #[serde(rename = "summary-path")]
    pub summary_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            manifest_path: "chefdata/channel.json".to_string(),
            summary_path: "chefdata/summary.md".to_string(),
        }
    }
}
