//! Catalog module: resource records and their classification
//!
//! - `record`: the resource data model, pools and topic groups
//! - `extractor`: listing elements → identity-keyed records
//! - `taxonomy`: topic → subject lookup table

mod extractor;
mod record;
mod taxonomy;

pub use extractor::{
    canonical_topic, extract, extract_with_stats, is_excluded_topic, ExtractionStats,
    EXCLUDED_TOPIC_MARKERS, LEVELED_COURSE_TOPIC, TOPIC_ALIASES,
};
pub use record::{
    identity_key, ResourceKind, ResourcePool, ResourceRecord, TopicGroup, TopicGroups,
    GRADE_MARKER, TERM_SENTINEL,
};
pub use taxonomy::{map_categories, Subject};
