//! Resource extraction and classification
//!
//! Walks the elements matched on a listing page, turns each into a
//! [`ResourceRecord`], and registers its identity key under its topic.

use crate::catalog::record::{identity_key, ResourceKind, ResourcePool, ResourceRecord, TopicGroups};
use crate::crawler::{ElementKind, ListingElement};
use crate::url::{has_extension, resolve_action, resolve_href};
use crate::ChefError;
use std::collections::HashSet;
use url::Url;

/// Course whose video titles get their level prefixed
pub const LEVELED_COURSE_TOPIC: &str = "Reading for Meaning Course";

/// Topic variants folded into a canonical short form
pub const TOPIC_ALIASES: &[(&str, &str)] = &[("Maths Workbooks", "Maths")];

/// Topics containing any of these are dropped
pub const EXCLUDED_TOPIC_MARKERS: &[&str] = &["Covid", "Phonics", "Marksheets", "Strategy"];

/// Listing attributes read from every element
pub const ATTR_NAME: &str = "data-label";
pub const ATTR_TOPIC: &str = "data-cat1";
pub const ATTR_LEVEL: &str = "data-cat2";
pub const ATTR_TERM: &str = "data-cat3";

/// Counters reported after an extraction pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    pub extracted: usize,
    pub duplicate_urls: usize,
    pub duplicate_keys: usize,
    pub excluded: usize,
    pub off_target: usize,
}

/// Canonical topic label for `topic`
pub fn canonical_topic(topic: &str) -> &str {
    TOPIC_ALIASES
        .iter()
        .find(|(variant, _)| *variant == topic)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(topic)
}

/// Whether a topic falls into an excluded category (case-sensitive)
pub fn is_excluded_topic(topic: &str) -> bool {
    EXCLUDED_TOPIC_MARKERS
        .iter()
        .any(|marker| topic.contains(marker))
}

/// Extracts resources of one kind from matched listing elements
///
/// # Algorithm
///
/// For each element, in order:
/// 1. Resolve its asset URL (`href`, or the quoted path in `onclick` for
///    triggers); triggers not pointing at an `.mp4` are dropped
/// 2. Drop it if the URL was already seen in this pass
/// 3. Read and trim name, topic, level and term
/// 4. Prefix the level onto trigger names in the leveled course
/// 5. Fold topic aliases
/// 6. Drop excluded topics
/// 7. Derive the identity key
/// 8. Register the key under its topic and store the record
///
/// # Errors
///
/// A missing required attribute or an unparseable trigger action aborts the
/// whole pass: the listing no longer has the shape this code relies on.
pub fn extract(
    elements: &[ListingElement],
    kind: ResourceKind,
    root: &Url,
    topics: &mut TopicGroups,
) -> Result<ResourcePool, ChefError> {
    let (pool, stats) = extract_with_stats(elements, kind, root, topics)?;

    tracing::info!(
        "Extracted {} {:?} resources ({} duplicate URLs, {} duplicate keys, {} excluded, {} off-target)",
        stats.extracted,
        kind,
        stats.duplicate_urls,
        stats.duplicate_keys,
        stats.excluded,
        stats.off_target
    );

    Ok(pool)
}

/// Same as [`extract`], also returning the pass counters
pub fn extract_with_stats(
    elements: &[ListingElement],
    kind: ResourceKind,
    root: &Url,
    topics: &mut TopicGroups,
) -> Result<(ResourcePool, ExtractionStats), ChefError> {
    let mut pool = ResourcePool::new(kind);
    let mut stats = ExtractionStats::default();
    let mut seen_urls = HashSet::new();

    for element in elements {
        let url = match element.kind {
            ElementKind::Link => resolve_href(root, element.require("href")?)?,
            ElementKind::Trigger => {
                let url = resolve_action(root, element.require("onclick")?)?;
                if !has_extension(&url, ResourceKind::Video.extension()) {
                    tracing::debug!("Skipping trigger pointing at {}", url);
                    stats.off_target += 1;
                    continue;
                }
                url
            }
        };

        if !seen_urls.insert(url.to_string()) {
            stats.duplicate_urls += 1;
            continue;
        }

        let mut name = element.require(ATTR_NAME)?.trim().to_string();
        let topic = element.require(ATTR_TOPIC)?.trim();
        let level = element.require(ATTR_LEVEL)?.trim().to_string();
        let term = element.require(ATTR_TERM)?.trim().to_string();

        if topic == LEVELED_COURSE_TOPIC && element.kind == ElementKind::Trigger {
            name = format!("{}: {}", level, name);
        }

        let topic = canonical_topic(topic).to_string();

        if is_excluded_topic(&topic) {
            tracing::debug!("Skipping '{}' in excluded topic '{}'", name, topic);
            stats.excluded += 1;
            continue;
        }

        let key = identity_key(&topic, &level, &term, &name);

        let record = ResourceRecord {
            identity_key: key.clone(),
            name,
            topic,
            level,
            term,
            source_url: url,
        };

        let topic = record.topic.clone();
        if pool.insert(record) {
            topics.register(&topic, &key);
            stats.extracted += 1;
        } else {
            tracing::debug!("Duplicate identity key {}, keeping first", key);
            stats.duplicate_keys += 1;
        }
    }

    Ok((pool, stats))
}
