//! Tree statistics
//!
//! Counts derived from an assembled channel, used by the markdown summary
//! and printed to stdout in dry runs.

use crate::catalog::ResourceKind;
use crate::tree::{Channel, ContentNode, TopicNode};

/// Counts for a single top-level topic
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicStatistics {
    pub title: String,
    pub subtopics: usize,
    pub documents: usize,
    pub videos: usize,
}

impl TopicStatistics {
    fn from_topic(topic: &TopicNode) -> Self {
        let (documents, videos) = count_kinds(&topic.leaves());
        Self {
            title: topic.title.clone(),
            subtopics: topic.subtopics().count(),
            documents,
            videos,
        }
    }

    pub fn total(&self) -> usize {
        self.documents + self.videos
    }
}

/// Channel-wide counts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeStatistics {
    pub topics: usize,
    pub subtopics: usize,
    pub documents: usize,
    pub videos: usize,

    /// Per-topic breakdown, in tree order
    pub per_topic: Vec<TopicStatistics>,
}

impl TreeStatistics {
    pub fn from_channel(channel: &Channel) -> Self {
        let per_topic: Vec<TopicStatistics> = channel
            .children
            .iter()
            .map(TopicStatistics::from_topic)
            .collect();

        Self {
            topics: per_topic.len(),
            subtopics: per_topic.iter().map(|t| t.subtopics).sum(),
            documents: per_topic.iter().map(|t| t.documents).sum(),
            videos: per_topic.iter().map(|t| t.videos).sum(),
            per_topic,
        }
    }

    pub fn total_resources(&self) -> usize {
        self.documents + self.videos
    }
}

fn count_kinds(leaves: &[&ContentNode]) -> (usize, usize) {
    leaves
        .iter()
        .fold((0, 0), |(documents, videos), leaf| match leaf.kind {
            ResourceKind::Document => (documents + 1, videos),
            ResourceKind::Video => (documents, videos + 1),
        })
}

/// Prints statistics to stdout
pub fn print_statistics(stats: &TreeStatistics) {
    println!("=== Channel Statistics ===\n");

    println!("Overview:");
    println!("  Topics: {}", stats.topics);
    println!("  Grade subtopics: {}", stats.subtopics);
    println!("  Documents: {}", stats.documents);
    println!("  Videos: {}", stats.videos);
    println!();

    if !stats.per_topic.is_empty() {
        println!("Resources by Topic:");
        for topic in &stats.per_topic {
            let percentage = if stats.total_resources() > 0 {
                (topic.total() as f64 / stats.total_resources() as f64) * 100.0
            } else {
                0.0
            };
            println!(
                "  {}: {} documents, {} videos ({:.1}%)",
                topic.title, topic.documents, topic.videos, percentage
            );
        }
        println!();
    }
}
