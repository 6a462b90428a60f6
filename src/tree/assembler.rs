//! Tree assembly
//!
//! Topics are visited in discovery order. Each topic decides once, from its
//! first extracted resource, whether it splits into per-grade subtopics;
//! each resource then lands either in its grade subtopic or directly under
//! the topic. An identity key is attached at most once across the whole tree.
//!
//! The split decision reads the extracted records, so a document that failed
//! to download never changes the shape of its topic.

use crate::catalog::{map_categories, ResourcePool, ResourceRecord, TopicGroup, TopicGroups};
use crate::config::ChannelConfig;
use crate::transcode::PreparedDocuments;
use crate::tree::nodes::{Channel, ContentNode, LeafDefaults, LeafSource, Resource, TopicNode, TreeNode};
use std::collections::{HashMap, HashSet};

/// Builds the channel tree from topic groups and both resource pools
///
/// `documents` is the extracted document pool and decides grade splits;
/// `prepared` holds the documents that can actually be published. Keys are
/// resolved against the prepared documents first, then the videos. A key
/// present in both is logged and rendered as a document.
pub fn assemble(
    topics: &TopicGroups,
    documents: &ResourcePool,
    prepared: &PreparedDocuments,
    videos: &ResourcePool,
    channel: &ChannelConfig,
) -> Channel {
    let mut assembler = Assembler::new(
        documents,
        prepared,
        videos,
        LeafDefaults::from_channel(channel),
    );
    let mut root = Channel::from_config(channel);

    for group in topics.iter() {
        let topic = assembler.assemble_topic(group);
        root.children.push(topic);
    }

    tracing::info!(
        "Assembled {} topics with {} resources",
        root.children.len(),
        assembler.attached.len()
    );

    root
}

/// Single owner of the cross-pool attachment set
struct Assembler<'a> {
    documents: &'a ResourcePool,
    prepared: &'a PreparedDocuments,
    videos: &'a ResourcePool,
    defaults: LeafDefaults,

    /// Identity keys already placed somewhere in the tree
    attached: HashSet<String>,
}

impl<'a> Assembler<'a> {
    fn new(
        documents: &'a ResourcePool,
        prepared: &'a PreparedDocuments,
        videos: &'a ResourcePool,
        defaults: LeafDefaults,
    ) -> Self {
        Self {
            documents,
            prepared,
            videos,
            defaults,
            attached: HashSet::new(),
        }
    }

    /// Extracted record for `key`, documents first, without logging
    fn lookup(&self, key: &str) -> Option<&'a ResourceRecord> {
        self.documents.get(key).or_else(|| self.videos.get(key))
    }

    /// Resolves a key to the resource that will be rendered
    fn resolve(&self, key: &str) -> Option<Resource<'a>> {
        let document = self.prepared.get(key);
        let video = self.videos.get(key);

        match (document, video) {
            (Some(document), Some(_)) => {
                tracing::warn!(
                    "Identity key {} found in both document and video pools, using the document",
                    key
                );
                Some(Resource::Document(document))
            }
            (Some(document), None) => Some(Resource::Document(document)),
            (None, Some(video)) => Some(Resource::Video(video)),
            (None, None) => None,
        }
    }

    fn assemble_topic(&mut self, group: &TopicGroup) -> TopicNode {
        let categories = map_categories(&group.topic);
        let mut topic = TopicNode::new(
            format!("{}_id", group.topic.replace(' ', "_")),
            group.topic.clone(),
            categories.clone(),
        );

        let split_by_grade = group
            .keys
            .first()
            .and_then(|key| self.lookup(key))
            .map(ResourceRecord::is_graded)
            .unwrap_or(false);

        // level -> index of the subtopic in topic.children
        let mut subtopics: HashMap<String, usize> = HashMap::new();

        for key in &group.keys {
            if self.attached.contains(key) {
                tracing::debug!("Skipping resource {}", key);
                continue;
            }

            let resource = match self.resolve(key) {
                Some(resource) => resource,
                None => {
                    tracing::warn!("Skipping {}: not available in any pool", key);
                    continue;
                }
            };
            self.attached.insert(key.clone());

            let leaf = ContentNode::from_source(&resource, &categories, &self.defaults);
            let record = resource.record();

            if split_by_grade && record.is_graded() {
                let index = *subtopics.entry(record.level.clone()).or_insert_with(|| {
                    topic.add_child(TreeNode::Topic(TopicNode::new(
                        format!("{}_id", record.level),
                        record.level.clone(),
                        categories.clone(),
                    )));
                    topic.children.len() - 1
                });

                if let TreeNode::Topic(subtopic) = &mut topic.children[index] {
                    subtopic.add_child(TreeNode::Content(leaf));
                }
            } else {
                topic.add_child(TreeNode::Content(leaf));
            }
        }

        tracing::debug!(
            "Topic '{}': {} children, {} subtopics",
            topic.title,
            topic.children.len(),
            subtopics.len()
        );

        topic
    }
}
