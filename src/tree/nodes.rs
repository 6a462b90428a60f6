use crate::catalog::{ResourceKind, ResourceRecord, Subject};
use crate::config::ChannelConfig;
use crate::transcode::PreparedDocument;
use serde::Serialize;
use std::path::PathBuf;

/// License attached to every leaf
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct License {
    pub id: String,
    pub copyright_holder: String,
}

/// Metadata shared by every leaf of a channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafDefaults {
    pub language: String,
    pub author: String,
    pub license: License,
}

impl LeafDefaults {
    pub fn from_channel(channel: &ChannelConfig) -> Self {
        Self {
            language: channel.language.clone(),
            author: channel.author.clone(),
            license: License {
                id: channel.license.clone(),
                copyright_holder: channel.copyright_holder.clone(),
            },
        }
    }
}

/// Where a leaf's content lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileRef {
    /// Local file in the compressed cache
    Path(PathBuf),
    /// Remote asset streamed by the publisher
    Url(String),
}

/// Anything that can become a tree leaf
pub trait LeafSource {
    fn record(&self) -> &ResourceRecord;
    fn kind(&self) -> ResourceKind;
    fn file(&self) -> FileRef;
}

impl LeafSource for PreparedDocument {
    fn record(&self) -> &ResourceRecord {
        &self.record
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::Document
    }

    fn file(&self) -> FileRef {
        FileRef::Path(self.path.clone())
    }
}

/// A resolved identity key: one of the two pools' entries
#[derive(Debug, Clone, Copy)]
pub enum Resource<'a> {
    Document(&'a PreparedDocument),
    Video(&'a ResourceRecord),
}

impl LeafSource for Resource<'_> {
    fn record(&self) -> &ResourceRecord {
        match self {
            Self::Document(document) => &document.record,
            Self::Video(record) => record,
        }
    }

    fn kind(&self) -> ResourceKind {
        match self {
            Self::Document(_) => ResourceKind::Document,
            Self::Video(_) => ResourceKind::Video,
        }
    }

    fn file(&self) -> FileRef {
        match self {
            Self::Document(document) => document.file(),
            Self::Video(record) => FileRef::Url(record.source_url.to_string()),
        }
    }
}

/// Leaf node: one document or video
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentNode {
    pub source_id: String,
    pub title: String,
    pub kind: ResourceKind,
    pub file: FileRef,
    pub language: String,
    pub author: String,
    pub license: License,
    pub categories: Vec<Subject>,
}

impl ContentNode {
    /// Renders a leaf for `source`, titled `"<term> - <name>"` or `"<name>"`
    pub fn from_source(
        source: &impl LeafSource,
        categories: &[Subject],
        defaults: &LeafDefaults,
    ) -> Self {
        let record = source.record();
        Self {
            source_id: record.identity_key.clone(),
            title: record.display_title(),
            kind: source.kind(),
            file: source.file(),
            language: defaults.language.clone(),
            author: defaults.author.clone(),
            license: defaults.license.clone(),
            categories: categories.to_vec(),
        }
    }
}

/// Child of a topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "node", rename_all = "lowercase")]
pub enum TreeNode {
    Topic(TopicNode),
    Content(ContentNode),
}

/// Topic or subtopic container
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicNode {
    pub source_id: String,
    pub title: String,
    pub categories: Vec<Subject>,
    pub children: Vec<TreeNode>,
}

impl TopicNode {
    pub fn new(source_id: impl Into<String>, title: impl Into<String>, categories: Vec<Subject>) -> Self {
        Self {
            source_id: source_id.into(),
            title: title.into(),
            categories,
            children: Vec::new(),
        }
    }

    pub fn add_child(&mut self, child: TreeNode) {
        self.children.push(child);
    }

    /// Direct subtopic children
    pub fn subtopics(&self) -> impl Iterator<Item = &TopicNode> {
        self.children.iter().filter_map(|child| match child {
            TreeNode::Topic(topic) => Some(topic),
            TreeNode::Content(_) => None,
        })
    }

    /// Direct leaf children
    pub fn contents(&self) -> impl Iterator<Item = &ContentNode> {
        self.children.iter().filter_map(|child| match child {
            TreeNode::Content(content) => Some(content),
            TreeNode::Topic(_) => None,
        })
    }

    /// Every leaf below this node, depth first
    pub fn leaves(&self) -> Vec<&ContentNode> {
        let mut leaves = Vec::new();
        for child in &self.children {
            match child {
                TreeNode::Content(content) => leaves.push(content),
                TreeNode::Topic(topic) => leaves.extend(topic.leaves()),
            }
        }
        leaves
    }
}

/// Root of the tree handed to the publisher
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Channel {
    pub title: String,
    pub source_domain: String,
    pub source_id: String,
    pub language: String,
    pub thumbnail: String,
    pub description: String,
    pub children: Vec<TopicNode>,
}

impl Channel {
    pub fn from_config(config: &ChannelConfig) -> Self {
        Self {
            title: config.title.clone(),
            source_domain: config.source_domain.clone(),
            source_id: config.source_id.clone(),
            language: config.language.clone(),
            thumbnail: config.thumbnail.clone(),
            description: config.description.clone(),
            children: Vec::new(),
        }
    }

    /// Looks up a topic by title
    pub fn topic(&self, title: &str) -> Option<&TopicNode> {
        self.children.iter().find(|topic| topic.title == title)
    }

    /// Every leaf in the channel
    pub fn leaves(&self) -> Vec<&ContentNode> {
        self.children.iter().flat_map(|topic| topic.leaves()).collect()
    }
}
