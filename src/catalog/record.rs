use crate::crawler::ElementKind;
use serde::Serialize;
use std::collections::HashMap;
use url::Url;

/// Term label meaning "not term specific"
pub const TERM_SENTINEL: &str = "All";

/// Substring of a level label marking grade-specific content
pub const GRADE_MARKER: &str = "Grade";

/// Which crawl a resource came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Document,
    Video,
}

impl ResourceKind {
    /// Listing element kind that carries this resource type
    pub fn element_kind(&self) -> ElementKind {
        match self {
            Self::Document => ElementKind::Link,
            Self::Video => ElementKind::Trigger,
        }
    }

    /// File extension of the underlying asset
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Document => "pdf",
            Self::Video => "mp4",
        }
    }
}

/// One discoverable unit of content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub identity_key: String,
    pub name: String,
    pub topic: String,
    pub level: String,
    pub term: String,
    pub source_url: Url,
}

impl ResourceRecord {
    /// Whether the level label carries the grade marker
    pub fn is_graded(&self) -> bool {
        self.level.contains(GRADE_MARKER)
    }

    /// Display title: `"<term> - <name>"`, or just the name for the `All` term
    pub fn display_title(&self) -> String {
        if self.term == TERM_SENTINEL {
            self.name.clone()
        } else {
            format!("{} - {}", self.term, self.name)
        }
    }
}

/// Builds the identity key for a resource
///
/// Fields are joined with `-`, suffixed with `_id`, and every space is
/// replaced by an underscore.
///
/// # Examples
///
/// ```
/// use wande_chef::catalog::identity_key;
///
/// let key = identity_key("Maths", "Grade 1", "Term 2", "Workbook A");
/// assert_eq!(key, "Maths-Grade_1-Term_2-Workbook_A_id");
/// ```
pub fn identity_key(topic: &str, level: &str, term: &str, name: &str) -> String {
    format!("{}-{}-{}-{}_id", topic, level, term, name).replace(' ', "_")
}

/// Records of one resource type, keyed by identity
#[derive(Debug, Clone)]
pub struct ResourcePool {
    kind: ResourceKind,
    records: HashMap<String, ResourceRecord>,
}

impl ResourcePool {
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            records: HashMap::new(),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Inserts a record unless its key is already present
    ///
    /// Returns false when the key was taken; the first record stays.
    pub fn insert(&mut self, record: ResourceRecord) -> bool {
        if self.records.contains_key(&record.identity_key) {
            return false;
        }
        self.records.insert(record.identity_key.clone(), record);
        true
    }

    pub fn get(&self, key: &str) -> Option<&ResourceRecord> {
        self.records.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records sorted by identity key
    pub fn sorted(&self) -> Vec<&ResourceRecord> {
        let mut records: Vec<_> = self.records.values().collect();
        records.sort_by(|a, b| a.identity_key.cmp(&b.identity_key));
        records
    }
}

/// Identity keys registered under one topic, in discovery order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicGroup {
    pub topic: String,
    pub keys: Vec<String>,
}

/// All topic groups of a crawl, in order of first sight
///
/// Shared by the document and video extraction passes, so one topic may
/// list the same key twice when both crawls derive it.
#[derive(Debug, Clone, Default)]
pub struct TopicGroups {
    groups: Vec<TopicGroup>,
    index: HashMap<String, usize>,
}

impl TopicGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `key` to the group for `topic`, creating the group on first sight
    pub fn register(&mut self, topic: &str, key: &str) {
        let position = match self.index.get(topic) {
            Some(&position) => position,
            None => {
                self.groups.push(TopicGroup {
                    topic: topic.to_string(),
                    keys: Vec::new(),
                });
                self.index.insert(topic.to_string(), self.groups.len() - 1);
                self.groups.len() - 1
            }
        };
        self.groups[position].keys.push(key.to_string());
    }

    pub fn get(&self, topic: &str) -> Option<&TopicGroup> {
        self.index.get(topic).map(|&i| &self.groups[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &TopicGroup> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
