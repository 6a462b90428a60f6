//! Static topic → subject lookup
//!
//! The publisher tags every node with subject categories. The site has no
//! such labels, so they come from this fixed table keyed by topic name.

use serde::Serialize;

/// Subject category understood by the publisher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    Literacy,
    ReadingAndWriting,
    ReadingComprehension,
    Mathematics,
    ForTeachers,
    LanguageLearning,
}

const LITERACY_TOPICS: &[&str] = &[
    "Literacy Workbooks",
    "Reading Academy",
    "Reading Strategy 2022 - 2030",
    "ECDoE Reading Policy",
];

const MATHS_TOPICS: &[&str] = &["Maths Workbooks", "Maths", "Numeracy Academy"];

const TEACHER_TOPICS: &[&str] = &[
    "Teaching Guides",
    "Instructional Coaching",
    "Lesson Plan Intervention",
    "Reading for Meaning Course",
];

const LANGUAGE_TOPICS: &[&str] = &["DBE Vocabulary Posters"];

/// Maps a topic label to its subject categories
///
/// Unknown topics map to no categories.
///
/// # Examples
///
/// ```
/// use wande_chef::catalog::{map_categories, Subject};
///
/// assert_eq!(map_categories("Maths"), vec![Subject::Mathematics]);
/// assert!(map_categories("Something Else").is_empty());
/// ```
pub fn map_categories(topic: &str) -> Vec<Subject> {
    let topic = topic.trim();
    let mut categories = Vec::new();

    if LITERACY_TOPICS.contains(&topic) {
        categories.extend([
            Subject::Literacy,
            Subject::ReadingAndWriting,
            Subject::ReadingComprehension,
        ]);
    }
    if MATHS_TOPICS.contains(&topic) {
        categories.push(Subject::Mathematics);
    }
    if TEACHER_TOPICS.contains(&topic) {
        categories.push(Subject::ForTeachers);
    }
    if LANGUAGE_TOPICS.contains(&topic) {
        categories.push(Subject::LanguageLearning);
    }

    categories
}
