//! Markdown summary generation
//!
//! This module generates human-readable markdown summaries of a run,
//! including per-topic counts and the split between documents and videos.

use crate::output::traits::{OutputResult, RunSummary};
use crate::transcode::write_atomic;
use std::path::Path;

/// Writes a markdown summary of the run to `output_path`
pub fn generate_markdown_summary(summary: &RunSummary, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(summary);

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    write_atomic(output_path, markdown.as_bytes())?;

    Ok(())
}

/// Formats a run summary as markdown
pub fn format_markdown_summary(summary: &RunSummary) -> String {
    let mut md = String::new();
    let stats = &summary.statistics;

    // Title
    md.push_str("# Wande-Chef Run Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Started**: {}\n", summary.started_at));
    if let Some(finished) = &summary.finished_at {
        md.push_str(&format!("- **Finished**: {}\n", finished));
    }
    if let Some(duration) = summary.duration_seconds {
        md.push_str(&format!(
            "- **Duration**: {} seconds ({:.2} minutes)\n",
            duration,
            duration as f64 / 60.0
        ));
    }
    md.push_str(&format!("- **Status**: {}\n", summary.status));
    if summary.dry_run {
        md.push_str("- **Mode**: dry run\n");
    }
    md.push_str(&format!("- **Config Hash**: {}\n\n", summary.config_hash));

    // Discovery
    md.push_str("## Discovery\n\n");
    md.push_str(&format!(
        "- **Documents Discovered**: {}\n",
        summary.documents_discovered
    ));
    md.push_str(&format!(
        "- **Documents Prepared**: {}\n",
        summary.documents_prepared
    ));
    md.push_str(&format!(
        "- **Documents Skipped**: {}\n",
        summary.documents_skipped()
    ));
    md.push_str(&format!(
        "- **Videos Discovered**: {}\n\n",
        summary.videos_discovered
    ));

    // Tree statistics
    md.push_str("## Channel Tree\n\n");
    md.push_str(&format!("- **Topics**: {}\n", stats.topics));
    md.push_str(&format!("- **Grade Subtopics**: {}\n", stats.subtopics));
    md.push_str(&format!("- **Documents**: {}\n", stats.documents));
    md.push_str(&format!("- **Videos**: {}\n", stats.videos));
    md.push_str(&format!("- **Coverage**: {:.2}%\n\n", summary.coverage()));

    // Topic breakdown
    if !stats.per_topic.is_empty() {
        md.push_str("## Topic Breakdown\n\n");
        md.push_str("| Topic | Subtopics | Documents | Videos |\n");
        md.push_str("|-------|-----------|-----------|--------|\n");

        for topic in &stats.per_topic {
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                topic.title, topic.subtopics, topic.documents, topic.videos
            ));
        }
        md.push('\n');
    }

    md
}
