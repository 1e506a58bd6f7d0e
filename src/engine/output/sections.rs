//! Section headings recognized by the renderer.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const MARKER_PREFIX: &str = "## ";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Overview,
    KeyConcepts,
    ImportantDetails,
    HistoricalContext,
    Applications,
    StudyTips,
    CommonMistakes,
    RelatedTopics,
    Source,
}

impl Section {
    pub fn heading(self) -> &'static str {
        match self {
            Section::Overview => "Overview",
            Section::KeyConcepts => "Key Concepts",
            Section::ImportantDetails => "Important Details",
            Section::HistoricalContext => "Historical Context",
            Section::Applications => "Applications and Significance",
            Section::StudyTips => "Study Tips",
            Section::CommonMistakes => "Common Mistakes to Avoid",
            Section::RelatedTopics => "Related Topics",
            Section::Source => "Source",
        }
    }

    /// The heading line as it appears in a summary.
    pub fn marker(self) -> String {
        format!("{}{}", MARKER_PREFIX, self.heading())
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.heading())
    }
}

/// A run of consecutive sentences assigned to one section.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionWindow {
    pub section: Section,
    pub sentences: usize,
}

impl SectionWindow {
    pub const fn new(section: Section, sentences: usize) -> Self {
        Self { section, sentences }
    }
}

/// Lists every `## ` heading of a summary, in order.
pub fn headings(summary: &str) -> Vec<&str> {
    summary
        .lines()
        .filter_map(|line| line.strip_prefix(MARKER_PREFIX))
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .collect()
}

/// True when the text already carries at least one section marker.
pub fn is_marker_tagged(text: &str) -> bool {
    !headings(text).is_empty()
}
