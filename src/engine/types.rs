//! Shared structs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of places a study guide can come from.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Demo,
    Encyclopedic,
    Generative,
    Chat,
}

impl SourceKind {
    pub const ALL: [SourceKind; 4] = [
        SourceKind::Demo,
        SourceKind::Encyclopedic,
        SourceKind::Generative,
        SourceKind::Chat,
    ];

    /// Ordered list of sources tried for this preference. Every chain ends
    /// with `Demo` and never names a source twice.
    pub fn fallback_chain(self) -> &'static [SourceKind] {
        match self {
            SourceKind::Demo => &[SourceKind::Demo],
            SourceKind::Encyclopedic => &[
                SourceKind::Encyclopedic,
                SourceKind::Generative,
                SourceKind::Demo,
            ],
            SourceKind::Generative => &[SourceKind::Generative, SourceKind::Demo],
            SourceKind::Chat => &[SourceKind::Chat, SourceKind::Demo],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SourceKind::Demo => "demo",
            SourceKind::Encyclopedic => "encyclopedic",
            SourceKind::Generative => "generative",
            SourceKind::Chat => "chat",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the canonical names and the provider names (`mock`, `wikipedia`,
/// `huggingface`, `openai`), case-insensitively.
impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "demo" | "mock" => Ok(SourceKind::Demo),
            "encyclopedic" | "wikipedia" => Ok(SourceKind::Encyclopedic),
            "generative" | "huggingface" => Ok(SourceKind::Generative),
            "chat" | "openai" => Ok(SourceKind::Chat),
            other => Err(format!("Unknown source: {}", other)),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOptions {
    pub include_practice_questions: bool,
    pub include_videos: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            include_practice_questions: true,
            include_videos: true,
        }
    }
}

/// One user submission. Built through [`GenerationRequest::new`], which
/// rejects blank topics.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub(crate) topic: String,
    pub(crate) source_preference: SourceKind,
    pub(crate) options: GenerationOptions,
}

impl GenerationRequest {
    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn source_preference(&self) -> SourceKind {
        self.source_preference
    }

    pub fn options(&self) -> GenerationOptions {
        self.options
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PracticeQuestion {
    pub question: String,
    pub answer: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VideoRecommendation {
    pub title: String,
    pub url: String,
    pub duration: String,
    pub description: String,
}

/// Citation for content that came from a traceable external source.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SourceAttribution {
    pub name: String,
    pub url: String,
    pub title: String,
}

/// The canonical output of the pipeline.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StudyGuideDocument {
    pub topic: String,
    pub summary: String,
    pub practice_questions: Vec<PracticeQuestion>,
    pub video_recommendations: Vec<VideoRecommendation>,
    pub include_practice_questions: bool,
    pub include_videos: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceAttribution>,
}
