//! Payload shapes returned by the adapters.

use crate::engine::types::{PracticeQuestion, SourceAttribution, VideoRecommendation};
use serde::Deserialize;

/// Whatever shape is native to the backend that produced it.
#[derive(Debug, Clone)]
pub enum ProviderContent {
    /// Plain-text extract plus citation metadata.
    Extract(SourceExtract),
    /// Free text from a generative model.
    Generated(String),
    /// A full or partial canonical document.
    Structured(StructuredDocument),
}

#[derive(Debug, Clone)]
pub struct SourceExtract {
    pub text: String,
    pub categories: Vec<String>,
    pub attribution: SourceAttribution,
}

/// Document as a chat model (or the demo source) emits it. Missing sections
/// stay `None` so the orchestrator knows what to fill.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct StructuredDocument {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub practice_questions: Option<Vec<PracticeQuestion>>,
    #[serde(default)]
    pub video_recommendations: Option<Vec<VideoRecommendation>>,
}

impl StructuredDocument {
    pub fn from_summary(summary: String) -> Self {
        Self {
            summary,
            ..Default::default()
        }
    }
}
