//! Turns provider payloads into the section-tagged summary.

use super::sections::{is_marker_tagged, Section, SectionWindow};
use super::templates::{intro_line, source_footer, study_tips};
use super::OutputError;
use crate::config::NormalizerConfig;
use crate::engine::retrieval::result::{ProviderContent, SourceExtract, StructuredDocument};
use crate::engine::synthesizer::SourceContext;
use crate::engine::types::{PracticeQuestion, SourceAttribution, VideoRecommendation};
use tracing::debug;

/// Sentence units shorter than this are abbreviation or list debris.
pub const MIN_SENTENCE_CHARS: usize = 10;

const ADMINISTRATIVE_MARKERS: &[&str] = &[
    "Wikipedia",
    "Template",
    "Articles",
    "articles",
    "Pages",
    "CS1",
    "Webarchive",
    "Short description",
    "All ",
    "Use ",
];

/// Summary plus whatever else the provider supplied. `None` means the
/// provider had nothing for that section.
#[derive(Debug, Clone)]
pub struct NormalizedContent {
    pub summary: String,
    pub source: Option<SourceAttribution>,
    pub practice_questions: Option<Vec<PracticeQuestion>>,
    pub video_recommendations: Option<Vec<VideoRecommendation>>,
    pub context: Option<SourceContext>,
}

impl NormalizedContent {
    fn summary_only(summary: String) -> Self {
        Self {
            summary,
            source: None,
            practice_questions: None,
            video_recommendations: None,
            context: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Normalizer {
    windows: Vec<SectionWindow>,
    related_topics_limit: usize,
}

impl Normalizer {
    pub fn new(config: &NormalizerConfig) -> Self {
        Self {
            windows: config.windows.clone(),
            related_topics_limit: config.related_topics_limit,
        }
    }

    pub fn normalize(
        &self,
        topic: &str,
        content: ProviderContent,
    ) -> Result<NormalizedContent, OutputError> {
        match content {
            ProviderContent::Extract(SourceExtract {
                text,
                categories,
                attribution,
            }) => {
                let summary = if is_marker_tagged(&text) {
                    pass_through(topic, &text)
                } else {
                    self.format_extract(topic, &text, &categories, Some(&attribution))?
                };
                Ok(NormalizedContent {
                    summary,
                    source: Some(attribution),
                    practice_questions: None,
                    video_recommendations: None,
                    context: Some(SourceContext { text, categories }),
                })
            }
            ProviderContent::Generated(text) => {
                Ok(NormalizedContent::summary_only(self.format_text(topic, &text)?))
            }
            ProviderContent::Structured(StructuredDocument {
                summary,
                practice_questions,
                video_recommendations,
            }) => {
                if summary.trim().is_empty() {
                    return Err(OutputError::EmptySummary);
                }
                // Whole documents keep their own layout; only extracts and
                // free generations are cut into windows.
                Ok(NormalizedContent {
                    summary: pass_through(topic, &summary),
                    source: None,
                    practice_questions,
                    video_recommendations,
                    context: None,
                })
            }
        }
    }

    fn format_text(&self, topic: &str, text: &str) -> Result<String, OutputError> {
        if is_marker_tagged(text) {
            Ok(pass_through(topic, text))
        } else {
            self.format_extract(topic, text, &[], None)
        }
    }

    /// Deterministic: the same text, categories and windows always give the
    /// same summary. Sentences past the last window are dropped.
    pub fn format_extract(
        &self,
        topic: &str,
        text: &str,
        categories: &[String],
        attribution: Option<&SourceAttribution>,
    ) -> Result<String, OutputError> {
        let sentences = split_sentences(text);
        if sentences.is_empty() {
            return Err(OutputError::NoUsableSentences);
        }

        let mut blocks = vec![intro_line(topic, attribution.is_some())];

        let mut offset = 0;
        for window in &self.windows {
            if offset >= sentences.len() {
                break;
            }
            let end = (offset + window.sentences).min(sentences.len());
            blocks.push(format!(
                "{}\n{}",
                window.section.marker(),
                join_sentences(&sentences[offset..end])
            ));
            offset = end;
        }
        debug!(
            sentences = sentences.len(),
            used = offset,
            "Allocated sentences to sections"
        );

        blocks.push(study_tips(attribution.map(|a| a.name.as_str())));

        let related = related_topics(categories, self.related_topics_limit);
        if !related.is_empty() {
            let list = related
                .iter()
                .map(|c| format!("- {}", c))
                .collect::<Vec<_>>()
                .join("\n");
            blocks.push(format!("{}\n{}", Section::RelatedTopics.marker(), list));
        }

        if let Some(source) = attribution {
            blocks.push(source_footer(&source.name, &source.title, &source.url));
        }

        Ok(blocks.join("\n\n"))
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(&NormalizerConfig::default())
    }
}

/// Marker-tagged text is kept as is; it only gains an intro line when it
/// never names the topic.
fn pass_through(topic: &str, text: &str) -> String {
    let text = text.trim();
    if text.contains(topic) {
        text.to_string()
    } else {
        format!("{}\n\n{}", intro_line(topic, false), text)
    }
}

/// Splits on `". "` and keeps units of at least [`MIN_SENTENCE_CHARS`]
/// characters, without their trailing period.
pub fn split_sentences(text: &str) -> Vec<String> {
    text.split(". ")
        .map(|s| s.trim().trim_end_matches('.').trim_end())
        .filter(|s| s.chars().count() >= MIN_SENTENCE_CHARS)
        .map(str::to_string)
        .collect()
}

pub fn join_sentences(sentences: &[String]) -> String {
    format!("{}.", sentences.join(". "))
}

pub fn is_administrative_category(category: &str) -> bool {
    ADMINISTRATIVE_MARKERS.iter().any(|m| category.contains(m))
}

pub fn related_topics(categories: &[String], limit: usize) -> Vec<&str> {
    categories
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty() && !is_administrative_category(c))
        .take(limit)
        .collect()
}
