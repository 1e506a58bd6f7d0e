//! High-level coordinator: request → adapter chain → normalizer → synthesizer.

use crate::engine::output::{NormalizedContent, Normalizer};
use crate::engine::retrieval::{AdapterError, Router};
use crate::engine::synthesizer::{synthesize_questions, synthesize_videos};
use crate::engine::types::{GenerationRequest, SourceKind, StudyGuideDocument};
use crate::engine::PipelineError;
use serde::Serialize;
use std::time::Instant;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// How one adapter attempt ended.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
    Served,
    NotFound,
    TransportFailure,
    Malformed,
    ConfigurationMissing,
}

impl From<&AdapterError> for AttemptOutcome {
    fn from(e: &AdapterError) -> Self {
        match e {
            AdapterError::NotFound { .. } => AttemptOutcome::NotFound,
            AdapterError::TransportFailure { .. } => AttemptOutcome::TransportFailure,
            AdapterError::MalformedResponse { .. } => AttemptOutcome::Malformed,
            AdapterError::ConfigurationMissing { .. } => AttemptOutcome::ConfigurationMissing,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub source: SourceKind,
    pub outcome: AttemptOutcome,
}

/// A finished document plus the path that produced it.
#[derive(Debug, Clone)]
pub struct Generation {
    pub request_id: Uuid,
    pub document: StudyGuideDocument,
    pub served_by: SourceKind,
    pub attempts: Vec<Attempt>,
}

pub struct Orchestrator {
    router: Router,
    normalizer: Normalizer,
}

impl Orchestrator {
    pub fn new(router: Router, normalizer: Normalizer) -> Self {
        Self { router, normalizer }
    }

    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<StudyGuideDocument, PipelineError> {
        self.generate_traced(request).await.map(|g| g.document)
    }

    /// Tries each source of the preference's chain in order until one
    /// yields a document. Attempts never run concurrently.
    pub async fn generate_traced(
        &self,
        request: &GenerationRequest,
    ) -> Result<Generation, PipelineError> {
        let request_id = Uuid::new_v4();
        let span = info_span!(
            "generate",
            request_id = %request_id,
            topic = %request.topic,
            preference = %request.source_preference
        );
        self.run_chain(request_id, request).instrument(span).await
    }

    async fn run_chain(
        &self,
        request_id: Uuid,
        request: &GenerationRequest,
    ) -> Result<Generation, PipelineError> {
        let start = Instant::now();
        let mut attempts = Vec::new();

        for provider in self.router.chain(request.source_preference) {
            let kind = provider.kind();

            let outcome = match provider.fetch(&request.topic, request.options).await {
                Ok(content) => self
                    .normalizer
                    .normalize(&request.topic, content)
                    .map_err(|e| AdapterError::malformed(e.to_string())),
                Err(e) => Err(e),
            };

            match outcome {
                Ok(normalized) => {
                    attempts.push(Attempt {
                        source: kind,
                        outcome: AttemptOutcome::Served,
                    });
                    let document = assemble(request, normalized);
                    info!(
                        served_by = %kind,
                        attempts = attempts.len(),
                        questions = document.practice_questions.len(),
                        videos = document.video_recommendations.len(),
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "Study guide generated"
                    );
                    return Ok(Generation {
                        request_id,
                        document,
                        served_by: kind,
                        attempts,
                    });
                }
                Err(e) => {
                    let status = match &e {
                        AdapterError::TransportFailure { status, .. } => *status,
                        _ => None,
                    };
                    warn!(
                        source = provider.name(),
                        kind = e.kind(),
                        status,
                        error = %e,
                        "Source failed, falling back"
                    );
                    attempts.push(Attempt {
                        source: kind,
                        outcome: AttemptOutcome::from(&e),
                    });
                }
            }
        }

        error!(attempts = attempts.len(), "Every source failed, including demo");
        Err(PipelineError::Fatal)
    }
}

/// Builds the final document. Provider sections are kept; only sections
/// the caller asked for and the provider left empty are synthesized.
fn assemble(request: &GenerationRequest, normalized: NormalizedContent) -> StudyGuideDocument {
    let topic = request.topic.as_str();
    let options = request.options;

    let practice_questions = if options.include_practice_questions {
        match normalized.practice_questions {
            Some(questions) if !questions.is_empty() => questions,
            _ => synthesize_questions(topic, normalized.context.as_ref()),
        }
    } else {
        Vec::new()
    };

    let video_recommendations = if options.include_videos {
        match normalized.video_recommendations {
            Some(videos) if !videos.is_empty() => videos,
            _ => synthesize_videos(topic),
        }
    } else {
        Vec::new()
    };

    StudyGuideDocument {
        topic: request.topic.clone(),
        summary: normalized.summary,
        practice_questions,
        video_recommendations,
        include_practice_questions: options.include_practice_questions,
        include_videos: options.include_videos,
        source: normalized.source,
    }
}
