//! Public façade for the engine layer.

pub mod core;
pub mod orchestrator;
pub mod output;
pub mod retrieval;
pub mod synthesizer;
pub mod traits;
pub mod types;

pub use orchestrator::{Attempt, AttemptOutcome, Generation, Orchestrator};
pub use traits::ContentProvider;
pub use types::{
    GenerationOptions, GenerationRequest, PracticeQuestion, SourceAttribution, SourceKind,
    StudyGuideDocument, VideoRecommendation,
};

use crate::config::ConfigError;
use thiserror::Error;

/// Errors that reach the caller. Provider failures never do; they are
/// absorbed by the fallback chain.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Pipeline setup failed: {0}")]
    Setup(#[from] ConfigError),
    #[error("Failed to generate study guide. Please try again.")]
    Fatal,
}
