//! Study guide generation from encyclopedic, generative and chat sources
//! with a demo fallback that never fails.

pub mod config;
pub mod engine;

pub use config::{Config, ConfigError};
pub use engine::{
    GenerationOptions, GenerationRequest, Orchestrator, PipelineError, SourceKind,
    StudyGuideDocument,
};

use engine::output::Normalizer;
use engine::retrieval::{Router, Throttle};
use std::sync::{Arc, OnceLock};
use tracing::debug;

static THROTTLE: OnceLock<Arc<Throttle>> = OnceLock::new();

/// The process-wide throttle. Its interval comes from the first config
/// that asks for it; later configs share the same clock.
pub fn shared_throttle(config: &Config) -> Arc<Throttle> {
    Arc::clone(THROTTLE.get_or_init(|| {
        debug!(
            min_interval_ms = config.throttle.min_interval_ms,
            "Initializing shared throttle"
        );
        Arc::new(Throttle::new(config.throttle.min_interval()))
    }))
}

/// Builds an orchestrator whose network adapters go through
/// [`shared_throttle`].
pub fn orchestrator(config: &Config) -> Result<Orchestrator, PipelineError> {
    let router = Router::with_throttle(config, shared_throttle(config))?;
    Ok(Orchestrator::new(router, Normalizer::new(&config.normalizer)))
}

/// One-shot entry point. Configuration comes from the environment.
pub async fn generate(
    topic: &str,
    options: GenerationOptions,
    source_preference: SourceKind,
) -> Result<StudyGuideDocument, PipelineError> {
    let config = Config::from_env()?;
    generate_with_config(&config, topic, options, source_preference).await
}

pub async fn generate_with_config(
    config: &Config,
    topic: &str,
    options: GenerationOptions,
    source_preference: SourceKind,
) -> Result<StudyGuideDocument, PipelineError> {
    let request = GenerationRequest::new(topic, source_preference, options)?;
    orchestrator(config)?.generate(&request).await
}
