//! Request intake: topic cleaning.

use crate::engine::types::{GenerationOptions, GenerationRequest, SourceKind};
use crate::engine::PipelineError;

impl GenerationRequest {
    pub fn new(
        topic: &str,
        source_preference: SourceKind,
        options: GenerationOptions,
    ) -> Result<Self, PipelineError> {
        let topic = clean_topic(topic)?;
        Ok(Self {
            topic,
            source_preference,
            options,
        })
    }
}

/// Trims the topic. Blank topics are the only rejected input; anything else
/// is a valid query and is percent-encoded by the adapters that send it.
pub fn clean_topic(raw: &str) -> Result<String, PipelineError> {
    let topic = raw.trim();
    if topic.is_empty() {
        return Err(PipelineError::InvalidRequest(
            "Topic cannot be empty".to_string(),
        ));
    }
    Ok(topic.to_string())
}
