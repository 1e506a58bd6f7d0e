//! Shared traits.

use crate::engine::retrieval::{result::ProviderContent, AdapterError};
use crate::engine::types::{GenerationOptions, SourceKind};

/// One external information source behind a uniform fetch contract.
#[async_trait::async_trait]
pub trait ContentProvider: Send + Sync {
    fn kind(&self) -> SourceKind;

    /// Human-readable name for logging.
    fn name(&self) -> &'static str;

    async fn fetch(
        &self,
        topic: &str,
        options: GenerationOptions,
    ) -> Result<ProviderContent, AdapterError>;
}
