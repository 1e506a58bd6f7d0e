//! Synthetic source. No I/O, never fails.

use crate::engine::output::templates::demo_summary;
use crate::engine::retrieval::result::{ProviderContent, StructuredDocument};
use crate::engine::retrieval::AdapterError;
use crate::engine::traits::ContentProvider;
use crate::engine::types::{GenerationOptions, SourceKind};
use async_trait::async_trait;
use tracing::debug;

#[derive(Debug, Default, Clone, Copy)]
pub struct DemoSource;

impl DemoSource {
    pub fn new() -> Self {
        Self
    }

    pub fn document(&self, topic: &str) -> StructuredDocument {
        StructuredDocument::from_summary(demo_summary(topic))
    }
}

#[async_trait]
impl ContentProvider for DemoSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Demo
    }

    fn name(&self) -> &'static str {
        "demo"
    }

    async fn fetch(
        &self,
        topic: &str,
        _options: GenerationOptions,
    ) -> Result<ProviderContent, AdapterError> {
        debug!(topic, "Generating synthetic study guide");
        Ok(ProviderContent::Structured(self.document(topic)))
    }
}
