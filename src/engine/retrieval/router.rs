//! Maps each `SourceKind` to its adapter and walks fallback chains.

use super::sources::{ChatSource, DemoSource, EncyclopedicSource, GenerativeSource};
use super::Throttle;
use crate::config::{Config, ConfigError};
use crate::engine::traits::ContentProvider;
use crate::engine::types::SourceKind;
use std::sync::Arc;

#[derive(Clone)]
pub struct Router {
    encyclopedic: Arc<dyn ContentProvider>,
    generative: Arc<dyn ContentProvider>,
    chat: Arc<dyn ContentProvider>,
    demo: DemoSource,
}

impl Router {
    /// The demo slot is fixed so every chain ends with a source that
    /// cannot fail.
    pub fn new(
        encyclopedic: Arc<dyn ContentProvider>,
        generative: Arc<dyn ContentProvider>,
        chat: Arc<dyn ContentProvider>,
    ) -> Self {
        Self {
            encyclopedic,
            generative,
            chat,
            demo: DemoSource::new(),
        }
    }

    /// All network adapters share `throttle`. Pass the process-wide one
    /// so concurrent requests are spaced too.
    pub fn with_throttle(config: &Config, throttle: Arc<Throttle>) -> Result<Self, ConfigError> {
        let client = config.http.build_client()?;
        Ok(Self::new(
            Arc::new(EncyclopedicSource::new(
                client.clone(),
                Arc::clone(&throttle),
                config.encyclopedic.clone(),
            )),
            Arc::new(GenerativeSource::new(
                client.clone(),
                Arc::clone(&throttle),
                config.generative.clone(),
            )),
            Arc::new(ChatSource::new(client, throttle, config.chat.clone())),
        ))
    }

    pub fn provider(&self, kind: SourceKind) -> &dyn ContentProvider {
        match kind {
            SourceKind::Encyclopedic => self.encyclopedic.as_ref(),
            SourceKind::Generative => self.generative.as_ref(),
            SourceKind::Chat => self.chat.as_ref(),
            SourceKind::Demo => &self.demo,
        }
    }

    pub fn chain(&self, preference: SourceKind) -> impl Iterator<Item = &dyn ContentProvider> + '_ {
        preference
            .fallback_chain()
            .iter()
            .map(move |kind| self.provider(*kind))
    }
}
