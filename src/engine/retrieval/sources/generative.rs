//! Hugging Face hosted text generation.

use crate::config::GenerativeConfig;
use crate::engine::output::templates::generative_prompt;
use crate::engine::retrieval::result::ProviderContent;
use crate::engine::retrieval::{usable_credential, AdapterError, Throttle};
use crate::engine::traits::ContentProvider;
use crate::engine::types::{GenerationOptions, SourceKind};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};

#[derive(Serialize, Debug)]
struct GenerationRequest<'a> {
    inputs: &'a str,
    parameters: GenerationParameters,
}

#[derive(Serialize, Debug)]
struct GenerationParameters {
    max_length: u32,
    temperature: f32,
    do_sample: bool,
    return_full_text: bool,
}

#[derive(Deserialize, Debug)]
struct Generated {
    #[serde(default)]
    generated_text: String,
}

/// The inference API answers with either a list or a single object.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum GenerationResponse {
    Batch(Vec<Generated>),
    Single(Generated),
}

impl GenerationResponse {
    fn into_text(self) -> String {
        match self {
            GenerationResponse::Batch(items) => items
                .into_iter()
                .next()
                .map(|g| g.generated_text)
                .unwrap_or_default(),
            GenerationResponse::Single(g) => g.generated_text,
        }
    }
}

pub struct GenerativeSource {
    client: Client,
    throttle: Arc<Throttle>,
    config: GenerativeConfig,
}

impl GenerativeSource {
    pub fn new(client: Client, throttle: Arc<Throttle>, config: GenerativeConfig) -> Self {
        Self {
            client,
            throttle,
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}",
            self.config.api_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl ContentProvider for GenerativeSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Generative
    }

    fn name(&self) -> &'static str {
        "huggingface"
    }

    #[instrument(skip(self))]
    async fn fetch(
        &self,
        topic: &str,
        _options: GenerationOptions,
    ) -> Result<ProviderContent, AdapterError> {
        let token = usable_credential(self.config.api_token.as_deref()).ok_or(
            AdapterError::ConfigurationMissing {
                provider: "huggingface",
            },
        )?;

        let prompt = generative_prompt(topic);
        let body = GenerationRequest {
            inputs: &prompt,
            parameters: GenerationParameters {
                max_length: self.config.max_length,
                temperature: self.config.temperature,
                do_sample: self.config.do_sample,
                return_full_text: false,
            },
        };

        self.throttle.wait().await;
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            warn!(model = %self.config.model, "Model not found");
            return Err(AdapterError::not_found(format!(
                "Model {} is not available",
                self.config.model
            )));
        }
        if !status.is_success() {
            let details = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), details = %details, "Hugging Face API error");
            return Err(AdapterError::status(status, &details));
        }

        let generated: GenerationResponse = response
            .json()
            .await
            .map_err(|e| AdapterError::malformed(format!("Unexpected generation payload: {}", e)))?;

        let text = strip_prompt_echo(&generated.into_text(), &prompt);
        if text.is_empty() {
            return Err(AdapterError::not_found("Model returned empty text"));
        }

        info!(chars = text.len(), "Generated text received");
        Ok(ProviderContent::Generated(text))
    }
}

/// Some models repeat the prompt even with `return_full_text: false`.
fn strip_prompt_echo(text: &str, prompt: &str) -> String {
    let text = text.trim();
    text.strip_prefix(prompt).unwrap_or(text).trim().to_string()
}
