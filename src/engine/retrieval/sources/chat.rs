//! OpenAI-compatible chat completion asked for the whole document as JSON.

use crate::config::ChatConfig;
use crate::engine::output::parser::try_parse_structured_document;
use crate::engine::output::templates::{chat_system_prompt, chat_user_prompt};
use crate::engine::retrieval::result::{ProviderContent, StructuredDocument};
use crate::engine::retrieval::{usable_credential, AdapterError, Throttle};
use crate::engine::synthesizer::{synthesize_questions, synthesize_videos};
use crate::engine::traits::ContentProvider;
use crate::engine::types::{GenerationOptions, SourceKind};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Message {
    pub role: String,
    pub content: String,
}

#[derive(Serialize, Debug)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: Message,
}

pub struct ChatSource {
    client: Client,
    throttle: Arc<Throttle>,
    config: ChatConfig,
}

impl ChatSource {
    pub fn new(client: Client, throttle: Arc<Throttle>, config: ChatConfig) -> Self {
        Self {
            client,
            throttle,
            config,
        }
    }

    async fn complete(
        &self,
        api_key: &str,
        topic: &str,
        options: GenerationOptions,
    ) -> Result<String, AdapterError> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: chat_system_prompt().to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: chat_user_prompt(topic, options),
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        self.throttle.wait().await;
        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let details = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), details = %details, "Chat API error");
            return Err(AdapterError::status(status, &details));
        }

        let reply: ChatResponse = response
            .json()
            .await
            .map_err(|e| AdapterError::malformed(format!("Unexpected chat payload: {}", e)))?;

        reply
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| AdapterError::not_found("Chat API returned empty content"))
    }
}

/// Keeps the raw reply as the summary and fills the opted-in sections from
/// templates.
fn degrade(topic: &str, raw: String, options: GenerationOptions) -> StructuredDocument {
    StructuredDocument {
        summary: raw,
        practice_questions: options
            .include_practice_questions
            .then(|| synthesize_questions(topic, None)),
        video_recommendations: options.include_videos.then(|| synthesize_videos(topic)),
    }
}

#[async_trait]
impl ContentProvider for ChatSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Chat
    }

    fn name(&self) -> &'static str {
        "openai"
    }

    #[instrument(skip(self))]
    async fn fetch(
        &self,
        topic: &str,
        options: GenerationOptions,
    ) -> Result<ProviderContent, AdapterError> {
        let api_key = usable_credential(self.config.api_key.as_deref())
            .ok_or(AdapterError::ConfigurationMissing { provider: "openai" })?;

        let content = self.complete(api_key, topic, options).await?;

        let document = match try_parse_structured_document(&content) {
            Some(document) => {
                info!(
                    questions = document.practice_questions.as_ref().map_or(0, Vec::len),
                    videos = document.video_recommendations.as_ref().map_or(0, Vec::len),
                    "Chat reply parsed as structured document"
                );
                document
            }
            None => {
                warn!("Chat reply is not valid JSON, keeping raw text as summary");
                degrade(topic, content, options)
            }
        };

        Ok(ProviderContent::Structured(document))
    }
}
