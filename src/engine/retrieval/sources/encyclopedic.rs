//! Wikipedia lookup: search, extract, categories.

use crate::config::EncyclopedicConfig;
use crate::engine::retrieval::result::{ProviderContent, SourceExtract};
use crate::engine::retrieval::{AdapterError, Throttle};
use crate::engine::traits::ContentProvider;
use crate::engine::types::{GenerationOptions, SourceAttribution, SourceKind};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use url::Url;

const SOURCE_NAME: &str = "Wikipedia";

#[derive(Deserialize, Debug)]
struct SearchResponse {
    #[serde(default)]
    query: Option<SearchQuery>,
}

#[derive(Deserialize, Debug)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Deserialize, Debug)]
struct SearchHit {
    pageid: u64,
    title: String,
}

#[derive(Deserialize, Debug)]
struct PagesResponse {
    #[serde(default)]
    query: Option<PagesQuery>,
}

#[derive(Deserialize, Debug)]
struct PagesQuery {
    #[serde(default)]
    pages: HashMap<String, Page>,
}

#[derive(Deserialize, Debug)]
struct Page {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    categories: Vec<CategoryRef>,
}

#[derive(Deserialize, Debug)]
struct CategoryRef {
    title: String,
}

#[derive(Deserialize, Debug)]
struct RestSummary {
    #[serde(default)]
    extract: Option<String>,
}

pub struct EncyclopedicSource {
    client: Client,
    throttle: Arc<Throttle>,
    config: EncyclopedicConfig,
}

impl EncyclopedicSource {
    pub fn new(client: Client, throttle: Arc<Throttle>, config: EncyclopedicConfig) -> Self {
        Self {
            client,
            throttle,
            config,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, AdapterError> {
        self.throttle.wait().await;
        debug!(url = %url, "GET");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdapterError::status(status, &body));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| AdapterError::malformed(format!("Unexpected Wikipedia payload: {}", e)))
    }

    fn api_url(&self, params: &[(&str, &str)]) -> Result<Url, AdapterError> {
        Url::parse_with_params(&self.config.api_url, params).map_err(|e| {
            AdapterError::TransportFailure {
                status: None,
                message: format!("Invalid api_url {}: {}", self.config.api_url, e),
            }
        })
    }

    async fn search(&self, topic: &str) -> Result<SearchHit, AdapterError> {
        let url = self.api_url(&[
            ("action", "query"),
            ("list", "search"),
            ("srsearch", topic),
            ("srlimit", "1"),
            ("format", "json"),
        ])?;
        let response: SearchResponse = self.get_json(url).await?;
        response
            .query
            .and_then(|q| q.search.into_iter().next())
            .ok_or_else(|| AdapterError::not_found(format!("No Wikipedia article matches '{}'", topic)))
    }

    async fn page(&self, params: &[(&str, &str)], pageid: u64) -> Result<Option<Page>, AdapterError> {
        let url = self.api_url(params)?;
        let response: PagesResponse = self.get_json(url).await?;
        Ok(response
            .query
            .and_then(|mut q| q.pages.remove(&pageid.to_string())))
    }

    async fn extract(&self, hit: &SearchHit) -> Result<(String, String), AdapterError> {
        let pageid = hit.pageid.to_string();
        let mut params = vec![
            ("action", "query"),
            ("prop", "extracts"),
            ("explaintext", "true"),
            ("pageids", pageid.as_str()),
            ("format", "json"),
        ];
        if self.config.intro_only {
            params.push(("exintro", "true"));
        }

        let page = self.page(&params, hit.pageid).await?;
        let title = page
            .as_ref()
            .and_then(|p| p.title.clone())
            .unwrap_or_else(|| hit.title.clone());
        let extract = page.and_then(|p| p.extract).filter(|e| !e.trim().is_empty());

        if let Some(text) = extract {
            return Ok((title, text));
        }

        debug!(title = %title, "Extract empty, trying REST summary");
        let url = format!(
            "{}/page/summary/{}",
            self.config.rest_url.trim_end_matches('/'),
            urlencoding::encode(&title)
        );
        let url = Url::parse(&url).map_err(|e| AdapterError::TransportFailure {
            status: None,
            message: format!("Invalid rest_url {}: {}", self.config.rest_url, e),
        })?;
        let summary: RestSummary = self.get_json(url).await?;
        summary
            .extract
            .filter(|e| !e.trim().is_empty())
            .map(|text| (title.clone(), text))
            .ok_or_else(|| AdapterError::not_found(format!("Wikipedia page '{}' has no extract", title)))
    }

    /// Category lookup is best effort; failures give an empty list.
    async fn categories(&self, pageid: u64) -> Vec<String> {
        let id = pageid.to_string();
        let limit = self.config.category_limit.to_string();
        let params = [
            ("action", "query"),
            ("prop", "categories"),
            ("clshow", "!hidden"),
            ("cllimit", limit.as_str()),
            ("pageids", id.as_str()),
            ("format", "json"),
        ];

        match self.page(&params, pageid).await {
            Ok(page) => page
                .map(|p| {
                    p.categories
                        .into_iter()
                        .map(|c| {
                            c.title
                                .strip_prefix("Category:")
                                .unwrap_or(&c.title)
                                .to_string()
                        })
                        .collect()
                })
                .unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, pageid, "Failed to fetch categories");
                Vec::new()
            }
        }
    }

    fn page_url(&self, title: &str) -> String {
        format!(
            "{}/{}",
            self.config.page_url.trim_end_matches('/'),
            urlencoding::encode(&title.replace(' ', "_"))
        )
    }
}

#[async_trait]
impl ContentProvider for EncyclopedicSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Encyclopedic
    }

    fn name(&self) -> &'static str {
        "wikipedia"
    }

    #[instrument(skip(self))]
    async fn fetch(
        &self,
        topic: &str,
        _options: GenerationOptions,
    ) -> Result<ProviderContent, AdapterError> {
        let hit = self.search(topic).await?;
        let (title, text) = self.extract(&hit).await?;
        let categories = self.categories(hit.pageid).await;

        info!(
            title = %title,
            pageid = hit.pageid,
            chars = text.len(),
            categories = categories.len(),
            "Wikipedia article found"
        );

        Ok(ProviderContent::Extract(SourceExtract {
            text,
            categories,
            attribution: SourceAttribution {
                name: SOURCE_NAME.to_string(),
                url: self.page_url(&title),
                title,
            },
        }))
    }
}
