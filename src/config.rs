//! Layered configuration: defaults, then an optional TOML file, then the
//! process environment.

use crate::engine::output::sections::{Section, SectionWindow};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

pub const CONFIG_PATH_ENV: &str = "STUDYGUIDE_CONFIG";
pub const HF_TOKEN_ENV: &str = "HF_API_TOKEN";
pub const OPENAI_KEY_ENV: &str = "OPENAI_API_KEY";
pub const THROTTLE_ENV: &str = "STUDYGUIDE_THROTTLE_MS";
pub const HTTP_TIMEOUT_ENV: &str = "STUDYGUIDE_HTTP_TIMEOUT_SECS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Invalid value for {key}: {value}")]
    InvalidEnv { key: &'static str, value: String },
    #[error("Invalid configuration: {0}")]
    Invalid(String),
    #[error("Failed to create HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub throttle: ThrottleConfig,
    pub encyclopedic: EncyclopedicConfig,
    pub generative: GenerativeConfig,
    pub chat: ChatConfig,
    pub normalizer: NormalizerConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_seconds: u64,
    pub user_agent: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ThrottleConfig {
    pub min_interval_ms: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct EncyclopedicConfig {
    pub api_url: String,
    pub rest_url: String,
    pub page_url: String,
    pub intro_only: bool,
    pub category_limit: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct GenerativeConfig {
    pub api_url: String,
    pub model: String,
    pub api_token: Option<String>,
    pub max_length: u32,
    pub temperature: f32,
    pub do_sample: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ChatConfig {
    pub api_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct NormalizerConfig {
    pub windows: Vec<SectionWindow>,
    pub related_topics_limit: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: format!(
                "studyguide/{} (https://github.com/guivernoir/studyguide)",
                env!("CARGO_PKG_VERSION")
            ),
        }
    }
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: 1000,
        }
    }
}

impl Default for EncyclopedicConfig {
    fn default() -> Self {
        Self {
            api_url: "https://en.wikipedia.org/w/api.php".to_string(),
            rest_url: "https://en.wikipedia.org/api/rest_v1".to_string(),
            page_url: "https://en.wikipedia.org/wiki".to_string(),
            intro_only: true,
            category_limit: 10,
        }
    }
}

impl Default for GenerativeConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api-inference.huggingface.co/models".to_string(),
            model: "microsoft/DialoGPT-medium".to_string(),
            api_token: None,
            max_length: 300,
            temperature: 0.8,
            do_sample: true,
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            api_key: None,
            max_tokens: 3000,
            temperature: 0.7,
        }
    }
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            windows: vec![
                SectionWindow::new(Section::Overview, 3),
                SectionWindow::new(Section::KeyConcepts, 3),
                SectionWindow::new(Section::ImportantDetails, 4),
                SectionWindow::new(Section::HistoricalContext, 5),
                SectionWindow::new(Section::Applications, 5),
            ],
            related_topics_limit: 3,
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn build_client(&self) -> Result<reqwest::Client, ConfigError> {
        Ok(reqwest::Client::builder()
            .timeout(self.timeout())
            .user_agent(self.user_agent.clone())
            .build()?)
    }
}

impl ThrottleConfig {
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }
}

impl Config {
    /// Loads the file named by `STUDYGUIDE_CONFIG` (if any) and applies
    /// environment overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
        Self::load(path.as_deref())
    }

    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Applies overrides from `lookup`, which is the process environment
    /// outside of tests.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(HF_TOKEN_ENV) {
            self.generative.api_token = Some(token);
        }
        if let Some(key) = lookup(OPENAI_KEY_ENV) {
            self.chat.api_key = Some(key);
        }
        if let Some(value) = lookup(THROTTLE_ENV) {
            self.throttle.min_interval_ms =
                value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                    key: THROTTLE_ENV,
                    value: value.clone(),
                })?;
        }
        if let Some(value) = lookup(HTTP_TIMEOUT_ENV) {
            self.http.timeout_seconds =
                value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                    key: HTTP_TIMEOUT_ENV,
                    value: value.clone(),
                })?;
        }
        debug!(
            generative_token = self.generative.api_token.is_some(),
            chat_key = self.chat.api_key.is_some(),
            "Applied environment overrides"
        );
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "http.timeout_seconds must be greater than zero".to_string(),
            ));
        }
        if self.normalizer.windows.is_empty() {
            return Err(ConfigError::Invalid(
                "normalizer.windows cannot be empty".to_string(),
            ));
        }
        if self.normalizer.windows.iter().any(|w| w.sentences == 0) {
            return Err(ConfigError::Invalid(
                "normalizer.windows entries need at least one sentence".to_string(),
            ));
        }
        Ok(())
    }
}
