//! Chat endpoint configuration.

use std::time::Duration;

use crate::error::{AdvisorError, Result};

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "TOGETHER_API_KEY";
/// Environment variable overriding the endpoint base URL.
pub const BASE_URL_ENV: &str = "HEARTALERT_LLM_BASE_URL";
/// Environment variable overriding the model name.
pub const MODEL_ENV: &str = "HEARTALERT_LLM_MODEL";

pub const DEFAULT_BASE_URL: &str = "https://api.together.xyz/v1";
pub const DEFAULT_MODEL: &str = "meta-llama/Meta-Llama-3.1-8B-Instruct-Turbo";

/// HTTP request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct AdvisorConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub tips_max_tokens: u32,
    pub chat_max_tokens: u32,
    pub timeout: Duration,
}

impl std::fmt::Debug for AdvisorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdvisorConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("tips_max_tokens", &self.tips_max_tokens)
            .field("chat_max_tokens", &self.chat_max_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl AdvisorConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            tips_max_tokens: 600,
            chat_max_tokens: 500,
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup (used by tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup(API_KEY_ENV)
            .filter(|key| !key.trim().is_empty())
            .ok_or(AdvisorError::MissingApiKey(API_KEY_ENV))?;
        let mut config = Self::new(api_key.trim());
        if let Some(base_url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            config.base_url = base_url.trim().trim_end_matches('/').to_string();
        }
        if let Some(model) = lookup(MODEL_ENV).filter(|v| !v.trim().is_empty()) {
            config.model = model.trim().to_string();
        }
        Ok(config)
    }

    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}
