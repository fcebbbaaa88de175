//! Client for an OpenAI-compatible chat-completions endpoint.

use heart_model::ChatMessage;
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::advisor::{HealthAdvisor, TipsRequest, chat_messages, strip_emphasis};
use crate::config::AdvisorConfig;
use crate::error::{AdvisorError, Result};

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Pull `choices[0].message.content` out of a response body, trimmed.
pub fn parse_reply(body: &str) -> Result<String> {
    let response: CompletionResponse = serde_json::from_str(body)?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or(AdvisorError::EmptyReply)
}

/// [`HealthAdvisor`] backed by a hosted chat model.
pub struct ChatCompletionsClient {
    client: Client,
    config: AdvisorConfig,
}

impl std::fmt::Debug for ChatCompletionsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionsClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ChatCompletionsClient {
    pub fn new(config: AdvisorConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(AdvisorConfig::from_env()?)
    }

    fn complete(&self, messages: &[ChatMessage], max_tokens: u32) -> Result<String> {
        let request = CompletionRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
            max_tokens,
        };
        debug!(
            model = %self.config.model,
            messages = messages.len(),
            max_tokens,
            "requesting chat completion"
        );

        let response = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .header(USER_AGENT, concat!("heartalert/", env!("CARGO_PKG_VERSION")))
            .json(&request)
            .send()?;

        let status = response.status().as_u16();
        if status == 429 {
            warn!("chat endpoint rate limited the request");
            return Err(AdvisorError::RateLimited);
        }
        if !response.status().is_success() {
            let message = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!(status, "chat endpoint returned an error");
            return Err(AdvisorError::Api { status, message });
        }

        let body = response.text()?;
        parse_reply(&body)
    }
}

impl HealthAdvisor for ChatCompletionsClient {
    fn health_tips(&self, request: &TipsRequest) -> Result<String> {
        self.complete(&request.messages(), self.config.tips_max_tokens)
    }

    fn chat(&self, history: &[ChatMessage]) -> Result<String> {
        let reply = self.complete(&chat_messages(history), self.config.chat_max_tokens)?;
        Ok(strip_emphasis(&reply))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_first_choice() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"  Walk daily.\n"}},
            {"message":{"role":"assistant","content":"ignored"}}]}"#;
        assert_eq!(parse_reply(body).unwrap(), "Walk daily.");
    }

    #[test]
    fn empty_choices_is_an_error() {
        assert!(matches!(
            parse_reply(r#"{"choices":[]}"#),
            Err(AdvisorError::EmptyReply)
        ));
        assert!(matches!(
            parse_reply(r#"{"choices":[{"message":{"content":"   "}}]}"#),
            Err(AdvisorError::EmptyReply)
        ));
    }

    #[test]
    fn malformed_body_is_a_parse_error() {
        let err = parse_reply("<html>").unwrap_err();
        assert!(matches!(err, AdvisorError::JsonParse(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn request_body_shape() {
        let messages = [ChatMessage::user("hi")];
        let request = CompletionRequest {
            model: "m",
            messages: &messages,
            temperature: 0.7,
            max_tokens: 500,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "m");
        assert_eq!(value["max_tokens"], 500);
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], "hi");
    }
}
