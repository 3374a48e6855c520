//! Chat-completion capability and its OpenAI-compatible HTTP implementation.
//!
//! Everything that talks to a language model goes through [`CompletionClient`], so the
//! pipeline can be driven by a scripted stub in tests. [`OpenAiClient`] is the production
//! implementation: one blocking `POST {base_url}/chat/completions` per call, no retries.

use crate::config::LlmConfig;
use crate::error::{Error, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// A single role-tagged message in a completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Anything that can turn a list of chat messages into a single text completion.
pub trait CompletionClient {
    /// Sends `messages` and returns the completion text with surrounding whitespace trimmed.
    fn complete(&self, messages: &[ChatMessage]) -> Result<String>;
}

/// Blocking client for OpenAI-compatible chat-completion endpoints.
pub struct OpenAiClient {
    http: reqwest::blocking::Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f64,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f64,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl OpenAiClient {
    /// Creates a client from the `[llm]` configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingApiKey`] when no key is configured, or [`Error::Http`] if the
    /// underlying HTTP client cannot be built.
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(Error::MissingApiKey)?;

        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

impl CompletionClient for OpenAiClient {
    /// Sends one chat-completion request and returns the trimmed text of the first choice.
    ///
    /// # Arguments
    ///
    /// * `messages` - The conversation, sent in order with the configured model and temperature
    ///
    /// # Errors
    ///
    /// * [`Error::Http`] if the request cannot be sent or the body cannot be read
    /// * [`Error::Api`] if the service answers with a non-success status
    /// * [`Error::MalformedResponse`] if the body has no first choice with text content
    fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
        };

        debug!(
            "Requesting completion from {} (model {}, {} messages)",
            self.endpoint(),
            self.model,
            messages.len()
        );

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()?;

        let status = response.status();
        let text = response.text()?;

        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        parse_completion(&text)
    }
}

/// Pulls `choices[0].message.content` out of a chat-completion response body.
fn parse_completion(body: &str) -> Result<String> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| Error::MalformedResponse(e.to_string()))?;

    let content = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| Error::MalformedResponse("response has no choices".to_string()))?
        .message
        .content
        .ok_or_else(|| Error::MalformedResponse("first choice has no content".to_string()))?;

    debug!("Received completion of {} bytes", content.len());
    Ok(content.trim().to_string())
}
