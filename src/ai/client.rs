use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::credentials::Credential;
use super::http_client::completion_client;
use super::types::ModelChoice;

/// Default base URL of the completion API
pub const DEFAULT_API_BASE: &str = "https://api.deepseek.com/v1";

/// Sampling temperature for analysis requests
pub const TEMPERATURE: f32 = 0.3;

/// Output length cap for analysis requests
pub const MAX_TOKENS: u32 = 4000;

/// Where and as whom to send the prompt
#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    pub api_base: String,
    pub credential: Option<Credential>,
    pub model: ModelChoice,
}

impl ConnectionSettings {
    pub fn new(api_base: impl Into<String>, credential: Option<Credential>, model: ModelChoice) -> Self {
        Self {
            api_base: api_base.into(),
            credential,
            model,
        }
    }

    /// Full URL of the chat completions endpoint
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim().trim_end_matches('/'))
    }
}

/// Failed analysis, with the raw response body when there was one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct AnalysisError {
    pub message: String,
    pub details: Option<String>,
}

impl AnalysisError {
    pub fn new(message: impl Into<String>, details: Option<String>) -> Self {
        Self {
            message: message.into(),
            details,
        }
    }

    pub fn missing_credential() -> Self {
        Self::new("Please provide a valid DeepSeek API key", None)
    }

    /// Non-success HTTP status
    pub fn status(status: StatusCode, body: String) -> Self {
        Self::new(format!("API request failed: {}", status.as_u16()), Some(body))
    }

    /// Success status but the body is not a usable completion
    pub fn malformed(cause: impl fmt::Display, body: String) -> Self {
        Self::new(format!("Unexpected API response: {}", cause), Some(body))
    }

    /// Connection, TLS or other transport failure
    pub fn transport(cause: impl fmt::Display) -> Self {
        Self::new(format!("Error during request: {}", cause), None)
    }
}

// API request/response types

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
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

/// Chat-completion client for the analysis step.
///
/// One call is one POST; there is no retry and nothing is cached.
pub struct AnalysisClient {
    client: Client,
}

impl AnalysisClient {
    pub fn new() -> Self {
        Self {
            client: completion_client().clone(),
        }
    }

    /// Send the prompt and return the first completion's text
    pub async fn analyze(
        &self,
        prompt: &str,
        settings: &ConnectionSettings,
    ) -> Result<String, AnalysisError> {
        let credential = settings
            .credential
            .as_ref()
            .ok_or_else(AnalysisError::missing_credential)?;

        let endpoint = settings.endpoint();
        let request = ChatRequest {
            model: settings.model.as_str(),
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        tracing::info!(
            "[AnalysisClient] POST {} model={} prompt={} chars",
            endpoint,
            settings.model,
            prompt.len()
        );

        let response = self
            .client
            .post(&endpoint)
            .header("Authorization", credential.bearer())
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("[AnalysisClient] Transport failure: {}", e);
                AnalysisError::transport(e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(AnalysisError::transport)?;

        if status != StatusCode::OK {
            tracing::warn!(
                "[AnalysisClient] API returned {} ({} bytes)",
                status,
                body.len()
            );
            return Err(AnalysisError::status(status, body));
        }

        let content = parse_completion(&body)?;

        tracing::info!(
            "[AnalysisClient] Completion received: {} chars",
            content.len()
        );

        Ok(content)
    }
}

impl Default for AnalysisClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Pull `choices[0].message.content` out of a response body
fn parse_completion(body: &str) -> Result<String, AnalysisError> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| AnalysisError::malformed(e, body.to_string()))?;

    parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| AnalysisError::malformed("no choices returned", body.to_string()))?
        .message
        .content
        .ok_or_else(|| AnalysisError::malformed("completion has no content", body.to_string()))
}
