use std::time::Instant;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::ServiceConfig;
use crate::error::AnalyzerError;

/// One chat-completion round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub system_instruction: String,
    pub user_instruction: String,
    pub temperature: f32,
    pub json_response: bool,
}

/// The remote side of an analysis. Implementations make exactly one call
/// per invocation and never retry.
pub trait CompletionClient {
    fn complete(&self, request: &CompletionRequest) -> Result<String, AnalyzerError>;
}

/// Azure OpenAI chat-completions client.
#[derive(Debug, Clone)]
pub struct AzureOpenAiClient {
    config: ServiceConfig,
    client: Client,
}

impl AzureOpenAiClient {
    pub fn new(config: ServiceConfig) -> Result<Self, AnalyzerError> {
        let client = Client::builder().build()?;
        Ok(Self { config, client })
    }

    #[must_use]
    pub fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions",
            self.config.endpoint.trim_end_matches('/'),
            self.config.deployment
        )
    }
}

impl CompletionClient for AzureOpenAiClient {
    fn complete(&self, request: &CompletionRequest) -> Result<String, AnalyzerError> {
        let started = Instant::now();
        let body = ChatRequest {
            model: &request.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system_instruction,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user_instruction,
                },
            ],
            temperature: request.temperature,
            response_format: request
                .json_response
                .then_some(ResponseFormat { kind: "json_object" }),
        };

        info!(
            deployment = %self.config.deployment,
            prompt_chars = request.user_instruction.chars().count(),
            "sending completion request"
        );
        let response = self
            .client
            .post(self.completions_url())
            .query(&[("api-version", self.config.api_version.as_str())])
            .header("api-key", &self.config.api_key)
            .json(&body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            return Err(AnalyzerError::Remote(format!(
                "completion endpoint returned {status}: {}",
                detail.trim()
            )));
        }

        let payload: ChatResponse = response.json()?;
        let choice = payload
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AnalyzerError::Remote("completion contained no choices".to_string()))?;
        if let Some(reason) = choice.finish_reason.as_deref() {
            debug!(finish_reason = reason, "completion finished");
        }
        let content = choice.message.content.ok_or_else(|| {
            AnalyzerError::Remote("completion message had no content".to_string())
        })?;

        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            reply_chars = content.chars().count(),
            "received completion reply"
        );
        Ok(content)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReplyMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatReplyMessage {
    content: Option<String>,
}
