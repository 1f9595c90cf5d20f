//! OpenAI-compatible chat-completions generator
//!
//! Talks to any chat-completions endpoint (OpenAI, OpenRouter, or a local
//! gateway) to extract question-answer pairs from document text. The HTTP
//! path is async; the [`QuestionGenerator`] impl wraps it for the synchronous
//! extraction core.

use crate::parser::parse_qa_response;
use crate::prompt::build_qa_prompt;
use crate::GeneratorError;
use answerforge_domain::{QaPair, QuestionGenerator};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default chat-completions endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Default request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of attempts per request
pub const DEFAULT_MAX_RETRIES: u32 = 3;

const SYSTEM_MESSAGE: &str = "You are a helpful assistant that extracts high-quality \
     question-answer pairs from documents. Answers must be exact quotes from the provided text.";

/// Connection settings for the generation service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Full URL of the chat-completions endpoint
    pub base_url: String,

    /// Bearer token for the endpoint
    pub api_key: String,

    /// Model identifier passed through to the service
    pub model: String,

    /// Completion token budget per request
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Attempts per request before giving up
    pub max_retries: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            model: "gpt-3.5-turbo".to_string(),
            max_tokens: 500,
            temperature: 0.7,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Question-answer pair generator backed by a chat-completions API
pub struct ChatCompletionsGenerator {
    config: GeneratorConfig,
    client: reqwest::Client,
}

impl ChatCompletionsGenerator {
    /// Create a generator from connection settings
    ///
    /// Fails with [`GeneratorError::MissingCredentials`] if no API key is
    /// configured; every later call would be rejected by the service anyway.
    pub fn new(config: GeneratorConfig) -> Result<Self, GeneratorError> {
        if config.api_key.trim().is_empty() {
            return Err(GeneratorError::MissingCredentials);
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| GeneratorError::Other(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    /// Send one prompt to the service, retrying on transient failures
    ///
    /// Retries use exponential backoff (1s, 2s, 4s, ...). A 429 status is
    /// retried like any transient failure and reported as
    /// [`GeneratorError::RateLimited`] once attempts run out.
    pub async fn generate(&self, prompt: &str) -> Result<String, GeneratorError> {
        let request_body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_MESSAGE,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.config.max_retries {
            match self
                .client
                .post(&self.config.base_url)
                .bearer_auth(&self.config.api_key)
                .json(&request_body)
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let chat: ChatResponse = response.json().await.map_err(|e| {
                            GeneratorError::InvalidResponse(format!(
                                "failed to parse response: {}",
                                e
                            ))
                        })?;
                        return match chat.choices.into_iter().next() {
                            Some(choice) => Ok(choice.message.content),
                            None => Err(GeneratorError::InvalidResponse(
                                "response contained no choices".to_string(),
                            )),
                        };
                    } else if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        warn!(attempt = attempts + 1, "generation service rate limited");
                        last_error = Some(GeneratorError::RateLimited);
                    } else {
                        let body = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "unknown error".to_string());
                        last_error = Some(GeneratorError::Communication(format!(
                            "HTTP {}: {}",
                            status, body
                        )));
                    }
                }
                Err(e) => {
                    last_error = Some(GeneratorError::Communication(format!(
                        "request failed: {}",
                        e
                    )));
                }
            }

            attempts += 1;
            if attempts < self.config.max_retries {
                // Exponential backoff: 1s, 2s, 4s, ...
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                debug!(attempt = attempts, delay_secs = delay.as_secs(), "retrying");
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| GeneratorError::Communication("max retries exceeded".to_string())))
    }
}

impl QuestionGenerator for ChatCompletionsGenerator {
    type Error = GeneratorError;

    fn extract_qa_pairs(
        &self,
        text: &str,
        max_pairs: usize,
        custom_prompt: Option<&str>,
    ) -> Result<Vec<QaPair>, Self::Error> {
        let prompt = build_qa_prompt(text, max_pairs, custom_prompt);

        // Blocking wrapper for the async client; callers run on worker
        // threads, not inside a runtime.
        let response = tokio::runtime::Runtime::new()
            .map_err(|e| GeneratorError::Other(format!("failed to start runtime: {}", e)))?
            .block_on(self.generate(&prompt))?;

        parse_qa_response(&response)
    }
}
