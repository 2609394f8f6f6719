use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;
use crate::errors::AppError;

#[async_trait]
pub trait Generator: Send + Sync {
    /// One stateless completion; the full response text is the report.
    async fn generate(&self, prompt: &str) -> Result<String, AppError>;
}

/// OpenAI-format chat completions client.
pub struct CloudGenerator {
    client: reqwest::Client,
    config: LlmConfig,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    content: String,
}

impl CloudGenerator {
    pub fn new(config: LlmConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::GenerationFailure(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl Generator for CloudGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, AppError> {
        let body = ChatRequest {
            model: &self.config.model,
            temperature: 0.2,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let res = self
            .client
            .post(&self.config.api_url)
            .header(
                "Authorization",
                format!("Bearer {}", self.config.api_key.trim()),
            )
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::GenerationFailure(format!("Request failed: {e}")))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(AppError::GenerationFailure(format!(
                "API error {status}: {text}"
            )));
        }

        let parsed: ChatResponse = res
            .json()
            .await
            .map_err(|e| AppError::GenerationFailure(format!("Parse error: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AppError::GenerationFailure("Empty completion".to_string()))
    }
}

/// Canned report for mock mode; keeps the pipeline runnable without an API key.
pub struct MockGenerator;

#[async_trait]
impl Generator for MockGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, AppError> {
        Ok(format!(
            "Pricing report (mock)\n\nNo live model is configured; the numeric \
             comparison data is authoritative. Prompt was {} characters.",
            prompt.len()
        ))
    }
}
