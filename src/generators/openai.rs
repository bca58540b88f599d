use crate::config::Config;
use crate::error::GenerationError;
use crate::generators::traits::{Generated, TextGenerator};
use crate::templates::EXPERT_PERSONA;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Chat-completions generator for any OpenAI-compatible endpoint
#[derive(Clone)]
pub struct OpenAIGenerator {
    http_client: Client,
    api_key: String,
    base_url: String,
    model: String,
    system_prompt: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAIGenerator {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> anyhow::Result<Self> {
        Self::with_timeout(api_key, model, Duration::from_secs(120))
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(
            Self::with_timeout(&config.openai_api_key, &config.model_id, config.http_timeout)?
                .with_base_url(&config.openai_base_url),
        )
    }

    fn with_timeout(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".to_string(),
            model: model.into(),
            system_prompt: EXPERT_PERSONA.to_string(),
        })
    }

    /// Set a custom base URL (Azure, Gemini's OpenAI endpoint, proxies)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    fn request<'a>(&'a self, instruction: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: &self.system_prompt,
                },
                Message {
                    role: "user",
                    content: instruction,
                },
            ],
        }
    }
}

#[async_trait]
impl TextGenerator for OpenAIGenerator {
    async fn run(&self, instruction: &str) -> Result<Generated, GenerationError> {
        let start = Instant::now();

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&self.request(instruction))
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Generation request failed");
                GenerationError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(%status, error = %error_text, "Generation API error");
            return Err(GenerationError::Api(format!("{}: {}", status, error_text)));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Parse(e.to_string()))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(GenerationError::EmptyResponse)?;

        debug!(
            model = %self.model,
            duration_ms = start.elapsed().as_millis(),
            chars = content.len(),
            "Generated narrative"
        );

        Ok(Generated { content })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_builder() {
        let generator = OpenAIGenerator::new("sk-test", "gpt-4o")
            .unwrap()
            .with_base_url("https://generativelanguage.googleapis.com/v1beta/openai/");

        assert_eq!(generator.model_name(), "gpt-4o");
        assert_eq!(
            generator.base_url,
            "https://generativelanguage.googleapis.com/v1beta/openai"
        );
    }

    #[test]
    fn test_request_is_single_turn() {
        let generator = OpenAIGenerator::new("sk-test", "gpt-4o").unwrap();
        let body = serde_json::to_value(generator.request("analyze")).unwrap();

        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[1]["role"], "user");
        assert_eq!(messages[1]["content"], "analyze");
    }

    #[test]
    fn test_response_without_content_is_empty() {
        let body: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"role":"assistant"}}]}"#).unwrap();
        assert!(body.choices[0].message.content.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_network_error() {
        let generator = OpenAIGenerator::with_timeout("sk-test", "gpt-4o", Duration::from_secs(2))
            .unwrap()
            .with_base_url("http://127.0.0.1:9");

        let err = generator.run("hello").await.unwrap_err();
        assert!(matches!(err, GenerationError::Network(_)));
    }
}
