//! Ollama change-engine provider.
//!
//! Integration with Ollama, a local LLM runtime, for keyless local
//! rewrites. Ollama API: https://github.com/ollama/ollama/blob/main/docs/api.md

use crate::client::{ChangeEngine, EngineRequest, EngineResponse, EngineUsage};
use redraft_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Ollama API request format.
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
    stream: bool,
}

/// Ollama API response format.
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    model: String,
    response: String,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

/// Ollama change-engine client.
pub struct OllamaEngine {
    /// Base URL for Ollama API
    base_url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl OllamaEngine {
    /// Create a new Ollama client with default settings.
    ///
    /// Default URL: http://localhost:11434
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a new Ollama client with a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Convert an EngineRequest to Ollama format.
    ///
    /// Rewrites are always non-streaming: the merge step needs the whole
    /// replacement body before anything is written.
    fn to_ollama_request(&self, request: &EngineRequest) -> OllamaRequest {
        OllamaRequest {
            model: request.model.clone(),
            prompt: request.prompt.clone(),
            system: request.system.clone(),
            temperature: request.temperature,
            num_predict: request.max_tokens,
            stream: false,
        }
    }
}

impl Default for OllamaEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ChangeEngine for OllamaEngine {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    async fn complete(&self, request: &EngineRequest) -> AppResult<EngineResponse> {
        tracing::info!("Sending rewrite request to Ollama");
        tracing::debug!("Model: {}, prompt bytes: {}", request.model, request.prompt.len());

        let ollama_request = self.to_ollama_request(request);
        let url = format!("{}/api/generate", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&ollama_request)
            .send()
            .await
            .map_err(|e| AppError::Engine(format!("Failed to send request to Ollama: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Engine(format!(
                "Ollama API error ({}): {}",
                status, error_text
            )));
        }

        let ollama_response: OllamaResponse = response
            .json()
            .await
            .map_err(|e| AppError::Engine(format!("Failed to parse Ollama response: {}", e)))?;

        let usage = EngineUsage::new(
            ollama_response.prompt_eval_count.unwrap_or(0),
            ollama_response.eval_count.unwrap_or(0),
        );

        tracing::info!("Received rewrite from Ollama");

        Ok(EngineResponse {
            content: ollama_response.response,
            model: ollama_response.model,
            usage,
        })
    }
}
