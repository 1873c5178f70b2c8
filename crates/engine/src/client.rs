//! Change-engine client abstraction and request/response types.
//!
//! This module defines the core abstractions for talking to the external
//! rewrite service. The engine accepts a free-text instruction/content pair
//! and returns free-text replacement content; there is no structured schema
//! and no guaranteed idempotence.

use redraft_core::AppResult;
use serde::{Deserialize, Serialize};

/// A single rewrite completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineRequest {
    /// The full user prompt (content plus instructions)
    pub prompt: String,

    /// Model identifier (e.g., "gpt-4", "llama3.2")
    pub model: String,

    /// System prompt carrying the rewrite directives
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Temperature for sampling; rewrites run low to minimize drift
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl EngineRequest {
    /// Create a new request with required fields.
    pub fn new(prompt: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            system: None,
            temperature: None,
            max_tokens: None,
        }
    }

    /// Set the system prompt.
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the temperature for sampling.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the maximum tokens to generate.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// A completed engine response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineResponse {
    /// The replacement text
    pub content: String,

    /// Model that generated the response
    pub model: String,

    /// Usage statistics
    #[serde(default)]
    pub usage: EngineUsage,
}

/// Token usage statistics.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EngineUsage {
    /// Tokens in the prompt
    #[serde(default)]
    pub prompt_tokens: u32,

    /// Tokens in the completion
    #[serde(default)]
    pub completion_tokens: u32,

    /// Total tokens used
    #[serde(default)]
    pub total_tokens: u32,
}

impl EngineUsage {
    /// Create usage stats from prompt and completion token counts.
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Trait for change-engine providers.
///
/// This trait abstracts the underlying rewrite service (OpenAI, Ollama,
/// mock) behind a unified completion interface. Rewrites are consumed
/// whole; a partial reply is useless for byte-faithful merging, so there
/// is no streaming variant.
#[async_trait::async_trait]
pub trait ChangeEngine: Send + Sync {
    /// Get the provider name (e.g., "openai", "ollama").
    fn provider_name(&self) -> &str;

    /// Perform a rewrite completion.
    ///
    /// Any failure (transport, status, malformed body) is an
    /// `AppError::Engine`; callers treat it as terminal for the whole
    /// rewrite.
    async fn complete(&self, request: &EngineRequest) -> AppResult<EngineResponse>;
}
