//! Change-engine provider factory.
//!
//! Creates an engine client from application configuration: resolves the
//! provider name, injects the credential, and applies a custom endpoint
//! when one is configured.

use std::sync::Arc;

use redraft_core::{AppError, AppResult};

use crate::client::ChangeEngine;
use crate::providers::{MockEngine, OllamaEngine, OpenAiEngine};

/// Create a change-engine client for the named provider.
///
/// # Arguments
/// * `provider` - Provider identifier ("openai", "ollama", "mock")
/// * `endpoint` - Optional custom endpoint URL
/// * `api_key` - Optional API key (for providers that require it)
///
/// # Errors
/// Returns `AppError::Config` if the provider is unknown or a required
/// credential is missing.
pub fn create_engine(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
) -> AppResult<Arc<dyn ChangeEngine>> {
    match provider.to_lowercase().as_str() {
        "openai" => {
            let api_key = api_key.ok_or_else(|| {
                AppError::Config("openai provider requires an API key".to_string())
            })?;
            let engine = match endpoint {
                Some(url) => OpenAiEngine::with_base_url(api_key, url),
                None => OpenAiEngine::new(api_key),
            };
            Ok(Arc::new(engine))
        }
        "ollama" => {
            let engine = match endpoint {
                Some(url) => OllamaEngine::with_base_url(url),
                None => OllamaEngine::new(),
            };
            Ok(Arc::new(engine))
        }
        "mock" => Ok(Arc::new(MockEngine::identity())),
        _ => Err(AppError::Config(format!("Unknown provider: {}", provider))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_openai_engine() {
        let engine = create_engine("openai", None, Some("sk-test")).unwrap();
        assert_eq!(engine.provider_name(), "openai");
    }

    #[test]
    fn test_openai_requires_api_key() {
        match create_engine("openai", None, None) {
            Err(err) => assert!(err.to_string().contains("requires an API key")),
            Ok(_) => panic!("Expected error for openai without API key"),
        }
    }

    #[test]
    fn test_create_ollama_engine() {
        let engine = create_engine("ollama", None, None).unwrap();
        assert_eq!(engine.provider_name(), "ollama");
    }

    #[test]
    fn test_create_ollama_with_custom_endpoint() {
        let engine = create_engine("ollama", Some("http://localhost:8080"), None);
        assert!(engine.is_ok());
    }

    #[test]
    fn test_create_mock_engine() {
        let engine = create_engine("mock", None, None).unwrap();
        assert_eq!(engine.provider_name(), "mock");
    }

    #[test]
    fn test_unknown_provider() {
        match create_engine("unknown", None, None) {
            Err(err) => assert!(err.to_string().contains("Unknown provider")),
            Ok(_) => panic!("Expected error for unknown provider"),
        }
    }
}
