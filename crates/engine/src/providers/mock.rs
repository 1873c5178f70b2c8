//! Mock change engine for testing and development.
//!
//! Deterministic stand-in for a real rewrite service. The identity mode
//! echoes the content block of the rendered prompt back unchanged, which
//! makes end-to-end byte-fidelity checks possible without a live provider.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::client::{ChangeEngine, EngineRequest, EngineResponse, EngineUsage};
use redraft_core::{AppError, AppResult};

/// Behavior of the mock engine.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Return the content block of the prompt unchanged.
    Identity,

    /// Return `segment-<index>` after a delay inversely proportional to the
    /// segment index, so later segments complete first. Exercises the
    /// reassembled-in-document-order guarantee.
    StampIndex,

    /// Return an empty replacement.
    Empty,

    /// Fail every request with the given message.
    Fail(String),
}

/// Mock change-engine provider.
#[derive(Debug)]
pub struct MockEngine {
    behavior: MockBehavior,
    calls: AtomicUsize,
}

impl MockEngine {
    /// Create a mock with the given behavior.
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
        }
    }

    /// Identity mock: every segment comes back unchanged.
    pub fn identity() -> Self {
        Self::new(MockBehavior::Identity)
    }

    /// Index-stamping mock with reverse completion order.
    pub fn stamp_index() -> Self {
        Self::new(MockBehavior::StampIndex)
    }

    /// Mock returning empty replacements.
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Mock failing every request.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::new(MockBehavior::Fail(message.into()))
    }

    /// Number of completed or attempted requests.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// Extract the content block from a rendered rewrite prompt.
///
/// Prompts place the content between the header's blank line and the
/// trailing "Apply the following change" directive; the last occurrence of
/// the directive wins so content containing blank lines survives intact.
fn extract_content(prompt: &str) -> Option<&str> {
    let start = prompt.find("\n\n")? + 2;
    let end = prompt.rfind("\n\nApply the following change")?;
    if end < start {
        return None;
    }
    Some(&prompt[start..end])
}

/// Extract the 1-based index and total from a segment prompt header.
fn extract_position(prompt: &str) -> Option<(usize, usize)> {
    let rest = prompt.strip_prefix("Here is segment ")?;
    let (index, rest) = rest.split_once(" of ")?;
    let (total, _) = rest.split_once(' ')?;
    Some((index.parse().ok()?, total.parse().ok()?))
}

#[async_trait::async_trait]
impl ChangeEngine for MockEngine {
    fn provider_name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &EngineRequest) -> AppResult<EngineResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let content = match &self.behavior {
            MockBehavior::Identity => extract_content(&request.prompt)
                .ok_or_else(|| {
                    AppError::Engine("Mock could not locate prompt content".to_string())
                })?
                .to_string(),
            MockBehavior::StampIndex => {
                let (index, total) = extract_position(&request.prompt).unwrap_or((1, 1));
                // Later segments finish first
                let delay = 20 * (total.saturating_sub(index) as u64);
                tokio::time::sleep(Duration::from_millis(delay)).await;
                format!("segment-{}", index)
            }
            MockBehavior::Empty => String::new(),
            MockBehavior::Fail(message) => {
                return Err(AppError::Engine(message.clone()));
            }
        };

        Ok(EngineResponse {
            content,
            model: request.model.clone(),
            usage: EngineUsage::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::{render_segment, render_single};

    #[tokio::test]
    async fn test_identity_echoes_content() {
        let engine = MockEngine::identity();
        let built = render_single("x = 1\n\ny = 2", "do nothing").unwrap();
        let request = EngineRequest::new(built.user, "mock-model").with_system(built.system);

        let response = engine.complete(&request).await.unwrap();
        assert_eq!(response.content, "x = 1\n\ny = 2");
        assert_eq!(engine.calls(), 1);
    }

    #[tokio::test]
    async fn test_identity_on_segment_prompt() {
        let engine = MockEngine::identity();
        let built = render_segment("    indented()", "do nothing", 3, 4).unwrap();
        let request = EngineRequest::new(built.user, "mock-model");

        let response = engine.complete(&request).await.unwrap();
        assert_eq!(response.content, "    indented()");
    }

    #[tokio::test]
    async fn test_stamp_index_parses_position() {
        let engine = MockEngine::stamp_index();
        let built = render_segment("body", "change", 2, 2).unwrap();
        let request = EngineRequest::new(built.user, "mock-model");

        let response = engine.complete(&request).await.unwrap();
        assert_eq!(response.content, "segment-2");
    }

    #[tokio::test]
    async fn test_failing_mock() {
        let engine = MockEngine::failing("rate limited");
        let request = EngineRequest::new("anything", "mock-model");

        let err = engine.complete(&request).await.unwrap_err();
        assert!(err.to_string().contains("rate limited"));
        assert_eq!(engine.calls(), 1);
    }
}
