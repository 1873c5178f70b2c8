//! Rewrite orchestrator: drives the change engine per segment and merges
//! the results back into a single document.
//!
//! Requests for a multi-segment rewrite are independent and dispatched
//! concurrently; results are reassembled strictly in original segment
//! order, never by completion order. Any engine failure aborts the whole
//! rewrite; there is no partial result and no per-segment retry.

use std::sync::Arc;

use futures::future;
use redraft_chunk::{chunk, ChunkConfig, Document, Segment};
use redraft_core::{AppError, AppResult};

use crate::client::{ChangeEngine, EngineRequest};
use crate::prompt::{render_segment, render_single};

/// Options governing a rewrite invocation.
#[derive(Debug, Clone)]
pub struct RewriteOptions {
    /// Model identifier passed to the engine
    pub model: String,

    /// Sampling temperature; kept low to minimize drift
    pub temperature: f32,

    /// Token budget per request
    pub max_tokens: u32,

    /// Structural chunker configuration
    pub chunk: ChunkConfig,

    /// Warn when a replacement's line count drifts from its segment's
    pub verify_merge: bool,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            model: "gpt-4".to_string(),
            temperature: 0.2,
            max_tokens: 4000,
            chunk: ChunkConfig::default(),
            verify_merge: false,
        }
    }
}

/// Orchestrates chunking, per-segment engine calls, and the ordered merge.
pub struct RewriteOrchestrator {
    engine: Arc<dyn ChangeEngine>,
    options: RewriteOptions,
}

impl RewriteOrchestrator {
    /// Create a new orchestrator.
    pub fn new(engine: Arc<dyn ChangeEngine>, options: RewriteOptions) -> Self {
        Self { engine, options }
    }

    /// Rewrite a document according to free-text instructions.
    ///
    /// The document is split by the structural chunker; a single-segment
    /// document costs exactly one engine call, an N-segment document
    /// exactly N. The merged output keeps the input's line separator and
    /// trailing-newline metadata.
    pub async fn rewrite(&self, document: &Document, instructions: &str) -> AppResult<Document> {
        let segments = chunk(document, &self.options.chunk);
        let total = segments.len();

        tracing::info!(
            "Rewriting {} lines in {} segment(s) via {}",
            document.line_count(),
            total,
            self.engine.provider_name()
        );

        let merged = if total == 1 {
            self.rewrite_whole(document, &segments[0], instructions).await?
        } else {
            self.rewrite_segments(document, &segments, instructions).await?
        };

        Ok(document.with_text(&merged))
    }

    /// Low-overhead path: the whole document fits one request.
    async fn rewrite_whole(
        &self,
        document: &Document,
        segment: &Segment,
        instructions: &str,
    ) -> AppResult<String> {
        let content = segment.text(document.newline());
        let built = render_single(&content, instructions)?;

        let response = self.engine.complete(&self.build_request(built)).await?;
        self.require_replacement(&response.content, 1, 1)?;

        if self.options.verify_merge {
            self.check_line_drift(segment, &response.content, 1);
        }

        Ok(response.content)
    }

    /// One request per segment, dispatched concurrently; `try_join_all`
    /// yields results in input order regardless of completion order and
    /// fails fast on the first error.
    async fn rewrite_segments(
        &self,
        document: &Document,
        segments: &[Segment],
        instructions: &str,
    ) -> AppResult<String> {
        let total = segments.len();
        let newline = document.newline();

        let requests = segments.iter().enumerate().map(|(i, segment)| {
            let index = i + 1;
            async move {
                let content = segment.text(newline);
                let built = render_segment(&content, instructions, index, total)?;

                tracing::debug!(
                    "Dispatching segment {}/{} ({} lines, complete: {})",
                    index,
                    total,
                    segment.line_count(),
                    segment.is_complete()
                );

                let response = self.engine.complete(&self.build_request(built)).await?;
                self.require_replacement(&response.content, index, total)?;

                if self.options.verify_merge {
                    self.check_line_drift(segment, &response.content, index);
                }

                Ok::<String, AppError>(response.content)
            }
        });

        let results = future::try_join_all(requests).await?;

        Ok(results.join(newline.as_str()))
    }

    /// Build an engine request from a built prompt and the options.
    fn build_request(&self, built: crate::prompt::BuiltPrompt) -> EngineRequest {
        EngineRequest::new(built.user, self.options.model.clone())
            .with_system(built.system)
            .with_temperature(self.options.temperature)
            .with_max_tokens(self.options.max_tokens)
    }

    /// Reject empty replacements; everything else is trusted as-is.
    fn require_replacement(&self, content: &str, index: usize, total: usize) -> AppResult<()> {
        if content.trim().is_empty() {
            return Err(AppError::Engine(format!(
                "Engine returned an empty replacement for segment {}/{}",
                index, total
            )));
        }
        Ok(())
    }

    /// Advisory post-merge structural check: the engine contract is a trust
    /// boundary, so drift is logged, never fatal.
    fn check_line_drift(&self, segment: &Segment, replacement: &str, index: usize) {
        let replacement_lines = replacement.lines().count();
        if replacement_lines != segment.line_count() {
            tracing::warn!(
                "Segment {} line count drifted: {} in, {} out",
                index,
                segment.line_count(),
                replacement_lines
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::MockEngine;

    fn options(max_lines: usize) -> RewriteOptions {
        RewriteOptions {
            model: "mock-model".to_string(),
            chunk: ChunkConfig {
                max_lines,
                ..ChunkConfig::default()
            },
            ..RewriteOptions::default()
        }
    }

    fn python_fixture() -> String {
        // 250 lines with a 40-line nested block straddling line 100.
        let mut lines: Vec<String> = Vec::new();
        for i in 0..94 {
            lines.push(format!("top_{} = {}", i, i));
        }
        lines.push("def handler():".to_string());
        for i in 0..40 {
            lines.push(format!("    step_{}()", i));
        }
        while lines.len() < 250 {
            lines.push(format!("tail_{} = 0", lines.len()));
        }
        lines.join("\n")
    }

    #[tokio::test]
    async fn test_single_segment_uses_one_call() {
        let engine = Arc::new(MockEngine::identity());
        let orchestrator = RewriteOrchestrator::new(engine.clone(), options(100));
        let document = Document::parse("a = 1\nb = 2\n");

        let rewritten = orchestrator.rewrite(&document, "do nothing").await.unwrap();

        assert_eq!(engine.calls(), 1);
        assert_eq!(rewritten.render(), "a = 1\nb = 2\n");
    }

    #[tokio::test]
    async fn test_multi_segment_uses_one_call_per_segment() {
        let engine = Arc::new(MockEngine::identity());
        let orchestrator = RewriteOrchestrator::new(engine.clone(), options(100));
        let text = python_fixture();
        let document = Document::parse(&text);

        let expected_segments = chunk(&document, &options(100).chunk).len();
        assert!(expected_segments > 1);

        let rewritten = orchestrator.rewrite(&document, "do nothing").await.unwrap();

        assert_eq!(engine.calls(), expected_segments);
        assert_eq!(rewritten.render(), text);
    }

    #[tokio::test]
    async fn test_identity_engine_preserves_bytes_end_to_end() {
        let engine = Arc::new(MockEngine::identity());
        let orchestrator = RewriteOrchestrator::new(engine, options(100));
        let mut text = python_fixture();
        text.push('\n');
        let document = Document::parse(&text);

        let rewritten = orchestrator
            .rewrite(&document, "make no changes")
            .await
            .unwrap();

        assert_eq!(rewritten.render(), text);
    }

    #[tokio::test]
    async fn test_results_merge_in_document_order() {
        // The stamping mock completes later segments first; the merge must
        // still list replacements in original segment order.
        let engine = Arc::new(MockEngine::stamp_index());
        let orchestrator = RewriteOrchestrator::new(engine, options(10));
        let text = (0..35)
            .map(|i| format!("line_{} = {}", i, i))
            .collect::<Vec<_>>()
            .join("\n");
        let document = Document::parse(&text);

        let rewritten = orchestrator.rewrite(&document, "stamp").await.unwrap();

        assert_eq!(
            rewritten.render(),
            "segment-1\nsegment-2\nsegment-3\nsegment-4"
        );
    }

    #[tokio::test]
    async fn test_engine_failure_aborts_rewrite() {
        let engine = Arc::new(MockEngine::failing("rate limited"));
        let orchestrator = RewriteOrchestrator::new(engine.clone(), options(10));
        let text = python_fixture();
        let document = Document::parse(&text);

        let err = orchestrator.rewrite(&document, "anything").await.unwrap_err();
        assert!(matches!(err, AppError::Engine(_)));
    }

    #[tokio::test]
    async fn test_empty_replacement_rejected() {
        let engine = Arc::new(MockEngine::empty());
        let orchestrator = RewriteOrchestrator::new(engine, options(100));
        let document = Document::parse("a = 1\n");

        let err = orchestrator.rewrite(&document, "anything").await.unwrap_err();
        assert!(err.to_string().contains("empty replacement"));
    }

    #[tokio::test]
    async fn test_empty_document_single_call() {
        let engine = Arc::new(MockEngine::identity());
        let orchestrator = RewriteOrchestrator::new(engine.clone(), options(100));
        let document = Document::parse("");

        // An empty document yields one empty segment; the identity engine
        // echoes nothing, which the orchestrator rejects rather than
        // writing an empty file.
        let result = orchestrator.rewrite(&document, "anything").await;
        assert!(result.is_err());
        assert_eq!(engine.calls(), 1);
    }
}
