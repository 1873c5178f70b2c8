//! Change-engine integration for the Redraft CLI.
//!
//! This crate drives the external instruction-following rewrite service:
//! - A provider-agnostic `ChangeEngine` trait with OpenAI and Ollama
//!   implementations (plus a deterministic mock)
//! - Prompt construction with segment-aware directives
//! - The rewrite orchestrator: one engine request per segment, results
//!   reassembled strictly in document order
//!
//! # Example
//! ```no_run
//! use redraft_chunk::Document;
//! use redraft_engine::{MockEngine, RewriteOptions, RewriteOrchestrator};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = Arc::new(MockEngine::identity());
//! let orchestrator = RewriteOrchestrator::new(engine, RewriteOptions::default());
//! let document = Document::parse("x = 1\n");
//! let rewritten = orchestrator.rewrite(&document, "rename x to y").await?;
//! println!("{}", rewritten.render());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod orchestrator;
pub mod prompt;
pub mod providers;

// Re-export main types
pub use client::{ChangeEngine, EngineRequest, EngineResponse, EngineUsage};
pub use factory::create_engine;
pub use orchestrator::{RewriteOptions, RewriteOrchestrator};
pub use providers::{MockEngine, OllamaEngine, OpenAiEngine};
