//! Change-engine provider implementations.

mod mock;
mod ollama;
mod openai;

pub use mock::{MockBehavior, MockEngine};
pub use ollama::OllamaEngine;
pub use openai::OpenAiEngine;
