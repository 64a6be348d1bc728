//! Language model backends
//!
//! The classifier and renderer only see [`LlmBackend`]; how the model is
//! served (local CLI, hosted API) is chosen at startup.

use crate::Result;
use async_trait::async_trait;

pub mod gemini;
pub mod ollama;

pub use gemini::GeminiClient;
pub use ollama::OllamaCli;

#[async_trait]
pub trait LlmBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Single completion. No retries.
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;
}
