//! Answer renderers
//!
//! Turn a validated [`Context`] into prose. A renderer may only state what
//! the context holds; an EMPTY context always renders as the refusal.

use crate::error::PipelineError;
use crate::llm::LlmBackend;
use crate::models::{Context, DataSource};
use crate::pipeline::FALLBACK_ANSWER;
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

#[async_trait]
pub trait AnswerRenderer: Send + Sync {
    async fn render(&self, context: &Context) -> Result<String>;
}

const SYSTEM_PROMPT: &str = r#"You are a chatbot answering ONLY from the provided context.

Rules:
- Use ONLY the given context
- Do NOT add new facts
- Do NOT change or round any number
- If context_type is EMPTY, say:
  "Sorry can not find the answer""#;

/// Renderer backed by a language model
pub struct LlmAnswerRenderer {
    backend: Arc<dyn LlmBackend>,
}

impl LlmAnswerRenderer {
    pub fn new(backend: Arc<dyn LlmBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl AnswerRenderer for LlmAnswerRenderer {
    async fn render(&self, context: &Context) -> Result<String> {
        if let Context::Empty(_) = context {
            return Ok(FALLBACK_ANSWER.to_string());
        }

        let context_json = serde_json::to_string_pretty(context)
            .map_err(|e| PipelineError::Render(format!("Failed to encode context: {}", e)))?;
        let prompt = format!("Context:\n{}", context_json);

        let answer = self
            .backend
            .complete(SYSTEM_PROMPT, &prompt)
            .await
            .map_err(|e| PipelineError::Render(format!("Failed to format answer: {}", e)))?;

        debug!(backend = self.backend.name(), "Renderer reply received");

        if answer.trim().is_empty() {
            return Err(PipelineError::Render("Renderer returned no text".to_string()));
        }
        Ok(answer.trim().to_string())
    }
}

/// Deterministic renderer with one fixed sentence per context variant
pub struct TemplateRenderer;

#[async_trait]
impl AnswerRenderer for TemplateRenderer {
    async fn render(&self, context: &Context) -> Result<String> {
        Ok(render_template(context))
    }
}

pub fn render_template(context: &Context) -> String {
    match context {
        Context::Count(c) => {
            let noun = match c.data_source {
                DataSource::Holdings => "holdings",
                DataSource::Trades => "trades",
            };
            format!(
                "{} has {} {} (source: {}).",
                c.entity_name, c.result.count, noun, c.data_source
            )
        }
        Context::Aggregate(c) => format!(
            "The total {} for {} is {} (source: {}).",
            c.metric, c.entity_name, c.result.value, c.data_source
        ),
        Context::Compare(c) => format!(
            "{} is the best performing fund by {} with {} (source: {}).",
            c.result.best_entity, c.metric, c.result.best_value, c.data_source
        ),
        Context::Empty(_) => FALLBACK_ANSWER.to_string(),
    }
}
