//! Intent classifier
//!
//! The only place free-form user input is interpreted. Produces an
//! [`IntentDescriptor`] or fails; malformed model output is never coerced.

use crate::error::PipelineError;
use crate::llm::LlmBackend;
use crate::models::IntentDescriptor;
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

#[async_trait]
pub trait IntentClassifier: Send + Sync {
    async fn classify(&self, question: &str) -> Result<IntentDescriptor>;
}

const SYSTEM_PROMPT: &str = r#"You are an intent classification engine for a RAG system.

Rules:
- Output ONLY valid JSON
- Do NOT explain anything
- Do NOT guess missing information
- Use only these intent families: COUNT, AGGREGATE, COMPARE, UNSUPPORTED

JSON format:
{
  "intent": "...",
  "entity": "fund name or null",
  "metric": "PL_YTD | holdings_count | trades_count | null"
}"#;

/// Classifier backed by a language model
pub struct LlmIntentClassifier {
    backend: Arc<dyn LlmBackend>,
}

impl LlmIntentClassifier {
    pub fn new(backend: Arc<dyn LlmBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl IntentClassifier for LlmIntentClassifier {
    async fn classify(&self, question: &str) -> Result<IntentDescriptor> {
        let prompt = format!("User Question: {}", question);

        let reply = self
            .backend
            .complete(SYSTEM_PROMPT, &prompt)
            .await
            .map_err(|e| PipelineError::Classifier(format!("Failed to parse intent: {}", e)))?;

        debug!(backend = self.backend.name(), reply = %reply, "Classifier reply");

        parse_intent_reply(&reply)
    }
}

/// Accepts a bare JSON object, or one wrapped in a single ```json fence.
pub fn parse_intent_reply(reply: &str) -> Result<IntentDescriptor> {
    let body = strip_code_fence(reply.trim());

    serde_json::from_str::<IntentDescriptor>(body).map_err(|e| {
        warn!(error = %e, "Classifier returned malformed intent");
        PipelineError::Classifier(format!("Failed to parse intent: {}", e))
    })
}

fn strip_code_fence(text: &str) -> &str {
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"));

    match inner {
        Some(inner) => inner.trim(),
        None => text,
    }
}
