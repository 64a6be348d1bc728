//! Question pipeline - implements the fail-closed loop
//!
//! RECEIVED → INTENT_PARSED → INTENT_VALIDATED → RETRIEVED → CONTEXT_BUILT
//! → CONTEXT_VALIDATED → RENDERED, or FAILED from any stage.
//!
//! Every failure yields [`FALLBACK_ANSWER`]; the error kind is only logged.

use crate::audit::compute_context_hash;
use crate::classifier::IntentClassifier;
use crate::context::{ContextBuilder, UNSUPPORTED_QUERY_REASON};
use crate::error::PipelineError;
use crate::models::{Intent, IntentDescriptor, Metric};
use crate::renderer::AnswerRenderer;
use crate::retrieval::{Query, RetrievalEngine};
use crate::validator::Validator;
use crate::Result;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

pub const FALLBACK_ANSWER: &str = "Sorry can not find the answer";

pub const DEFAULT_LLM_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Received,
    IntentParsed,
    IntentValidated,
    Retrieved,
    ContextBuilt,
    ContextValidated,
    Rendered,
    Failed,
}

/// What one question went through. Only `answer` is ever shown to users.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub request_id: Uuid,
    pub answer: String,
    pub stages: Vec<PipelineStage>,
    pub failure: Option<&'static str>,
    pub context_hash: Option<String>,
}

impl PipelineOutcome {
    pub fn succeeded(&self) -> bool {
        self.failure.is_none()
    }
}

/// Dispatch table over (intent, metric, entity).
///
/// `None` means the combination is unsupported or incomplete.
pub fn dispatch(descriptor: &IntentDescriptor) -> Option<Query> {
    let entity = descriptor.entity.as_deref();

    match (descriptor.intent, descriptor.metric, entity) {
        (Intent::Count, Some(Metric::HoldingsCount), Some(fund)) => Some(Query::CountHoldings {
            fund: fund.to_string(),
        }),
        (Intent::Count, Some(Metric::TradesCount), Some(fund)) => Some(Query::CountTrades {
            fund: fund.to_string(),
        }),
        (Intent::Aggregate, Some(Metric::PlYtd), Some(fund)) => Some(Query::AggregatePlYtd {
            fund: fund.to_string(),
        }),
        (Intent::Compare, Some(Metric::PlYtd), _) => Some(Query::BestPerformingFundYtd),
        _ => None,
    }
}

pub struct Pipeline {
    retrieval: RetrievalEngine,
    classifier: Box<dyn IntentClassifier>,
    renderer: Box<dyn AnswerRenderer>,
    llm_timeout: Duration,
}

impl Pipeline {
    pub fn new(
        retrieval: RetrievalEngine,
        classifier: Box<dyn IntentClassifier>,
        renderer: Box<dyn AnswerRenderer>,
    ) -> Self {
        Self {
            retrieval,
            classifier,
            renderer,
            llm_timeout: DEFAULT_LLM_TIMEOUT,
        }
    }

    /// Bound for each classifier and renderer call.
    pub fn with_llm_timeout(mut self, timeout: Duration) -> Self {
        self.llm_timeout = timeout;
        self
    }

    pub fn retrieval(&self) -> &RetrievalEngine {
        &self.retrieval
    }

    pub async fn answer(&self, question: &str) -> String {
        self.run(question).await.answer
    }

    /// Run one question end to end. Never fails.
    pub async fn run(&self, question: &str) -> PipelineOutcome {
        let start_time = Instant::now();
        let request_id = Uuid::new_v4();
        let mut stages = vec![PipelineStage::Received];
        let mut context_hash = None;

        info!(%request_id, question = %question, "Pipeline: question received");

        let result = self
            .execute(request_id, question, &mut stages, &mut context_hash)
            .await;

        let elapsed_ms = start_time.elapsed().as_millis() as u64;

        match result {
            Ok(answer) => {
                stages.push(PipelineStage::Rendered);
                info!(%request_id, elapsed_ms, "Pipeline: answer rendered");

                PipelineOutcome {
                    request_id,
                    answer,
                    stages,
                    failure: None,
                    context_hash,
                }
            }
            Err(e) => {
                let last_stage = stages.last().copied();
                stages.push(PipelineStage::Failed);
                warn!(
                    %request_id,
                    kind = e.kind(),
                    error = %e,
                    after = ?last_stage,
                    elapsed_ms,
                    "Pipeline: failed closed"
                );

                PipelineOutcome {
                    request_id,
                    answer: FALLBACK_ANSWER.to_string(),
                    stages,
                    failure: Some(e.kind()),
                    context_hash,
                }
            }
        }
    }

    async fn execute(
        &self,
        request_id: Uuid,
        question: &str,
        stages: &mut Vec<PipelineStage>,
        context_hash: &mut Option<String>,
    ) -> Result<String> {
        // === CLASSIFY ===
        let descriptor = self
            .bounded(self.classifier.classify(question), PipelineError::Classifier)
            .await?;
        stages.push(PipelineStage::IntentParsed);
        debug!(%request_id, ?descriptor, "Intent parsed");

        Validator::validate_intent(&descriptor)?;
        stages.push(PipelineStage::IntentValidated);

        // === RETRIEVE + BUILD ===
        let context = match dispatch(&descriptor) {
            Some(query) => {
                let result = self.retrieval.execute(&query)?;
                stages.push(PipelineStage::Retrieved);
                debug!(%request_id, ?result, "Retrieved");

                ContextBuilder::from_retrieval(&query, result)?
            }
            None => {
                debug!(%request_id, ?descriptor, "No dispatch entry for intent");
                ContextBuilder::build_empty_context(Some(UNSUPPORTED_QUERY_REASON))
            }
        };
        stages.push(PipelineStage::ContextBuilt);

        // === VERIFY ===
        Validator::validate_context(&context)?;
        stages.push(PipelineStage::ContextValidated);

        let hash = compute_context_hash(&context);
        info!(
            %request_id,
            context_type = ?context.context_type(),
            context_hash = %hash,
            "Context validated"
        );
        *context_hash = Some(hash);

        // === RENDER ===
        self.bounded(self.renderer.render(&context), PipelineError::Render)
            .await
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T>>,
        on_timeout: fn(String) -> PipelineError,
    ) -> Result<T> {
        match tokio::time::timeout(self.llm_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(on_timeout(format!(
                "timed out after {} ms",
                self.llm_timeout.as_millis()
            ))),
        }
    }
}

//
// ================= Tests =================
//
