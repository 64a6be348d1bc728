//! Startup wiring shared by the binaries
//!
//! Errors here are fatal: a dataset that fails its schema check must never
//! be served.

use crate::classifier::LlmIntentClassifier;
use crate::config::{Config, LlmBackendKind, RendererKind};
use crate::dataset::Dataset;
use crate::llm::{GeminiClient, LlmBackend, OllamaCli};
use crate::pipeline::Pipeline;
use crate::renderer::{AnswerRenderer, LlmAnswerRenderer, TemplateRenderer};
use crate::retrieval::RetrievalEngine;
use crate::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// `RUST_LOG` wins; otherwise `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

pub fn build_backend(config: &Config) -> Result<Arc<dyn LlmBackend>> {
    let backend: Arc<dyn LlmBackend> = match config.llm_backend {
        LlmBackendKind::Ollama => Arc::new(OllamaCli::new(
            config.ollama_bin.clone(),
            config.ollama_model.clone(),
        )),
        LlmBackendKind::Gemini => Arc::new(GeminiClient::new(
            config.gemini_api_key.clone().unwrap_or_default(),
            &config.gemini_model,
        )?),
    };
    Ok(backend)
}

/// Load the dataset and wire classifier, retrieval and renderer.
pub fn build_pipeline(config: &Config) -> Result<Pipeline> {
    let dataset = Arc::new(Dataset::load(&config.data_dir)?);
    let backend = build_backend(config)?;

    let renderer: Box<dyn AnswerRenderer> = match config.renderer {
        RendererKind::Llm => Box::new(LlmAnswerRenderer::new(backend.clone())),
        RendererKind::Template => Box::new(TemplateRenderer),
    };

    info!(
        backend = backend.name(),
        renderer = ?config.renderer,
        timeout_secs = config.llm_timeout.as_secs(),
        "Pipeline initialized"
    );

    Ok(Pipeline::new(
        RetrievalEngine::new(dataset),
        Box::new(LlmIntentClassifier::new(backend)),
        renderer,
    )
    .with_llm_timeout(config.llm_timeout))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn schema_violation_aborts_startup() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("holdings.csv"), "PortfolioName,SecName\nAlpha Fund,AAPL\n").unwrap();
        fs::write(dir.path().join("trades.csv"), "PortfolioName,TradeTypeName\nAlpha Fund,Buy\n").unwrap();

        let config = Config {
            data_dir: dir.path().to_path_buf(),
            ..Config::default()
        };

        let err = build_pipeline(&config).err().unwrap();
        assert_eq!(err.kind(), "schema");
    }

    #[test]
    fn valid_dataset_builds_pipeline() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("holdings.csv"),
            "PortfolioName,SecName,Qty,PL_DTD,PL_MTD,PL_QTD,PL_YTD\nAlpha Fund,AAPL,1,0,0,0,5\n",
        )
        .unwrap();
        fs::write(dir.path().join("trades.csv"), "PortfolioName,TradeTypeName\nAlpha Fund,Buy\n").unwrap();

        let config = Config {
            data_dir: dir.path().to_path_buf(),
            renderer: RendererKind::Template,
            ..Config::default()
        };

        let pipeline = build_pipeline(&config).unwrap();
        assert_eq!(pipeline.retrieval().dataset().holdings().len(), 1);
    }
}
