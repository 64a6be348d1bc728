//! Error types for the fund chatbot pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {

    // =============================
    // Startup Errors
    // =============================

    #[error("Schema error in {file}: missing required columns {missing:?}")]
    Schema { file: String, missing: Vec<String> },

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Configuration error: {0}")]
    Config(String),

    // =============================
    // Core Pipeline Errors
    // =============================

    #[error("Fund not found: {0}")]
    FundNotFound(String),

    #[error("No data: {0}")]
    NoData(String),

    #[error("Empty context: {0}")]
    EmptyContext(String),

    #[error("Validation error: {0}")]
    Validation(String),

    // =============================
    // Collaborator Errors
    // =============================

    #[error("Classifier error: {0}")]
    Classifier(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("LLM error: {0}")]
    Llm(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// Stable label for logs. Never sent to callers.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Schema { .. } => "schema",
            PipelineError::Dataset(_) => "dataset",
            PipelineError::Config(_) => "config",
            PipelineError::FundNotFound(_) => "fund_not_found",
            PipelineError::NoData(_) => "no_data",
            PipelineError::EmptyContext(_) => "empty_context",
            PipelineError::Validation(_) => "validation",
            PipelineError::Classifier(_) => "classifier",
            PipelineError::Render(_) => "render",
            PipelineError::Llm(_) => "llm",
            PipelineError::Csv(_) => "csv",
            PipelineError::Serialization(_) => "serialization",
            PipelineError::Http(_) => "http",
            PipelineError::Io(_) => "io",
        }
    }
}
