//! Fund RAG Chatbot
//!
//! Answers questions about fund holdings and trades from CSV data only:
//! - A language model classifies the question into a fixed intent
//! - Deterministic retrieval computes the answer (LLM excluded)
//! - The result is packed into a typed context contract
//! - A renderer turns that context, and nothing else, into prose
//! - Any failure returns one fixed refusal
//!
//! PIPELINE:
//! CLASSIFY → VALIDATE INTENT → RETRIEVE → BUILD CONTEXT → VALIDATE CONTEXT → RENDER

pub mod api;
pub mod audit;
pub mod bootstrap;
pub mod classifier;
pub mod config;
pub mod context;
pub mod dataset;
pub mod error;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod renderer;
pub mod retrieval;
pub mod validator;

pub use error::{PipelineError, Result};

// Re-export common types
pub use models::*;
pub use pipeline::{Pipeline, PipelineOutcome, FALLBACK_ANSWER};
