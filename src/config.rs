//! Runtime configuration from environment variables
//!
//! Call `dotenv::dotenv()` first so a local `.env` is honoured.

use crate::error::PipelineError;
use crate::Result;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmBackendKind {
    Ollama,
    Gemini,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererKind {
    Llm,
    Template,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub host: String,
    pub port: u16,
    pub llm_backend: LlmBackendKind,
    pub ollama_bin: String,
    pub ollama_model: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub renderer: RendererKind,
    pub llm_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            host: "0.0.0.0".to_string(),
            port: 8000,
            llm_backend: LlmBackendKind::Ollama,
            ollama_bin: "ollama".to_string(),
            ollama_model: "llama3".to_string(),
            gemini_api_key: None,
            gemini_model: "gemini-2.0-flash".to_string(),
            renderer: RendererKind::Llm,
            llm_timeout: Duration::from_secs(60),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PORT").or_else(|| get("API_PORT")) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| PipelineError::Config(format!("Invalid PORT: {}", raw)))?,
            None => defaults.port,
        };

        let llm_backend = match get("LLM_BACKEND").map(|v| v.trim().to_lowercase()) {
            None => defaults.llm_backend,
            Some(v) if v == "ollama" => LlmBackendKind::Ollama,
            Some(v) if v == "gemini" => LlmBackendKind::Gemini,
            Some(other) => {
                return Err(PipelineError::Config(format!(
                    "Unknown LLM_BACKEND: {} (expected ollama or gemini)",
                    other
                )))
            }
        };

        let renderer = match get("RENDERER").map(|v| v.trim().to_lowercase()) {
            None => defaults.renderer,
            Some(v) if v == "llm" => RendererKind::Llm,
            Some(v) if v == "template" => RendererKind::Template,
            Some(other) => {
                return Err(PipelineError::Config(format!(
                    "Unknown RENDERER: {} (expected llm or template)",
                    other
                )))
            }
        };

        let llm_timeout = match get("LLM_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(PipelineError::Config(format!(
                        "Invalid LLM_TIMEOUT_SECS: {}",
                        raw
                    )))
                }
            },
            None => defaults.llm_timeout,
        };

        let gemini_api_key = get("GEMINI_API_KEY");
        if llm_backend == LlmBackendKind::Gemini && gemini_api_key.is_none() {
            return Err(PipelineError::Config(
                "GEMINI_API_KEY is required when LLM_BACKEND=gemini".to_string(),
            ));
        }

        Ok(Self {
            data_dir: get("DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            host: get("HOST").unwrap_or(defaults.host),
            port,
            llm_backend,
            ollama_bin: get("OLLAMA_BIN").unwrap_or(defaults.ollama_bin),
            ollama_model: get("OLLAMA_MODEL").unwrap_or(defaults.ollama_model),
            gemini_api_key,
            gemini_model: get("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            renderer,
            llm_timeout,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
