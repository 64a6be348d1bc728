//! Local model served through the `ollama` CLI
//!
//! Runs `<bin> run <model>` with the prompt on stdin and returns stdout.

use super::LlmBackend;
use crate::error::PipelineError;
use crate::Result;
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, error};

pub struct OllamaCli {
    binary: String,
    model: String,
}

impl OllamaCli {
    pub fn new(binary: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl LlmBackend for OllamaCli {
    fn name(&self) -> &'static str {
        "ollama"
    }

    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let prompt = format!("{}\n{}", system_prompt, user_prompt);

        debug!(binary = %self.binary, model = %self.model, "Invoking model CLI");

        // killed if the caller's timeout drops this future
        let mut child = Command::new(&self.binary)
            .arg("run")
            .arg(&self.model)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| PipelineError::Llm(format!("Failed to spawn {}: {}", self.binary, e)))?;

        // a child that dies early closes stdin; its exit status and stderr
        // explain why, so the write error alone is not reported
        let write_result = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(prompt.as_bytes()).await,
            None => Ok(()),
        };

        let output = child.wait_with_output().await?;

        if let Err(e) = write_result {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!(stderr = %stderr, status = %output.status, error = %e, "Model CLI closed stdin");
            return Err(PipelineError::Llm(format!(
                "{} did not accept the prompt ({}): {}",
                self.binary, output.status, e
            )));
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!(stderr = %stderr, status = %output.status, "Model CLI failed");
            return Err(PipelineError::Llm(format!(
                "{} exited with {}",
                self.binary, output.status
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_binary_is_an_llm_error() {
        let backend = OllamaCli::new("definitely-not-an-installed-model-cli", "llama3");
        let err = backend.complete("system", "question").await.unwrap_err();
        assert_eq!(err.kind(), "llm");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn early_exit_is_an_llm_error() {
        // `false` ignores its arguments and exits 1 without reading stdin
        let backend = OllamaCli::new("false", "llama3");
        let err = backend.complete("system", &"x".repeat(1 << 20)).await.unwrap_err();
        assert_eq!(err.kind(), "llm");
    }
}
