//! Ordered model fallback.
//!
//! Each candidate gets exactly one attempt. The first success wins and the
//! remaining candidates are never contacted. Failures are kept for the caller
//! and logged below `warn`, so nothing reaches the terminal by default.

use crate::inference::{ChatBackend, ProviderError, MAX_OUTPUT_TOKENS};

/// Outcome of one model attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt {
    Success(String),
    Failure(ProviderError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Answered { model: String, text: String },
    /// Every candidate failed; one entry per model, in order.
    Exhausted { failures: Vec<(String, ProviderError)> },
}

async fn attempt(backend: &dyn ChatBackend, model: &str, prompt: &str) -> Attempt {
    match backend.chat_completion(model, prompt, MAX_OUTPUT_TOKENS).await {
        Ok(text) => Attempt::Success(text),
        Err(e) => Attempt::Failure(e),
    }
}

/// Try `models` in order against `backend`.
pub async fn complete<S: AsRef<str>>(
    backend: &dyn ChatBackend,
    models: &[S],
    prompt: &str,
) -> Completion {
    let mut failures = Vec::new();

    for model in models.iter().map(AsRef::as_ref) {
        log::debug!("Requesting completion from {}", model);
        match attempt(backend, model, prompt).await {
            Attempt::Success(text) => {
                log::info!(
                    "Model {} answered ({} chars) after {} failed attempt(s)",
                    model,
                    text.len(),
                    failures.len()
                );
                return Completion::Answered {
                    model: model.to_string(),
                    text,
                };
            }
            Attempt::Failure(e) => {
                log::debug!("Model {} failed, trying next candidate: {}", model, e);
                failures.push((model.to_string(), e));
            }
        }
    }

    log::info!("All {} candidate models failed", failures.len());
    Completion::Exhausted { failures }
}
