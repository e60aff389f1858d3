pub mod gemini;
pub mod local;

use crate::errors::{GenerationFailure, PromptError};
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;
use std::time::Duration;
use tracing::warn;

/// A trait for interacting with an AI provider.
///
/// This defines the single seam between the knowledge-map pipeline and a
/// concrete language model (Gemini, a local OpenAI-compatible server, or a
/// test fake).
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    /// Generates a response from a given system and user prompt.
    async fn generate(&self, system_prompt: &str, user_prompt: &str)
        -> Result<String, PromptError>;
}

dyn_clone::clone_trait_object!(AiProvider);

/// Invokes a provider once under a hard wall-clock budget.
///
/// Exceeding the budget cancels the wait and reports `Timeout`; provider
/// errors are classified by message vocabulary. There are no retries: every
/// call site either uses the text or degrades to its own sentinel.
pub async fn generate_with_timeout(
    provider: &dyn AiProvider,
    system_prompt: &str,
    user_prompt: &str,
    budget: Duration,
) -> Result<String, GenerationFailure> {
    match tokio::time::timeout(budget, provider.generate(system_prompt, user_prompt)).await {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => {
            warn!("AI provider call failed: {e}");
            Err(GenerationFailure::classify(&e.to_string()))
        }
        Err(_) => {
            warn!("AI provider call exceeded its {budget:?} budget");
            Err(GenerationFailure::Timeout)
        }
    }
}
