//! # Test Utilities
//!
//! Provider fakes for exercising the model-calling paths without a network:
//! a scriptable mock, a slow provider for timeout behavior, and a failing
//! provider for error classification.

use async_trait::async_trait;
use learnmap::errors::PromptError;
use learnmap::providers::ai::AiProvider;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A mock AI provider that replays a scripted sequence of responses and
/// records every prompt it was called with.
#[derive(Clone, Debug)]
pub struct MockAiProvider {
    pub call_history: Arc<Mutex<Vec<(String, String)>>>,
    responses: Arc<Mutex<Vec<String>>>,
}

impl MockAiProvider {
    /// Creates a provider that returns `responses` in order, then errors
    /// once the script is exhausted.
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            call_history: Arc::new(Mutex::new(Vec::new())),
            responses: Arc::new(Mutex::new(responses.into_iter().rev().collect())),
        }
    }

    /// The `(system_prompt, user_prompt)` pairs recorded so far.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.call_history.lock().unwrap().clone()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, PromptError> {
        self.call_history
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), user_prompt.to_string()));
        self.responses
            .lock()
            .unwrap()
            .pop()
            .ok_or_else(|| PromptError::AiApi("mock response script exhausted".to_string()))
    }
}

/// A provider that sleeps before responding, for driving the hard-timeout
/// paths with small budgets.
#[derive(Clone, Debug)]
pub struct DelayedAiProvider {
    pub delay: Duration,
    pub response: String,
}

#[async_trait]
impl AiProvider for DelayedAiProvider {
    async fn generate(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
    ) -> Result<String, PromptError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.response.clone())
    }
}

/// A provider that always fails with a fixed API error message, for driving
/// the failure-classification paths.
#[derive(Clone, Debug)]
pub struct FailingAiProvider {
    pub message: String,
}

impl FailingAiProvider {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl AiProvider for FailingAiProvider {
    async fn generate(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
    ) -> Result<String, PromptError> {
        Err(PromptError::AiApi(self.message.clone()))
    }
}
