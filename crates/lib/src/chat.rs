//! # Chat Responder
//!
//! Answers follow-up questions about an explanation. Stateless:
//! the caller supplies the full turn history on every call and is
//! responsible for appending the new turn and the reply to its own copy.

use crate::{
    prompts::chat::{CHAT_SYSTEM_PROMPT, CHAT_USER_PROMPT},
    providers::ai::{generate_with_timeout, AiProvider},
    tree::{serialize_tree, KnowledgeNode},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Who spoke a turn. Lowercase on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    fn label(self) -> &'static str {
        match self {
            ChatRole::User => "User",
            ChatRole::Assistant => "Assistant",
        }
    }
}

/// One turn of a conversation, caller-persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

/// Produces one reply to `user_message` in the context of an explanation.
///
/// The history is rendered as alternating labeled lines inside a single
/// prompt. Failures map to the shared sentinel strings; the history is
/// never mutated or returned.
pub async fn chat_about_explanation(
    ai_provider: &dyn AiProvider,
    concept: &str,
    original_query: &str,
    tree: &KnowledgeNode,
    explanation: &str,
    history: &[ChatTurn],
    user_message: &str,
    budget: Duration,
) -> String {
    let user_prompt = CHAT_USER_PROMPT
        .replace("{original_query}", original_query)
        .replace("{concept}", concept)
        .replace("{tree}", &serialize_tree(tree))
        .replace("{explanation}", explanation)
        .replace("{history}", &render_history(history))
        .replace("{user_message}", user_message);

    debug!(user_prompt = %user_prompt, "--> Sending chat prompt");

    match generate_with_timeout(ai_provider, CHAT_SYSTEM_PROMPT, &user_prompt, budget).await {
        Ok(text) => text.trim().to_string(),
        Err(failure) => failure.sentinel().to_string(),
    }
}

fn render_history(history: &[ChatTurn]) -> String {
    if history.is_empty() {
        return "(no previous turns)".to_string();
    }
    history
        .iter()
        .map(|turn| format!("{}: {}", turn.role.label(), turn.content))
        .collect::<Vec<_>>()
        .join("\n")
}
