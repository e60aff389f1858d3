//! # Chat Responder Tests

use learnmap::chat::{chat_about_explanation, ChatRole, ChatTurn};
use learnmap::constants::{GENERATION_FAILED_SENTINEL, TIMEOUT_SENTINEL};
use learnmap::tree::{annotate, fallback_tree};
use learnmap_test_utils::{DelayedAiProvider, FailingAiProvider, MockAiProvider};
use std::time::Duration;

const BUDGET: Duration = Duration::from_secs(5);

fn history() -> Vec<ChatTurn> {
    vec![
        ChatTurn {
            role: ChatRole::User,
            content: "What is a basis?".to_string(),
        },
        ChatTurn {
            role: ChatRole::Assistant,
            content: "A minimal spanning set.".to_string(),
        },
    ]
}

#[tokio::test]
async fn embeds_full_context_and_history_in_one_prompt() {
    let provider = MockAiProvider::new(vec!["It means linear independence.".to_string()]);
    let mut tree = fallback_tree("Linear algebra");
    annotate(&mut tree);
    let history = history();

    let reply = chat_about_explanation(
        &provider,
        "Vector spaces",
        "learn linear algebra",
        &tree,
        "The explanation text.",
        &history,
        "Why minimal?",
        BUDGET,
    )
    .await;

    assert_eq!(reply, "It means linear independence.");
    let calls = provider.calls();
    assert_eq!(calls.len(), 1);
    let user_prompt = &calls[0].1;
    assert!(user_prompt.contains("learn linear algebra"));
    assert!(user_prompt.contains("Vector spaces"));
    assert!(user_prompt.contains("The explanation text."));
    assert!(user_prompt.contains("User: What is a basis?"));
    assert!(user_prompt.contains("Assistant: A minimal spanning set."));
    assert!(user_prompt.contains("Why minimal?"));
    // The caller's history is untouched.
    assert_eq!(history.len(), 2);
}

#[tokio::test]
async fn timeout_yields_sentinel_reply() {
    let provider = DelayedAiProvider {
        delay: Duration::from_secs(2),
        response: "too late".to_string(),
    };
    let mut tree = fallback_tree("Linear algebra");
    annotate(&mut tree);

    let reply = chat_about_explanation(
        &provider,
        "Vector spaces",
        "goal",
        &tree,
        "explanation",
        &[],
        "question",
        Duration::from_millis(50),
    )
    .await;

    assert_eq!(reply, TIMEOUT_SENTINEL);
}

#[tokio::test]
async fn provider_failure_yields_generic_sentinel() {
    let provider = FailingAiProvider::new("socket closed unexpectedly");
    let mut tree = fallback_tree("Linear algebra");
    annotate(&mut tree);

    let reply = chat_about_explanation(
        &provider,
        "Vector spaces",
        "goal",
        &tree,
        "explanation",
        &[],
        "question",
        BUDGET,
    )
    .await;

    assert_eq!(reply, GENERATION_FAILED_SENTINEL);
}
