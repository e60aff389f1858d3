//! # Chat Prompts
//!
//! Prompt for follow-up questions about an explanation. The caller owns the
//! conversation history and passes it in full on every turn; nothing is
//! persisted between calls.

/// The system prompt for the chat responder.
pub const CHAT_SYSTEM_PROMPT: &str = r#"You are a patient, expert tutor answering follow-up questions about an explanation the user just read. Stay on the topic of the explanation and the user's learning goal. Answer concisely in Markdown, and prefer concrete examples over abstract restatements. If the question drifts far from the topic, gently steer back to it."#;

/// The user prompt for the chat responder.
/// Placeholders: `{original_query}`, `{concept}`, `{tree}`, `{explanation}`,
/// `{history}`, `{user_message}`
pub const CHAT_USER_PROMPT: &str = r#"# Learning goal
{original_query}

# Concept under discussion
{concept}

# Knowledge map
{tree}

# Explanation the user read
{explanation}

# Conversation so far
{history}

# New question
{user_message}"#;
