//! # learnmap
//!
//! Core library for building hierarchical knowledge maps with a language
//! model: tree generation and annotation, image relevance selection,
//! illustrated explanation composition, and follow-up chat.
//!
//! Everything that talks to a model goes through the [`providers::ai::AiProvider`]
//! seam, so the whole pipeline can be exercised against fakes.

pub mod article;
pub mod chat;
pub mod constants;
pub mod errors;
pub mod prompts;
pub mod providers;
pub mod select;
pub mod tree;

pub use errors::{GenerationFailure, PromptError};

/// Strips an optional markdown code fence from a model response.
///
/// Models frequently wrap structured output in ```` ```json ... ``` ````
/// despite being told not to. If both fence markers are present the inner
/// content is returned; otherwise the trimmed input passes through as-is.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}

/// Truncates a string to at most `max_chars` characters, respecting
/// character boundaries.
pub(crate) fn snippet(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
