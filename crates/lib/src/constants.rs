//! Shared timeouts, limits, and user-facing sentinel strings.

use std::time::Duration;

/// Hard wall-clock budget for knowledge tree generation, the longest path.
pub const TREE_GENERATION_TIMEOUT: Duration = Duration::from_secs(60);
/// Budget for explanation and article composition calls.
pub const EXPLANATION_TIMEOUT: Duration = Duration::from_secs(45);
/// Budget for a single batched image selection call.
pub const SELECTION_TIMEOUT: Duration = Duration::from_secs(30);
/// Budget for one chat reply, the shortest path.
pub const CHAT_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum number of image candidates enumerated in a selection prompt.
/// Anything past this is dropped before the prompt is built to keep the
/// request inside the model's token budget.
pub const MAX_SELECTION_CANDIDATES: usize = 20;
/// Default maximum number of images embedded in a generated article.
pub const DEFAULT_MAX_IMAGES: usize = 5;
/// Caption and section text truncation when building the selection prompt.
pub const PROMPT_SNIPPET_LEN: usize = 200;
/// Caption truncation when rendering a markdown image block.
pub const IMAGE_CAPTION_LEN: usize = 100;
/// Minimum caption length for the non-LLM fallback selection.
pub const FALLBACK_CAPTION_MIN_LEN: usize = 20;
/// Relevance score attached to fallback selections.
pub const FALLBACK_RELEVANCE_SCORE: f64 = 5.0;
/// Relevance score assumed when the model omits one.
pub const DEFAULT_RELEVANCE_SCORE: f64 = 8.0;

/// Self-learning time assumed when the model omits the field, in minutes.
pub const DEFAULT_SELF_LEARNING_TIME: f64 = 10.0;

/// Image-host substring used to scrub raw URLs the model leaked into prose.
pub const IMAGE_HOST_MARKER: &str = "upload.wikimedia.org";

// User-visible sentinels. The explanation and chat paths return these in
// place of content so the outer request always succeeds.
pub const TIMEOUT_SENTINEL: &str = "⚠️ The request timed out. Please try again.";
pub const QUOTA_SENTINEL: &str =
    "⚠️ The AI service quota has been exhausted. Please try again later.";
pub const RATE_LIMIT_SENTINEL: &str =
    "⚠️ The AI service is rate limiting requests. Please wait a moment and retry.";
pub const GENERATION_FAILED_SENTINEL: &str =
    "⚠️ Failed to generate a response. Please try again.";
