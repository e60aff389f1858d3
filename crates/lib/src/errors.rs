use crate::constants::{
    GENERATION_FAILED_SENTINEL, QUOTA_SENTINEL, RATE_LIMIT_SENTINEL, TIMEOUT_SENTINEL,
};
use thiserror::Error;

/// Custom error types for the application.
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to AI provider: {0}")]
    AiRequest(reqwest::Error),
    #[error("Failed to deserialize AI provider response: {0}")]
    AiDeserialization(reqwest::Error),
    #[error("AI provider returned an error: {0}")]
    AiApi(String),
    #[error("API key is missing")]
    MissingApiKey,
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

/// Classified outcome of a failed model call.
///
/// The upstream capability reports most failures as free text, so the
/// quota/rate-limit split is a best-effort substring match against a fixed
/// vocabulary. `Other` is the open catch-all for anything the vocabulary
/// does not cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationFailure {
    Timeout,
    QuotaExceeded,
    RateLimited,
    Other(String),
}

impl GenerationFailure {
    /// Classifies a provider failure message by vocabulary, case-insensitively.
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("quota")
            || lower.contains("resource exhausted")
            || lower.contains("resource-exhausted")
            || lower.contains("resource_exhausted")
        {
            GenerationFailure::QuotaExceeded
        } else if lower.contains("429")
            || lower.contains("rate limit")
            || lower.contains("rate-limit")
            || lower.contains("rate_limit")
            || lower.contains("too many requests")
        {
            GenerationFailure::RateLimited
        } else {
            GenerationFailure::Other(message.to_string())
        }
    }

    /// The user-facing sentinel string for this failure kind.
    pub fn sentinel(&self) -> &'static str {
        match self {
            GenerationFailure::Timeout => TIMEOUT_SENTINEL,
            GenerationFailure::QuotaExceeded => QUOTA_SENTINEL,
            GenerationFailure::RateLimited => RATE_LIMIT_SENTINEL,
            GenerationFailure::Other(_) => GENERATION_FAILED_SENTINEL,
        }
    }

    /// The short machine-readable tag recorded on sentinel tree nodes.
    pub fn tag(&self) -> &'static str {
        match self {
            GenerationFailure::Timeout => "timeout",
            GenerationFailure::QuotaExceeded => "quota_exceeded",
            GenerationFailure::RateLimited => "rate_limit",
            GenerationFailure::Other(_) => "generation_failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::GenerationFailure;

    #[test]
    fn classifies_quota_messages() {
        assert_eq!(
            GenerationFailure::classify("Quota exceeded for project"),
            GenerationFailure::QuotaExceeded
        );
        assert_eq!(
            GenerationFailure::classify("RESOURCE_EXHAUSTED: out of tokens"),
            GenerationFailure::QuotaExceeded
        );
    }

    #[test]
    fn classifies_rate_limit_messages() {
        assert_eq!(
            GenerationFailure::classify("HTTP 429 from upstream"),
            GenerationFailure::RateLimited
        );
        assert_eq!(
            GenerationFailure::classify("Too Many Requests"),
            GenerationFailure::RateLimited
        );
        assert_eq!(
            GenerationFailure::classify("rate limit hit, slow down"),
            GenerationFailure::RateLimited
        );
    }

    #[test]
    fn everything_else_is_other() {
        let failure = GenerationFailure::classify("connection reset by peer");
        assert_eq!(
            failure,
            GenerationFailure::Other("connection reset by peer".to_string())
        );
        assert_eq!(failure.tag(), "generation_failed");
    }
}
