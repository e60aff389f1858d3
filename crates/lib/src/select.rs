//! # Image Relevance Selection
//!
//! Given a concept and a list of image candidates, one batched model call
//! ranks the candidates and picks the most relevant subset. The selector
//! never fails: an unusable model response degrades to a caption-length
//! heuristic, and an empty candidate list yields an empty selection.

use crate::{
    constants::{
        DEFAULT_RELEVANCE_SCORE, FALLBACK_CAPTION_MIN_LEN, FALLBACK_RELEVANCE_SCORE,
        MAX_SELECTION_CANDIDATES, PROMPT_SNIPPET_LEN,
    },
    prompts::images::{IMAGE_SELECTION_SYSTEM_PROMPT, IMAGE_SELECTION_USER_PROMPT},
    providers::ai::{generate_with_timeout, AiProvider},
    snippet, strip_code_fence,
};
use serde::Deserialize;
use serde_json::json;
use std::fmt::Debug;
use std::time::Duration;
use tracing::{debug, info, warn};

/// A trait for items that can be ranked by the relevance selector.
///
/// This keeps the selection logic generic over where candidates came from,
/// as long as they can describe themselves to the model.
pub trait Selectable: Clone + Debug {
    /// The absolute URL of the underlying image.
    fn url(&self) -> &str;
    /// The caption text, possibly empty.
    fn caption(&self) -> &str;
    /// The text of the smallest document section enclosing the image.
    fn section_text(&self) -> &str;
}

/// A candidate the model (or the fallback heuristic) chose, with its
/// justification. Ordering reflects selection rank, not document order.
#[derive(Debug, Clone)]
pub struct Selected<T> {
    pub item: T,
    pub reason: String,
    pub relevance_score: f64,
}

#[derive(Deserialize)]
struct SelectionResponse {
    #[serde(default)]
    selected_images: Vec<SelectionEntry>,
}

#[derive(Deserialize)]
struct SelectionEntry {
    // Kept signed so one negative index drops that entry, not the whole
    // response.
    index: i64,
    #[serde(default)]
    relevance_score: Option<f64>,
    #[serde(default)]
    reason: Option<String>,
}

/// Selects the most relevant candidates for `concept` in a single model call.
///
/// Candidates beyond the first [`MAX_SELECTION_CANDIDATES`] are not offered
/// to the model at all. Indices the model returns that fall outside the
/// offered range are dropped, not errored. The result never exceeds
/// `max_images`.
pub async fn select_images<T: Selectable>(
    ai_provider: &dyn AiProvider,
    concept: &str,
    candidates: &[T],
    max_images: usize,
    budget: Duration,
) -> Vec<Selected<T>> {
    if candidates.is_empty() || max_images == 0 {
        return Vec::new();
    }
    let pool = &candidates[..candidates.len().min(MAX_SELECTION_CANDIDATES)];
    info!(
        "Ranking {} image candidates for '{concept}' in one batch call",
        pool.len()
    );

    let candidates_context = candidates_context(pool);
    let user_prompt = IMAGE_SELECTION_USER_PROMPT
        .replace("{concept}", concept)
        .replace("{max_images}", &max_images.to_string())
        .replace("{candidates_context}", &candidates_context);

    debug!(user_prompt = %user_prompt, "--> Sending image selection prompt");

    let response =
        match generate_with_timeout(ai_provider, IMAGE_SELECTION_SYSTEM_PROMPT, &user_prompt, budget)
            .await
        {
            Ok(text) => text,
            Err(failure) => {
                warn!("Image selection call failed ({failure:?}), using caption heuristic");
                return fallback_selection(pool, max_images);
            }
        };

    match parse_selection(&response, pool, max_images) {
        Ok(selected) => {
            info!("Model selected {} of {} candidates", selected.len(), pool.len());
            selected
        }
        Err(e) => {
            warn!("Unusable image selection response ({e}), using caption heuristic");
            fallback_selection(pool, max_images)
        }
    }
}

/// Enumerates the candidate pool as a JSON array for the prompt, truncating
/// captions and section text to keep the request small.
fn candidates_context<T: Selectable>(pool: &[T]) -> String {
    let entries: Vec<_> = pool
        .iter()
        .enumerate()
        .map(|(index, candidate)| {
            let caption = candidate.caption();
            let section = candidate.section_text();
            json!({
                "index": index,
                "caption": if caption.is_empty() {
                    "No caption".to_string()
                } else {
                    snippet(caption, PROMPT_SNIPPET_LEN)
                },
                "section_text": if section.is_empty() {
                    "No context".to_string()
                } else {
                    snippet(section, PROMPT_SNIPPET_LEN)
                },
            })
        })
        .collect();
    serde_json::to_string_pretty(&entries).unwrap_or_else(|_| "[]".to_string())
}

fn parse_selection<T: Selectable>(
    response: &str,
    pool: &[T],
    max_images: usize,
) -> Result<Vec<Selected<T>>, serde_json::Error> {
    let parsed: SelectionResponse = serde_json::from_str(strip_code_fence(response))?;
    let selected = parsed
        .selected_images
        .into_iter()
        .filter_map(|entry| {
            let index = usize::try_from(entry.index).ok()?;
            let candidate = pool.get(index)?;
            let reason = entry
                .reason
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| candidate.caption().to_string());
            Some(Selected {
                item: candidate.clone(),
                reason,
                relevance_score: entry.relevance_score.unwrap_or(DEFAULT_RELEVANCE_SCORE),
            })
        })
        .take(max_images)
        .collect();
    Ok(selected)
}

/// Deterministic fallback: candidates with a substantial caption, in
/// document order, capped at `max_images`.
fn fallback_selection<T: Selectable>(pool: &[T], max_images: usize) -> Vec<Selected<T>> {
    pool.iter()
        .filter(|candidate| candidate.caption().len() > FALLBACK_CAPTION_MIN_LEN)
        .take(max_images)
        .map(|candidate| Selected {
            item: candidate.clone(),
            reason: candidate.caption().to_string(),
            relevance_score: FALLBACK_RELEVANCE_SCORE,
        })
        .collect()
}
