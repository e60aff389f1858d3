//! # Request Handlers
//!
//! All POST handlers are infallible: model failures surface as
//! sentinel content inside an HTTP 200 body, and every image-pipeline stage
//! degrades to "no images" rather than failing the request.

use crate::state::AppState;
use crate::types::{
    ChatRequest, ChatResponse, ConceptRequest, ExplainConceptRequest, ExplainConceptResponse,
};
use axum::{extract::State, Json};
use learnmap::article::{explain_concept, find_wiki_page};
use learnmap::chat::chat_about_explanation;
use learnmap::constants::{
    CHAT_TIMEOUT, EXPLANATION_TIMEOUT, SELECTION_TIMEOUT, TREE_GENERATION_TIMEOUT,
};
use learnmap::select::{select_images, Selected};
use learnmap::tree::{generate_knowledge_tree, KnowledgeNode};
use learnmap_wiki::{extract_images, ImageCandidate};
use tracing::{info, warn};

/// The root handler.
pub async fn root() -> &'static str {
    "learnmap server is running."
}

/// The health check handler.
pub async fn health_check() -> &'static str {
    "OK"
}

/// The handler for the `/api/knowledge-map` endpoint.
pub async fn knowledge_map_handler(
    State(state): State<AppState>,
    Json(payload): Json<ConceptRequest>,
) -> Json<KnowledgeNode> {
    info!("Received knowledge map request for '{}'", payload.concept);
    let tree = generate_knowledge_tree(
        state.ai_provider.as_ref(),
        &payload.concept,
        TREE_GENERATION_TIMEOUT,
    )
    .await;
    Json(tree)
}

/// The handler for the `/api/explain-concept` endpoint.
///
/// Gathers candidate images for the concept, then composes an explanation
/// with the relevant ones spliced in.
pub async fn explain_concept_handler(
    State(state): State<AppState>,
    Json(payload): Json<ExplainConceptRequest>,
) -> Json<ExplainConceptResponse> {
    info!(
        "Received explanation request for '{}'",
        payload.concept_name
    );
    let images = gather_images(&state, &payload.concept_name).await;
    let explanation = explain_concept(
        state.ai_provider.as_ref(),
        &payload.concept_name,
        &payload.original_query,
        &payload.knowledge_tree,
        &images,
        EXPLANATION_TIMEOUT,
    )
    .await;
    Json(ExplainConceptResponse { explanation })
}

/// The handler for the `/api/chat-about-explanation` endpoint.
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Json<ChatResponse> {
    info!(
        "Received chat message about '{}' ({} prior turns)",
        payload.concept_name,
        payload.chat_history.len()
    );
    let response = chat_about_explanation(
        state.ai_provider.as_ref(),
        &payload.concept_name,
        &payload.original_query,
        &payload.knowledge_tree,
        &payload.explanation,
        &payload.chat_history,
        &payload.user_message,
        CHAT_TIMEOUT,
    )
    .await;
    Json(ChatResponse { response })
}

/// Runs the image pipeline for a concept: page lookup, fetch, extraction,
/// relevance selection. Any stage that fails yields an empty list.
async fn gather_images(state: &AppState, concept: &str) -> Vec<Selected<ImageCandidate>> {
    let page = find_wiki_page(state.ai_provider.as_ref(), concept, SELECTION_TIMEOUT).await;

    let html = match state.wiki.fetch_page_html(&page).await {
        Ok(html) => html,
        Err(e) => {
            warn!("Could not fetch wiki page '{page}' for '{concept}': {e}");
            return Vec::new();
        }
    };

    // Markup parsing is CPU-bound and its DOM types are not Send, so it
    // runs to completion on a blocking thread.
    let base_url = state.wiki.base_url().to_string();
    let candidates = match tokio::task::spawn_blocking(move || extract_images(&html, &base_url))
        .await
    {
        Ok(candidates) => candidates,
        Err(e) => {
            warn!("Image extraction task failed for '{page}': {e}");
            return Vec::new();
        }
    };

    if candidates.is_empty() {
        info!("No content images found on '{page}'");
        return Vec::new();
    }

    select_images(
        state.ai_provider.as_ref(),
        concept,
        &candidates,
        state.config.max_images,
        SELECTION_TIMEOUT,
    )
    .await
}
