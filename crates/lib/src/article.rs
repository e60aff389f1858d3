//! # Explanation and Article Composition
//!
//! Builds the prompts that turn a concept (plus its knowledge-map context
//! and any selected images) into prose, then post-processes the model's
//! output. Image references follow a two-pass protocol: the model emits
//! abstract `[IMG:n]` tokens, and a literal substitution pass splices in the
//! real markdown image blocks afterwards, since the generative step cannot
//! be trusted to emit exact markup.

use crate::{
    constants::{IMAGE_CAPTION_LEN, IMAGE_HOST_MARKER, PROMPT_SNIPPET_LEN},
    prompts::images::{
        ARTICLE_SYSTEM_PROMPT, ARTICLE_USER_PROMPT, EXPLANATION_IMAGES_SECTION,
        EXPLANATION_SYSTEM_PROMPT, EXPLANATION_USER_PROMPT, IMAGE_TOKEN_PROTOCOL,
        PAGE_LOOKUP_SYSTEM_PROMPT, PAGE_LOOKUP_USER_PROMPT,
    },
    providers::ai::{generate_with_timeout, AiProvider},
    select::{Selectable, Selected},
    snippet,
    tree::{serialize_tree, KnowledgeNode},
};
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, info, warn};

static EXCESS_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid newline regex"));
static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("valid filename regex"));

/// Resolves a term to the most relevant Wikipedia page title via the model.
///
/// Falls back to the term itself with underscored spaces when the call
/// fails; the fetch path downstream treats a missing page as "no images",
/// so a bad guess degrades instead of erroring.
pub async fn find_wiki_page(ai_provider: &dyn AiProvider, term: &str, budget: Duration) -> String {
    let user_prompt = PAGE_LOOKUP_USER_PROMPT.replace("{term}", term);
    match generate_with_timeout(ai_provider, PAGE_LOOKUP_SYSTEM_PROMPT, &user_prompt, budget).await
    {
        Ok(response) => {
            let cleaned = response.trim().replace(['`', '"', '\''], "");
            let title = cleaned
                .rsplit("wiki/")
                .next()
                .unwrap_or(&cleaned)
                .trim()
                .to_string();
            if title.is_empty() {
                term.replace(' ', "_")
            } else {
                info!("Resolved '{term}' to wiki page '{title}'");
                title
            }
        }
        Err(failure) => {
            warn!("Page lookup for '{term}' failed ({failure:?}), guessing from the term");
            term.replace(' ', "_")
        }
    }
}

/// Composes a standalone illustrated article about `term`.
///
/// On model failure the result is still a well-formed document: a title
/// heading followed by the sentinel line for the failure kind.
pub async fn compose_article<T: Selectable>(
    ai_provider: &dyn AiProvider,
    term: &str,
    images: &[Selected<T>],
    budget: Duration,
) -> String {
    let user_prompt = ARTICLE_USER_PROMPT
        .replace("{term}", term)
        .replace("{image_context}", &image_context(images))
        .replace("{token_protocol}", IMAGE_TOKEN_PROTOCOL);

    debug!(user_prompt = %user_prompt, "--> Sending article prompt");

    match generate_with_timeout(ai_provider, ARTICLE_SYSTEM_PROMPT, &user_prompt, budget).await {
        Ok(text) => splice_images(&text, images),
        Err(failure) => format!("# {term}\n\n{}", failure.sentinel()),
    }
}

/// Composes an explanation of one concept from a knowledge map.
///
/// `original_query` is the learning goal the map was generated for and
/// `tree` is the full map; both are embedded so the model can pitch the
/// explanation at the right level. Failures map to the shared sentinel
/// strings; this function never returns an error.
pub async fn explain_concept<T: Selectable>(
    ai_provider: &dyn AiProvider,
    concept: &str,
    original_query: &str,
    tree: &KnowledgeNode,
    images: &[Selected<T>],
    budget: Duration,
) -> String {
    let mut user_prompt = EXPLANATION_USER_PROMPT
        .replace("{original_query}", original_query)
        .replace("{tree}", &serialize_tree(tree))
        .replace("{concept}", concept);
    if !images.is_empty() {
        user_prompt.push_str(
            &EXPLANATION_IMAGES_SECTION
                .replace("{image_context}", &image_context(images))
                .replace("{token_protocol}", IMAGE_TOKEN_PROTOCOL),
        );
    }

    debug!(user_prompt = %user_prompt, "--> Sending explanation prompt");

    match generate_with_timeout(ai_provider, EXPLANATION_SYSTEM_PROMPT, &user_prompt, budget).await
    {
        Ok(text) => splice_images(&text, images),
        Err(failure) => failure.sentinel().to_string(),
    }
}

/// Enumerates selected images for a prompt as a JSON array of id, caption,
/// selection reason, and truncated section text.
fn image_context<T: Selectable>(images: &[Selected<T>]) -> String {
    let entries: Vec<_> = images
        .iter()
        .enumerate()
        .map(|(id, selected)| {
            json!({
                "id": id,
                "caption": selected.item.caption(),
                "description": selected.reason,
                "section_text": snippet(selected.item.section_text(), PROMPT_SNIPPET_LEN),
            })
        })
        .collect();
    serde_json::to_string_pretty(&entries).unwrap_or_else(|_| "[]".to_string())
}

/// Post-processes generated prose against the selected-image side table.
///
/// Three passes, in order:
/// 1. drop any line containing the known image host (the model sometimes
///    leaks raw URLs despite the protocol instruction);
/// 2. replace every `[IMG:n]` occurrence with a block-level markdown image
///    built from the candidate's caption and URL;
/// 3. collapse runs of three or more newlines to exactly two.
pub fn splice_images<T: Selectable>(text: &str, images: &[Selected<T>]) -> String {
    let mut article = text
        .trim()
        .lines()
        .filter(|line| !line.to_lowercase().contains(IMAGE_HOST_MARKER))
        .collect::<Vec<_>>()
        .join("\n");

    for (id, selected) in images.iter().enumerate() {
        let token = format!("[IMG:{id}]");
        let caption = if selected.item.caption().is_empty() {
            format!("Image {id}")
        } else {
            snippet(selected.item.caption(), IMAGE_CAPTION_LEN)
        };
        let block = format!("\n\n![{caption}]({})\n\n", selected.item.url());
        article = article.replace(&token, &block);
    }

    EXCESS_NEWLINES.replace_all(&article, "\n\n").into_owned()
}

/// Derives a filesystem-safe name from a term: non-word characters
/// stripped, spaces replaced by underscores.
pub fn sanitize_filename(term: &str) -> String {
    NON_WORD
        .replace_all(term, "")
        .trim()
        .replace(char::is_whitespace, "_")
}
