//! # Knowledge Tree Generation and Annotation
//!
//! One model call produces the raw tree as strict JSON; annotation then
//! computes aggregate learning times bottom-up and marks leaves. The
//! generator never returns an error: a timeout or provider failure yields a
//! tagged sentinel node, and an unparseable response yields a fixed
//! placeholder tree.

use crate::{
    constants::DEFAULT_SELF_LEARNING_TIME,
    errors::GenerationFailure,
    prompts::tree::{TREE_GENERATION_SYSTEM_PROMPT, TREE_GENERATION_USER_PROMPT},
    providers::ai::{generate_with_timeout, AiProvider},
    strip_code_fence,
};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::time::Duration;
use tracing::{debug, info, warn};

/// A node in the knowledge dependency tree.
///
/// `total_learning_time` and `is_atomic` are computed by [`annotate`];
/// `error` is set only on sentinel nodes standing in for a failed
/// generation. The wire form is camelCase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeNode {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub self_learning_time: Option<f64>,
    #[serde(default)]
    pub children: Vec<KnowledgeNode>,
    #[serde(default)]
    pub total_learning_time: f64,
    #[serde(default)]
    pub is_atomic: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl KnowledgeNode {
    /// A plain leaf with a self-time estimate, used by the fallback tree.
    fn leaf(name: &str, description: String, minutes: f64) -> Self {
        KnowledgeNode {
            name: name.to_string(),
            description,
            self_learning_time: Some(minutes),
            children: Vec::new(),
            total_learning_time: 0.0,
            is_atomic: false,
            error: None,
        }
    }
}

/// Generates an annotated knowledge tree for `concept`.
///
/// Always returns a well-formed tree:
/// - parse failure -> the fixed Foundation / Core Concepts / Advanced Topics
///   placeholder (no error tag);
/// - timeout or classified provider failure -> a single sentinel node
///   carrying the failure tag.
pub async fn generate_knowledge_tree(
    ai_provider: &dyn AiProvider,
    concept: &str,
    budget: Duration,
) -> KnowledgeNode {
    info!("Generating knowledge tree for '{concept}'");
    let user_prompt = TREE_GENERATION_USER_PROMPT.replace("{concept}", concept);

    let mut tree = match generate_with_timeout(
        ai_provider,
        TREE_GENERATION_SYSTEM_PROMPT,
        &user_prompt,
        budget,
    )
    .await
    {
        Ok(response) => {
            debug!("<-- Raw tree response: {response}");
            match serde_json::from_str::<KnowledgeNode>(strip_code_fence(&response)) {
                Ok(parsed) => parsed,
                Err(e) => {
                    warn!("Tree response was not valid JSON ({e}), using placeholder tree");
                    fallback_tree(concept)
                }
            }
        }
        Err(failure) => {
            warn!("Tree generation failed for '{concept}': {failure:?}");
            sentinel_node(concept, &failure)
        }
    };

    annotate(&mut tree);
    tree
}

/// The deterministic placeholder returned when the model's output cannot be
/// parsed as a tree.
pub fn fallback_tree(concept: &str) -> KnowledgeNode {
    KnowledgeNode {
        name: concept.to_string(),
        description: format!("A starting structure for learning {concept}."),
        self_learning_time: Some(5.0),
        children: vec![
            KnowledgeNode::leaf(
                "Foundation",
                format!("The fundamental building blocks of {concept}."),
                10.0,
            ),
            KnowledgeNode::leaf(
                "Core Concepts",
                format!("The central ideas behind {concept}."),
                15.0,
            ),
            KnowledgeNode::leaf(
                "Advanced Topics",
                "Deeper material to explore once the core is solid.".to_string(),
                15.0,
            ),
        ],
        total_learning_time: 0.0,
        is_atomic: false,
        error: None,
    }
}

/// A single-node stand-in for a failed generation, tagged with the failure
/// kind. An `Other` failure carries the raw provider message in the
/// description so it surfaces to the user.
pub fn sentinel_node(concept: &str, failure: &GenerationFailure) -> KnowledgeNode {
    let description = match failure {
        GenerationFailure::Other(message) => format!("{} ({message})", failure.sentinel()),
        _ => failure.sentinel().to_string(),
    };
    KnowledgeNode {
        name: concept.to_string(),
        description,
        self_learning_time: Some(0.0),
        children: Vec::new(),
        total_learning_time: 0.0,
        is_atomic: true,
        error: Some(failure.tag().to_string()),
    }
}

/// Annotates a tree in place, bottom-up, and returns the root's total.
///
/// Each node's total is its own estimate (defaulting to
/// [`DEFAULT_SELF_LEARNING_TIME`] when the model omitted one) plus the sum
/// of its children's totals, rounded to one decimal place. `is_atomic`
/// holds exactly when the node has no children.
pub fn annotate(node: &mut KnowledgeNode) -> f64 {
    let children_total: f64 = node.children.iter_mut().map(annotate).sum();
    let self_time = node
        .self_learning_time
        .unwrap_or(DEFAULT_SELF_LEARNING_TIME);
    node.is_atomic = node.children.is_empty();
    node.total_learning_time = ((self_time + children_total) * 10.0).round() / 10.0;
    node.total_learning_time
}

/// Renders a tree as an indented outline for embedding in prompts.
pub fn serialize_tree(root: &KnowledgeNode) -> String {
    let mut out = String::new();
    render_outline(root, 0, &mut out);
    out
}

fn render_outline(node: &KnowledgeNode, depth: usize, out: &mut String) {
    let _ = writeln!(
        out,
        "{}- {} ({} min total): {}",
        "  ".repeat(depth),
        node.name,
        node.total_learning_time,
        node.description
    );
    for child in &node.children {
        render_outline(child, depth + 1, out);
    }
}
