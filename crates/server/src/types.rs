use learnmap::chat::ChatTurn;
use learnmap::tree::KnowledgeNode;
use serde::{Deserialize, Serialize};

/// The request body for the `/api/knowledge-map` endpoint.
#[derive(Debug, Deserialize)]
pub struct ConceptRequest {
    pub concept: String,
}

/// The request body for the `/api/explain-concept` endpoint.
#[derive(Debug, Deserialize)]
pub struct ExplainConceptRequest {
    pub concept_name: String,
    pub original_query: String,
    pub knowledge_tree: KnowledgeNode,
}

/// The response body for the `/api/explain-concept` endpoint.
#[derive(Debug, Serialize)]
pub struct ExplainConceptResponse {
    pub explanation: String,
}

/// The request body for the `/api/chat-about-explanation` endpoint.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub concept_name: String,
    pub original_query: String,
    pub knowledge_tree: KnowledgeNode,
    pub explanation: String,
    #[serde(default)]
    pub chat_history: Vec<ChatTurn>,
    pub user_message: String,
}

/// The response body for the `/api/chat-about-explanation` endpoint.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}
