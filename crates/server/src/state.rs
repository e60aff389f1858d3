//! # Application State
//!
//! Defines the shared application state (`AppState`) and the logic for
//! building it at startup: the configuration, the instantiated AI provider,
//! and the wiki client, made accessible to all request handlers.

use crate::config::AppConfig;
use learnmap::providers::ai::{gemini::GeminiProvider, local::LocalAiProvider, AiProvider};
use learnmap_wiki::WikiClient;
use std::sync::Arc;

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub ai_provider: Arc<dyn AiProvider>,
    pub wiki: Arc<WikiClient>,
}

/// Builds the shared application state from the configuration.
///
/// Instantiates the configured AI provider and the wiki client once;
/// handlers only borrow them.
pub async fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let ai_provider: Arc<dyn AiProvider> = match config.ai_provider.as_str() {
        "gemini" => {
            let api_key = config
                .ai_api_key
                .clone()
                .ok_or_else(|| anyhow::anyhow!("AI_API_KEY is required for the gemini provider"))?;
            // If no endpoint is configured, construct it from the model name.
            let api_url = config.ai_api_url.clone().unwrap_or_else(|| {
                format!(
                    "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
                    config.ai_model
                )
            });
            Arc::new(GeminiProvider::new(api_url, api_key)?)
        }
        "local" => {
            let api_url = config.ai_api_url.clone().ok_or_else(|| {
                anyhow::anyhow!("AI_API_URL is required for the local provider")
            })?;
            Arc::new(LocalAiProvider::new(
                api_url,
                config.ai_api_key.clone(),
                Some(config.ai_model.clone()),
            )?)
        }
        other => {
            return Err(anyhow::anyhow!("Unsupported AI provider: {other}"));
        }
    };

    let wiki = Arc::new(WikiClient::new(config.wiki_base_url.clone())?);

    Ok(AppState {
        config: Arc::new(config),
        ai_provider,
        wiki,
    })
}
