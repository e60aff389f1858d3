//! # learnmap-cli
//!
//! Generates a standalone illustrated article for a term: resolves the
//! matching Wikipedia page, extracts and ranks its images, composes the
//! article with the relevant ones spliced in, and writes it to disk.

use anyhow::{bail, Result};
use clap::Parser;
use learnmap::article::{compose_article, find_wiki_page, sanitize_filename};
use learnmap::constants::{DEFAULT_MAX_IMAGES, EXPLANATION_TIMEOUT, SELECTION_TIMEOUT};
use learnmap::providers::ai::{gemini::GeminiProvider, local::LocalAiProvider, AiProvider};
use learnmap::select::select_images;
use learnmap_wiki::{extract_images, WikiClient, WIKIPEDIA_BASE_URL};
use std::env;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate an illustrated article for a term")]
struct Cli {
    /// The term to write an article about
    term: String,

    /// Output file path; defaults to `{term}_article.md`
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Maximum number of images to embed
    #[arg(short = 'n', long, default_value_t = DEFAULT_MAX_IMAGES, env = "MAX_IMAGES")]
    num_images: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let ai_provider = build_ai_provider()?;
    let wiki = WikiClient::new(
        env::var("WIKI_BASE_URL").unwrap_or_else(|_| WIKIPEDIA_BASE_URL.to_string()),
    )?;

    info!("Resolving Wikipedia page for '{}'", cli.term);
    let page = find_wiki_page(ai_provider.as_ref(), &cli.term, SELECTION_TIMEOUT).await;
    let page_url = wiki.page_url(&page);
    println!("📖 Using Wikipedia page: {page_url}");

    let candidates = match wiki.fetch_page_html(&page).await {
        Ok(html) => extract_images(&html, wiki.base_url()),
        Err(e) => {
            warn!("Could not fetch '{page}': {e}");
            Vec::new()
        }
    };
    println!("🖼  Found {} image candidates", candidates.len());

    let images = select_images(
        ai_provider.as_ref(),
        &cli.term,
        &candidates,
        cli.num_images,
        SELECTION_TIMEOUT,
    )
    .await;
    println!("✅ Selected {} relevant images", images.len());

    let mut article =
        compose_article(ai_provider.as_ref(), &cli.term, &images, EXPLANATION_TIMEOUT).await;
    article.push_str(&format!(
        "\n\n---\n*Source: Wikipedia - [{page_url}]({page_url})*\n"
    ));

    let path = cli
        .output
        .unwrap_or_else(|| PathBuf::from(format!("{}_article.md", sanitize_filename(&cli.term))));
    std::fs::write(&path, &article)?;
    println!("💾 Article written to {}", path.display());

    let preview: String = article.chars().take(500).collect();
    println!("\n--- Preview ---\n{preview}\n");

    Ok(())
}

/// Builds the AI provider from the environment, the same variables the
/// server reads: `AI_PROVIDER`, `AI_API_URL`, `AI_API_KEY`, `AI_MODEL`.
fn build_ai_provider() -> Result<Box<dyn AiProvider>> {
    let kind = env::var("AI_PROVIDER").unwrap_or_else(|_| "gemini".to_string());
    let model = env::var("AI_MODEL").unwrap_or_else(|_| "gemini-2.0-flash".to_string());
    let api_url = env::var("AI_API_URL").ok();
    let api_key = env::var("AI_API_KEY").ok();

    match kind.as_str() {
        "gemini" => {
            let Some(api_key) = api_key else {
                bail!("AI_API_KEY is required for the gemini provider");
            };
            let api_url = api_url.unwrap_or_else(|| {
                format!(
                    "https://generativelanguage.googleapis.com/v1beta/models/{model}:generateContent"
                )
            });
            Ok(Box::new(GeminiProvider::new(api_url, api_key)?))
        }
        "local" => {
            let Some(api_url) = api_url else {
                bail!("AI_API_URL is required for the local provider");
            };
            Ok(Box::new(LocalAiProvider::new(api_url, api_key, Some(model))?))
        }
        other => bail!("Unsupported AI provider: {other}"),
    }
}
