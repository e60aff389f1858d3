//! # learnmap-wiki
//!
//! Fetches Wikipedia article markup and extracts content images with their
//! structural context (caption plus enclosing section text), for relevance
//! ranking by the `learnmap` pipeline.

mod extract;

pub use extract::{extract_images, ImageCandidate};

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// The canonical English Wikipedia base URL.
pub const WIKIPEDIA_BASE_URL: &str = "https://en.wikipedia.org";

const USER_AGENT: &str = "learnmap-wiki/0.1 (educational project)";
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

static WIKI_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/wiki/([^#?]+)").expect("valid wiki path regex"));

/// Errors from fetching article markup. Callers treat any of these as
/// "the page has no images" rather than failing the surrounding request.
#[derive(Error, Debug)]
pub enum WikiError {
    #[error("Failed to build Reqwest client: {0}")]
    ClientBuild(reqwest::Error),
    #[error("Failed to fetch page: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("Page request returned status {0}")]
    Status(reqwest::StatusCode),
}

/// Extraction results for a whole page, with provenance metadata.
#[derive(Debug, Clone, Serialize)]
pub struct PageImages {
    pub page_title: String,
    pub page_url: String,
    pub image_count: usize,
    pub images: Vec<ImageCandidate>,
}

/// A client for retrieving Wikipedia article markup.
#[derive(Clone, Debug)]
pub struct WikiClient {
    http: reqwest::Client,
    base_url: String,
}

impl WikiClient {
    /// Creates a client against `base_url` with a bounded request timeout
    /// and an identifying user agent.
    pub fn new(base_url: impl Into<String>) -> Result<Self, WikiError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(WikiError::ClientBuild)?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The canonical article URL for a page title.
    pub fn page_url(&self, title: &str) -> String {
        format!("{}/wiki/{title}", self.base_url)
    }

    /// Fetches the raw markup of a page, identified by title or full URL.
    ///
    /// One GET, no retry: any transport error or non-success status is
    /// returned as-is for the caller to degrade on.
    pub async fn fetch_page_html(&self, page_input: &str) -> Result<String, WikiError> {
        let title = normalize_page_input(page_input);
        let url = self.page_url(&title);
        debug!("Fetching wiki page: {url}");
        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(WikiError::Status(response.status()));
        }
        Ok(response.text().await?)
    }

    /// Fetches a page and extracts its content images, with metadata.
    ///
    /// A fetch failure degrades to an empty image list.
    pub async fn page_images(&self, page_input: &str) -> PageImages {
        let page_title = normalize_page_input(page_input);
        let images = match self.fetch_page_html(&page_title).await {
            Ok(html) => extract_images(&html, &self.base_url),
            Err(e) => {
                warn!("Could not fetch wiki page '{page_title}': {e}");
                Vec::new()
            }
        };
        PageImages {
            page_url: self.page_url(&page_title),
            page_title,
            image_count: images.len(),
            images,
        }
    }
}

/// Normalizes a page identifier to a bare title.
///
/// Full URLs have the segment after `/wiki/` extracted (stopping at `#` or
/// `?`) and percent-decoded; anything else passes through verbatim.
pub fn normalize_page_input(page_input: &str) -> String {
    if page_input.starts_with("http") {
        if let Some(caps) = WIKI_PATH.captures(page_input) {
            let raw = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            return match urlencoding::decode(raw) {
                Ok(decoded) => decoded.into_owned(),
                Err(_) => raw.to_string(),
            };
        }
    }
    page_input.to_string()
}
