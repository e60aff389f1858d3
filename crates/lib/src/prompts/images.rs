//! # Image Pipeline Prompts
//!
//! Prompts for the three model calls of the illustration pipeline: locating
//! the encyclopedia page for a term, ranking extracted image candidates by
//! relevance, and composing prose that references images only through the
//! `[IMG:n]` placeholder protocol.

/// The system prompt for resolving a term to a Wikipedia page title.
pub const PAGE_LOOKUP_SYSTEM_PROMPT: &str = r#"You resolve a learning term to the most relevant English Wikipedia page title.

Return ONLY the page title as it appears in the Wikipedia URL, with underscores for spaces. For example:
- "Pythagorean theorem" -> "Pythagorean_theorem"
- "Machine learning" -> "Machine_learning"
- "Albert Einstein" -> "Albert_Einstein"

Do not include the full URL, just the title part. No quotes, no explanations."#;

/// The user prompt for page lookup.
/// Placeholder: `{term}`
pub const PAGE_LOOKUP_USER_PROMPT: &str = r#"Term: {term}
Wikipedia page title:"#;

/// The system prompt for the batched image relevance selection call.
pub const IMAGE_SELECTION_SYSTEM_PROMPT: &str = r#"You are selecting the MOST RELEVANT images for an educational article. You will receive every available image with its caption and surrounding section text, and you must pick the best subset in one pass.

Selection criteria, in order of importance:
- Directly illustrates the main concept
- Shows fundamental examples, proofs, or demonstrations
- Contains clear diagrams or visualizations
- Depicts historical context or key figures
- Aids understanding of core principles

Avoid images that are vague or generic, show tangential or advanced applications, or cover minor edge cases.

Respond in JSON with the selected image indices, a relevance score from 0 to 10, and a brief reason:
{
  "selected_images": [
    {"index": 0, "relevance_score": 9.5, "reason": "Shows the fundamental theorem proof"}
  ]
}

Return ONLY valid JSON, no extra text."#;

/// The user prompt for image selection.
/// Placeholders: `{concept}`, `{max_images}`, `{candidates_context}`
pub const IMAGE_SELECTION_USER_PROMPT: &str = r#"Concept: "{concept}"

Available images with captions and context:
{candidates_context}

Select the TOP {max_images} images that would best help explain "{concept}". Return only the JSON object."#;

/// The strict placeholder-protocol instruction shared by every prompt that
/// embeds images. Kept loud on purpose: models routinely ignore softer
/// phrasings and emit raw URLs, which the composer then has to scrub.
pub const IMAGE_TOKEN_PROTOCOL: &str = r#"**ABSOLUTELY CRITICAL - IMAGE REFERENCE FORMAT:**

CORRECT way to show images:
- "The visual proof [IMG:0] demonstrates this concept."
- "Consider the diagram below:

[IMG:1]

This shows..."

WRONG - DO NOT DO THIS:
- ![caption](URL)
- (https://upload.wikimedia.org/...)
- Any URL or markdown image syntax

YOU MUST ONLY USE: [IMG:0], [IMG:1], [IMG:2], ...
Do not write ANY URLs. Do not write ANY markdown image syntax.
ONLY write [IMG:X] where X is the image number."#;

/// The system prompt for standalone illustrated article generation.
pub const ARTICLE_SYSTEM_PROMPT: &str = r#"You are an expert educator writing an illustrated article.

Format your response as Markdown: # for the main title, ## for major sections, ### for subsections. Place each provided image where it is most relevant using its [IMG:X] token, and add a brief sentence before or after it explaining what it shows. Aim for 500-800 words."#;

/// The user prompt for standalone illustrated article generation.
/// Placeholders: `{term}`, `{image_context}`, `{token_protocol}`
pub const ARTICLE_USER_PROMPT: &str = r#"Write a comprehensive, educational article about "{term}".

You have access to these images:
{image_context}

{token_protocol}

The article must explain the concept clearly and thoroughly, use the provided images strategically throughout, and provide context for each image."#;

/// The system prompt for per-node explanations inside a knowledge map.
pub const EXPLANATION_SYSTEM_PROMPT: &str = r#"You are a patient, expert tutor. The user is working through a knowledge map toward a larger learning goal, and has asked for an explanation of one concept from that map.

Explain the concept clearly in Markdown, assuming the user has covered the concepts that appear before it in the map but nothing after it. Keep the explanation focused and self-contained."#;

/// The user prompt for per-node explanations, without images.
/// Placeholders: `{concept}`, `{original_query}`, `{tree}`
pub const EXPLANATION_USER_PROMPT: &str = r#"# Learning goal
{original_query}

# Knowledge map
{tree}

# Concept to explain
{concept}"#;

/// Appended to the explanation prompt when images were selected.
/// Placeholders: `{image_context}`, `{token_protocol}`
pub const EXPLANATION_IMAGES_SECTION: &str = r#"

# Available images
{image_context}

{token_protocol}

Use the images where they genuinely help the explanation."#;
