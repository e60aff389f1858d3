//! Image extraction from Wikipedia article markup.
//!
//! Scans the main content region for embeddable images, filters out
//! decorative and UI assets, and resolves each survivor's absolute URL,
//! caption, filename, and innermost enclosing section text.

use ego_tree::NodeRef;
use learnmap::select::Selectable;
use regex::Regex;
use scraper::{node::Node, ElementRef, Html, Selector};
use serde::Serialize;
use std::sync::LazyLock;

/// An image found in article markup, with its structural context.
/// Candidates are emitted in document order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageCandidate {
    pub url: String,
    pub caption: String,
    pub section_text: String,
    pub filename: String,
}

impl Selectable for ImageCandidate {
    fn url(&self) -> &str {
        &self.url
    }
    fn caption(&self) -> &str {
        &self.caption
    }
    fn section_text(&self) -> &str {
        &self.section_text
    }
}

/// Rendered math formulas are never content images.
const MATH_RENDER_PATH: &str = "/media/math/render/svg/";

/// Images with a declared width below this are icons and bullets.
/// Undeclared widths are admitted.
const MIN_IMAGE_WIDTH: u32 = 50;

/// Source substrings identifying icon, logo, and UI assets.
const SKIP_SRC_PATTERNS: &[&str] = &[
    "Icon_",
    "Edit_icon",
    "Information_icon",
    "Question_book",
    "Ambox",
    "Crystal_",
    "Magnify-clip",
    "/static/",
    "Wikipedia-logo",
    "Wikimedia-logo",
];

/// Ancestor classes marking navigation chrome and metadata boxes.
const SKIP_ANCESTOR_CLASSES: &[&str] =
    &["navbox", "navigation", "sidebar", "infobox", "metadata", "mbox"];

static CITATION_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\d+\]").expect("valid citation regex"));
static CONTENT_ROOT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#mw-content-text").expect("valid content root selector"));
static FIGCAPTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("figcaption").expect("valid figcaption selector"));
static THUMBCAPTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.thumbcaption").expect("valid thumbcaption selector"));

/// One node of interest, in document order. Positions are indices into the
/// event list, so "before" and "after" are plain index comparisons.
enum DocEvent<'a> {
    Heading { level: u8 },
    Block { text: String },
    Image { element: ElementRef<'a> },
}

/// Extracts all content images from article markup.
///
/// Pure transformation: markup that fails to parse or contains no content
/// region simply yields fewer (possibly zero) candidates, never an error.
pub fn extract_images(html: &str, base_url: &str) -> Vec<ImageCandidate> {
    let document = Html::parse_document(html);
    let root = document
        .select(&CONTENT_ROOT)
        .next()
        .unwrap_or_else(|| document.root_element());

    let events = collect_events(&root);
    let mut candidates = Vec::new();

    for (position, event) in events.iter().enumerate() {
        let DocEvent::Image { element } = event else {
            continue;
        };
        if !is_content_image(element) {
            continue;
        }
        let Some(src) = element.value().attr("src").filter(|s| !s.is_empty()) else {
            continue;
        };
        let url = resolve_src(src, base_url);
        let filename = url.rsplit('/').next().unwrap_or_default().to_string();
        candidates.push(ImageCandidate {
            caption: extract_caption(element),
            section_text: section_text_at(&events, position),
            url,
            filename,
        });
    }

    candidates
}

/// Flattens the content region into a document-order event list: headings,
/// text blocks (paragraphs, list items, definition entries), and images.
fn collect_events<'a>(root: &ElementRef<'a>) -> Vec<DocEvent<'a>> {
    let mut events = Vec::new();
    for node in root.descendants() {
        let Some(element) = ElementRef::wrap(node) else {
            continue;
        };
        let name = element.value().name();
        if let Some(level) = heading_level(name) {
            events.push(DocEvent::Heading { level });
        } else if matches!(name, "p" | "li" | "dd" | "dt") {
            let mut buf = String::new();
            collect_text(&node, &mut buf);
            events.push(DocEvent::Block { text: buf });
        } else if name == "img" {
            events.push(DocEvent::Image { element });
        }
    }
    events
}

/// Admissibility filter for a single image element.
fn is_content_image(img: &ElementRef) -> bool {
    let src = img.value().attr("src").unwrap_or("");

    if src.contains(MATH_RENDER_PATH) {
        return false;
    }

    if let Some(width) = img.value().attr("width") {
        if let Ok(width) = width.trim().parse::<u32>() {
            if width < MIN_IMAGE_WIDTH {
                return false;
            }
        }
    }

    if SKIP_SRC_PATTERNS.iter().any(|pattern| src.contains(pattern)) {
        return false;
    }

    for ancestor in img.ancestors() {
        if let Some(element) = ElementRef::wrap(ancestor) {
            if element
                .value()
                .classes()
                .any(|class| SKIP_ANCESTOR_CLASSES.contains(&class))
            {
                return false;
            }
        }
    }

    true
}

/// Resolves an image source to an absolute URL: protocol-relative sources
/// get https, root-relative sources are joined against the site base.
fn resolve_src(src: &str, base_url: &str) -> String {
    if src.starts_with("//") {
        format!("https:{src}")
    } else if src.starts_with('/') {
        match url::Url::parse(base_url).and_then(|base| base.join(src)) {
            Ok(joined) => joined.to_string(),
            Err(_) => format!("{base_url}{src}"),
        }
    } else {
        src.to_string()
    }
}

/// Derives the caption with first-match priority: figure figcaption, then
/// thumbnail caption (with the magnify control stripped), then alt text.
fn extract_caption(img: &ElementRef) -> String {
    if let Some(figure) = enclosing(img, |el| el.value().name() == "figure") {
        if let Some(figcaption) = figure.select(&FIGCAPTION).next() {
            let mut buf = String::new();
            collect_text(&figcaption, &mut buf);
            return normalize_whitespace(&buf);
        }
    }

    if let Some(thumb) = enclosing(img, |el| {
        el.value().name() == "div" && el.value().classes().any(|class| class == "thumb")
    }) {
        if let Some(caption) = thumb.select(&THUMBCAPTION).next() {
            let mut buf = String::new();
            collect_text_excluding_class(&caption, "magnify", &mut buf);
            return normalize_whitespace(&buf);
        }
    }

    img.value()
        .attr("alt")
        .map(normalize_whitespace)
        .unwrap_or_default()
}

/// The nearest ancestor element matching `predicate`.
fn enclosing<'a>(
    img: &ElementRef<'a>,
    predicate: impl Fn(&ElementRef<'a>) -> bool,
) -> Option<ElementRef<'a>> {
    img.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| predicate(el))
}

/// Computes the innermost-section text for the image at `image_position`.
///
/// Scans backward for the nearest preceding heading of any level, then
/// collects block text forward from it, stopping at the image's own
/// position or at the next heading of equal-or-shallower level, whichever
/// comes first. Text under sibling sections never leaks in.
fn section_text_at(events: &[DocEvent], image_position: usize) -> String {
    let mut heading = None;
    for (position, event) in events[..image_position].iter().enumerate().rev() {
        if let DocEvent::Heading { level } = event {
            heading = Some((position, *level));
            break;
        }
    }
    let Some((heading_position, heading_level)) = heading else {
        return String::new();
    };

    let mut texts = Vec::new();
    for event in &events[heading_position + 1..image_position] {
        match event {
            DocEvent::Heading { level } if *level <= heading_level => break,
            DocEvent::Block { text } => {
                let normalized = normalize_whitespace(text);
                if normalized.is_empty() || normalized.contains("[edit]") {
                    continue;
                }
                texts.push(CITATION_MARKER.replace_all(&normalized, "").into_owned());
            }
            _ => {}
        }
    }

    normalize_whitespace(&texts.join(" "))
}

fn heading_level(tag: &str) -> Option<u8> {
    match tag {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

fn collect_text(node: &NodeRef<'_, Node>, out: &mut String) {
    if let Node::Text(text) = node.value() {
        out.push_str(text);
    }
    for child in node.children() {
        collect_text(&child, out);
    }
}

fn collect_text_excluding_class(node: &NodeRef<'_, Node>, class: &str, out: &mut String) {
    match node.value() {
        Node::Text(text) => out.push_str(text),
        Node::Element(element) if element.classes().any(|c| c == class) => return,
        _ => {}
    }
    for child in node.children() {
        collect_text_excluding_class(&child, class, out);
    }
}

fn normalize_whitespace(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last_was_space = false;
    for ch in input.chars() {
        if ch.is_whitespace() {
            if !last_was_space {
                out.push(' ');
                last_was_space = true;
            }
        } else {
            out.push(ch);
            last_was_space = false;
        }
    }
    out.trim().to_string()
}
