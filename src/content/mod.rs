//! HTML content analysis.
//!
//! Parses a fetched page to count resources, harvest image attributes, and
//! scan visible text for configured keywords. Keyword matching is
//! case-insensitive substring counting over text content only — script and
//! style bodies are excluded before counting.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use scraper::{Html, Node, Selector};
use serde::Serialize;

use crate::utils::{parse_dimension, parse_selector};

static IMG_SELECTOR: LazyLock<Selector> = LazyLock::new(|| parse_selector("img"));
static SCRIPT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| parse_selector("script"));
static STYLESHEET_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector("link[rel='stylesheet']"));
static FONT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector("link[rel='preload'][as='font']"));
static ANY_SELECTOR: LazyLock<Selector> = LazyLock::new(|| parse_selector("*"));

/// Attributes harvested from one `<img>` element with a `src`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageDetail {
    /// The `src` attribute.
    pub src: String,
    /// Parsed `width` attribute; `None` when absent or unparseable.
    pub width: Option<u32>,
    /// Parsed `height` attribute; `None` when absent or unparseable.
    pub height: Option<u32>,
    /// The `alt` attribute; `None` when absent.
    pub alt: Option<String>,
}

impl ImageDetail {
    /// Whether the image has no usable alt text.
    pub fn missing_alt(&self) -> bool {
        self.alt.as_deref().map_or(true, |alt| alt.trim().is_empty())
    }

    /// Whether either known dimension exceeds `threshold` pixels.
    /// Unknown dimensions never count as oversized.
    pub fn exceeds_dimension(&self, threshold: u32) -> bool {
        self.width.is_some_and(|w| w > threshold) || self.height.is_some_and(|h| h > threshold)
    }
}

/// Everything the content analyzer extracts from one page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentMetrics {
    /// Number of `<img>` elements.
    pub image_count: usize,
    /// Number of `<script>` elements.
    pub script_count: usize,
    /// Number of stylesheet links.
    pub stylesheet_count: usize,
    /// Number of preloaded font links.
    pub font_count: usize,
    /// Total element count in the document.
    pub total_elements: usize,
    /// Per-image attribute details (images with a `src` only).
    pub images: Vec<ImageDetail>,
    /// Occurrences of each configured keyword in visible text.
    pub keyword_matches: BTreeMap<String, usize>,
    /// Configured keywords with zero matches, in configuration order.
    pub missing_keywords: Vec<String>,
    /// `<img>` elements without `loading="lazy"`.
    pub images_without_lazy_loading: usize,
    /// `<img>` elements without alt text.
    pub images_without_alt: usize,
}

impl ContentMetrics {
    /// Whether every configured keyword was found at least once.
    pub fn all_keywords_present(&self) -> bool {
        self.missing_keywords.is_empty()
    }

    /// Sum of all keyword occurrence counts.
    pub fn total_matches(&self) -> usize {
        self.keyword_matches.values().sum()
    }
}

/// Analyzes an HTML document for resource counts, image attributes, and
/// keyword presence.
pub fn analyze(html: &str, keywords: &[String]) -> ContentMetrics {
    let document = Html::parse_document(html);

    let image_count = document.select(&IMG_SELECTOR).count();
    let script_count = document.select(&SCRIPT_SELECTOR).count();
    let stylesheet_count = document.select(&STYLESHEET_SELECTOR).count();
    let font_count = document.select(&FONT_SELECTOR).count();
    let total_elements = document.select(&ANY_SELECTOR).count();

    let mut images = Vec::new();
    let mut images_without_lazy_loading = 0;
    let mut images_without_alt = 0;

    for img in document.select(&IMG_SELECTOR) {
        let attrs = img.value();
        if attrs.attr("loading") != Some("lazy") {
            images_without_lazy_loading += 1;
        }

        let Some(src) = attrs.attr("src") else {
            continue;
        };
        let detail = ImageDetail {
            src: src.to_string(),
            width: attrs.attr("width").and_then(parse_dimension),
            height: attrs.attr("height").and_then(parse_dimension),
            alt: attrs.attr("alt").map(str::to_string),
        };
        if detail.missing_alt() {
            images_without_alt += 1;
        }
        images.push(detail);
    }

    let body_text = visible_text(&document).to_lowercase();

    let mut keyword_matches = BTreeMap::new();
    let mut missing_keywords = Vec::new();
    for keyword in keywords {
        if keyword.trim().is_empty() {
            continue;
        }
        let count = body_text.matches(&keyword.to_lowercase()).count();
        if count == 0 {
            missing_keywords.push(keyword.clone());
        }
        keyword_matches.insert(keyword.clone(), count);
    }

    ContentMetrics {
        image_count,
        script_count,
        stylesheet_count,
        font_count,
        total_elements,
        images,
        keyword_matches,
        missing_keywords,
        images_without_lazy_loading,
        images_without_alt,
    }
}

/// Collects the document's text content, skipping script and style bodies.
fn visible_text(document: &Html) -> String {
    let mut out = String::new();
    collect_text(document.tree.root(), &mut out);
    out
}

fn collect_text(node: ego_tree::NodeRef<'_, Node>, out: &mut String) {
    for child in node.children() {
        match child.value() {
            Node::Element(el) if matches!(el.name(), "script" | "style") => {}
            Node::Element(_) | Node::Document | Node::Fragment => collect_text(child, out),
            Node::Text(text) => {
                out.push_str(text);
                out.push(' ');
            }
            _ => {}
        }
    }
}
