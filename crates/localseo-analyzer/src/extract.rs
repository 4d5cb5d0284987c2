//! Markup extraction from raw page HTML.
//!
//! Parsing is delegated to `scraper` (html5ever), which recovers from any
//! malformed input, so extraction never fails: missing elements simply come
//! back as empty strings or zero counts.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("valid title selector"));
static META: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("meta").expect("valid meta selector"));
static H1: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1").expect("valid h1 selector"));
static IMG: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img").expect("valid img selector"));
static BODY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").expect("valid body selector"));

/// Elements whose text never counts as visible content.
const NON_CONTENT_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// Fields pulled out of one HTML document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedPage {
    pub title: String,
    pub meta_description: String,
    /// Text of every `<h1>`, in document order.
    pub h1s: Vec<String>,
    pub image_count: usize,
    /// Images carrying a non-blank `alt` attribute.
    pub images_with_alt: usize,
    /// Visible body text, whitespace-collapsed.
    pub body_text: String,
    pub word_count: usize,
}

#[must_use]
pub fn extract_page(html: &str) -> ExtractedPage {
    let document = Html::parse_document(html);

    let title = document
        .select(&TITLE)
        .next()
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .unwrap_or_default();

    let meta_description = document
        .select(&META)
        .find(|el| {
            el.value()
                .attr("name")
                .is_some_and(|name| name.trim().eq_ignore_ascii_case("description"))
        })
        .and_then(|el| el.value().attr("content"))
        .map(collapse_whitespace)
        .unwrap_or_default();

    let h1s = document
        .select(&H1)
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .collect();

    let mut image_count = 0;
    let mut images_with_alt = 0;
    for img in document.select(&IMG) {
        image_count += 1;
        if img.value().attr("alt").is_some_and(|alt| !alt.trim().is_empty()) {
            images_with_alt += 1;
        }
    }

    let body_text = document
        .select(&BODY)
        .next()
        .map(visible_text)
        .unwrap_or_default();
    let word_count = body_text.split_whitespace().count();

    ExtractedPage {
        title,
        meta_description,
        h1s,
        image_count,
        images_with_alt,
        body_text,
        word_count,
    }
}

fn visible_text(root: ElementRef<'_>) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for node in root.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .ancestors()
            .filter_map(|a| a.value().as_element())
            .any(|el| NON_CONTENT_TAGS.contains(&el.name()));
        if !hidden {
            parts.push(text);
        }
    }
    collapse_whitespace(&parts.join(" "))
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
