//! Deterministic signal checks over a fetched page.

use std::sync::LazyLock;

use localseo_core::PageSummary;
use regex::Regex;
use reqwest::Url;

use crate::extract::ExtractedPage;
use crate::names::match_key;

/// `(NNN) NNN-NNNN`, `NNN-NNN-NNNN`, or `NNN.NNN.NNNN`.
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(\d{3}\)\s?\d{3}[-.\s]\d{4}|\b\d{3}[-.]\d{3}[-.]\d{4}\b")
        .expect("valid phone regex")
});

/// A house number, one to four words, then a street-type token.
static ADDRESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b\d+\s+(?:[a-z0-9.'-]+\s+){1,4}(?:street|st|avenue|ave|road|rd|drive|dr)\b")
        .expect("valid address regex")
});

const SCHEMA_MARKERS: &[&str] = &["localbusiness", "\"@type\"", "schema.org"];

pub const TITLE_MIN_CHARS: usize = 30;
pub const TITLE_MAX_CHARS: usize = 60;
pub const META_MIN_CHARS: usize = 120;
pub const META_MAX_CHARS: usize = 160;
pub const MIN_WORD_COUNT: usize = 300;

/// Read-only snapshot of everything the scorer looks at for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSignals {
    pub final_url: String,
    pub city: String,
    pub title: String,
    pub title_length: usize,
    pub meta_description_length: usize,
    pub h1s: Vec<String>,
    pub word_count: usize,
    pub image_count: usize,
    pub images_with_alt: usize,
    pub has_phone: bool,
    pub has_address: bool,
    pub has_schema: bool,
    pub city_in_page: bool,
    pub city_in_title: bool,
    pub city_in_h1: bool,
    pub business_name_on_page: bool,
    pub is_https: bool,
}

impl PageSignals {
    /// Runs every check against the raw HTML and its extracted fields.
    #[must_use]
    pub fn collect(
        page: &ExtractedPage,
        html: &str,
        final_url: &Url,
        business_name: &str,
        city: &str,
    ) -> Self {
        let city = city.trim();
        Self {
            final_url: final_url.to_string(),
            city: city.to_owned(),
            title: page.title.clone(),
            title_length: page.title.chars().count(),
            meta_description_length: page.meta_description.chars().count(),
            h1s: page.h1s.clone(),
            word_count: page.word_count,
            image_count: page.image_count,
            images_with_alt: page.images_with_alt,
            has_phone: has_phone(html),
            has_address: has_address(html),
            has_schema: has_structured_data(html),
            city_in_page: contains_ignore_case(html, city),
            city_in_title: contains_ignore_case(&page.title, city),
            city_in_h1: page.h1s.iter().any(|h| contains_ignore_case(h, city)),
            business_name_on_page: business_name_on_page(page, business_name),
            is_https: final_url.scheme() == "https",
        }
    }

    #[must_use]
    pub fn title_optimized(&self) -> bool {
        title_is_optimized(self.title_length)
    }

    #[must_use]
    pub fn meta_description_present(&self) -> bool {
        self.meta_description_length > 0
    }

    #[must_use]
    pub fn meta_description_optimized(&self) -> bool {
        meta_is_optimized(self.meta_description_length)
    }

    #[must_use]
    pub fn single_h1(&self) -> bool {
        self.h1s.len() == 1
    }

    #[must_use]
    pub fn content_sufficient(&self) -> bool {
        self.word_count >= MIN_WORD_COUNT
    }

    #[must_use]
    pub fn has_nap(&self) -> bool {
        self.has_phone && self.has_address
    }

    #[must_use]
    pub fn images_missing_alt(&self) -> usize {
        self.image_count.saturating_sub(self.images_with_alt)
    }

    #[must_use]
    pub fn summary(&self) -> PageSummary {
        PageSummary {
            final_url: self.final_url.clone(),
            title: self.title.clone(),
            title_length: self.title_length,
            meta_description_length: self.meta_description_length,
            h1s: self.h1s.clone(),
            word_count: self.word_count,
            image_count: self.image_count,
            images_with_alt: self.images_with_alt,
            has_phone: self.has_phone,
            has_address: self.has_address,
            has_schema: self.has_schema,
            is_https: self.is_https,
        }
    }
}

#[must_use]
pub fn has_phone(text: &str) -> bool {
    PHONE_RE.is_match(text)
}

#[must_use]
pub fn has_address(text: &str) -> bool {
    ADDRESS_RE.is_match(text)
}

#[must_use]
pub fn has_structured_data(html: &str) -> bool {
    let lower = html.to_lowercase();
    SCHEMA_MARKERS.iter().any(|m| lower.contains(m))
}

#[must_use]
pub fn title_is_optimized(chars: usize) -> bool {
    (TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&chars)
}

#[must_use]
pub fn meta_is_optimized(chars: usize) -> bool {
    (META_MIN_CHARS..=META_MAX_CHARS).contains(&chars)
}

/// Case-insensitive substring test. An empty needle never matches.
#[must_use]
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim();
    !needle.is_empty() && haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn business_name_on_page(page: &ExtractedPage, business_name: &str) -> bool {
    let name = match_key(business_name);
    if name.is_empty() {
        return false;
    }
    match_key(&page.title).contains(&name) || match_key(&page.body_text).contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_page;

    fn signals_for(html: &str, url: &str) -> PageSignals {
        let page = extract_page(html);
        let url = Url::parse(url).expect("test url");
        PageSignals::collect(&page, html, &url, "Joe's Pizza", "Lancaster")
    }

    #[test]
    fn phone_matches_parenthesized_format() {
        assert!(has_phone("Call (717) 555-0100 today"));
        assert!(has_phone("Call (717)555-0100 today"));
    }

    #[test]
    fn phone_matches_dashed_and_dotted_formats() {
        assert!(has_phone("717-555-0100"));
        assert!(has_phone("717.555.0100"));
    }

    #[test]
    fn phone_rejects_short_or_unformatted_numbers() {
        assert!(!has_phone("555-0100"));
        assert!(!has_phone("7175550100"));
        assert!(!has_phone("order #12345"));
    }

    #[test]
    fn address_matches_common_street_types() {
        assert!(has_address("123 Main Street, Lancaster, PA"));
        assert!(has_address("45 north queen st"));
        assert!(has_address("9 Fruitville Pike Road"));
        assert!(has_address("1200 Harrisburg Ave."));
        assert!(has_address("77 Oak Hill DR"));
    }

    #[test]
    fn address_requires_house_number_and_street_type() {
        assert!(!has_address("Main Street"));
        assert!(!has_address("123 Main Boulevard"));
        assert!(!has_address("we have 3 pizzas"));
    }

    #[test]
    fn structured_data_detects_any_marker() {
        assert!(has_structured_data(
            r#"<script type="application/ld+json">{"@type": "Restaurant"}</script>"#
        ));
        assert!(has_structured_data(r#"<div itemtype="https://schema.org/Place">"#));
        assert!(has_structured_data("LocalBusiness"));
        assert!(!has_structured_data("<p>plain page</p>"));
    }

    #[test]
    fn title_length_boundaries() {
        assert!(!title_is_optimized(29));
        assert!(title_is_optimized(30));
        assert!(title_is_optimized(60));
        assert!(!title_is_optimized(61));
    }

    #[test]
    fn title_length_counts_characters_not_bytes() {
        // 30 characters, 32 bytes.
        let title = format!("Caf\u{e9} \u{e9}{}", "a".repeat(24));
        assert_eq!(title.chars().count(), 30);
        let html = format!("<html><head><title>{title}</title></head></html>");
        let signals = signals_for(&html, "https://example.com/");
        assert_eq!(signals.title_length, 30);
        assert!(signals.title_optimized());
    }

    #[test]
    fn meta_length_boundaries() {
        assert!(!meta_is_optimized(119));
        assert!(meta_is_optimized(120));
        assert!(meta_is_optimized(160));
        assert!(!meta_is_optimized(161));
    }

    #[test]
    fn contains_ignore_case_never_matches_empty_needle() {
        assert!(!contains_ignore_case("anything", ""));
        assert!(!contains_ignore_case("anything", "   "));
        assert!(contains_ignore_case("Pizza in LANCASTER", "lancaster"));
    }

    #[test]
    fn city_checks_cover_title_h1_and_raw_html() {
        let html = r#"<html><head><title>Best Pizza in Lancaster</title></head>
            <body><h1>Lancaster's favorite pizza</h1></body></html>"#;
        let signals = signals_for(html, "https://example.com/");
        assert!(signals.city_in_page);
        assert!(signals.city_in_title);
        assert!(signals.city_in_h1);
    }

    #[test]
    fn city_in_page_sees_markup_only_mentions() {
        let html = r#"<html><body><a href="/lancaster-menu">Menu</a></body></html>"#;
        let signals = signals_for(html, "https://example.com/");
        assert!(signals.city_in_page);
        assert!(!signals.city_in_title);
        assert!(!signals.city_in_h1);
    }

    #[test]
    fn business_name_matches_despite_entities_and_case() {
        let html = "<html><body><p>Welcome to JOE&#39;S PIZZA!</p></body></html>";
        let signals = signals_for(html, "https://example.com/");
        assert!(signals.business_name_on_page);
    }

    #[test]
    fn business_name_absent() {
        let html = "<html><body><p>Welcome to Tony's Subs</p></body></html>";
        let signals = signals_for(html, "https://example.com/");
        assert!(!signals.business_name_on_page);
    }

    #[test]
    fn https_follows_final_url_scheme() {
        assert!(signals_for("<p></p>", "https://example.com/").is_https);
        assert!(!signals_for("<p></p>", "http://example.com/").is_https);
    }

    #[test]
    fn h1_count_must_be_exactly_one() {
        let none = signals_for("<body><p>x</p></body>", "https://example.com/");
        let one = signals_for("<body><h1>a</h1></body>", "https://example.com/");
        let two = signals_for("<body><h1>a</h1><h1>b</h1></body>", "https://example.com/");
        assert!(!none.single_h1());
        assert!(one.single_h1());
        assert!(!two.single_h1());
    }

    #[test]
    fn summary_mirrors_signals() {
        let html = r#"<html><head><title>Joe's Pizza</title></head>
            <body><img src="a.jpg"><p>Call (717) 555-0100</p></body></html>"#;
        let signals = signals_for(html, "http://example.com/");
        let summary = signals.summary();
        assert_eq!(summary.title, "Joe's Pizza");
        assert_eq!(summary.image_count, 1);
        assert_eq!(summary.images_with_alt, 0);
        assert!(summary.has_phone);
        assert!(!summary.is_https);
        assert_eq!(signals.images_missing_alt(), 1);
    }
}
