//! Fixed-point scoring of page signals and the listing lookup.
//!
//! | Check                     | If failed         | Category      | Points           |
//! |---------------------------|-------------------|---------------|------------------|
//! | Title length 30–60        | high              | Title         | +20 on-page      |
//! | Title contains city       | critical          | Local SEO     | +20 on-page      |
//! | Meta description 120–160  | high/medium       | Meta          | +15 on-page      |
//! | Exactly one H1            | high              | H1            | +15 on-page      |
//! | H1 contains city          | critical          | H1 Local      | +15 on-page      |
//! | Word count ≥ 300          | medium            | Content       | +15 on-page      |
//! | City anywhere in page     | critical          | Content       | +30 local        |
//! | Business name on page     | high              | Business Name | +20 local        |
//! | Phone and address present | critical          | NAP           | +25 local        |
//! | Structured data present   | high              | Schema        | +25 local        |
//! | Images have alt text      | medium            | Images        | none             |
//! | HTTPS                     | critical          | Security      | technical 100/50 |
//! | Listing found             | critical          | GBP           | gbp 100/0        |
//!
//! A missing meta description is `high`; one with the wrong length is `medium`.

use localseo_core::{Issue, ListingResult, Priority, Scores};

use crate::checks::{
    PageSignals, META_MAX_CHARS, META_MIN_CHARS, MIN_WORD_COUNT, TITLE_MAX_CHARS, TITLE_MIN_CHARS,
};
use crate::listing::NO_API_KEY_ERROR;

pub const ON_PAGE_WEIGHT: f64 = 0.30;
pub const LOCAL_WEIGHT: f64 = 0.35;
pub const TECHNICAL_WEIGHT: f64 = 0.15;
pub const GBP_WEIGHT: f64 = 0.20;

pub const TITLE_LENGTH_POINTS: u32 = 20;
pub const TITLE_CITY_POINTS: u32 = 20;
pub const META_POINTS: u32 = 15;
pub const H1_POINTS: u32 = 15;
pub const H1_CITY_POINTS: u32 = 15;
pub const CONTENT_POINTS: u32 = 15;

pub const CITY_IN_PAGE_POINTS: u32 = 30;
pub const BUSINESS_NAME_POINTS: u32 = 20;
pub const NAP_POINTS: u32 = 25;
pub const SCHEMA_POINTS: u32 = 25;

pub const TECHNICAL_HTTPS: u32 = 100;
pub const TECHNICAL_PLAIN_HTTP: u32 = 50;
pub const GBP_FOUND: u32 = 100;
pub const GBP_MISSING: u32 = 0;

pub const ALL_CLEAR_RECOMMENDATION: &str = "Great work: the local SEO basics are covered. \
Keep your Google Business Profile active with fresh photos, posts, and review replies.";

/// Scores, issues, and highlights for one page.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub scores: Scores,
    pub issues: Vec<Issue>,
    pub top_recommendation: String,
    pub whats_working: Vec<String>,
}

/// Runs every check in table order, accumulating points and issues.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn assess(signals: &PageSignals, listing: &ListingResult) -> Assessment {
    let city = signals.city.as_str();
    let mut issues = Vec::new();
    let mut on_page = 0u32;
    let mut local = 0u32;

    if signals.title_optimized() {
        on_page += TITLE_LENGTH_POINTS;
    } else {
        let issue = if signals.title_length == 0 {
            "Page has no title tag".to_owned()
        } else {
            format!(
                "Title is {} characters (aim for {TITLE_MIN_CHARS}-{TITLE_MAX_CHARS})",
                signals.title_length
            )
        };
        issues.push(Issue::new(
            Priority::High,
            "Title",
            issue,
            format!(
                "Write a {TITLE_MIN_CHARS}-{TITLE_MAX_CHARS} character title with your main service and city"
            ),
        ));
    }

    if signals.city_in_title {
        on_page += TITLE_CITY_POINTS;
    } else {
        issues.push(Issue::new(
            Priority::Critical,
            "Local SEO",
            format!("City \"{city}\" is missing from the page title"),
            format!("Add \"{city}\" to your title, for example \"Your Service in {city}\""),
        ));
    }

    if signals.meta_description_optimized() {
        on_page += META_POINTS;
    } else if signals.meta_description_present() {
        issues.push(Issue::new(
            Priority::Medium,
            "Meta",
            format!(
                "Meta description is {} characters (aim for {META_MIN_CHARS}-{META_MAX_CHARS})",
                signals.meta_description_length
            ),
            format!(
                "Rewrite the meta description to {META_MIN_CHARS}-{META_MAX_CHARS} characters, mentioning {city}"
            ),
        ));
    } else {
        issues.push(Issue::new(
            Priority::High,
            "Meta",
            "Missing meta description",
            format!(
                "Add a {META_MIN_CHARS}-{META_MAX_CHARS} character meta description that mentions your services and {city}"
            ),
        ));
    }

    if signals.single_h1() {
        on_page += H1_POINTS;
    } else {
        let issue = if signals.h1s.is_empty() {
            "No H1 heading found".to_owned()
        } else {
            format!("{} H1 headings found (use exactly one)", signals.h1s.len())
        };
        issues.push(Issue::new(
            Priority::High,
            "H1",
            issue,
            "Use exactly one H1 heading that names your main service",
        ));
    }

    if signals.city_in_h1 {
        on_page += H1_CITY_POINTS;
    } else {
        issues.push(Issue::new(
            Priority::Critical,
            "H1 Local",
            format!("H1 heading does not mention \"{city}\""),
            format!("Include \"{city}\" in your H1, for example \"Trusted Service in {city}\""),
        ));
    }

    if signals.content_sufficient() {
        on_page += CONTENT_POINTS;
    } else {
        issues.push(Issue::new(
            Priority::Medium,
            "Content",
            format!(
                "Only {} words of content (aim for {MIN_WORD_COUNT}+)",
                signals.word_count
            ),
            format!(
                "Expand the page to at least {MIN_WORD_COUNT} words with services, FAQs, and local details"
            ),
        ));
    }

    if signals.city_in_page {
        local += CITY_IN_PAGE_POINTS;
    } else {
        issues.push(Issue::new(
            Priority::Critical,
            "Content",
            format!("City \"{city}\" is not mentioned anywhere on the page"),
            format!("Mention {city} and nearby neighborhoods you serve in the page content"),
        ));
    }

    if signals.business_name_on_page {
        local += BUSINESS_NAME_POINTS;
    } else {
        issues.push(Issue::new(
            Priority::High,
            "Business Name",
            "Business name not found on the page",
            "Show your exact business name in the header, title, or footer",
        ));
    }

    if signals.has_nap() {
        local += NAP_POINTS;
    } else {
        let missing = match (signals.has_phone, signals.has_address) {
            (false, false) => "Phone number and street address not found",
            (false, true) => "Phone number not found",
            _ => "Street address not found",
        };
        issues.push(Issue::new(
            Priority::Critical,
            "NAP",
            missing,
            "Show your full name, street address, and phone number on every page, usually in the footer",
        ));
    }

    if signals.has_schema {
        local += SCHEMA_POINTS;
    } else {
        issues.push(Issue::new(
            Priority::High,
            "Schema",
            "No LocalBusiness structured data found",
            "Add LocalBusiness JSON-LD with your name, address, phone, and opening hours",
        ));
    }

    let missing_alt = signals.images_missing_alt();
    if missing_alt > 0 {
        issues.push(Issue::new(
            Priority::Medium,
            "Images",
            format!(
                "{missing_alt} of {} images have no alt text",
                signals.image_count
            ),
            "Describe every image with alt text, mentioning your service or city where it fits",
        ));
    }

    let technical = if signals.is_https {
        TECHNICAL_HTTPS
    } else {
        issues.push(Issue::new(
            Priority::Critical,
            "Security",
            "Not HTTPS",
            "Install an SSL certificate and redirect all HTTP traffic to HTTPS",
        ));
        TECHNICAL_PLAIN_HTTP
    };

    let gbp = if listing.found {
        GBP_FOUND
    } else {
        let issue = if listing.error.as_deref() == Some(NO_API_KEY_ERROR) {
            "Google Business Profile could not be checked (no Places API key configured)"
        } else {
            "No Google Business Profile found"
        };
        issues.push(Issue::new(
            Priority::Critical,
            "GBP",
            issue,
            "Claim and verify your Google Business Profile, using the same name, address, and phone as your site",
        ));
        GBP_MISSING
    };

    let on_page = clamp_score(on_page);
    let local = clamp_score(local);
    let technical = clamp_score(technical);
    let gbp = clamp_score(gbp);
    let scores = Scores {
        on_page,
        local,
        technical,
        gbp,
        overall: overall_score(on_page, local, technical, gbp),
    };

    Assessment {
        scores,
        top_recommendation: top_recommendation(&issues),
        whats_working: whats_working(signals, listing),
        issues,
    }
}

/// `round(on_page×0.30 + local×0.35 + technical×0.15 + gbp×0.20)`.
#[must_use]
pub fn overall_score(on_page: u8, local: u8, technical: u8, gbp: u8) -> u8 {
    let weighted = f64::from(on_page) * ON_PAGE_WEIGHT
        + f64::from(local) * LOCAL_WEIGHT
        + f64::from(technical) * TECHNICAL_WEIGHT
        + f64::from(gbp) * GBP_WEIGHT;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let rounded = weighted.round().clamp(0.0, 100.0) as u8;
    rounded
}

/// Fix of the first critical issue, else of the first issue, else a static
/// all-clear message.
#[must_use]
pub fn top_recommendation(issues: &[Issue]) -> String {
    issues
        .iter()
        .find(|i| i.priority == Priority::Critical)
        .or_else(|| issues.first())
        .map_or_else(|| ALL_CLEAR_RECOMMENDATION.to_owned(), |i| i.fix.clone())
}

fn whats_working(signals: &PageSignals, listing: &ListingResult) -> Vec<String> {
    let mut working = Vec::new();
    if signals.city_in_title {
        working.push(format!("\"{}\" appears in the page title", signals.city));
    }
    if signals.city_in_page {
        working.push(format!("{} is mentioned in the page content", signals.city));
    }
    if signals.has_schema {
        working.push("Structured data markup is present".to_owned());
    }
    if listing.found {
        working.push(listing_highlight(listing));
    }
    working
}

fn listing_highlight(listing: &ListingResult) -> String {
    let name = listing.name.as_deref().unwrap_or("Business");
    match (listing.rating, listing.review_count) {
        (Some(rating), Some(reviews)) => {
            format!("Google Business Profile found: {name} ({rating:.1} stars, {reviews} reviews)")
        }
        (Some(rating), None) => {
            format!("Google Business Profile found: {name} ({rating:.1} stars)")
        }
        _ => format!("Google Business Profile found: {name}"),
    }
}

fn clamp_score(points: u32) -> u8 {
    u8::try_from(points.min(100)).unwrap_or(100)
}
