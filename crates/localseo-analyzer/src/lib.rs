//! Local-search readiness analysis for small-business websites.
//!
//! Fetches a page, extracts on-page signals, looks the business up in the
//! places text-search API, and folds everything into a weighted
//! [`localseo_core::Report`].

pub mod checks;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod listing;
pub mod names;
pub mod pipeline;
pub mod scoring;

pub use checks::PageSignals;
pub use error::{AnalyzerError, FetchError, ListingError};
pub use extract::{extract_page, ExtractedPage};
pub use fetch::{normalize_url, FetchedPage, PageFetcher, DEFAULT_MAX_BODY_BYTES};
pub use listing::{PlacesClient, NO_API_KEY_ERROR};
pub use pipeline::{report_from_html, Analyzer, AnalyzerConfig, LISTING_TIMEOUT_ERROR};
pub use scoring::{assess, overall_score, Assessment};
