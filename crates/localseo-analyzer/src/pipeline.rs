//! End-to-end analysis: fetch → extract → checks → listing lookup → score.

use std::time::Duration;

use chrono::Utc;
use localseo_core::{AnalysisRequest, AppConfig, ListingResult, Report};
use reqwest::Url;
use tokio::time::Instant;

use crate::checks::PageSignals;
use crate::error::AnalyzerError;
use crate::extract::extract_page;
use crate::fetch::PageFetcher;
use crate::listing::PlacesClient;
use crate::scoring::assess;

/// `ListingResult.error` when the lookup runs past the analysis deadline.
pub const LISTING_TIMEOUT_ERROR: &str = "listing lookup timed out";

/// Everything [`Analyzer::new`] needs, decoupled from environment parsing.
#[derive(Clone)]
pub struct AnalyzerConfig {
    pub fetch_timeout_secs: u64,
    pub fetch_max_redirects: usize,
    pub user_agent: String,
    pub places_api_key: Option<String>,
    pub places_base_url: String,
    pub places_timeout_secs: u64,
    pub analysis_timeout_secs: u64,
}

impl AnalyzerConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            fetch_timeout_secs: config.fetch_timeout_secs,
            fetch_max_redirects: config.fetch_max_redirects,
            user_agent: config.user_agent.clone(),
            places_api_key: config.places_api_key.clone(),
            places_base_url: config.places_base_url.clone(),
            places_timeout_secs: config.places_timeout_secs,
            analysis_timeout_secs: config.analysis_timeout_secs,
        }
    }
}

impl std::fmt::Debug for AnalyzerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyzerConfig")
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("fetch_max_redirects", &self.fetch_max_redirects)
            .field("user_agent", &self.user_agent)
            .field(
                "places_api_key",
                &self.places_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("places_base_url", &self.places_base_url)
            .field("places_timeout_secs", &self.places_timeout_secs)
            .field("analysis_timeout_secs", &self.analysis_timeout_secs)
            .finish()
    }
}

/// Stateless analysis service; share one instance behind an `Arc`.
#[derive(Clone)]
pub struct Analyzer {
    fetcher: PageFetcher,
    places: PlacesClient,
    analysis_timeout: Duration,
}

impl Analyzer {
    /// # Errors
    ///
    /// Returns [`AnalyzerError`] if either HTTP client cannot be built or the
    /// places base URL does not parse.
    pub fn new(config: &AnalyzerConfig) -> Result<Self, AnalyzerError> {
        let fetcher = PageFetcher::new(
            config.fetch_timeout_secs,
            config.fetch_max_redirects,
            &config.user_agent,
        )?;
        let places = PlacesClient::with_base_url(
            config.places_api_key.as_deref(),
            config.places_timeout_secs,
            &config.places_base_url,
        )?;
        Ok(Self {
            fetcher,
            places,
            analysis_timeout: Duration::from_secs(config.analysis_timeout_secs),
        })
    }

    /// Runs the full audit. Never fails.
    ///
    /// The fetch and the listing lookup share one deadline. Running out of
    /// time during the fetch yields the zero-scored `Error` report; running
    /// out during the lookup only degrades the listing to `found:false`.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Report {
        let deadline = Instant::now() + self.analysis_timeout;

        let fetch = self.fetcher.fetch(&request.url);
        let page = match tokio::time::timeout_at(deadline, fetch).await {
            Ok(Ok(page)) => page,
            Ok(Err(err)) => {
                tracing::warn!(url = %request.url, error = %err, "page fetch failed");
                return Report::failed(request, format!("Could not fetch {}: {err}", request.url));
            }
            Err(_) => {
                tracing::warn!(
                    url = %request.url,
                    timeout_secs = self.analysis_timeout.as_secs(),
                    "analysis deadline exceeded during page fetch"
                );
                return Report::failed(
                    request,
                    format!(
                        "Analysis timed out after {} seconds",
                        self.analysis_timeout.as_secs()
                    ),
                );
            }
        };

        let extracted = extract_page(&page.html);
        let signals = PageSignals::collect(
            &extracted,
            &page.html,
            &page.final_url,
            &request.business_name,
            request.city(),
        );

        let lookup = self.places.lookup(&request.business_name, request.city());
        let listing = if let Ok(listing) = tokio::time::timeout_at(deadline, lookup).await {
            listing
        } else {
            tracing::warn!(
                url = %request.url,
                business = %request.business_name,
                "analysis deadline exceeded during listing lookup"
            );
            ListingResult::not_found(Some(LISTING_TIMEOUT_ERROR.to_owned()))
        };

        let report = report_from_signals(request, &signals, listing);
        tracing::info!(
            url = %request.url,
            business = %request.business_name,
            overall = report.scores.overall,
            issues = report.issues.len(),
            "analysis complete"
        );
        report
    }
}

/// Scores already-fetched HTML against a known listing outcome.
///
/// Pure apart from `analyzedAt`.
#[must_use]
pub fn report_from_html(
    request: &AnalysisRequest,
    html: &str,
    final_url: &Url,
    listing: ListingResult,
) -> Report {
    let extracted = extract_page(html);
    let signals = PageSignals::collect(
        &extracted,
        html,
        final_url,
        &request.business_name,
        request.city(),
    );
    report_from_signals(request, &signals, listing)
}

fn report_from_signals(
    request: &AnalysisRequest,
    signals: &PageSignals,
    listing: ListingResult,
) -> Report {
    let assessment = assess(signals, &listing);
    Report {
        url: request.url.clone(),
        business_name: request.business_name.clone(),
        location: request.location.clone(),
        analyzed_at: Utc::now(),
        scores: assessment.scores,
        issues: assessment.issues,
        listing,
        top_recommendation: assessment.top_recommendation,
        whats_working: assessment.whats_working,
        page: Some(signals.summary()),
    }
}
