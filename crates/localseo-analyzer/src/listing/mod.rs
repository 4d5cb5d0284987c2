//! Business-listing lookup against the places text-search API.
//!
//! Failures never escape this module: every outcome is folded into a
//! [`ListingResult`], with the last error message kept for diagnostics.

mod types;

use std::time::Duration;

use localseo_core::config::DEFAULT_PLACES_BASE_URL;
use localseo_core::ListingResult;
use reqwest::{Client, Url};

use crate::error::ListingError;
use crate::names::name_variants;

pub use types::{PlaceResult, PlacesResponse};

/// `ListingResult.error` value when no API key is configured.
pub const NO_API_KEY_ERROR: &str = "no Places API key configured";

/// Client for the places text-search endpoint.
///
/// Use [`PlacesClient::new`] for production or [`PlacesClient::with_base_url`]
/// to point at a mock server in tests.
#[derive(Clone)]
pub struct PlacesClient {
    client: Client,
    api_key: Option<String>,
    base_url: Url,
}

impl PlacesClient {
    /// Creates a client pointed at the production text-search endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ListingError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: Option<&str>, timeout_secs: u64) -> Result<Self, ListingError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_PLACES_BASE_URL)
    }

    /// Creates a client with a custom endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns [`ListingError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ListingError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: Option<&str>,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, ListingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent("localseo/0.1 (listing-lookup)")
            .build()?;

        let base_url = Url::parse(base_url).map_err(|e| ListingError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(ToOwned::to_owned),
            base_url,
        })
    }

    /// Looks the business up by `"<name> <city>"`.
    ///
    /// Without an API key this returns immediately with
    /// [`NO_API_KEY_ERROR`]. When a query finds nothing, the next normalized
    /// name form is tried (see [`name_variants`]). Transient failures also
    /// move on to the next form; API rejections stop the lookup.
    pub async fn lookup(&self, business_name: &str, city: &str) -> ListingResult {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::debug!("places lookup skipped: no API key");
            return ListingResult::not_found(Some(NO_API_KEY_ERROR.to_owned()));
        };

        let city = city.trim();
        let mut last_error: Option<String> = None;

        for name in name_variants(business_name) {
            let query = if city.is_empty() {
                name
            } else {
                format!("{name} {city}")
            };

            match self.text_search(api_key, &query).await {
                Ok(Some(place)) => {
                    tracing::info!(query = %query, place = %place.name, "business listing found");
                    return place.into();
                }
                Ok(None) => {
                    tracing::debug!(query = %query, "no places results");
                }
                Err(err) => {
                    tracing::warn!(query = %query, error = %err, "places query failed");
                    let retriable = is_retriable(&err);
                    last_error = Some(err.to_string());
                    if !retriable {
                        break;
                    }
                }
            }
        }

        ListingResult::not_found(last_error)
    }

    /// Runs one text-search query and returns its first result, if any.
    ///
    /// # Errors
    ///
    /// - [`ListingError::Http`] on network failure or non-2xx status.
    /// - [`ListingError::Deserialize`] if the body is not the expected JSON.
    /// - [`ListingError::Api`] for any status other than `OK`/`ZERO_RESULTS`.
    async fn text_search(
        &self,
        api_key: &str,
        query: &str,
    ) -> Result<Option<PlaceResult>, ListingError> {
        let url = self.build_url(api_key, query);
        // The URL carries the key, so strip it from any reqwest error.
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| ListingError::Http(e.without_url()))?;
        let body = response
            .text()
            .await
            .map_err(|e| ListingError::Http(e.without_url()))?;

        let parsed: PlacesResponse =
            serde_json::from_str(&body).map_err(|e| ListingError::Deserialize {
                context: format!("text search (query={query})"),
                source: e,
            })?;

        match parsed.status.as_str() {
            "OK" => Ok(parsed.results.into_iter().next()),
            "ZERO_RESULTS" => Ok(None),
            status => Err(ListingError::Api {
                status: status.to_owned(),
                message: parsed
                    .error_message
                    .unwrap_or_else(|| "no error message".to_owned()),
            }),
        }
    }

    fn build_url(&self, api_key: &str, query: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("query", query)
            .append_pair("key", api_key);
        url
    }
}

/// Returns `true` for failures where a differently-phrased query may still
/// succeed.
///
/// **Retriable:** timeouts, connection failures, HTTP 5xx, and the API's
/// `UNKNOWN_ERROR` status.
///
/// **Not retriable:** `REQUEST_DENIED`, `INVALID_REQUEST`,
/// `OVER_QUERY_LIMIT`, other 4xx, and malformed bodies.
pub(crate) fn is_retriable(err: &ListingError) -> bool {
    match err {
        ListingError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        ListingError::Api { status, .. } => status == "UNKNOWN_ERROR",
        ListingError::Deserialize { .. } | ListingError::InvalidBaseUrl { .. } => false,
    }
}
