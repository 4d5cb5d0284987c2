use thiserror::Error;

/// Failure to retrieve the page under audit.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("timed out after {timeout_secs}s fetching {url}")]
    Timeout { url: String, timeout_secs: u64 },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("response from {url} exceeds {limit} bytes")]
    BodyTooLarge { url: String, limit: usize },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Failure of a single places text-search query.
#[derive(Debug, Error)]
pub enum ListingError {
    /// Network or TLS failure, or a non-2xx status. The request URL is
    /// stripped because it carries the API key.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-`OK` status such as `REQUEST_DENIED`.
    #[error("Places API returned {status}: {message}")]
    Api { status: String, message: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid Places base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Errors raised while constructing an [`crate::Analyzer`].
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("page fetcher setup failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("places client setup failed: {0}")]
    Listing(#[from] ListingError),
}
