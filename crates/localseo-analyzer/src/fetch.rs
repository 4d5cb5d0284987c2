//! HTTP client for the page under audit.

use std::time::Duration;

use reqwest::{redirect::Policy, Client, Url};

use crate::error::FetchError;

const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Largest page body read before the fetch is abandoned.
pub const DEFAULT_MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

/// A successfully fetched page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL after redirects; the HTTPS check runs against this.
    pub final_url: Url,
    pub html: String,
}

/// Fetches page HTML with a bounded timeout and redirect count.
///
/// Any non-2xx status is an error; partial bodies are never returned.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    timeout_secs: u64,
    max_body_bytes: usize,
}

impl PageFetcher {
    /// Creates a fetcher with the given timeout, redirect cap, and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        max_redirects: usize,
        user_agent: &str,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS.min(timeout_secs)))
            .redirect(Policy::limited(max_redirects))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            timeout_secs,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        })
    }

    /// Overrides the body size cap (default [`DEFAULT_MAX_BODY_BYTES`]).
    #[must_use]
    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    /// Fetches `raw_url`, defaulting the scheme to `https://` when absent.
    ///
    /// # Errors
    ///
    /// - [`FetchError::InvalidUrl`] if the URL cannot be parsed or has no host.
    /// - [`FetchError::Timeout`] if the request exceeds the configured timeout.
    /// - [`FetchError::UnexpectedStatus`] for any non-2xx final response.
    /// - [`FetchError::BodyTooLarge`] if the body exceeds the size cap.
    /// - [`FetchError::Http`] on network, TLS, or redirect-limit failures.
    pub async fn fetch(&self, raw_url: &str) -> Result<FetchedPage, FetchError> {
        let url = normalize_url(raw_url)?;

        let mut response = self
            .client
            .get(url.clone())
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| self.classify(e, &url))?;

        let status = response.status();
        let final_url = response.url().clone();
        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url: final_url.to_string(),
            });
        }

        let too_large = || FetchError::BodyTooLarge {
            url: final_url.to_string(),
            limit: self.max_body_bytes,
        };
        let limit = u64::try_from(self.max_body_bytes).unwrap_or(u64::MAX);
        if response.content_length().is_some_and(|len| len > limit) {
            return Err(too_large());
        }

        let mut body: Vec<u8> = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| self.classify(e, &url))? {
            if body.len() + chunk.len() > self.max_body_bytes {
                return Err(too_large());
            }
            body.extend_from_slice(&chunk);
        }
        let html = String::from_utf8_lossy(&body).into_owned();
        tracing::debug!(url = %final_url, bytes = body.len(), "fetched page");

        Ok(FetchedPage { final_url, html })
    }

    fn classify(&self, error: reqwest::Error, url: &Url) -> FetchError {
        if error.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
                timeout_secs: self.timeout_secs,
            }
        } else {
            FetchError::Http(error)
        }
    }
}

/// Parses a user-supplied URL, prefixing `https://` when no scheme is given.
///
/// # Errors
///
/// Returns [`FetchError::InvalidUrl`] for blank input, a non-HTTP scheme,
/// unparsable input, or a URL without a host.
pub fn normalize_url(raw: &str) -> Result<Url, FetchError> {
    let trimmed = raw.trim();
    let invalid = |reason: &str| FetchError::InvalidUrl {
        url: trimmed.to_owned(),
        reason: reason.to_owned(),
    };

    if trimmed.is_empty() {
        return Err(invalid("URL is empty"));
    }

    let lower = trimmed.to_ascii_lowercase();
    let with_scheme = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_owned()
    } else if lower.contains("://") {
        return Err(invalid("only http and https URLs are supported"));
    } else {
        format!("https://{trimmed}")
    };

    let url = Url::parse(&with_scheme).map_err(|e| invalid(&e.to_string()))?;
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid("URL has no host"));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_url_defaults_to_https() {
        let url = normalize_url("joespizza.example").unwrap();
        assert_eq!(url.as_str(), "https://joespizza.example/");
    }

    #[test]
    fn normalize_url_keeps_explicit_http() {
        let url = normalize_url("http://joespizza.example/menu").unwrap();
        assert_eq!(url.scheme(), "http");
        assert_eq!(url.path(), "/menu");
    }

    #[test]
    fn normalize_url_accepts_uppercase_scheme() {
        let url = normalize_url("HTTPS://JoesPizza.example").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("joespizza.example"));
    }

    #[test]
    fn normalize_url_trims_whitespace() {
        let url = normalize_url("  joespizza.example/  ").unwrap();
        assert_eq!(url.host_str(), Some("joespizza.example"));
    }

    #[test]
    fn normalize_url_rejects_blank() {
        assert!(matches!(
            normalize_url("   "),
            Err(FetchError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn normalize_url_rejects_other_schemes() {
        let err = normalize_url("ftp://joespizza.example").unwrap_err();
        assert!(
            matches!(err, FetchError::InvalidUrl { ref reason, .. } if reason.contains("http")),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn normalize_url_rejects_garbage() {
        assert!(matches!(
            normalize_url("http://"),
            Err(FetchError::InvalidUrl { .. })
        ));
    }
}
