//! Report data model returned by the analyze endpoint.
//!
//! All wire types serialize with camelCase field names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category label of the synthetic issue emitted when the pipeline aborts.
pub const ERROR_CATEGORY: &str = "Error";

const FAILURE_FIX: &str =
    "Check that the URL is correct and the site is publicly reachable, then run the audit again.";

/// One audit request: the page to fetch and the business it should represent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub url: String,
    pub business_name: String,
    pub location: String,
}

impl AnalysisRequest {
    /// The city token used for matching; see [`city_from_location`].
    #[must_use]
    pub fn city(&self) -> &str {
        city_from_location(&self.location)
    }
}

/// Returns the first comma-separated segment of `location`, trimmed.
///
/// `"Lancaster, PA"` yields `"Lancaster"`; `"Lancaster"` yields itself.
#[must_use]
pub fn city_from_location(location: &str) -> &str {
    location.split(',').next().unwrap_or_default().trim()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub priority: Priority,
    pub category: String,
    pub issue: String,
    pub fix: String,
}

impl Issue {
    #[must_use]
    pub fn new(
        priority: Priority,
        category: impl Into<String>,
        issue: impl Into<String>,
        fix: impl Into<String>,
    ) -> Self {
        Self {
            priority,
            category: category.into(),
            issue: issue.into(),
            fix: fix.into(),
        }
    }
}

/// Category sub-scores plus the weighted overall score, all in `0..=100`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scores {
    pub on_page: u8,
    pub local: u8,
    pub technical: u8,
    pub gbp: u8,
    pub overall: u8,
}

/// Outcome of the business-listing lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingResult {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ListingResult {
    #[must_use]
    pub fn not_found(error: Option<String>) -> Self {
        Self {
            found: false,
            error,
            ..Self::default()
        }
    }
}

/// Raw measurements behind the scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    pub final_url: String,
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
    pub is_https: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub url: String,
    pub business_name: String,
    pub location: String,
    pub analyzed_at: DateTime<Utc>,
    pub scores: Scores,
    pub issues: Vec<Issue>,
    pub listing: ListingResult,
    pub top_recommendation: String,
    pub whats_working: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<PageSummary>,
}

impl Report {
    /// Builds the zero-scored report for an analysis that could not complete.
    ///
    /// Carries a single critical issue in the [`ERROR_CATEGORY`] category whose
    /// description is `message`. No listing lookup is recorded.
    #[must_use]
    pub fn failed(request: &AnalysisRequest, message: impl Into<String>) -> Self {
        Self {
            url: request.url.clone(),
            business_name: request.business_name.clone(),
            location: request.location.clone(),
            analyzed_at: Utc::now(),
            scores: Scores::default(),
            issues: vec![Issue::new(
                Priority::Critical,
                ERROR_CATEGORY,
                message,
                FAILURE_FIX,
            )],
            listing: ListingResult::not_found(None),
            top_recommendation: FAILURE_FIX.to_string(),
            whats_working: Vec::new(),
            page: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> AnalysisRequest {
        AnalysisRequest {
            url: "joespizza.example".to_string(),
            business_name: "Joe's Pizza".to_string(),
            location: "Lancaster, PA".to_string(),
        }
    }

    #[test]
    fn city_uses_first_comma_segment() {
        assert_eq!(city_from_location("Lancaster, PA"), "Lancaster");
        assert_eq!(city_from_location("  Lancaster  "), "Lancaster");
        assert_eq!(city_from_location("New York, NY, USA"), "New York");
    }

    #[test]
    fn city_of_blank_location_is_empty() {
        assert_eq!(city_from_location(""), "");
        assert_eq!(city_from_location(" , PA"), "");
    }

    #[test]
    fn failed_report_has_zero_scores_and_one_error_issue() {
        let report = Report::failed(&request(), "connection refused");
        assert_eq!(report.scores, Scores::default());
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].category, ERROR_CATEGORY);
        assert_eq!(report.issues[0].priority, Priority::Critical);
        assert_eq!(report.issues[0].issue, "connection refused");
        assert_eq!(report.top_recommendation, report.issues[0].fix);
        assert!(!report.listing.found);
        assert!(report.whats_working.is_empty());
    }

    #[test]
    fn report_serializes_camel_case_fields() {
        let report = Report::failed(&request(), "timed out");
        let json = serde_json::to_value(&report).expect("serialize report");
        assert_eq!(json["businessName"], "Joe's Pizza");
        assert_eq!(json["scores"]["onPage"], 0);
        assert_eq!(json["issues"][0]["priority"], "critical");
        assert!(json["topRecommendation"].is_string());
        assert!(json["whatsWorking"].is_array());
        assert!(json["analyzedAt"].is_string());
        assert!(json.get("page").is_none(), "absent page summary is omitted");
    }

    #[test]
    fn listing_result_omits_empty_optionals() {
        let json = serde_json::to_value(ListingResult::not_found(None)).expect("serialize");
        assert_eq!(json, serde_json::json!({ "found": false }));
    }

    #[test]
    fn listing_result_serializes_review_count_camel_case() {
        let listing = ListingResult {
            found: true,
            name: Some("Joe's Pizza".to_string()),
            rating: Some(4.6),
            review_count: Some(212),
            address: Some("123 Main Street, Lancaster, PA".to_string()),
            error: None,
        };
        let json = serde_json::to_value(&listing).expect("serialize");
        assert_eq!(json["reviewCount"], 212);
        assert_eq!(json["found"], true);
    }
}
