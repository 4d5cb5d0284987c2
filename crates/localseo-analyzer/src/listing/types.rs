//! Response shapes for the places text-search endpoint.

use serde::Deserialize;

use localseo_core::ListingResult;

#[derive(Debug, Clone, Deserialize)]
pub struct PlacesResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<PlaceResult>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaceResult {
    pub name: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_ratings_total: Option<u32>,
    #[serde(default)]
    pub formatted_address: Option<String>,
}

impl From<PlaceResult> for ListingResult {
    fn from(place: PlaceResult) -> Self {
        Self {
            found: true,
            name: Some(place.name),
            rating: place.rating,
            review_count: place.user_ratings_total,
            address: place.formatted_address,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_minimal_zero_results_payload() {
        let parsed: PlacesResponse =
            serde_json::from_str(r#"{"status":"ZERO_RESULTS"}"#).expect("parse");
        assert_eq!(parsed.status, "ZERO_RESULTS");
        assert!(parsed.results.is_empty());
        assert!(parsed.error_message.is_none());
    }

    #[test]
    fn place_without_rating_converts_to_found_listing() {
        let place: PlaceResult =
            serde_json::from_str(r#"{"name":"Joe's Pizza","place_id":"abc"}"#).expect("parse");
        let listing = ListingResult::from(place);
        assert!(listing.found);
        assert_eq!(listing.name.as_deref(), Some("Joe's Pizza"));
        assert!(listing.rating.is_none());
        assert!(listing.review_count.is_none());
    }
}
