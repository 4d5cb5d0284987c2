use axum::{
    extract::{Query, State},
    Extension, Json,
};
use localseo_core::{AnalysisRequest, Report};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{ApiError, AppState};

pub(super) const MISSING_FIELDS: &str = "Missing required fields";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AnalyzeQuery {
    pub url: Option<String>,
    pub business_name: Option<String>,
    pub location: Option<String>,
}

impl AnalyzeQuery {
    /// Trims every field; `None` if any is missing or blank.
    fn into_request(self) -> Option<AnalysisRequest> {
        let field = |v: Option<String>| v.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty());
        Some(AnalysisRequest {
            url: field(self.url)?,
            business_name: field(self.business_name)?,
            location: field(self.location)?,
        })
    }
}

pub(super) async fn analyze(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<AnalyzeQuery>,
) -> Result<Json<Report>, ApiError> {
    let Some(request) = query.into_request() else {
        tracing::debug!(request_id = %req_id.0, "analyze rejected: missing fields");
        return Err(ApiError::bad_request(MISSING_FIELDS));
    };

    tracing::info!(
        request_id = %req_id.0,
        url = %request.url,
        business = %request.business_name,
        location = %request.location,
        "analysis requested"
    );
    Ok(Json(state.analyzer.analyze(&request).await))
}
