mod analyze;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use localseo_analyzer::Analyzer;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, REQUEST_ID_HEADER};

const INDEX_HTML: &str = include_str!("../../static/index.html");

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
}

/// Flat `{"error": "..."}` body returned for rejected requests.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
}

impl ApiError {
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/health", get(health))
        .route("/api/analyze", get(analyze::analyze))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health() -> Json<HealthData> {
    Json(HealthData { status: "ok" })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use localseo_analyzer::AnalyzerConfig;
    use tower::ServiceExt;

    pub(crate) fn test_app(base_url: &str, api_key: Option<&str>) -> Router {
        let analyzer = Analyzer::new(&AnalyzerConfig {
            fetch_timeout_secs: 5,
            fetch_max_redirects: 5,
            user_agent: "localseo-test".to_owned(),
            places_api_key: api_key.map(ToOwned::to_owned),
            places_base_url: format!("{base_url}/maps/api/place/textsearch/json"),
            places_timeout_secs: 5,
            analysis_timeout_secs: 30,
        })
        .expect("analyzer");
        build_app(AppState {
            analyzer: Arc::new(analyzer),
        })
    }

    pub(crate) async fn send_get(
        app: Router,
        uri: &str,
    ) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let response = app
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        (status, headers, body.to_vec())
    }

    #[test]
    fn api_error_bad_request_maps_to_400() {
        let response = ApiError::bad_request("nope").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let (status, headers, body) =
            send_get(test_app("http://127.0.0.1:9", None), "/api/health").await;

        assert_eq!(status, StatusCode::OK);
        assert!(headers.contains_key(REQUEST_ID_HEADER));
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        assert_eq!(json, serde_json::json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn index_serves_html_form() {
        let (status, headers, body) = send_get(test_app("http://127.0.0.1:9", None), "/").await;

        assert_eq!(status, StatusCode::OK);
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        assert!(content_type.starts_with("text/html"), "{content_type}");
        let html = String::from_utf8(body).expect("utf8");
        assert!(html.contains("/api/analyze"));
        assert!(html.contains("businessName"));
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let (status, _, _) = send_get(test_app("http://127.0.0.1:9", None), "/api/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
