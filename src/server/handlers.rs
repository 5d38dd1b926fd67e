// src/server/handlers.rs
// =============================================================================
// Request handlers of the HTTP API.
//
// `analyze` turns a multipart `POST /analyze` into one call of the injected
// analyzer and the outcome into a JSON response. The handlers never look
// inside the analyzer; they only map its result or error onto HTTP.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, info, warn};

use super::types::{ErrorResponse, HealthResponse};
use crate::analyzer::{Analyze, SUCCESS_STATUS};

/// Form field carrying the URL to analyze
const URL_FIELD: &str = "url";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<dyn Analyze>,
}

/// Analyze endpoint
pub async fn analyze(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            warn!(%rejection, "failed to parse form");
            return error_response(StatusCode::BAD_REQUEST, "Failed to parse form");
        }
    };

    let url = match read_url_field(&mut multipart).await {
        Ok(Some(url)) if !url.is_empty() => url,
        Ok(_) => {
            warn!("URL is empty");
            return error_response(StatusCode::BAD_REQUEST, "URL is required");
        }
        Err(e) => {
            warn!(error = %e, "failed to parse form");
            return error_response(StatusCode::BAD_REQUEST, "Failed to parse form");
        }
    };

    info!(url = %url, "received URL for analysis");

    match state.analyzer.analyze(&url).await {
        Ok(result) => {
            info!(url = %url, "analysis completed");
            (status_from(SUCCESS_STATUS), Json(result)).into_response()
        }
        Err(e) => {
            error!(url = %url, error = %e, "analysis failed");
            error_response(status_from(e.status_code()), e.to_string())
        }
    }
}

/// Any method other than POST on /analyze
pub async fn method_not_allowed(method: Method) -> Response {
    warn!(%method, "method not allowed");
    error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// Returns the first `url` field; other fields are skipped
async fn read_url_field(multipart: &mut Multipart) -> Result<Option<String>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(URL_FIELD) {
            return Ok(Some(field.text().await?));
        }
    }
    Ok(None)
}

fn status_from(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::new(status.as_u16(), message))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::analyzer::{AnalysisResult, AnalyzeError, Analyzer, AnalyzerConfig, HtmlVersion};
    use crate::server::routes::create_router;

    const BOUNDARY: &str = "page-inspector-test-boundary";

    struct StubAnalyzer {
        outcome: Result<AnalysisResult, AnalyzeError>,
        calls: AtomicUsize,
    }

    impl StubAnalyzer {
        fn new(outcome: Result<AnalysisResult, AnalyzeError>) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Analyze for StubAnalyzer {
        async fn analyze(&self, _raw_url: &str) -> Result<AnalysisResult, AnalyzeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    fn mock_result() -> AnalysisResult {
        AnalysisResult {
            title: "Mock Title".to_string(),
            headings: (1..=6).map(|level| (format!("h{}", level), 0)).collect::<BTreeMap<_, _>>(),
            html_version: HtmlVersion::Html5,
            internal_links: vec![],
            external_links: vec![],
            inaccessible_links: vec![],
            login_form: false,
        }
    }

    fn multipart_request(field: &str, value: &str) -> Request<Body> {
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"{field}\"\r\n\r\n{value}\r\n--{b}--\r\n",
            b = BOUNDARY,
            field = field,
            value = value,
        );
        Request::builder()
            .method("POST")
            .uri("/analyze")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(analyzer: Arc<dyn Analyze>, request: Request<Body>) -> (StatusCode, Value) {
        let router = create_router(AppState { analyzer }, None);
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_analyze_success() {
        let stub = StubAnalyzer::new(Ok(mock_result()));
        let (status, body) = send(stub.clone(), multipart_request("url", "http://example.com")).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["title"], "Mock Title");
        assert_eq!(body["html_version"], "HTML5");
        assert_eq!(body["is_login_form"], false);
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_method_not_allowed() {
        let stub = StubAnalyzer::new(Ok(mock_result()));
        let request = Request::builder()
            .method("GET")
            .uri("/analyze")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(stub.clone(), request).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["status_code"], 405);
        assert_eq!(body["error"], "Method not allowed");
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_url_is_required() {
        let stub = StubAnalyzer::new(Ok(mock_result()));
        let (status, body) = send(stub.clone(), multipart_request("url", "")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "URL is required");
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_url_field_is_required() {
        let stub = StubAnalyzer::new(Ok(mock_result()));
        let (status, body) = send(stub, multipart_request("address", "http://example.com")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "URL is required");
    }

    #[tokio::test]
    async fn test_non_multipart_body_fails_to_parse() {
        let stub = StubAnalyzer::new(Ok(mock_result()));
        let request = Request::builder()
            .method("POST")
            .uri("/analyze")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from("url=http%3A%2F%2Fexample.com"))
            .unwrap();
        let (status, body) = send(stub, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status_code"], 400);
        assert_eq!(body["error"], "Failed to parse form");
    }

    #[tokio::test]
    async fn test_analyzer_errors_keep_their_status() {
        let cases = [
            (AnalyzeError::HostUnresolved, StatusCode::BAD_GATEWAY),
            (AnalyzeError::Timeout, StatusCode::GATEWAY_TIMEOUT),
            (AnalyzeError::TlsFailure, StatusCode::BAD_GATEWAY),
            (AnalyzeError::ConnectionFailure, StatusCode::BAD_GATEWAY),
            (
                AnalyzeError::Parse("body ended early".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let message = err.to_string();
            let stub = StubAnalyzer::new(Err(err));
            let (status, body) = send(stub, multipart_request("url", "http://bad-url.com")).await;

            assert_eq!(status, expected);
            assert_eq!(body["status_code"], expected.as_u16());
            assert_eq!(body["error"], message);
        }
    }

    #[tokio::test]
    async fn test_real_analyzer_rejects_invalid_url() {
        let analyzer = Arc::new(Analyzer::new(AnalyzerConfig::default()).unwrap());
        let (status, body) = send(analyzer, multipart_request("url", "not a url")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid url");
    }

    #[tokio::test]
    async fn test_health() {
        let stub = StubAnalyzer::new(Ok(mock_result()));
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(stub, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["healthy"], true);
    }
}
