use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderName, Method};
use axum::routing::{get, post};
use axum::Router;
use tokio::sync::oneshot;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use triage_engine::TriageEngine;
use triage_telemetry::MetricsRecorder;

use crate::config::ServerConfig;
use crate::handlers;

/// Shared application state passed to Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<TriageEngine>,
    pub metrics: Arc<MetricsRecorder>,
    /// When the server started.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(engine: TriageEngine, metrics: Arc<MetricsRecorder>) -> Self {
        Self {
            engine: Arc::new(engine),
            metrics,
            start_time: Instant::now(),
        }
    }
}

/// Browser clients call the endpoint cross-origin, so every response
/// carries these headers and OPTIONS is answered directly.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ])
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/", post(handlers::process_document))
        .route("/process", post(handlers::process_document))
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}

/// Bind and start serving. Returns a handle to shut it down.
pub async fn start(config: ServerConfig, state: AppState) -> Result<ServerHandle, std::io::Error> {
    let router = build_router(state, &config);
    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(addr = %local_addr, "triage server started");

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(async move {
        let result = axum::serve(listener, router)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await;
        if let Err(e) = result {
            tracing::error!(error = %e, "server terminated");
        }
    });

    Ok(ServerHandle {
        port: local_addr.port(),
        shutdown_tx,
        server,
    })
}

/// Handle returned by `start()`. Dropping it leaves the server running.
pub struct ServerHandle {
    pub port: u16,
    shutdown_tx: oneshot::Sender<()>,
    server: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    /// Stop accepting connections and wait for in-flight requests.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        if let Err(e) = self.server.await {
            tracing::warn!(error = %e, "server task did not join cleanly");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::{TimeZone, Utc};
    use tower::ServiceExt;
    use triage_core::FixedClock;
    use triage_engine::EngineConfig;

    use crate::handlers::{
        ALERTS_ESCALATED, DEPARTMENT_OVERRIDES, DOCUMENTS_CRITICAL, DOCUMENTS_PROCESSED,
        DOCUMENTS_REJECTED, REQUESTS_IN_FLIGHT,
    };

    // Saturday 2024-03-09 11:30 at +05:30.
    fn weekend_state() -> AppState {
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 3, 9, 6, 0, 0).unwrap());
        let engine = TriageEngine::with_clock(EngineConfig::default(), Arc::new(clock));
        AppState::new(engine, Arc::new(MetricsRecorder::new()))
    }

    fn app(state: AppState) -> Router {
        build_router(state, &ServerConfig::default())
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(resp: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(resp.into_body(), 100_000)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    const CRITICAL_DOC: &str = r#"{
        "title": "Track inspection",
        "department": "Operations",
        "extractedText": "Urgent safety hazard reported near the depot. Emergency crews found a serious risk and the safety protocol was breached.",
        "fileName": "inspection.pdf",
        "fileSize": 2048
    }"#;

    #[tokio::test]
    async fn process_returns_result() {
        let state = weekend_state();
        let metrics = state.metrics.clone();
        let resp = app(state).oneshot(post_json("/process", CRITICAL_DOC)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let parsed = body_json(resp).await;
        assert_eq!(parsed["isCritical"], true);
        assert_eq!(parsed["departmentRoute"]["department"], "Safety");
        assert_eq!(parsed["aiConfidence"], 0.85);
        assert_eq!(parsed["shouldSendImmediateAlert"], true);
        assert_eq!(parsed["alert"]["priority"], "critical");
        assert_eq!(parsed["alert"]["title"], "Critical document: Track inspection");
        assert!(parsed["summary"].as_str().unwrap().starts_with("Urgent safety hazard"));
        assert!(parsed["processedAt"].is_string());

        assert_eq!(metrics.counter_get(DOCUMENTS_PROCESSED, &[]), 1);
        assert_eq!(metrics.counter_get(DOCUMENTS_CRITICAL, &[]), 1);
        assert_eq!(metrics.counter_get(ALERTS_ESCALATED, &[]), 1);
        assert_eq!(
            metrics.counter_get(DEPARTMENT_OVERRIDES, &[("department", "Safety")]),
            1
        );
    }

    #[tokio::test]
    async fn root_path_also_processes() {
        let resp = app(weekend_state())
            .oneshot(post_json("/", CRITICAL_DOC))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn empty_text_is_400() {
        let state = weekend_state();
        let metrics = state.metrics.clone();
        let resp = app(state)
            .oneshot(post_json("/process", r#"{"title": "x", "extractedText": "  "}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let parsed = body_json(resp).await;
        assert_eq!(parsed, serde_json::json!({"error": "No text content to process"}));
        assert_eq!(
            metrics.counter_get(DOCUMENTS_REJECTED, &[("reason", "invalid_input")]),
            1
        );
        assert_eq!(metrics.counter_get(DOCUMENTS_PROCESSED, &[]), 0);
    }

    #[tokio::test]
    async fn missing_text_is_400() {
        let resp = app(weekend_state())
            .oneshot(post_json("/process", r#"{"title": "x", "extractedText": null}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_body_is_500() {
        let state = weekend_state();
        let metrics = state.metrics.clone();
        let resp = app(state)
            .oneshot(post_json("/process", "{not json"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let parsed = body_json(resp).await;
        assert!(!parsed["error"].as_str().unwrap().is_empty());
        assert_eq!(
            metrics.counter_get(DOCUMENTS_REJECTED, &[("reason", "internal")]),
            1
        );
    }

    #[tokio::test]
    async fn wrong_shape_is_500() {
        let resp = app(weekend_state())
            .oneshot(post_json("/process", r#"{"extractedText": 42}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn preflight_answers_with_cors_headers() {
        let req = Request::builder()
            .method("OPTIONS")
            .uri("/process")
            .header("origin", "https://portal.example.com")
            .header("access-control-request-method", "POST")
            .header("access-control-request-headers", "content-type, apikey")
            .body(Body::empty())
            .unwrap();
        let resp = app(weekend_state()).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let headers = resp.headers();
        assert_eq!(headers["access-control-allow-origin"], "*");
        let methods = headers["access-control-allow-methods"].to_str().unwrap();
        assert!(methods.contains("POST"));
        assert!(methods.contains("OPTIONS"));
        let allowed = headers["access-control-allow-headers"]
            .to_str()
            .unwrap()
            .to_lowercase();
        assert!(allowed.contains("x-client-info"));
        assert!(allowed.contains("apikey"));

        let body = axum::body::to_bytes(resp.into_body(), 1_000).await.unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn responses_carry_allow_origin() {
        let mut req = post_json("/process", CRITICAL_DOC);
        req.headers_mut()
            .insert("origin", "https://portal.example.com".parse().unwrap());
        let resp = app(weekend_state()).oneshot(req).await.unwrap();
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    }

    #[tokio::test]
    async fn health_endpoint_returns_ok() {
        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let resp = app(weekend_state()).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let parsed = body_json(resp).await;
        assert_eq!(parsed["status"], "healthy");
        assert!(parsed["version"].is_string());
        assert!(parsed["uptime_secs"].is_number());
    }

    #[tokio::test]
    async fn metrics_endpoint_reflects_traffic() {
        let state = weekend_state();
        let router = app(state);
        router
            .clone()
            .oneshot(post_json("/process", CRITICAL_DOC))
            .await
            .unwrap();

        let req = Request::builder()
            .uri("/metrics")
            .body(Body::empty())
            .unwrap();
        let resp = router.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let parsed = body_json(resp).await;
        let names: Vec<&str> = parsed["metrics"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|m| m["name"].as_str())
            .collect();
        assert!(names.contains(&DOCUMENTS_PROCESSED));
        assert!(names.contains(&"processing_duration_ms"));
    }

    #[tokio::test]
    async fn in_flight_gauge_returns_to_zero() {
        let state = weekend_state();
        let metrics = state.metrics.clone();
        let router = app(state);
        for body in [CRITICAL_DOC, r#"{"extractedText": ""}"#, "{not json"] {
            router
                .clone()
                .oneshot(post_json("/process", body))
                .await
                .unwrap();
        }
        assert_eq!(metrics.gauge_get(REQUESTS_IN_FLIGHT, &[]), 0.0);

        let req = Request::builder()
            .uri("/metrics")
            .body(Body::empty())
            .unwrap();
        let parsed = body_json(router.oneshot(req).await.unwrap()).await;
        let gauge = parsed["metrics"]
            .as_array()
            .unwrap()
            .iter()
            .find(|m| m["name"] == REQUESTS_IN_FLIGHT)
            .expect("in-flight gauge is exported");
        assert_eq!(gauge["metric_type"], "gauge");
        assert_eq!(gauge["value"], 0.0);
    }

    #[tokio::test]
    async fn get_on_process_is_405() {
        let req = Request::builder()
            .uri("/process")
            .body(Body::empty())
            .unwrap();
        let resp = app(weekend_state()).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let req = Request::builder()
            .uri("/nonexistent")
            .body(Body::empty())
            .unwrap();
        let resp = app(weekend_state()).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let config = ServerConfig {
            max_body_bytes: 64,
            ..ServerConfig::default()
        };
        let router = build_router(weekend_state(), &config);
        let resp = router.oneshot(post_json("/process", CRITICAL_DOC)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn server_starts_and_processes_over_tcp() {
        let config = ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
            ..ServerConfig::default()
        };
        let handle = start(config, weekend_state()).await.unwrap();
        assert!(handle.port > 0);

        let client = reqwest::Client::new();
        let url = format!("http://127.0.0.1:{}/process", handle.port);
        let resp = client
            .post(&url)
            .header("content-type", "application/json")
            .body(CRITICAL_DOC)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["isCritical"], true);

        let health = reqwest::get(format!("http://127.0.0.1:{}/health", handle.port))
            .await
            .unwrap();
        assert_eq!(health.status(), 200);

        handle.shutdown().await;
    }
}
