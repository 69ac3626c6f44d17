//! Request handlers.

use std::time::Instant;

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use tracing::Instrument;
use triage_core::{DocumentMetadata, ProcessingResult, TriageError};
use triage_telemetry::{MetricsRecorder, MetricsSnapshot};
use uuid::Uuid;

use crate::error::ApiError;
use crate::health::{self, HealthResponse};
use crate::server::AppState;

pub const DOCUMENTS_PROCESSED: &str = "documents_processed_total";
pub const DOCUMENTS_REJECTED: &str = "documents_rejected_total";
pub const DOCUMENTS_CRITICAL: &str = "documents_critical_total";
pub const ALERTS_ESCALATED: &str = "alerts_escalated_total";
pub const DEPARTMENT_OVERRIDES: &str = "department_overrides_total";
pub const PROCESSING_DURATION: &str = "processing_duration_ms";
pub const REQUESTS_IN_FLIGHT: &str = "requests_in_flight";

/// Holds one unit of the in-flight gauge until dropped, so early returns and
/// cancelled requests (timeouts) release it too.
struct InFlight<'a>(&'a MetricsRecorder);

impl<'a> InFlight<'a> {
    fn enter(metrics: &'a MetricsRecorder) -> Self {
        metrics.gauge_inc(REQUESTS_IN_FLIGHT, &[], 1.0);
        Self(metrics)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.gauge_inc(REQUESTS_IN_FLIGHT, &[], -1.0);
    }
}

/// POST /process (and POST /)
///
/// The body is decoded by hand so that a malformed payload surfaces as an
/// internal error with the decoder's message rather than axum's 4xx rejection.
/// Decoding and the pipeline run on the blocking pool.
pub async fn process_document(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ProcessingResult>, ApiError> {
    let request_id = Uuid::now_v7();
    let span = tracing::info_span!("process_document", %request_id);

    async move {
        let _in_flight = InFlight::enter(&state.metrics);
        let started = Instant::now();
        let engine = state.engine.clone();
        let outcome = tokio::task::spawn_blocking(move || {
            let metadata = serde_json::from_slice::<DocumentMetadata>(&body)?;
            let result = engine.process(&metadata)?;
            Ok::<_, TriageError>((metadata, result))
        })
        .await
        .map_err(|e| TriageError::Internal(format!("processing task failed: {e}")))
        .and_then(|outcome| outcome);
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

        let (metadata, result) = match outcome {
            Ok(ok) => ok,
            Err(err) => {
                state
                    .metrics
                    .counter_inc(DOCUMENTS_REJECTED, &[("reason", err.error_kind())], 1);
                return Err(ApiError(err));
            }
        };

        record_success(&state, &metadata, &result, elapsed_ms);
        tracing::info!(
            department = %result.department_route.department,
            critical = result.is_critical,
            escalated = result.should_send_immediate_alert,
            duration_ms = elapsed_ms,
            "document processed"
        );
        Ok(Json(result))
    }
    .instrument(span)
    .await
}

fn record_success(
    state: &AppState,
    metadata: &DocumentMetadata,
    result: &ProcessingResult,
    elapsed_ms: f64,
) {
    let metrics = &state.metrics;
    metrics.counter_inc(DOCUMENTS_PROCESSED, &[], 1);
    metrics.histogram_observe(PROCESSING_DURATION, &[], elapsed_ms);
    if result.is_critical {
        metrics.counter_inc(DOCUMENTS_CRITICAL, &[], 1);
    }
    if result.should_send_immediate_alert {
        metrics.counter_inc(ALERTS_ESCALATED, &[], 1);
    }
    let routed = result.department_route.department.as_str();
    if routed != metadata.department {
        metrics.counter_inc(DEPARTMENT_OVERRIDES, &[("department", routed)], 1);
    }
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(health::health_check(state.start_time))
}

/// GET /metrics
pub async fn metrics(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}
