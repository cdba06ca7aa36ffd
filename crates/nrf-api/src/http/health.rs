//! Liveness and Prometheus scrape endpoints.

use std::sync::Arc;

use axum::{body::Body, extract::State, http::StatusCode, response::Response};
use tracing::error;

use crate::app::state::ApiState;
use crate::http::errors::ApiError;

pub(crate) async fn health() -> StatusCode {
    StatusCode::OK
}

pub(crate) async fn metrics(State(state): State<Arc<ApiState>>) -> Result<Response, ApiError> {
    match state.telemetry.render() {
        Ok(body) => Response::builder()
            .status(StatusCode::OK)
            .header(
                axum::http::header::CONTENT_TYPE,
                "text/plain; version=0.0.4",
            )
            .body(Body::from(body))
            .map_err(|err| {
                error!(error = %err, "failed to build metrics response");
                ApiError::internal("failed to build metrics response")
            }),
        Err(err) => {
            error!(error = %err, "failed to render metrics");
            Err(ApiError::internal("failed to render metrics"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nrf_core::{LocationAuthority, NotifierConfig, NullMetricsSink, Registry};
    use nrf_telemetry::Metrics;
    use std::time::Duration;

    #[tokio::test]
    async fn health_is_always_ok() {
        assert_eq!(health().await, StatusCode::OK);
    }

    #[tokio::test]
    async fn metrics_renders_prometheus_text() {
        let registry = Arc::new(Registry::in_memory(
            LocationAuthority {
                scheme: "https".into(),
                register_ip: "127.0.0.1".into(),
                port: 29510,
            },
            Vec::new(),
            true,
            Duration::from_secs(5),
            Some(b"test-secret"),
            "nrf-test",
            NotifierConfig::default(),
            Arc::new(NullMetricsSink),
        ));
        let state = Arc::new(ApiState::new(
            registry,
            Metrics::new().expect("metrics"),
            Arc::new(serde_json::json!({})),
        ));
        let response = metrics(State(state)).await.expect("metrics response");
        assert_eq!(response.status(), StatusCode::OK);
    }
}
