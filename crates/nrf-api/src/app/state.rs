//! Shared `axum` state: the registry facade, telemetry handle, and the
//! embedded `OpenAPI` document served at `/docs/openapi.json`.

use std::sync::Arc;

use nrf_core::Registry;
use nrf_telemetry::Metrics;
use serde_json::Value;

/// State threaded through every handler via `axum::extract::State`.
pub struct ApiState {
    /// Registry/discovery/subscriptions/token-issuance facade.
    pub registry: Arc<Registry>,
    /// Prometheus-backed metrics handle.
    pub telemetry: Metrics,
    /// Embedded `OpenAPI` document, cloned per request by `/docs/openapi.json`.
    pub openapi_document: Arc<Value>,
}

impl ApiState {
    /// Construct state over an already-assembled [`Registry`].
    #[must_use]
    pub fn new(registry: Arc<Registry>, telemetry: Metrics, openapi_document: Arc<Value>) -> Self {
        Self {
            registry,
            telemetry,
            openapi_document,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nrf_core::{LocationAuthority, NotifierConfig, NullMetricsSink};
    use std::time::Duration;

    #[test]
    fn state_exposes_its_collaborators() {
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
        let telemetry = Metrics::new().expect("metrics construct");
        let document = Arc::new(serde_json::json!({"openapi": "3.0.3"}));
        let state = ApiState::new(registry, telemetry, Arc::clone(&document));

        assert_eq!(*state.openapi_document, *document);
        assert_eq!(Arc::strong_count(&document), 2);
    }
}
