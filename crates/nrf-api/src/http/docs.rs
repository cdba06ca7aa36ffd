//! Documentation endpoints.

use std::sync::Arc;

use axum::{Json, extract::State};
use serde_json::Value;

use crate::app::state::ApiState;

pub(crate) async fn openapi_document_handler(State(state): State<Arc<ApiState>>) -> Json<Value> {
    Json((*state.openapi_document).clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nrf_core::{LocationAuthority, NotifierConfig, NullMetricsSink, Registry};
    use nrf_telemetry::Metrics;
    use serde_json::json;
    use std::time::Duration;

    #[tokio::test]
    async fn openapi_handler_clones_embedded_document() {
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
        let document = Arc::new(json!({"hello": "world"}));
        let state = Arc::new(ApiState::new(
            registry,
            Metrics::new().expect("metrics"),
            Arc::clone(&document),
        ));

        let Json(body) = openapi_document_handler(State(state.clone())).await;
        assert_eq!(body, *document);
        assert_eq!(
            Arc::strong_count(&document),
            2,
            "document should be cloned per request"
        );
    }
}
