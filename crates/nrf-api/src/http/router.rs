//! Router construction and server host for the API.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    http::{Method, Request, header::CONTENT_TYPE},
    routing::{get, patch, post, put},
};
use nrf_core::Registry;
use nrf_telemetry::{Metrics, build_sha};
use serde_json::Value;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::Span;

use crate::app::state::ApiState;
use crate::error::{ApiServerError, ApiServerResult};
use crate::http::constants::HEADER_REQUEST_ID;
use crate::http::health::{health, metrics};
use crate::http::telemetry::HttpMetricsLayer;
use crate::openapi::OpenApiDependencies;

/// Axum router wrapper that hosts the NRF's service-based interfaces.
pub struct ApiServer {
    router: Router,
}

impl ApiServer {
    /// Construct a new API server with shared dependencies wired through application state.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the embedded `OpenAPI` document fails.
    pub fn new(registry: Arc<Registry>, telemetry: Metrics) -> ApiServerResult<Self> {
        let openapi = OpenApiDependencies::embedded_at(Path::new("docs/api/openapi.json"));
        Self::with_dependencies(registry, telemetry, &openapi)
    }

    pub(crate) fn with_dependencies(
        registry: Arc<Registry>,
        telemetry: Metrics,
        openapi: &OpenApiDependencies,
    ) -> ApiServerResult<Self> {
        (openapi.persist)(&openapi.path, &openapi.document).map_err(|source| ApiServerError::OpenApiPersist {
            path: openapi.path.clone(),
            source,
        })?;
        let state = Self::build_state(registry, telemetry.clone(), Arc::clone(&openapi.document));

        let cors_layer = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([
                Method::GET,
                Method::PUT,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([CONTENT_TYPE]);
        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &Request<_>| {
                let method = request.method().clone();
                let uri_path = request.uri().path();
                let request_id = request
                    .headers()
                    .get(HEADER_REQUEST_ID)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("")
                    .to_string();

                tracing::info_span!(
                    "http.request",
                    method = %method,
                    route = %uri_path,
                    request_id = %request_id,
                    build_sha = %build_sha(),
                    status_code = tracing::field::Empty,
                    latency_ms = tracing::field::Empty
                )
            })
            .on_request(|_request: &Request<_>, _span: &Span| {})
            .on_response(
                |response: &axum::response::Response, latency: Duration, span: &Span| {
                    let status = response.status().as_u16();
                    span.record("status_code", status);
                    let latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
                    span.record("latency_ms", latency_ms);
                },
            );
        let layered = ServiceBuilder::new()
            .layer(nrf_telemetry::propagate_request_id_layer())
            .layer(nrf_telemetry::set_request_id_layer())
            .layer(trace_layer)
            .layer(HttpMetricsLayer::new(telemetry));

        let router = Self::build_router()
            .layer(cors_layer)
            .route_layer(layered)
            .with_state(state);

        Ok(Self { router })
    }

    pub(crate) fn build_state(
        registry: Arc<Registry>,
        telemetry: Metrics,
        openapi_document: Arc<Value>,
    ) -> Arc<ApiState> {
        Arc::new(ApiState::new(registry, telemetry, openapi_document))
    }

    fn build_router() -> Router<Arc<ApiState>> {
        Self::public_routes().merge(Self::nrf_routes())
    }

    fn public_routes() -> Router<Arc<ApiState>> {
        Router::new()
            .route("/health", get(health))
            .route("/metrics", get(metrics))
            .route(
                "/docs/openapi.json",
                get(crate::http::docs::openapi_document_handler),
            )
    }

    fn nrf_routes() -> Router<Arc<ApiState>> {
        Router::new()
            .route(
                "/nnrf-nfm/v1/nf-instances/{nfInstanceId}",
                put(crate::http::nf_instances::register)
                    .patch(crate::http::nf_instances::update)
                    .delete(crate::http::nf_instances::deregister)
                    .get(crate::http::nf_instances::get_one),
            )
            .route(
                "/nnrf-nfm/v1/nf-instances",
                get(crate::http::nf_instances::list),
            )
            .route(
                "/nnrf-nfm/v1/subscriptions",
                post(crate::http::subscriptions::create),
            )
            .route(
                "/nnrf-nfm/v1/subscriptions/{subscriptionId}",
                patch(crate::http::subscriptions::update).delete(crate::http::subscriptions::remove),
            )
            .route(
                "/nnrf-disc/v1/nf-instances",
                get(crate::http::discovery::discover),
            )
            .route("/oauth2/token", post(crate::http::oauth::token))
    }

    /// Serve the API using the configured router on the supplied address.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener fails to bind or the server terminates unexpectedly.
    pub async fn serve(self, addr: SocketAddr) -> ApiServerResult<()> {
        tracing::info!("Starting API on {}", addr);
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ApiServerError::Bind { addr, source })?;
        axum::serve(listener, self.router.into_make_service())
            .await
            .map_err(|source| ApiServerError::Serve { source })?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) const fn router(&self) -> &Router {
        &self.router
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nrf_core::{LocationAuthority, NotifierConfig, NullMetricsSink};
    use tower::ServiceExt;

    fn registry() -> Arc<Registry> {
        Arc::new(Registry::in_memory(
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
        ))
    }

    #[tokio::test]
    async fn health_route_is_reachable() {
        let openapi = OpenApiDependencies::in_memory(serde_json::json!({}));
        let server = ApiServer::with_dependencies(registry(), Metrics::new().expect("metrics"), &openapi)
            .expect("server");
        let response = server
            .router
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(axum::body::Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), axum::http::StatusCode::OK);
    }
}
