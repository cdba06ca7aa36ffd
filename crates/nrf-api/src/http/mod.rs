//! HTTP surface modules (router, handlers, error mapping).

/// Shared constants and header names for HTTP surfaces.
pub(crate) mod constants;
/// Discovery endpoint (`GET /nnrf-disc/v1/nf-instances`).
pub(crate) mod discovery;
/// OpenAPI document publishing.
pub(crate) mod docs;
/// Problem response helpers and error types.
pub(crate) mod errors;
/// Liveness and metrics endpoints.
pub(crate) mod health;
/// NF instance registration/update/deregistration/fetch/list handlers.
pub(crate) mod nf_instances;
/// OAuth2 client-credentials token endpoint.
pub(crate) mod oauth;
/// Router construction and server host.
pub(crate) mod router;
/// Subscription create/update/remove handlers.
pub(crate) mod subscriptions;
/// Metrics middleware for HTTP requests.
pub(crate) mod telemetry;
