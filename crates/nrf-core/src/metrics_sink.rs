//! Pluggable outcome counters for the registry, subscription and discovery
//! operations (component G).
//!
//! `nrf-core` stays free of any metrics backend dependency; callers supply an
//! implementation (the workspace's binary wires up a Prometheus-backed one in
//! `nrf-telemetry`) or fall back to [`NullMetricsSink`] in tests.

use std::sync::Arc;

/// Outcome label used across every counter this trait exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The operation completed successfully.
    Success,
    /// The operation failed.
    Failure,
}

impl Outcome {
    /// Render as the label Prometheus expects: `SUCCESS` / `FAILURE`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Failure => "FAILURE",
        }
    }

    /// Derive an outcome from a `Result`, discarding the value/error.
    #[must_use]
    pub fn from_result<T, E>(result: &Result<T, E>) -> Self {
        if result.is_ok() { Self::Success } else { Self::Failure }
    }
}

/// Counters described in spec §4.7: registration, subscription and discovery
/// outcomes, each labeled by query/NF type and result.
pub trait MetricsSink: Send + Sync {
    /// `nrf_registrations{queryType, nfType, result}` — register/update/deregister.
    fn record_registration(&self, query_type: &str, nf_type: &str, outcome: Outcome);
    /// `nrf_subscriptions{queryType, nfType, result}` — subscribe/unsubscribe/update.
    fn record_subscription(&self, query_type: &str, nf_type: &str, outcome: Outcome);
    /// `nrf_nf_instances{requestNfType, targetNfType, result}` — discovery outcomes.
    fn record_discovery(&self, request_nf_type: &str, target_nf_type: &str, outcome: Outcome);
}

/// No-op sink for tests and standalone use of `nrf-core`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullMetricsSink;

impl MetricsSink for NullMetricsSink {
    fn record_registration(&self, _query_type: &str, _nf_type: &str, _outcome: Outcome) {}
    fn record_subscription(&self, _query_type: &str, _nf_type: &str, _outcome: Outcome) {}
    fn record_discovery(&self, _request_nf_type: &str, _target_nf_type: &str, _outcome: Outcome) {}
}

/// Shared handle type used across the app's wiring.
pub type SharedMetricsSink = Arc<dyn MetricsSink>;
