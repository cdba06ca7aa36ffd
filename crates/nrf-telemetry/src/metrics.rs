//! Prometheus-backed metrics registry and snapshot helpers.
//!
//! # Design
//! - Encapsulates collector registration to keep the public API small.
//! - Exposes the registry-specific counters alongside the ambient HTTP one.

use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result};
use nrf_core::{MetricsSink, Outcome};
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};
use serde::Serialize;

/// Prometheus-backed metrics registry shared across services.
#[derive(Clone)]
pub struct Metrics {
    inner: std::sync::Arc<MetricsInner>,
}

struct MetricsInner {
    registry: Registry,
    http_requests_total: IntCounterVec,
    events_emitted_total: IntCounterVec,
    nrf_registrations: IntCounterVec,
    nrf_subscriptions: IntCounterVec,
    nrf_nf_instances: IntCounterVec,
    // Plain running totals mirroring the vectors above, kept for the
    // dashboard snapshot so it doesn't need to walk the Prometheus registry's
    // internal per-label-combination metric families.
    nrf_registrations_total: AtomicU64,
    nrf_subscriptions_total: AtomicU64,
    nrf_nf_instances_total: AtomicU64,
}

/// Snapshot of selected counters, rendered for the `/health` dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    /// Total registration outcomes observed (`register`/`update`/`deregister`, any result).
    pub nrf_registrations_total: u64,
    /// Total subscription outcomes observed (`create`/`update`/`delete`, any result).
    pub nrf_subscriptions_total: u64,
    /// Total discovery outcomes observed, any result.
    pub nrf_nf_instances_total: u64,
}

impl Metrics {
    /// Construct a new metrics registry with the standard collectors registered.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the Prometheus collectors cannot be
    /// registered.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests received"),
            &["route", "code"],
        )?;
        let events_emitted_total = IntCounterVec::new(
            Opts::new("events_emitted_total", "Domain events emitted by type"),
            &["type"],
        )?;
        let nrf_registrations = IntCounterVec::new(
            Opts::new(
                "nrf_registrations",
                "NF instance registration/update/deregistration outcomes",
            ),
            &["query_type", "nf_type", "result"],
        )?;
        let nrf_subscriptions = IntCounterVec::new(
            Opts::new(
                "nrf_subscriptions",
                "NF status subscription create/update/delete outcomes",
            ),
            &["query_type", "nf_type", "result"],
        )?;
        let nrf_nf_instances = IntCounterVec::new(
            Opts::new("nrf_nf_instances", "NF instance discovery outcomes"),
            &["request_nf_type", "target_nf_type", "result"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(events_emitted_total.clone()))?;
        registry.register(Box::new(nrf_registrations.clone()))?;
        registry.register(Box::new(nrf_subscriptions.clone()))?;
        registry.register(Box::new(nrf_nf_instances.clone()))?;

        Ok(Self {
            inner: std::sync::Arc::new(MetricsInner {
                registry,
                http_requests_total,
                events_emitted_total,
                nrf_registrations,
                nrf_subscriptions,
                nrf_nf_instances,
                nrf_registrations_total: AtomicU64::new(0),
                nrf_subscriptions_total: AtomicU64::new(0),
                nrf_nf_instances_total: AtomicU64::new(0),
            }),
        })
    }

    /// Increment the HTTP request counter for the given route and status code.
    pub fn inc_http_request(&self, route: &str, status: u16) {
        self.inner
            .http_requests_total
            .with_label_values(&[route, &status.to_string()])
            .inc();
    }

    /// Increment the emitted event counter for the specific event type.
    pub fn inc_event(&self, event_type: &str) {
        self.inner
            .events_emitted_total
            .with_label_values(&[event_type])
            .inc();
    }

    /// Render the metrics registry using the Prometheus text exposition format.
    ///
    /// # Errors
    ///
    /// Returns an error if the metrics cannot be encoded or if the encoded
    /// buffer is not valid UTF-8.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .context("failed to encode Prometheus metrics")?;
        String::from_utf8(buffer).context("metrics output was not valid UTF-8")
    }

    /// Take a point-in-time snapshot of the registry-specific counters.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            nrf_registrations_total: self.inner.nrf_registrations_total.load(Ordering::Relaxed),
            nrf_subscriptions_total: self.inner.nrf_subscriptions_total.load(Ordering::Relaxed),
            nrf_nf_instances_total: self.inner.nrf_nf_instances_total.load(Ordering::Relaxed),
        }
    }
}

impl MetricsSink for Metrics {
    fn record_registration(&self, query_type: &str, nf_type: &str, outcome: Outcome) {
        self.inner
            .nrf_registrations
            .with_label_values(&[query_type, nf_type, outcome.as_str()])
            .inc();
        self.inner.nrf_registrations_total.fetch_add(1, Ordering::Relaxed);
    }

    fn record_subscription(&self, query_type: &str, nf_type: &str, outcome: Outcome) {
        self.inner
            .nrf_subscriptions
            .with_label_values(&[query_type, nf_type, outcome.as_str()])
            .inc();
        self.inner.nrf_subscriptions_total.fetch_add(1, Ordering::Relaxed);
    }

    fn record_discovery(&self, request_nf_type: &str, target_nf_type: &str, outcome: Outcome) {
        self.inner
            .nrf_nf_instances
            .with_label_values(&[request_nf_type, target_nf_type, outcome.as_str()])
            .inc();
        self.inner.nrf_nf_instances_total.fetch_add(1, Ordering::Relaxed);
    }
}
