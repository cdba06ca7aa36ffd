//! Error types for the registry, discovery and subscription domain logic.

use std::error::Error;

use thiserror::Error;

/// Primary error type surfaced by `nrf-core` operations.
///
/// Variants map onto the error kinds the NRF exposes to HTTP clients; the
/// transport layer (`nrf-api`) is responsible for the actual status-code
/// mapping so this crate stays free of any HTTP dependency.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Input failed validation before any state change was attempted.
    #[error("validation failed: {detail}")]
    Validation {
        /// Human-readable description of what failed validation.
        detail: String,
    },
    /// No such profile or subscription exists.
    #[error("{resource} not found: {id}")]
    NotFound {
        /// Kind of resource that was missing, e.g. `"nf_instance"`.
        resource: &'static str,
        /// Identifier that was looked up.
        id: String,
    },
    /// A subscription with the requested id already exists.
    #[error("subscription already exists")]
    CreateSubscriptionError,
    /// The profile store or an external dependency is unreachable and no
    /// stale copy could be served instead.
    #[error("upstream unavailable: {detail}")]
    UpstreamUnavailable {
        /// Description of which dependency was unreachable.
        detail: String,
    },
    /// An unexpected internal failure occurred.
    #[error("internal failure")]
    SystemFailure {
        /// Underlying cause.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

/// Convenience alias for `nrf-core` operation results.
pub type CoreResult<T> = Result<T, CoreError>;
