#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions, clippy::multiple_crate_versions)]

//! Shared test helpers used across integration suites: sample profile and
//! subscription fixtures, plus a Docker-availability probe.

/// Sample `NfProfile`/`NrfSubscriptionData` values and environment probes.
pub mod fixtures;

pub use fixtures::{amf_profile, amf_status_subscription, docker_available, smf_profile};
