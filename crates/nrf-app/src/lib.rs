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
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! NRF application bootstrap wiring.
//!
//! Layout: `bootstrap.rs` (service wiring), `orchestrator.rs` (registry
//! maintenance tasks), `error.rs` (application-level error type).

/// Application bootstrap and environment loading.
mod bootstrap;
/// Application-level error type.
mod error;
/// Periodic registry maintenance tasks.
mod orchestrator;

pub use bootstrap::run_app;
pub use error::{AppError, AppResult};
