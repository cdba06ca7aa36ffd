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
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::multiple_crate_versions)]

//! HTTP surface for the Network Function Repository: registration,
//! discovery, subscriptions and OAuth2 token issuance, wired over
//! [`nrf_core::Registry`] with axum.

mod app;
mod error;
mod http;
mod openapi;

pub use app::state::ApiState;
pub use error::{ApiServerError, ApiServerResult};
pub use http::router::ApiServer;
pub use openapi::openapi_document;
