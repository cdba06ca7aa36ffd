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

//! YAML configuration loading and validation for the NRF workspace.
//!
//! Layout: `model.rs` (typed document deserialised by `serde_yaml`),
//! `validate.rs` (startup field validation), `loader.rs` (file load, version
//! check, and the external PLMN-source poll), with `error.rs` hosting
//! `ConfigError`/`ConfigResult`.

pub mod error;
pub mod loader;
pub mod model;
mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::{check_version, fetch_default_plmn_list, load};
pub use model::{
    Config, Configuration, DEFAULT_AMF_OAM_URI, DEFAULT_PLMN_POLL_INTERVAL_SECS,
    DEFAULT_TOKEN_LIFETIME_SECS, DEFAULT_WEBUI_URI, EXPECTED_CONFIG_VERSION, InfoConfig,
    LoggerConfig, PlmnIdConfig, SbiConfig, Scheme, TlsConfig,
};
