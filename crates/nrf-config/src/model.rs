//! Typed configuration models loaded from the YAML configuration file.
//!
//! # Design
//! - Pure data carriers deserialised directly by `serde_yaml`.
//! - Keeps field names aligned with the on-disk YAML document (`camelCase`)
//!   while the rest of the workspace uses `snake_case` Rust identifiers.

use serde::{Deserialize, Serialize};

/// Configuration document version this build understands.
pub const EXPECTED_CONFIG_VERSION: &str = "1.0.0";

/// Default external configuration-source URI when `webuiUri` is omitted.
pub const DEFAULT_WEBUI_URI: &str = "http://webui:5001";

/// Default AMF OAM hook template when `amfOamUri` is omitted.
pub const DEFAULT_AMF_OAM_URI: &str = "http://amf:29518/namf-oam/v1/amfInstanceDown";

/// Default poll interval (seconds) for refreshing the default PLMN list.
pub const DEFAULT_PLMN_POLL_INTERVAL_SECS: u64 = 60;

/// Default access-token lifetime in seconds.
pub const DEFAULT_TOKEN_LIFETIME_SECS: u32 = 3600;

/// Root of the YAML configuration document.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Static build/version metadata.
    pub info: InfoConfig,
    /// Runtime configuration consumed by the registry.
    pub configuration: Configuration,
    /// Per-component log level overrides.
    #[serde(default)]
    pub logger: std::collections::HashMap<String, LoggerConfig>,
}

/// `info` section of the configuration document.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoConfig {
    /// Configuration schema version; checked against [`EXPECTED_CONFIG_VERSION`].
    pub version: String,
    /// Free-form description surfaced in logs only.
    #[serde(default)]
    pub description: Option<String>,
}

/// `configuration` section of the configuration document.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    /// Service-based interface bind/registration settings.
    pub sbi: SbiConfig,
    /// Name of the Mongo database, accepted for parity with the reference
    /// configuration surface even though the in-memory store never dials out.
    #[serde(default, rename = "mongoDBName")]
    pub mongo_db_name: Option<String>,
    /// Mongo connection URL, accepted and validated but unused by the
    /// in-memory `ProfileStore`.
    #[serde(default, rename = "mongoDBUrl")]
    pub mongo_db_url: Option<String>,
    /// Whether the Mongo change-stream watcher would be enabled.
    #[serde(default, rename = "mongoDBStreamEnable")]
    pub mongo_db_stream_enable: bool,
    /// Whether profiles expire on a heartbeat timer (vs. legacy one-profile-per-type mode).
    #[serde(default = "default_true")]
    pub nf_profile_expiry_enable: bool,
    /// Default heartbeat interval (seconds) used when a profile omits `heartBeatTimer`.
    #[serde(default = "default_keep_alive_time")]
    pub nf_keep_alive_time: u32,
    /// Default PLMN applied to profiles registered without one.
    #[serde(default)]
    pub default_plmn_id: Option<PlmnIdConfig>,
    /// Service names this NRF instance advertises in its own discovery entry.
    #[serde(default)]
    pub service_name_list: Vec<String>,
    /// External configuration source polled for the default PLMN list.
    #[serde(default)]
    pub webui_uri: Option<String>,
    /// AMF OAM hook URL template, invoked on `amfInstanceDown` events.
    #[serde(default)]
    pub amf_oam_uri: Option<String>,
    /// HMAC signing secret for access tokens; an ephemeral key is generated when absent.
    #[serde(default)]
    pub token_signing_secret: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_keep_alive_time() -> u32 {
    10
}

/// Service-based interface configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SbiConfig {
    /// URI scheme this NRF instance registers itself under (`http` or `https`).
    pub scheme: Scheme,
    /// IP address other network functions use to reach this NRF instance.
    pub register_ip: String,
    /// IP address the HTTP server binds to.
    #[serde(default = "default_binding_ip")]
    pub binding_ip: String,
    /// TCP port the HTTP server listens on.
    pub port: u16,
    /// TLS certificate/key pair, required when `scheme` is `https`.
    #[serde(default)]
    pub tls: Option<TlsConfig>,
}

fn default_binding_ip() -> String {
    "0.0.0.0".to_string()
}

/// Supported SBI schemes.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    /// Plaintext HTTP.
    Http,
    /// TLS-protected HTTP.
    Https,
}

impl Scheme {
    /// Render the scheme as its lowercase string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

/// TLS certificate/key paths.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to the PEM-encoded certificate.
    pub pem: String,
    /// Path to the PEM-encoded private key.
    pub key: String,
}

/// Default PLMN identifier applied to profiles registered without one.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct PlmnIdConfig {
    /// Mobile Country Code.
    pub mcc: String,
    /// Mobile Network Code.
    pub mnc: String,
}

/// Per-component log level override.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggerConfig {
    /// Log level string (e.g., `info`, `debug`, `panic`).
    #[serde(rename = "debugLevel", alias = "debug_level")]
    pub debug_level: String,
}
