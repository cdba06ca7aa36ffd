//! YAML configuration loading, version checking, and the external PLMN poll.
//!
//! # Design
//! - `load` mirrors the reference `InitConfigFactory`: read the file, parse it,
//!   default `webuiUri` when absent, and validate it otherwise.
//! - `check_version` mirrors `CheckConfigVersion`.
//! - `fetch_default_plmn_list` polls the external `webuiUri` source for the
//!   `nrf/plmn` document on the interval the app layer's orchestrator drives.

use std::path::Path;

use nrf_api_models::PlmnId;
use tracing::info;

use crate::error::{ConfigError, ConfigResult};
use crate::model::{Config, DEFAULT_WEBUI_URI, EXPECTED_CONFIG_VERSION};
use crate::validate::validate_configuration;

/// Load and validate a YAML configuration document from `path`.
///
/// Mirrors the reference implementation's `InitConfigFactory`: when
/// `webuiUri` is absent it is defaulted (and the default is logged) rather
/// than treated as a validation failure; any other malformed URI aborts
/// startup.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid YAML matching
/// the expected schema, or fails field validation.
pub fn load(path: impl AsRef<Path>) -> ConfigResult<Config> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;

    let mut config: Config =
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;

    if config.configuration.webui_uri.is_none() {
        info!(
            default = DEFAULT_WEBUI_URI,
            "webuiUri not set in configuration file; using default"
        );
        config.configuration.webui_uri = Some(DEFAULT_WEBUI_URI.to_string());
    }

    validate_configuration(&config.configuration)?;

    Ok(config)
}

/// Verify that `info.version` matches the version this build expects.
///
/// # Errors
///
/// Returns an error if the declared version does not match
/// [`EXPECTED_CONFIG_VERSION`].
pub fn check_version(config: &Config) -> ConfigResult<()> {
    if config.info.version != EXPECTED_CONFIG_VERSION {
        return Err(ConfigError::VersionMismatch {
            found: config.info.version.clone(),
            expected: EXPECTED_CONFIG_VERSION,
        });
    }
    info!(version = %config.info.version, "config version accepted");
    Ok(())
}

/// Response document served by the external configuration source at
/// `{webuiUri}/nrf/plmn`.
#[derive(Debug, Clone, serde::Deserialize)]
struct PlmnListResponse {
    #[serde(rename = "plmnList")]
    plmn_list: Vec<PlmnId>,
}

/// Fetch the current default PLMN list from the external configuration source.
///
/// # Errors
///
/// Returns an error if the HTTP request fails or the response body cannot be
/// decoded as JSON.
pub async fn fetch_default_plmn_list(
    client: &reqwest::Client,
    webui_uri: &str,
) -> anyhow::Result<Vec<PlmnId>> {
    let url = format!("{}/nrf/plmn", webui_uri.trim_end_matches('/'));
    let response = client
        .get(&url)
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .await?
        .error_for_status()?;
    let body: PlmnListResponse = response.json().await?;
    Ok(body.plmn_list)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_yaml(version: &str) -> String {
        format!(
            r#"
info:
  version: "{version}"
  description: test
configuration:
  sbi:
    scheme: http
    registerIP: 127.0.0.1
    bindingIP: 0.0.0.0
    port: 29510
  mongoDBName: free5gc
  mongoDBUrl: mongodb://localhost:27017
  nfProfileExpiryEnable: true
  nfKeepAliveTime: 10
  defaultPlmnId:
    mcc: "208"
    mnc: "93"
  serviceNameList:
    - nnrf-nfm
    - nnrf-disc
logger:
  NRF:
    debugLevel: info
"#
        )
    }

    #[test]
    fn loads_a_well_formed_document() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        file.write_all(sample_yaml(EXPECTED_CONFIG_VERSION).as_bytes())
            .expect("write");
        let config = load(file.path()).expect("config loads");
        assert_eq!(config.configuration.webui_uri.as_deref(), Some(DEFAULT_WEBUI_URI));
        assert!(check_version(&config).is_ok());
    }

    #[test]
    fn rejects_version_mismatch() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        file.write_all(sample_yaml("9.9.9").as_bytes())
            .expect("write");
        let config = load(file.path()).expect("config loads");
        let err = check_version(&config).unwrap_err();
        assert!(matches!(err, ConfigError::VersionMismatch { .. }));
    }

    #[test]
    fn rejects_missing_file() {
        let err = load("/nonexistent/path/to/config.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn rejects_https_without_tls() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        let yaml = sample_yaml(EXPECTED_CONFIG_VERSION).replace("scheme: http", "scheme: https");
        file.write_all(yaml.as_bytes()).expect("write");
        let err = load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidField { .. }));
    }
}
