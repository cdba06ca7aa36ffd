//! Validation helpers applied to a freshly loaded configuration document.

use reqwest::Url;

use crate::error::ConfigError;
use crate::model::{Configuration, Scheme};

/// Validate the `configuration` section, returning the first failure encountered.
pub(crate) fn validate_configuration(config: &Configuration) -> Result<(), ConfigError> {
    validate_sbi(config)?;
    if let Some(webui_uri) = &config.webui_uri {
        validate_webui_uri(webui_uri)?;
    }
    if let Some(amf_oam_uri) = &config.amf_oam_uri {
        validate_amf_oam_uri(amf_oam_uri)?;
    }
    Ok(())
}

fn validate_sbi(config: &Configuration) -> Result<(), ConfigError> {
    if config.sbi.port == 0 {
        return Err(ConfigError::InvalidField {
            field: "configuration.sbi.port".to_string(),
            reason: "must be between 1 and 65535".to_string(),
        });
    }
    if config.sbi.register_ip.trim().is_empty() {
        return Err(ConfigError::InvalidField {
            field: "configuration.sbi.registerIP".to_string(),
            reason: "must not be empty".to_string(),
        });
    }
    if config.sbi.scheme == Scheme::Https && config.sbi.tls.is_none() {
        return Err(ConfigError::InvalidField {
            field: "configuration.sbi.tls".to_string(),
            reason: "required when scheme is https".to_string(),
        });
    }
    Ok(())
}

/// Mirrors the reference implementation's `validateWebuiUri`: the URI must parse,
/// use `http`/`https`, and carry a non-empty host.
pub(crate) fn validate_webui_uri(uri: &str) -> Result<(), ConfigError> {
    validate_http_uri(uri, "configuration.webuiUri")
}

fn validate_amf_oam_uri(uri: &str) -> Result<(), ConfigError> {
    validate_http_uri(uri, "configuration.amfOamUri")
}

fn validate_http_uri(uri: &str, field: &str) -> Result<(), ConfigError> {
    let parsed = Url::parse(uri).map_err(|err| ConfigError::InvalidUri {
        field: field.to_string(),
        uri: uri.to_string(),
        reason: err.to_string(),
    })?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ConfigError::InvalidUri {
            field: field.to_string(),
            uri: uri.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(ConfigError::InvalidUri {
            field: field.to_string(),
            uri: uri.to_string(),
            reason: "missing host".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_webui_uri() {
        assert!(validate_webui_uri("http://webui:5001").is_ok());
    }

    #[test]
    fn rejects_missing_host() {
        let err = validate_webui_uri("http://").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUri { .. }));
    }

    #[test]
    fn rejects_unsupported_scheme() {
        let err = validate_webui_uri("ftp://webui:5001").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUri { .. }));
    }
}
