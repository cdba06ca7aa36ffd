//! Error types for configuration loading and validation.

use thiserror::Error;

/// Primary error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read from disk.
    #[error("failed to read configuration file '{path}'")]
    Read {
        /// Path that was read.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file was not valid YAML, or did not match the expected shape.
    #[error("failed to parse configuration file '{path}'")]
    Parse {
        /// Path that was parsed.
        path: String,
        /// Underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },

    /// `info.version` did not match the version this build expects.
    #[error("config version is '{found}', but expected is '{expected}'")]
    VersionMismatch {
        /// Version declared in the configuration file.
        found: String,
        /// Version this build requires.
        expected: &'static str,
    },

    /// A field failed validation.
    #[error("invalid value for '{field}': {reason}")]
    InvalidField {
        /// Dotted field path, e.g. `configuration.sbi.scheme`.
        field: String,
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// `configuration.webuiUri` (or another URI field) failed to parse.
    #[error("invalid URI '{uri}' for '{field}': {reason}")]
    InvalidUri {
        /// Field the URI came from.
        field: String,
        /// Offending URI value.
        uri: String,
        /// Human-readable reason for rejection.
        reason: String,
    },
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;
