use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building a [`Config`](crate::config::Config).
///
/// Per-document failures are never reported through this type; they are
/// [`Outcome::Errored`](crate::rewrite::Outcome::Errored) values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML config {}: {source}", .path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to parse YAML config {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("unsupported config file extension: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("invalid path pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("invalid exclude glob '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("label field name must not be empty")]
    EmptyField,
}
