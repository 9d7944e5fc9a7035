//! Error types for sonar-affiliations

use thiserror::Error;

/// Result type alias for affiliation operations
pub type Result<T> = std::result::Result<T, AffiliationError>;

/// Errors raised while loading or configuring the resolver
///
/// Payloads are plain strings so a failed load can be cached and handed
/// back unchanged on every later call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AffiliationError {
    /// The reference table could not be read
    #[error("Failed to load affiliation table {path}: {reason}")]
    DataLoad { path: String, reason: String },

    /// Invalid resolver configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl AffiliationError {
    pub(crate) fn data_load(path: impl Into<String>, reason: impl ToString) -> Self {
        AffiliationError::DataLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<toml::de::Error> for AffiliationError {
    fn from(err: toml::de::Error) -> Self {
        AffiliationError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for AffiliationError {
    fn from(err: serde_json::Error) -> Self {
        AffiliationError::Config(err.to_string())
    }
}
