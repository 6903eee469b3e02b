//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use dns_rotation_provider::ProviderError;

use crate::types::{ClusterId, ServerId};

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Cluster id is not in the static cluster table
    #[error("Unknown cluster id: {0}")]
    UnknownCluster(ClusterId),

    /// No server with this id in the inventory
    #[error("Server not found: {0}")]
    ServerNotFound(ServerId),

    /// No hosted zone matches the configured domain
    #[error("Hosted zone not found: {0}")]
    ZoneNotFound(String),

    /// A published record value is not an IPv4 address
    #[error("Invalid value '{value}' in record {record}")]
    InvalidRecordValue { record: String, value: String },

    /// Process configuration is missing or malformed
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Provider error (converting from library)
    #[error("{0}")]
    Provider(#[from] ProviderError),
}

impl CoreError {
    /// Whether it is expected behavior (user input, resource does not exist, etc.) is used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::ServerNotFound(_) | Self::ValidationError(_) => true,
            Self::Provider(e) => e.is_expected(),
            Self::UnknownCluster(_)
            | Self::ZoneNotFound(_)
            | Self::InvalidRecordValue { .. }
            | Self::ConfigError(_) => false,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_code_and_details() {
        let json = serde_json::to_value(CoreError::UnknownCluster(42)).unwrap();
        assert_eq!(json["code"], "UnknownCluster");
        assert_eq!(json["details"], 42);
    }

    #[test]
    fn provider_errors_keep_their_classification() {
        let err = CoreError::from(ProviderError::RecordNotFound {
            provider: "memory".to_string(),
            record_name: "hk.example.com".to_string(),
            raw_message: None,
        });
        assert!(err.is_expected());
        assert_eq!(
            err.to_string(),
            "[memory] Record set 'hk.example.com' not found"
        );

        let err = CoreError::from(ProviderError::Timeout {
            provider: "memory".to_string(),
            detail: "slow".to_string(),
        });
        assert!(!err.is_expected());
    }

    #[test]
    fn configuration_mismatches_are_not_expected() {
        assert!(!CoreError::UnknownCluster(9).is_expected());
        assert!(!CoreError::ZoneNotFound("example.com".to_string()).is_expected());
        assert!(CoreError::ServerNotFound(3).is_expected());
    }
}
