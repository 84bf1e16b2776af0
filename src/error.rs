use std::fmt;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("invalid config: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("no valid auth type supplied: {0:?}")]
    UnsupportedAuthType(String),

    #[error("no valid output type provided: {0:?}")]
    UnsupportedOutputType(String),

    #[error("no approle secret id provided")]
    MissingSecretId,

    #[error("approle secret id must be provided as either a literal or a file, not both")]
    AmbiguousSecretId,

    #[error("empty file name provided")]
    MissingFileName,

    #[error("no secret name supplied")]
    MissingSecretName,

    #[error("no secret namespace supplied")]
    MissingSecretNamespace,

    #[error("failed to create vault client: {0}")]
    VaultClient(String),

    #[error("failed to create kubernetes client: {0}")]
    KubeClient(String),

    #[error("failed to read {what} from {path}: {source}")]
    CredentialRead {
        what: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to login to vault: {0}")]
    AuthenticationFailed(String),

    #[error("{stage} did not complete within {timeout:?}")]
    Timeout {
        stage: &'static str,
        timeout: Duration,
    },

    #[error("failed to write token to {destination}: {reason}")]
    DeliveryFailed {
        destination: &'static str,
        reason: String,
    },

    #[error("failed to revoke issued token: {0}")]
    CleanupFailed(String),

    #[error("{delivery} (token revocation also failed: {cleanup})")]
    DeliveryWithFailedCleanup {
        delivery: Box<RelayError>,
        cleanup: Box<RelayError>,
    },
}

/// Aggregate of every configuration violation found during validation,
/// not just the first one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    violations: Vec<String>,
}

impl ConfigError {
    pub fn new(violations: Vec<String>) -> Self {
        Self { violations }
    }

    pub fn violations(&self) -> &[String] {
        &self.violations
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.violations.join("; "))
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_joins_all_violations() {
        let err = ConfigError::new(vec![
            "no vault auth type provided".to_string(),
            "no output type provided".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "no vault auth type provided; no output type provided"
        );
    }

    #[test]
    fn failed_cleanup_keeps_delivery_error_visible() {
        let err = RelayError::DeliveryWithFailedCleanup {
            delivery: Box::new(RelayError::DeliveryFailed {
                destination: "file",
                reason: "disk full".to_string(),
            }),
            cleanup: Box::new(RelayError::CleanupFailed("connection refused".to_string())),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("failed to write token to file"));
        assert!(rendered.contains("token revocation also failed"));
        assert!(rendered.contains("connection refused"));
    }
}
