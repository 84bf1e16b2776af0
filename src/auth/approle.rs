use vaultrs::api::AuthInfo;
use vaultrs::client::VaultClient;

use crate::error::RelayError;

const DEFAULT_MOUNT: &str = "approle";

/// Where the approle secret id comes from: configured literally, or read
/// from a file at login time (the file form is what gets mounted into pods).
#[derive(Debug)]
pub enum SecretIdSource {
    Literal(String),
    File(String),
}

impl SecretIdSource {
    pub fn from_options(
        literal: Option<&str>,
        file: Option<&str>,
    ) -> Result<Self, RelayError> {
        let literal = literal.map(str::trim).filter(|s| !s.is_empty());
        let file = file.map(str::trim).filter(|s| !s.is_empty());

        match (literal, file) {
            (Some(_), Some(_)) => Err(RelayError::AmbiguousSecretId),
            (Some(value), None) => Ok(Self::Literal(value.to_string())),
            (None, Some(path)) => Ok(Self::File(path.to_string())),
            (None, None) => Err(RelayError::MissingSecretId),
        }
    }

    async fn resolve(&self) -> Result<String, RelayError> {
        match self {
            Self::Literal(value) => Ok(value.clone()),
            Self::File(path) => tokio::fs::read_to_string(path)
                .await
                .map(|s| s.trim().to_string())
                .map_err(|source| RelayError::CredentialRead {
                    what: "approle secret id",
                    path: path.clone(),
                    source,
                }),
        }
    }
}

/// AppRole authentication: the configured role acts as the role id.
#[derive(Debug)]
pub struct AppRoleAuth {
    pub role: String,
    pub mount: String,
    secret_id: SecretIdSource,
}

impl AppRoleAuth {
    pub fn new(role: String, secret_id: SecretIdSource, mount: Option<String>) -> Self {
        Self {
            role,
            mount: mount.unwrap_or_else(|| DEFAULT_MOUNT.to_string()),
            secret_id,
        }
    }

    pub async fn login(&self, client: &VaultClient) -> Result<AuthInfo, RelayError> {
        let secret_id = self.secret_id.resolve().await?;
        vaultrs::auth::approle::login(client, &self.mount, &self.role, &secret_id)
            .await
            .map_err(|e| RelayError::AuthenticationFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn literal_wins_when_file_is_absent() {
        let source = SecretIdSource::from_options(Some("abc"), None).unwrap();
        assert!(matches!(source, SecretIdSource::Literal(value) if value == "abc"));
    }

    #[test]
    fn file_path_is_accepted() {
        let source = SecretIdSource::from_options(None, Some("/etc/secret-id")).unwrap();
        assert!(matches!(source, SecretIdSource::File(path) if path == "/etc/secret-id"));
    }

    #[test]
    fn missing_secret_id_is_rejected() {
        let err = SecretIdSource::from_options(None, Some("  ")).unwrap_err();
        assert!(matches!(err, RelayError::MissingSecretId));
    }

    #[test]
    fn literal_and_file_together_are_rejected() {
        let err = SecretIdSource::from_options(Some("abc"), Some("/etc/secret-id")).unwrap_err();
        assert!(matches!(err, RelayError::AmbiguousSecretId));
    }

    #[tokio::test]
    async fn file_secret_id_is_read_and_trimmed() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "secret-from-file").unwrap();

        let source =
            SecretIdSource::from_options(None, Some(file.path().to_str().unwrap())).unwrap();
        assert_eq!(source.resolve().await.unwrap(), "secret-from-file");
    }

    #[tokio::test]
    async fn unreadable_secret_id_file_is_reported() {
        let source = SecretIdSource::from_options(None, Some("/nonexistent/secret-id")).unwrap();
        let err = source.resolve().await.unwrap_err();
        assert!(matches!(err, RelayError::CredentialRead { .. }));
    }
}
