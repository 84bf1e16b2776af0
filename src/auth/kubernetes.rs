use vaultrs::api::AuthInfo;
use vaultrs::client::VaultClient;

use crate::error::RelayError;

const DEFAULT_MOUNT: &str = "kubernetes";
const DEFAULT_JWT_PATH: &str = "/var/run/secrets/kubernetes.io/serviceaccount/token";

/// Kubernetes service-account authentication.
///
/// The pod's projected JWT is read at login time, not at construction, so
/// a freshly rotated token is always the one presented to Vault.
#[derive(Debug)]
pub struct KubernetesAuth {
    pub role: String,
    pub mount: String,
    pub jwt_path: String,
}

impl KubernetesAuth {
    pub fn new(role: String, mount: Option<String>) -> Self {
        Self {
            role,
            mount: mount.unwrap_or_else(|| DEFAULT_MOUNT.to_string()),
            jwt_path: DEFAULT_JWT_PATH.to_string(),
        }
    }

    pub fn with_jwt_path(mut self, path: impl Into<String>) -> Self {
        self.jwt_path = path.into();
        self
    }

    async fn read_jwt(&self) -> Result<String, RelayError> {
        tokio::fs::read_to_string(&self.jwt_path)
            .await
            .map(|s| s.trim().to_string())
            .map_err(|source| RelayError::CredentialRead {
                what: "service account jwt",
                path: self.jwt_path.clone(),
                source,
            })
    }

    pub async fn login(&self, client: &VaultClient) -> Result<AuthInfo, RelayError> {
        let jwt = self.read_jwt().await?;
        vaultrs::auth::kubernetes::login(client, &self.mount, &self.role, &jwt)
            .await
            .map_err(|e| RelayError::AuthenticationFailed(e.to_string()))
    }
}
